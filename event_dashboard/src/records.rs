use log::{debug, info};

use crate::config::*;

/// The rows shown on the map: named rows of the event category.
pub fn filter_events(rows: &[RawRow], options: &DashboardOptions) -> Vec<RawRow> {
    let cols = &options.columns;
    let res: Vec<RawRow> = rows
        .iter()
        .filter(|row| !row.is_blank(&cols.name) && row.get(&cols.category) == options.event_category)
        .cloned()
        .collect();
    info!(
        "filter_events: kept {:?} event rows out of {:?}",
        res.len(),
        rows.len()
    );
    res
}

/// The rows used by the charts: events with a 4-digit start year and a
/// 1- or 2-digit start month.
///
/// Unlike the map rows, the name of the event is not required.
pub fn extract_event_records(rows: &[RawRow], options: &DashboardOptions) -> Vec<EventRecord> {
    let cols = &options.columns;

    let mut res: Vec<EventRecord> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        if row.get(&cols.category) != options.event_category {
            continue;
        }
        let year = row.get(&cols.start_year);
        let month = row.get(&cols.start_month);
        if !is_digits(year, 4, 4) || !is_digits(month, 1, 2) {
            debug!(
                "extract_event_records: row {:?}: dropping year {:?} month {:?}",
                idx, year, month
            );
            continue;
        }
        res.push(EventRecord {
            year: year.to_string(),
            month: month.to_string(),
            event_type: row.get(&cols.event_type).to_string(),
            cere_role: row.trimmed(&cols.role).to_string(),
        });
    }
    info!(
        "extract_event_records: {:?} dated events out of {:?} rows",
        res.len(),
        rows.len()
    );
    res
}

fn is_digits(s: &str, min_len: usize, max_len: usize) -> bool {
    (min_len..=max_len).contains(&s.len()) && s.bytes().all(|b| b.is_ascii_digit())
}
