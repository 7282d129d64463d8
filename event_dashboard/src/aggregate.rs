use log::{debug, info};

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::config::*;
use crate::normalize::{normalize_municipality, split_entities};

pub const MONTH_LABELS: [&str; 12] = [
    "Gen", "Febr", "Març", "Abr", "Maig", "Juny", "Jul", "Ago", "Set", "Oct", "Nov", "Des",
];

/// Scalar summary of the map dataset. It does not depend on the president filter.
pub fn summary_stats(rows: &[RawRow], options: &DashboardOptions) -> Stats {
    let cols = &options.columns;
    let mut municipalities: HashSet<String> = HashSet::new();
    let mut promotors: HashSet<String> = HashSet::new();
    for row in rows.iter() {
        if !row.is_blank(&cols.location) {
            municipalities.insert(normalize_municipality(row.get(&cols.location)));
        }
        if !row.is_blank(&cols.promoters) {
            promotors.extend(split_entities(row.get(&cols.promoters)));
        }
    }
    Stats {
        total_events: rows.len() as u64,
        total_municipalities: municipalities.len() as u64,
        total_promotors: promotors.len() as u64,
    }
}

/// The key of the president filter for one row, if the row has one.
///
/// Under `Variant::PresidentPeriod` both the president and the period must be
/// filled in and the key is `president|period`.
pub fn president_key(row: &RawRow, options: &DashboardOptions) -> Option<String> {
    let president = row.trimmed(&options.columns.president);
    if president.is_empty() {
        return None;
    }
    match options.variant {
        Variant::PresidentOnly => Some(president.to_string()),
        Variant::PresidentPeriod => {
            let period = row.trimmed(&options.columns.period);
            if period.is_empty() {
                None
            } else {
                Some(format!("{}|{}", president, period))
            }
        }
    }
}

/// The entries of the president filter, in order of first appearance.
pub fn president_period_index(rows: &[RawRow], options: &DashboardOptions) -> Vec<PresidentPeriod> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut res: Vec<PresidentPeriod> = Vec::new();
    for row in rows.iter() {
        if let Some(key) = president_key(row, options) {
            if seen.insert(key.clone()) {
                let period = match options.variant {
                    Variant::PresidentPeriod => row.trimmed(&options.columns.period).to_string(),
                    Variant::PresidentOnly => String::new(),
                };
                res.push(PresidentPeriod {
                    key,
                    president: row.trimmed(&options.columns.president).to_string(),
                    period,
                });
            }
        }
    }
    debug!("president_period_index: {:?} entries", res.len());
    res
}

// The longest prefix of `s` that reads as a decimal number: an optional
// sign, digits with an optional fraction, and an optional exponent.
// Empty when `s` does not start with a number.
fn float_prefix(s: &str) -> &str {
    let b = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        i
    };
    let mut end = 0;
    if end < b.len() && (b[end] == b'+' || b[end] == b'-') {
        end += 1;
    }
    let int_end = digits_from(end);
    let mut has_digits = int_end > end;
    end = int_end;
    if end < b.len() && b[end] == b'.' {
        let frac_end = digits_from(end + 1);
        if frac_end > end + 1 {
            has_digits = true;
            end = frac_end;
        }
    }
    if !has_digits {
        return "";
    }
    if end < b.len() && (b[end] == b'e' || b[end] == b'E') {
        let mut exp = end + 1;
        if exp < b.len() && (b[exp] == b'+' || b[exp] == b'-') {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            end = exp_end;
        }
    }
    &s[..end]
}

// Coordinates use a decimal comma in the spreadsheet. Only the first comma is
// replaced and trailing text after the number is ignored, so "41,05°" reads as
// 41.05. Infinite values are not coordinates.
fn parse_coordinate(s: &str) -> Option<f64> {
    let dotted = s.trim().replacen(',', ".", 1);
    match float_prefix(&dotted).parse::<f64>() {
        Ok(x) if x.is_finite() => Some(x),
        _ => None,
    }
}

/// Groups the rows of the map by municipality.
///
/// Rows without coordinates, with unreadable coordinates or without a
/// location are skipped, as well as the rows rejected by the filter. The
/// markers are returned in the order in which their municipality first
/// appears.
pub fn municipality_markers(
    rows: &[RawRow],
    filter: &PresidentFilter,
    options: &DashboardOptions,
) -> Vec<MunicipalityAggregate> {
    let cols = &options.columns;
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut res: Vec<MunicipalityAggregate> = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let (lat_s, lon_s) = (row.get(&cols.latitude), row.get(&cols.longitude));
        if lat_s.is_empty() || lon_s.is_empty() {
            continue;
        }
        let name = row.trimmed(&cols.location);
        if name.is_empty() {
            continue;
        }
        if let PresidentFilter::Key(k) = filter {
            if president_key(row, options).as_ref() != Some(k) {
                continue;
            }
        }
        let (latitude, longitude) = match (parse_coordinate(lat_s), parse_coordinate(lon_s)) {
            (Some(lat), Some(lon)) => (lat, lon),
            _ => {
                debug!(
                    "municipality_markers: row {:?}: unreadable coordinates {:?} {:?}",
                    idx, lat_s, lon_s
                );
                continue;
            }
        };

        let key = normalize_municipality(name);
        let pos = *positions.entry(key.clone()).or_insert_with(|| {
            res.push(MunicipalityAggregate {
                normalized_key: key,
                display_name: name.to_string(),
                latitude,
                longitude,
                count: 0,
            });
            res.len() - 1
        });
        res[pos].count += 1;
    }
    info!(
        "municipality_markers: filter {:?}: {:?} municipalities",
        filter.as_str(),
        res.len()
    );
    res
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
enum Role {
    Impulsor,
    Collaborator,
}

// The first match wins: a row that mentions both roles is an impulsor.
fn role_of(text: &str) -> Option<Role> {
    let t = text.to_lowercase();
    if t.contains("impulsor") {
        Some(Role::Impulsor)
    } else if t.contains("col·laborador") || t.contains("col.laborador") {
        Some(Role::Collaborator)
    } else {
        None
    }
}

/// The distinct years of the timeline, in ascending order.
pub fn distinct_years(records: &[EventRecord]) -> Vec<String> {
    let years: HashSet<&str> = records.iter().map(|r| r.year.as_str()).collect();
    let mut res: Vec<String> = years.into_iter().map(|y| y.to_string()).collect();
    res.sort();
    res
}

/// The years offered by the year selectors.
pub fn selectable_years(years: &[String], min_year: Option<u32>) -> Vec<String> {
    years
        .iter()
        .filter(|y| match (min_year, y.parse::<u32>()) {
            (Some(min), Ok(x)) => x >= min,
            _ => true,
        })
        .cloned()
        .collect()
}

/// Number of events per year, in ascending year order.
///
/// Under `Variant::PresidentPeriod` the events are also split by the role of
/// the organisation. A row counts at most once in the split.
pub fn year_totals(records: &[EventRecord], options: &DashboardOptions) -> Vec<YearTally> {
    let mut tallies: BTreeMap<&str, YearTally> = BTreeMap::new();
    for r in records.iter() {
        let tally = tallies.entry(r.year.as_str()).or_insert_with(|| YearTally {
            year: r.year.clone(),
            ..YearTally::default()
        });
        tally.total += 1;
        if options.variant == Variant::PresidentOnly {
            continue;
        }
        match role_of(&r.cere_role) {
            Some(Role::Impulsor) => tally.impulsor += 1,
            Some(Role::Collaborator) => tally.collaborator += 1,
            None => {}
        }
    }
    tallies.into_values().collect()
}

/// Number of events per month, January first.
pub fn month_totals(records: &[EventRecord], year: &YearFilter) -> [u64; 12] {
    let mut counts = [0u64; 12];
    for r in records.iter().filter(|r| year.accepts(&r.year)) {
        match r.month.parse::<usize>() {
            Ok(m) if (1..=12).contains(&m) => counts[m - 1] += 1,
            _ => {
                debug!(
                    "month_totals: ignoring month {:?} of year {:?}",
                    r.month, r.year
                );
            }
        }
    }
    counts
}

/// The most frequent event types, most frequent first.
///
/// Types with the same count keep the order in which they were first seen.
pub fn event_type_totals(
    records: &[EventRecord],
    year: &YearFilter,
    options: &DashboardOptions,
) -> Vec<EventTypeCount> {
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut res: Vec<EventTypeCount> = Vec::new();
    for r in records.iter().filter(|r| year.accepts(&r.year)) {
        let event_type = match r.event_type.trim() {
            "" => options.unspecified_type_label.as_str(),
            x => x,
        };
        match positions.get(event_type) {
            Some(&pos) => res[pos].count += 1,
            None => {
                positions.insert(event_type.to_string(), res.len());
                res.push(EventTypeCount {
                    event_type: event_type.to_string(),
                    count: 1,
                });
            }
        }
    }
    // Stable sort.
    res.sort_by(|a, b| b.count.cmp(&a.count));
    res.truncate(options.top_event_types);
    res
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(name: &str, location: &str, lat: &str, lon: &str) -> RawRow {
        RawRow::from_pairs([
            ("Nom", name),
            ("Tipus", "Esdeveniments"),
            ("Localització", location),
            ("Latitud", lat),
            ("Longitud", lon),
        ])
    }

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn with(mut row: RawRow, column: &str, value: &str) -> RawRow {
        row.insert(column, value);
        row
    }

    fn record(year: &str, month: &str, event_type: &str, role: &str) -> EventRecord {
        EventRecord {
            year: year.to_string(),
            month: month.to_string(),
            event_type: event_type.to_string(),
            cere_role: role.to_string(),
        }
    }

    #[test]
    fn single_marker() {
        let rows = vec![event("X", "Gandesa", "40,9", "0,4")];
        let markers = municipality_markers(&rows, &PresidentFilter::parse("Tots"), &DashboardOptions::default());
        assert_eq!(
            markers,
            vec![MunicipalityAggregate {
                normalized_key: "gandesa".to_string(),
                display_name: "Gandesa".to_string(),
                latitude: 40.9,
                longitude: 0.4,
                count: 1,
            }]
        );
    }

    #[test]
    fn markers_group_by_normalized_name() {
        let rows = vec![
            event("a", "Gandesa", "40,9", "0,4"),
            event("b", "GANDESA ", "41,0", "0,5"),
            event("c", "Móra d'Ebre", "41,09", "0,64"),
            event("d", "Mora d'Ebre", "41,09", "0,64"),
            event("e", "Mora  D'EBRE", "41,09", "0,64"),
        ];
        let markers = municipality_markers(&rows, &PresidentFilter::All, &DashboardOptions::default());
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].display_name, "Gandesa");
        assert_eq!(markers[0].count, 2);
        assert_eq!(markers[0].latitude, 40.9);
        assert_eq!(markers[1].display_name, "Móra d'Ebre");
        assert_eq!(markers[1].normalized_key, "mora d'ebre");
        assert_eq!(markers[1].count, 3);
    }

    #[test]
    fn markers_skip_bad_rows() {
        init_logs();
        let rows = vec![
            event("a", "Gandesa", "", "0,4"),
            event("b", "Gandesa", "40,9", "est"),
            event("c", "  ", "40,9", "0,4"),
            event("d", "Tortosa", "40.81", "0.52"),
            event("e", "Tortosa", "NaN", "0.52"),
            event("f", "Amposta", "inf", "0,5"),
            event("g", "Amposta", "40,7", "-infinity"),
            event("h", "Amposta", "1e999", "0,5"),
        ];
        let markers = municipality_markers(&rows, &PresidentFilter::All, &DashboardOptions::default());
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].display_name, "Tortosa");
        assert_eq!(markers[0].count, 1);
        assert_eq!(markers[0].longitude, 0.52);
    }

    #[test]
    fn markers_read_leading_numbers() {
        init_logs();
        let rows = vec![
            event("a", "Gandesa", "41,05°", "0,43 E"),
            event("b", "Tortosa", "40,812,3", "0,52"),
            event("c", "Tortosa", " -0,5e1x", ".5"),
        ];
        let markers = municipality_markers(&rows, &PresidentFilter::All, &DashboardOptions::default());
        assert_eq!(markers.len(), 2);
        assert_eq!((markers[0].latitude, markers[0].longitude), (41.05, 0.43));
        assert_eq!((markers[1].latitude, markers[1].longitude), (40.812, 0.52));
        assert_eq!(markers[1].count, 2);
    }

    #[test]
    fn number_prefixes() {
        assert_eq!(float_prefix("40.812,3"), "40.812");
        assert_eq!(float_prefix("5.abc"), "5");
        assert_eq!(float_prefix("1e5m"), "1e5");
        assert_eq!(float_prefix("1e+x"), "1");
        assert_eq!(float_prefix("-.25"), "-.25");
        assert_eq!(float_prefix("."), "");
        assert_eq!(float_prefix("-"), "");
        assert_eq!(float_prefix("inf"), "");
        assert_eq!(parse_coordinate("1e999"), None);
        assert_eq!(parse_coordinate(" 41,05 "), Some(41.05));
    }

    #[test]
    fn markers_filtered_by_president_and_period() {
        let rows = vec![
            with(with(event("a", "Gandesa", "40,9", "0,4"), "Presidents", "Anna"), "Període", "2010-2014"),
            with(with(event("b", "Gandesa", "40,9", "0,4"), "Presidents", "Anna"), "Període", "2014-2018"),
            with(with(event("c", "Tortosa", "40,8", "0,5"), "Presidents", "Anna "), "Període", " 2010-2014"),
            with(event("d", "Tortosa", "40,8", "0,5"), "Presidents", "Anna"),
        ];
        let options = DashboardOptions::default();
        let markers = municipality_markers(&rows, &PresidentFilter::parse("Anna|2010-2014"), &options);
        let counts: Vec<(String, u64)> = markers.iter().map(|m| (m.display_name.clone(), m.count)).collect();
        assert_eq!(counts, vec![("Gandesa".to_string(), 1), ("Tortosa".to_string(), 1)]);

        let all = municipality_markers(&rows, &PresidentFilter::All, &options);
        assert_eq!(all.iter().map(|m| m.count).sum::<u64>(), 4);

        assert!(municipality_markers(&rows, &PresidentFilter::parse("Bernat|2010-2014"), &options).is_empty());
    }

    #[test]
    fn president_only_variant() {
        let rows = vec![
            with(with(event("a", "Gandesa", "40,9", "0,4"), "Presidents", "Anna"), "Període", "2010-2014"),
            with(event("b", "Gandesa", "40,9", "0,4"), "Presidents", "Anna"),
            with(event("c", "Gandesa", "40,9", "0,4"), "Presidents", "Bernat"),
        ];
        let options = DashboardOptions {
            variant: Variant::PresidentOnly,
            ..DashboardOptions::default()
        };
        let index = president_period_index(&rows, &options);
        let keys: Vec<&str> = index.iter().map(|p| p.key.as_str()).collect();
        assert_eq!(keys, vec!["Anna", "Bernat"]);
        assert_eq!(index[0].label(), "Anna");
        let markers = municipality_markers(&rows, &PresidentFilter::parse("Anna"), &options);
        assert_eq!(markers[0].count, 2);
    }

    #[test]
    fn president_index_order_and_dedup() {
        let rows = vec![
            with(with(event("a", "", "", ""), "Presidents", "Bernat"), "Període", "2018-2022"),
            with(with(event("b", "", "", ""), "Presidents", " Anna"), "Període", "2010-2014 "),
            with(with(event("c", "", "", ""), "Presidents", "Bernat"), "Període", "2018-2022"),
            with(event("d", "", "", ""), "Presidents", "Carla"),
            with(with(event("e", "", "", ""), "Presidents", "Anna"), "Període", "2010-2014"),
        ];
        let index = president_period_index(&rows, &DashboardOptions::default());
        assert_eq!(
            index,
            vec![
                PresidentPeriod {
                    key: "Bernat|2018-2022".to_string(),
                    president: "Bernat".to_string(),
                    period: "2018-2022".to_string(),
                },
                PresidentPeriod {
                    key: "Anna|2010-2014".to_string(),
                    president: "Anna".to_string(),
                    period: "2010-2014".to_string(),
                },
            ]
        );
        assert_eq!(index[1].label(), "Anna 2010-2014");
    }

    #[test]
    fn stats() {
        let rows = vec![
            with(event("a", "Gandesa", "", ""), "Nom entitat promotora", "A, B ,B,"),
            with(event("b", "GANDESA", "", ""), "Nom entitat promotora", "C"),
            with(event("c", " ", "", ""), "Nom entitat promotora", "a"),
            event("d", "Tortosa", "", ""),
        ];
        assert_eq!(
            summary_stats(&rows, &DashboardOptions::default()),
            Stats {
                total_events: 4,
                total_municipalities: 2,
                total_promotors: 4,
            }
        );
    }

    #[test]
    fn years_split_by_role() {
        let records = vec![
            record("2019", "1", "", "Impulsor i col·laborador"),
            record("2019", "2", "", "Col·laborador"),
            record("2019", "2", "", "col.laborador"),
            record("2018", "2", "", ""),
            record("2020", "2", "", "IMPULSOR"),
        ];
        let tallies = year_totals(&records, &DashboardOptions::default());
        assert_eq!(
            tallies,
            vec![
                YearTally {
                    year: "2018".to_string(),
                    total: 1,
                    impulsor: 0,
                    collaborator: 0,
                },
                YearTally {
                    year: "2019".to_string(),
                    total: 3,
                    impulsor: 1,
                    collaborator: 2,
                },
                YearTally {
                    year: "2020".to_string(),
                    total: 1,
                    impulsor: 1,
                    collaborator: 0,
                },
            ]
        );
    }

    #[test]
    fn both_roles_count_once() {
        let records = vec![record("2019", "1", "", "Impulsor i col·laborador")];
        let t = &year_totals(&records, &DashboardOptions::default())[0];
        assert_eq!((t.total, t.impulsor, t.collaborator), (1, 1, 0));
    }

    #[test]
    fn years_without_roles() {
        let records = vec![record("2019", "1", "", "Impulsor")];
        let options = DashboardOptions {
            variant: Variant::PresidentOnly,
            ..DashboardOptions::default()
        };
        let t = &year_totals(&records, &options)[0];
        assert_eq!((t.total, t.impulsor, t.collaborator), (1, 0, 0));
    }

    #[test]
    fn months() {
        let records = vec![
            record("2019", "1", "", ""),
            record("2019", "01", "", ""),
            record("2019", "12", "", ""),
            record("2019", "13", "", ""),
            record("2019", "0", "", ""),
            record("2020", "5", "", ""),
        ];
        let all = month_totals(&records, &YearFilter::All);
        assert_eq!(all, [2, 0, 0, 0, 1, 0, 0, 0, 0, 0, 0, 1]);
        let y2019 = month_totals(&records, &YearFilter::parse("2019"));
        assert_eq!(y2019, [2, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(month_totals(&records, &YearFilter::parse("1999")), [0; 12]);
    }

    #[test]
    fn top_ten_event_types() {
        let mut records: Vec<EventRecord> = Vec::new();
        // t0 once, t1 twice ... t11 twelve times, then "late" ties with t4.
        for i in 0..12 {
            for _ in 0..=i {
                records.push(record("2019", "1", &format!("t{}", i), ""));
            }
        }
        for _ in 0..5 {
            records.push(record("2019", "1", "late", ""));
        }
        let types = event_type_totals(&records, &YearFilter::All, &DashboardOptions::default());
        assert_eq!(types.len(), 10);
        let names: Vec<&str> = types.iter().map(|t| t.event_type.as_str()).collect();
        assert_eq!(
            names,
            vec!["t11", "t10", "t9", "t8", "t7", "t6", "t5", "t4", "late", "t3"]
        );
        for w in types.windows(2) {
            assert!(w[0].count >= w[1].count);
        }
    }

    #[test]
    fn event_types_ties_and_fallback() {
        let records = vec![
            record("2019", "1", "Concert", ""),
            record("2019", "1", "  ", ""),
            record("2019", "1", "Fira", ""),
            record("2020", "1", "Fira", ""),
            record("2019", "1", "", ""),
            record("2019", "1", "Concert", ""),
        ];
        let options = DashboardOptions::default();
        let types = event_type_totals(&records, &YearFilter::parse("2019"), &options);
        assert_eq!(
            types,
            vec![
                EventTypeCount {
                    event_type: "Concert".to_string(),
                    count: 2,
                },
                EventTypeCount {
                    event_type: "Sense especificar".to_string(),
                    count: 2,
                },
                EventTypeCount {
                    event_type: "Fira".to_string(),
                    count: 1,
                },
            ]
        );
    }

    #[test]
    fn years() {
        let records = vec![
            record("2012", "1", "", ""),
            record("2009", "1", "", ""),
            record("2012", "1", "", ""),
            record("2011", "1", "", ""),
        ];
        let years = distinct_years(&records);
        assert_eq!(years, vec!["2009", "2011", "2012"]);
        assert_eq!(selectable_years(&years, Some(2011)), vec!["2011", "2012"]);
        assert_eq!(selectable_years(&years, None), years);
    }
}
