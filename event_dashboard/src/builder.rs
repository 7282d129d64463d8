pub use crate::config::*;

use log::info;

use crate::aggregate::*;
use crate::records::{extract_event_records, filter_events};

/// The data behind one dashboard.
///
/// The map rows and the timeline records are loaded separately, usually from
/// two fetches of the spreadsheet, and never share a container. Every query
/// recomputes its result from the loaded data.
///
/// ```
/// use event_dashboard::builder::DashboardState;
/// use event_dashboard::{DashboardErrors, DashboardOptions, RawRow, ALL_PRESIDENTS};
///
/// let row = RawRow::from_pairs([
///     ("Nom", "Fira del Mel"),
///     ("Tipus", "Esdeveniments"),
///     ("Localització", "Gandesa"),
///     ("Latitud", "41,05"),
///     ("Longitud", "0,43"),
///     ("Any inici", "2019"),
///     ("Mes inici", "10"),
/// ]);
///
/// let mut state = DashboardState::new(&DashboardOptions::default());
/// state.load_map_rows(&[row.clone()]);
/// state.load_timeline_rows(&[row]);
///
/// let filter = state.select_president(ALL_PRESIDENTS)?;
/// let markers = state.markers(&filter)?;
/// assert_eq!(markers[0].count, 1);
/// assert_eq!(state.years(), &["2019".to_string()]);
///
/// # Ok::<(), DashboardErrors>(())
/// ```
#[derive(Debug, Clone)]
pub struct DashboardState {
    options: DashboardOptions,
    map_rows: Option<Vec<RawRow>>,
    stats: Stats,
    president_index: Vec<PresidentPeriod>,
    records: Option<Vec<EventRecord>>,
    years: Vec<String>,
}

impl DashboardState {
    pub fn new(options: &DashboardOptions) -> DashboardState {
        DashboardState {
            options: options.clone(),
            map_rows: None,
            stats: Stats::default(),
            president_index: Vec::new(),
            records: None,
            years: Vec::new(),
        }
    }

    pub fn options(&self) -> &DashboardOptions {
        &self.options
    }

    /// Drops all the loaded data.
    pub fn reset(&mut self) {
        *self = DashboardState::new(&self.options);
    }

    /// Replaces the rows of the map. The statistics and the president filter
    /// entries are recomputed.
    pub fn load_map_rows(&mut self, rows: &[RawRow]) {
        let events = filter_events(rows, &self.options);
        self.stats = summary_stats(&events, &self.options);
        self.president_index = president_period_index(&events, &self.options);
        info!(
            "load_map_rows: {:?} events, {:?} municipalities, {:?} promotors, {:?} president entries",
            self.stats.total_events,
            self.stats.total_municipalities,
            self.stats.total_promotors,
            self.president_index.len()
        );
        self.map_rows = Some(events);
    }

    /// Replaces the records of the charts.
    pub fn load_timeline_rows(&mut self, rows: &[RawRow]) {
        let records = extract_event_records(rows, &self.options);
        self.years = distinct_years(&records);
        info!(
            "load_timeline_rows: {:?} records over {:?} years",
            records.len(),
            self.years.len()
        );
        self.records = Some(records);
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn president_index(&self) -> &[PresidentPeriod] {
        &self.president_index
    }

    pub fn years(&self) -> &[String] {
        &self.years
    }

    pub fn selectable_years(&self) -> Vec<String> {
        selectable_years(&self.years, self.options.min_selectable_year)
    }

    /// Checks a value of the president selector against the loaded entries.
    pub fn select_president(&self, value: &str) -> Result<PresidentFilter, DashboardErrors> {
        match PresidentFilter::parse(value) {
            PresidentFilter::All => Ok(PresidentFilter::All),
            PresidentFilter::Key(k) if self.president_index.iter().any(|p| p.key == k) => {
                Ok(PresidentFilter::Key(k))
            }
            PresidentFilter::Key(k) => Err(DashboardErrors::UnknownPresidentPeriod(k)),
        }
    }

    /// Checks a value of the year selector against the years it offers.
    pub fn select_year(&self, value: &str) -> Result<YearFilter, DashboardErrors> {
        match YearFilter::parse(value) {
            YearFilter::All => Ok(YearFilter::All),
            YearFilter::Year(y) if self.selectable_years().contains(&y) => Ok(YearFilter::Year(y)),
            YearFilter::Year(y) => Err(DashboardErrors::UnknownYear(y)),
        }
    }

    pub fn markers(
        &self,
        filter: &PresidentFilter,
    ) -> Result<Vec<MunicipalityAggregate>, DashboardErrors> {
        let rows = self.map_rows.as_deref().ok_or(DashboardErrors::EmptyDataset)?;
        Ok(municipality_markers(rows, filter, &self.options))
    }

    /// One tally per year of `years()`, in the same order.
    pub fn year_totals(&self) -> Result<Vec<YearTally>, DashboardErrors> {
        Ok(year_totals(self.timeline()?, &self.options))
    }

    pub fn month_totals(&self, year: &YearFilter) -> Result<[u64; 12], DashboardErrors> {
        Ok(month_totals(self.timeline()?, year))
    }

    pub fn event_types(&self, year: &YearFilter) -> Result<Vec<EventTypeCount>, DashboardErrors> {
        Ok(event_type_totals(self.timeline()?, year, &self.options))
    }

    fn timeline(&self) -> Result<&[EventRecord], DashboardErrors> {
        self.records.as_deref().ok_or(DashboardErrors::EmptyDataset)
    }
}
