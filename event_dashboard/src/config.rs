// ********* Input data structures ***********

use std::collections::HashMap;
use std::error::Error;
use std::fmt::Display;

/// One row of the published spreadsheet, keyed by the header names.
///
/// No schema is enforced: any column that the aggregation reads but that is
/// missing from the row is seen as an empty string.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct RawRow {
    fields: HashMap<String, String>,
}

impl RawRow {
    pub fn new() -> RawRow {
        RawRow {
            fields: HashMap::new(),
        }
    }

    /// Builds a row out of `(header, value)` pairs. Later duplicates of a
    /// header overwrite earlier ones.
    pub fn from_pairs<K, V, I>(pairs: I) -> RawRow
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        RawRow {
            fields: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn insert(&mut self, column: &str, value: &str) {
        self.fields.insert(column.to_string(), value.to_string());
    }

    /// The raw content of a column, or the empty string.
    pub fn get(&self, column: &str) -> &str {
        self.fields.get(column).map(|s| s.as_str()).unwrap_or("")
    }

    /// The content of a column with the surrounding whitespace removed.
    pub fn trimmed(&self, column: &str) -> &str {
        self.get(column).trim()
    }

    pub fn is_blank(&self, column: &str) -> bool {
        self.trimmed(column).is_empty()
    }
}

/// A row of the timeline dataset: an event with a valid year and month.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct EventRecord {
    /// Always 4 ascii digits.
    pub year: String,
    /// 1 or 2 ascii digits. Not guaranteed to be in 1..=12.
    pub month: String,
    pub event_type: String,
    /// Free text describing how the organisation took part in the event.
    pub cere_role: String,
}

/// The header names of the columns read by the aggregation.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ColumnNames {
    pub name: String,
    pub category: String,
    pub location: String,
    pub promoters: String,
    pub president: String,
    pub period: String,
    pub latitude: String,
    pub longitude: String,
    pub start_year: String,
    pub start_month: String,
    pub event_type: String,
    pub role: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        ColumnNames {
            name: "Nom".to_string(),
            category: "Tipus".to_string(),
            location: "Localització".to_string(),
            promoters: "Nom entitat promotora".to_string(),
            president: "Presidents".to_string(),
            period: "Període".to_string(),
            latitude: "Latitud".to_string(),
            longitude: "Longitud".to_string(),
            start_year: "Any inici".to_string(),
            start_month: "Mes inici".to_string(),
            event_type: "Tipus d'esdeveniment".to_string(),
            role: "CERE".to_string(),
        }
    }
}

// ******** Output data structures *********

/// The markers on the map: all the events that took place in one municipality.
#[derive(PartialEq, Debug, Clone)]
pub struct MunicipalityAggregate {
    pub normalized_key: String,
    /// The spelling of the first row seen for this municipality.
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub count: u64,
}

/// An entry of the president filter.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct PresidentPeriod {
    pub key: String,
    pub president: String,
    /// Empty under `Variant::PresidentOnly`.
    pub period: String,
}

impl PresidentPeriod {
    /// The text displayed in the selector.
    pub fn label(&self) -> String {
        if self.period.is_empty() {
            self.president.clone()
        } else {
            format!("{} {}", self.president, self.period)
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Copy, Default)]
pub struct Stats {
    pub total_events: u64,
    pub total_municipalities: u64,
    pub total_promotors: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct YearTally {
    pub year: String,
    pub total: u64,
    pub impulsor: u64,
    pub collaborator: u64,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct EventTypeCount {
    pub event_type: String,
    pub count: u64,
}

/// A range of event counts and the way it is displayed on the map.
#[derive(PartialEq, Debug, Clone, Copy)]
pub struct CategoryBucket {
    pub min: u64,
    /// `None` for the last, unbounded bucket.
    pub max: Option<u64>,
    pub color: &'static str,
    pub label: &'static str,
}

/// Errors that prevent a selection from being applied to the dashboard.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum DashboardErrors {
    /// Nothing was loaded for the requested view.
    EmptyDataset,
    UnknownPresidentPeriod(String),
    UnknownYear(String),
}

impl Error for DashboardErrors {}

impl Display for DashboardErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardErrors::EmptyDataset => write!(f, "no data loaded in the dashboard"),
            DashboardErrors::UnknownPresidentPeriod(k) => {
                write!(f, "unknown president filter {:?}", k)
            }
            DashboardErrors::UnknownYear(y) => write!(f, "unknown year {:?}", y),
        }
    }
}

// ********* Configuration **********

/// The literal used by the selectors to mean "no filter".
pub const ALL_PRESIDENTS: &str = "Tots";
pub const ALL_PRESIDENTS_LABEL: &str = "Tots els presidents";
pub const ALL_YEARS: &str = "all";

/// The two flavours of the dashboard.
///
/// - `PresidentPeriod` keys the president filter by `president|period` and splits
/// the yearly counts by the role of the organisation.
/// - `PresidentOnly` keys the president filter by the president alone and only
/// reports yearly totals.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Variant {
    PresidentPeriod,
    PresidentOnly,
}

/// Which rows are kept on the map.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum PresidentFilter {
    All,
    Key(String),
}

impl PresidentFilter {
    /// `Tots` (or an empty string) selects every row.
    pub fn parse(s: &str) -> PresidentFilter {
        match s.trim() {
            "" | ALL_PRESIDENTS => PresidentFilter::All,
            x => PresidentFilter::Key(x.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            PresidentFilter::All => ALL_PRESIDENTS,
            PresidentFilter::Key(k) => k.as_str(),
        }
    }
}

/// Which rows are used by the monthly and event type charts.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum YearFilter {
    All,
    Year(String),
}

impl YearFilter {
    /// `all` (or an empty string) selects every year.
    pub fn parse(s: &str) -> YearFilter {
        match s.trim() {
            "" | ALL_YEARS => YearFilter::All,
            x => YearFilter::Year(x.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            YearFilter::All => ALL_YEARS,
            YearFilter::Year(y) => y.as_str(),
        }
    }

    pub fn accepts(&self, year: &str) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(y) => y == year,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct DashboardOptions {
    pub variant: Variant,
    pub columns: ColumnNames,
    /// The value of the category column for the rows that are events.
    pub event_category: String,
    /// The event type reported when the type column is blank.
    pub unspecified_type_label: String,
    /// Years before this one are not offered in the year selectors.
    pub min_selectable_year: Option<u32>,
    pub top_event_types: usize,
}

impl DashboardOptions {
    pub fn default_options() -> DashboardOptions {
        DashboardOptions {
            variant: Variant::PresidentPeriod,
            columns: ColumnNames::default(),
            event_category: "Esdeveniments".to_string(),
            unspecified_type_label: "Sense especificar".to_string(),
            min_selectable_year: Some(2011),
            top_event_types: 10,
        }
    }
}

impl Default for DashboardOptions {
    fn default() -> Self {
        DashboardOptions::default_options()
    }
}
