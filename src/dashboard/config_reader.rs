use crate::dashboard::*;

use log::debug;
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "dashboardName")]
    pub dashboard_name: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Provider {
    Csv,
    Xlsx,
}

/// Where the spreadsheet is read from.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum SourceLocation {
    Url(String),
    Path(String),
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileSource {
    /// csv (default) or xlsx
    pub provider: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: Option<String>,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
}

impl FileSource {
    /// A source given on the command line: either a URL or a file path.
    pub fn from_location(
        location: &str,
        provider: Option<String>,
        excel_worksheet_name: Option<String>,
    ) -> FileSource {
        let (url, file_path) = if is_url(location) {
            (Some(location.to_string()), None)
        } else {
            (None, Some(location.to_string()))
        };
        FileSource {
            provider,
            url,
            file_path,
            excel_worksheet_name,
        }
    }

    pub fn provider(&self) -> DashResult<Provider> {
        match self.provider.as_deref() {
            None | Some("csv") => Ok(Provider::Csv),
            Some("xlsx") => Ok(Provider::Xlsx),
            Some(x) => whatever!("unknown provider: {}", x),
        }
    }

    /// Resolves the source. Relative paths are taken from `root`, the
    /// directory of the configuration file.
    pub fn location(&self, root: Option<&Path>) -> DashResult<SourceLocation> {
        match (&self.url, &self.file_path) {
            (Some(url), None) => Ok(SourceLocation::Url(url.clone())),
            (None, Some(p)) => Ok(SourceLocation::Path(resolve_path(root, p))),
            (Some(_), Some(_)) => whatever!("a source cannot have both a url and a filePath"),
            (None, None) => MissingSourceSnafu {}.fail(),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardRules {
    pub variant: Option<String>,
    #[serde(rename = "eventCategory")]
    pub event_category: Option<String>,
    #[serde(rename = "unspecifiedTypeLabel")]
    pub unspecified_type_label: Option<String>,
    #[serde(rename = "minSelectableYear")]
    pub min_selectable_year: Option<u32>,
    #[serde(rename = "topEventTypes")]
    pub top_event_types: Option<usize>,
}

impl DashboardRules {
    pub fn variant(&self) -> DashResult<Variant> {
        match self.variant.as_deref() {
            None | Some("presidentPeriod") => Ok(Variant::PresidentPeriod),
            Some("presidentOnly") => Ok(Variant::PresidentOnly),
            Some(x) => whatever!("unknown dashboard variant: {}", x),
        }
    }
}

/// Overrides of the column names of the spreadsheet.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct ColumnsConfig {
    pub name: Option<String>,
    pub category: Option<String>,
    pub location: Option<String>,
    pub promoters: Option<String>,
    pub president: Option<String>,
    pub period: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    #[serde(rename = "startYear")]
    pub start_year: Option<String>,
    #[serde(rename = "startMonth")]
    pub start_month: Option<String>,
    #[serde(rename = "eventType")]
    pub event_type: Option<String>,
    pub role: Option<String>,
}

impl ColumnsConfig {
    pub fn column_names(&self) -> ColumnNames {
        let d = ColumnNames::default();
        let pick = |o: &Option<String>, default: String| o.clone().unwrap_or(default);
        ColumnNames {
            name: pick(&self.name, d.name),
            category: pick(&self.category, d.category),
            location: pick(&self.location, d.location),
            promoters: pick(&self.promoters, d.promoters),
            president: pick(&self.president, d.president),
            period: pick(&self.period, d.period),
            latitude: pick(&self.latitude, d.latitude),
            longitude: pick(&self.longitude, d.longitude),
            start_year: pick(&self.start_year, d.start_year),
            start_month: pick(&self.start_month, d.start_month),
            event_type: pick(&self.event_type, d.event_type),
            role: pick(&self.role, d.role),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "mapSource")]
    pub map_source: Option<FileSource>,
    #[serde(rename = "timelineSource")]
    pub timeline_source: Option<FileSource>,
    #[serde(default)]
    pub rules: DashboardRules,
    #[serde(default)]
    pub columns: ColumnsConfig,
}

impl DashboardConfig {
    pub fn options(&self) -> DashResult<DashboardOptions> {
        let d = DashboardOptions::default();
        Ok(DashboardOptions {
            variant: self.rules.variant()?,
            columns: self.columns.column_names(),
            event_category: self.rules.event_category.clone().unwrap_or(d.event_category),
            unspecified_type_label: self
                .rules
                .unspecified_type_label
                .clone()
                .unwrap_or(d.unspecified_type_label),
            min_selectable_year: self.rules.min_selectable_year.or(d.min_selectable_year),
            top_event_types: self.rules.top_event_types.unwrap_or(d.top_event_types),
        })
    }

    pub fn dashboard_name(&self) -> String {
        self.output_settings
            .dashboard_name
            .clone()
            .unwrap_or_else(|| "Esdeveniments".to_string())
    }
}

pub fn read_config(path: &str) -> DashResult<DashboardConfig> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    debug!("read_config: {:?}", contents);
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> DashResult<DashboardConfig> {
    serde_json::from_str(contents).context(ParsingJsonSnafu {})
}

pub fn read_summary(path: &str) -> DashResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningFileSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}
