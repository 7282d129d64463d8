use log::{debug, info, warn};

use event_dashboard::builder::DashboardState;
use event_dashboard::*;
use snafu::prelude::*;

use serde_json::json;
use serde_json::Value as JSValue;
use std::fs;
use std::path::Path;
use text_diff::print_diff;

use crate::args::Args;

pub mod config_reader;
pub mod io_common;
pub mod io_csv;
pub mod io_http;
pub mod io_xlsx;

use crate::dashboard::config_reader::*;
use crate::dashboard::io_common::{is_url, resolve_path, simplify_location};

#[derive(Debug, Snafu)]
pub enum DashboardError {
    #[snafu(display("Error opening file {path}"))]
    OpeningFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of the CSV data"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("Error opening Excel file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("Excel file {path} has no worksheet {sheet}"))]
    MissingWorksheet { path: String, sheet: String },
    #[snafu(display("Error creating the HTTP client"))]
    HttpClient { source: reqwest::Error },
    #[snafu(display("Error fetching {url}"))]
    Fetching { source: reqwest::Error, url: String },
    #[snafu(display("Fetching {url} returned HTTP status {status}"))]
    HttpStatus { url: String, status: u16 },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Invalid selection"))]
    Selection { source: DashboardErrors },
    #[snafu(display("No source of events: use --input or a mapSource in the configuration"))]
    MissingSource {},
    #[snafu(display("Difference detected between the dashboard summary and the reference summary"))]
    ReferenceMismatch {},

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type DashResult<T> = Result<T, DashboardError>;
pub type BDashResult<T> = Result<T, Box<DashboardError>>;

fn variant_name(variant: Variant) -> &'static str {
    match variant {
        Variant::PresidentPeriod => "presidentPeriod",
        Variant::PresidentOnly => "presidentOnly",
    }
}

fn stats_to_json(stats: &Stats) -> JSValue {
    json!({
        "totalEvents": stats.total_events,
        "totalMunicipalities": stats.total_municipalities,
        "totalPromotors": stats.total_promotors,
    })
}

fn filter_options_to_json(index: &[PresidentPeriod]) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = vec![json!({
        "key": ALL_PRESIDENTS,
        "label": ALL_PRESIDENTS_LABEL,
        "president": JSValue::Null,
        "period": JSValue::Null,
    })];
    for p in index.iter() {
        l.push(json!({
            "key": p.key,
            "label": p.label(),
            "president": p.president,
            "period": p.period,
        }));
    }
    l
}

fn markers_to_json(markers: &[MunicipalityAggregate]) -> Vec<JSValue> {
    markers
        .iter()
        .map(|m| {
            let category = bucket_for(m.count);
            json!({
                "key": m.normalized_key,
                "name": m.display_name,
                "latitude": m.latitude,
                "longitude": m.longitude,
                "count": m.count,
                "category": category.label,
                "color": category.color,
            })
        })
        .collect()
}

fn legend_to_json() -> JSValue {
    let categories: Vec<JSValue> = CATEGORY_BUCKETS
        .iter()
        .map(|b| json!({"min": b.min, "max": b.max, "color": b.color, "label": b.label}))
        .collect();
    json!({"title": LEGEND_TITLE, "categories": categories})
}

fn year_totals_to_json(tallies: &[YearTally]) -> Vec<JSValue> {
    tallies
        .iter()
        .map(|t| {
            json!({
                "year": t.year,
                "total": t.total,
                "impulsor": t.impulsor,
                "collaborator": t.collaborator,
            })
        })
        .collect()
}

fn event_types_to_json(types: &[EventTypeCount]) -> Vec<JSValue> {
    types
        .iter()
        .map(|t| json!({"eventType": t.event_type, "count": t.count}))
        .collect()
}

/// Assembles everything the presentation needs for one selection of the filters.
pub fn build_summary_js(
    config: &DashboardConfig,
    state: &DashboardState,
    filter: &PresidentFilter,
    year: &YearFilter,
) -> DashResult<JSValue> {
    let markers = state.markers(filter).context(SelectionSnafu {})?;
    let year_totals = state.year_totals().context(SelectionSnafu {})?;
    let months = state.month_totals(year).context(SelectionSnafu {})?;
    let types = state.event_types(year).context(SelectionSnafu {})?;

    Ok(json!({
        "config": {
            "dashboard": config.dashboard_name(),
            "variant": variant_name(state.options().variant),
            "filter": filter.as_str(),
            "year": year.as_str(),
        },
        "stats": stats_to_json(&state.stats()),
        "filterOptions": filter_options_to_json(state.president_index()),
        "markers": markers_to_json(&markers),
        "legend": legend_to_json(),
        "years": state.years(),
        "selectableYears": state.selectable_years(),
        "yearTotals": year_totals_to_json(&year_totals),
        "monthTotals": {
            "year": year.as_str(),
            "labels": MONTH_LABELS,
            "counts": months,
        },
        "eventTypes": {
            "year": year.as_str(),
            "types": event_types_to_json(&types),
        },
    }))
}

fn read_source(
    source: &FileSource,
    root: Option<&Path>,
    client: &reqwest::blocking::Client,
) -> BDashResult<Vec<RawRow>> {
    let provider = source.provider()?;
    let worksheet = source.excel_worksheet_name.as_deref();
    match source.location(root)? {
        SourceLocation::Url(url) => {
            let bytes = io_http::fetch_bytes(client, &url)?;
            match provider {
                Provider::Csv => io_csv::read_csv_bytes(&bytes, &url),
                Provider::Xlsx => io_xlsx::read_xlsx_bytes(bytes, &url, worksheet),
            }
        }
        SourceLocation::Path(p) => {
            info!("Attempting to read events file {:?}", p);
            match provider {
                Provider::Csv => io_csv::read_csv_file(&p),
                Provider::Xlsx => io_xlsx::read_xlsx_file(&p, worksheet),
            }
        }
    }
}

/// Applies the command line options on top of the configuration file.
fn merge_args(mut config: DashboardConfig, args: &Args) -> DashboardConfig {
    if let Some(input) = &args.input {
        config.map_source = Some(FileSource::from_location(
            input,
            args.input_type.clone(),
            args.excel_worksheet_name.clone(),
        ));
    }
    if let Some(input) = &args.timeline_input {
        config.timeline_source = Some(FileSource::from_location(
            input,
            args.input_type.clone(),
            args.excel_worksheet_name.clone(),
        ));
    }
    // The input type and the worksheet also qualify the sources of the configuration file.
    for source in [&mut config.map_source, &mut config.timeline_source]
        .into_iter()
        .flatten()
    {
        if args.input_type.is_some() {
            source.provider = args.input_type.clone();
        }
        if args.excel_worksheet_name.is_some() {
            source.excel_worksheet_name = args.excel_worksheet_name.clone();
        }
    }
    if args.variant.is_some() {
        config.rules.variant = args.variant.clone();
    }
    if args.out.is_some() {
        config.output_settings.output_file = args.out.clone();
    }
    config
}

fn write_summary(pretty_js: &str, out: Option<&str>, root: Option<&Path>) -> DashResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", pretty_js);
            Ok(())
        }
        Some(p) => {
            let path = resolve_path(root, p);
            info!("Writing the summary to {:?}", path);
            fs::write(&path, pretty_js).context(WritingOutputSnafu { path })
        }
    }
}

/// Compares the summary with a reference one, printing the differences.
pub fn check_reference(reference: &JSValue, summary: &JSValue) -> DashResult<()> {
    let pretty_ref = serde_json::to_string_pretty(reference).context(ParsingJsonSnafu {})?;
    let pretty_summary = serde_json::to_string_pretty(summary).context(ParsingJsonSnafu {})?;
    if pretty_ref != pretty_summary {
        warn!("Found differences with the reference summary");
        print_diff(pretty_ref.as_str(), pretty_summary.as_str(), "\n");
        return ReferenceMismatchSnafu {}.fail();
    }
    Ok(())
}

pub fn run_dashboard(args: &Args) -> BDashResult<()> {
    let (file_config, root) = match &args.config {
        Some(config_path) => {
            let config = read_config(config_path)?;
            let root = Path::new(config_path.as_str())
                .parent()
                .map(|p| p.to_path_buf());
            (config, root)
        }
        None => (DashboardConfig::default(), None),
    };
    // Sources given on the command line are relative to the working directory.
    let config = merge_args(file_config, args);
    info!("config: {:?}", config);
    let options = config.options()?;

    let map_source = config.map_source.clone().context(MissingSourceSnafu {})?;
    let map_root = if args.input.is_some() { None } else { root.as_deref() };
    let client = io_http::http_client()?;
    let map_rows = read_source(&map_source, map_root, &client)?;

    let mut state = DashboardState::new(&options);
    state.load_map_rows(&map_rows);

    // Without a timeline source, the charts use the same download as the map.
    match &config.timeline_source {
        Some(timeline_source) => {
            let timeline_root = if args.timeline_input.is_some() {
                None
            } else {
                root.as_deref()
            };
            let timeline_rows = read_source(timeline_source, timeline_root, &client)?;
            state.load_timeline_rows(&timeline_rows);
        }
        None => {
            debug!(
                "run_dashboard: reusing {} for the charts",
                simplify_location(
                    map_source
                        .url
                        .as_deref()
                        .or(map_source.file_path.as_deref())
                        .unwrap_or("")
                )
            );
            state.load_timeline_rows(&map_rows);
        }
    }

    let filter = state
        .select_president(args.filter.as_deref().unwrap_or(ALL_PRESIDENTS))
        .context(SelectionSnafu {})?;
    let year = state
        .select_year(args.year.as_deref().unwrap_or(ALL_YEARS))
        .context(SelectionSnafu {})?;

    let summary_js = build_summary_js(&config, &state, &filter, &year)?;
    let pretty_js = serde_json::to_string_pretty(&summary_js).context(ParsingJsonSnafu {})?;

    let out_root = if args.out.is_some() { None } else { root.as_deref() };
    write_summary(
        &pretty_js,
        config.output_settings.output_file.as_deref(),
        out_root,
    )?;

    // The reference summary, if provided for comparison
    if let Some(reference_path) = &args.reference {
        let reference = read_summary(reference_path)?;
        check_reference(&reference, &summary_js)?;
        info!("The summary matches the reference {:?}", reference_path);
    }

    Ok(())
}
