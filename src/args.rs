use clap::Parser;

/// Tabulates the spreadsheet of public events into the data of the events dashboard.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The JSON file describing the dashboard: sources, rules and column names.
    /// See the manual of the event_dashboard crate for the format.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing a dashboard summary in JSON format. If provided, ebre_events will
    /// check that the produced summary matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the dashboard will be written in JSON format to the given
    /// location. Setting this option overrides the file that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (URL or file path) The spreadsheet of events used for the map and the counters.
    /// Setting this option overrides the map source of the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (URL or file path, default: the --input source) The spreadsheet of events used for the charts.
    #[clap(long, value_parser)]
    pub timeline_input: Option<String>,

    /// (default csv) The type of the inputs: csv or xlsx. Applies to every source, including the ones of the --config option.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (default: the first worksheet) When using an Excel file, indicates the name of the worksheet to use.
    /// Applies to every source, including the ones of the --config option.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (presidentPeriod or presidentOnly) How the president filter is keyed.
    #[clap(long, value_parser)]
    pub variant: Option<String>,

    /// (default Tots) The entry of the president filter used for the map, as 'president|period'.
    #[clap(short, long, value_parser)]
    pub filter: Option<String>,

    /// (default all) The year used for the monthly and event type charts.
    #[clap(short, long, value_parser)]
    pub year: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
