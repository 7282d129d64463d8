/*!
Aggregation core of the public events dashboard.

The published spreadsheet lists the activities of the organisation, one row
per activity. This crate turns those rows into the data drawn by the
dashboard:
- the summary counters (events, municipalities, promoter entities),
- the entries of the president filter,
- one marker per municipality with its number of events and its color category,
- the yearly, monthly and per-type event counts of the charts.

Everything here is synchronous and free of I/O. Use [`builder::DashboardState`]
to hold the loaded data, or call the functions directly.

See the [manual](manual/index.html) for the column names and the rules applied to each row.
*/

mod aggregate;
mod buckets;
mod config;
mod normalize;
mod records;

pub mod builder;
pub mod manual;

pub use crate::aggregate::*;
pub use crate::buckets::*;
pub use crate::config::*;
pub use crate::normalize::*;
pub use crate::records::*;
