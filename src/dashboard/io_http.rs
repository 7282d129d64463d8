// Downloads of the published spreadsheet.

use log::{debug, info};
use snafu::prelude::*;

use crate::dashboard::*;

pub fn http_client() -> BDashResult<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(concat!("ebre_events/", env!("CARGO_PKG_VERSION")))
        .build()
        .context(HttpClientSnafu {})?;
    Ok(client)
}

/// Fetches the full body of `url`. There is no retry: a failed download or a
/// non-success status is returned as an error.
pub fn fetch_bytes(client: &reqwest::blocking::Client, url: &str) -> BDashResult<Vec<u8>> {
    info!("Fetching {:?}", url);
    let response = client.get(url).send().context(FetchingSnafu { url })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Box::new(DashboardError::HttpStatus {
            url: url.to_string(),
            status: status.as_u16(),
        }));
    }

    let bytes = response.bytes().context(FetchingSnafu { url })?;
    debug!("fetch_bytes: {:?}: {} bytes", url, bytes.len());
    Ok(bytes.to_vec())
}
