//! Blocking HTTP fetch for [`super::DataSource::Url`] (feature `remote`).

use std::time::Duration;

use tracing::debug;

use crate::error::IngestionResult;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetch `url` and return the response body as text. Non-2xx statuses are errors.
pub fn fetch_text(url: &str) -> IngestionResult<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;

    let response = client.get(url).send()?.error_for_status()?;
    debug!(url, status = %response.status(), "fetched remote source");
    Ok(response.text()?)
}
