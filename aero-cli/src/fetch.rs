//! HTTP client for the remote airport endpoint.

use indicatif::{ProgressBar, ProgressStyle};
use reqwest::header::ACCEPT;
use reqwest::{Client, StatusCode};
use std::time::Duration;
use thiserror::Error;

use aero_core::wikidata::{airport_query, decode_airports, RESULTS_MEDIA_TYPE};
use aero_core::AirportRecord;

use crate::config::SourceSettings;
use crate::constants::{SPINNER_TICKS, SPINNER_TICK_MS};

/// Errors from talking to the endpoint.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Endpoint returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Endpoint is rate limiting requests; try again later or lower --limit")]
    RateLimited,

    #[error("Unexpected response body: {0}")]
    Decode(#[from] aero_core::Error),
}

/// Client for a SPARQL endpoint serving Wikidata.
pub struct WikidataClient {
    http: Client,
    endpoint: String,
}

impl WikidataClient {
    pub fn new(settings: &SourceSettings) -> Result<Self, FetchError> {
        let http = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: settings.endpoint.clone(),
        })
    }

    /// Run the airport query and decode its bindings.
    pub async fn airports(&self, limit: usize) -> Result<Vec<AirportRecord>, FetchError> {
        let query = airport_query(limit);
        tracing::debug!("Querying {} for up to {} airport rows", self.endpoint, limit);

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[("query", query.as_str())])
            .header(ACCEPT, RESULTS_MEDIA_TYPE)
            .send()
            .await?;

        let body = Self::handle_response(response).await?;
        let records = decode_airports(&body)?;
        tracing::info!("Fetched {} airport rows", records.len());
        Ok(records)
    }

    async fn handle_response(response: reqwest::Response) -> Result<String, FetchError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.text().await?);
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(FetchError::RateLimited);
        }
        let body = response.text().await.unwrap_or_default();
        Err(FetchError::Status {
            status: status.as_u16(),
            body,
        })
    }
}

/// Fetch airports with a spinner on stderr.
pub async fn fetch_airports(settings: &SourceSettings) -> anyhow::Result<Vec<AirportRecord>> {
    let client = WikidataClient::new(settings)?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .tick_chars(SPINNER_TICKS)
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Querying {}...", settings.endpoint));
    spinner.enable_steady_tick(Duration::from_millis(SPINNER_TICK_MS));

    let result = client.airports(settings.limit).await;
    spinner.finish_and_clear();
    Ok(result?)
}
