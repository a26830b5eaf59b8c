//! HTTP client for the contest API.
//!
//! One GET per call, no retries. Non-2xx responses and transport failures
//! both surface as `FetchError::NotFound`.

use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client};
use tracing::debug;

use super::RemoteSource;
use crate::error::FetchError;

/// Public API of the tringa.fi bird contest service
pub const DEFAULT_API_URL: &str = "http://www.tringa.fi/kisa/index.php/api/";

/// API client for the contest service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ContestClient {
    client: Client,
    base_url: String,
}

impl ContestClient {
    /// Create a new client. `timeout` of `None` leaves requests unbounded.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: Self::normalize_base(base_url),
        })
    }

    fn normalize_base(base_url: &str) -> String {
        if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{}/", base_url)
        }
    }

    pub fn contest_list_url(&self) -> String {
        format!("{}contests/", self.base_url)
    }

    pub fn participations_url(&self, dataset_id: &str) -> String {
        format!("{}contest_participations/{}", self.base_url, dataset_id)
    }

    async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        debug!(url = url, "Requesting");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| FetchError::unreachable(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::from_status(url, status, &body));
        }

        response
            .text()
            .await
            .map_err(|e| FetchError::unreachable(url, &e))
    }
}

impl RemoteSource for ContestClient {
    async fn fetch_participations(&self, dataset_id: &str) -> Result<String, FetchError> {
        self.get_text(&self.participations_url(dataset_id)).await
    }

    async fn fetch_contests(&self) -> Result<String, FetchError> {
        self.get_text(&self.contest_list_url()).await
    }
}
