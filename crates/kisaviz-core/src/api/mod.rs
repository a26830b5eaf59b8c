//! REST API client module for the contest service.
//!
//! `ContestClient` talks to the public contest API. The cached fetcher only
//! depends on the `RemoteSource` trait so tests can substitute a fake.

pub mod client;

use std::future::Future;

use crate::error::FetchError;

pub use client::ContestClient;

/// Something that can produce raw JSON bodies for contest datasets.
pub trait RemoteSource {
    /// Body of `contest_participations/{id}`
    fn fetch_participations(
        &self,
        dataset_id: &str,
    ) -> impl Future<Output = Result<String, FetchError>> + Send;

    /// Body of the contest list
    fn fetch_contests(&self) -> impl Future<Output = Result<String, FetchError>> + Send;
}
