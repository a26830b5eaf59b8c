use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::ArtifactStore;
use crate::api::RemoteSource;
use crate::error::{DecodeError, FetchError};
use crate::models::{decode_all, Contest, Participation, RawParticipation};

/// Default freshness window for cached datasets.
/// Contest results change slowly enough that 20 minutes spares the API without hiding updates for long.
pub const DEFAULT_FRESHNESS_MINUTES: i64 = 20;

/// Artifact key for the contest list
const CONTESTS_KEY: &str = "contests";

struct Loaded<T> {
    items: Vec<T>,
    /// The response body, present only when the items came from the remote source
    body: Option<String>,
}

/// Serves contest data from the artifact store while it is fresh, otherwise from the API.
pub struct CachedFetcher<R, S> {
    remote: R,
    store: S,
}

impl<R: RemoteSource, S: ArtifactStore> CachedFetcher<R, S> {
    pub fn new(remote: R, store: S) -> Self {
        Self { remote, store }
    }

    pub fn remote(&self) -> &R {
        &self.remote
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Artifact key for a dataset. Anything that is not safe in a file name becomes `_`.
    pub fn artifact_key(dataset_id: &str) -> String {
        let id: String = dataset_id
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("contest_{}", id)
    }

    /// Load and decode the participations of one contest.
    pub async fn load(
        &self,
        dataset_id: &str,
        freshness: Duration,
    ) -> Result<Vec<Participation>, FetchError> {
        self.load_at(dataset_id, freshness, Utc::now()).await
    }

    /// `load` with an explicit notion of "now".
    pub async fn load_at(
        &self,
        dataset_id: &str,
        freshness: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<Participation>, FetchError> {
        let key = Self::artifact_key(dataset_id);
        let loaded: Loaded<RawParticipation> = self
            .load_raw(&key, freshness, now, self.remote.fetch_participations(dataset_id))
            .await?;

        let participations =
            decode_all(&loaded.items).map_err(|e| FetchError::malformed(&key, e))?;

        if let Some(body) = &loaded.body {
            self.persist(&key, body);
        }

        info!(
            dataset = dataset_id,
            participants = participations.len(),
            "Loaded contest participations"
        );
        Ok(participations)
    }

    /// Load the contest list, most recently ended contest first.
    pub async fn load_contests(&self, freshness: Duration) -> Result<Vec<Contest>, FetchError> {
        self.load_contests_at(freshness, Utc::now()).await
    }

    pub async fn load_contests_at(
        &self,
        freshness: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<Contest>, FetchError> {
        let loaded: Loaded<Contest> = self
            .load_raw(CONTESTS_KEY, freshness, now, self.remote.fetch_contests())
            .await?;

        if let Some(body) = &loaded.body {
            self.persist(CONTESTS_KEY, body);
        }

        let mut contests = loaded.items;
        Contest::sort_newest_first(&mut contests);
        Ok(contests)
    }

    /// Cached items if fresh, otherwise the parsed result of `fetch`.
    /// `fetch` is only awaited on the stale path.
    async fn load_raw<T, F>(
        &self,
        key: &str,
        freshness: Duration,
        now: DateTime<Utc>,
        fetch: F,
    ) -> Result<Loaded<T>, FetchError>
    where
        T: DeserializeOwned,
        F: Future<Output = Result<String, FetchError>>,
    {
        if let Some(items) = self.read_fresh(key, freshness, now) {
            return Ok(Loaded { items, body: None });
        }

        info!(key = key, "Reading data from remote source");
        let body = fetch.await?;
        let items: Vec<T> = serde_json::from_str(&body)
            .map_err(|e| FetchError::malformed(key, DecodeError::Payload(e)))?;

        if items.is_empty() {
            return Err(FetchError::NoData(key.to_string()));
        }

        Ok(Loaded {
            items,
            body: Some(body),
        })
    }

    /// Items from the artifact under `key`, or `None` if the cache cannot be used.
    fn read_fresh<T: DeserializeOwned>(
        &self,
        key: &str,
        freshness: Duration,
        now: DateTime<Utc>,
    ) -> Option<Vec<T>> {
        if freshness <= Duration::zero() {
            debug!(key = key, "Zero freshness window, skipping cache");
            return None;
        }

        let artifact = match self.store.read(key) {
            Ok(Some(artifact)) => artifact,
            Ok(None) => {
                debug!(key = key, "No cache artifact");
                return None;
            }
            Err(e) => {
                warn!(key = key, error = %e, "Failed to read cache artifact");
                return None;
            }
        };

        // Negative age means clock skew; the artifact is treated as just written
        let age = now - artifact.modified;
        if age >= freshness {
            debug!(key = key, age_secs = age.num_seconds(), "Cache artifact is stale");
            return None;
        }

        match serde_json::from_str::<Vec<T>>(&artifact.contents) {
            Ok(items) if items.is_empty() => {
                debug!(key = key, "Cache artifact is empty");
                None
            }
            Ok(items) => {
                info!(key = key, items = items.len(), "Reading data from cache");
                Some(items)
            }
            Err(e) => {
                warn!(key = key, error = %e, "Failed to parse cache artifact");
                None
            }
        }
    }

    /// Write a fetched body to the store unchanged. Failure only costs a refetch next time.
    fn persist(&self, key: &str, body: &str) {
        match self.store.write(key, body) {
            Ok(()) => info!(key = key, "Data saved to cache"),
            Err(e) => warn!(key = key, error = %e, "Failed to save cache artifact"),
        }
    }
}
