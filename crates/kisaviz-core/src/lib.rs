//! kisaviz core - fetch, cache and aggregate bird contest tick lists.
//!
//! Typical use: build a `CachedFetcher` over a `ContestClient` and a
//! `FsArtifactStore`, load a contest's participations into a
//! `ContestSnapshot`, then query it or turn it into `ChartData`.

pub mod api;
pub mod cache;
pub mod chart;
pub mod config;
pub mod error;
pub mod models;
pub mod ticks;

pub use api::{ContestClient, RemoteSource};
pub use cache::{ArtifactStore, CachedFetcher, FsArtifactStore, MemoryArtifactStore};
pub use chart::ChartData;
pub use config::{freshness_minutes, Config};
pub use error::{AggregateError, DecodeError, FetchError};
pub use models::{Contest, Participation, RawParticipation, TickList};
pub use ticks::{ContestSnapshot, DailyWinner};
