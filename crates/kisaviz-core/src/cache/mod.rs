//! Local caching for contest data.
//!
//! `CachedFetcher` serves a dataset from a local artifact while it is fresh
//! and otherwise refetches it from the API and rewrites the artifact.
//! Artifacts hold exactly the JSON array the API returned; freshness is
//! judged by the artifact's modification time, not its content.

pub mod fetcher;
pub mod store;

pub use fetcher::{CachedFetcher, DEFAULT_FRESHNESS_MINUTES};
pub use store::{Artifact, ArtifactStore, FsArtifactStore, MemoryArtifactStore};
