use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Stored artifact contents plus the time storage says it was last written.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub contents: String,
    pub modified: DateTime<Utc>,
}

/// Keyed storage for cache artifacts.
pub trait ArtifactStore {
    /// `Ok(None)` if nothing is stored under `key`.
    fn read(&self, key: &str) -> io::Result<Option<Artifact>>;

    /// Replace the artifact under `key`. Readers see either the old or the new contents.
    fn write(&self, key: &str, contents: &str) -> io::Result<()>;
}

/// One `<key>.json` file per artifact in a cache directory.
pub struct FsArtifactStore {
    cache_dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory: {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    pub fn artifact_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }

    fn temp_path(&self, key: &str) -> PathBuf {
        self.cache_dir
            .join(format!(".{}.{}.tmp", key, std::process::id()))
    }
}

impl ArtifactStore for FsArtifactStore {
    fn read(&self, key: &str) -> io::Result<Option<Artifact>> {
        let path = self.artifact_path(key);
        let metadata = match fs::metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e),
        };

        let modified = DateTime::<Utc>::from(metadata.modified()?);
        let contents = fs::read_to_string(&path)?;
        Ok(Some(Artifact { contents, modified }))
    }

    fn write(&self, key: &str, contents: &str) -> io::Result<()> {
        let path = self.artifact_path(key);
        let tmp = self.temp_path(key);

        let written = fs::File::create(&tmp).and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        });
        if let Err(e) = written.and_then(|_| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(e);
        }

        debug!(path = %path.display(), bytes = contents.len(), "Artifact written");
        Ok(())
    }
}

/// In-memory store with caller-controlled timestamps.
/// Writes are stamped with the wall clock.
#[derive(Default)]
pub struct MemoryArtifactStore {
    artifacts: Mutex<HashMap<String, Artifact>>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, key: &str, contents: &str, modified: DateTime<Utc>) {
        let artifact = Artifact {
            contents: contents.to_string(),
            modified,
        };
        self.lock().insert(key.to_string(), artifact);
    }

    pub fn get(&self, key: &str) -> Option<Artifact> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Artifact>> {
        // Every write is a single insert, so a poisoned map is still usable
        self.artifacts.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ArtifactStore for MemoryArtifactStore {
    fn read(&self, key: &str) -> io::Result<Option<Artifact>> {
        Ok(self.get(key))
    }

    fn write(&self, key: &str, contents: &str) -> io::Result<()> {
        self.insert(key, contents, Utc::now());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_artifact() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path().to_path_buf()).expect("store");
        assert!(store.read("contest_x").expect("read").is_none());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path().join("nested")).expect("store");

        let before = Utc::now() - chrono::Duration::seconds(5);
        store.write("contest_x", "[1,2,3]").expect("write");
        let artifact = store.read("contest_x").expect("read").expect("artifact present");

        assert_eq!(artifact.contents, "[1,2,3]");
        assert!(artifact.modified >= before);
        assert!(store.artifact_path("contest_x").exists());
    }

    #[test]
    fn test_overwrite_leaves_no_temp_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path().to_path_buf()).expect("store");

        store.write("contests", "[]").expect("first write");
        store.write("contests", "[{\"id\":\"a\"}]").expect("second write");

        let artifact = store.read("contests").expect("read").expect("artifact present");
        assert_eq!(artifact.contents, "[{\"id\":\"a\"}]");

        let entries: Vec<_> = fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_failed_rename_cleans_up_temp_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FsArtifactStore::new(dir.path().to_path_buf()).expect("store");

        // A non-empty directory in the artifact's place makes the rename fail
        let blocker = store.artifact_path("contest_x");
        fs::create_dir(&blocker).expect("create blocker dir");
        fs::write(blocker.join("keep"), "old").expect("fill blocker dir");

        assert!(store.write("contest_x", "[1]").is_err());

        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .expect("read_dir")
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        assert_eq!(fs::read_to_string(blocker.join("keep")).expect("old data"), "old");
    }

    #[test]
    fn test_memory_store_keeps_given_timestamp() {
        let store = MemoryArtifactStore::new();
        let stamp = Utc::now() - chrono::Duration::hours(3);
        store.insert("contest_x", "[]", stamp);

        let artifact = store.read("contest_x").expect("read").expect("artifact present");
        assert_eq!(artifact.modified, stamp);
        assert!(store.read("other").expect("read").is_none());
    }
}
