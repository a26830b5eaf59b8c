use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{Duration, NaiveDate};
use kisaviz_core::{
    ArtifactStore, CachedFetcher, ChartData, ContestSnapshot, FetchError, FsArtifactStore,
    RemoteSource,
};

/// Serves a fixed participations payload and counts requests.
struct StaticRemote {
    body: String,
    requests: AtomicUsize,
}

impl StaticRemote {
    fn new(body: &str) -> Self {
        Self {
            body: body.to_string(),
            requests: AtomicUsize::new(0),
        }
    }
}

impl RemoteSource for StaticRemote {
    async fn fetch_participations(&self, _dataset_id: &str) -> Result<String, FetchError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        Ok(self.body.clone())
    }

    async fn fetch_contests(&self) -> Result<String, FetchError> {
        Err(FetchError::NoData("contests".to_string()))
    }
}

const PAYLOAD: &str = r#"[
    {"id": "1", "name": "Matti", "species_json": "{\"PARMAJ\": \"2017-01-01\", \"CYACAE\": \"2017-01-01\"}"},
    {"id": "2", "name": "Liisa", "species_json": "{\"PARMAJ\": \"2017-01-01\", \"PICPIC\": \"2017-01-03\"}"},
    {"id": "3", "name": "Pekka", "species_json": "[]"}
]"#;

fn date(s: &str) -> NaiveDate {
    s.parse().expect("valid test date")
}

#[tokio::test]
async fn test_load_cache_and_aggregate() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FsArtifactStore::new(dir.path().to_path_buf()).expect("store");
    let fetcher = CachedFetcher::new(StaticRemote::new(PAYLOAD), store);
    let window = Duration::minutes(20);

    let first = fetcher.load("3778f946", window).await.expect("remote load");
    let second = fetcher.load("3778f946", window).await.expect("cached load");
    assert_eq!(first, second);
    assert_eq!(fetcher.remote().requests.load(Ordering::SeqCst), 1);

    let artifact = fetcher
        .store()
        .read("contest_3778f946")
        .expect("read artifact")
        .expect("artifact exists");
    assert!(artifact.contents.contains("species_json"));

    let snapshot = ContestSnapshot::new(second);
    assert_eq!(snapshot.participations().len(), 3);
    assert_eq!(snapshot.tick_lists().count(), 2);
    assert_eq!(snapshot.all_codes(), vec!["CYACAE", "PARMAJ", "PICPIC"]);
    assert_eq!(snapshot.date_limits(), Ok((date("2017-01-01"), date("2017-01-03"))));

    let winners = snapshot
        .daily_popular(date("2017-01-01"), date("2017-01-03"))
        .expect("non-empty corpus");
    let rows: Vec<(String, usize)> = winners.into_iter().map(|w| (w.label, w.count)).collect();
    assert_eq!(
        rows,
        vec![
            ("PARMAJ".to_string(), 2),
            (String::new(), 0),
            ("PICPIC".to_string(), 1),
        ]
    );

    let chart = ChartData::build(&snapshot, 0).expect("non-empty corpus");
    assert_eq!(chart.series["PARMAJ"], vec![2, 0, 0]);
    assert_eq!(chart.totals, vec![3, 0, 1]);
}

#[tokio::test]
async fn test_zero_window_refetches_from_filesystem_cache() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FsArtifactStore::new(dir.path().to_path_buf()).expect("store");
    let fetcher = CachedFetcher::new(StaticRemote::new(PAYLOAD), store);

    fetcher.load("abc", Duration::minutes(20)).await.expect("first load");
    fetcher.load("abc", Duration::zero()).await.expect("forced reload");
    fetcher.load("abc", Duration::minutes(20)).await.expect("cached load");
    assert_eq!(fetcher.remote().requests.load(Ordering::SeqCst), 2);
}
