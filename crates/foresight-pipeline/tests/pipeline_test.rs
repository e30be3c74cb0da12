//! End-to-end pipeline runs over mock stores and a temporary artifact
//! area.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use foresight_core::calendar::MS_PER_HOUR;
use foresight_core::config::{Config, HorizonConfig, RegistryConfig, SearchConfig};
use foresight_core::constants::SCHEMA_VERSION;
use foresight_core::errors::{
    ForesightError, ForesightResult, PipelineError, RegistryError, SearchError,
};
use foresight_core::models::{ExtractArtifact, HourlyBucket, HourlyRecord, Service, StatSummary};
use foresight_core::traits::{SearchStore, ServiceRegistry};
use foresight_pipeline::{ArtifactStore, Pipeline, RunLock, StageId};
use serde_json::Value;
use tempfile::TempDir;

/// 2023-11-14T22:00:00Z, a Tuesday evening, hour aligned.
const BASE: i64 = 1_699_999_200_000;

fn at(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).unwrap()
}

fn stats(avg: f64) -> StatSummary {
    StatSummary {
        count: 12,
        min: Some(avg - 10.0),
        max: Some(avg + 10.0),
        avg: Some(avg),
        sum: Some(avg * 12.0),
    }
}

fn bucket(ts: i64, iso: &str, avg: f64) -> HourlyBucket {
    HourlyBucket {
        key: ts,
        key_as_string: iso.to_string(),
        doc_count: 12,
        latency_stats: stats(avg),
        request_size_stats: stats(512.0),
        response_size_stats: stats(2048.0),
    }
}

/// Three observed hours, newest first, the order the store returns them.
fn checkout_buckets() -> Vec<HourlyBucket> {
    vec![
        bucket(BASE + 2 * MS_PER_HOUR, "2023-11-15T00:00:00.000Z", 110.0),
        bucket(BASE + MS_PER_HOUR, "2023-11-14T23:00:00.000Z", 120.0),
        bucket(BASE, "2023-11-14T22:00:00.000Z", 100.0),
    ]
}

fn stage1_artifact(id: i64) -> ExtractArtifact {
    ExtractArtifact {
        schema: SCHEMA_VERSION,
        id,
        name: format!("service-{id}"),
        data: checkout_buckets()
            .into_iter()
            .map(HourlyRecord::from_bucket)
            .collect(),
    }
}

fn test_config(data_dir: &Path) -> Config {
    Config {
        data_dir: data_dir.to_path_buf(),
        registry: RegistryConfig {
            user: "metrics".to_string(),
            password: "secret".to_string(),
            host: "db.test".to_string(),
            port: 5432,
            database: Some("registry".to_string()),
        },
        search: SearchConfig::default(),
        horizon: HorizonConfig::new(1, 0).unwrap(),
    }
}

struct StaticRegistry {
    services: Vec<Service>,
}

#[async_trait]
impl ServiceRegistry for StaticRegistry {
    async fn fetch_services(&self) -> ForesightResult<Vec<Service>> {
        Ok(self.services.clone())
    }
}

struct FailingRegistry;

#[async_trait]
impl ServiceRegistry for FailingRegistry {
    async fn fetch_services(&self) -> ForesightResult<Vec<Service>> {
        Err(RegistryError::Query {
            message: "registry offline".to_string(),
        }
        .into())
    }
}

/// Upserts recorded as (collection, doc id, document) triples.
type IndexLog = Arc<Mutex<Vec<(String, String, Value)>>>;

struct MockSearch {
    buckets: HashMap<i64, Vec<HourlyBucket>>,
    failing_services: Vec<i64>,
    indexed: IndexLog,
}

impl MockSearch {
    fn new(buckets: HashMap<i64, Vec<HourlyBucket>>, indexed: IndexLog) -> Self {
        Self {
            buckets,
            failing_services: Vec::new(),
            indexed,
        }
    }
}

#[async_trait]
impl SearchStore for MockSearch {
    async fn hourly_stats(&self, service_id: i64) -> ForesightResult<Vec<HourlyBucket>> {
        if self.failing_services.contains(&service_id) {
            return Err(SearchError::Transport {
                url: "http://search.test:9200".to_string(),
                message: "connection refused".to_string(),
            }
            .into());
        }
        Ok(self.buckets.get(&service_id).cloned().unwrap_or_default())
    }

    async fn index_document(
        &self,
        collection: &str,
        doc_id: &str,
        document: &Value,
    ) -> ForesightResult<()> {
        self.indexed.lock().unwrap().push((
            collection.to_string(),
            doc_id.to_string(),
            document.clone(),
        ));
        Ok(())
    }
}

fn checkout_service() -> Service {
    Service {
        id: 7,
        name: "checkout".to_string(),
        host: Some("checkout.local".to_string()),
    }
}

#[tokio::test]
async fn full_run_extracts_trains_and_publishes() {
    let tmp = TempDir::new().unwrap();
    let indexed: IndexLog = IndexLog::default();
    let registry = StaticRegistry {
        services: vec![checkout_service()],
    };
    let search = MockSearch::new(
        HashMap::from([(7, checkout_buckets())]),
        indexed.clone(),
    );
    let pipeline = Pipeline::new(registry, search, test_config(tmp.path()));

    // Run at the newest bucket hour with a one day horizon: 3 observed
    // hours plus 24 forecast hours gives 27 timeline points.
    let now = at(BASE + 2 * MS_PER_HOUR);
    let report = pipeline.run(&[], now).await.unwrap();
    assert_eq!(report.stages.len(), 3);
    assert!(report
        .stages
        .iter()
        .all(|(_, stage)| stage.processed == 1 && stage.skipped == 0));

    let store = ArtifactStore::new(tmp.path());
    let dir = store.service_dir(7);

    let extracted = store.read_stage1(&dir).unwrap();
    assert_eq!(extracted.id, 7);
    assert_eq!(extracted.name, "checkout");
    assert_eq!(extracted.data.len(), 3);
    // Store order is kept, newest bucket first, ISO text verbatim.
    assert_eq!(extracted.data[0].ts, BASE + 2 * MS_PER_HOUR);
    assert_eq!(extracted.data[0].ts_iso, "2023-11-15T00:00:00.000Z");
    assert_eq!(extracted.data[0].dow, 3);
    assert_eq!(extracted.data[0].occurrences, 12);
    assert_eq!(extracted.data[2].ts, BASE);
    assert_eq!(extracted.data[2].dow, 2);
    assert!(!extracted.data[2].weekend);

    let document = store.read_stage2(&dir).unwrap();
    assert_eq!(document.schema, SCHEMA_VERSION);
    assert_eq!(document.service_id, 7);
    assert_eq!(document.ts_unit, "ms");
    assert_eq!(document.data.len(), 27);

    // Timeline rows run earliest to latest; only observed hours carry a
    // latency.
    assert_eq!(document.data[0].ts, BASE);
    assert_eq!(document.data[0].latency, Some(100.0));
    assert_eq!(document.data[1].latency, Some(120.0));
    assert_eq!(document.data[2].latency, Some(110.0));
    assert!(document.data[3..].iter().all(|row| row.latency.is_none()));
    assert_eq!(document.data[26].ts, BASE + 26 * MS_PER_HOUR);

    assert_eq!(document.predict_range.start, BASE);
    assert_eq!(document.predict_range.current, BASE + 2 * MS_PER_HOUR);
    assert_eq!(document.predict_range.end, BASE + 26 * MS_PER_HOUR);
    assert_eq!(document.predict_range.per_hour, 3_600_000);
    assert_eq!(document.predict_range.per_day, 86_400_000);

    let metrics = &document.metrics;
    for value in [
        metrics.mae_linear,
        metrics.mse_linear,
        metrics.mae_random_forest,
        metrics.mse_random_forest,
    ] {
        assert!(value.is_finite() && value >= 0.0);
    }
    assert!(metrics.r2_linear <= 1.0);
    assert!(metrics.r2_random_forest <= 1.0);

    let csv = fs::read_to_string(dir.join("stage-2.csv")).unwrap();
    assert_eq!(csv.lines().count(), 28);

    let published = indexed.lock().unwrap();
    assert_eq!(published.len(), 1);
    let (collection, doc_id, value) = &published[0];
    assert_eq!(collection, "predict");
    assert_eq!(doc_id, "7");
    assert_eq!(value["schema"], SCHEMA_VERSION);
    assert_eq!(value["data"].as_array().unwrap().len(), 27);
}

#[tokio::test]
async fn selected_stage_runs_alone() {
    let tmp = TempDir::new().unwrap();
    let store = ArtifactStore::new(tmp.path());
    store.write_stage1(&stage1_artifact(7)).unwrap();

    let indexed: IndexLog = IndexLog::default();
    // A registry that cannot answer proves the trainer never goes near it.
    let pipeline = Pipeline::new(
        FailingRegistry,
        MockSearch::new(HashMap::new(), indexed.clone()),
        test_config(tmp.path()),
    );

    let now = at(BASE + 2 * MS_PER_HOUR);
    let report = pipeline.run(&[StageId::Train], now).await.unwrap();
    assert_eq!(report.stages.len(), 1);
    assert_eq!(report.stages[0].0, StageId::Train);

    assert!(tmp.path().join("7/stage-2.json").exists());
    assert!(tmp.path().join("7/stage-2.csv").exists());
    assert!(indexed.lock().unwrap().is_empty());
}

#[tokio::test]
async fn registry_failure_is_fatal_to_extraction() {
    let tmp = TempDir::new().unwrap();
    let pipeline = Pipeline::new(
        FailingRegistry,
        MockSearch::new(HashMap::new(), IndexLog::default()),
        test_config(tmp.path()),
    );

    let err = pipeline
        .run(&[StageId::Extract], at(BASE))
        .await
        .unwrap_err();
    assert!(matches!(err, ForesightError::Registry(_)));
}

#[tokio::test]
async fn extraction_skips_a_failing_service_and_continues() {
    let tmp = TempDir::new().unwrap();
    let registry = StaticRegistry {
        services: vec![
            checkout_service(),
            Service {
                id: 9,
                name: "payments".to_string(),
                host: None,
            },
        ],
    };
    let mut search = MockSearch::new(
        HashMap::from([(9, checkout_buckets())]),
        IndexLog::default(),
    );
    search.failing_services.push(7);

    let pipeline = Pipeline::new(registry, search, test_config(tmp.path()));
    let report = pipeline
        .run(&[StageId::Extract], at(BASE))
        .await
        .unwrap();

    let (_, stage) = report.stages[0];
    assert_eq!(stage.processed, 1);
    assert_eq!(stage.skipped, 1);
    assert!(!tmp.path().join("7").exists());
    assert!(tmp.path().join("9/stage-1.json").exists());
}

#[tokio::test]
async fn rerunning_extraction_overwrites_the_same_artifact() {
    let tmp = TempDir::new().unwrap();
    let registry = StaticRegistry {
        services: vec![checkout_service()],
    };
    let search = MockSearch::new(
        HashMap::from([(7, checkout_buckets())]),
        IndexLog::default(),
    );
    let pipeline = Pipeline::new(registry, search, test_config(tmp.path()));
    let store = ArtifactStore::new(tmp.path());

    pipeline.run(&[StageId::Extract], at(BASE)).await.unwrap();
    let first = store.read_stage1(&store.service_dir(7)).unwrap();

    pipeline.run(&[StageId::Extract], at(BASE)).await.unwrap();
    let second = store.read_stage1(&store.service_dir(7)).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn trainer_aborts_on_the_first_bad_artifact() {
    let tmp = TempDir::new().unwrap();
    let store = ArtifactStore::new(tmp.path());

    // Directory "3" sorts before "7" and holds an unreadable artifact.
    fs::create_dir_all(tmp.path().join("3")).unwrap();
    fs::write(tmp.path().join("3/stage-1.json"), "not json").unwrap();
    store.write_stage1(&stage1_artifact(7)).unwrap();

    let pipeline = Pipeline::new(
        StaticRegistry { services: vec![] },
        MockSearch::new(HashMap::new(), IndexLog::default()),
        test_config(tmp.path()),
    );

    let err = pipeline
        .run(&[StageId::Train], at(BASE + 2 * MS_PER_HOUR))
        .await
        .unwrap_err();
    assert!(matches!(err, ForesightError::Artifact(_)));
    assert!(!tmp.path().join("7/stage-2.json").exists());
}

#[tokio::test]
async fn trainer_rejects_a_service_with_too_few_samples() {
    let tmp = TempDir::new().unwrap();
    let store = ArtifactStore::new(tmp.path());

    let mut artifact = stage1_artifact(7);
    artifact.data.truncate(1);
    store.write_stage1(&artifact).unwrap();

    let pipeline = Pipeline::new(
        StaticRegistry { services: vec![] },
        MockSearch::new(HashMap::new(), IndexLog::default()),
        test_config(tmp.path()),
    );

    let err = pipeline
        .run(&[StageId::Train], at(BASE + 2 * MS_PER_HOUR))
        .await
        .unwrap_err();
    assert!(matches!(err, ForesightError::Model(_)));
}

#[tokio::test]
async fn directories_without_a_registry_row_are_still_processed() {
    let tmp = TempDir::new().unwrap();
    let store = ArtifactStore::new(tmp.path());
    store.write_stage1(&stage1_artifact(999)).unwrap();

    let indexed: IndexLog = IndexLog::default();
    let pipeline = Pipeline::new(
        StaticRegistry { services: vec![] },
        MockSearch::new(HashMap::new(), indexed.clone()),
        test_config(tmp.path()),
    );

    pipeline
        .run(&[StageId::Train, StageId::Publish], at(BASE + 2 * MS_PER_HOUR))
        .await
        .unwrap();

    let published = indexed.lock().unwrap();
    assert_eq!(published.len(), 1);
    assert_eq!(published[0].1, "999");
}

#[tokio::test]
async fn publishing_twice_replaces_the_same_document() {
    let tmp = TempDir::new().unwrap();
    let store = ArtifactStore::new(tmp.path());
    store.write_stage1(&stage1_artifact(7)).unwrap();

    let indexed: IndexLog = IndexLog::default();
    let pipeline = Pipeline::new(
        StaticRegistry { services: vec![] },
        MockSearch::new(HashMap::new(), indexed.clone()),
        test_config(tmp.path()),
    );

    let now = at(BASE + 2 * MS_PER_HOUR);
    pipeline
        .run(&[StageId::Train, StageId::Publish], now)
        .await
        .unwrap();
    pipeline.run(&[StageId::Publish], now).await.unwrap();

    let published = indexed.lock().unwrap();
    assert_eq!(published.len(), 2);
    assert_eq!(published[0].1, "7");
    assert_eq!(published[1].1, "7");
    assert_eq!(published[0].2, published[1].2);
}

#[tokio::test]
async fn a_held_lock_rejects_the_whole_run() {
    let tmp = TempDir::new().unwrap();
    let now = at(BASE);
    let _held = RunLock::acquire(tmp.path(), now).unwrap();

    let pipeline = Pipeline::new(
        StaticRegistry { services: vec![] },
        MockSearch::new(HashMap::new(), IndexLog::default()),
        test_config(tmp.path()),
    );

    let err = pipeline.run(&[], now).await.unwrap_err();
    assert!(matches!(
        err,
        ForesightError::Pipeline(PipelineError::AlreadyRunning { .. })
    ));
}
