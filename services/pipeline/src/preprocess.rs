use anyhow::{Context, Result};
use dataprep::{digest, prepare, to_jsonl, Partition, PrepareConfig};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::source::{DatasetSource, Split};
use crate::storage::{dataset_slug, eval_key, train_key, ObjectStore};
use crate::tracking::{DatasetDescriptor, TrackingClient};

/// What the preprocess step hands to the rest of the pipeline.
#[derive(Clone, Debug, Serialize)]
pub struct PreparedDataset {
    pub train_uri: String,
    pub eval_uri: String,
    pub run_id: String,
}

/// A serialized partition ready for upload and registration.
struct PartitionArtifact {
    partition: Partition,
    body: String,
    digest: String,
}

fn build_artifact(
    name: &str,
    records: Vec<dataprep::Record>,
    cfg: &PrepareConfig,
    limit: usize,
) -> Result<PartitionArtifact> {
    let conversations = prepare(records, cfg, limit);
    let partition = Partition::new(name, conversations);
    let body = to_jsonl(&partition.conversations)
        .with_context(|| format!("serialize partition {name}"))?;
    let digest = digest(&body);
    Ok(PartitionArtifact { partition, body, digest })
}

fn descriptor(
    artifact: &PartitionArtifact,
    dataset_name: &str,
    source_uri: &str,
    uri: &str,
    context: &str,
) -> DatasetDescriptor {
    DatasetDescriptor {
        name: format!("{}-{}", dataset_slug(dataset_name), artifact.partition.name),
        digest: artifact.digest.clone(),
        source: source_uri.to_string(),
        uri: uri.to_string(),
        examples: artifact.partition.len() as u64,
        context: context.to_string(),
    }
}

fn resolve_run_id(run_name: Option<&str>, dataset_name: &str) -> String {
    match run_name {
        Some(name) => name.to_string(),
        None => {
            let nonce = Uuid::new_v4().to_string();
            let short = nonce.split('-').next().unwrap_or("run");
            format!("{}-{}", dataset_slug(dataset_name), short)
        }
    }
}

/// The preparation step end to end. Strictly sequential; every external
/// failure propagates to the caller untouched.
pub async fn run(
    cfg: &AppConfig,
    source: &dyn DatasetSource,
    store: &ObjectStore,
    tracking: &TrackingClient,
) -> Result<PreparedDataset> {
    let run_id = resolve_run_id(cfg.run_name.as_deref(), &cfg.dataset_name);
    let prep_cfg = PrepareConfig::new(&cfg.category, &cfg.system_prompt)
        .with_max_turns(cfg.max_turns);

    // 1. Read both split snapshots
    let train_records = source.load(Split::Train).await?;
    let test_records = source.load(Split::Test).await?;
    info!(
        train = train_records.len(),
        test = test_records.len(),
        dataset = %cfg.dataset_name,
        "preprocess: splits loaded"
    );

    // 2. Filter, normalize, bound, sample
    let train = build_artifact("train", train_records, &prep_cfg, cfg.train_samples)?;
    let eval = build_artifact("eval", test_records, &prep_cfg, cfg.eval_samples)?;
    info!(
        train_kept = train.partition.len(),
        eval_kept = eval.partition.len(),
        category = %cfg.category,
        "preprocess: partitions prepared"
    );

    // 3. Upload artifacts
    let train_uri = store
        .put_text(&train_key(&cfg.dataset_name, &run_id), train.body.clone())
        .await?;
    let eval_uri = store
        .put_text(&eval_key(&cfg.dataset_name, &run_id), eval.body.clone())
        .await?;
    info!(train_uri = %train_uri, eval_uri = %eval_uri, "preprocess: artifacts uploaded");

    // 4. Register both partitions against a named tracking run
    let experiment_id = tracking.ensure_experiment(&cfg.experiment_name).await?;
    let tracking_run = tracking.create_run(&experiment_id, &run_id).await?;
    let src_uri = source.uri();
    tracking
        .log_dataset(
            &tracking_run,
            &descriptor(&train, &cfg.dataset_name, &src_uri, &train_uri, "training"),
        )
        .await?;
    tracking
        .log_dataset(
            &tracking_run,
            &descriptor(&eval, &cfg.dataset_name, &src_uri, &eval_uri, "evaluation"),
        )
        .await?;
    tracking.end_run(&tracking_run).await?;

    Ok(PreparedDataset { train_uri, eval_uri, run_id })
}
