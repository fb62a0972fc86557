mod config;
mod preprocess;
mod source;
mod steps;
mod storage;
mod tracking;

use anyhow::Result;
use tracing::info;

use crate::config::AppConfig;
use crate::source::HubSource;
use crate::steps::{EvalParams, PlatformClient, TrainParams};
use crate::storage::ObjectStore;
use crate::tracking::TrackingClient;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cfg = AppConfig::from_env()?;
    info!(dataset = %cfg.dataset_name, experiment = %cfg.experiment_name, "pipeline: starting");

    let source = HubSource::new(cfg.dataset_name.clone(), cfg.dataset_config.clone());
    let store = ObjectStore::from_config(&cfg).await?;
    let tracking = TrackingClient::new(cfg.tracking_url.clone());

    // Preprocess: the only step that runs locally
    let prepared = preprocess::run(&cfg, &source, &store, &tracking).await?;

    // Fine-tune + evaluate: submitted to the platform when one is configured
    match &cfg.platform_url {
        Some(url) => {
            let platform = PlatformClient::new(url.clone());
            let train_job = platform
                .submit_finetune(&TrainParams::from_config(&cfg), &prepared)
                .await?;
            platform
                .submit_evaluate(&EvalParams::from_config(&cfg), &prepared, &train_job)
                .await?;
        }
        None => info!("platform: disabled (no PLATFORM_URL), stopping after preprocess"),
    }

    println!("{}", serde_json::to_string_pretty(&prepared)?);
    Ok(())
}
