use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::info;

use crate::config::AppConfig;
use crate::preprocess::PreparedDataset;

/// Fine-tune step configuration, forwarded verbatim to the platform.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TrainParams {
    pub base_model_id: String,
    pub epochs: u32,
    pub learning_rate: f32,
    pub batch_size: u32,
}

/// Evaluate step configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EvalParams {
    pub tasks: Vec<String>,
}

impl TrainParams {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            base_model_id: cfg.base_model_id.clone(),
            epochs: cfg.train_epochs,
            learning_rate: cfg.train_learning_rate,
            batch_size: cfg.train_batch_size,
        }
    }
}

impl EvalParams {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self { tasks: cfg.eval_tasks.clone() }
    }
}

/// Client for the managed training platform. Submission only: scheduling,
/// retries and resource lifecycles belong to the platform.
pub struct PlatformClient {
    base_url: String,
    client: reqwest::Client,
}

impl PlatformClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    async fn submit(&self, body: serde_json::Value) -> Result<String> {
        let url = format!("{}/v1/jobs", self.base_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .context("platform: job submission failed")?
            .error_for_status()
            .context("platform: job submission rejected")?;
        let json: serde_json::Value = resp.json().await?;
        let job_id = json["job_id"]
            .as_str()
            .context("platform: response missing job_id")?;
        Ok(job_id.to_string())
    }

    pub async fn submit_finetune(
        &self,
        params: &TrainParams,
        prepared: &PreparedDataset,
    ) -> Result<String> {
        let job_id = self
            .submit(finetune_job(params, prepared))
            .await?;
        info!(job_id=%job_id, base_model=%params.base_model_id, "platform: fine-tune submitted");
        Ok(job_id)
    }

    /// Evaluates the output of `finetune_job_id` on the eval partition.
    pub async fn submit_evaluate(
        &self,
        params: &EvalParams,
        prepared: &PreparedDataset,
        finetune_job_id: &str,
    ) -> Result<String> {
        let job_id = self
            .submit(evaluate_job(params, prepared, finetune_job_id))
            .await?;
        info!(job_id=%job_id, after=%finetune_job_id, "platform: evaluate submitted");
        Ok(job_id)
    }
}

fn finetune_job(params: &TrainParams, prepared: &PreparedDataset) -> serde_json::Value {
    json!({
        "kind": "finetune",
        "run_id": prepared.run_id,
        "train_uri": prepared.train_uri,
        "params": params,
    })
}

fn evaluate_job(
    params: &EvalParams,
    prepared: &PreparedDataset,
    finetune_job_id: &str,
) -> serde_json::Value {
    json!({
        "kind": "evaluate",
        "run_id": prepared.run_id,
        "eval_uri": prepared.eval_uri,
        "depends_on": finetune_job_id,
        "params": params,
    })
}
