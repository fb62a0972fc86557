use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::json;
use tracing::info;

/// What gets registered against a run for one partition: enough to trace
/// the artifact back to its source and verify it was not swapped out.
#[derive(Clone, Debug, Serialize)]
pub struct DatasetDescriptor {
    pub name: String,        // e.g. "dolly-train"
    pub digest: String,      // BLAKE3 over the serialized partition
    pub source: String,      // logical source tag, e.g. hf://datasets/..
    pub uri: String,         // durable storage location
    pub examples: u64,
    pub context: String,     // "training" | "evaluation"
}

/// Client for an MLflow-compatible tracking server. Every call is one HTTP
/// round trip; failures bubble up verbatim.
pub struct TrackingClient {
    base_url: String,
    client: reqwest::Client,
}

impl TrackingClient {
    pub fn new(base_url: String) -> Self {
        Self {
            base_url,
            client: reqwest::Client::new(),
        }
    }

    fn api(&self, path: &str) -> String {
        format!("{}/api/2.0/mlflow/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Resolve an experiment id by name, creating the experiment when the
    /// server has never seen it.
    pub async fn ensure_experiment(&self, name: &str) -> Result<String> {
        let resp = self
            .client
            .get(self.api("experiments/get-by-name"))
            .query(&[("experiment_name", name)])
            .send()
            .await
            .context("tracking: get-by-name request failed")?;

        if resp.status().is_success() {
            let json: serde_json::Value = resp.json().await?;
            let id = json["experiment"]["experiment_id"]
                .as_str()
                .context("tracking: experiment response missing experiment_id")?;
            return Ok(id.to_string());
        }

        let resp = self
            .client
            .post(self.api("experiments/create"))
            .json(&json!({ "name": name }))
            .send()
            .await
            .context("tracking: create experiment request failed")?
            .error_for_status()
            .context("tracking: create experiment rejected")?;
        let json: serde_json::Value = resp.json().await?;
        let id = json["experiment_id"]
            .as_str()
            .context("tracking: create response missing experiment_id")?;
        Ok(id.to_string())
    }

    pub async fn create_run(&self, experiment_id: &str, run_name: &str) -> Result<String> {
        let body = json!({
            "experiment_id": experiment_id,
            "run_name": run_name,
            "start_time": chrono::Utc::now().timestamp_millis(),
        });

        let resp = self
            .client
            .post(self.api("runs/create"))
            .json(&body)
            .send()
            .await
            .context("tracking: create run request failed")?
            .error_for_status()
            .context("tracking: create run rejected")?;
        let json: serde_json::Value = resp.json().await?;
        let run_id = json["run"]["info"]["run_id"]
            .as_str()
            .context("tracking: run response missing run_id")?;

        info!(run_id=%run_id, run_name=%run_name, "tracking: run created");
        Ok(run_id.to_string())
    }

    /// Register one partition descriptor as a logged input of the run.
    pub async fn log_dataset(&self, run_id: &str, desc: &DatasetDescriptor) -> Result<()> {
        self.client
            .post(self.api("runs/log-inputs"))
            .json(&log_inputs_body(run_id, desc))
            .send()
            .await
            .context("tracking: log-inputs request failed")?
            .error_for_status()
            .context("tracking: log-inputs rejected")?;

        info!(run_id=%run_id, name=%desc.name, context=%desc.context, "tracking: dataset registered");
        Ok(())
    }

    pub async fn end_run(&self, run_id: &str) -> Result<()> {
        let body = json!({
            "run_id": run_id,
            "status": "FINISHED",
            "end_time": chrono::Utc::now().timestamp_millis(),
        });

        self.client
            .post(self.api("runs/update"))
            .json(&body)
            .send()
            .await
            .context("tracking: update run request failed")?
            .error_for_status()
            .context("tracking: update run rejected")?;
        Ok(())
    }
}

fn log_inputs_body(run_id: &str, desc: &DatasetDescriptor) -> serde_json::Value {
    json!({
        "run_id": run_id,
        "datasets": [{
            "dataset": {
                "name": desc.name,
                "digest": desc.digest,
                "source_type": "dataset",
                "source": desc.source,
                "profile": json!({ "examples": desc.examples, "uri": desc.uri }).to_string(),
            },
            "tags": [
                { "key": "mlflow.data.context", "value": desc.context }
            ]
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> DatasetDescriptor {
        DatasetDescriptor {
            name: "dolly-train".to_string(),
            digest: "ab".repeat(32),
            source: "hf://datasets/dolly".to_string(),
            uri: "s3://bucket/dataset/dolly/run/train/train_dataset.json".to_string(),
            examples: 42,
            context: "training".to_string(),
        }
    }

    #[test]
    fn test_log_inputs_body_shape() {
        let body = log_inputs_body("run-1", &descriptor());

        assert_eq!(body["run_id"], "run-1");
        let ds = &body["datasets"][0];
        assert_eq!(ds["dataset"]["name"], "dolly-train");
        assert_eq!(ds["dataset"]["source"], "hf://datasets/dolly");
        assert_eq!(ds["tags"][0]["key"], "mlflow.data.context");
        assert_eq!(ds["tags"][0]["value"], "training");

        let profile: serde_json::Value =
            serde_json::from_str(ds["dataset"]["profile"].as_str().unwrap()).unwrap();
        assert_eq!(profile["examples"], 42);
    }
}
