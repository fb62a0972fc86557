use anyhow::{Context, Result};
use async_trait::async_trait;
use dataprep::Record;
use tracing::debug;

const PAGE_SIZE: usize = 100;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Split {
    Train,
    Test,
}

impl Split {
    pub fn as_str(&self) -> &'static str {
        match self {
            Split::Train => "train",
            Split::Test => "test",
        }
    }
}

/// Seam between the transform and whatever produces raw records. Keeps the
/// preparation step testable without a reachable hub.
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Read the full split snapshot, in source order. The category and
    /// length filters run downstream over the whole set.
    async fn load(&self, split: Split) -> Result<Vec<Record>>;

    /// Logical source tag recorded against tracking descriptors.
    fn uri(&self) -> String;
}

/// Dataset hub source backed by the datasets-server rows API.
pub struct HubSource {
    base_url: String,
    dataset: String,
    config: String,
    client: reqwest::Client,
}

impl HubSource {
    pub fn new(dataset: String, config: String) -> Self {
        Self::with_base_url("https://datasets-server.huggingface.co".to_string(), dataset, config)
    }

    pub fn with_base_url(base_url: String, dataset: String, config: String) -> Self {
        Self {
            base_url,
            dataset,
            config,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl DatasetSource for HubSource {
    async fn load(&self, split: Split) -> Result<Vec<Record>> {
        let mut out: Vec<Record> = Vec::new();
        let mut offset = 0usize;

        loop {
            let url = format!(
                "{}/rows?dataset={}&config={}&split={}&offset={}&length={}",
                self.base_url.trim_end_matches('/'),
                self.dataset,
                self.config,
                split.as_str(),
                offset,
                PAGE_SIZE,
            );

            let resp = self
                .client
                .get(&url)
                .send()
                .await
                .with_context(|| format!("rows request failed: {}", self.dataset))?
                .error_for_status()
                .with_context(|| format!("rows request rejected: {}", self.dataset))?;
            let json: serde_json::Value = resp.json().await.context("rows response was not JSON")?;

            let rows = json["rows"]
                .as_array()
                .with_context(|| format!("no rows array for split {}", split.as_str()))?;
            if rows.is_empty() {
                break;
            }

            let mut skipped = 0usize;
            for row in rows {
                match serde_json::from_value::<Record>(row["row"].clone()) {
                    Ok(rec) => out.push(rec),
                    Err(_) => skipped += 1, // schema mismatch, drop the row
                }
            }
            if skipped > 0 {
                debug!(split = split.as_str(), skipped, "source: skipped malformed rows");
            }

            offset += rows.len();
            if rows.len() < PAGE_SIZE {
                break; // split exhausted
            }
        }

        Ok(out)
    }

    fn uri(&self) -> String {
        format!("hf://datasets/{}", self.dataset)
    }
}
