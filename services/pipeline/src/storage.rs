use anyhow::{Context, Result};
use aws_config::BehaviorVersion;
use aws_sdk_s3::{config::Region, primitives::ByteStream, Client as S3Client};

use crate::config::AppConfig;

/// Durable artifact target. One operation: put a serialized partition and
/// hand back its URI. Retries and timeouts are the SDK's business.
pub struct ObjectStore {
    client: S3Client,
    bucket: String,
}

impl ObjectStore {
    pub async fn from_config(cfg: &AppConfig) -> Result<Self> {
        let base = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(cfg.s3_region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&base);
        if let Some(endpoint) = &cfg.s3_endpoint {
            // MinIO and friends want path-style addressing
            builder = builder
                .endpoint_url(endpoint.clone())
                .force_path_style(cfg.s3_force_path_style);
        }

        Ok(Self {
            client: S3Client::from_conf(builder.build()),
            bucket: cfg.s3_bucket.clone(),
        })
    }

    pub async fn put_text(&self, key: &str, body: String) -> Result<String> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type("application/json")
            .body(ByteStream::from(body.into_bytes()))
            .send()
            .await
            .with_context(|| format!("put_object failed: s3://{}/{}", self.bucket, key))?;

        Ok(format!("s3://{}/{}", self.bucket, key))
    }
}

/// Hub ids can contain '/', so keys use a flattened slug.
pub fn dataset_slug(name: &str) -> String {
    name.replace('/', "__")
}

pub fn train_key(dataset_name: &str, run_id: &str) -> String {
    format!("dataset/{}/{}/train/train_dataset.json", dataset_slug(dataset_name), run_id)
}

pub fn eval_key(dataset_name: &str, run_id: &str) -> String {
    format!("dataset/{}/{}/eval/eval_dataset.json", dataset_slug(dataset_name), run_id)
}
