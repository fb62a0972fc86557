use anyhow::{bail, Context, Result};

#[derive(Clone, Debug)]
pub struct AppConfig {
    // source
    pub dataset_name: String,
    pub dataset_config: String,
    pub category: String,
    pub system_prompt: String,
    pub max_turns: usize,
    pub train_samples: usize,
    pub eval_samples: usize,

    // storage
    pub s3_bucket: String,
    pub s3_region: String,
    pub s3_endpoint: Option<String>,
    pub s3_force_path_style: bool,

    // tracking
    pub tracking_url: String,
    pub experiment_name: String,
    pub run_name: Option<String>,

    // platform (fine-tune/evaluate submission; disabled when unset)
    pub platform_url: Option<String>,
    pub base_model_id: String,
    pub train_epochs: u32,
    pub train_learning_rate: f32,
    pub train_batch_size: u32,
    pub eval_tasks: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let dataset_name = get("DATASET_NAME")?;
        let dataset_config = std::env::var("DATASET_CONFIG").unwrap_or_else(|_| "default".to_string());
        let category = std::env::var("CATEGORY").unwrap_or_else(|_| "Open QA".to_string());
        let system_prompt = std::env::var("SYSTEM_PROMPT")
            .unwrap_or_else(|_| "You are a helpful assistant.".to_string());
        let max_turns = get_parsed("MAX_TURNS", 2usize)?;
        let train_samples = get("TRAIN_SAMPLES")?.parse::<usize>().context("TRAIN_SAMPLES must be an integer")?;
        let eval_samples = get("EVAL_SAMPLES")?.parse::<usize>().context("EVAL_SAMPLES must be an integer")?;

        let s3_bucket = get("S3_BUCKET")?;
        let s3_region = std::env::var("S3_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let s3_endpoint = std::env::var("S3_ENDPOINT").ok();
        let s3_force_path_style = std::env::var("S3_FORCE_PATH_STYLE")
            .ok()
            .map(|v| parse_bool(&v))
            .unwrap_or(s3_endpoint.is_some());

        let tracking_url = get("TRACKING_URL")?;
        let experiment_name = std::env::var("EXPERIMENT_NAME")
            .unwrap_or_else(|_| "fine-tune".to_string());
        let run_name = std::env::var("RUN_NAME").ok();

        let platform_url = std::env::var("PLATFORM_URL").ok();
        let base_model_id = std::env::var("BASE_MODEL_ID")
            .unwrap_or_else(|_| "meta-llama/Llama-3.1-8B".to_string());
        let train_epochs = get_parsed("TRAIN_EPOCHS", 1u32)?;
        let train_learning_rate = get_parsed("TRAIN_LEARNING_RATE", 2e-5f32)?;
        let train_batch_size = get_parsed("TRAIN_BATCH_SIZE", 8u32)?;
        let eval_tasks = std::env::var("EVAL_TASKS")
            .unwrap_or_else(|_| "mmlu".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // Tiny sanity checks (fail fast, fail loud)
        if !tracking_url.starts_with("http://") && !tracking_url.starts_with("https://") {
            bail!("TRACKING_URL must start with http:// or https://");
        }
        if let Some(ep) = &s3_endpoint {
            if !ep.starts_with("http://") && !ep.starts_with("https://") {
                bail!("S3_ENDPOINT must start with http:// or https://");
            }
        }
        if let Some(p) = &platform_url {
            if !p.starts_with("http://") && !p.starts_with("https://") {
                bail!("PLATFORM_URL must start with http:// or https://");
            }
        }

        Ok(Self {
            dataset_name,
            dataset_config,
            category,
            system_prompt,
            max_turns,
            train_samples,
            eval_samples,
            s3_bucket,
            s3_region,
            s3_endpoint,
            s3_force_path_style,
            tracking_url,
            experiment_name,
            run_name,
            platform_url,
            base_model_id,
            train_epochs,
            train_learning_rate,
            train_batch_size,
            eval_tasks,
        })
    }
}

fn get(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Missing required env var: {key}"))
}

fn get_parsed<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(v) => v.parse::<T>().map_err(|_| anyhow::anyhow!("{key} has invalid value: {v}")),
        Err(_) => Ok(default),
    }
}

fn parse_bool(v: &str) -> bool {
    matches!(v, "1" | "true" | "TRUE" | "yes" | "YES")
}
