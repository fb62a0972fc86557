use thiserror::Error;

use crate::schema::Conversation;

#[derive(Debug, Error)]
pub enum JsonlError {
    #[error("Line {line}: invalid JSON: {source}")]
    Parse {
        line: usize,
        source: serde_json::Error,
    },
    #[error("Line {line}: empty line")]
    EmptyLine { line: usize },
    #[error("Serialization error: {0}")]
    Ser(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JsonlError>;

/// Serialize one conversation per line, in iteration order. serde_json
/// emits non-ASCII characters literally, which is what the training
/// backends expect; nothing is escaped or reordered here.
pub fn to_jsonl(conversations: &[Conversation]) -> Result<String> {
    let mut out = String::new();
    for conv in conversations {
        out.push_str(&serde_json::to_string(conv)?);
        out.push('\n');
    }
    Ok(out)
}

/// Inverse of [`to_jsonl`]. Blank lines are rejected rather than skipped;
/// an artifact with holes in it should fail loudly.
pub fn from_jsonl(text: &str) -> Result<Vec<Conversation>> {
    let mut out = Vec::new();
    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        if line.trim().is_empty() {
            return Err(JsonlError::EmptyLine { line: line_no });
        }
        let conv = serde_json::from_str(line)
            .map_err(|source| JsonlError::Parse { line: line_no, source })?;
        out.push(conv);
    }
    Ok(out)
}

/// BLAKE3 hex digest of the serialized text. Stable across reads of the
/// same artifact, so it can serve as the dataset fingerprint in tracking
/// descriptors.
pub fn digest(text: &str) -> String {
    hex::encode(blake3::hash(text.as_bytes()).as_bytes())
}
