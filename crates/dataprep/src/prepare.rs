use crate::schema::{Conversation, Message, Record, Role};

/// Explicit transform configuration. No module-level defaults: every value
/// the filter chain depends on is carried here so the transform is
/// reproducible from the config alone.
#[derive(Clone, Debug)]
pub struct PrepareConfig {
    /// Only records with this exact category label are kept.
    pub category: String,
    /// Content of the system message prepended when a record has none.
    pub system_prompt: String,
    /// Upper bound on the non-system message count. Conversations above the
    /// bound are dropped, not truncated. The boundary is configurable; 2
    /// keeps at most one user/assistant pair.
    pub max_turns: usize,
}

impl PrepareConfig {
    pub fn new(category: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            system_prompt: system_prompt.into(),
            max_turns: 2,
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }
}

/// Ensure the conversation opens with a system message. Records that already
/// have one pass through unchanged; everything else (including records with
/// no messages at all) gets the default prepended. Pure and idempotent.
pub fn normalize(record: Record, system_prompt: &str) -> Conversation {
    let has_system = record
        .messages
        .first()
        .map(|m| m.role == Role::System)
        .unwrap_or(false);

    if has_system {
        return Conversation(record);
    }

    let mut messages = Vec::with_capacity(record.messages.len() + 1);
    messages.push(Message::new(Role::System, system_prompt));
    messages.extend(record.messages);

    Conversation(Record { category: record.category, messages })
}

/// Single pass over a split: category filter, normalize, length filter,
/// keep at most `limit` conversations in source order.
pub fn prepare(records: Vec<Record>, cfg: &PrepareConfig, limit: usize) -> Vec<Conversation> {
    records
        .into_iter()
        .filter(|r| r.category == cfg.category)
        .map(|r| normalize(r, &cfg.system_prompt))
        .filter(|c| c.turns() <= cfg.max_turns)
        .take(limit)
        .collect()
}
