use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self { role, content: content.into() }
    }
}

/// Raw labeled example as read from the source dataset.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub category: String,       // source label, used for filtering
    pub messages: Vec<Message>,
}

/// A record normalized to guarantee a leading system message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation(pub Record);

impl Conversation {
    pub fn messages(&self) -> &[Message] {
        &self.0.messages
    }

    /// Message count excluding the leading system message.
    pub fn turns(&self) -> usize {
        self.0.messages.len().saturating_sub(1)
    }
}

/// Named filtered subset of conversations (train / test).
#[derive(Clone, Debug)]
pub struct Partition {
    pub name: String,
    pub conversations: Vec<Conversation>,
}

impl Partition {
    pub fn new(name: impl Into<String>, conversations: Vec<Conversation>) -> Self {
        Self { name: name.into(), conversations }
    }

    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }
}
