use serde::{Deserialize, Serialize};

use crate::{ErrorBody, Usage};

/// One `data:` payload of a streamed chat completion.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChatCompletionsChunk {
    #[serde(default)]
    pub choices: Vec<ChunkChoice>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorBody>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ChunkChoice {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<Delta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,
    #[serde(default)]
    pub index: u32,
}

// Variant order matters: untagged deserialization takes the first match, and a
// delta carrying both `role` and `content` must land on `Content`.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Delta {
    Content { content: String },
    Reasoning { reasoning_content: String },
    Role { role: String },
    Empty {},
}

impl Delta {
    pub fn content(&self) -> Option<&str> {
        match self {
            Delta::Content { content } => Some(content),
            _ => None,
        }
    }
}

impl ChatCompletionsChunk {
    /// A single-choice chunk carrying `content` as its delta.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            choices: vec![ChunkChoice {
                delta: Some(Delta::Content {
                    content: content.into(),
                }),
                finish_reason: None,
                index: 0,
            }],
            created: None,
            error: None,
            id: None,
            model: None,
            object: Some("chat.completion.chunk".to_string()),
            usage: None,
        }
    }

    /// `choices[0].delta.content`, if this chunk carries text.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.delta.as_ref())
            .and_then(Delta::content)
    }
}
