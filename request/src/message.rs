use serde::{Deserialize, Serialize};

use crate::content::Contents;

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        #[serde(rename = "content")]
        contents: Contents,
    },
    User {
        #[serde(rename = "content")]
        contents: Contents,
    },
    Assistant {
        #[serde(rename = "content")]
        #[serde(skip_serializing_if = "Option::is_none")]
        contents: Option<Contents>,
    },
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Assistant,
    System,
    User,
}

impl Message {
    pub fn system(content: impl Into<Contents>) -> Self {
        Message::System {
            contents: content.into(),
        }
    }

    pub fn user(content: impl Into<Contents>) -> Self {
        Message::User {
            contents: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Message::System { .. } => Role::System,
            Message::User { .. } => Role::User,
            Message::Assistant { .. } => Role::Assistant,
        }
    }

    pub fn contents(&self) -> Option<&Contents> {
        match self {
            Message::System { contents } | Message::User { contents } => Some(contents),
            Message::Assistant { contents } => contents.as_ref(),
        }
    }
}
