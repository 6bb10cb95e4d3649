use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Contents {
    Array(Vec<Content>),
    String(String),
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "text")]
    Text { text: String },
}

impl From<&str> for Contents {
    fn from(text: &str) -> Self {
        Contents::String(text.to_string())
    }
}

impl From<String> for Contents {
    fn from(text: String) -> Self {
        Contents::String(text)
    }
}
