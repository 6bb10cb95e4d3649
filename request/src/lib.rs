use serde::{Deserialize, Serialize};

pub mod content;
pub mod message;

pub use content::{Content, Contents};
pub use message::{Message, Role};

/// Body of `POST /chat/completions` as accepted by OpenAI-compatible servers.
///
/// Unset options are omitted from the JSON entirely; several local servers
/// reject explicit `null`s.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct ChatCompletionsRequest {
    pub messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl ChatCompletionsRequest {
    pub fn builder(model: impl Into<String>) -> ChatCompletionsRequestBuilder {
        ChatCompletionsRequestBuilder::new(model)
    }

    pub fn is_stream(&self) -> bool {
        self.stream.unwrap_or(false)
    }
}

pub struct ChatCompletionsRequestBuilder {
    max_tokens: Option<u32>,
    messages: Vec<Message>,
    model: String,
    stream: Option<bool>,
    temperature: Option<f32>,
}

impl ChatCompletionsRequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            max_tokens: None,
            messages: Vec::new(),
            model: model.into(),
            stream: None,
            temperature: None,
        }
    }

    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn max_tokens(mut self, max_tokens: Option<u32>) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = Some(stream);
        self
    }

    pub fn temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn build(self) -> ChatCompletionsRequest {
        ChatCompletionsRequest {
            messages: self.messages,
            max_tokens: self.max_tokens,
            model: self.model,
            stream: self.stream,
            temperature: self.temperature,
        }
    }
}
