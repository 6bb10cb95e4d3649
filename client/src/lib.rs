//! # Local Model Client
//!
//! A thin chat client for local model servers that speak the OpenAI chat
//! completions API (Docker Model Runner, llama.cpp, Ollama, LM Studio, ...).
//!
//! ## Features
//!
//! - **Environment settings**: [`config::ClientConfig`] loads URL, key, model and
//!   sampling defaults from an environment snapshot
//! - **Complete and streamed replies**: [`ChatCompletions::create`] and
//!   [`ChatCompletions::create_stream`]
//! - **Typed errors**: every failure is a [`ClientError`]
//! - **Drivers**: single-turn, batch and streaming flows in [`driver`]
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use local_client::{config::ClientConfig, driver::single_turn};
//! use request::{ChatCompletionsRequest, Message};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ClientConfig::from_env()?;
//!     let client = config.client();
//!
//!     let request = ChatCompletionsRequest::builder(&config.model_id)
//!         .message(Message::user("Hello! How are you?"))
//!         .build();
//!
//!     println!("{}", single_turn::complete(&client, &request).await?);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use request::ChatCompletionsRequest;
use response::ChatCompletionsResponse;
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

pub mod config;
pub mod driver;
pub mod error;
pub mod event;
pub mod stream;

pub use error::{ClientError, Result};
pub use event::{ChatEventHandler, ConsoleHandler};
pub use stream::ChunkStream;

/// The chat completions surface the drivers depend on.
#[async_trait]
pub trait ChatCompletions: Send + Sync {
    /// Sends `request` and waits for the complete reply.
    async fn create(&self, request: &ChatCompletionsRequest) -> Result<ChatCompletionsResponse>;

    /// Sends `request` with `stream: true` and returns the reply as a chunk stream.
    async fn create_stream(&self, request: &ChatCompletionsRequest) -> Result<ChunkStream>;
}

/// HTTP client for one OpenAI-compatible server.
#[derive(Clone, Debug)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Client {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Probes the server with `GET {base_url}/models`.
    pub async fn ping(&self) -> Result<()> {
        let url = self.endpoint("models");
        debug!(%url, "pinging model server");

        let response = self.http.get(&url).bearer_auth(&self.api_key).send().await?;
        check_status(response).await?;
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn post(&self, request: &ChatCompletionsRequest) -> Result<reqwest::Response> {
        let url = self.endpoint("chat/completions");
        debug!(
            %url,
            model = %request.model,
            messages = request.messages.len(),
            stream = request.is_stream(),
            "sending chat completions request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        check_status(response).await
    }
}

#[async_trait]
impl ChatCompletions for Client {
    async fn create(&self, request: &ChatCompletionsRequest) -> Result<ChatCompletionsResponse> {
        let response = self.post(request).await?;
        let body = response.text().await?;
        let mut response: ChatCompletionsResponse = serde_json::from_str(&body)?;
        if let Some(err) = response.error.take() {
            error!(%err, "model server returned an error body");
            return Err(err.into());
        }
        debug!(choices = response.choices.len(), "received chat completion");
        Ok(response)
    }

    async fn create_stream(&self, request: &ChatCompletionsRequest) -> Result<ChunkStream> {
        let response = if request.is_stream() {
            self.post(request).await?
        } else {
            let mut request = request.clone();
            request.stream = Some(true);
            self.post(&request).await?
        };
        Ok(stream::decode_chunks(response.bytes_stream()))
    }
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    error!(%status, %body, "model server returned an error");
    Err(ClientError::from_status(status, body))
}

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
