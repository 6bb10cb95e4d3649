use request::{ChatCompletionsRequest, Message};
use std::io::{self, Write};
use tracing::error;

use super::SERVER_HINT;
use crate::ChatCompletions;
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

pub const BASIC_PROMPT: &str = "Hello! How are you?";
pub const ADVANCED_PROMPT: &str = "What are the benefits of using a config class?";

/// Sends one request and returns `choices[0].message.content`.
pub async fn complete(
    client: &dyn ChatCompletions,
    request: &ChatCompletionsRequest,
) -> Result<String> {
    let response = client.create(request).await?;
    response.content().map(str::to_string).ok_or_else(|| {
        ClientError::MalformedResponse("response has no choices[0].message.content".to_string())
    })
}

/// Single user turn against `model` with server-side sampling defaults.
pub async fn run_basic_chat<W: Write>(
    client: &dyn ChatCompletions,
    model: &str,
    prompt: &str,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "Sending request to local model...")?;

    let request = ChatCompletionsRequest::builder(model)
        .message(Message::user(prompt))
        .build();

    match complete(client, &request).await {
        Ok(content) => {
            writeln!(out, "Response from model:")?;
            writeln!(out, "{content}")?;
        }
        Err(err) => {
            error!(error = %err, "basic chat failed");
            writeln!(out, "An error occurred: {err}")?;
            writeln!(out, "{SERVER_HINT}")?;
        }
    }
    Ok(())
}

/// Single user turn that also sends the configured temperature and token limit.
pub async fn run_advanced_chat<W: Write>(
    client: &dyn ChatCompletions,
    config: &ClientConfig,
    prompt: &str,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "--- Running Chat with Advanced Configuration ---")?;
    writeln!(
        out,
        "Model: {}, Temperature: {}, Max Tokens: {}",
        config.model_id, config.temperature, config.max_tokens
    )?;

    let request = ChatCompletionsRequest::builder(&config.model_id)
        .message(Message::user(prompt))
        .temperature(Some(config.temperature))
        .max_tokens(Some(config.max_tokens))
        .build();

    match complete(client, &request).await {
        Ok(content) => {
            writeln!(out, "\nResponse:")?;
            writeln!(out, "{content}")?;
        }
        Err(err) => {
            error!(error = %err, "advanced chat failed");
            writeln!(out, "\nAn error occurred: {err}")?;
        }
    }
    Ok(())
}
