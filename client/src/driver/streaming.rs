use futures_util::StreamExt;
use request::{ChatCompletionsRequest, Message};
use std::io::{self, Write};
use tracing::error;

use super::SERVER_HINT;
use crate::ChatCompletions;
use crate::error::{ClientError, Result};
use crate::event::{ChatEventHandler, ConsoleHandler};
use crate::stream::ChunkProcessor;

pub const STORY_PROMPT: &str = "Tell me a short story about a robot who learns to paint.";

/// Streams one reply into `handler` and returns the concatenated text.
///
/// Stops at the first error, including one that arrives mid-stream; whatever
/// the handler already received stays delivered.
pub async fn stream_chat(
    client: &dyn ChatCompletions,
    request: &ChatCompletionsRequest,
    handler: &mut dyn ChatEventHandler,
) -> Result<String> {
    let mut chunks = client.create_stream(request).await?;
    let mut processor = ChunkProcessor::new(handler);

    while let Some(chunk) = chunks.next().await {
        processor.process(&chunk?)?;
    }
    Ok(processor.into_content())
}

pub async fn run_streaming_chat<W: Write>(
    client: &dyn ChatCompletions,
    model: &str,
    message: &str,
    out: &mut W,
) -> io::Result<()> {
    writeln!(out, "\n--- Streaming Response ---")?;

    let request = ChatCompletionsRequest::builder(model)
        .message(Message::user(message))
        .stream(true)
        .build();

    let result = {
        let mut handler = ConsoleHandler::new(&mut *out);
        stream_chat(client, &request, &mut handler).await
    };

    match result {
        Ok(_) => writeln!(out, "\n--- End of Stream ---")?,
        Err(ClientError::Io(err)) => return Err(err),
        Err(err) => {
            error!(error = %err, "streaming chat failed");
            writeln!(out, "\nAn error occurred: {err}")?;
            writeln!(out, "{SERVER_HINT}")?;
        }
    }
    Ok(())
}
