//! Server-sent event decoding for streamed chat completions.

use async_stream::stream;
use futures_util::stream::{BoxStream, Stream, StreamExt};
use response::{ChatCompletionsChunk, Delta};
use std::io;
use tracing::{debug, trace};

use crate::error::{ClientError, Result};
use crate::event::ChatEventHandler;

const DONE_MESSAGE: &str = "[DONE]";

/// Chunks in arrival order. The stream ends after `data: [DONE]`, at end of
/// body, or right after the first error it yields.
pub type ChunkStream = BoxStream<'static, Result<ChatCompletionsChunk>>;

/// Non-empty `choices[0].delta.content` fragments in arrival order.
pub type FragmentStream = BoxStream<'static, Result<String>>;

#[derive(Debug, PartialEq)]
pub enum SseData {
    Json(String),
    Done,
}

/// Splits a byte stream into `data:` payloads, carrying partial lines over
/// between network chunks.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: Vec<u8>,
}

impl SseDecoder {
    pub fn push(&mut self, bytes: &[u8]) -> Vec<SseData> {
        self.buffer.extend_from_slice(bytes);

        let mut data = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline).collect();
            if let Some(payload) = parse_line(&line) {
                data.push(payload);
            }
        }
        data
    }

    /// Flushes a final line that arrived without a trailing newline.
    pub fn finish(&mut self) -> Option<SseData> {
        let line = std::mem::take(&mut self.buffer);
        parse_line(&line)
    }
}

fn parse_line(line: &[u8]) -> Option<SseData> {
    let line = String::from_utf8_lossy(line);
    let line = line.trim_end_matches(['\r', '\n']);

    // Comments, `event:` and `id:` lines carry nothing we read.
    let payload = line.strip_prefix("data:")?;
    let payload = payload.strip_prefix(' ').unwrap_or(payload);

    if payload.is_empty() {
        None
    } else if payload == DONE_MESSAGE {
        Some(SseData::Done)
    } else {
        Some(SseData::Json(payload.to_string()))
    }
}

/// Decodes one `data:` payload. An `error` event becomes [`ClientError::Server`].
fn parse_chunk(payload: &str) -> Result<ChatCompletionsChunk> {
    trace!(payload, "stream chunk");
    let mut chunk: ChatCompletionsChunk = serde_json::from_str(payload).map_err(|e| {
        ClientError::MalformedResponse(format!("invalid stream chunk: {e}: {payload}"))
    })?;

    match chunk.error.take() {
        Some(err) => Err(err.into()),
        None => Ok(chunk),
    }
}

fn failed(err: impl Into<ClientError>) -> Result<ChatCompletionsChunk> {
    Err(err.into())
}

/// Decodes an SSE byte stream into chat completion chunks.
pub fn decode_chunks<S, B, E>(bytes: S) -> ChunkStream
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<ClientError> + Send + 'static,
{
    let chunks = stream! {
        let mut bytes = Box::pin(bytes);
        let mut decoder = SseDecoder::default();

        while let Some(item) = bytes.next().await {
            let item = match item {
                Ok(item) => item,
                Err(err) => {
                    yield failed(err);
                    return;
                }
            };

            for data in decoder.push(item.as_ref()) {
                match data {
                    SseData::Done => {
                        debug!("stream finished");
                        return;
                    }
                    SseData::Json(payload) => {
                        let chunk = parse_chunk(&payload);
                        let is_err = chunk.is_err();
                        yield chunk;
                        if is_err {
                            return;
                        }
                    }
                }
            }
        }

        if let Some(SseData::Json(payload)) = decoder.finish() {
            yield parse_chunk(&payload);
        }
        debug!("stream body ended");
    };

    chunks.boxed()
}

/// Narrows a chunk stream to its non-empty text fragments.
pub fn content_fragments(chunks: ChunkStream) -> FragmentStream {
    chunks
        .filter_map(|chunk| async move {
            match chunk {
                Ok(chunk) => chunk
                    .delta_content()
                    .filter(|content| !content.is_empty())
                    .map(|content| Ok(content.to_string())),
                Err(err) => Some(Err(err)),
            }
        })
        .boxed()
}

/// Feeds chunks to a [`ChatEventHandler`] and keeps the concatenated text.
pub struct ChunkProcessor<'a> {
    handler: &'a mut dyn ChatEventHandler,
    content: String,
}

impl<'a> ChunkProcessor<'a> {
    pub fn new(handler: &'a mut dyn ChatEventHandler) -> Self {
        Self {
            handler,
            content: String::new(),
        }
    }

    pub fn process(&mut self, chunk: &ChatCompletionsChunk) -> io::Result<()> {
        if let Some(usage) = &chunk.usage {
            self.handler.on_usage(usage)?;
        }

        let Some(choice) = chunk.choices.first() else {
            return Ok(());
        };

        match &choice.delta {
            Some(Delta::Role { role }) => self.handler.on_role(role)?,
            Some(Delta::Content { content }) if !content.is_empty() => {
                self.content.push_str(content);
                self.handler.on_content(content)?;
            }
            Some(Delta::Reasoning { reasoning_content }) => {
                self.handler.on_reasoning(reasoning_content)?
            }
            _ => {}
        }

        if let Some(finish_reason) = &choice.finish_reason {
            self.handler.on_finish(finish_reason)?;
        }
        Ok(())
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn into_content(self) -> String {
        self.content
    }
}
