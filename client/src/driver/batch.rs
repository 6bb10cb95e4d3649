use request::{ChatCompletionsRequest, Message};
use std::fmt;
use std::io::{self, Write};
use tracing::{info, warn};

use super::single_turn::complete;
use crate::ChatCompletions;

#[derive(Clone, Debug)]
pub struct BatchRequest {
    pub id: String,
    pub messages: Vec<Message>,
    pub max_tokens: Option<u32>,
}

impl BatchRequest {
    pub fn new(id: impl Into<String>, messages: Vec<Message>) -> Self {
        Self {
            id: id.into(),
            messages,
            max_tokens: None,
        }
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum BatchOutcome {
    Completed(String),
    Failed(String),
}

impl BatchOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, BatchOutcome::Failed(_))
    }
}

impl fmt::Display for BatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchOutcome::Completed(content) => write!(f, "{content}"),
            BatchOutcome::Failed(err) => write!(f, "Error: {err}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct BatchResult {
    pub id: String,
    pub outcome: BatchOutcome,
}

/// Runs `requests` one after another and returns one result per request, in
/// the same order. A failed request is recorded and the batch moves on.
pub async fn process_batch(
    client: &dyn ChatCompletions,
    model: &str,
    default_max_tokens: u32,
    requests: &[BatchRequest],
) -> Vec<BatchResult> {
    let total = requests.len();
    info!(total, "starting batch processing");

    let mut results = Vec::with_capacity(total);
    for (i, request) in requests.iter().enumerate() {
        info!(id = %request.id, "processing request {}/{}", i + 1, total);
        results.push(process_request(client, model, default_max_tokens, request).await);
    }

    info!(total, "batch processing complete");
    results
}

async fn process_request(
    client: &dyn ChatCompletions,
    model: &str,
    default_max_tokens: u32,
    request: &BatchRequest,
) -> BatchResult {
    let chat_request = ChatCompletionsRequest::builder(model)
        .messages(request.messages.iter().cloned())
        .max_tokens(Some(request.max_tokens.unwrap_or(default_max_tokens)))
        .build();

    let outcome = match complete(client, &chat_request).await {
        Ok(content) => BatchOutcome::Completed(content),
        Err(err) => {
            warn!(id = %request.id, error = %err, "error processing request");
            BatchOutcome::Failed(err.to_string())
        }
    };

    BatchResult {
        id: request.id.clone(),
        outcome,
    }
}

/// The three requests the batch example submits.
pub fn sample_requests() -> Vec<BatchRequest> {
    vec![
        BatchRequest::new("req_001", vec![Message::user("What is the capital of France?")]),
        BatchRequest::new(
            "req_002",
            vec![Message::user(
                "Summarize the plot of 'Moby Dick' in one sentence.",
            )],
        )
        .max_tokens(50),
        BatchRequest::new(
            "req_003",
            vec![Message::user("Translate 'hello world' to Spanish.")],
        ),
    ]
}

/// Like [`process_batch`], but reports progress and per-item failures on `out`
/// before printing every result.
pub async fn run_batch<W: Write>(
    client: &dyn ChatCompletions,
    model: &str,
    default_max_tokens: u32,
    requests: &[BatchRequest],
    out: &mut W,
) -> io::Result<Vec<BatchResult>> {
    let total = requests.len();
    writeln!(out, "--- Starting Batch Processing for {total} requests ---")?;

    let mut results = Vec::with_capacity(total);
    for (i, request) in requests.iter().enumerate() {
        writeln!(
            out,
            "Processing request {}/{} (ID: {})...",
            i + 1,
            total,
            request.id
        )?;
        let result = process_request(client, model, default_max_tokens, request).await;
        if let BatchOutcome::Failed(err) = &result.outcome {
            writeln!(out, "Error processing request {}: {err}", request.id)?;
        }
        results.push(result);
    }
    writeln!(out, "--- Batch Processing Complete ---")?;

    writeln!(out, "\n--- Batch Results ---")?;
    for result in &results {
        writeln!(out, "Request ID: {}\nResponse: {}\n", result.id, result.outcome)?;
    }
    Ok(results)
}
