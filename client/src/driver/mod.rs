//! The chat flows behind the runnable examples.
//!
//! Each `run_*` function is a terminal error handler: a [`ClientError`] is
//! turned into a diagnostic line on `out` and the function still returns
//! `Ok`. Only failures writing to `out` are propagated.
//!
//! [`ClientError`]: crate::ClientError

pub mod batch;
pub mod single_turn;
pub mod streaming;

pub use batch::{BatchOutcome, BatchRequest, BatchResult, process_batch, run_batch};
pub use single_turn::{complete, run_advanced_chat, run_basic_chat};
pub use streaming::{run_streaming_chat, stream_chat};

const SERVER_HINT: &str =
    "Please ensure the local model server is running and the model is available.";
