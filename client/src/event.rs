use response::Usage;
use std::io::{self, Write};
use tracing::debug;

/// Callbacks fired while a streamed reply is consumed.
pub trait ChatEventHandler {
    fn on_content(&mut self, content: &str) -> io::Result<()>;

    fn on_role(&mut self, _role: &str) -> io::Result<()> {
        Ok(())
    }

    fn on_reasoning(&mut self, _reasoning: &str) -> io::Result<()> {
        Ok(())
    }

    fn on_finish(&mut self, _reason: &str) -> io::Result<()> {
        Ok(())
    }

    fn on_usage(&mut self, _usage: &Usage) -> io::Result<()> {
        Ok(())
    }
}

/// Writes each content fragment as it arrives and flushes immediately.
pub struct ConsoleHandler<'a, W: Write> {
    out: &'a mut W,
}

impl<'a, W: Write> ConsoleHandler<'a, W> {
    pub fn new(out: &'a mut W) -> Self {
        Self { out }
    }
}

impl<W: Write> ChatEventHandler for ConsoleHandler<'_, W> {
    fn on_content(&mut self, content: &str) -> io::Result<()> {
        write!(self.out, "{content}")?;
        self.out.flush()
    }

    fn on_finish(&mut self, reason: &str) -> io::Result<()> {
        debug!(finish_reason = reason, "stream finished");
        Ok(())
    }

    fn on_usage(&mut self, usage: &Usage) -> io::Result<()> {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            total_tokens = usage.total_tokens,
            "usage"
        );
        Ok(())
    }
}
