use std::io::{self, Write};

use feed_search_core::SearchResult;
use search_logging::search_info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

/// Receives drained results on the dispatching thread, one call per result.
pub trait ResultSink {
    fn display(&mut self, result: &SearchResult) -> Result<(), SinkError>;
}

/// Logs each result at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogResultSink;

impl ResultSink for LogResultSink {
    fn display(&mut self, result: &SearchResult) -> Result<(), SinkError> {
        search_info!("{}", result);
        Ok(())
    }
}

/// Writes each result as a `field:\ncontent\n\n` block.
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> ResultSink for WriterSink<W> {
    fn display(&mut self, result: &SearchResult) -> Result<(), SinkError> {
        writeln!(self.writer, "{result}")?;
        self.writer.flush()?;
        Ok(())
    }
}
