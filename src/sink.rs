use std::io::Write;

use crate::error::ScrapeError;
use crate::journal::VoteRecord;

/// Receives each recognized vote exactly once, in document order.
pub trait VoteSink {
    fn emit(&mut self, record: VoteRecord) -> Result<(), ScrapeError>;
}

/// Writes one JSON object per line.
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> VoteSink for JsonLinesSink<W> {
    fn emit(&mut self, record: VoteRecord) -> Result<(), ScrapeError> {
        serde_json::to_writer(&mut self.writer, &record)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    pub records: Vec<VoteRecord>,
}

impl VoteSink for MemorySink {
    fn emit(&mut self, record: VoteRecord) -> Result<(), ScrapeError> {
        self.records.push(record);
        Ok(())
    }
}
