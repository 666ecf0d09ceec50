// Rust guideline compliant 2026-03-08

//! JSON file adapter for the `EnrichedSink` port.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use domain::{EnrichedRecord, EnrichedSink, SinkError};

/// `EnrichedSink` adapter writing the batch as one pretty-printed JSON
/// array, preserving input order.
#[derive(Debug, Clone)]
pub struct JsonFileSink {
    path: PathBuf,
}

impl JsonFileSink {
    /// Create a sink writing to `path` (truncates an existing file).
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl EnrichedSink for JsonFileSink {
    fn write_batch(&self, batch: &[EnrichedRecord]) -> Result<(), SinkError> {
        let file = File::create(&self.path).map_err(|source| SinkError::WriteFailed {
            reason: format!("{}: {source}", self.path.display()),
        })?;
        serde_json::to_writer_pretty(BufWriter::new(file), batch).map_err(|source| {
            SinkError::WriteFailed { reason: format!("{}: {source}", self.path.display()) }
        })?;
        tracing::info!("json_sink.written: records={} path={}", batch.len(), self.path.display());
        Ok(())
    }
}
