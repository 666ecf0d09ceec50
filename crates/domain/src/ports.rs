// Rust guideline compliant 2026-03-07

//! Hexagonal ports of the rebate pipeline.
//!
//! Implementations live in the binary crate (JSON file adapters, the demo
//! store, the logging diagnostics sink); components depend exclusively on
//! these traits, never on a concrete adapter. All ports are synchronous:
//! the pipeline is a single-pass batch transform with no suspension points.

use crate::errors::{SinkError, StoreError};
use crate::records::{EnrichedRecord, InputCollections};

/// Source of the four input collections.
pub trait CollectionStore {
    /// Load all four collections as immutable snapshots.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::MissingInput`] when a collection cannot be
    /// obtained and [`StoreError::Malformed`] when it cannot be decoded.
    /// Either aborts the batch before any transaction work begins.
    fn load(&self) -> Result<InputCollections, StoreError>;
}

/// Destination for the enriched output batch.
pub trait EnrichedSink {
    /// Write the full enriched batch, same cardinality and order as input.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::WriteFailed`] when the batch cannot be written.
    fn write_batch(&self, batch: &[EnrichedRecord]) -> Result<(), SinkError>;
}

/// A per-transaction, non-fatal finding raised during enrichment.
///
/// These are diagnostics, not errors: the affected record stays partially
/// enriched and the batch continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticEvent {
    /// No offer exists for the transaction's composite key.
    OfferMiss {
        /// The composite key that missed.
        key: String,
    },
    /// The transaction or its offer is missing one of the three dates
    /// needed for the validity check.
    IncompleteWindow {
        /// Composite key of the matched offer.
        key: String,
    },
    /// The transaction date falls outside the offer's effective window.
    OutsideWindow {
        /// Composite key of the matched offer.
        key: String,
        /// Transaction date.
        date: String,
        /// Window start, inclusive.
        start: String,
        /// Window end, inclusive.
        end: String,
    },
    /// A date failed to parse as `MM/DD/YYYY`.
    MalformedDate {
        /// Composite key of the matched offer.
        key: String,
        /// The offending raw value.
        value: String,
    },
    /// A financial field could not be coerced to a number.
    InvalidNumericField {
        /// Business name of the field.
        field: String,
        /// The offending raw value, rendered for the log.
        value: String,
    },
}

/// Best-effort delivery of per-transaction diagnostics.
///
/// Infallible by contract: reporting must never abort the batch.
pub trait Diagnostics {
    /// Report one finding.
    fn report(&self, event: DiagnosticEvent);
}
