// Rust guideline compliant 2026-03-07

//! Error types shared across pipeline components.
//!
//! Batch-level failures ([`StoreError`], [`SinkError`]) abort the run;
//! [`FieldError`] is per-record and only ever degrades a single transaction.

/// Per-record field failures raised while enriching one transaction.
///
/// Never fatal: callers report a [`crate::DiagnosticEvent`] and continue with
/// the next record, leaving the current one partially enriched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    /// A date string did not match the `MM/DD/YYYY` wire format.
    #[error("malformed date '{value}': expected MM/DD/YYYY")]
    MalformedDate {
        /// The offending raw value.
        value: String,
    },
    /// A financial field could not be coerced to a number.
    #[error("field '{field}' is not numeric: '{value}'")]
    InvalidNumericField {
        /// Business name of the field (e.g. `"CAP"`).
        field: String,
        /// The offending raw value, rendered for the log.
        value: String,
    },
}

/// Errors from the [`crate::CollectionStore`] port.
///
/// Any variant is a batch-level precondition failure: the run stops before
/// a single transaction is enriched.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A required input collection could not be obtained at all.
    #[error("missing input collection '{collection}': {reason}")]
    MissingInput {
        /// Which of the four collections (`transactions`, `products`, ...).
        collection: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },
    /// A collection was found but its content could not be decoded.
    #[error("input collection '{collection}' is malformed: {reason}")]
    Malformed {
        /// Which of the four collections (`transactions`, `products`, ...).
        collection: &'static str,
        /// Human-readable description of the problem.
        reason: String,
    },
}

/// Errors from the [`crate::EnrichedSink`] port.
#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    /// The enriched batch could not be written.
    #[error("failed to write enriched output: {reason}")]
    WriteFailed {
        /// Human-readable description of the problem.
        reason: String,
    },
}
