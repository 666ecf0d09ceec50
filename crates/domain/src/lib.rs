// Rust guideline compliant 2026-03-07

//! Shared domain types for the sell-out rebate pipeline.
//!
//! Defines the input records (`SellOutRecord`, `Product`, `Customer`,
//! `Offer`), the derived [`Enrichment`] fields, field-coercion helpers, the
//! error types, and the hexagonal ports: [`CollectionStore`],
//! [`EnrichedSink`], and [`Diagnostics`]. All pipeline components depend on
//! this crate; no other workspace crate is imported here.

mod errors;
mod fields;
mod index;
mod ports;
mod records;

pub use errors::{FieldError, SinkError, StoreError};
pub use fields::{DEFAULT_VARIANT_SUFFIX_LEN, base_code, numeric_lenient, numeric_or_default};
pub use index::ReferenceIndex;
pub use ports::{CollectionStore, DiagnosticEvent, Diagnostics, EnrichedSink};
pub use records::{
    CostConditionValue, Customer, EnrichedRecord, Enrichment, InputCollections, Offer, Product,
    REPLACEMENT_COST_BASIS, SellOutRecord,
};
