// Rust guideline compliant 2026-03-08

//! Concrete adapters for the domain ports used by this binary.

pub mod demo_store;
pub mod json_sink;
pub mod json_store;
pub mod log_diagnostics;
