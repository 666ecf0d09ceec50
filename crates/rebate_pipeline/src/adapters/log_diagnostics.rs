// Rust guideline compliant 2026-03-08

//! Logging adapter for the `Diagnostics` port.
//!
//! Logs every per-transaction finding and keeps per-kind counters for the
//! end-of-run summary. Lookup misses and window rejections are routine in
//! real feeds, so they log at `debug`; data defects log at `warn`.

use std::cell::RefCell;

use domain::{DiagnosticEvent, Diagnostics};

/// Per-kind totals accumulated over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiagnosticTotals {
    /// Transactions whose composite key matched no offer.
    pub offer_misses: u64,
    /// Offers missing one of the three validity dates.
    pub incomplete_windows: u64,
    /// Transactions dated outside their offer's window.
    pub outside_window: u64,
    /// Unparseable dates.
    pub malformed_dates: u64,
    /// Unparseable money fields.
    pub invalid_numeric_fields: u64,
}

impl DiagnosticTotals {
    /// Sum of all counters.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.offer_misses
            + self.incomplete_windows
            + self.outside_window
            + self.malformed_dates
            + self.invalid_numeric_fields
    }
}

/// `Diagnostics` adapter that logs each event and tallies totals.
#[derive(Debug, Default)]
pub struct LogDiagnostics {
    /// Interior mutability required because the port takes `&self`.
    totals: RefCell<DiagnosticTotals>,
}

impl LogDiagnostics {
    /// Create a zeroed adapter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the accumulated totals.
    #[must_use]
    pub fn totals(&self) -> DiagnosticTotals {
        *self.totals.borrow()
    }
}

impl Diagnostics for LogDiagnostics {
    fn report(&self, event: DiagnosticEvent) {
        let mut totals = self.totals.borrow_mut();
        match event {
            DiagnosticEvent::OfferMiss { key } => {
                totals.offer_misses += 1;
                tracing::debug!("diagnostics.offer_miss: key={key}");
            }
            DiagnosticEvent::IncompleteWindow { key } => {
                totals.incomplete_windows += 1;
                tracing::debug!("diagnostics.incomplete_window: key={key}");
            }
            DiagnosticEvent::OutsideWindow { key, date, start, end } => {
                totals.outside_window += 1;
                tracing::debug!(
                    "diagnostics.outside_window: key={key} date={date} window={start}..{end}"
                );
            }
            DiagnosticEvent::MalformedDate { key, value } => {
                totals.malformed_dates += 1;
                tracing::warn!("diagnostics.malformed_date: key={key} value={value}");
            }
            DiagnosticEvent::InvalidNumericField { field, value } => {
                totals.invalid_numeric_fields += 1;
                tracing::warn!("diagnostics.invalid_numeric: field={field} value={value}");
            }
        }
    }
}
