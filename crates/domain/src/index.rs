// Rust guideline compliant 2026-03-07

//! Immutable lookup maps shared by every enrichment step.

use std::collections::HashMap;

use crate::records::{Customer, Offer, Product};

/// The three reference lookups, built once from immutable snapshots before
/// any transaction is processed and never mutated afterwards.
///
/// Keys are the natural business keys: products by base reference code,
/// customers by branch identifier, offers by composite key. Construction
/// (including the last-wins duplicate handling) lives in the `indexer`
/// crate; this type only carries the result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceIndex {
    /// Product catalog keyed by base code.
    pub products: HashMap<String, Product>,
    /// Customers keyed by branch identifier.
    pub customers: HashMap<String, Customer>,
    /// Offers keyed by composite key (payment channel + base code).
    pub offers: HashMap<String, Offer>,
}

impl ReferenceIndex {
    /// Look up a product by base code.
    #[must_use]
    pub fn product(&self, base_code: &str) -> Option<&Product> {
        self.products.get(base_code)
    }

    /// Look up a customer by branch identifier.
    #[must_use]
    pub fn customer(&self, branch_id: &str) -> Option<&Customer> {
        self.customers.get(branch_id)
    }

    /// Look up an offer by composite key.
    #[must_use]
    pub fn offer(&self, key: &str) -> Option<&Offer> {
        self.offers.get(key)
    }
}
