// Rust guideline compliant 2026-03-07

//! Reference Index Builder -- turns the product, customer, and offer
//! collections into the three lookup maps the enricher consults.
//!
//! Entry point: [`build`]. Insertion is ordered and last-wins: when a
//! source collection carries duplicate business keys, the later record
//! silently replaces the earlier one. That mirrors the upstream system and
//! is flagged per collision with a `warn` log, since nothing upstream
//! validates key uniqueness.

use domain::{Customer, Offer, Product, ReferenceIndex, base_code};
use std::collections::HashMap;

/// Build the three reference lookups from immutable snapshots.
///
/// Products are keyed by base code (reference code minus the trailing
/// `variant_suffix_len` characters), customers by branch identifier, and
/// offers by composite key. Records without a usable key are skipped with
/// a warning; duplicate keys follow the last-wins contract.
#[must_use]
pub fn build(
    products: Vec<Product>,
    customers: Vec<Customer>,
    offers: Vec<Offer>,
    variant_suffix_len: usize,
) -> ReferenceIndex {
    let mut index = ReferenceIndex::default();

    for product in products {
        match product.product_code.as_deref() {
            Some(code) => {
                let key = base_code(code, variant_suffix_len).to_owned();
                insert_last_wins(&mut index.products, "products", key, product);
            }
            None => tracing::warn!("indexer.missing_key: collection=products"),
        }
    }

    for customer in customers {
        match customer.pharmacy_number.clone() {
            Some(key) => insert_last_wins(&mut index.customers, "customers", key, customer),
            None => tracing::warn!("indexer.missing_key: collection=customers"),
        }
    }

    for offer in offers {
        match offer.key.clone() {
            Some(key) => insert_last_wins(&mut index.offers, "offers", key, offer),
            None => tracing::warn!("indexer.missing_key: collection=offers"),
        }
    }

    tracing::debug!(
        "indexer.built: products={} customers={} offers={}",
        index.products.len(),
        index.customers.len(),
        index.offers.len()
    );
    index
}

/// Ordered map insert with the last-wins duplicate contract.
///
/// Source collections are folded in input order, so on collision the later
/// record replaces the earlier one. Each replacement is logged: duplicate
/// keys are a latent upstream ambiguity, not a validated invariant.
fn insert_last_wins<T>(
    map: &mut HashMap<String, T>,
    collection: &'static str,
    key: String,
    value: T,
) {
    if map.insert(key.clone(), value).is_some() {
        tracing::warn!("indexer.duplicate_key: collection={collection} key={key} (last wins)");
    }
}

#[cfg(test)]
mod tests {
    use super::build;
    use domain::{Customer, Offer, Product, REPLACEMENT_COST_BASIS};
    use serde_json::json;

    fn product(code: &str, replacement_cost: f64) -> Product {
        serde_json::from_value(json!({
            "Producto Código": code,
            "Costo de Reposicion": replacement_cost
        }))
        .unwrap()
    }

    fn customer(branch: &str, applies: &str) -> Customer {
        serde_json::from_value(json!({
            "NUMERO FARMACIA": branch,
            "Aplica": applies,
            "RETAIL PAGO": "X"
        }))
        .unwrap()
    }

    fn offer(key: &str, cap: f64) -> Offer {
        serde_json::from_value(json!({"Llave": key, "CAP": cap})).unwrap()
    }

    // IDX-T01: products key by base code, customers by branch, offers by
    // composite key.
    #[test]
    fn keys_by_business_keys() {
        let index = build(
            vec![product("12345601", 100.0)],
            vec![customer("A1", "Si")],
            vec![offer("X123456", 0.1)],
            2,
        );
        assert!(index.product("123456").is_some());
        assert!(index.product("12345601").is_none(), "full code must not be a key");
        assert!(index.customer("A1").is_some());
        assert!(index.offer("X123456").is_some());
    }

    // IDX-T02: duplicate keys follow last-wins.
    #[test]
    fn duplicate_keys_last_wins() {
        let index = build(
            vec![product("12345601", 100.0), product("12345602", 250.0)],
            vec![customer("A1", "No"), customer("A1", "Si")],
            vec![],
            2,
        );
        // Both products collapse to base code "123456"; the later record wins.
        assert_eq!(index.products.len(), 1);
        assert_eq!(
            index.product("123456").unwrap().basis(REPLACEMENT_COST_BASIS),
            Some(&json!(250.0))
        );
        assert_eq!(index.customer("A1").unwrap().applies.as_deref(), Some("Si"));
    }

    // IDX-T03: records without a key are skipped, not indexed under "".
    #[test]
    fn missing_keys_are_skipped() {
        let index = build(
            vec![Product::default()],
            vec![Customer::default()],
            vec![Offer::default()],
            2,
        );
        assert!(index.products.is_empty());
        assert!(index.customers.is_empty());
        assert!(index.offers.is_empty());
    }

    // IDX-T04: a short product code still indexes (under the empty base).
    #[test]
    fn short_product_code_collapses_to_empty_base() {
        let index = build(vec![product("01", 10.0)], vec![], vec![], 2);
        assert!(index.product("").is_some());
    }
}
