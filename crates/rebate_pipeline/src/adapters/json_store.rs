// Rust guideline compliant 2026-03-08

//! JSON file adapter for the `CollectionStore` port.
//!
//! Loads the four input collections from flat JSON arrays. Offers come
//! either precompiled or as raw negotiation lines that the offer compiler
//! folds on load (sell-out side only -- this pipeline prices sell-out).

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use domain::{CollectionStore, InputCollections, StoreError};
use offers::NegotiationRecord;
use serde::de::DeserializeOwned;

/// Where the offers collection comes from.
#[derive(Debug, Clone)]
pub enum OfferSource {
    /// A JSON array of ready-made offer records.
    Precompiled(PathBuf),
    /// A JSON array of raw negotiation lines, compiled on load.
    Negotiations(PathBuf),
}

/// `CollectionStore` adapter backed by JSON files on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    transactions: PathBuf,
    products: PathBuf,
    customers: PathBuf,
    offers: OfferSource,
}

impl JsonFileStore {
    /// Create a store reading the given paths.
    #[must_use]
    pub fn new(
        transactions: PathBuf,
        products: PathBuf,
        customers: PathBuf,
        offers: OfferSource,
    ) -> Self {
        Self { transactions, products, customers, offers }
    }
}

impl CollectionStore for JsonFileStore {
    fn load(&self) -> Result<InputCollections, StoreError> {
        let transactions = read_collection(&self.transactions, "transactions")?;
        let products = read_collection(&self.products, "products")?;
        let customers = read_collection(&self.customers, "customers")?;
        let offers = match &self.offers {
            OfferSource::Precompiled(path) => read_collection(path, "offers")?,
            OfferSource::Negotiations(path) => {
                let negotiations: Vec<NegotiationRecord> =
                    read_collection(path, "negotiations")?;
                let compiled = offers::compile(negotiations);
                tracing::info!(
                    "json_store.offers_compiled: sell_out={} sell_in={}",
                    compiled.sell_out.len(),
                    compiled.sell_in.len()
                );
                compiled.sell_out
            }
        };

        tracing::info!(
            "json_store.loaded: transactions={} products={} customers={} offers={}",
            transactions.len(),
            products.len(),
            customers.len(),
            offers.len()
        );
        Ok(InputCollections { transactions, products, customers, offers })
    }
}

/// Read one collection as a JSON array of records.
fn read_collection<T: DeserializeOwned>(
    path: &Path,
    collection: &'static str,
) -> Result<Vec<T>, StoreError> {
    let file = File::open(path).map_err(|source| StoreError::MissingInput {
        collection,
        reason: format!("{}: {source}", path.display()),
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| StoreError::Malformed {
        collection,
        reason: format!("{}: {source}", path.display()),
    })
}

#[cfg(test)]
mod tests {
    use super::{JsonFileStore, OfferSource};
    use domain::{CollectionStore as _, StoreError};
    use std::io::Write as _;
    use std::path::PathBuf;

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("rebate-json-store-{name}"));
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    // JST-T01: a missing file maps to MissingInput naming the collection.
    #[test]
    fn missing_file_is_missing_input() {
        let missing = PathBuf::from("/nonexistent/rebate-pipeline/sell_out.json");
        let store = JsonFileStore::new(
            missing.clone(),
            missing.clone(),
            missing.clone(),
            OfferSource::Precompiled(missing),
        );
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::MissingInput { collection: "transactions", .. }));
    }

    // JST-T02: invalid JSON maps to Malformed.
    #[test]
    fn invalid_json_is_malformed() {
        let transactions = temp_file("bad-transactions.json", "not json at all");
        let store = JsonFileStore::new(
            transactions.clone(),
            transactions.clone(),
            transactions.clone(),
            OfferSource::Precompiled(transactions),
        );
        let err = store.load().unwrap_err();
        assert!(matches!(err, StoreError::Malformed { collection: "transactions", .. }));
    }

    // JST-T03: the four collections load, with negotiations compiled into
    // sell-out offers.
    #[test]
    fn loads_and_compiles_negotiations() {
        let transactions = temp_file(
            "transactions.json",
            r#"[{"Producto Código": "12345601", "ACCOUNT_NUMBER": "A1", "Fecha": "03/15/2024"}]"#,
        );
        let products = temp_file(
            "products.json",
            r#"[{"Producto Código": "12345601", "Costo de Reposicion": 100.0}]"#,
        );
        let customers = temp_file(
            "customers.json",
            r#"[{"NUMERO FARMACIA": "A1", "Aplica": "Si", "RETAIL PAGO": "X"}]"#,
        );
        let negotiations = temp_file(
            "negotiations.json",
            r#"[
                {"Nombre alias": "X", "Sivec": "123456", "Folio caso": 1,
                 "Tipo condicion": "SELL-OUT", "Oferta costo": 0.1},
                {"Nombre alias": "X", "Sivec": "123456", "Folio caso": 2,
                 "Tipo condicion": "SELL-IN", "Oferta costo": 0.2}
            ]"#,
        );

        let store = JsonFileStore::new(
            transactions,
            products,
            customers,
            OfferSource::Negotiations(negotiations),
        );
        let collections = store.load().unwrap();
        assert_eq!(collections.transactions.len(), 1);
        assert_eq!(collections.products.len(), 1);
        assert_eq!(collections.customers.len(), 1);
        // Only the sell-out side feeds this pipeline.
        assert_eq!(collections.offers.len(), 1);
        assert_eq!(collections.offers[0].key.as_deref(), Some("X123456"));
    }
}
