// Rust guideline compliant 2026-03-07

//! Input records and the derived enrichment fields.
//!
//! Records keep their natural business column names on the wire via
//! `#[serde(rename)]`; columns the pipeline does not compute on pass
//! through untouched in a flattened `extra` map. Derived fields are all
//! optional and serialize only when actually computed: absent means "no
//! rebate applies", never zero.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::fields::de_opt_key;

/// Name of the product valuation basis used for the per-unit valuation
/// attached in enrichment step 1.
pub const REPLACEMENT_COST_BASIS: &str = "Costo de Reposicion";

// ---------------------------------------------------------------------------
// Input records
// ---------------------------------------------------------------------------

/// One raw point-of-sale line as handed to the pipeline.
///
/// Only the columns the enrichment computes on are modeled; every other
/// source column rides along in `extra` and is emitted unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SellOutRecord {
    /// Full product reference code, base code plus variant suffix.
    #[serde(
        rename = "Producto Código",
        default,
        deserialize_with = "de_opt_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_code: Option<String>,
    /// Branch/outlet identifier of the selling pharmacy.
    #[serde(
        rename = "ACCOUNT_NUMBER",
        default,
        deserialize_with = "de_opt_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub account_number: Option<String>,
    /// Transaction date, `MM/DD/YYYY`.
    #[serde(
        rename = "Fecha",
        default,
        deserialize_with = "de_opt_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub date: Option<String>,
    /// Units invoiced on this line. Raw: number, numeric string, or null.
    #[serde(rename = "Pzas Facturadas", default, skip_serializing_if = "Option::is_none")]
    pub quantity_invoiced: Option<Value>,
    /// Invoice-level discount amount. Raw: number, numeric string, or null.
    #[serde(rename = "Descuento Factura", default, skip_serializing_if = "Option::is_none")]
    pub invoice_discount: Option<Value>,
    /// Fixed-cost amount for the `Costo Fijo` policy.
    #[serde(rename = "Costo Fijo", default, skip_serializing_if = "Option::is_none")]
    pub fixed_cost: Option<Value>,
    /// Passthrough for every unmodeled source column.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Product catalog entry, looked up by base reference code.
///
/// Valuation bases (`Costo de Reposicion`, `Costo Promedio`, ...) are open
/// columns referenced generically by name from an offer's `Nombre regla`,
/// so they live in the flattened map rather than as typed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// Full product reference code as listed in the catalog.
    #[serde(
        rename = "Producto Código",
        default,
        deserialize_with = "de_opt_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_code: Option<String>,
    /// Named valuation bases plus any other catalog columns.
    #[serde(flatten)]
    pub bases: Map<String, Value>,
}

impl Product {
    /// Look up a valuation basis by its business name.
    #[must_use]
    pub fn basis(&self, name: &str) -> Option<&Value> {
        self.bases.get(name)
    }
}

/// Customer (pharmacy branch) eligibility entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Branch/outlet identifier, the customer index key.
    #[serde(
        rename = "NUMERO FARMACIA",
        default,
        deserialize_with = "de_opt_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub pharmacy_number: Option<String>,
    /// Eligibility flag (`"Si"` / `"No"`).
    #[serde(rename = "Aplica", default, skip_serializing_if = "Option::is_none")]
    pub applies: Option<String>,
    /// Payment-channel indicator, the leading segment of the offer key.
    #[serde(rename = "RETAIL PAGO", default, skip_serializing_if = "Option::is_none")]
    pub retail_payment: Option<String>,
    /// Passthrough for every unmodeled source column.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Promotional offer terms, looked up by composite key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Composite key: payment-channel indicator + base product code.
    #[serde(
        rename = "Llave",
        default,
        deserialize_with = "de_opt_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub key: Option<String>,
    /// Capital-allowance rate. Raw: number, numeric string, or null.
    #[serde(rename = "CAP", default, skip_serializing_if = "Option::is_none")]
    pub cap_rate: Option<Value>,
    /// Offer rate. Raw: number, numeric string, or null.
    #[serde(rename = "Oferta", default, skip_serializing_if = "Option::is_none")]
    pub offer_rate: Option<Value>,
    /// Name of the product valuation basis this offer prices against.
    #[serde(rename = "Nombre regla", default, skip_serializing_if = "Option::is_none")]
    pub rule_name: Option<String>,
    /// Costing-policy name (see the cost-condition evaluator).
    #[serde(rename = "Tipo condicion costo", default, skip_serializing_if = "Option::is_none")]
    pub cost_policy: Option<String>,
    /// Fixed-cost amount carried by the negotiation, if any.
    #[serde(rename = "Costo fijo", default, skip_serializing_if = "Option::is_none")]
    pub fixed_cost: Option<Value>,
    /// First day of the effective window, `MM/DD/YYYY`, inclusive.
    #[serde(
        rename = "Fecha inicio vigencia",
        default,
        deserialize_with = "de_opt_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub window_start: Option<String>,
    /// Last day of the effective window, `MM/DD/YYYY`, inclusive.
    #[serde(
        rename = "Fecha fin vigencia",
        default,
        deserialize_with = "de_opt_key",
        skip_serializing_if = "Option::is_none"
    )]
    pub window_end: Option<String>,
    /// Passthrough for every unmodeled source column (compiled offers carry
    /// `Ponderado`, `Nivel`, etc. here).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The four input collections, loaded as immutable snapshots before any
/// transaction is processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputCollections {
    /// Raw sell-out lines, in source order.
    pub transactions: Vec<SellOutRecord>,
    /// Product catalog.
    pub products: Vec<Product>,
    /// Customer eligibility list.
    pub customers: Vec<Customer>,
    /// Promotional offers.
    pub offers: Vec<Offer>,
}

// ---------------------------------------------------------------------------
// Derived fields
// ---------------------------------------------------------------------------

/// Result of the cost-condition evaluator.
///
/// The `Monto Fijo` and unknown-policy branches are inherited placeholder
/// behavior; they are modeled as explicit non-numeric variants instead of
/// the sentinel strings the upstream system emitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value")]
pub enum CostConditionValue {
    /// A computed monetary amount.
    Computed(f64),
    /// Policy is recognized but its computation was never specified.
    Unimplemented {
        /// The policy name that hit the placeholder branch.
        policy: String,
    },
    /// Policy name not recognized, or no policy on the offer.
    Unknown {
        /// The unrecognized policy name, if one was present.
        policy: Option<String>,
    },
}

/// Fields derived for one transaction by the enrichment pipeline.
///
/// Every field is optional and independent of record order; the monetary
/// fields form a strict dependency chain (total cost -> allowance ->
/// adjusted cost -> offer value -> total benefit) and a field is only ever
/// set when all of its inputs were present.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Enrichment {
    /// Base product code resolved from the transaction's reference code.
    #[serde(rename = "EAN", skip_serializing_if = "Option::is_none")]
    pub ean: Option<String>,
    /// Per-unit valuation from the replacement-cost basis, when readable.
    #[serde(rename = "Valuacion Unitaria", skip_serializing_if = "Option::is_none")]
    pub unit_valuation: Option<f64>,
    /// Customer eligibility flag, defaulted to `"No"` for unknown branches.
    #[serde(rename = "Validacion Cliente", skip_serializing_if = "Option::is_none")]
    pub customer_validation: Option<String>,
    /// Composite offer key (payment channel + EAN).
    #[serde(rename = "Llave", skip_serializing_if = "Option::is_none")]
    pub offer_key: Option<String>,
    /// Capital-allowance rate copied from the matched offer.
    #[serde(rename = "CAP", skip_serializing_if = "Option::is_none")]
    pub cap_rate: Option<f64>,
    /// Offer rate copied from the matched offer.
    #[serde(rename = "OFERTA", skip_serializing_if = "Option::is_none")]
    pub offer_rate: Option<f64>,
    /// Amount of the valuation basis named by the offer's rule.
    #[serde(rename = "Valor Tipo de Valuacion", skip_serializing_if = "Option::is_none")]
    pub valuation_basis_value: Option<f64>,
    /// Which valuation basis the offer priced against.
    #[serde(rename = "Tipo de Valuacion", skip_serializing_if = "Option::is_none")]
    pub valuation_basis_name: Option<String>,
    /// Costing-policy name copied from the matched offer.
    #[serde(rename = "Tipo condicion costo", skip_serializing_if = "Option::is_none")]
    pub cost_policy: Option<String>,
    /// Quantity times valuation basis; percentage-discount policy only.
    #[serde(rename = "Costo Total", skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    /// Output of the cost-condition evaluator.
    #[serde(rename = "Valor condicion Costo", skip_serializing_if = "Option::is_none")]
    pub cost_condition: Option<CostConditionValue>,
    /// `CAP * Costo Total`.
    #[serde(rename = "Valor CAP", skip_serializing_if = "Option::is_none")]
    pub allowance_value: Option<f64>,
    /// `Costo Total - Valor CAP`.
    #[serde(rename = "Costo con CAP", skip_serializing_if = "Option::is_none")]
    pub adjusted_cost: Option<f64>,
    /// `Costo con CAP * OFERTA`.
    #[serde(rename = "Valor Oferta", skip_serializing_if = "Option::is_none")]
    pub offer_value: Option<f64>,
    /// `Valor CAP + Valor Oferta`.
    #[serde(rename = "Total Beneficio", skip_serializing_if = "Option::is_none")]
    pub total_benefit: Option<f64>,
}

/// A sell-out line together with its derived fields -- the terminal output
/// artifact of the pipeline.
///
/// Composition keeps the input record immutable; serialization flattens
/// both halves back into the original single-object layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedRecord {
    /// The untouched input line.
    #[serde(flatten)]
    pub record: SellOutRecord,
    /// Everything the pipeline derived for it.
    #[serde(flatten)]
    pub enrichment: Enrichment,
}
