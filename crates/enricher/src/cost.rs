// Rust guideline compliant 2026-03-07

//! Cost Condition Evaluator -- computes a transaction's base cost under the
//! offer's named costing policy.

use domain::{CostConditionValue, Enrichment, FieldError, SellOutRecord, numeric_or_default};

/// Percent-discount-on-cost policy. The only policy that sets `Costo Total`.
pub const POLICY_PERCENT_DISCOUNT: &str = "% DESCUENTO SOBRE COSTO";
/// Fixed per-unit cost policy.
pub const POLICY_FIXED_COST: &str = "Costo Fijo";
/// Fixed amount policy. Placeholder upstream; never computes a number.
pub const POLICY_FIXED_AMOUNT: &str = "Monto Fijo";

/// Evaluate the costing policy recorded on `enrichment` and store the
/// result in `Valor condicion Costo` (and, for the percentage-discount
/// policy only, `Costo Total`).
///
/// Defaults: quantity invoiced 1, valuation basis 0.0, invoice discount
/// 0.0, fixed cost 0.0.
///
/// # Errors
///
/// Returns [`FieldError::InvalidNumericField`] when a raw money field on
/// the record cannot be coerced; in that case no cost field is set and the
/// caller skips the dependent computations for this transaction.
pub fn evaluate(record: &SellOutRecord, enrichment: &mut Enrichment) -> Result<(), FieldError> {
    let basis = enrichment.valuation_basis_value.unwrap_or(0.0);

    match enrichment.cost_policy.as_deref() {
        Some(POLICY_PERCENT_DISCOUNT) => {
            let quantity =
                numeric_or_default("Pzas Facturadas", record.quantity_invoiced.as_ref(), 1.0)?;
            let discount =
                numeric_or_default("Descuento Factura", record.invoice_discount.as_ref(), 0.0)?;
            let total_cost = quantity * basis;
            enrichment.total_cost = Some(total_cost);
            enrichment.cost_condition = Some(CostConditionValue::Computed(total_cost - discount));
        }
        Some(POLICY_FIXED_COST) => {
            // (quantity * valuation basis) - (fixed cost * quantity); no Costo Total.
            let quantity =
                numeric_or_default("Pzas Facturadas", record.quantity_invoiced.as_ref(), 1.0)?;
            let fixed = numeric_or_default("Costo Fijo", record.fixed_cost.as_ref(), 0.0)?;
            enrichment.cost_condition =
                Some(CostConditionValue::Computed(quantity * basis - fixed * quantity));
        }
        Some(POLICY_FIXED_AMOUNT) => {
            // Inherited placeholder branch; upstream never specified the formula.
            enrichment.cost_condition = Some(CostConditionValue::Unimplemented {
                policy: POLICY_FIXED_AMOUNT.to_owned(),
            });
        }
        Some(other) => {
            enrichment.cost_condition =
                Some(CostConditionValue::Unknown { policy: Some(other.to_owned()) });
        }
        None => {
            enrichment.cost_condition = Some(CostConditionValue::Unknown { policy: None });
        }
    }
    Ok(())
}
