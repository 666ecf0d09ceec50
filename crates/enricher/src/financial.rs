// Rust guideline compliant 2026-03-07

//! Financial Field Calculator -- derives the dependent monetary fields
//! from the costing result and the offer's CAP/offer terms.

use domain::Enrichment;

/// Derive `Valor CAP`, `Costo con CAP`, `Valor Oferta`, and
/// `Total Beneficio` on `enrichment`.
///
/// Three guards, evaluated independently and in this fixed order; each
/// fires only when both of its inputs are already present, so later guards
/// see the fields produced by earlier ones within the same invocation. A
/// missing input leaves the dependent field absent, never zero.
pub fn derive(enrichment: &mut Enrichment) {
    if let (Some(cap), Some(total_cost)) = (enrichment.cap_rate, enrichment.total_cost) {
        let allowance = cap * total_cost;
        enrichment.allowance_value = Some(allowance);
        enrichment.adjusted_cost = Some(total_cost - allowance);
    }

    if let (Some(adjusted), Some(rate)) = (enrichment.adjusted_cost, enrichment.offer_rate) {
        enrichment.offer_value = Some(adjusted * rate);
    }

    if let (Some(allowance), Some(offer_value)) =
        (enrichment.allowance_value, enrichment.offer_value)
    {
        enrichment.total_benefit = Some(allowance + offer_value);
    }
}
