// Rust guideline compliant 2026-03-08

//! Transaction Enrichment Orchestrator -- per-transaction control flow that
//! resolves product, customer eligibility, composite key, and matching
//! offer, then derives the financial fields in dependency order.
//!
//! Entry points: [`Enricher::enrich_record`], [`Enricher::enrich_batch`].
//! Configuration via [`EnricherConfig::builder`]. The cost-condition and
//! validity rules live in the [`cost`] and [`validity`] modules.

pub mod cost;
pub mod financial;
pub mod validity;

use domain::{
    DEFAULT_VARIANT_SUFFIX_LEN, DiagnosticEvent, Diagnostics, EnrichedRecord, Enrichment,
    FieldError, Offer, REPLACEMENT_COST_BASIS, ReferenceIndex, SellOutRecord, base_code,
    numeric_lenient, numeric_or_default,
};

// ---------------------------------------------------------------------------
// EnricherError
// ---------------------------------------------------------------------------

/// Errors that can occur while configuring the enricher.
///
/// Enrichment itself never fails: per-transaction problems degrade the
/// record and surface through the [`Diagnostics`] port.
#[derive(Debug, thiserror::Error)]
pub enum EnricherError {
    /// The supplied configuration is invalid.
    #[error("invalid enricher configuration: {reason}")]
    InvalidConfig {
        /// Human-readable description of the problem.
        reason: String,
    },
}

// ---------------------------------------------------------------------------
// EnricherConfig + builder
// ---------------------------------------------------------------------------

/// Runtime configuration for an [`Enricher`].
///
/// Construct via [`EnricherConfig::builder`].
#[derive(Debug, Clone)]
pub struct EnricherConfig {
    /// Trailing characters a full product code carries over its base code.
    pub variant_suffix_len: usize,
    /// Product valuation basis used for the per-unit valuation in step 1.
    pub unit_basis: String,
}

/// Builder for [`EnricherConfig`].
///
/// Obtain via [`EnricherConfig::builder`]; finalize with [`build`](Self::build).
#[derive(Debug)]
pub struct EnricherConfigBuilder {
    variant_suffix_len: usize,
    unit_basis: String,
}

impl EnricherConfig {
    /// Create a builder with the ecosystem defaults: a two-character
    /// variant suffix and the replacement-cost valuation basis.
    #[must_use]
    pub fn builder() -> EnricherConfigBuilder {
        EnricherConfigBuilder {
            variant_suffix_len: DEFAULT_VARIANT_SUFFIX_LEN,
            unit_basis: REPLACEMENT_COST_BASIS.to_owned(),
        }
    }
}

impl EnricherConfigBuilder {
    /// Override the variant-suffix length used to derive base codes.
    #[must_use]
    pub fn variant_suffix_len(mut self, len: usize) -> Self {
        self.variant_suffix_len = len;
        self
    }

    /// Override the valuation basis used for the per-unit valuation.
    #[must_use]
    pub fn unit_basis(mut self, basis: impl Into<String>) -> Self {
        self.unit_basis = basis.into();
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`EnricherError::InvalidConfig`] when the unit basis name is
    /// empty.
    #[must_use = "the Result must be checked; use ? or unwrap"]
    pub fn build(self) -> Result<EnricherConfig, EnricherError> {
        if self.unit_basis.is_empty() {
            return Err(EnricherError::InvalidConfig {
                reason: "unit_basis must not be empty".to_owned(),
            });
        }
        Ok(EnricherConfig {
            variant_suffix_len: self.variant_suffix_len,
            unit_basis: self.unit_basis,
        })
    }
}

// ---------------------------------------------------------------------------
// Enricher
// ---------------------------------------------------------------------------

/// Enriches sell-out records against the immutable reference index.
///
/// Pure with respect to its inputs: the same record and index snapshot
/// always produce the same enrichment, so re-running the orchestrator on
/// its own output record reproduces identical derived fields. Per-record
/// failures never abort the batch; they degrade the record and surface
/// through the injected [`Diagnostics`] port.
#[derive(Debug)]
pub struct Enricher {
    config: EnricherConfig,
}

impl Enricher {
    /// Create a new enricher from `config`.
    #[must_use]
    pub fn new(config: EnricherConfig) -> Self {
        Self { config }
    }

    /// Enrich one sell-out record.
    ///
    /// Steps, each independently skipped when its inputs are absent:
    ///
    /// 1. Derive the base product code (EAN key) and attach the per-unit
    ///    valuation from the configured basis.
    /// 2. Resolve the customer, set the eligibility flag (default `"No"`),
    ///    and build the composite offer key when the EAN key exists.
    /// 3. Look up the offer; a miss reports [`DiagnosticEvent::OfferMiss`]
    ///    and leaves every offer-dependent field absent.
    /// 4. Check the effective window, copy the offer terms, and run the
    ///    cost-condition evaluator followed by the financial calculator.
    #[must_use]
    pub fn enrich_record<D: Diagnostics>(
        &self,
        record: SellOutRecord,
        index: &ReferenceIndex,
        diagnostics: &D,
    ) -> EnrichedRecord {
        let mut enrichment = Enrichment::default();

        // Step 1: product resolution.
        if let Some(code) = record.product_code.as_deref() {
            let ean = base_code(code, self.config.variant_suffix_len).to_owned();
            enrichment.unit_valuation = index
                .product(&ean)
                .and_then(|product| product.basis(&self.config.unit_basis))
                .and_then(numeric_lenient);
            enrichment.ean = Some(ean);
        }

        // Step 2: customer resolution. An unknown branch still validates
        // (as "No") and still produces a key; the indicator defaults to the
        // upstream convention.
        if let Some(account) = record.account_number.as_deref() {
            let customer = index.customer(account);
            enrichment.customer_validation = Some(
                customer
                    .and_then(|c| c.applies.clone())
                    .unwrap_or_else(|| "No".to_owned()),
            );
            let retail_payment = customer
                .and_then(|c| c.retail_payment.clone())
                .unwrap_or_else(|| "No".to_owned());
            if let Some(ean) = enrichment.ean.as_deref() {
                enrichment.offer_key = Some(format!("{retail_payment}{ean}"));
            }
        }

        // Steps 3-4: offer resolution and application.
        if let Some(key) = enrichment.offer_key.clone() {
            match index.offer(&key) {
                Some(offer) => {
                    self.apply_offer(&record, offer, &key, index, &mut enrichment, diagnostics);
                }
                None => diagnostics.report(DiagnosticEvent::OfferMiss { key }),
            }
        }

        EnrichedRecord { record, enrichment }
    }

    /// Enrich a whole batch, preserving input cardinality and order.
    #[must_use]
    pub fn enrich_batch<D: Diagnostics>(
        &self,
        records: Vec<SellOutRecord>,
        index: &ReferenceIndex,
        diagnostics: &D,
    ) -> Vec<EnrichedRecord> {
        let total = records.len();
        records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                tracing::debug!("enricher.record: index={} total={total}", i + 1);
                self.enrich_record(record, index, diagnostics)
            })
            .collect()
    }

    /// Validate the effective window and, when the date qualifies, copy the
    /// offer terms and derive the cost and financial fields.
    fn apply_offer<D: Diagnostics>(
        &self,
        record: &SellOutRecord,
        offer: &Offer,
        key: &str,
        index: &ReferenceIndex,
        enrichment: &mut Enrichment,
        diagnostics: &D,
    ) {
        let (Some(date), Some(start), Some(end)) = (
            record.date.as_deref(),
            offer.window_start.as_deref(),
            offer.window_end.as_deref(),
        ) else {
            diagnostics.report(DiagnosticEvent::IncompleteWindow { key: key.to_owned() });
            return;
        };

        match validity::is_effective(date, start, end) {
            Ok(true) => {}
            Ok(false) => {
                diagnostics.report(DiagnosticEvent::OutsideWindow {
                    key: key.to_owned(),
                    date: date.to_owned(),
                    start: start.to_owned(),
                    end: end.to_owned(),
                });
                return;
            }
            Err(FieldError::MalformedDate { value }) | Err(FieldError::InvalidNumericField { value, .. }) => {
                diagnostics.report(DiagnosticEvent::MalformedDate { key: key.to_owned(), value });
                return;
            }
        }

        if let Err(error) = self.apply_offer_terms(record, offer, index, enrichment) {
            match error {
                FieldError::InvalidNumericField { field, value } => {
                    diagnostics.report(DiagnosticEvent::InvalidNumericField { field, value });
                }
                FieldError::MalformedDate { value } => {
                    diagnostics
                        .report(DiagnosticEvent::MalformedDate { key: key.to_owned(), value });
                }
            }
        }
    }

    /// Copy CAP/offer rates, resolve the named valuation basis, copy the
    /// costing policy, then evaluate cost and financial fields in order.
    ///
    /// Any coercion failure aborts the remaining derivations for this
    /// record, leaving whatever was already set (partial enrichment).
    fn apply_offer_terms(
        &self,
        record: &SellOutRecord,
        offer: &Offer,
        index: &ReferenceIndex,
        enrichment: &mut Enrichment,
    ) -> Result<(), FieldError> {
        enrichment.cap_rate = Some(numeric_or_default("CAP", offer.cap_rate.as_ref(), 0.0)?);
        enrichment.offer_rate =
            Some(numeric_or_default("Oferta", offer.offer_rate.as_ref(), 0.0)?);

        if let Some(rule) = offer.rule_name.as_deref()
            && let Some(product) = enrichment.ean.as_deref().and_then(|ean| index.product(ean))
        {
            if let Some(value) = product.basis(rule).filter(|value| !value.is_null()) {
                enrichment.valuation_basis_value =
                    Some(numeric_or_default(rule, Some(value), 0.0)?);
            }
            enrichment.valuation_basis_name = Some(rule.to_owned());
        }

        if let Some(policy) = offer.cost_policy.clone() {
            enrichment.cost_policy = Some(policy);
        }

        cost::evaluate(record, enrichment)?;
        financial::derive(enrichment);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::{Enricher, EnricherConfig, EnricherError};
    use domain::{
        CostConditionValue, Customer, DiagnosticEvent, Diagnostics, Offer, Product,
        ReferenceIndex, SellOutRecord,
    };
    use serde_json::json;
    use std::cell::RefCell;

    const EPS: f64 = 1e-9;

    // ------------------------------------------------------------------
    // Test helpers
    // ------------------------------------------------------------------

    #[derive(Default)]
    struct RecordingDiagnostics {
        events: RefCell<Vec<DiagnosticEvent>>,
    }

    impl RecordingDiagnostics {
        fn events(&self) -> Vec<DiagnosticEvent> {
            self.events.borrow().clone()
        }
    }

    impl Diagnostics for RecordingDiagnostics {
        fn report(&self, event: DiagnosticEvent) {
            self.events.borrow_mut().push(event);
        }
    }

    fn sample_index() -> ReferenceIndex {
        let product: Product = serde_json::from_value(json!({
            "Producto Código": "12345601",
            "Costo de Reposicion": 100.0
        }))
        .unwrap();
        let customer: Customer = serde_json::from_value(json!({
            "NUMERO FARMACIA": "A1",
            "Aplica": "Si",
            "RETAIL PAGO": "X"
        }))
        .unwrap();
        let offer: Offer = serde_json::from_value(json!({
            "Llave": "X123456",
            "CAP": 0.1,
            "Oferta": 0.2,
            "Nombre regla": "Costo de Reposicion",
            "Tipo condicion costo": "% DESCUENTO SOBRE COSTO",
            "Fecha inicio vigencia": "03/01/2024",
            "Fecha fin vigencia": "03/31/2024"
        }))
        .unwrap();
        indexer::build(vec![product], vec![customer], vec![offer], 2)
    }

    fn sample_record(date: &str) -> SellOutRecord {
        serde_json::from_value(json!({
            "Producto Código": "12345601",
            "ACCOUNT_NUMBER": "A1",
            "Fecha": date,
            "Pzas Facturadas": 1
        }))
        .unwrap()
    }

    fn enricher() -> Enricher {
        Enricher::new(EnricherConfig::builder().build().unwrap())
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let actual = actual.expect("field must be set");
        assert!((actual - expected).abs() < EPS, "expected {expected}, got {actual}");
    }

    // ------------------------------------------------------------------
    // Config
    // ------------------------------------------------------------------

    // ORC-T01: defaults and validation.
    #[test]
    fn config_defaults_and_validation() {
        let config = EnricherConfig::builder().build().unwrap();
        assert_eq!(config.variant_suffix_len, 2);
        assert_eq!(config.unit_basis, "Costo de Reposicion");

        let err = EnricherConfig::builder().unit_basis("").build().unwrap_err();
        assert!(matches!(err, EnricherError::InvalidConfig { .. }));
    }

    // ------------------------------------------------------------------
    // The worked example
    // ------------------------------------------------------------------

    // ORC-T02: full enrichment with an in-window offer.
    #[test]
    fn worked_example_inside_window() {
        let diagnostics = RecordingDiagnostics::default();
        let enriched =
            enricher().enrich_record(sample_record("03/15/2024"), &sample_index(), &diagnostics);

        let e = &enriched.enrichment;
        assert_eq!(e.ean.as_deref(), Some("123456"));
        assert_close(e.unit_valuation, 100.0);
        assert_eq!(e.customer_validation.as_deref(), Some("Si"));
        assert_eq!(e.offer_key.as_deref(), Some("X123456"));
        assert_close(e.cap_rate, 0.1);
        assert_close(e.offer_rate, 0.2);
        assert_close(e.valuation_basis_value, 100.0);
        assert_eq!(e.valuation_basis_name.as_deref(), Some("Costo de Reposicion"));
        assert_eq!(e.cost_policy.as_deref(), Some("% DESCUENTO SOBRE COSTO"));
        assert_close(e.total_cost, 100.0);
        assert_close(e.allowance_value, 10.0);
        assert_close(e.adjusted_cost, 90.0);
        assert_close(e.offer_value, 18.0);
        assert_close(e.total_benefit, 28.0);
        assert!(matches!(e.cost_condition, Some(CostConditionValue::Computed(_))));
        assert!(diagnostics.events().is_empty());
    }

    // ORC-T03: the same record outside the window keeps the customer
    // validation but no offer-dependent field.
    #[test]
    fn outside_window_leaves_offer_fields_unset() {
        let diagnostics = RecordingDiagnostics::default();
        let enriched =
            enricher().enrich_record(sample_record("04/01/2024"), &sample_index(), &diagnostics);

        let e = &enriched.enrichment;
        assert_eq!(e.customer_validation.as_deref(), Some("Si"));
        assert_eq!(e.offer_key.as_deref(), Some("X123456"));
        assert_eq!(e.cap_rate, None);
        assert_eq!(e.offer_rate, None);
        assert_eq!(e.total_cost, None);
        assert_eq!(e.cost_condition, None);
        assert_eq!(e.total_benefit, None);
        assert_eq!(
            diagnostics.events(),
            vec![DiagnosticEvent::OutsideWindow {
                key: "X123456".to_owned(),
                date: "04/01/2024".to_owned(),
                start: "03/01/2024".to_owned(),
                end: "03/31/2024".to_owned(),
            }]
        );
    }

    // ORC-T04: window boundaries are inclusive end to end.
    #[test]
    fn window_boundaries_apply_offer() {
        for date in ["03/01/2024", "03/31/2024"] {
            let diagnostics = RecordingDiagnostics::default();
            let enriched =
                enricher().enrich_record(sample_record(date), &sample_index(), &diagnostics);
            assert_close(enriched.enrichment.total_benefit, 28.0);
        }
    }

    // ------------------------------------------------------------------
    // Degraded paths
    // ------------------------------------------------------------------

    // ORC-T05: no ACCOUNT_NUMBER -- no eligibility, no key, no offer lookup.
    #[test]
    fn missing_account_number() {
        let record: SellOutRecord = serde_json::from_value(json!({
            "Producto Código": "12345601",
            "Fecha": "03/15/2024"
        }))
        .unwrap();
        let diagnostics = RecordingDiagnostics::default();
        let enriched = enricher().enrich_record(record, &sample_index(), &diagnostics);

        let e = &enriched.enrichment;
        assert_eq!(e.ean.as_deref(), Some("123456"));
        assert_close(e.unit_valuation, 100.0);
        assert_eq!(e.customer_validation, None);
        assert_eq!(e.offer_key, None);
        assert_eq!(e.cap_rate, None);
        assert!(diagnostics.events().is_empty(), "no lookup, no diagnostic");
    }

    // ORC-T06: an unknown branch defaults eligibility to "No" and builds
    // the key with the default payment indicator.
    #[test]
    fn unknown_customer_defaults() {
        let record: SellOutRecord = serde_json::from_value(json!({
            "Producto Código": "12345601",
            "ACCOUNT_NUMBER": "Z9",
            "Fecha": "03/15/2024"
        }))
        .unwrap();
        let diagnostics = RecordingDiagnostics::default();
        let enriched = enricher().enrich_record(record, &sample_index(), &diagnostics);

        let e = &enriched.enrichment;
        assert_eq!(e.customer_validation.as_deref(), Some("No"));
        assert_eq!(e.offer_key.as_deref(), Some("No123456"));
        assert_eq!(
            diagnostics.events(),
            vec![DiagnosticEvent::OfferMiss { key: "No123456".to_owned() }]
        );
    }

    // ORC-T07: no product code -- no EAN, and the customer step cannot
    // build a key.
    #[test]
    fn missing_product_code_blocks_key() {
        let record: SellOutRecord = serde_json::from_value(json!({
            "ACCOUNT_NUMBER": "A1",
            "Fecha": "03/15/2024"
        }))
        .unwrap();
        let diagnostics = RecordingDiagnostics::default();
        let enriched = enricher().enrich_record(record, &sample_index(), &diagnostics);

        let e = &enriched.enrichment;
        assert_eq!(e.ean, None);
        assert_eq!(e.customer_validation.as_deref(), Some("Si"));
        assert_eq!(e.offer_key, None);
        assert!(diagnostics.events().is_empty());
    }

    // ORC-T08: a malformed transaction date degrades to "offer not
    // applied" with a diagnostic.
    #[test]
    fn malformed_date_skips_offer() {
        let diagnostics = RecordingDiagnostics::default();
        let enriched =
            enricher().enrich_record(sample_record("2024-03-15"), &sample_index(), &diagnostics);

        assert_eq!(enriched.enrichment.cap_rate, None);
        assert_eq!(
            diagnostics.events(),
            vec![DiagnosticEvent::MalformedDate {
                key: "X123456".to_owned(),
                value: "2024-03-15".to_owned(),
            }]
        );
    }

    // ORC-T09: an offer without window dates reports an incomplete window.
    #[test]
    fn incomplete_window_reports() {
        let offer: Offer = serde_json::from_value(json!({
            "Llave": "X123456",
            "CAP": 0.1,
            "Fecha inicio vigencia": "03/01/2024"
        }))
        .unwrap();
        let mut index = sample_index();
        index.offers.insert("X123456".to_owned(), offer);

        let diagnostics = RecordingDiagnostics::default();
        let enriched =
            enricher().enrich_record(sample_record("03/15/2024"), &index, &diagnostics);

        assert_eq!(enriched.enrichment.cap_rate, None);
        assert_eq!(
            diagnostics.events(),
            vec![DiagnosticEvent::IncompleteWindow { key: "X123456".to_owned() }]
        );
    }

    // ORC-T10: a non-numeric CAP leaves the record partially enriched and
    // names the field.
    #[test]
    fn invalid_cap_degrades() {
        let offer: Offer = serde_json::from_value(json!({
            "Llave": "X123456",
            "CAP": "diez por ciento",
            "Oferta": 0.2,
            "Fecha inicio vigencia": "03/01/2024",
            "Fecha fin vigencia": "03/31/2024"
        }))
        .unwrap();
        let mut index = sample_index();
        index.offers.insert("X123456".to_owned(), offer);

        let diagnostics = RecordingDiagnostics::default();
        let enriched =
            enricher().enrich_record(sample_record("03/15/2024"), &index, &diagnostics);

        let e = &enriched.enrichment;
        assert_eq!(e.cap_rate, None);
        assert_eq!(e.offer_rate, None, "later terms are skipped");
        assert_eq!(e.total_benefit, None);
        assert!(matches!(
            diagnostics.events().as_slice(),
            [DiagnosticEvent::InvalidNumericField { field, .. }] if field == "CAP"
        ));
    }

    // ORC-T11: missing CAP/Oferta on the offer coerce to 0.0, so the chain
    // computes zeros rather than going absent.
    #[test]
    fn absent_rates_default_to_zero() {
        let offer: Offer = serde_json::from_value(json!({
            "Llave": "X123456",
            "Nombre regla": "Costo de Reposicion",
            "Tipo condicion costo": "% DESCUENTO SOBRE COSTO",
            "Fecha inicio vigencia": "03/01/2024",
            "Fecha fin vigencia": "03/31/2024"
        }))
        .unwrap();
        let mut index = sample_index();
        index.offers.insert("X123456".to_owned(), offer);

        let diagnostics = RecordingDiagnostics::default();
        let enriched =
            enricher().enrich_record(sample_record("03/15/2024"), &index, &diagnostics);

        let e = &enriched.enrichment;
        assert_close(e.cap_rate, 0.0);
        assert_close(e.offer_rate, 0.0);
        assert_close(e.total_cost, 100.0);
        assert_close(e.allowance_value, 0.0);
        assert_close(e.adjusted_cost, 100.0);
        assert_close(e.total_benefit, 0.0);
    }

    // ------------------------------------------------------------------
    // Batch semantics
    // ------------------------------------------------------------------

    // ORC-T12: cardinality and order are preserved; one bad record does
    // not abort the batch.
    #[test]
    fn batch_preserves_order_and_continues() {
        let records = vec![
            sample_record("03/15/2024"),
            sample_record("2024-03-15"),
            sample_record("03/20/2024"),
        ];
        let diagnostics = RecordingDiagnostics::default();
        let enriched = enricher().enrich_batch(records, &sample_index(), &diagnostics);

        assert_eq!(enriched.len(), 3);
        assert_close(enriched[0].enrichment.total_benefit, 28.0);
        assert_eq!(enriched[1].enrichment.total_benefit, None);
        assert_close(enriched[2].enrichment.total_benefit, 28.0);
        assert_eq!(diagnostics.events().len(), 1);
    }

    // ORC-T13: re-enriching an already-enriched record reproduces the same
    // derived fields (pure function of record + index snapshot).
    #[test]
    fn idempotent_re_enrichment() {
        let index = sample_index();
        let diagnostics = RecordingDiagnostics::default();
        let first =
            enricher().enrich_record(sample_record("03/15/2024"), &index, &diagnostics);
        let second = enricher().enrich_record(first.record.clone(), &index, &diagnostics);
        assert_eq!(first, second);
    }
}
