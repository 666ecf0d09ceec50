// Rust guideline compliant 2026-03-08

//! Offer Compiler -- folds raw negotiation lines into the offer records the
//! pipeline matches transactions against.
//!
//! Entry point: [`compile`]. A negotiation arrives as one line per case
//! folio: folio 1 carries the capital-allowance rate, folio 2 the offer
//! rate. Lines sharing a composite key collapse into a single offer per
//! condition type (sell-out or sell-in); everything else about the offer is
//! seeded by the first line seen for its key.

use domain::{Offer, numeric_lenient};
use serde::Deserialize;
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Negotiation lines that price the pharmacy-to-consumer side.
const CONDITION_SELL_OUT: &str = "SELL-OUT";
/// Negotiation lines that price the distributor-to-pharmacy side.
const CONDITION_SELL_IN: &str = "SELL-IN";

/// Case folio whose rate becomes the capital-allowance rate.
const CAP_FOLIO: f64 = 1.0;
/// Case folio whose rate becomes the offer rate.
const OFFER_FOLIO: f64 = 2.0;

/// One raw negotiation line.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct NegotiationRecord {
    /// Chain alias; first segment of the composite key.
    #[serde(rename = "Nombre alias", default)]
    pub alias: Option<String>,
    /// Internal product identifier; second segment of the composite key.
    #[serde(rename = "Sivec", default)]
    pub sivec: Option<String>,
    /// Product display name.
    #[serde(rename = "Nombre articulo", default)]
    pub article_name: Option<String>,
    /// Case folio: 1 routes the rate into CAP, 2 into the offer rate.
    #[serde(rename = "Folio caso", default)]
    pub case_folio: Option<Value>,
    /// `SELL-OUT`, `SELL-IN`, or something to skip.
    #[serde(rename = "Tipo condicion", default)]
    pub condition_type: Option<String>,
    /// The negotiated rate for this folio.
    #[serde(rename = "Oferta costo", default)]
    pub rate: Option<Value>,
    /// Which product valuation basis the offer prices against.
    #[serde(rename = "Nombre regla", default)]
    pub rule_name: Option<String>,
    /// Fixed-cost amount for the `Costo Fijo` policy.
    #[serde(rename = "Costo fijo", default)]
    pub fixed_cost: Option<Value>,
    /// Costing-policy name.
    #[serde(rename = "Tipo condicion costo", default)]
    pub cost_policy: Option<String>,
    /// First day of the effective window, inclusive.
    #[serde(rename = "Fecha inicio vigencia", default)]
    pub window_start: Option<String>,
    /// Last day of the effective window, inclusive.
    #[serde(rename = "Fecha fin vigencia", default)]
    pub window_end: Option<String>,
    /// Segment name, used for level resolution.
    #[serde(rename = "Nombre segmento", default)]
    pub segment: Option<String>,
    /// Subsegment name, used for level resolution.
    #[serde(rename = "Nombre subsegmento", default)]
    pub subsegment: Option<String>,
    /// Customer number, used for level resolution.
    #[serde(rename = "Numero Cliente", default)]
    pub customer_number: Option<String>,
    /// Customer display name, used for level resolution.
    #[serde(rename = "Nombre cliente", default)]
    pub customer_name: Option<String>,
}

impl NegotiationRecord {
    /// Composite key: alias + sivec, both rendered as-is.
    fn key(&self) -> Option<String> {
        match (self.alias.as_deref(), self.sivec.as_deref()) {
            (Some(alias), Some(sivec)) => Some(format!("{alias}{sivec}")),
            _ => None,
        }
    }

    /// Narrowest populated targeting level, `"N/A"` when none is set.
    fn level(&self) -> &'static str {
        fn populated(value: &Option<String>) -> bool {
            value.as_deref().is_some_and(|v| !v.is_empty())
        }
        if populated(&self.alias) {
            "Nombre alias"
        } else if populated(&self.segment) {
            "Nombre segmento"
        } else if populated(&self.subsegment) {
            "Nombre subsegmento"
        } else if populated(&self.customer_number) {
            "Numero Cliente"
        } else if populated(&self.customer_name) {
            "Nombre cliente"
        } else {
            "N/A"
        }
    }
}

/// Compiled offers, partitioned by condition type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledOffers {
    /// Offers matching pharmacy-to-consumer transactions.
    pub sell_out: Vec<Offer>,
    /// Offers matching distributor-to-pharmacy transactions.
    pub sell_in: Vec<Offer>,
}

/// Fold negotiation lines into per-key offers.
///
/// Lines whose condition type is neither `SELL-OUT` nor `SELL-IN`, or that
/// cannot form a composite key, are skipped with a debug log. Within one
/// key, the first line seeds the descriptive fields; folio 1 and 2 lines
/// set CAP and the offer rate (later lines with the same folio overwrite,
/// matching the upstream fold). The combined `Ponderado` rate is
/// `1 - (1 - CAP) * (1 - Oferta)`.
#[must_use]
pub fn compile(records: Vec<NegotiationRecord>) -> CompiledOffers {
    let mut sell_out = OfferFold::new(CONDITION_SELL_OUT);
    let mut sell_in = OfferFold::new(CONDITION_SELL_IN);

    for record in records {
        let fold = match record.condition_type.as_deref() {
            Some(CONDITION_SELL_OUT) => &mut sell_out,
            Some(CONDITION_SELL_IN) => &mut sell_in,
            other => {
                tracing::debug!("offers.skipped: condition_type={other:?} (not a sell condition)");
                continue;
            }
        };
        fold.absorb(record);
    }

    CompiledOffers { sell_out: sell_out.finish(), sell_in: sell_in.finish() }
}

/// Accumulates rates per composite key in first-seen order.
struct OfferFold {
    condition_type: &'static str,
    order: Vec<String>,
    drafts: HashMap<String, Draft>,
}

struct Draft {
    seed: NegotiationRecord,
    cap: f64,
    offer_rate: f64,
}

impl OfferFold {
    fn new(condition_type: &'static str) -> Self {
        Self { condition_type, order: vec![], drafts: HashMap::new() }
    }

    fn absorb(&mut self, record: NegotiationRecord) {
        let Some(key) = record.key() else {
            tracing::debug!("offers.skipped: no composite key (alias or sivec missing)");
            return;
        };

        // Folios arrive as integers or integral floats depending on the
        // export; compare tolerantly.
        let folio = record.case_folio.as_ref().and_then(numeric_lenient);
        let is_folio = |n: f64| folio.is_some_and(|f| (f - n).abs() < f64::EPSILON);
        let rate = record.rate.as_ref().and_then(numeric_lenient).unwrap_or(0.0);

        let draft = match self.drafts.entry(key) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                self.order.push(entry.key().clone());
                entry.insert(Draft { seed: record, cap: 0.0, offer_rate: 0.0 })
            }
        };

        if is_folio(CAP_FOLIO) {
            draft.cap = rate;
        } else if is_folio(OFFER_FOLIO) {
            draft.offer_rate = rate;
        }
    }

    fn finish(self) -> Vec<Offer> {
        let Self { condition_type, order, mut drafts } = self;
        order
            .into_iter()
            .filter_map(|key| {
                drafts.remove(&key).map(|draft| to_offer(&key, draft, condition_type))
            })
            .collect()
    }
}

fn to_offer(key: &str, draft: Draft, condition_type: &str) -> Offer {
    let ponderado = 1.0 - (1.0 - draft.cap) * (1.0 - draft.offer_rate);
    let seed = draft.seed;

    let mut extra = Map::new();
    extra.insert("Nivel".to_owned(), json!(seed.level()));
    extra.insert("Nombre".to_owned(), or_na(seed.article_name.as_deref()));
    extra.insert("Nombre segmento".to_owned(), or_na(seed.segment.as_deref()));
    extra.insert("Nombre subsegmento".to_owned(), or_na(seed.subsegment.as_deref()));
    extra.insert("Nombre alias".to_owned(), or_na(seed.alias.as_deref()));
    extra.insert("Numero Cliente".to_owned(), or_na(seed.customer_number.as_deref()));
    extra.insert("Nombre cliente".to_owned(), or_na(seed.customer_name.as_deref()));
    extra.insert("Sivec".to_owned(), or_na(seed.sivec.as_deref()));
    extra.insert("Ponderado".to_owned(), json!(ponderado));
    extra.insert("Tipo condicion".to_owned(), json!(condition_type));

    Offer {
        key: Some(key.to_owned()),
        cap_rate: Some(json!(draft.cap)),
        offer_rate: Some(json!(draft.offer_rate)),
        rule_name: seed.rule_name,
        cost_policy: seed.cost_policy,
        fixed_cost: seed.fixed_cost,
        window_start: seed.window_start,
        window_end: seed.window_end,
        extra,
    }
}

fn or_na(value: Option<&str>) -> Value {
    json!(value.unwrap_or("N/A"))
}
