// Rust guideline compliant 2026-03-08

//! Sell-out rebate pipeline entry point.
//!
//! Wires the collection store, reference index builder, enricher, and sink
//! adapters and runs one batch: load -> index -> enrich -> write -> summary.
//!
//! # Usage
//!
//! ```text
//! # Demo run on synthetic collections
//! RUST_LOG=info cargo run -- --demo --seed 42
//!
//! # Real collections; offers either precompiled or folded from raw
//! # negotiation lines
//! cargo run -- --transactions sell_out.json --products productos.json \
//!     --customers clientes.json --offers ofertas.json \
//!     --output sell_out_final.json
//! cargo run -- --transactions sell_out.json --products productos.json \
//!     --customers clientes.json --negotiations negociacion.json
//! ```

mod adapters;
mod telemetry;

use std::path::PathBuf;

use adapters::demo_store::DemoStore;
use adapters::json_sink::JsonFileSink;
use adapters::json_store::{JsonFileStore, OfferSource};
use adapters::log_diagnostics::LogDiagnostics;
use anyhow::Context as _;
use clap::Parser;
use domain::{CollectionStore as _, EnrichedSink as _, InputCollections};
use enricher::{Enricher, EnricherConfig};

/// Command line of the pipeline binary.
#[derive(Debug, Parser)]
#[command(name = "rebate_pipeline", about = "Sell-out promotional-rebate enrichment pipeline")]
struct Cli {
    /// Path to the raw sell-out transactions JSON array.
    #[arg(long)]
    transactions: Option<PathBuf>,
    /// Path to the product catalog JSON array.
    #[arg(long)]
    products: Option<PathBuf>,
    /// Path to the customer eligibility JSON array.
    #[arg(long)]
    customers: Option<PathBuf>,
    /// Path to precompiled offers (mutually exclusive with --negotiations).
    #[arg(long, conflicts_with = "negotiations")]
    offers: Option<PathBuf>,
    /// Path to raw negotiation lines, compiled into offers on load.
    #[arg(long)]
    negotiations: Option<PathBuf>,
    /// Where to write the enriched output.
    #[arg(long, default_value = "sell_out_final.json")]
    output: PathBuf,
    /// Run on synthesized collections instead of files.
    #[arg(long)]
    demo: bool,
    /// RNG seed for --demo; omit to seed from the OS.
    #[arg(long)]
    seed: Option<u64>,
    /// Number of synthetic sell-out lines for --demo.
    #[arg(long, default_value_t = 200)]
    demo_transactions: usize,
}

/// Explicit run configuration, assembled from the CLI.
///
/// The pipeline has no implicit global paths; everything it touches is
/// named here.
#[derive(Debug)]
struct PipelineConfig {
    inputs: InputSelection,
    output: PathBuf,
}

#[derive(Debug)]
enum InputSelection {
    Files {
        transactions: PathBuf,
        products: PathBuf,
        customers: PathBuf,
        offers: OfferSource,
    },
    Demo {
        transactions: usize,
        seed: Option<u64>,
    },
}

impl Cli {
    fn into_config(self) -> anyhow::Result<PipelineConfig> {
        let inputs = if self.demo {
            InputSelection::Demo { transactions: self.demo_transactions, seed: self.seed }
        } else {
            let offers = match (self.offers, self.negotiations) {
                (Some(path), None) => OfferSource::Precompiled(path),
                (None, Some(path)) => OfferSource::Negotiations(path),
                // clap already rejects the combination; keep the arm anyway
                // so config assembly never panics.
                (None, None) | (Some(_), Some(_)) => {
                    anyhow::bail!("exactly one of --offers or --negotiations is required (or --demo)")
                }
            };
            InputSelection::Files {
                transactions: self
                    .transactions
                    .context("--transactions is required without --demo")?,
                products: self.products.context("--products is required without --demo")?,
                customers: self.customers.context("--customers is required without --demo")?,
                offers,
            }
        };
        Ok(PipelineConfig { inputs, output: self.output })
    }
}

fn main() -> anyhow::Result<()> {
    telemetry::init("info").context("failed to initialize telemetry")?;
    let config = Cli::parse().into_config()?;
    run(&config)
}

/// Run one batch against the configured adapters.
fn run(config: &PipelineConfig) -> anyhow::Result<()> {
    let run_id = uuid::Uuid::new_v4();
    tracing::info!("pipeline.start: run_id={run_id}");

    // Batch-level precondition: all four collections must load, or the run
    // stops here before any transaction work.
    let collections = match &config.inputs {
        InputSelection::Files { transactions, products, customers, offers } => JsonFileStore::new(
            transactions.clone(),
            products.clone(),
            customers.clone(),
            offers.clone(),
        )
        .load()
        .context("failed to load input collections")?,
        InputSelection::Demo { transactions, seed } => DemoStore::new(*transactions, *seed)
            .load()
            .context("failed to generate demo collections")?,
    };
    let InputCollections { transactions, products, customers, offers } = collections;

    let enricher_config =
        EnricherConfig::builder().build().context("failed to build enricher config")?;
    let index = indexer::build(products, customers, offers, enricher_config.variant_suffix_len);

    let enricher = Enricher::new(enricher_config);
    let diagnostics = LogDiagnostics::new();
    let enriched = enricher.enrich_batch(transactions, &index, &diagnostics);

    let offers_applied =
        enriched.iter().filter(|record| record.enrichment.cost_condition.is_some()).count();

    JsonFileSink::new(config.output.clone())
        .write_batch(&enriched)
        .context("failed to write enriched output")?;

    let totals = diagnostics.totals();
    tracing::info!(
        "pipeline.done: run_id={run_id} records={} offers_applied={offers_applied} \
         offer_misses={} outside_window={} incomplete_windows={} malformed_dates={} \
         invalid_numeric_fields={}",
        enriched.len(),
        totals.offer_misses,
        totals.outside_window,
        totals.incomplete_windows,
        totals.malformed_dates,
        totals.invalid_numeric_fields
    );
    Ok(())
}
