//! `stockroom variants` and `stockroom stock`

use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::{ArgGroup, Args};
use comfy_table::{Table, presets::UTF8_FULL};
use stockroom_catalog::{
    CatalogService, InMemoryCatalogStore, MovementKind, ProductRecord, StockMovement,
    VariantRecord, VariantRequest, generate_variants,
};
use stockroom_settings::StockroomSettings;

use crate::browse::load_products;

#[derive(Debug, Args)]
pub struct VariantsArgs {
    /// JSON variant request (`skuBase`, `attributes`, `existingVariants`); `-` reads stdin
    pub input: PathBuf,

    /// Minimum stock for new variants [default: request, then settings]
    #[arg(long)]
    pub minimum_stock: Option<u32>,

    /// Print a table instead of JSON
    #[arg(long)]
    pub table: bool,
}

pub fn run_variants(args: VariantsArgs, settings: &StockroomSettings) -> Result<()> {
    let mut request = read_request(&args.input)?;
    request.minimum_stock = args
        .minimum_stock
        .or(request.minimum_stock)
        .or(settings.catalog.default_minimum_stock);

    let variants = generate_variants(&request);
    if variants.is_empty() {
        tracing::warn!("no variants generated, every attribute needs at least one value");
    }

    if args.table {
        println!("{}", variants_table(&variants));
    } else {
        println!("{}", serde_json::to_string_pretty(&variants)?);
    }
    Ok(())
}

fn read_request(input: &Path) -> Result<VariantRequest> {
    let content = if input == Path::new("-") {
        let mut buffer = String::new();
        std::io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read variant request from stdin")?;
        buffer
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("Failed to read variant request from {:?}", input))?
    };
    serde_json::from_str(&content).with_context(|| "Failed to parse variant request JSON")
}

fn variants_table(variants: &[VariantRecord]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(["SKU", "Options", "Stock", "Minimum", "Status"]);
    for variant in variants {
        let status = if variant.id.is_some() { "kept" } else { "new" };
        table.add_row([
            variant.sku.clone(),
            variant.label(),
            variant.stock.map(|s| s.to_string()).unwrap_or_default(),
            variant.minimum_stock.map(|s| s.to_string()).unwrap_or_default(),
            status.to_string(),
        ]);
    }
    table
}

#[derive(Debug, Args)]
#[command(group(ArgGroup::new("movement").required(true).args(["entry", "exit", "adjust"])))]
pub struct StockArgs {
    /// JSON file holding an array of products; rewritten with the new stock
    pub file: PathBuf,

    /// Variant SKU, or the product SKU for products without variants
    #[arg(long)]
    pub sku: String,

    /// Add this many units
    #[arg(long)]
    pub entry: Option<u32>,

    /// Remove this many units
    #[arg(long)]
    pub exit: Option<u32>,

    /// Set the stock level after a count
    #[arg(long)]
    pub adjust: Option<u32>,

    #[arg(long)]
    pub reason: Option<String>,

    /// Print the new level without writing the file
    #[arg(long)]
    pub dry_run: bool,
}

impl StockArgs {
    fn movement(&self) -> Result<StockMovement> {
        let (kind, quantity) = match (self.entry, self.exit, self.adjust) {
            (Some(n), None, None) => (MovementKind::Entry, n),
            (None, Some(n), None) => (MovementKind::Exit, n),
            (None, None, Some(n)) => (MovementKind::Adjustment, n),
            _ => bail!("exactly one of --entry, --exit or --adjust is required"),
        };
        let movement = StockMovement::new(self.sku.as_str(), kind, quantity);
        Ok(match &self.reason {
            Some(reason) => movement.with_reason(reason.as_str()),
            None => movement,
        })
    }
}

pub async fn run_stock(args: StockArgs) -> Result<()> {
    let movement = args.movement()?;
    let store = Arc::new(InMemoryCatalogStore::with_products(load_products(&args.file)?));
    let service = CatalogService::new(store);

    let products = service.list_products().await?;
    let product_id = owning_product(&products, &args.sku)
        .with_context(|| format!("No product has SKU {}", args.sku))?;

    let level = service.record_movement(&product_id, movement).await?;
    println!("{}: {level}", args.sku);

    if args.dry_run {
        return Ok(());
    }
    let products = service.list_products().await?;
    std::fs::write(&args.file, serde_json::to_string_pretty(&products)?)
        .with_context(|| format!("Failed to write products to {:?}", args.file))?;
    tracing::info!(file = ?args.file, "products updated");
    Ok(())
}

fn owning_product(products: &[ProductRecord], sku: &str) -> Option<String> {
    products
        .iter()
        .find(|p| (!p.has_variants && p.sku == sku) || p.variant(sku).is_some())
        .and_then(|p| p.id.clone())
}
