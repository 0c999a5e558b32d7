//! `stockroom browse`: page through a product file with the table engine

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Args;
use comfy_table::{Table, presets::UTF8_FULL};
use stockroom_catalog::ProductRecord;
use stockroom_settings::StockroomSettings;
use stockroom_table::{
    ColumnDef, ColumnKind, DataTable, DateRange, FilterValue, NumberRange, RowId, SortColumn,
    SortDirection, SubRow, TableView, Value,
};

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// JSON file holding an array of products
    pub file: PathBuf,

    /// Text matched against every filterable column
    #[arg(short, long)]
    pub search: Option<String>,

    /// Column filter; repeatable
    #[arg(short, long = "filter", value_name = "COLUMN=TEXT", value_parser = parse_column_filter)]
    pub filters: Vec<(String, String)>,

    /// Only products created on or after this day
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub created_from: Option<NaiveDate>,

    /// Only products created on or before this day
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub created_to: Option<NaiveDate>,

    /// Only products with at most this much stock
    #[arg(long)]
    pub max_stock: Option<f64>,

    /// Sort key; repeatable, the first one is primary
    #[arg(long = "sort", value_name = "COLUMN[:asc|desc]", value_parser = parse_sort)]
    pub sort: Vec<SortColumn>,

    /// 1-based page number
    #[arg(short, long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page [default: from settings]
    #[arg(long)]
    pub page_size: Option<usize>,

    /// Show the variants of the product with this SKU; repeatable
    #[arg(short, long, value_name = "SKU")]
    pub expand: Vec<String>,

    /// Show the variants of every product on the page
    #[arg(long, conflicts_with = "expand")]
    pub expand_all: bool,

    /// Hide a column; repeatable
    #[arg(long, value_name = "COLUMN")]
    pub hide: Vec<String>,
}

pub fn run(args: BrowseArgs, settings: &StockroomSettings) -> Result<()> {
    let products = load_products(&args.file)?;
    let mut table = product_table(products, settings)?;
    apply_args(&mut table, &args);
    println!("{}", render(&table.view()));
    Ok(())
}

pub fn load_products(path: &Path) -> Result<Vec<ProductRecord>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read products from {:?}", path))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse products JSON in {:?}", path))
}

pub fn product_columns() -> Vec<ColumnDef<ProductRecord>> {
    vec![
        ColumnDef::accessor("name", "Name", |p: &ProductRecord| p.name.as_str().into()),
        ColumnDef::accessor("sku", "SKU", |p: &ProductRecord| p.sku.as_str().into()).hideable(false),
        ColumnDef::accessor("category", "Category", |p: &ProductRecord| {
            p.category.clone().into()
        }),
        ColumnDef::accessor("price", "Price", |p: &ProductRecord| {
            Value::Decimal(format!("{:.2}", p.price))
        })
        .kind(ColumnKind::Number),
        ColumnDef::accessor("stock", "Stock", |p: &ProductRecord| {
            i64::from(p.total_stock()).into()
        })
        .kind(ColumnKind::Number),
        ColumnDef::accessor("variants", "Variants", |p: &ProductRecord| {
            (p.variants.len() as i64).into()
        })
        .kind(ColumnKind::Number)
        .filterable(false),
        ColumnDef::accessor("created_at", "Created", |p: &ProductRecord| {
            p.created_at.map(|at| at.date_naive()).into()
        })
        .kind(ColumnKind::Date)
        .filter_label("Created between"),
    ]
}

pub fn product_table(
    products: Vec<ProductRecord>,
    settings: &StockroomSettings,
) -> Result<DataTable<ProductRecord>> {
    let table = DataTable::new(products, product_columns())?
        .with_row_id(|p| RowId::from(p.sku.as_str()))
        .with_pagination(settings.table.pagination());
    Ok(table)
}

pub fn apply_args(table: &mut DataTable<ProductRecord>, args: &BrowseArgs) {
    table.set_global_filter(args.search.clone());

    for (column, text) in &args.filters {
        if table.column(column).is_none() {
            tracing::warn!(column, "unknown column, filter ignored");
        }
        table.set_column_filter(column, Some(FilterValue::text(text)));
    }
    if args.created_from.is_some() || args.created_to.is_some() {
        let range = DateRange::days(args.created_from, args.created_to);
        table.set_column_filter("created_at", Some(FilterValue::DateRange(range)));
    }
    if let Some(max) = args.max_stock {
        let range = NumberRange::new(None, Some(max));
        table.set_column_filter("stock", Some(FilterValue::NumberRange(range)));
    }

    if !args.sort.is_empty() {
        table.set_sorting(args.sort.clone());
    }
    if let Some(page_size) = args.page_size {
        table.set_page_size(page_size);
    }
    table.go_to_page(args.page.saturating_sub(1));

    for column in &args.hide {
        table.set_column_visible(column, false);
    }

    for sku in &args.expand {
        if !table.toggle_expanded(&RowId::from(sku.as_str())) {
            tracing::warn!(sku, "no product with this SKU to expand");
        }
    }
    if args.expand_all {
        let ids: Vec<RowId> = table.view().rows().iter().map(|r| r.id.clone()).collect();
        for id in &ids {
            table.set_expanded(id, true);
        }
    }
}

pub fn render(view: &TableView<'_, ProductRecord>) -> String {
    let columns = view.columns();
    let mut output = Table::new();
    output
        .load_preset(UTF8_FULL)
        .set_header(columns.iter().map(|column| column.header()));

    let renderer = |product: &ProductRecord, _visual_index: usize| variant_lines(product);
    for row in view.rows() {
        output.add_row(columns.iter().map(|column| column.value(row.row).to_string()));

        if let SubRow::Expanded { col_span, content } = view.sub_row(row, Some(&renderer)) {
            let padding = std::iter::repeat_n(String::new(), col_span.saturating_sub(1));
            output.add_row(std::iter::once(content).chain(padding));
        }
    }

    format!("{output}\n{}", view.status_text())
}

fn variant_lines(product: &ProductRecord) -> String {
    if product.variants.is_empty() {
        return "  (no variants)".to_string();
    }
    product
        .variants
        .iter()
        .map(|variant| {
            let low = if variant.is_below_minimum() { "  LOW" } else { "" };
            format!(
                "  {} {} stock {}{}",
                variant.sku,
                variant.label(),
                variant.stock.unwrap_or(0),
                low
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn parse_column_filter(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((column, text)) if !column.trim().is_empty() => {
            Ok((column.trim().to_string(), text.to_string()))
        }
        _ => Err(format!("expected COLUMN=TEXT, got '{raw}'")),
    }
}

fn parse_sort(raw: &str) -> Result<SortColumn, String> {
    let (column, direction) = match raw.rsplit_once(':') {
        Some((column, "asc")) => (column, SortDirection::Ascending),
        Some((column, "desc")) => (column, SortDirection::Descending),
        Some((_, other)) => return Err(format!("unknown sort direction '{other}'")),
        None => (raw, SortDirection::Ascending),
    };
    if column.is_empty() {
        return Err("sort column is empty".to_string());
    }
    Ok(SortColumn::new(column, direction))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use stockroom_catalog::{VariantOption, VariantRecord};

    fn products() -> Vec<ProductRecord> {
        let mut shirt = ProductRecord::new("Camiseta", "CAM");
        shirt.price = 49.9;
        shirt.has_variants = true;
        shirt.created_at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).single();
        shirt.variants = vec![VariantRecord {
            sku: "CAM-AZ".into(),
            stock: Some(2),
            minimum_stock: Some(5),
            options: vec![VariantOption::new("Cor", "Azul")],
            ..VariantRecord::default()
        }];

        let mut mug = ProductRecord::new("Caneca", "CAN");
        mug.price = 19.0;
        mug.stock = Some(40);
        mug.created_at = Utc.with_ymd_and_hms(2024, 5, 10, 9, 0, 0).single();

        vec![shirt, mug]
    }

    fn args(file: &str) -> BrowseArgs {
        BrowseArgs {
            file: PathBuf::from(file),
            search: None,
            filters: vec![],
            created_from: None,
            created_to: None,
            max_stock: None,
            sort: vec![],
            page: 1,
            page_size: None,
            expand: vec![],
            expand_all: false,
            hide: vec![],
        }
    }

    fn skus(table: &DataTable<ProductRecord>) -> Vec<String> {
        table.view().rows().iter().map(|r| r.row.sku.clone()).collect()
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("price:desc").unwrap(), SortColumn::descending("price"));
        assert_eq!(parse_sort("name").unwrap(), SortColumn::ascending("name"));
        assert!(parse_sort("name:sideways").is_err());
        assert!(parse_sort(":desc").is_err());
    }

    #[test]
    fn test_parse_column_filter() {
        assert_eq!(
            parse_column_filter("category=roupas").unwrap(),
            ("category".to_string(), "roupas".to_string())
        );
        assert!(parse_column_filter("=x").is_err());
        assert!(parse_column_filter("nothing").is_err());
    }

    #[test]
    fn test_filters_and_sorting_from_args() {
        let settings = StockroomSettings::default();
        let mut table = product_table(products(), &settings).unwrap();

        let mut by_price = args("p.json");
        by_price.sort = vec![SortColumn::ascending("price")];
        apply_args(&mut table, &by_price);
        assert_eq!(skus(&table), vec!["CAN", "CAM"]);

        let mut recent = args("p.json");
        recent.created_from = NaiveDate::from_ymd_opt(2024, 4, 1);
        apply_args(&mut table, &recent);
        assert_eq!(skus(&table), vec!["CAN"]);
    }

    #[test]
    fn test_max_stock_uses_variant_totals() {
        let settings = StockroomSettings::default();
        let mut table = product_table(products(), &settings).unwrap();
        let mut low = args("p.json");
        low.max_stock = Some(10.0);
        apply_args(&mut table, &low);
        assert_eq!(skus(&table), vec!["CAM"]);
    }

    #[test]
    fn test_render_shows_expanded_variants() {
        let settings = StockroomSettings::default();
        let mut table = product_table(products(), &settings).unwrap();
        let mut expanded = args("p.json");
        expanded.expand = vec!["CAM".into()];
        expanded.hide = vec!["category".into()];
        apply_args(&mut table, &expanded);

        let output = render(&table.view());

        assert!(output.contains("CAM-AZ Azul stock 2  LOW"));
        assert!(!output.contains("Category"));
        assert!(output.contains("49.90"));
        assert!(output.ends_with("Page 1 of 1 (2 rows)"));
    }
}
