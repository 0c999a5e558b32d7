//! Common test fixtures

#![allow(dead_code)]

use chrono::NaiveDate;
use stockroom_table::{ColumnDef, ColumnKind, DataTable, RowId};

/// Product row as the inventory listing shows it
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub category: Option<String>,
    pub stock: i64,
    pub created_at: NaiveDate,
    pub variants: Vec<String>,
}

impl ProductRow {
    pub fn new(id: &str, name: &str, stock: i64, created_at: NaiveDate) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: None,
            stock,
            created_at,
            variants: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn with_variants(mut self, variants: &[&str]) -> Self {
        self.variants = variants.iter().map(|v| v.to_string()).collect();
        self
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn product_columns() -> Vec<ColumnDef<ProductRow>> {
    vec![
        ColumnDef::accessor("name", "Name", |p: &ProductRow| p.name.as_str().into()),
        ColumnDef::accessor("category", "Category", |p: &ProductRow| {
            p.category.clone().into()
        }),
        ColumnDef::accessor("stock", "Stock", |p: &ProductRow| p.stock.into())
            .kind(ColumnKind::Number),
        ColumnDef::accessor("created_at", "Created", |p: &ProductRow| p.created_at.into())
            .kind(ColumnKind::Date)
            .filter_label("Created between"),
        ColumnDef::display("actions", "", "Edit"),
    ]
}

/// `count` products named "Product 00".."Product NN", one day apart
pub fn sample_products(count: usize) -> Vec<ProductRow> {
    (0..count)
        .map(|i| {
            ProductRow::new(
                &format!("p-{i:02}"),
                &format!("Product {i:02}"),
                i as i64,
                date(2024, 1, 1) + chrono::Days::new(i as u64),
            )
        })
        .collect()
}

pub fn product_table(rows: Vec<ProductRow>) -> DataTable<ProductRow> {
    DataTable::new(rows, product_columns())
        .unwrap()
        .with_row_id(|p| RowId::from(p.id.as_str()))
}

pub fn visible_ids(table: &DataTable<ProductRow>) -> Vec<String> {
    table.view().rows().iter().map(|r| r.id.to_string()).collect()
}
