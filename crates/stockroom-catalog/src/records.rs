//! Product and variant records as they travel to and from the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::variants::combination_key;

/// A named attribute with a comma-separated list of values, e.g. `Cor` / `"Azul, Preto"`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    pub values: String,
}

impl AttributeDefinition {
    pub fn new(name: impl Into<String>, values: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }
}

/// One attribute value chosen by a variant
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VariantOption {
    pub name: String,
    pub value: String,
}

impl VariantOption {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Image attached to a variant; `url` and `public_id` come from the image host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantImage {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_id: Option<String>,
}

impl VariantImage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: None,
            public_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRecord {
    /// Assigned by the store; absent until first saved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<u32>,
    pub options: Vec<VariantOption>,
    #[serde(default)]
    pub images: Vec<VariantImage>,
}

impl VariantRecord {
    /// Canonical identity of this variant's option set
    pub fn combination_key(&self) -> String {
        combination_key(&self.options)
    }

    pub fn option(&self, name: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.name == name)
            .map(|option| option.value.as_str())
    }

    /// Option values joined for display, e.g. "Azul / P"
    pub fn label(&self) -> String {
        self.options
            .iter()
            .map(|option| option.value.as_str())
            .collect::<Vec<_>>()
            .join(" / ")
    }

    pub fn is_below_minimum(&self) -> bool {
        match self.minimum_stock {
            Some(minimum) => self.stock.unwrap_or(0) < minimum,
            None => false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    /// Base SKU; variant SKUs are derived from it
    pub sku: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub has_variants: bool,
    #[serde(default)]
    pub attributes: Vec<AttributeDefinition>,
    #[serde(default)]
    pub variants: Vec<VariantRecord>,
    /// Used when the product has no variants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<u32>,
    /// Used when the product has no variants
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl ProductRecord {
    pub fn new(name: impl Into<String>, sku: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sku: sku.into(),
            ..Self::default()
        }
    }

    /// Stock across all variants, or the product's own stock without variants
    pub fn total_stock(&self) -> u32 {
        if self.has_variants {
            self.variants.iter().map(|v| v.stock.unwrap_or(0)).sum()
        } else {
            self.stock.unwrap_or(0)
        }
    }

    pub fn variant(&self, sku: &str) -> Option<&VariantRecord> {
        self.variants.iter().find(|v| v.sku == sku)
    }

    pub fn variant_mut(&mut self, sku: &str) -> Option<&mut VariantRecord> {
        self.variants.iter_mut().find(|v| v.sku == sku)
    }
}
