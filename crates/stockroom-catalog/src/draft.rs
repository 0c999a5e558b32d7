//! Form-side product state
//!
//! A `ProductDraft` is the single owner of a product being edited. Attribute
//! edits regenerate the variant list against the variants the draft already
//! holds, so stock and images entered for a combination survive as long as
//! that combination is still produced.

use crate::records::{AttributeDefinition, ProductRecord, VariantRecord};
use crate::variants::{VariantRequest, generate_variants};

#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    record: ProductRecord,
    /// Minimum stock given to newly generated variants
    default_minimum_stock: Option<u32>,
}

impl ProductDraft {
    pub fn new(default_minimum_stock: Option<u32>) -> Self {
        Self {
            record: ProductRecord::default(),
            default_minimum_stock,
        }
    }

    /// Start editing an existing product
    pub fn from_record(record: ProductRecord, default_minimum_stock: Option<u32>) -> Self {
        Self {
            record,
            default_minimum_stock,
        }
    }

    pub fn record(&self) -> &ProductRecord {
        &self.record
    }

    pub fn into_record(self) -> ProductRecord {
        self.record
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.record.name = name.into();
    }

    /// Change the base SKU. Existing variant SKUs are left as entered.
    pub fn set_sku(&mut self, sku: impl Into<String>) {
        self.record.sku = sku.into();
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.record.category = category;
    }

    pub fn set_description(&mut self, description: Option<String>) {
        self.record.description = description;
    }

    pub fn set_price(&mut self, price: f64) {
        self.record.price = price;
    }

    pub fn has_variants(&self) -> bool {
        self.record.has_variants
    }

    /// Turning variants off discards attributes and variants.
    pub fn set_has_variants(&mut self, has_variants: bool) {
        self.record.has_variants = has_variants;
        if !has_variants {
            self.record.attributes.clear();
            self.record.variants.clear();
        } else {
            self.record.stock = None;
            self.record.minimum_stock = None;
        }
    }

    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.record.attributes
    }

    /// Replace the attributes and regenerate the variants
    pub fn set_attributes(&mut self, attributes: Vec<AttributeDefinition>) {
        self.record.attributes = attributes;
        self.regenerate();
    }

    /// Rebuild the variant list from the current attributes
    pub fn regenerate(&mut self) {
        if !self.record.has_variants {
            tracing::trace!("variants disabled, skipping generation");
            return;
        }
        let request = VariantRequest {
            sku_base: self.record.sku.clone(),
            attributes: self.record.attributes.clone(),
            minimum_stock: self.default_minimum_stock,
            existing_variants: std::mem::take(&mut self.record.variants),
        };
        self.record.variants = generate_variants(&request);
    }

    pub fn variants(&self) -> &[VariantRecord] {
        &self.record.variants
    }

    /// Edit one variant's stock fields by SKU
    pub fn variant_mut(&mut self, sku: &str) -> Option<&mut VariantRecord> {
        self.record.variant_mut(sku)
    }

    /// Stock fields used when the product has no variants
    pub fn set_stock(&mut self, stock: Option<u32>, minimum_stock: Option<u32>) {
        self.record.stock = stock;
        self.record.minimum_stock = minimum_stock;
    }
}
