//! Variant generation
//!
//! Attributes are exploded into every combination of their values, in
//! declaration order. The result is reconciled against the product's current
//! variants by combination key: variants whose combination is still produced
//! are kept untouched (id, stock and images included), variants whose
//! combination disappeared are dropped, and the remaining combinations become
//! new variants with a derived SKU.
//!
//! An empty attribute list, or any attribute without values, generates
//! nothing. That is a normal outcome, not an error.

use std::collections::HashSet;

use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::records::{AttributeDefinition, VariantOption, VariantRecord};

/// Separator between `name:value` pairs in a combination key
pub const COMBINATION_SEPARATOR: &str = "|";

/// Input of [`generate_variants`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantRequest {
    pub sku_base: String,
    pub attributes: Vec<AttributeDefinition>,
    /// Minimum stock given to newly generated variants
    #[serde(default)]
    pub minimum_stock: Option<u32>,
    #[serde(default)]
    pub existing_variants: Vec<VariantRecord>,
}

/// Split a comma-separated value list, trimming and dropping blank entries.
///
/// Repeated values are kept.
pub fn parse_attribute_values(values: &str) -> Vec<String> {
    values
        .split(',')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical identity of an option set: `name:value` pairs sorted by name
pub fn combination_key(options: &[VariantOption]) -> String {
    options
        .iter()
        .sorted_by(|a, b| a.name.cmp(&b.name))
        .map(|option| format!("{}:{}", option.name, option.value))
        .join(COMBINATION_SEPARATOR)
}

/// `base-XX-YY..`: the first two characters of each option value, uppercased.
///
/// Distinct combinations may share a SKU when their values share a prefix.
/// Characters are Unicode scalar values, so a value starting with an astral
/// character (an emoji, say) contributes two of them rather than one.
pub fn variant_sku(sku_base: &str, options: &[VariantOption]) -> String {
    let codes = options
        .iter()
        .map(|option| option.value.chars().take(2).collect::<String>().to_uppercase())
        .join("-");
    format!("{sku_base}-{codes}")
}

/// Generate the variant list for a set of attributes.
///
/// Surviving variants come first in their original order, followed by new
/// variants in generation order. Repeated values collapse into a single
/// combination that keeps the position of its first occurrence.
pub fn generate_variants(request: &VariantRequest) -> Vec<VariantRecord> {
    let parsed: Vec<(&str, Vec<String>)> = request
        .attributes
        .iter()
        .map(|attribute| (attribute.name.as_str(), parse_attribute_values(&attribute.values)))
        .collect();

    if parsed.is_empty() || parsed.iter().any(|(_, values)| values.is_empty()) {
        tracing::debug!(
            attributes = parsed.len(),
            "nothing to generate, attribute list empty or missing values"
        );
        return Vec::new();
    }

    let combinations: IndexMap<String, Vec<VariantOption>> = parsed
        .iter()
        .map(|(name, values)| values.iter().map(move |value| VariantOption::new(*name, value)))
        .multi_cartesian_product()
        .map(|options| (combination_key(&options), options))
        .collect();

    let surviving: Vec<VariantRecord> = request
        .existing_variants
        .iter()
        .filter(|variant| combinations.contains_key(&variant.combination_key()))
        .cloned()
        .collect();
    let surviving_keys: HashSet<String> =
        surviving.iter().map(VariantRecord::combination_key).collect();

    let created: Vec<VariantRecord> = combinations
        .into_iter()
        .filter(|(key, _)| !surviving_keys.contains(key))
        .map(|(_, options)| VariantRecord {
            id: None,
            sku: variant_sku(&request.sku_base, &options),
            stock: None,
            minimum_stock: request.minimum_stock,
            options,
            images: Vec::new(),
        })
        .collect();

    tracing::debug!(
        kept = surviving.len(),
        dropped = request.existing_variants.len() - surviving.len(),
        created = created.len(),
        "generated variants"
    );

    let mut variants = surviving;
    variants.extend(created);
    variants
}
