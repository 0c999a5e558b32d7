//! Stock movements
//!
//! Every change to a variant's stock goes through the ledger as an entry,
//! an exit or an absolute adjustment, and is kept as history once applied.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};
use crate::records::{ProductRecord, VariantRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods received
    Entry,
    /// Goods shipped or consumed
    Exit,
    /// Stock count correction; `quantity` is the new level
    Adjustment,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub variant_sku: String,
    pub kind: MovementKind,
    pub quantity: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

impl StockMovement {
    pub fn new(variant_sku: impl Into<String>, kind: MovementKind, quantity: u32) -> Self {
        Self {
            variant_sku: variant_sku.into(),
            kind,
            quantity,
            reason: None,
            occurred_at: Utc::now(),
        }
    }

    pub fn entry(variant_sku: impl Into<String>, quantity: u32) -> Self {
        Self::new(variant_sku, MovementKind::Entry, quantity)
    }

    pub fn exit(variant_sku: impl Into<String>, quantity: u32) -> Self {
        Self::new(variant_sku, MovementKind::Exit, quantity)
    }

    pub fn adjustment(variant_sku: impl Into<String>, level: u32) -> Self {
        Self::new(variant_sku, MovementKind::Adjustment, level)
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    pub fn at(mut self, occurred_at: DateTime<Utc>) -> Self {
        self.occurred_at = occurred_at;
        self
    }

    /// Stock level after applying this movement to `current`
    fn resulting_level(&self, current: u32) -> CatalogResult<u32> {
        match self.kind {
            MovementKind::Entry => Ok(current.saturating_add(self.quantity)),
            MovementKind::Exit => {
                current
                    .checked_sub(self.quantity)
                    .ok_or_else(|| CatalogError::InsufficientStock {
                        sku: self.variant_sku.clone(),
                        available: current,
                        requested: self.quantity,
                    })
            }
            MovementKind::Adjustment => Ok(self.quantity),
        }
    }
}

/// Applied movements, oldest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLedger {
    movements: Vec<StockMovement>,
}

impl StockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a movement to the matching variant, or to the product itself
    /// when it has no variants and the SKU is its own. Returns the new level.
    ///
    /// Nothing is changed or recorded when the movement fails.
    pub fn apply(
        &mut self,
        product: &mut ProductRecord,
        movement: StockMovement,
    ) -> CatalogResult<u32> {
        let stock = if !product.has_variants && product.sku == movement.variant_sku {
            &mut product.stock
        } else {
            &mut product
                .variant_mut(&movement.variant_sku)
                .ok_or_else(|| CatalogError::VariantNotFound(movement.variant_sku.clone()))?
                .stock
        };

        let before = stock.unwrap_or(0);
        let after = movement.resulting_level(before)?;
        *stock = Some(after);

        tracing::debug!(
            sku = %movement.variant_sku,
            kind = ?movement.kind,
            before,
            after,
            "stock movement applied"
        );
        self.movements.push(movement);
        Ok(after)
    }

    /// Move every movement of `other` to the end of this ledger
    pub fn append(&mut self, other: StockLedger) {
        self.movements.extend(other.movements);
    }

    pub fn movements(&self) -> &[StockMovement] {
        &self.movements
    }

    pub fn history_for<'a>(&'a self, sku: &'a str) -> impl Iterator<Item = &'a StockMovement> {
        self.movements.iter().filter(move |m| m.variant_sku == sku)
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}

/// Variants whose stock is below their minimum
pub fn low_stock(variants: &[VariantRecord]) -> Vec<&VariantRecord> {
    variants.iter().filter(|v| v.is_below_minimum()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::VariantOption;
    use pretty_assertions::assert_eq;

    fn product() -> ProductRecord {
        let mut product = ProductRecord::new("Camiseta", "CAM");
        product.has_variants = true;
        product.variants = vec![
            VariantRecord {
                sku: "CAM-AZ".into(),
                stock: Some(10),
                minimum_stock: Some(5),
                options: vec![VariantOption::new("Cor", "Azul")],
                ..VariantRecord::default()
            },
            VariantRecord {
                sku: "CAM-PR".into(),
                minimum_stock: Some(1),
                options: vec![VariantOption::new("Cor", "Preto")],
                ..VariantRecord::default()
            },
        ];
        product
    }

    #[test]
    fn test_entry_exit_and_adjustment() {
        let mut product = product();
        let mut ledger = StockLedger::new();

        assert_eq!(ledger.apply(&mut product, StockMovement::entry("CAM-PR", 4)).unwrap(), 4);
        assert_eq!(ledger.apply(&mut product, StockMovement::exit("CAM-AZ", 3)).unwrap(), 7);
        assert_eq!(
            ledger
                .apply(&mut product, StockMovement::adjustment("CAM-AZ", 2).with_reason("recount"))
                .unwrap(),
            2
        );

        assert_eq!(product.variant("CAM-AZ").unwrap().stock, Some(2));
        assert_eq!(ledger.history_for("CAM-AZ").count(), 2);
        assert_eq!(ledger.len(), 3);
    }

    #[test]
    fn test_exit_beyond_stock_fails_without_side_effects() {
        let mut product = product();
        let mut ledger = StockLedger::new();

        let err = ledger
            .apply(&mut product, StockMovement::exit("CAM-AZ", 11))
            .unwrap_err();

        assert!(matches!(
            err,
            CatalogError::InsufficientStock { available: 10, requested: 11, .. }
        ));
        assert_eq!(product.variant("CAM-AZ").unwrap().stock, Some(10));
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_unknown_sku() {
        let mut product = product();
        let err = StockLedger::new()
            .apply(&mut product, StockMovement::entry("CAM-VE", 1))
            .unwrap_err();
        assert!(matches!(err, CatalogError::VariantNotFound(sku) if sku == "CAM-VE"));
    }

    #[test]
    fn test_product_without_variants_uses_own_stock() {
        let mut product = ProductRecord::new("Caneca", "CAN");
        let mut ledger = StockLedger::new();
        ledger.apply(&mut product, StockMovement::entry("CAN", 6)).unwrap();
        assert_eq!(product.stock, Some(6));
    }

    #[test]
    fn test_low_stock() {
        let product = product();
        let low: Vec<&str> = low_stock(&product.variants).iter().map(|v| v.sku.as_str()).collect();
        assert_eq!(low, vec!["CAM-PR"]);
    }
}
