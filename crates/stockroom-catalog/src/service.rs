//! Catalog service
//!
//! Orchestrates validation, persistence, stock movements and image uploads
//! over the [`CatalogStore`] and [`ImageHost`] boundaries.

use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::error::{CatalogError, CatalogResult};
use crate::ledger::{StockLedger, StockMovement};
use crate::records::{ProductRecord, VariantImage};
use crate::store::{CatalogStore, ImageHost};

pub struct CatalogService {
    store: Arc<dyn CatalogStore>,
    images: Option<Arc<dyn ImageHost>>,
    ledger: Mutex<StockLedger>,
}

impl CatalogService {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            images: None,
            ledger: Mutex::new(StockLedger::new()),
        }
    }

    pub fn with_image_host(mut self, images: Arc<dyn ImageHost>) -> Self {
        self.images = Some(images);
        self
    }

    /// Check what the store cannot: required fields and generated variants
    pub fn validate(product: &ProductRecord) -> CatalogResult<()> {
        if product.name.trim().is_empty() {
            return Err(CatalogError::MissingName);
        }
        if product.sku.trim().is_empty() {
            return Err(CatalogError::MissingSku);
        }
        if product.has_variants && product.variants.is_empty() {
            return Err(CatalogError::NoVariants);
        }
        Ok(())
    }

    /// Validate and persist a product; returns the stored record
    #[tracing::instrument(skip(self, product), fields(sku = %product.sku))]
    pub async fn save_product(&self, product: ProductRecord) -> CatalogResult<ProductRecord> {
        Self::validate(&product)?;
        let saved = self.store.save_product(product).await.map_err(|e| {
            tracing::error!(error = %e, "failed to save product");
            e
        })?;
        tracing::info!(id = ?saved.id, "product saved");
        Ok(saved)
    }

    pub async fn list_products(&self) -> CatalogResult<Vec<ProductRecord>> {
        Ok(self.store.list_products().await?)
    }

    /// Apply a stock movement to a stored product and persist the result
    #[tracing::instrument(skip(self, movement), fields(sku = %movement.variant_sku))]
    pub async fn record_movement(
        &self,
        product_id: &str,
        movement: StockMovement,
    ) -> CatalogResult<u32> {
        let mut product = self
            .store
            .get_product(product_id)
            .await?
            .ok_or_else(|| CatalogError::ProductNotFound(product_id.to_string()))?;

        // Recorded only once the store accepted the new level
        let mut pending = StockLedger::new();
        let level = pending.apply(&mut product, movement)?;
        self.store.save_product(product).await?;
        self.ledger.lock().append(pending);
        Ok(level)
    }

    /// Movements recorded through this service, oldest first
    pub fn movements(&self) -> Vec<StockMovement> {
        self.ledger.lock().movements().to_vec()
    }

    /// Upload an image and attach it to one of the product's variants.
    ///
    /// The product is modified in place; saving it is up to the caller.
    #[tracing::instrument(skip(self, product, bytes), fields(size = bytes.len()))]
    pub async fn attach_image(
        &self,
        product: &mut ProductRecord,
        variant_sku: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> CatalogResult<VariantImage> {
        let images = self.images.as_ref().ok_or(CatalogError::ImageHostUnavailable)?;
        if product.variant(variant_sku).is_none() {
            return Err(CatalogError::VariantNotFound(variant_sku.to_string()));
        }

        let hosted = images.upload(file_name, bytes).await?;
        let image = VariantImage {
            id: Uuid::new_v4().to_string(),
            url: Some(hosted.url),
            public_id: Some(hosted.public_id),
        };

        product
            .variant_mut(variant_sku)
            .ok_or_else(|| CatalogError::VariantNotFound(variant_sku.to_string()))?
            .images
            .push(image.clone());
        Ok(image)
    }
}
