//! Persistence and image-host boundaries
//!
//! The remote database and the image host are external collaborators. The
//! catalog only sees these traits; failures come back as [`StoreError`] and
//! are never retried here.

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::StoreError;
use crate::records::ProductRecord;

/// Row sink and source for products
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Create (no id) or update (known id) a product; returns the stored record
    async fn save_product(&self, product: ProductRecord) -> Result<ProductRecord, StoreError>;

    async fn get_product(&self, id: &str) -> Result<Option<ProductRecord>, StoreError>;

    async fn list_products(&self) -> Result<Vec<ProductRecord>, StoreError>;
}

/// Where an uploaded image ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HostedImage {
    pub public_id: String,
    pub url: String,
}

/// Binary upload to an external image host
#[async_trait]
pub trait ImageHost: Send + Sync {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<HostedImage, StoreError>;
}

/// Process-local store; assigns ids the way the remote store would
#[derive(Debug, Default)]
pub struct InMemoryCatalogStore {
    products: RwLock<IndexMap<String, ProductRecord>>,
}

impl InMemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, assigning ids to records without one
    pub fn with_products(products: impl IntoIterator<Item = ProductRecord>) -> Self {
        let store = Self::new();
        {
            let mut stored = store.products.write();
            for product in products {
                let product = assign_ids(product);
                if let Some(id) = product.id.clone() {
                    stored.insert(id, product);
                }
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.products.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.read().is_empty()
    }
}

#[async_trait]
impl CatalogStore for InMemoryCatalogStore {
    async fn save_product(&self, product: ProductRecord) -> Result<ProductRecord, StoreError> {
        let mut products = self.products.write();
        if let Some(id) = &product.id
            && !products.contains_key(id)
        {
            return Err(StoreError::NotFound(id.clone()));
        }

        let product = assign_ids(product);
        let Some(id) = product.id.clone() else {
            return Err(StoreError::Rejected("product id missing after save".into()));
        };
        tracing::debug!(%id, variants = product.variants.len(), "product saved");
        products.insert(id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: &str) -> Result<Option<ProductRecord>, StoreError> {
        Ok(self.products.read().get(id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        Ok(self.products.read().values().cloned().collect())
    }
}

fn assign_ids(mut product: ProductRecord) -> ProductRecord {
    if product.id.is_none() {
        product.id = Some(Uuid::new_v4().to_string());
    }
    if product.created_at.is_none() {
        product.created_at = Some(Utc::now());
    }
    for variant in product.variants.iter_mut().filter(|v| v.id.is_none()) {
        variant.id = Some(Uuid::new_v4().to_string());
    }
    product
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::VariantRecord;

    #[tokio::test]
    async fn test_save_assigns_ids_then_updates() {
        let store = InMemoryCatalogStore::new();
        let mut product = ProductRecord::new("Camiseta", "CAM");
        product.variants.push(VariantRecord {
            sku: "CAM-AZ".into(),
            ..VariantRecord::default()
        });

        let saved = store.save_product(product).await.unwrap();
        let id = saved.id.clone().unwrap();
        assert!(saved.created_at.is_some());
        assert!(saved.variants[0].id.is_some());

        let mut renamed = saved.clone();
        renamed.name = "Camiseta básica".into();
        let updated = store.save_product(renamed).await.unwrap();

        assert_eq!(updated.id.as_deref(), Some(id.as_str()));
        assert_eq!(updated.variants[0].id, saved.variants[0].id);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_product(&id).await.unwrap().unwrap().name,
            "Camiseta básica"
        );
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_fails() {
        let store = InMemoryCatalogStore::new();
        let mut product = ProductRecord::new("Camiseta", "CAM");
        product.id = Some("missing".into());

        let err = store.save_product(product).await.unwrap_err();
        assert_eq!(err, StoreError::NotFound("missing".into()));
    }

    #[tokio::test]
    async fn test_seeded_products_keep_order() {
        let store = InMemoryCatalogStore::with_products([
            ProductRecord::new("B", "B"),
            ProductRecord::new("A", "A"),
        ]);
        let names: Vec<String> = store
            .list_products()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["B", "A"]);
    }
}
