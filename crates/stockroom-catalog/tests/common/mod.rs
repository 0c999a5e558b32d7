//! Common test utilities and mocks

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use stockroom_catalog::{
    CatalogStore, HostedImage, ImageHost, ProductRecord, StoreError, VariantImage, VariantOption,
    VariantRecord,
};

/// Image host that records uploads and hands out predictable ids
#[derive(Default)]
pub struct MockImageHost {
    pub should_fail: bool,
    pub uploads: Arc<parking_lot::Mutex<Vec<(String, usize)>>>,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(&self, file_name: &str, bytes: Vec<u8>) -> Result<HostedImage, StoreError> {
        if self.should_fail {
            return Err(StoreError::UploadFailed("mock host offline".into()));
        }
        let mut uploads = self.uploads.lock();
        uploads.push((file_name.to_string(), bytes.len()));
        let public_id = format!("img-{}", uploads.len());
        Ok(HostedImage {
            url: format!("https://images.test/{public_id}/{file_name}"),
            public_id,
        })
    }
}

/// Store whose writes always fail
pub struct FailingStore;

#[async_trait]
impl CatalogStore for FailingStore {
    async fn save_product(&self, _product: ProductRecord) -> Result<ProductRecord, StoreError> {
        Err(StoreError::Unavailable("mock store offline".into()))
    }

    async fn get_product(&self, _id: &str) -> Result<Option<ProductRecord>, StoreError> {
        Ok(None)
    }

    async fn list_products(&self) -> Result<Vec<ProductRecord>, StoreError> {
        Err(StoreError::Unavailable("mock store offline".into()))
    }
}

pub fn options(pairs: &[(&str, &str)]) -> Vec<VariantOption> {
    pairs
        .iter()
        .map(|(name, value)| VariantOption::new(*name, *value))
        .collect()
}

/// Variant as it comes back from the store after being edited
pub fn stored_variant(id: &str, sku: &str, stock: u32, pairs: &[(&str, &str)]) -> VariantRecord {
    VariantRecord {
        id: Some(id.to_string()),
        sku: sku.to_string(),
        stock: Some(stock),
        minimum_stock: Some(1),
        options: options(pairs),
        images: vec![VariantImage::new(format!("img-{id}"))],
    }
}
