use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog errors with user-facing messages
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Product name is required")]
    MissingName,

    #[error("SKU base is required")]
    MissingSku,

    #[error("Product has variants enabled but none were generated")]
    NoVariants,

    #[error("Product not found: {0}")]
    ProductNotFound(String),

    #[error("Variant not found: {0}")]
    VariantNotFound(String),

    #[error("Insufficient stock for {sku}: {available} available, {requested} requested")]
    InsufficientStock {
        sku: String,
        available: u32,
        requested: u32,
    },

    #[error("Invalid wizard: {0}")]
    InvalidWizard(String),

    #[error("No image host configured")]
    ImageHostUnavailable,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures reported by the persistence and image-host boundaries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Write rejected: {0}")]
    Rejected(String),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),
}
