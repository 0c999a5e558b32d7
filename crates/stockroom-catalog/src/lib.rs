//! Product catalog domain
//!
//! Everything the product form needs that is not presentation:
//!
//! - [`generate_variants`] - Cartesian-product variant generation reconciled
//!   against the variants a product already has
//! - [`ProductDraft`] - form-side owner of attributes and variants
//! - [`Wizard`] - step state machine for the product form
//! - [`StockLedger`] - stock entries, exits and adjustments per variant
//! - [`CatalogStore`] / [`ImageHost`] - persistence and image upload boundaries
//! - [`CatalogService`] - validation and orchestration over those boundaries
//!
//! # Architecture
//!
//! ```text
//! Product form (excluded)
//!     ↓
//! CatalogService ← ProductDraft, Wizard, StockLedger
//!     ↓
//! CatalogStore / ImageHost (remote, excluded)
//! ```

mod draft;
mod error;
mod ledger;
mod records;
mod service;
mod store;
mod variants;
mod wizard;

pub use draft::ProductDraft;
pub use error::{CatalogError, CatalogResult, StoreError};
pub use ledger::{MovementKind, StockLedger, StockMovement, low_stock};
pub use records::{AttributeDefinition, ProductRecord, VariantImage, VariantOption, VariantRecord};
pub use service::CatalogService;
pub use store::{CatalogStore, HostedImage, ImageHost, InMemoryCatalogStore};
pub use variants::{
    COMBINATION_SEPARATOR, VariantRequest, combination_key, generate_variants,
    parse_attribute_values, variant_sku,
};
pub use wizard::{StepVisibility, Transition, Wizard, WizardStep};
