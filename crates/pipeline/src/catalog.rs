//! Product catalog port.
//!
//! The durable catalog is owned by an external product store; the
//! import core only needs the three operations below. The in-memory
//! implementation backs tests and single-process deployments.

use std::collections::HashMap;

use async_trait::async_trait;
use outfred_core::catalog::{CatalogProduct, NewProduct, ProductPatch};
use outfred_core::types::ProductId;
use tokio::sync::RwLock;

/// Errors from the catalog collaborator.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// The backing store could not be reached or rejected the write.
    #[error("catalog unavailable: {0}")]
    Unavailable(String),

    /// An update targeted a product that no longer exists.
    #[error("catalog product {0} not found")]
    NotFound(ProductId),
}

/// The import core's view of the product catalog.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// All products belonging to a merchant, for building the match
    /// index.
    async fn list_for_merchant(&self, merchant_id: &str)
        -> Result<Vec<CatalogProduct>, CatalogError>;

    /// Create a product from an `added` candidate.
    async fn create(&self, product: NewProduct) -> Result<CatalogProduct, CatalogError>;

    /// Overwrite the patch fields on an existing product.
    async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<CatalogProduct, CatalogError>;
}

/// Process-local catalog implementation.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, CatalogProduct>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an existing product as-is. Test and seeding helper.
    pub async fn seed(&self, product: CatalogProduct) {
        self.products.write().await.insert(product.id, product);
    }

    /// Total product count across all merchants.
    pub async fn len(&self) -> usize {
        self.products.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.products.read().await.is_empty()
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn list_for_merchant(
        &self,
        merchant_id: &str,
    ) -> Result<Vec<CatalogProduct>, CatalogError> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .filter(|product| product.merchant_id == merchant_id)
            .cloned()
            .collect())
    }

    async fn create(&self, product: NewProduct) -> Result<CatalogProduct, CatalogError> {
        let now = chrono::Utc::now();
        let record = CatalogProduct {
            id: uuid::Uuid::new_v4(),
            merchant_id: product.merchant_id,
            name: product.name,
            price: product.price,
            color: product.color,
            size: product.size,
            image_url: product.image_url,
            sku: product.sku,
            stock: 0,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        self.products.write().await.insert(record.id, record.clone());
        Ok(record)
    }

    async fn update(
        &self,
        id: ProductId,
        patch: ProductPatch,
    ) -> Result<CatalogProduct, CatalogError> {
        let mut products = self.products.write().await;
        let product = products.get_mut(&id).ok_or(CatalogError::NotFound(id))?;

        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(color) = patch.color {
            product.color = Some(color);
        }
        if let Some(size) = patch.size {
            product.size = Some(size);
        }
        if let Some(image_url) = patch.image_url {
            product.image_url = Some(image_url);
        }
        product.updated_at = chrono::Utc::now();

        Ok(product.clone())
    }
}

// ── Tests ────────────────────────────────────────────────────────────
