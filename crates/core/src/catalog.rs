//! Catalog product shapes.
//!
//! The product catalog itself is an external collaborator; the import
//! core's only obligation is to produce valid creates and updates
//! against it. These types are the contract for those writes.

use serde::{Deserialize, Serialize};

use crate::candidate::CandidateProduct;
use crate::types::{ProductId, Timestamp};

/// A durable catalog product owned by the external product store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogProduct {
    pub id: ProductId,
    pub merchant_id: String,
    pub name: String,
    pub price: f64,
    pub color: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
    pub stock: i64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields for creating a catalog product from an `added` candidate.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub merchant_id: String,
    pub name: String,
    pub price: f64,
    pub color: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
    pub sku: Option<String>,
}

impl NewProduct {
    /// Build a create from a valid candidate.
    ///
    /// The caller must have checked [`CandidateProduct::validation_error`]
    /// first; a missing price falls back to zero rather than panicking.
    pub fn from_candidate(merchant_id: &str, candidate: &CandidateProduct) -> Self {
        Self {
            merchant_id: merchant_id.to_string(),
            name: candidate.name.trim().to_string(),
            price: candidate.price.unwrap_or(0.0),
            color: candidate.color.clone(),
            size: candidate.size.clone(),
            image_url: candidate.image_url.clone(),
            sku: candidate.sku.clone(),
        }
    }
}

/// Fields an `updated` outcome overwrites on an existing product.
///
/// `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
    pub price: Option<f64>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub image_url: Option<String>,
}

impl ProductPatch {
    /// Build the overwrite set from a valid candidate.
    pub fn from_candidate(candidate: &CandidateProduct) -> Self {
        Self {
            price: candidate.price,
            color: candidate.color.clone(),
            size: candidate.size.clone(),
            image_url: candidate.image_url.clone(),
        }
    }
}
