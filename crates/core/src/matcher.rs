//! Candidate classification against a merchant's existing catalog.
//!
//! Pure logic: an index over existing products plus the decision table
//! deciding whether a candidate is a create, an overwrite, a duplicate,
//! or invalid. Duplicates are not failures and only
//! `update_existing = true` permits overwriting an existing product.

use std::collections::HashMap;

use crate::candidate::CandidateProduct;
use crate::catalog::CatalogProduct;
use crate::types::ProductId;

/// Normalize a product name into a match key: trimmed, internal
/// whitespace runs collapsed to single spaces, lowercased.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// What the matcher decided for one candidate.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchDecision {
    /// No existing match: create a new catalog product.
    Create,
    /// Existing match and `update_existing = true`: overwrite it.
    Update(ProductId),
    /// Existing match and `update_existing = false`: skip, no write.
    Duplicate(ProductId),
    /// The candidate cannot be written at all.
    Invalid(String),
}

/// Lookup index over a merchant's existing products.
///
/// SKU is the stronger identity signal, so an exact SKU match is
/// preferred over the normalized-name match. Products created during a
/// run are inserted back so a source containing the same product twice
/// matches its own earlier row.
#[derive(Debug, Default)]
pub struct CatalogIndex {
    by_sku: HashMap<String, ProductId>,
    by_name: HashMap<String, ProductId>,
}

impl CatalogIndex {
    pub fn build(products: &[CatalogProduct]) -> Self {
        let mut index = Self::default();
        for product in products {
            index.insert(product);
        }
        index
    }

    /// Register a product under its SKU and normalized name.
    pub fn insert(&mut self, product: &CatalogProduct) {
        if let Some(sku) = product.sku.as_deref() {
            let sku = sku.trim();
            if !sku.is_empty() {
                self.by_sku.insert(sku.to_string(), product.id);
            }
        }
        let key = normalize_name(&product.name);
        if !key.is_empty() {
            self.by_name.insert(key, product.id);
        }
    }

    /// Find the existing product a candidate matches, if any.
    pub fn find(&self, candidate: &CandidateProduct) -> Option<ProductId> {
        if let Some(sku) = candidate.sku.as_deref() {
            let sku = sku.trim();
            if !sku.is_empty() {
                if let Some(id) = self.by_sku.get(sku) {
                    return Some(*id);
                }
            }
        }
        self.by_name.get(&normalize_name(&candidate.name)).copied()
    }
}

/// Classify one candidate against the index.
pub fn classify(
    candidate: &CandidateProduct,
    index: &CatalogIndex,
    update_existing: bool,
) -> MatchDecision {
    if let Some(reason) = candidate.validation_error() {
        return MatchDecision::Invalid(reason);
    }
    match index.find(candidate) {
        Some(existing) if update_existing => MatchDecision::Update(existing),
        Some(existing) => MatchDecision::Duplicate(existing),
        None => MatchDecision::Create,
    }
}

// ── Tests ────────────────────────────────────────────────────────────
