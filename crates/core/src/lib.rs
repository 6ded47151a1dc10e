//! Pure domain logic for the Outfred product-import pipeline.
//!
//! This crate has zero internal dependencies and performs no I/O. It
//! holds the import session record and its status state machine, the
//! candidate/catalog product types, the matcher that classifies
//! candidates against a merchant's catalog, and the static connector
//! descriptors.

pub mod candidate;
pub mod catalog;
pub mod connectors;
pub mod error;
pub mod matcher;
pub mod session;
pub mod types;
