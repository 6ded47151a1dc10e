//! Source readers for the Outfred import pipeline.
//!
//! Turns one of three source descriptions (raw CSV text, a storefront
//! URL, a JSON API endpoint) into a sequence of candidate product
//! records, or fails with a source-level error. All network access goes
//! through [`client::SourceClient`], which enforces an explicit fetch
//! timeout.

pub mod api;
pub mod client;
pub mod csv;
pub mod error;
pub mod website;
