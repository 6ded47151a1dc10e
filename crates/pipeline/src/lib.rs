//! Import pipeline: session store, catalog port, orchestrator, and the
//! session watcher.
//!
//! The session store is the single source of truth for a run's mutable
//! state; the orchestrator is its only writer. The catalog is an
//! external collaborator reached through the [`catalog::ProductCatalog`]
//! port.

pub mod catalog;
pub mod orchestrator;
pub mod store;
pub mod watcher;
