//! Library root for the `watchgate` crate
//! Movie catalog, age-gated access decisions and their append-only audit trail.

// Core error handling
pub mod api_errors;
pub mod errors;

// Domain types
pub mod decision;
pub mod identity;
pub mod movie;

// Catalog storage
pub mod catalog_store;
pub mod catalog_store_sled;

// Audit trail
pub mod audit_store;
pub mod audit_store_sled;
pub mod audit_verifier;

// In-process stores
pub mod memory_store;
pub mod sequence;

// Access decisions
pub mod access_engine;

// Configuration & CLI
pub mod cli;
pub mod config;
pub mod config_loader;

// Web server interface
pub mod api;
pub mod app_state;
pub mod web;


pub use access_engine::AccessEngine;
pub use audit_store::AuditStore;
pub use catalog_store::CatalogStore;
pub use errors::{GateError, GateResult};
