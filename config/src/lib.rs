//! Claimguard centralized configuration management.
//!
//! Provides layered configuration (defaults -> TOML file -> environment
//! variables) for the claim ingestion and verification pipeline, plus the
//! named constants that govern detector, clustering, retrieval and worker
//! behavior. Nothing here is allowed to be a magic number buried in an
//! algorithm body: every threshold the pipeline relies on is a field here.

pub mod environment;
pub mod loader;
pub mod pipeline;
pub mod secrets;
pub mod validation;

#[cfg(test)]
mod tests;

pub use environment::Environment;
pub use loader::{ConfigLoader, ConfigSource};
pub use pipeline::{AdjudicatorBackend, PipelineConfig};
pub use secrets::SecretManager;
pub use validation::{validate_config, ValidationError};

pub use anyhow::Result;
