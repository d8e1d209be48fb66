//! Shared types, error model, and configuration for ldcontext.
//!
//! This crate is the foundation depended on by all other ldcontext crates.
//! It provides:
//! - [`LdContextError`], the unified error type
//! - Domain types ([`PrefixTable`], [`DatatypePropertyInfo`], [`ObjectPropertyInfo`],
//!   [`PropertyIndex`], [`OntologyCatalog`])
//! - Configuration ([`AppConfig`], [`DiscoveryConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CONFIG_FILE_NAME, DiscoveryConfig, OutputConfig, config_dir, config_file_path,
    init_config, load_config, load_config_from, validate_config,
};
pub use error::{LdContextError, Result};
pub use types::{
    DatatypePropertyInfo, ObjectPropertyInfo, OntologyCatalog, PrefixTable, PropertyIndex,
    PropertyRecord,
};
