//! Shared types, error model, and configuration for bibcloud.
//!
//! This crate is the foundation depended on by all other bibcloud crates.
//! It provides:
//! - [`BibcloudError`], the unified error type
//! - Domain types ([`Record`], [`Field`], [`SourceFormat`])
//! - Configuration ([`AppConfig`], [`VocabularyConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DefaultsConfig, VocabularyConfig, config_dir, config_file_path, init_config,
    load_config, load_config_from,
};
pub use error::{BibcloudError, Result};
pub use types::{Field, Record, SourceFormat};
