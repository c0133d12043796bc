//! Shared types, error model, and configuration for ProjectBook.
//!
//! This crate is the foundation depended on by all other ProjectBook crates.
//! It provides:
//! - [`ProjectBookError`] — the unified error type
//! - Domain types ([`ProjectRecord`], [`ProjectCollection`], [`ListingItem`], [`Credentials`])
//! - Configuration ([`AppConfig`], config loading, credential resolution)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, CredentialsConfig, HttpConfig, ListingConfig, MarkupConfig, OutputConfig,
    SsoConfig, USERNAME_ENV, config_dir, config_file_path, init_config, load_config,
    load_config_from, resolve_credentials, resolve_credentials_with, validate_credentials,
};
pub use error::{ProjectBookError, Result};
pub use types::{Credentials, ListingItem, PageSize, ProjectCollection, ProjectRecord};
