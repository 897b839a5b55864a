//! Shared types, error model, and configuration for KitGuide.
//!
//! This crate is the foundation depended on by all other KitGuide crates.
//! It provides:
//! - [`KitGuideError`] — the unified error type
//! - Domain types ([`Kit`], [`Stage`], [`StagePrediction`])
//! - Configuration ([`AppConfig`], [`ServerConfig`], config loading)

pub mod config;
pub mod error;
pub mod types;

// Re-export public API at crate root for ergonomic imports.
pub use config::{
    AppConfig, DataConfig, ServerConfig, config_dir, config_file_path, init_config, load_config,
    load_config_from,
};
pub use error::{KitGuideError, Result};
pub use types::{Kit, KitRef, Stage, StagePrediction};
