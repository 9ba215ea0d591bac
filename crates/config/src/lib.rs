//! Configuration loading, validation and env substitution.
//!
//! Config files: `taskdesk.toml`, `taskdesk.yaml`, `taskdesk.yml` or
//! `taskdesk.json`, searched in `./` then `~/.config/taskdesk/`.
//!
//! Supports `${ENV_VAR}` and `${ENV_VAR:-default}` substitution in the raw file.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;
pub mod validate;

pub use {
    error::{Error, Result},
    loader::{
        apply_env_overrides, clear_config_dir, config_dir, discover_and_load, load_config,
        runtime_dir, set_config_dir,
    },
    schema::{AdminConfig, ApiConfig, StorageConfig, TaskdeskConfig, UiConfig},
    validate::{Diagnostic, Severity, ValidationResult},
};
