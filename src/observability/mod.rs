//! # Observability
//!
//! Structured logging for the vault: the level-gated [`VaultLogger`] handle
//! each vault owns, and subscriber installation for binaries.

pub mod logging;

pub use logging::{init_logging, log_settings_info, LogLevel, ParseLogLevelError, VaultLogger};
