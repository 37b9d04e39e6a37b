//! # Configuration Management
//!
//! Settings for reaching the remote backend and for diagnostic logging.
//! [`RemoteBackendConfig::from_env`] resolves the same ambient variables the
//! Vault CLI uses; [`VaultSettings::load`] layers a settings file and
//! `SECRET_VAULT__*` overrides on top.

pub mod settings;

pub use settings::{
    LoggingConfig, RemoteBackendConfig, VaultSettings, DEFAULT_ADDRESS, DEFAULT_MOUNT_PATH,
    ENV_PREFIX,
};
