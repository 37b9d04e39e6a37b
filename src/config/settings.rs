//! # Configuration Settings
//!
//! Defines the configuration structure for the secret vault.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use url::Url;
use validator::Validate;

use crate::observability::LogLevel;
use crate::secrets::error::{Result, SecretsError};
use crate::secrets::SecretString;

/// Address used when `VAULT_ADDR` is not set, matching the Vault CLI.
pub const DEFAULT_ADDRESS: &str = "https://127.0.0.1:8200";

/// Default KV v2 mount.
pub const DEFAULT_MOUNT_PATH: &str = "secret";

/// Prefix for layered settings overrides, e.g. `SECRET_VAULT__REMOTE__ADDRESS`.
pub const ENV_PREFIX: &str = "SECRET_VAULT";

/// Token helper file written by `vault login`, relative to the home directory.
const TOKEN_HELPER_FILE: &str = ".vault-token";

/// Top-level settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
pub struct VaultSettings {
    /// Remote backend connection
    #[validate(nested)]
    pub remote: RemoteBackendConfig,

    /// Diagnostic logging
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl VaultSettings {
    /// Load layered settings.
    ///
    /// Sources, lowest precedence first: ambient `VAULT_*` environment, the
    /// optional settings file (TOML, YAML or JSON by extension), then
    /// `SECRET_VAULT__*` environment variables. A token not set by any layer
    /// is resolved the way [`RemoteBackendConfig::from_env`] does.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let ambient = RemoteBackendConfig::ambient(env_lookup, home_dir());

        let mut builder = Config::builder()
            .set_default("remote.address", ambient.address.clone())?
            .set_default("remote.mount_path", ambient.mount_path.clone())?
            .set_default("logging.level", LogLevel::default().to_string())?
            .set_default("logging.json", false)?;

        if let Some(namespace) = ambient.namespace.clone() {
            builder = builder.set_default("remote.namespace", namespace)?;
        }

        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }

        let mut settings: VaultSettings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        if settings.remote.token.is_none() {
            settings.remote.token = ambient.token;
        }

        settings.validate()?;
        Ok(settings)
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(SecretsError::from)?;
        self.remote.validate_address()
    }
}

/// Remote backend connection settings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct RemoteBackendConfig {
    /// Base URL of the Vault server
    #[validate(length(min = 1, message = "Backend address cannot be empty"))]
    pub address: String,

    /// Access token. Serializes as `[REDACTED]`.
    pub token: Option<SecretString>,

    /// Enterprise namespace, sent as `X-Vault-Namespace`
    pub namespace: Option<String>,

    /// KV v2 mount path
    #[validate(length(min = 1, message = "Mount path cannot be empty"))]
    pub mount_path: String,
}

impl Default for RemoteBackendConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            token: None,
            namespace: None,
            mount_path: DEFAULT_MOUNT_PATH.to_string(),
        }
    }
}

impl RemoteBackendConfig {
    /// Resolve connection settings from the ambient environment.
    ///
    /// Reads `VAULT_ADDR`, `VAULT_TOKEN` (falling back to `~/.vault-token`),
    /// `VAULT_NAMESPACE` and `VAULT_MOUNT_PATH`. A missing token is not an
    /// error here; building a backend without one is.
    pub fn from_env() -> Result<Self> {
        let config = Self::ambient(env_lookup, home_dir());
        config.validate()?;
        config.validate_address()?;
        Ok(config)
    }

    /// Whether a non-empty token was resolved.
    pub fn has_token(&self) -> bool {
        self.token.as_ref().is_some_and(|t| !t.is_empty())
    }

    fn ambient<F>(lookup: F, home: Option<PathBuf>) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = non_empty("VAULT_TOKEN")
            .or_else(|| home.and_then(|dir| read_token_helper(&dir)))
            .map(SecretString::new);

        Self {
            address: non_empty("VAULT_ADDR").unwrap_or_else(|| DEFAULT_ADDRESS.to_string()),
            token,
            namespace: non_empty("VAULT_NAMESPACE"),
            mount_path: non_empty("VAULT_MOUNT_PATH")
                .map(|m| m.trim_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_MOUNT_PATH.to_string()),
        }
    }

    fn validate_address(&self) -> Result<()> {
        let url = Url::parse(&self.address)?;
        match url.scheme() {
            "http" | "https" => Ok(()),
            other => Err(SecretsError::config_load(format!(
                "backend address must use http or https, got '{}'",
                other
            ))),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Initial level for the vault logger and default subscriber filter
    pub level: LogLevel,

    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
}

fn read_token_helper(home: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(home.join(TOKEN_HELPER_FILE)).ok()?;
    let token = contents.trim();
    (!token.is_empty()).then(|| token.to_string())
}
