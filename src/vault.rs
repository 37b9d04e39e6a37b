//! The vault facade.
//!
//! [`Vault`] puts two independent secret stores behind one handle:
//!
//! - a **remote** store reached through a [`RemoteSecretBackend`], which only
//!   accepts text and only creates (a second put of the same name fails), and
//! - a **local** in-process [`LocalSecretCache`] that accepts any value kind.
//!
//! The two namespaces are disjoint: nothing written locally is ever sent to the
//! backend and remote reads never consult the cache.
//!
//! Remote failures are returned as [`SecretsError::RemoteCall`] naming only the
//! operation; the backend's own error is written to the log and dropped.
//! Secret values are never logged, only their kind and size.

use std::fmt;
use std::sync::Arc;

use crate::config::{RemoteBackendConfig, VaultSettings};
use crate::observability::{LogLevel, VaultLogger};
use crate::secrets::{
    LocalSecretCache, RemoteOperation, RemoteSecretBackend, Result, SecretValue, SecretsError,
    VaultKvBackend,
};

const OP_CONNECT: &str = "connect";
const OP_GET: &str = "get_secret";
const OP_PUT: &str = "put_secret";
const OP_DELETE: &str = "delete_secret";
const OP_GET_LOCAL: &str = "get_local_secret";
const OP_PUT_LOCAL: &str = "put_local_secret";
const OP_DELETE_LOCAL: &str = "delete_local_secret";

/// Secret access facade over a remote backend and a local cache.
///
/// `Vault` is `Send + Sync`; share it behind an `Arc` to call it from many
/// tasks or threads at once.
///
/// # Example
///
/// ```rust,ignore
/// use secret_vault::Vault;
///
/// let vault = Vault::from_env()?;
///
/// vault.put_local_secret("mySecret", "mySecretValue")?;
/// assert_eq!(
///     vault.get_local_secret("mySecret").and_then(|v| v.into_text()).map(|t| t.expose_secret().to_string()),
///     Some("mySecretValue".to_string()),
/// );
///
/// vault.put_secret("db_password", "hunter2").await?;
/// let value = vault.get_secret("db_password").await?;
/// ```
pub struct Vault {
    remote: Arc<dyn RemoteSecretBackend>,
    local: LocalSecretCache,
    logger: VaultLogger,
}

impl Vault {
    /// Assemble a vault from an existing backend and logger. The local cache
    /// starts empty.
    pub fn new(remote: Arc<dyn RemoteSecretBackend>, logger: VaultLogger) -> Self {
        Self { remote, local: LocalSecretCache::new(), logger }
    }

    /// Build a vault backed by HashiCorp Vault KV v2.
    ///
    /// # Errors
    ///
    /// [`SecretsError::ConfigLoad`] if the backend cannot be configured.
    pub fn connect(config: &RemoteBackendConfig, logger: VaultLogger) -> Result<Self> {
        let backend = VaultKvBackend::new(config).map_err(|e| {
            logger.error(OP_CONNECT, format_args!("{}", e));
            e
        })?;

        logger.debug(
            OP_CONNECT,
            format_args!(
                "using {} backend at {} (mount '{}')",
                backend.backend_type(),
                config.address,
                backend.mount_path()
            ),
        );
        Ok(Self::new(Arc::new(backend), logger))
    }

    /// Build a vault from ambient `VAULT_*` environment with an info-level
    /// logger.
    pub fn from_env() -> Result<Self> {
        let config = RemoteBackendConfig::from_env()?;
        Self::connect(&config, VaultLogger::new(LogLevel::Info))
    }

    /// Build a vault from loaded settings; the logger starts at the configured level.
    pub fn from_settings(settings: &VaultSettings) -> Result<Self> {
        Self::connect(&settings.remote, VaultLogger::new(settings.logging.level))
    }

    /// Fetch a secret from the remote backend.
    ///
    /// # Errors
    ///
    /// [`SecretsError::RemoteCall`] with [`RemoteOperation::Fetch`] for any
    /// backend failure, including a missing secret.
    pub async fn get_secret(&self, name: &str) -> Result<SecretValue> {
        self.logger.info(OP_GET, format_args!("getting secret '{}'", name));

        match self.remote.fetch(name).await {
            Ok(value) => {
                self.logger.info(
                    OP_GET,
                    format_args!("got secret '{}' ({} bytes)", name, value.len()),
                );
                Ok(SecretValue::from(value))
            }
            Err(e) => {
                self.logger.error(OP_GET, format_args!("failed to get secret '{}': {}", name, e));
                Err(SecretsError::remote_call(RemoteOperation::Fetch))
            }
        }
    }

    /// Create a secret on the remote backend.
    ///
    /// Only text values are accepted; anything else is rejected before the
    /// backend is called. The backend creates rather than overwrites, so
    /// putting a name that already exists fails.
    ///
    /// # Errors
    ///
    /// - [`SecretsError::TypeMismatch`] for a non-text value
    /// - [`SecretsError::RemoteCall`] with [`RemoteOperation::Create`] for any
    ///   backend failure
    pub async fn put_secret(&self, name: &str, value: impl Into<SecretValue>) -> Result<()> {
        let text = match value.into() {
            SecretValue::Text(text) => text,
            other => {
                let found = other.kind();
                self.logger.error(
                    OP_PUT,
                    format_args!("refusing to store '{}': value is {}, not text", name, found),
                );
                return Err(SecretsError::type_mismatch(found));
            }
        };

        self.logger.info(
            OP_PUT,
            format_args!("creating secret '{}' ({} bytes)", name, text.len()),
        );

        match self.remote.create(name, text.expose_secret()).await {
            Ok(handle) => {
                self.logger.info(OP_PUT, format_args!("created secret '{}' as {}", name, handle));
                Ok(())
            }
            Err(e) => {
                self.logger
                    .error(OP_PUT, format_args!("failed to create secret '{}': {}", name, e));
                Err(SecretsError::remote_call(RemoteOperation::Create))
            }
        }
    }

    /// Remote deletion is not supported. Always succeeds without contacting the
    /// backend; the remote secret is left in place.
    pub async fn delete_secret(&self, name: &str) -> Result<()> {
        self.logger.warn(
            OP_DELETE,
            format_args!("remote delete of '{}' is not supported; nothing was removed", name),
        );
        Ok(())
    }

    /// Look up a secret in the local cache. `None` means the name is not cached.
    pub fn get_local_secret(&self, name: &str) -> Option<SecretValue> {
        self.logger.debug(OP_GET_LOCAL, format_args!("looking up '{}'", name));

        let value = self.local.get(name);
        match &value {
            Some(v) => self.logger.debug(OP_GET_LOCAL, format_args!("hit '{}' ({})", name, v.kind())),
            None => self.logger.debug(OP_GET_LOCAL, format_args!("miss '{}'", name)),
        }
        value
    }

    /// Store a value of any kind in the local cache, replacing any previous
    /// value. Never fails.
    pub fn put_local_secret(&self, name: &str, value: impl Into<SecretValue>) -> Result<()> {
        let value = value.into();
        let kind = value.kind();
        self.logger.debug(OP_PUT_LOCAL, format_args!("storing '{}' ({})", name, kind));

        let replaced = self.local.put(name, value).is_some();
        self.logger.debug(
            OP_PUT_LOCAL,
            format_args!("stored '{}' ({}, replaced: {})", name, kind, replaced),
        );
        Ok(())
    }

    /// Remove a value from the local cache. Removing an absent name is a no-op.
    pub fn delete_local_secret(&self, name: &str) -> Result<()> {
        self.logger.debug(OP_DELETE_LOCAL, format_args!("deleting '{}'", name));

        let removed = self.local.delete(name).is_some();
        self.logger
            .debug(OP_DELETE_LOCAL, format_args!("deleted '{}' (present: {})", name, removed));
        Ok(())
    }

    /// Change the level of this vault's logger at runtime.
    pub fn set_log_level(&self, level: LogLevel) {
        self.logger.set_level(level);
    }

    pub fn log_level(&self) -> LogLevel {
        self.logger.level()
    }

    /// Label of the remote backend in use.
    pub fn backend_type(&self) -> &'static str {
        self.remote.backend_type()
    }

    /// Number of entries in the local cache.
    pub fn local_len(&self) -> usize {
        self.local.len()
    }
}

impl fmt::Debug for Vault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vault")
            .field("backend", &self.remote.backend_type())
            .field("local", &self.local)
            .field("logger", &self.logger)
            .finish()
    }
}
