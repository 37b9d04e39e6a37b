//! HashiCorp Vault KV v2 backend
//!
//! Stores each secret as a single-field map `{"value": "<text>"}` at
//! `<mount>/data/<name>`. Creates use check-and-set with `cas = 0`, which Vault
//! only accepts when the key has no versions yet, so a second create of the
//! same name fails instead of overwriting.
//!
//! ## Example
//!
//! ```rust,ignore
//! use secret_vault::config::RemoteBackendConfig;
//! use secret_vault::secrets::backends::{RemoteSecretBackend, VaultKvBackend};
//!
//! let config = RemoteBackendConfig::from_env()?;
//! let backend = VaultKvBackend::new(&config)?;
//!
//! let handle = backend.create("db_password", "hunter2").await?;
//! let value = backend.fetch("db_password").await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use url::Url;
use validator::Validate;
use vaultrs::api::kv2::requests::SetSecretRequestOptions;
use vaultrs::client::{VaultClient, VaultClientSettingsBuilder};
use vaultrs::error::ClientError;
use vaultrs::kv2;

use super::backend::{BackendError, RemoteSecretBackend, SecretHandle};
use crate::config::RemoteBackendConfig;
use crate::secrets::error::{Result, SecretsError};

/// Field of the stored KV map that holds the secret text.
const VALUE_FIELD: &str = "value";

/// Vault's error text when a check-and-set precondition fails.
const CAS_MISMATCH: &str = "check-and-set";

/// HashiCorp Vault KV v2 secret backend
///
/// The underlying `VaultClient` is `Send + Sync` and is shared by all callers.
/// Failures are returned as [`BackendError`] and left for the caller to log.
pub struct VaultKvBackend {
    client: VaultClient,
    mount_path: String,
}

impl VaultKvBackend {
    /// Builds a backend from resolved configuration.
    ///
    /// No request is sent; an unreachable server surfaces on the first fetch
    /// or create.
    ///
    /// # Errors
    ///
    /// [`SecretsError::ConfigLoad`] if the address is not an absolute URL, no
    /// token was resolved, or the client cannot be built.
    pub fn new(config: &RemoteBackendConfig) -> Result<Self> {
        config.validate()?;

        let address = Url::parse(&config.address)?;
        if address.cannot_be_a_base() {
            return Err(SecretsError::config_load(format!(
                "backend address '{}' is not a base URL",
                config.address
            )));
        }

        let token = config.token.as_ref().filter(|t| !t.is_empty()).ok_or_else(|| {
            SecretsError::config_load(
                "no Vault token resolved (set VAULT_TOKEN or log in to create ~/.vault-token)",
            )
        })?;

        let mut settings_builder = VaultClientSettingsBuilder::default();
        settings_builder.address(address.as_str());
        settings_builder.token(token.expose_secret());

        if let Some(namespace) = config.namespace.clone() {
            settings_builder.namespace(Some(namespace));
        }

        let settings = settings_builder.build().map_err(|e| {
            SecretsError::config_load(format!("invalid Vault client settings: {}", e))
        })?;

        let client = VaultClient::new(settings).map_err(|e| {
            SecretsError::config_load(format!("failed to create Vault client: {}", e))
        })?;

        Ok(Self { client, mount_path: config.mount_path.clone() })
    }

    /// KV v2 mount path this backend reads and writes.
    pub fn mount_path(&self) -> &str {
        &self.mount_path
    }

    fn map_client_error(name: &str, err: ClientError) -> BackendError {
        match err {
            ClientError::APIError { code: 404, .. } => BackendError::not_found(name),
            ClientError::APIError { code, errors }
                if code == 400 && errors.iter().any(|e| e.contains(CAS_MISMATCH)) =>
            {
                BackendError::already_exists(name)
            }
            ClientError::APIError { code, errors } => {
                BackendError::Api { status: code, message: errors.join("; ") }
            }
            other => BackendError::transport(other.to_string()),
        }
    }
}

impl std::fmt::Debug for VaultKvBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKvBackend")
            .field("mount_path", &self.mount_path)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[async_trait]
impl RemoteSecretBackend for VaultKvBackend {
    async fn fetch(&self, name: &str) -> std::result::Result<String, BackendError> {
        let mut secret: HashMap<String, String> =
            kv2::read(&self.client, &self.mount_path, name)
                .await
                .map_err(|e| Self::map_client_error(name, e))?;

        secret
            .remove(VALUE_FIELD)
            .ok_or_else(|| BackendError::malformed(name, format!("missing '{}' field", VALUE_FIELD)))
    }

    async fn create(
        &self,
        name: &str,
        value: &str,
    ) -> std::result::Result<SecretHandle, BackendError> {
        let data = HashMap::from([(VALUE_FIELD, value)]);
        let options = SetSecretRequestOptions { cas: 0 };

        let metadata = kv2::set_with_options(&self.client, &self.mount_path, name, &data, options)
            .await
            .map_err(|e| Self::map_client_error(name, e))?;

        let created_at = DateTime::parse_from_rfc3339(&metadata.created_time)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));

        Ok(SecretHandle {
            path: format!("{}/{}", self.mount_path, name),
            version: metadata.version,
            created_at,
        })
    }

    fn backend_type(&self) -> &'static str {
        "vault"
    }
}
