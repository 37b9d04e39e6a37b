//! Remote secret backend trait and types
//!
//! Defines the capability the vault facade needs from a durable secrets
//! manager: fetch a value by name and create a value by name.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier returned by a successful create.
///
/// Informational only; nothing in the facade needs it for later calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretHandle {
    /// Backend-specific location of the secret (e.g. `secret/db_password`)
    pub path: String,
    /// Version assigned by the backend
    pub version: u64,
    /// Creation time reported by the backend, when it reports one
    pub created_at: Option<DateTime<Utc>>,
}

impl fmt::Display for SecretHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@v{}", self.path, self.version)
    }
}

/// Failures reported by a remote backend.
///
/// The facade logs these and replaces them with a generic remote call error,
/// so the detail here is for diagnostics only.
#[derive(Error, Debug)]
pub enum BackendError {
    /// No secret exists under the name.
    #[error("secret '{name}' not found")]
    NotFound { name: String },

    /// A create targeted a name that already has a value.
    #[error("secret '{name}' already exists")]
    AlreadyExists { name: String },

    /// The backend answered with an error status.
    #[error("backend returned status {status}: {message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable response.
    #[error("backend request failed: {message}")]
    Transport { message: String },

    /// The stored payload does not have the expected shape.
    #[error("secret '{name}' has an unexpected payload: {reason}")]
    MalformedPayload { name: String, reason: String },
}

impl BackendError {
    /// Create a not found error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound { name: name.into() }
    }

    /// Create an already exists error.
    pub fn already_exists(name: impl Into<String>) -> Self {
        Self::AlreadyExists { name: name.into() }
    }

    /// Create a transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport { message: message.into() }
    }

    /// Create a malformed payload error.
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedPayload { name: name.into(), reason: reason.into() }
    }
}

/// Trait for remote secret backends
///
/// Implementations must be Send + Sync; a single backend handle is shared by
/// every caller of the vault. Calls carry no timeout and are not retried.
#[async_trait]
pub trait RemoteSecretBackend: Send + Sync {
    /// Fetch the current value stored under `name`.
    async fn fetch(&self, name: &str) -> Result<String, BackendError>;

    /// Create a new secret. Must fail if `name` already holds a value.
    async fn create(&self, name: &str, value: &str) -> Result<SecretHandle, BackendError>;

    /// Short label for the backend, used in log lines.
    fn backend_type(&self) -> &'static str;
}
