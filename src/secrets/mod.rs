//! Secret storage building blocks.
//!
//! # Architecture
//!
//! The [`crate::Vault`] facade is assembled from the pieces in this module:
//! - [`backends::RemoteSecretBackend`]: durable remote store (fetch, create)
//! - [`LocalSecretCache`]: in-process map behind a single mutex
//! - [`SecretValue`] / [`SecretString`]: payload types that never print their contents
//! - [`SecretsError`]: the error taxonomy returned to callers
//!
//! # Supported Backends
//!
//! - **HashiCorp Vault**: KV v2 engine via [`VaultKvBackend`]
//!
//! # Example
//!
//! ```rust,ignore
//! use secret_vault::secrets::{LocalSecretCache, SecretValue};
//!
//! let cache = LocalSecretCache::new();
//! cache.put("session_key", SecretValue::from(vec![0u8; 32]));
//! assert!(cache.contains("session_key"));
//! ```

pub mod backends;
pub mod cache;
pub mod error;
pub mod types;
pub mod value;

pub use backends::{BackendError, RemoteSecretBackend, SecretHandle, VaultKvBackend};
pub use cache::LocalSecretCache;
pub use error::{RemoteOperation, Result, SecretsError};
pub use types::SecretString;
pub use value::SecretValue;
