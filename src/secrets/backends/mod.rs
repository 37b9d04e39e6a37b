//! Remote secret backends
//!
//! The vault facade reaches durable storage through [`RemoteSecretBackend`].
//!
//! ## Supported Backends
//!
//! - **Vault**: HashiCorp Vault KV v2 engine, via `vaultrs`

pub mod backend;
pub mod vault;

pub use backend::{BackendError, RemoteSecretBackend, SecretHandle};
pub use vault::VaultKvBackend;
