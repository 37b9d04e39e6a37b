//! # secret-vault
//!
//! A small secret access facade. A [`Vault`] combines:
//!
//! - a **remote** store (HashiCorp Vault KV v2 by default) that is read by
//!   name and written create-only, text values only, and
//! - a **local** in-process cache that accepts any value kind and is guarded
//!   by a single lock.
//!
//! ## Architecture
//!
//! ```text
//! caller → Vault ─┬─ RemoteSecretBackend (VaultKvBackend → Vault HTTP API)
//!                 ├─ LocalSecretCache (Mutex<HashMap>)
//!                 └─ VaultLogger (level-gated tracing events)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use secret_vault::{Result, Vault};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let vault = Vault::from_env()?;
//!
//!     vault.put_local_secret("mySecret", "mySecretValue")?;
//!     let cached = vault.get_local_secret("mySecret");
//!     assert!(cached.is_some());
//!
//!     let value = vault.get_secret("db_password").await?;
//!     println!("{} bytes", value.as_text().map_or(0, str::len));
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod observability;
pub mod secrets;
pub mod vault;

// Re-export commonly used types and traits
pub use config::{RemoteBackendConfig, VaultSettings};
pub use observability::{LogLevel, VaultLogger};
pub use secrets::{
    BackendError, LocalSecretCache, RemoteOperation, RemoteSecretBackend, Result, SecretHandle,
    SecretString, SecretValue, SecretsError, VaultKvBackend,
};
pub use vault::Vault;

/// Application version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
