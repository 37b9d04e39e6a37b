//! Common test utilities for all integration tests.
//!
//! Provides an in-memory [`RemoteSecretBackend`] that counts every call, so
//! tests can assert when the facade must not reach the backend.

#![allow(dead_code)]
#![allow(clippy::duplicate_mod)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secret_vault::{BackendError, LogLevel, RemoteSecretBackend, SecretHandle, Vault, VaultLogger};

/// In-memory create-only backend with call counters.
#[derive(Default)]
pub struct CountingBackend {
    secrets: Mutex<HashMap<String, (String, u64)>>,
    fetches: AtomicUsize,
    creates: AtomicUsize,
    unavailable: AtomicBool,
}

impl CountingBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Seed a secret without counting a create.
    pub fn seed(&self, name: &str, value: &str) {
        self.secrets.lock().unwrap().insert(name.to_string(), (value.to_string(), 1));
    }

    /// Make every following call fail with a transport error.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.fetch_count() + self.create_count()
    }

    pub fn stored(&self, name: &str) -> Option<String> {
        self.secrets.lock().unwrap().get(name).map(|(value, _)| value.clone())
    }

    fn check_available(&self) -> Result<(), BackendError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::transport("connection refused"));
        }
        Ok(())
    }
}

#[async_trait]
impl RemoteSecretBackend for CountingBackend {
    async fn fetch(&self, name: &str) -> Result<String, BackendError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        self.secrets
            .lock()
            .unwrap()
            .get(name)
            .map(|(value, _)| value.clone())
            .ok_or_else(|| BackendError::not_found(name))
    }

    async fn create(&self, name: &str, value: &str) -> Result<SecretHandle, BackendError> {
        self.creates.fetch_add(1, Ordering::SeqCst);
        self.check_available()?;

        let mut secrets = self.secrets.lock().unwrap();
        if secrets.contains_key(name) {
            return Err(BackendError::already_exists(name));
        }
        secrets.insert(name.to_string(), (value.to_string(), 1));

        Ok(SecretHandle { path: format!("memory/{}", name), version: 1, created_at: None })
    }

    fn backend_type(&self) -> &'static str {
        "memory"
    }
}

/// A vault over a fresh counting backend, logging at debug.
pub fn test_vault() -> (Vault, Arc<CountingBackend>) {
    let backend = CountingBackend::new();
    let vault = Vault::new(backend.clone(), VaultLogger::new(LogLevel::Debug));
    (vault, backend)
}
