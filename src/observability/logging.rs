//! # Structured Logging
//!
//! Diagnostic logging for the vault, built on the tracing ecosystem.
//!
//! The vault does not log through a process-wide logger. Each [`crate::Vault`]
//! owns a [`VaultLogger`] handle whose level can be changed at runtime; the
//! handle checks its level first and only then formats and emits the event
//! through `tracing`. Where events end up is decided by the installed
//! subscriber (see [`init_logging`]).

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use crate::config::{LoggingConfig, VaultSettings};

/// Severity accepted by [`VaultLogger`].
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warning = 2,
    Error = 3,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_filter_directive(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            Self::Error => "error",
        }
    }

    fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Debug,
            1 => Self::Info,
            2 => Self::Warning,
            _ => Self::Error,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// Returned when a string does not name a [`LogLevel`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level '{0}' (expected debug, info, warning or error)")]
pub struct ParseLogLevelError(String);

impl FromStr for LogLevel {
    type Err = ParseLogLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(ParseLogLevelError(s.to_string())),
        }
    }
}

impl TryFrom<String> for LogLevel {
    type Error = ParseLogLevelError;

    fn try_from(value: String) -> Result<Self, ParseLogLevelError> {
        value.parse()
    }
}

/// Level-gated logging handle owned by a vault.
///
/// Clones share the level, so a level change through any clone is seen by all
/// of them. Events carry `component` and `operation` fields.
#[derive(Clone)]
pub struct VaultLogger {
    level: Arc<AtomicU8>,
    component: &'static str,
}

impl VaultLogger {
    pub fn new(level: LogLevel) -> Self {
        Self::with_component("vault", level)
    }

    pub fn with_component(component: &'static str, level: LogLevel) -> Self {
        Self { level: Arc::new(AtomicU8::new(level as u8)), component }
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::from_u8(self.level.load(Ordering::Relaxed))
    }

    pub fn set_level(&self, level: LogLevel) {
        self.level.store(level as u8, Ordering::Relaxed);
    }

    /// Whether a message at `level` would be emitted.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.level()
    }

    pub fn debug(&self, operation: &str, message: fmt::Arguments<'_>) {
        if self.enabled(LogLevel::Debug) {
            tracing::debug!(component = self.component, operation, "{}", message);
        }
    }

    pub fn info(&self, operation: &str, message: fmt::Arguments<'_>) {
        if self.enabled(LogLevel::Info) {
            tracing::info!(component = self.component, operation, "{}", message);
        }
    }

    pub fn warn(&self, operation: &str, message: fmt::Arguments<'_>) {
        if self.enabled(LogLevel::Warning) {
            tracing::warn!(component = self.component, operation, "{}", message);
        }
    }

    pub fn error(&self, operation: &str, message: fmt::Arguments<'_>) {
        if self.enabled(LogLevel::Error) {
            tracing::error!(component = self.component, operation, "{}", message);
        }
    }
}

impl Default for VaultLogger {
    fn default() -> Self {
        Self::new(LogLevel::default())
    }
}

impl fmt::Debug for VaultLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaultLogger")
            .field("component", &self.component)
            .field("level", &self.level())
            .finish()
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `config.level`. Returns `false` when a
/// subscriber was already installed (e.g. by a test harness), which is not an
/// error.
pub fn init_logging(config: &LoggingConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_filter_directive()));

    let installed = if config.json {
        tracing::subscriber::set_global_default(
            tracing_subscriber::fmt().with_env_filter(filter).json().finish(),
        )
    } else {
        tracing::subscriber::set_global_default(
            tracing_subscriber::fmt().with_env_filter(filter).finish(),
        )
    };

    installed.is_ok()
}

/// Log resolved settings at startup. The token is reported by presence only.
pub fn log_settings_info(settings: &VaultSettings) {
    tracing::info!(
        address = %settings.remote.address,
        mount_path = %settings.remote.mount_path,
        namespace = ?settings.remote.namespace,
        token_present = settings.remote.token.is_some(),
        log_level = %settings.logging.level,
        json_logs = settings.logging.json,
        "secret-vault configuration"
    );
}
