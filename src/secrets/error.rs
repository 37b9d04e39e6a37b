//! Error types for vault operations.
//!
//! Remote failures are reported as a single [`SecretsError::RemoteCall`] kind
//! that carries only the operation that failed; the backend detail is written
//! to the diagnostic log and dropped.

use std::fmt;

use thiserror::Error;

/// Result type for vault operations.
pub type Result<T> = std::result::Result<T, SecretsError>;

/// Remote backend operation reported in [`SecretsError::RemoteCall`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RemoteOperation {
    /// Fetch a secret value by name.
    Fetch,
    /// Create a new secret by name.
    Create,
}

impl fmt::Display for RemoteOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch => write!(f, "get secret value"),
            Self::Create => write!(f, "create secret"),
        }
    }
}

/// Errors returned by the vault facade.
#[derive(Error, Debug)]
pub enum SecretsError {
    /// Backend configuration or credentials could not be resolved.
    #[error("failed to load vault config: {message}")]
    ConfigLoad { message: String },

    /// A remote fetch or create failed. The cause is not preserved.
    #[error("failed to {operation}")]
    RemoteCall { operation: RemoteOperation },

    /// A non-text value was submitted to the remote write path.
    #[error("secret value is not string (found {found})")]
    TypeMismatch { found: &'static str },
}

impl SecretsError {
    /// Create a config load error.
    pub fn config_load(message: impl Into<String>) -> Self {
        Self::ConfigLoad { message: message.into() }
    }

    /// Create a remote call error for the given operation.
    pub fn remote_call(operation: RemoteOperation) -> Self {
        Self::RemoteCall { operation }
    }

    /// Create a type mismatch error naming the rejected value kind.
    pub fn type_mismatch(found: &'static str) -> Self {
        Self::TypeMismatch { found }
    }

    /// Whether the caller can recover by retrying with different input.
    pub fn is_caller_recoverable(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

impl From<config::ConfigError> for SecretsError {
    fn from(error: config::ConfigError) -> Self {
        Self::config_load(error.to_string())
    }
}

impl From<url::ParseError> for SecretsError {
    fn from(error: url::ParseError) -> Self {
        Self::config_load(format!("invalid backend address: {}", error))
    }
}

impl From<validator::ValidationErrors> for SecretsError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut messages = Vec::new();
        collect_validation_messages("", &errors, &mut messages);
        if messages.is_empty() {
            messages.push(errors.to_string());
        }
        messages.sort();

        Self::config_load(messages.join("; "))
    }
}

/// Flatten nested validation errors into `path.to.field: message` lines.
fn collect_validation_messages(
    prefix: &str,
    errors: &validator::ValidationErrors,
    out: &mut Vec<String>,
) {
    use validator::ValidationErrorsKind;

    for (field, kind) in errors.errors() {
        let path =
            if prefix.is_empty() { field.to_string() } else { format!("{}.{}", prefix, field) };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|e| {
                    let message =
                        e.message.as_ref().map_or_else(|| e.code.to_string(), |m| m.to_string());
                    format!("{}: {}", path, message)
                }));
            }
            ValidationErrorsKind::Struct(nested) => collect_validation_messages(&path, nested, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_messages(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}
