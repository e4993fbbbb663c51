//! Shared primitives for all Rust crates in aaprov.

#![forbid(unsafe_code)]

/// Tenant scoping primitives shared across services.
pub mod tenant;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use tenant::TenantName;

/// Result type used across aaprov crates.
pub type AppResult<T> = Result<T, AppError>;

/// A validated non-empty UTF-8 string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NonEmptyString(String);

impl NonEmptyString {
    /// Creates a validated non-empty string.
    pub fn new(value: impl Into<String>) -> AppResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(AppError::Validation(
                "value must not be empty or whitespace".to_owned(),
            ));
        }

        Ok(Self(value))
    }

    /// Returns the underlying string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<NonEmptyString> for String {
    fn from(value: NonEmptyString) -> Self {
        value.0
    }
}

/// Common application error categories.
///
/// Apart from `Validation` raised while loading configuration, none of these
/// abort a provisioning run: services catch them at the narrowest scope and
/// record the failure on the affected target, runbook or sheet.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid input or violated invariant.
    #[error("validation error: {0}")]
    Validation(String),

    /// Requested resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Write operation conflicts with existing state.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Caller is not authenticated.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Tenant credential is missing or cannot be parsed.
    #[error("credential error: {0}")]
    Credential(String),

    /// Remote listing of subscriptions, groups or resources failed.
    #[error("discovery error: {0}")]
    Discovery(String),

    /// Runbook script content could not be fetched or hashed.
    #[error("content fetch error: {0}")]
    ContentFetch(String),

    /// A remote create-or-update call failed or timed out.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A report sheet could not be rendered or written.
    #[error("report render error: {0}")]
    ReportRender(String),

    /// Internal unexpected error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Prefixes the message with the failing item, keeping the category.
    #[must_use]
    pub fn context(self, context: impl std::fmt::Display) -> Self {
        match self {
            Self::Validation(message) => Self::Validation(format!("{context}: {message}")),
            Self::NotFound(message) => Self::NotFound(format!("{context}: {message}")),
            Self::Conflict(message) => Self::Conflict(format!("{context}: {message}")),
            Self::Unauthorized(message) => Self::Unauthorized(format!("{context}: {message}")),
            Self::Credential(message) => Self::Credential(format!("{context}: {message}")),
            Self::Discovery(message) => Self::Discovery(format!("{context}: {message}")),
            Self::ContentFetch(message) => Self::ContentFetch(format!("{context}: {message}")),
            Self::Upstream(message) => Self::Upstream(format!("{context}: {message}")),
            Self::ReportRender(message) => Self::ReportRender(format!("{context}: {message}")),
            Self::Internal(message) => Self::Internal(format!("{context}: {message}")),
        }
    }
}
