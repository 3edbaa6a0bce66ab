//! Error handling for techstack.
//!
//! This module provides:
//! - [`MsError`]: The main error enum for all operations
//! - [`ErrorCode`]: Standardized error codes for machine parsing
//! - [`StructuredError`]: Rich error type with suggestions and context

mod codes;
mod suggestions;

use std::io;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

pub use codes::ErrorCode;
pub use suggestions::suggest_for_error;

/// Main error type for techstack operations.
#[derive(Error, Debug)]
pub enum MsError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Search index error: {0}")]
    SearchIndex(#[from] tantivy::TantivyError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid filter specification: {0}")]
    InvalidSpecification(String),

    #[error("Translation failed: {0}")]
    TranslationFailed(String),

    #[error("Translator unavailable: {0}")]
    TranslatorUnavailable(String),

    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    #[error("Invalid company record: {0}")]
    InvalidCompany(String),

    #[error("Duplicate company id: {0}")]
    DuplicateCompanyId(u64),

    #[error("Company source unavailable ({backend}): {reason}")]
    SourceUnavailable {
        backend: String,
        path: Option<String>,
        reason: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Missing required config: {0}")]
    MissingConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl MsError {
    /// Get the error code for this error.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Io(_) => ErrorCode::IoError,
            Self::SearchIndex(_) => ErrorCode::IndexBuildFailed,
            Self::Json(_) | Self::Serialization(_) => ErrorCode::SerializationError,
            Self::Http(err) if err.is_timeout() => ErrorCode::NetworkTimeout,
            Self::Http(_) | Self::TranslatorUnavailable(_) => ErrorCode::TranslatorUnavailable,
            Self::InvalidSpecification(_) => ErrorCode::InvalidSpecification,
            Self::TranslationFailed(_) => ErrorCode::TranslationFailed,
            Self::CompanyNotFound(_) => ErrorCode::CompanyNotFound,
            Self::InvalidCompany(_) => ErrorCode::CompanyInvalid,
            Self::DuplicateCompanyId(_) => ErrorCode::DuplicateCompanyId,
            Self::SourceUnavailable { .. } => ErrorCode::SourceUnavailable,
            Self::Config(_) => ErrorCode::ConfigInvalid,
            Self::MissingConfig(_) => ErrorCode::ConfigMissingRequired,
            Self::NotFound(_) => ErrorCode::NotFound,
            Self::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get context information for this error as JSON.
    #[must_use]
    pub fn context(&self) -> Option<Value> {
        match self {
            Self::InvalidSpecification(reason) => Some(serde_json::json!({ "reason": reason })),
            Self::CompanyNotFound(id) => Some(serde_json::json!({ "company_id": id })),
            Self::DuplicateCompanyId(id) => Some(serde_json::json!({ "id": id })),
            Self::SourceUnavailable { backend, path, .. } => {
                Some(serde_json::json!({ "backend": backend, "path": path }))
            }
            Self::MissingConfig(key) => Some(serde_json::json!({ "config_key": key })),
            _ => None,
        }
    }

    /// HTTP status for this error at the query service boundary.
    #[must_use]
    pub fn http_status(&self) -> u16 {
        self.code().http_status()
    }

    /// Convert this error to a structured error.
    #[must_use]
    pub fn to_structured(&self) -> StructuredError {
        StructuredError::from_ms_error(self)
    }
}

/// A structured error with machine-readable code, suggestion, and context.
///
/// Emitted in machine output mode and as the body of HTTP error responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredError {
    /// The error code (e.g., "INVALID_SPECIFICATION")
    pub code: ErrorCode,

    /// The numeric error code (e.g., 401)
    pub numeric_code: u16,

    /// Human-readable error message
    pub message: String,

    /// Actionable suggestion for recovery
    pub suggestion: String,

    /// Additional context for debugging
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<Value>,

    /// Whether this error is potentially recoverable by the user
    pub recoverable: bool,

    /// URL to documentation about this error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_url: Option<String>,

    /// Error category (e.g., "search", "config", "network")
    pub category: String,
}

impl StructuredError {
    /// Create a new structured error.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            numeric_code: code.numeric(),
            suggestion: code.suggestion().to_string(),
            context: None,
            recoverable: code.is_recoverable(),
            help_url: code.help_url(),
            category: code.category().to_string(),
            code,
            message,
        }
    }

    /// Create a structured error from an `MsError`.
    #[must_use]
    pub fn from_ms_error(err: &MsError) -> Self {
        let code = err.code();
        let context = err.context();
        let suggestion = suggest_for_error(code, context.as_ref());

        Self {
            code,
            numeric_code: code.numeric(),
            message: err.to_string(),
            suggestion,
            context,
            recoverable: code.is_recoverable(),
            help_url: code.help_url(),
            category: code.category().to_string(),
        }
    }

    /// Add context to this error, regenerating the suggestion.
    #[must_use]
    pub fn with_context(mut self, context: Value) -> Self {
        self.context = Some(context);
        self.suggestion = suggest_for_error(self.code, self.context.as_ref());
        self
    }

    /// Set a custom suggestion.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = suggestion.into();
        self
    }
}

impl std::fmt::Display for StructuredError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl From<&MsError> for StructuredError {
    fn from(err: &MsError) -> Self {
        Self::from_ms_error(err)
    }
}

/// Result type alias using `MsError`.
pub type Result<T> = std::result::Result<T, MsError>;
