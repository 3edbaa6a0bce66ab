//! Standardized error codes for machine-parseable output.
//!
//! Error codes follow a numeric taxonomy:
//! - 1xx: Company data errors
//! - 2xx: Index errors
//! - 3xx: Config errors
//! - 4xx: Search / filter specification errors
//! - 5xx: Network and translator errors
//! - 6xx: Storage errors
//! - 9xx: Internal errors

use serde::{Deserialize, Serialize};

/// Standardized error codes for machine-readable output.
///
/// Each variant maps to a numeric code (e.g., `CompanyNotFound` -> E101).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // ========================================
    // Company errors (1xx)
    // ========================================
    /// E101: Requested company was not found in the directory
    CompanyNotFound,
    /// E102: Company record is malformed
    CompanyInvalid,
    /// E103: Two records share the same identifier
    DuplicateCompanyId,

    // ========================================
    // Index errors (2xx)
    // ========================================
    /// E201: Text index could not be built
    IndexBuildFailed,

    // ========================================
    // Config errors (3xx)
    // ========================================
    /// E301: Config file not found
    ConfigNotFound,
    /// E302: Config file has invalid syntax or values
    ConfigInvalid,
    /// E304: Required config value is missing
    ConfigMissingRequired,

    // ========================================
    // Search errors (4xx)
    // ========================================
    /// E401: Filter specification failed shape or range validation
    InvalidSpecification,

    // ========================================
    // Network errors (5xx)
    // ========================================
    /// E501: Natural-language translation failed
    TranslationFailed,
    /// E502: Translator is disabled or unreachable
    TranslatorUnavailable,
    /// E503: Network request timed out
    NetworkTimeout,

    // ========================================
    // Storage errors (6xx)
    // ========================================
    /// E601: Company source could not be read
    SourceUnavailable,
    /// E604: Database operation failed
    DatabaseError,
    /// E605: Serialization/deserialization failed
    SerializationError,

    // ========================================
    // Internal errors (9xx)
    // ========================================
    /// E901: Unexpected internal error
    InternalError,
    /// E905: Generic not found (catch-all)
    NotFound,
    /// E906: IO operation failed
    IoError,
}

impl ErrorCode {
    /// Get the numeric error code (e.g., `CompanyNotFound` -> 101).
    #[must_use]
    pub const fn numeric(&self) -> u16 {
        match self {
            Self::CompanyNotFound => 101,
            Self::CompanyInvalid => 102,
            Self::DuplicateCompanyId => 103,

            Self::IndexBuildFailed => 201,

            Self::ConfigNotFound => 301,
            Self::ConfigInvalid => 302,
            Self::ConfigMissingRequired => 304,

            Self::InvalidSpecification => 401,

            Self::TranslationFailed => 501,
            Self::TranslatorUnavailable => 502,
            Self::NetworkTimeout => 503,

            Self::SourceUnavailable => 601,
            Self::DatabaseError => 604,
            Self::SerializationError => 605,

            Self::InternalError => 901,
            Self::NotFound => 905,
            Self::IoError => 906,
        }
    }

    /// Get the error code as a formatted string (e.g., "E101").
    #[must_use]
    pub fn code_string(&self) -> String {
        format!("E{}", self.numeric())
    }

    /// Get the default suggestion for this error code.
    #[must_use]
    pub const fn suggestion(&self) -> &'static str {
        match self {
            Self::CompanyNotFound => "Run `tse search` without filters to list the directory, or check the id",
            Self::CompanyInvalid => "Check the source record: revenue and employees must be non-negative integers",
            Self::DuplicateCompanyId => "Give every company a unique id in the source data, then re-seed",

            Self::IndexBuildFailed => "Retry the query. If it persists, check the source data for unusual text",

            Self::ConfigNotFound => "Create a config file or pass --config <path>",
            Self::ConfigInvalid => "Run `tse config` to see current values. Check TOML syntax and TSE_* variables",
            Self::ConfigMissingRequired => "Set the required value in config.toml or via its TSE_* environment variable",

            Self::InvalidSpecification => "Check the filter JSON: ranges are [min, max] with min <= max, revenue units are millions or billions",

            Self::TranslationFailed => "Rephrase the request or set filters directly. Previous filters were kept",
            Self::TranslatorUnavailable => "Start the model server or set [translator] endpoint / TSE_TRANSLATOR_ENDPOINT",
            Self::NetworkTimeout => "The model server is slow or unreachable. Raise [translator] timeout_secs or retry",

            Self::SourceUnavailable => "Check [source] backend and path. Run `tse seed` to create the sample directory",
            Self::DatabaseError => "Delete and re-seed the database with `tse seed --reset`",
            Self::SerializationError => "The data format may be corrupted. Check input data for validity",

            Self::InternalError => "An unexpected error occurred. Please report this issue with full error output",
            Self::NotFound => "The requested resource was not found. Check the path or identifier",
            Self::IoError => "File operation failed. Check path exists and permissions are correct",
        }
    }

    /// Check if this error is potentially recoverable by the user.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        match self {
            Self::CompanyNotFound
            | Self::CompanyInvalid
            | Self::DuplicateCompanyId
            | Self::ConfigNotFound
            | Self::ConfigInvalid
            | Self::ConfigMissingRequired
            | Self::InvalidSpecification
            | Self::TranslationFailed
            | Self::TranslatorUnavailable
            | Self::NetworkTimeout
            | Self::SourceUnavailable
            | Self::NotFound
            | Self::IoError => true,

            Self::IndexBuildFailed
            | Self::DatabaseError
            | Self::SerializationError
            | Self::InternalError => false,
        }
    }

    /// Get the error category name.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self.numeric() / 100 {
            1 => "company",
            2 => "index",
            3 => "config",
            4 => "search",
            5 => "network",
            6 => "storage",
            9 => "internal",
            _ => "unknown",
        }
    }

    /// HTTP status used when this error crosses the query service boundary.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidSpecification | Self::CompanyInvalid => 400,
            Self::CompanyNotFound | Self::NotFound => 404,
            Self::TranslationFailed => 502,
            Self::TranslatorUnavailable => 503,
            Self::NetworkTimeout => 504,
            _ => 500,
        }
    }

    /// Get a URL to documentation for this error (if available).
    #[must_use]
    pub fn help_url(&self) -> Option<String> {
        Some(format!(
            "https://docs.techstack.dev/errors/{}",
            self.code_string()
        ))
    }

    /// Iterate over all error codes.
    pub fn all() -> impl Iterator<Item = Self> {
        [
            Self::CompanyNotFound,
            Self::CompanyInvalid,
            Self::DuplicateCompanyId,
            Self::IndexBuildFailed,
            Self::ConfigNotFound,
            Self::ConfigInvalid,
            Self::ConfigMissingRequired,
            Self::InvalidSpecification,
            Self::TranslationFailed,
            Self::TranslatorUnavailable,
            Self::NetworkTimeout,
            Self::SourceUnavailable,
            Self::DatabaseError,
            Self::SerializationError,
            Self::InternalError,
            Self::NotFound,
            Self::IoError,
        ]
        .into_iter()
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code_string())
    }
}
