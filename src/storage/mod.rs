//! Company sources
//!
//! The engine only ever reads a whole collection at once. Sources hand over
//! every record and the catalog takes it from there.

pub mod json;
pub mod migrations;
pub mod sample;
pub mod sqlite;

use crate::config::{Config, SourceBackend};
use crate::core::Company;
use crate::error::{MsError, Result};

pub use json::JsonFileSource;
pub use sample::BuiltinSource;
pub use sqlite::{Database, SqliteSource};

/// Bulk read access to a company collection.
pub trait CompanySource: Send + Sync {
    /// Every record in the collection.
    fn fetch_all(&self) -> Result<Vec<Company>>;

    /// Short description for logs and `tse config`.
    fn describe(&self) -> String;
}

/// Open the source selected by `[source]`.
pub fn open_source(config: &Config) -> Result<Box<dyn CompanySource>> {
    match config.source.backend {
        SourceBackend::Sqlite => {
            let path = config.source.sqlite_path()?;
            Ok(Box::new(SqliteSource::new(path)))
        }
        SourceBackend::Json => {
            let path = config
                .source
                .path
                .clone()
                .ok_or_else(|| MsError::MissingConfig("source.path".to_string()))?;
            Ok(Box::new(JsonFileSource::new(path)))
        }
        SourceBackend::Builtin => Ok(Box::new(BuiltinSource)),
    }
}
