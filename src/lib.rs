pub mod app;
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod export;
pub mod search;
pub mod server;
pub mod storage;
pub mod test_utils;
pub mod translate;

pub use error::{MsError, Result};

/// Package version from Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
