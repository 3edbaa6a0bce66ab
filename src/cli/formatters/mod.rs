//! Output formatters for CLI commands
//!
//! Provides structured formatters for common output types that can render
//! to multiple formats (Human, JSON, JSONL, Plain, TSV).

mod company_results;
mod filter_summary;

pub use company_results::CompanyResults;
pub use filter_summary::describe_spec;
