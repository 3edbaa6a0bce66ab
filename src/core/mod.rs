//! Core directory types

pub mod company;
pub mod options;

pub use company::Company;
pub use options::FilterOptions;
