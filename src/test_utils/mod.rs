//! Shared test utilities for techstack.

pub mod fixtures;
pub mod logging;

use crate::core::Company;

/// Ids of `companies` in order, for compact assertions.
pub fn ids(companies: &[Company]) -> Vec<u64> {
    companies.iter().map(|c| c.id).collect()
}

/// Sorted ids, for assertions that ignore rank.
pub fn id_set(companies: &[Company]) -> Vec<u64> {
    let mut ids = ids(companies);
    ids.sort_unstable();
    ids
}
