//! Facet option lists derived from a collection

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use super::company::Company;

/// Every value a filter facet can take in the current collection.
///
/// Lists are sorted and de-duplicated. The translator is told to choose only
/// from these values, and its output is checked against them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    pub technologies: Vec<String>,
    pub industries: Vec<String>,
    pub categories: Vec<String>,
    pub countries: Vec<String>,
    pub office_locations: Vec<String>,
}

impl FilterOptions {
    pub fn from_companies(companies: &[Company]) -> Self {
        Self {
            technologies: sorted_unique(companies.iter().flat_map(|c| c.technologies.iter())),
            industries: sorted_unique(companies.iter().map(|c| &c.industry)),
            categories: sorted_unique(companies.iter().map(|c| &c.category)),
            countries: sorted_unique(companies.iter().map(|c| &c.hq_country)),
            office_locations: sorted_unique(
                companies.iter().flat_map(|c| c.office_locations.iter()),
            ),
        }
    }

    /// Look up the canonical spelling of `value` among `candidates`,
    /// ignoring ASCII case and surrounding whitespace.
    pub fn canonical<'a>(candidates: &'a [String], value: &str) -> Option<&'a str> {
        let needle = value.trim();
        candidates
            .iter()
            .find(|candidate| candidate.eq_ignore_ascii_case(needle))
            .map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.technologies.is_empty()
            && self.industries.is_empty()
            && self.categories.is_empty()
            && self.countries.is_empty()
            && self.office_locations.is_empty()
    }
}

fn sorted_unique<'a>(values: impl Iterator<Item = &'a String>) -> Vec<String> {
    values
        .filter(|value| !value.trim().is_empty())
        .cloned()
        .sorted()
        .dedup()
        .collect()
}
