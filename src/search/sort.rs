//! Presentation ordering and pagination
//!
//! The engine leaves results in rank or collection order. Anything that
//! pages or snapshots results sorts them here first so the order is total.

use std::cmp::Ordering;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::core::Company;

/// Column to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    Name,
    Domain,
    Industry,
    Category,
    #[value(alias = "hq_country")]
    #[serde(alias = "hq_country")]
    Country,
    Revenue,
    Employees,
    Founded,
    TechCount,
    OfficeCount,
    Id,
}

impl SortKey {
    pub fn parse(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value.trim(), true).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn parse(value: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(value.trim(), true).ok()
    }
}

/// Sort column plus direction. Defaults to name ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

impl SortSpec {
    #[must_use]
    pub const fn new(key: SortKey, direction: SortDirection) -> Self {
        Self { key, direction }
    }

    /// Primary key in the chosen direction, then name and id ascending.
    pub fn compare(&self, a: &Company, b: &Company) -> Ordering {
        let primary = compare_key(self.key, a, b);
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    }
}

fn compare_key(key: SortKey, a: &Company, b: &Company) -> Ordering {
    match key {
        SortKey::Name => a.name.cmp(&b.name),
        SortKey::Domain => a.domain.cmp(&b.domain),
        SortKey::Industry => a.industry.cmp(&b.industry),
        SortKey::Category => a.category.cmp(&b.category),
        SortKey::Country => a.hq_country.cmp(&b.hq_country),
        SortKey::Revenue => a.revenue.cmp(&b.revenue),
        SortKey::Employees => a.employees.cmp(&b.employees),
        SortKey::Founded => a.founded.cmp(&b.founded),
        SortKey::TechCount => a.tech_count().cmp(&b.tech_count()),
        SortKey::OfficeCount => a.office_count().cmp(&b.office_count()),
        SortKey::Id => a.id.cmp(&b.id),
    }
}

pub fn sort_companies(companies: &mut [Company], spec: SortSpec) {
    companies.sort_by(|a, b| spec.compare(a, b));
}

/// One page of a sorted result list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// Matches before paging
    pub total: usize,
    pub offset: usize,
    /// Page size; 0 means no limit
    pub limit: usize,
    pub results: Vec<Company>,
}

/// Cut `[offset, offset + limit)` out of `companies`; `limit == 0` keeps the rest.
pub fn paginate(companies: Vec<Company>, offset: usize, limit: usize) -> Page {
    let total = companies.len();
    let results = companies
        .into_iter()
        .skip(offset)
        .take(if limit == 0 { usize::MAX } else { limit })
        .collect();
    Page {
        total,
        offset,
        limit,
        results,
    }
}
