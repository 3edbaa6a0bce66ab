//! Filter specification and predicate evaluation
//!
//! A [`FilterSpec`] is built fresh per query, validated, handed to the
//! engine once and dropped. Every predicate is an independent pure function
//! of one company; a company is retained only when all of them hold:
//! - industry / category / country membership
//! - office location intersection
//! - technologies: AND (superset), OR (intersects), NOT (disjoint)
//! - inclusive ranges over technology count, office count, employees, revenue
//! - exact founding year

use serde::{Deserialize, Serialize};

use crate::core::{Company, FilterOptions};
use crate::error::{MsError, Result};

/// Upper slider position for count ranges. A range whose max reaches this
/// value has no upper bound.
pub const COUNT_CEILING: u32 = 50;

/// Inclusive `[min, max]` range, serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u64; 2]", into = "[u64; 2]")]
pub struct Range {
    pub min: u64,
    pub max: u64,
}

impl Range {
    #[must_use]
    pub const fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Default for technology and office-location counts.
    #[must_use]
    pub const fn default_count() -> Self {
        Self::new(0, COUNT_CEILING as u64)
    }

    #[must_use]
    pub const fn contains(&self, value: u64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Count-range membership: a max at the ceiling means "or more".
    #[must_use]
    pub const fn contains_count(&self, value: u64) -> bool {
        value >= self.min && (self.max >= COUNT_CEILING as u64 || value <= self.max)
    }

    const fn is_default_count(&self) -> bool {
        self.min == 0 && self.max >= COUNT_CEILING as u64
    }

    fn validate(&self, field: &str) -> Result<()> {
        if self.min > self.max {
            return Err(MsError::InvalidSpecification(format!(
                "{field}: min {} is greater than max {}",
                self.min, self.max
            )));
        }
        Ok(())
    }
}

impl From<[u64; 2]> for Range {
    fn from([min, max]: [u64; 2]) -> Self {
        Self { min, max }
    }
}

impl From<Range> for [u64; 2] {
    fn from(range: Range) -> Self {
        [range.min, range.max]
    }
}

fn default_count_range() -> Range {
    Range::default_count()
}

/// Scale of a revenue bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevenueUnit {
    #[serde(alias = "million")]
    Millions,
    #[serde(alias = "billion")]
    Billions,
}

impl RevenueUnit {
    #[must_use]
    pub const fn multiplier(&self) -> f64 {
        match self {
            Self::Millions => 1_000_000.0,
            Self::Billions => 1_000_000_000.0,
        }
    }
}

/// A revenue bound such as "100 millions".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RevenueBound {
    pub value: f64,
    pub unit: RevenueUnit,
}

impl RevenueBound {
    #[must_use]
    pub const fn millions(value: f64) -> Self {
        Self {
            value,
            unit: RevenueUnit::Millions,
        }
    }

    #[must_use]
    pub const fn billions(value: f64) -> Self {
        Self {
            value,
            unit: RevenueUnit::Billions,
        }
    }

    /// Absolute amount in whole dollars.
    #[must_use]
    pub fn absolute(&self) -> u64 {
        let amount = (self.value * self.unit.multiplier()).round();
        if amount <= 0.0 {
            0
        } else if amount >= u64::MAX as f64 {
            u64::MAX
        } else {
            amount as u64
        }
    }

    /// Parse shorthand like `100m`, `1.5b`, `250 millions`.
    pub fn parse(input: &str) -> Result<Self> {
        let lowered = input.trim().to_lowercase();
        let split = lowered
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(lowered.len());
        let (number, unit) = lowered.split_at(split);
        let value: f64 = number.parse().map_err(|_| {
            MsError::InvalidSpecification(format!("revenue bound {input:?} has no number"))
        })?;
        let unit = match unit.trim() {
            "" | "m" | "mm" | "million" | "millions" => RevenueUnit::Millions,
            "b" | "bn" | "billion" | "billions" => RevenueUnit::Billions,
            other => {
                return Err(MsError::InvalidSpecification(format!(
                    "revenue unit {other:?} (expected millions or billions)"
                )));
            }
        };
        let bound = Self { value, unit };
        bound.validate("revenue")?;
        Ok(bound)
    }

    fn validate(&self, field: &str) -> Result<()> {
        if !self.value.is_finite() || self.value < 0.0 {
            return Err(MsError::InvalidSpecification(format!(
                "{field}: value must be a non-negative number, got {}",
                self.value
            )));
        }
        Ok(())
    }
}

/// Structured query configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FilterSpec {
    /// Free-text query; absent or blank disables text filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default)]
    pub industries: Vec<String>,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub countries: Vec<String>,
    #[serde(default)]
    pub office_locations: Vec<String>,
    #[serde(default)]
    pub technologies_and: Vec<String>,
    #[serde(default)]
    pub technologies_or: Vec<String>,
    #[serde(default)]
    pub technologies_not: Vec<String>,
    #[serde(default = "default_count_range")]
    pub tech_count: Range,
    #[serde(default = "default_count_range")]
    pub office_location_count: Range,
    /// Absent means unrestricted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employee_count: Option<Range>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_revenue: Option<RevenueBound>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_revenue: Option<RevenueBound>,
    /// `0` or absent means unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i32>,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            search: None,
            industries: Vec::new(),
            categories: Vec::new(),
            countries: Vec::new(),
            office_locations: Vec::new(),
            technologies_and: Vec::new(),
            technologies_or: Vec::new(),
            technologies_not: Vec::new(),
            tech_count: Range::default_count(),
            office_location_count: Range::default_count(),
            employee_count: None,
            min_revenue: None,
            max_revenue: None,
            founded_year: None,
        }
    }
}

impl FilterSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON filter body.
    pub fn from_json(raw: &str) -> Result<Self> {
        let spec: Self = serde_json::from_str(raw)
            .map_err(|err| MsError::InvalidSpecification(err.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    /// Same as [`FilterSpec::from_json`] for an already-decoded value.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let spec: Self = serde_json::from_value(value)
            .map_err(|err| MsError::InvalidSpecification(err.to_string()))?;
        spec.validate()?;
        Ok(spec)
    }

    #[must_use]
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    #[must_use]
    pub fn with_industries(mut self, values: Vec<String>) -> Self {
        self.industries = values;
        self
    }

    #[must_use]
    pub fn with_categories(mut self, values: Vec<String>) -> Self {
        self.categories = values;
        self
    }

    #[must_use]
    pub fn with_countries(mut self, values: Vec<String>) -> Self {
        self.countries = values;
        self
    }

    #[must_use]
    pub fn with_office_locations(mut self, values: Vec<String>) -> Self {
        self.office_locations = values;
        self
    }

    #[must_use]
    pub fn with_technologies_and(mut self, values: Vec<String>) -> Self {
        self.technologies_and = values;
        self
    }

    #[must_use]
    pub fn with_technologies_or(mut self, values: Vec<String>) -> Self {
        self.technologies_or = values;
        self
    }

    #[must_use]
    pub fn with_technologies_not(mut self, values: Vec<String>) -> Self {
        self.technologies_not = values;
        self
    }

    #[must_use]
    pub const fn with_tech_count(mut self, min: u64, max: u64) -> Self {
        self.tech_count = Range::new(min, max);
        self
    }

    #[must_use]
    pub const fn with_office_location_count(mut self, min: u64, max: u64) -> Self {
        self.office_location_count = Range::new(min, max);
        self
    }

    #[must_use]
    pub const fn with_employee_count(mut self, min: u64, max: u64) -> Self {
        self.employee_count = Some(Range::new(min, max));
        self
    }

    #[must_use]
    pub const fn with_min_revenue(mut self, bound: RevenueBound) -> Self {
        self.min_revenue = Some(bound);
        self
    }

    #[must_use]
    pub const fn with_max_revenue(mut self, bound: RevenueBound) -> Self {
        self.max_revenue = Some(bound);
        self
    }

    #[must_use]
    pub const fn with_founded_year(mut self, year: i32) -> Self {
        self.founded_year = Some(year);
        self
    }

    /// Non-blank free-text query, if any.
    pub fn text_query(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Founding year to match, treating `0` as unset.
    pub fn founded_filter(&self) -> Option<i32> {
        self.founded_year.filter(|year| *year != 0)
    }

    /// True when no predicate and no text query constrains the result.
    pub fn is_empty(&self) -> bool {
        self.text_query().is_none() && !self.has_predicates()
    }

    /// True when at least one structured predicate is active.
    pub fn has_predicates(&self) -> bool {
        !self.industries.is_empty()
            || !self.categories.is_empty()
            || !self.countries.is_empty()
            || !self.office_locations.is_empty()
            || !self.technologies_and.is_empty()
            || !self.technologies_or.is_empty()
            || !self.technologies_not.is_empty()
            || !self.tech_count.is_default_count()
            || !self.office_location_count.is_default_count()
            || self.employee_count.is_some()
            || self.min_revenue.is_some()
            || self.max_revenue.is_some()
            || self.founded_filter().is_some()
    }

    /// Shape checks beyond what deserialization enforces.
    pub fn validate(&self) -> Result<()> {
        self.tech_count.validate("techCount")?;
        self.office_location_count.validate("officeLocationCount")?;
        if let Some(range) = &self.employee_count {
            range.validate("employeeCount")?;
        }
        if let Some(bound) = &self.min_revenue {
            bound.validate("minRevenue")?;
        }
        if let Some(bound) = &self.max_revenue {
            bound.validate("maxRevenue")?;
        }
        if let (Some(min), Some(max)) = (&self.min_revenue, &self.max_revenue) {
            if min.absolute() > max.absolute() {
                return Err(MsError::InvalidSpecification(format!(
                    "minRevenue {} is greater than maxRevenue {}",
                    min.absolute(),
                    max.absolute()
                )));
            }
        }
        if let Some(year) = self.founded_year {
            if year < 0 {
                return Err(MsError::InvalidSpecification(format!(
                    "foundedYear must not be negative, got {year}"
                )));
            }
        }
        Ok(())
    }

    /// Drop facet values that are not in `options`, restoring canonical
    /// spelling for the ones that are.
    #[must_use]
    pub fn restricted_to(mut self, options: &FilterOptions) -> Self {
        self.industries = keep_known(self.industries, &options.industries);
        self.categories = keep_known(self.categories, &options.categories);
        self.countries = keep_known(self.countries, &options.countries);
        self.office_locations = keep_known(self.office_locations, &options.office_locations);
        self.technologies_and = keep_known(self.technologies_and, &options.technologies);
        self.technologies_or = keep_known(self.technologies_or, &options.technologies);
        self.technologies_not = keep_known(self.technologies_not, &options.technologies);
        self
    }

    /// Evaluate every structured predicate against one company.
    ///
    /// The free-text query is not consulted here; the engine resolves it
    /// through the text index before calling this.
    pub fn matches(&self, company: &Company) -> bool {
        if !self.industries.is_empty() && !self.industries.contains(&company.industry) {
            return false;
        }
        if !self.categories.is_empty() && !self.categories.contains(&company.category) {
            return false;
        }
        if !self.countries.is_empty() && !self.countries.contains(&company.hq_country) {
            return false;
        }
        if !self.office_locations.is_empty()
            && !self.office_locations.iter().any(|l| company.has_office(l))
        {
            return false;
        }

        if !self.matches_technologies(company) {
            return false;
        }

        if !self.tech_count.contains_count(company.tech_count() as u64) {
            return false;
        }
        if !self
            .office_location_count
            .contains_count(company.office_count() as u64)
        {
            return false;
        }
        if let Some(range) = &self.employee_count {
            if !range.contains(company.employees) {
                return false;
            }
        }
        if let Some(bound) = &self.min_revenue {
            if company.revenue < bound.absolute() {
                return false;
            }
        }
        if let Some(bound) = &self.max_revenue {
            if company.revenue > bound.absolute() {
                return false;
            }
        }
        if let Some(year) = self.founded_filter() {
            if company.founded != Some(year) {
                return false;
            }
        }

        true
    }

    /// NOT is disjoint, AND is a subset, OR intersects. OR-only specs are
    /// a hard constraint.
    pub fn matches_technologies(&self, company: &Company) -> bool {
        if self.technologies_not.iter().any(|t| company.has_technology(t)) {
            return false;
        }
        if !self.technologies_and.iter().all(|t| company.has_technology(t)) {
            return false;
        }
        self.technologies_or.is_empty()
            || self.technologies_or.iter().any(|t| company.has_technology(t))
    }
}

fn keep_known(values: Vec<String>, known: &[String]) -> Vec<String> {
    let mut kept: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if let Some(canonical) = FilterOptions::canonical(known, &value) {
            if !kept.iter().any(|k| k == canonical) {
                kept.push(canonical.to_string());
            }
        }
    }
    kept
}

/// Per-item technology condition used at interface boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TechCondition {
    #[default]
    #[serde(alias = "and")]
    And,
    #[serde(alias = "or")]
    Or,
    #[serde(alias = "not")]
    Not,
}

/// One technology with its condition tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnologyFilter {
    pub value: String,
    #[serde(default)]
    pub condition: TechCondition,
}

/// Three disjoint technology sets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnologySets {
    pub and: Vec<String>,
    pub or: Vec<String>,
    pub not: Vec<String>,
}

impl TechnologySets {
    /// Split tagged technologies into AND / OR / NOT sets.
    ///
    /// A technology listed more than once keeps its first condition, which
    /// keeps the three sets disjoint.
    pub fn from_conditions(filters: &[TechnologyFilter]) -> Self {
        let mut sets = Self::default();
        for filter in filters {
            let value = filter.value.trim();
            if value.is_empty() || sets.contains(value) {
                continue;
            }
            let target = match filter.condition {
                TechCondition::And => &mut sets.and,
                TechCondition::Or => &mut sets.or,
                TechCondition::Not => &mut sets.not,
            };
            target.push(value.to_string());
        }
        sets
    }

    pub fn contains(&self, value: &str) -> bool {
        self.and.iter().chain(&self.or).chain(&self.not).any(|v| v == value)
    }

    /// Move the sets into `spec`, replacing its technology fields.
    pub fn apply_to(self, spec: &mut FilterSpec) {
        spec.technologies_and = self.and;
        spec.technologies_or = self.or;
        spec.technologies_not = self.not;
    }
}

/// Retain the companies for which every predicate holds, preserving order.
pub fn apply_predicates(candidates: Vec<Company>, spec: &FilterSpec) -> Vec<Company> {
    if !spec.has_predicates() {
        return candidates;
    }
    candidates
        .into_iter()
        .filter(|company| spec.matches(company))
        .collect()
}
