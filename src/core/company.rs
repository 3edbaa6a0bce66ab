//! Company directory record

use itertools::Itertools;
use serde::{Deserialize, Deserializer, Serialize};

/// One directory record.
///
/// Records are immutable once loaded into a [`crate::search::Catalog`]; every
/// filter predicate is a pure function of these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier within a collection
    pub id: u64,
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub hq_country: String,
    /// Founding year. `0` in source data means unknown.
    #[serde(default, deserialize_with = "zero_as_absent")]
    pub founded: Option<i32>,
    /// Annual revenue in whole dollars
    #[serde(default, alias = "revenue_usd")]
    pub revenue: u64,
    #[serde(default)]
    pub employees: u64,
    /// Technology tags in display order; may repeat in source data
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub office_locations: Vec<String>,
}

fn zero_as_absent<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let year = Option::<i32>::deserialize(deserializer)?;
    Ok(year.filter(|year| *year != 0))
}

impl Company {
    /// Create a company with empty facets
    pub fn new(id: u64, name: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            domain: domain.into(),
            industry: String::new(),
            category: String::new(),
            hq_country: String::new(),
            founded: None,
            revenue: 0,
            employees: 0,
            technologies: Vec::new(),
            office_locations: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = industry.into();
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.hq_country = country.into();
        self
    }

    #[must_use]
    pub fn with_founded(mut self, year: i32) -> Self {
        self.founded = (year != 0).then_some(year);
        self
    }

    #[must_use]
    pub const fn with_revenue(mut self, revenue: u64) -> Self {
        self.revenue = revenue;
        self
    }

    #[must_use]
    pub const fn with_employees(mut self, employees: u64) -> Self {
        self.employees = employees;
        self
    }

    #[must_use]
    pub fn with_technologies<I, S>(mut self, technologies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.technologies = technologies.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_offices<I, S>(mut self, offices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.office_locations = offices.into_iter().map(Into::into).collect();
        self
    }

    /// Set membership on technologies
    #[must_use]
    pub fn has_technology(&self, technology: &str) -> bool {
        self.technologies.iter().any(|t| t == technology)
    }

    /// Set membership on office locations
    #[must_use]
    pub fn has_office(&self, location: &str) -> bool {
        self.office_locations.iter().any(|l| l == location)
    }

    /// Number of distinct technologies
    #[must_use]
    pub fn tech_count(&self) -> usize {
        self.technologies.iter().unique().count()
    }

    /// Number of distinct office locations
    #[must_use]
    pub fn office_count(&self) -> usize {
        self.office_locations.iter().unique().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_technologies_count_once() {
        let company = Company::new(1, "Acme", "acme.io")
            .with_technologies(["React", "Node.js", "React"]);
        assert_eq!(company.technologies.len(), 3);
        assert_eq!(company.tech_count(), 2);
        assert!(company.has_technology("React"));
        assert!(!company.has_technology("react"));
    }

    #[test]
    fn test_zero_founded_reads_as_absent() {
        let json = r#"{"id":3,"name":"Acme","domain":"acme.io","founded":0}"#;
        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.founded, None);
        assert!(company.technologies.is_empty());
    }

    #[test]
    fn test_revenue_usd_alias() {
        let json = r#"{"id":3,"name":"Acme","domain":"acme.io","revenue_usd":5000}"#;
        let company: Company = serde_json::from_str(json).unwrap();
        assert_eq!(company.revenue, 5000);
    }

    #[test]
    fn test_serializes_every_field() {
        let company = Company::new(7, "Acme", "acme.io").with_founded(2001);
        let value = serde_json::to_value(&company).unwrap();
        for key in [
            "id",
            "name",
            "domain",
            "industry",
            "category",
            "hq_country",
            "founded",
            "revenue",
            "employees",
            "technologies",
            "office_locations",
        ] {
            assert!(value.get(key).is_some(), "missing {key}");
        }
        assert_eq!(value["founded"], 2001);
    }
}
