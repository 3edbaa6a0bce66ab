//! JSON file source

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::CompanySource;
use crate::core::Company;
use crate::error::{MsError, Result};

#[derive(Deserialize)]
#[serde(untagged)]
enum CompanyFile {
    List(Vec<Company>),
    Wrapped { companies: Vec<Company> },
}

/// Reads a JSON array of companies, or an object with a `companies` array.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn unavailable(&self, reason: String) -> MsError {
        MsError::SourceUnavailable {
            backend: "json".to_string(),
            path: Some(self.path.display().to_string()),
            reason,
        }
    }
}

/// Parse a company list from JSON text.
pub fn parse_companies(raw: &str) -> Result<Vec<Company>> {
    let file: CompanyFile = serde_json::from_str(raw)
        .map_err(|err| MsError::InvalidCompany(format!("not a company list: {err}")))?;
    Ok(match file {
        CompanyFile::List(companies) | CompanyFile::Wrapped { companies } => companies,
    })
}

impl CompanySource for JsonFileSource {
    fn fetch_all(&self) -> Result<Vec<Company>> {
        let raw = std::fs::read_to_string(&self.path)
            .map_err(|err| self.unavailable(err.to_string()))?;
        parse_companies(&raw)
    }

    fn describe(&self) -> String {
        format!("json {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_bare_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("companies.json");
        std::fs::write(
            &path,
            r#"[{"id": 1, "name": "Innovate Inc.", "domain": "innovate.com", "founded": 0,
                 "technologies": ["React"]}]"#,
        )
        .unwrap();

        let companies = JsonFileSource::new(&path).fetch_all().unwrap();
        assert_eq!(companies.len(), 1);
        assert_eq!(companies[0].founded, None);
        assert_eq!(companies[0].technologies, vec!["React"]);
    }

    #[test]
    fn test_reads_wrapped_list() {
        let companies = parse_companies(
            r#"{"companies": [{"id": 2, "name": "HealthWell", "domain": "healthwell.io",
                 "revenue_usd": 75000000}]}"#,
        )
        .unwrap();
        assert_eq!(companies[0].revenue, 75_000_000);
    }

    #[test]
    fn test_missing_file_is_source_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let err = JsonFileSource::new(dir.path().join("absent.json"))
            .fetch_all()
            .unwrap_err();
        assert!(matches!(err, MsError::SourceUnavailable { .. }));
    }

    #[test]
    fn test_wrong_shape_is_invalid_company() {
        let err = parse_companies(r#"{"rows": []}"#).unwrap_err();
        assert!(matches!(err, MsError::InvalidCompany(_)));
    }
}
