use std::path::PathBuf;

use tempfile::TempDir;

use crate::config::{Config, SourceBackend};
use crate::core::Company;
use crate::search::{Catalog, IndexOptions};
use crate::storage::Database;
use crate::storage::sample::sample_companies;

/// Company with the given technologies and otherwise empty facets.
pub fn company(id: u64, name: &str, technologies: &[&str]) -> Company {
    Company::new(id, name, format!("{}.test", name.to_lowercase().replace(' ', "")))
        .with_technologies(technologies.iter().copied())
}

/// Catalog over the built-in sample directory.
pub fn sample_catalog() -> Catalog {
    Catalog::new(sample_companies(), IndexOptions::default())
}

/// Isolated directory holding a company database and source files.
pub struct DirectoryFixture {
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
}

impl DirectoryFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("companies.db");

        println!("[FIXTURE] Created temp directory: {:?}", temp_dir.path());

        Self { temp_dir, db_path }
    }

    /// Fixture whose database already holds the sample directory.
    pub fn seeded() -> Self {
        let fixture = Self::new();
        let mut db = Database::open(&fixture.db_path).expect("Failed to open database");
        let written = db
            .seed(&sample_companies(), 5)
            .expect("Failed to seed database");
        println!("[FIXTURE] Seeded {written} companies");
        fixture
    }

    /// Write `companies` as a JSON array and return its path.
    pub fn write_json(&self, name: &str, companies: &[Company]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let raw = serde_json::to_string_pretty(companies).expect("Failed to serialize companies");
        std::fs::write(&path, raw).expect("Failed to write file");
        println!("[FIXTURE] Created file: {:?} ({} companies)", path, companies.len());
        path
    }

    /// Config reading from this fixture's database.
    pub fn sqlite_config(&self) -> Config {
        let mut config = Config::default();
        config.source.backend = SourceBackend::Sqlite;
        config.source.path = Some(self.db_path.clone());
        config
    }
}

impl Default for DirectoryFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DirectoryFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.temp_dir.path());
    }
}
