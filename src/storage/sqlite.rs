//! SQLite document store

use std::path::{Path, PathBuf};

use rusqlite::{Connection, params};
use tracing::{debug, info};

use super::CompanySource;
use crate::config::MAX_SEED_BATCH;
use crate::core::Company;
use crate::error::{MsError, Result};
use crate::storage::migrations;

/// SQLite database holding one JSON document per company
pub struct Database {
    conn: Connection,
    schema_version: u32,
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("schema_version", &self.schema_version)
            .finish_non_exhaustive()
    }
}

impl Database {
    /// Open database at the given path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;

        Self::configure_pragmas(&conn)?;
        let schema_version = migrations::run_migrations(&conn)?;

        Ok(Self {
            conn,
            schema_version,
        })
    }

    pub const fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Current schema version after migrations.
    pub const fn schema_version(&self) -> u32 {
        self.schema_version
    }

    pub fn count(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM companies", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    /// Every stored company ordered by id.
    pub fn fetch_all(&self) -> Result<Vec<Company>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, doc FROM companies ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut companies = Vec::new();
        for row in rows {
            let (id, doc) = row?;
            let company: Company = serde_json::from_str(&doc).map_err(|err| {
                MsError::InvalidCompany(format!("stored document {id} is malformed: {err}"))
            })?;
            companies.push(company);
        }
        Ok(companies)
    }

    pub fn get(&self, id: u64) -> Result<Option<Company>> {
        let mut stmt = self.conn.prepare("SELECT doc FROM companies WHERE id = ?")?;
        let mut rows = stmt.query([to_sql_id(id)?])?;
        if let Some(row) = rows.next()? {
            let doc: String = row.get(0)?;
            return Ok(Some(serde_json::from_str(&doc)?));
        }
        Ok(None)
    }

    /// Upsert `companies` in transactions of at most `batch_size` documents.
    ///
    /// A failing batch stops the run; batches committed before it stay
    /// written. Returns the number of documents written.
    pub fn seed(&mut self, companies: &[Company], batch_size: usize) -> Result<usize> {
        let batch_size = batch_size.clamp(1, MAX_SEED_BATCH);
        let updated_at = chrono::Utc::now().to_rfc3339();
        let mut written = 0;

        for (batch_no, chunk) in companies.chunks(batch_size).enumerate() {
            let tx = self.conn.transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO companies (id, name, tech_count, doc, updated_at) \
                     VALUES (?, ?, ?, ?, ?) \
                     ON CONFLICT(id) DO UPDATE SET name = excluded.name, \
                     tech_count = excluded.tech_count, doc = excluded.doc, \
                     updated_at = excluded.updated_at",
                )?;
                for company in chunk {
                    let doc = serde_json::to_string(company)?;
                    stmt.execute(params![
                        to_sql_id(company.id)?,
                        company.name,
                        i64::try_from(company.tech_count()).unwrap_or(i64::MAX),
                        doc,
                        updated_at,
                    ])?;
                }
            }
            tx.commit()?;
            written += chunk.len();
            debug!(batch = batch_no + 1, size = chunk.len(), "committed seed batch");
        }

        info!(written, batch_size, "seeded company documents");
        Ok(written)
    }

    /// Remove every stored company.
    pub fn reset(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM companies", [])?)
    }

    fn configure_pragmas(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA cache_size = -16000;
             PRAGMA temp_store = MEMORY;",
        )?;
        Ok(())
    }
}

fn to_sql_id(id: u64) -> Result<i64> {
    i64::try_from(id).map_err(|_| MsError::InvalidCompany(format!("id {id} exceeds storage range")))
}

/// [`CompanySource`] over a database file, opened per fetch.
#[derive(Debug, Clone)]
pub struct SqliteSource {
    path: PathBuf,
}

impl SqliteSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn open(&self) -> Result<Database> {
        Database::open(&self.path).map_err(|err| match err {
            MsError::Database(inner) => MsError::SourceUnavailable {
                backend: "sqlite".to_string(),
                path: Some(self.path.display().to_string()),
                reason: inner.to_string(),
            },
            other => other,
        })
    }
}

impl CompanySource for SqliteSource {
    fn fetch_all(&self) -> Result<Vec<Company>> {
        self.open()?.fetch_all()
    }

    fn describe(&self) -> String {
        format!("sqlite {}", self.path.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::sample::sample_companies;
    use tempfile::tempdir;

    #[test]
    fn test_database_creation_and_schema_version() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("test.db");
        let db = Database::open(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(db.schema_version(), migrations::SCHEMA_VERSION);
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn test_wal_mode_enabled() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        let mode: String = db
            .conn()
            .query_row("PRAGMA journal_mode;", [], |row| row.get(0))
            .unwrap();
        assert_eq!(mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_seed_then_fetch_in_id_order() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path().join("test.db")).unwrap();
        let mut companies = sample_companies();
        companies.reverse();

        let written = db.seed(&companies, 5).unwrap();
        assert_eq!(written, 12);

        let fetched = db.fetch_all().unwrap();
        let ids: Vec<u64> = fetched.iter().map(|c| c.id).collect();
        assert_eq!(ids, (1..=12).collect::<Vec<_>>());
        assert_eq!(fetched[0], sample_companies()[0]);
    }

    #[test]
    fn test_seed_stores_tech_count() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path().join("test.db")).unwrap();
        let company = Company::new(7, "Dup", "dup.io").with_technologies(["Go", "Go", "Rust"]);
        db.seed(&[company], 10).unwrap();

        let tech_count: i64 = db
            .conn()
            .query_row("SELECT tech_count FROM companies WHERE id = 7", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(tech_count, 2);
    }

    #[test]
    fn test_seed_upserts_existing_documents() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path().join("test.db")).unwrap();
        db.seed(&[Company::new(1, "Old", "old.io")], 499).unwrap();
        db.seed(&[Company::new(1, "New", "new.io")], 499).unwrap();

        assert_eq!(db.count().unwrap(), 1);
        assert_eq!(db.get(1).unwrap().unwrap().name, "New");
        assert!(db.get(2).unwrap().is_none());
    }

    #[test]
    fn test_batch_size_is_clamped() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path().join("test.db")).unwrap();
        assert_eq!(db.seed(&sample_companies(), 0).unwrap(), 12);
        assert_eq!(db.seed(&sample_companies(), 10_000).unwrap(), 12);
        assert_eq!(db.count().unwrap(), 12);
    }

    #[test]
    fn test_reset_clears_documents() {
        let dir = tempdir().unwrap();
        let mut db = Database::open(dir.path().join("test.db")).unwrap();
        db.seed(&sample_companies(), 499).unwrap();
        assert_eq!(db.reset().unwrap(), 12);
        assert_eq!(db.count().unwrap(), 0);
    }

    #[test]
    fn test_source_reads_seeded_database() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("companies.db");
        Database::open(&path)
            .unwrap()
            .seed(&sample_companies(), 499)
            .unwrap();

        let source = SqliteSource::new(&path);
        assert_eq!(source.fetch_all().unwrap().len(), 12);
        assert!(source.describe().starts_with("sqlite "));
    }

    #[test]
    fn test_malformed_document_is_invalid_company() {
        let dir = tempdir().unwrap();
        let db = Database::open(dir.path().join("test.db")).unwrap();
        db.conn()
            .execute(
                "INSERT INTO companies (id, name, tech_count, doc, updated_at) \
                 VALUES (1, 'x', 0, '{\"id\": \"one\"}', 'now')",
                [],
            )
            .unwrap();
        let err = db.fetch_all().unwrap_err();
        assert!(matches!(err, MsError::InvalidCompany(_)));
    }
}
