//! Database migrations

use rusqlite::Connection;

use crate::error::{MsError, Result};

const MIGRATIONS: [&str; 1] = [include_str!("../../migrations/001_companies.sql")];

pub const SCHEMA_VERSION: u32 = MIGRATIONS.len() as u32;

/// Bring the database up to [`SCHEMA_VERSION`].
pub fn run_migrations(conn: &Connection) -> Result<u32> {
    let current_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;

    for (idx, sql) in MIGRATIONS.iter().enumerate() {
        let target_version = (idx + 1) as u32;
        if current_version >= target_version {
            continue;
        }

        conn.execute_batch(sql).map_err(|err| MsError::SourceUnavailable {
            backend: "sqlite".to_string(),
            path: conn.path().map(str::to_string),
            reason: format!("migration {target_version} failed: {err}"),
        })?;
        conn.pragma_update(None, "user_version", target_version)?;
    }

    if current_version > SCHEMA_VERSION {
        return Err(MsError::SourceUnavailable {
            backend: "sqlite".to_string(),
            path: conn.path().map(str::to_string),
            reason: format!(
                "database schema {current_version} is newer than supported {SCHEMA_VERSION}"
            ),
        });
    }

    Ok(SCHEMA_VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_user_version(conn: &Connection) -> u32 {
        conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn migrations_are_not_empty() {
        for (idx, sql) in MIGRATIONS.iter().enumerate() {
            assert!(!sql.trim().is_empty(), "Migration {} is empty", idx + 1);
        }
    }

    #[test]
    fn run_migrations_on_empty_database() {
        let conn = Connection::open_in_memory().unwrap();
        assert_eq!(get_user_version(&conn), 0);

        let version = run_migrations(&conn).unwrap();
        assert_eq!(version, SCHEMA_VERSION);
        assert_eq!(get_user_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn run_migrations_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        for _ in 0..3 {
            assert_eq!(run_migrations(&conn).unwrap(), SCHEMA_VERSION);
        }
        assert_eq!(get_user_version(&conn), SCHEMA_VERSION);
    }

    #[test]
    fn companies_table_exists_after_migration() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'companies'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
        let err = run_migrations(&conn).unwrap_err();
        assert!(matches!(err, MsError::SourceUnavailable { .. }));
    }
}
