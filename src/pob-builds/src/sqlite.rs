//! SQLite implementation using rusqlite (synchronous).

use crate::repository::*;
use crate::types::{now_millis, SavedBuild, MAX_SAVED_BUILDS};
use pob::BuildMetadata;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Database file name inside the data directory
pub const DEFAULT_DB_FILE: &str = "builds.db";

const BUILD_COLUMNS: &str = "id, name, code, class_name, ascendancy_name, level, saved_at";

/// SQLite-backed build storage
pub struct SqliteStore {
    conn: Connection,
}

fn db_err(e: rusqlite::Error) -> RepoError {
    RepoError::Database(e.to_string())
}

fn row_to_build(row: &rusqlite::Row<'_>) -> rusqlite::Result<SavedBuild> {
    Ok(SavedBuild {
        id: row.get(0)?,
        name: row.get(1)?,
        code: row.get(2)?,
        class_name: row.get(3)?,
        ascendancy_name: row.get(4)?,
        level: row.get(5)?,
        saved_at: row.get(6)?,
    })
}

impl SqliteStore {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path.as_ref())?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    fn is_migration_applied(&self, version: &str) -> RepoResult<bool> {
        let result: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM schema_migrations WHERE version = ?1",
                params![version],
                |row| row.get(0),
            )
            .optional()
            .map_err(db_err)?;
        Ok(result.is_some())
    }

    fn mark_migration_applied(&self, version: &str) -> RepoResult<()> {
        self.conn
            .execute(
                "INSERT INTO schema_migrations (version) VALUES (?1)",
                params![version],
            )
            .map_err(db_err)?;
        Ok(())
    }

    fn run_migrations(&self) -> RepoResult<()> {
        // seq keeps insertion order even when two saves share a timestamp
        if !self.is_migration_applied("0001_saved_builds")? {
            self.conn
                .execute_batch(
                    r#"
                CREATE TABLE IF NOT EXISTS saved_builds (
                    seq INTEGER PRIMARY KEY AUTOINCREMENT,
                    id TEXT NOT NULL UNIQUE,
                    name TEXT NOT NULL,
                    code TEXT NOT NULL,
                    class_name TEXT,
                    ascendancy_name TEXT,
                    level INTEGER,
                    saved_at INTEGER NOT NULL
                );
                "#,
                )
                .map_err(db_err)?;
            self.mark_migration_applied("0001_saved_builds")?;
        }
        Ok(())
    }

    /// Drop everything but the newest `keep` builds
    fn trim(&self, keep: usize) -> RepoResult<usize> {
        let keep = i64::try_from(keep).unwrap_or(i64::MAX);
        let removed = self
            .conn
            .execute(
                "DELETE FROM saved_builds WHERE seq NOT IN
                 (SELECT seq FROM saved_builds ORDER BY seq DESC LIMIT ?1)",
                params![keep],
            )
            .map_err(db_err)?;
        Ok(removed)
    }
}

impl BuildsRepository for SqliteStore {
    fn init(&self) -> RepoResult<()> {
        self.conn
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS schema_migrations (
                    version TEXT PRIMARY KEY NOT NULL,
                    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
                );",
            )
            .map_err(db_err)?;
        self.run_migrations()
    }

    fn save_build(&self, name: &str, code: &str, info: &BuildMetadata) -> RepoResult<SavedBuild> {
        let name = name.trim();
        let code = code.trim();
        if name.is_empty() {
            return Err(RepoError::InvalidInput("build name is empty".to_string()));
        }
        if code.is_empty() {
            return Err(RepoError::InvalidInput("export code is empty".to_string()));
        }

        let build = SavedBuild {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            code: code.to_string(),
            class_name: info.class_name.clone(),
            ascendancy_name: info.ascendancy_name.clone(),
            level: info.level,
            saved_at: now_millis(),
        };

        self.conn
            .execute(
                "INSERT INTO saved_builds (id, name, code, class_name, ascendancy_name, level, saved_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    build.id,
                    build.name,
                    build.code,
                    build.class_name,
                    build.ascendancy_name,
                    build.level,
                    build.saved_at
                ],
            )
            .map_err(db_err)?;

        let removed = self.trim(MAX_SAVED_BUILDS)?;
        tracing::debug!(id = %build.id, removed, "saved build");
        Ok(build)
    }

    fn list_builds(&self) -> RepoResult<Vec<SavedBuild>> {
        let sql = format!(
            "SELECT {} FROM saved_builds ORDER BY seq DESC",
            BUILD_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql).map_err(db_err)?;
        let builds = stmt
            .query_map([], row_to_build)
            .map_err(db_err)?
            .collect::<Result<Vec<_>, _>>()
            .map_err(db_err)?;
        Ok(builds)
    }

    fn get_build(&self, id: &str) -> RepoResult<Option<SavedBuild>> {
        let sql = format!("SELECT {} FROM saved_builds WHERE id = ?1", BUILD_COLUMNS);
        self.conn
            .query_row(&sql, params![id], row_to_build)
            .optional()
            .map_err(db_err)
    }

    fn delete_build(&self, id: &str) -> RepoResult<bool> {
        let rows = self
            .conn
            .execute("DELETE FROM saved_builds WHERE id = ?1", params![id])
            .map_err(db_err)?;
        Ok(rows > 0)
    }
}
