//! Read-only access to the org-roam database.

use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags};
use thiserror::Error;

use super::types::NoteRecord;

#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("failed to open org-roam database {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("failed to query org-roam database: {0}")]
    Query(#[from] rusqlite::Error),
}

/// Records loaded from the `nodes` table.
#[derive(Debug, Clone, Default)]
pub struct RecordSet {
    /// Valid records, ordered by id descending.
    pub records: Vec<NoteRecord>,
    /// Rows dropped because a required field was missing or malformed.
    pub quarantined: usize,
}

/// Handle on an org-roam SQLite database. The connection is closed on drop.
pub struct RoamDb {
    conn: Connection,
    path: PathBuf,
}

impl RoamDb {
    /// Open an existing database without write access.
    pub fn open(path: &Path) -> Result<Self, DataSourceError> {
        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|source| DataSourceError::Open {
            path: path.display().to_string(),
            source,
        })?;
        conn.execute_batch(
            "PRAGMA query_only = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        Ok(Self { conn, path: path.to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Fetch every node record, newest id first.
    pub fn load_records(&self) -> Result<RecordSet, DataSourceError> {
        let mut stmt =
            self.conn.prepare("SELECT id, file, title FROM nodes ORDER BY id DESC")?;

        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, Value>(0)?, row.get::<_, Value>(1)?, row.get::<_, Value>(2)?))
        })?;

        let mut set = RecordSet::default();
        for row in rows {
            let (id, file, title) = row?;
            let shown_id = format!("{id:?}");
            match NoteRecord::from_values(id, file, title) {
                Ok(record) => set.records.push(record),
                Err(e) => {
                    tracing::warn!("Skipping malformed node {}: {}", shown_id, e);
                    set.quarantined += 1;
                }
            }
        }

        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_db(rows: &[(&str, Option<&str>, Option<&str>)]) -> (TempDir, PathBuf) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("org-roam.db");
        let conn = Connection::open(&path).unwrap();
        conn.execute_batch(
            "CREATE TABLE nodes (
                id NOT NULL PRIMARY KEY,
                file NOT NULL,
                level NOT NULL DEFAULT 0,
                pos NOT NULL DEFAULT 1,
                title
             );",
        )
        .unwrap();
        for (id, file, title) in rows {
            conn.execute(
                "INSERT INTO nodes (id, file, title) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, file.unwrap_or(""), title],
            )
            .unwrap();
        }
        (dir, path)
    }

    #[test]
    fn loads_records_in_descending_id_order() {
        let (_dir, path) = create_db(&[
            ("\"a\"", Some("\"/r/a.org\""), Some("\"A\"")),
            ("\"c\"", Some("\"/r/c.org\""), Some("\"C\"")),
            ("\"b\"", Some("\"/r/b.org\""), Some("\"B\"")),
        ]);

        let db = RoamDb::open(&path).unwrap();
        let set = db.load_records().unwrap();

        let ids: Vec<_> = set.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["c", "b", "a"]);
        assert_eq!(set.records[0].file, "/r/c.org");
        assert_eq!(set.records[0].title, "C");
        assert_eq!(set.quarantined, 0);
    }

    #[test]
    fn rows_without_title_are_quarantined() {
        let (_dir, path) = create_db(&[
            ("\"a\"", Some("\"/r/a.org\""), Some("\"A\"")),
            ("\"b\"", Some("\"/r/b.org\""), None),
        ]);

        let set = RoamDb::open(&path).unwrap().load_records().unwrap();
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.records[0].id.as_str(), "a");
        assert_eq!(set.quarantined, 1);
    }

    #[test]
    fn empty_table_is_not_an_error() {
        let (_dir, path) = create_db(&[]);
        let set = RoamDb::open(&path).unwrap().load_records().unwrap();
        assert!(set.records.is_empty());
    }

    #[test]
    fn missing_database_fails_to_open() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope.db");

        let err = RoamDb::open(&missing).err().expect("open should fail");
        assert!(matches!(err, DataSourceError::Open { .. }));
        assert!(!missing.exists(), "read-only open must not create the file");
    }

    #[test]
    fn missing_nodes_table_fails_to_query() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("empty.db");
        Connection::open(&path).unwrap().execute_batch("CREATE TABLE other (x);").unwrap();

        let err = RoamDb::open(&path).unwrap().load_records().unwrap_err();
        assert!(matches!(err, DataSourceError::Query(_)));
    }
}
