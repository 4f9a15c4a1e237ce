//! Record store - durable keyed storage over SQLite
//!
//! Single `students` table keyed by `student_id`. Every operation acquires
//! its own connection, performs one unit of work, and releases the handle on
//! every exit path; no handle outlives the operation that opened it. The
//! store is written for exactly one process at a time - no locking is
//! layered on top of SQLite, and concurrent writers from separate processes
//! are outside the consistency guarantees.
//!
//! Write-time invariants (`total = sum(marks)`, `percentage = total / 5`,
//! `grade` from the band table) are enforced by [`RecordStore::add`] and
//! [`RecordStore::upsert`]; reads trust the stored row.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use tracing::{debug, info};

use crate::record::{NewStudent, StudentRecord};
use crate::{Error, Result};

/// Column list shared by every row-returning query, in `row_to_record` order.
pub(crate) const COLUMNS: &str = "student_id, name, math, science, english, \
     social_studies, computer, total, percentage, grade, email, created_date";

/// Durable store for student records.
#[derive(Debug, Clone)]
pub struct RecordStore {
    db_path: PathBuf,
    backup_dir: PathBuf,
}

impl RecordStore {
    /// Open a store at `db_path`, ensuring the schema exists.
    ///
    /// Idempotent: safe to call on every startup. The backup directory is
    /// created if missing; snapshots and migration archives land there.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the backup directory cannot be created, or
    /// [`Error::Sqlite`] if the database file cannot be opened.
    pub fn open(db_path: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Result<Self> {
        let store = Self {
            db_path: db_path.into(),
            backup_dir: backup_dir.into(),
        };
        fs::create_dir_all(&store.backup_dir)?;
        store.ensure_schema()?;
        Ok(store)
    }

    /// Path of the SQLite database file.
    #[must_use]
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    /// Directory holding snapshots and the archived legacy file.
    #[must_use]
    pub fn backup_dir(&self) -> &Path {
        &self.backup_dir
    }

    /// Open a connection scoped to a single operation.
    pub(crate) fn connect(&self) -> Result<Connection> {
        Ok(Connection::open(&self.db_path)?)
    }

    /// Create the `students` table if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sqlite`] if the DDL cannot be executed.
    pub fn ensure_schema(&self) -> Result<()> {
        let conn = self.connect()?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS students (
                student_id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                math REAL NOT NULL,
                science REAL NOT NULL,
                english REAL NOT NULL,
                social_studies REAL NOT NULL,
                computer REAL NOT NULL,
                total REAL NOT NULL,
                percentage REAL NOT NULL,
                grade TEXT NOT NULL,
                email TEXT,
                created_date TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Add a new student, deriving `total`, `percentage`, and `grade` and
    /// stamping `created_date` at insertion time.
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if a score is outside [0, 100] or the ID or
    ///   name is empty; the store is unchanged.
    /// - [`Error::DuplicateKey`] if `student_id` is already present; the
    ///   stored record is unchanged.
    pub fn add(&self, input: NewStudent) -> Result<StudentRecord> {
        let record = StudentRecord::derive(input, Utc::now().date_naive())?;
        let conn = self.connect()?;
        let inserted = conn.execute(
            "INSERT INTO students (student_id, name, math, science, english, \
             social_studies, computer, total, percentage, grade, email, created_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                record.student_id,
                record.name,
                record.marks.math,
                record.marks.science,
                record.marks.english,
                record.marks.social_studies,
                record.marks.computer,
                record.total,
                record.percentage,
                record.grade,
                record.email,
                record.created_date,
            ],
        );
        match inserted {
            Ok(_) => {
                debug!(student_id = %record.student_id, grade = %record.grade, "added student");
                Ok(record)
            }
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                Err(Error::DuplicateKey(record.student_id))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Insert a fully-derived record, replacing any existing row with the
    /// same `student_id`.
    ///
    /// Overwrite path for the legacy migrator only: last writer wins, no
    /// reconciliation. Ordinary callers use [`RecordStore::add`], which
    /// rejects duplicates instead of silently replacing them. Derived fields
    /// are trusted as supplied; field domains are still validated.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a score is outside [0, 100] or the
    /// ID or name is empty, or [`Error::Sqlite`] on storage failure.
    pub fn upsert(&self, record: &StudentRecord) -> Result<()> {
        if record.student_id.trim().is_empty() {
            return Err(Error::Validation("student_id must not be empty".to_string()));
        }
        if record.name.trim().is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }
        record.marks.validate()?;

        let conn = self.connect()?;
        conn.execute(
            "INSERT OR REPLACE INTO students (student_id, name, math, science, english, \
             social_studies, computer, total, percentage, grade, email, created_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
            params![
                record.student_id,
                record.name,
                record.marks.math,
                record.marks.science,
                record.marks.english,
                record.marks.social_studies,
                record.marks.computer,
                record.total,
                record.percentage,
                record.grade,
                record.email,
                record.created_date,
            ],
        )?;
        debug!(student_id = %record.student_id, "upserted student");
        Ok(())
    }

    /// Look up a student by exact ID.
    ///
    /// Absence is a normal result, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sqlite`] on storage failure.
    pub fn get(&self, student_id: &str) -> Result<Option<StudentRecord>> {
        let conn = self.connect()?;
        let record = conn
            .query_row(
                &format!("SELECT {COLUMNS} FROM students WHERE student_id = ?1"),
                params![student_id],
                row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Every record, ordered by `name` ascending.
    ///
    /// Ordering is case-sensitive (SQLite BINARY collation): all uppercase
    /// letters sort before any lowercase letter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sqlite`] on storage failure.
    pub fn list_all(&self) -> Result<Vec<StudentRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM students ORDER BY name"))?;
        let rows = stmt
            .query_map([], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Number of records currently stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Sqlite`] on storage failure.
    pub fn count(&self) -> Result<u64> {
        let conn = self.connect()?;
        let count: u64 = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Copy the database file to a timestamped backup.
    ///
    /// The copy is not transactional with respect to writers in other
    /// processes; it reflects whatever atomicity the filesystem copy itself
    /// provides.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the database file or backup directory is
    /// unavailable.
    pub fn snapshot(&self) -> Result<PathBuf> {
        let stamp = Utc::now().format("%Y%m%d_%H%M%S");
        let backup_path = self.backup_dir.join(format!("students_backup_{stamp}.db"));
        fs::copy(&self.db_path, &backup_path)?;
        info!(path = %backup_path.display(), "snapshot created");
        Ok(backup_path)
    }
}

/// Map one row (in [`COLUMNS`] order) to a record.
pub(crate) fn row_to_record(row: &Row<'_>) -> rusqlite::Result<StudentRecord> {
    Ok(StudentRecord {
        student_id: row.get(0)?,
        name: row.get(1)?,
        marks: crate::record::Marks {
            math: row.get(2)?,
            science: row.get(3)?,
            english: row.get(4)?,
            social_studies: row.get(5)?,
            computer: row.get(6)?,
        },
        total: row.get(7)?,
        percentage: row.get(8)?,
        grade: row.get(9)?,
        email: row.get(10)?,
        created_date: row.get(11)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Marks;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> RecordStore {
        RecordStore::open(dir.path().join("students.db"), dir.path().join("backups")).unwrap()
    }

    fn marks() -> Marks {
        Marks::new(90.0, 85.0, 80.0, 75.0, 70.0)
    }

    #[test]
    fn test_ensure_schema_idempotent() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();
    }

    #[test]
    fn test_add_then_get_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let added = store.add(NewStudent::new("S1", "Priya", marks())).unwrap();
        let fetched = store.get("S1").unwrap().unwrap();
        assert_eq!(fetched, added);
        assert_eq!(fetched.total, 400.0);
        assert_eq!(fetched.percentage, 80.0);
    }

    #[test]
    fn test_get_absent_is_none() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(store.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_add_rejected_first_record_kept() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.add(NewStudent::new("S1", "Priya", marks())).unwrap();
        let err = store
            .add(NewStudent::new("S1", "Someone Else", marks()))
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateKey(ref id) if id == "S1"));
        assert_eq!(store.get("S1").unwrap().unwrap().name, "Priya");
    }

    #[test]
    fn test_invalid_score_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let bad = NewStudent::new("S1", "Priya", Marks::new(101.0, 85.0, 80.0, 75.0, 70.0));
        assert!(matches!(store.add(bad), Err(Error::Validation(_))));
        assert!(store.get("S1").unwrap().is_none());
    }

    #[test]
    fn test_upsert_replaces_existing_row() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let first = store.add(NewStudent::new("S1", "Priya", marks())).unwrap();
        let mut replacement = first.clone();
        replacement.name = "Priya R".to_string();
        store.upsert(&replacement).unwrap();
        assert_eq!(store.get("S1").unwrap().unwrap().name, "Priya R");
    }

    #[test]
    fn test_list_all_ordered_by_name() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.add(NewStudent::new("S2", "Carol", marks())).unwrap();
        store.add(NewStudent::new("S1", "Alice", marks())).unwrap();
        store.add(NewStudent::new("S3", "Bob", marks())).unwrap();

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn test_list_all_case_sensitive_collation() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.add(NewStudent::new("S1", "alice", marks())).unwrap();
        store.add(NewStudent::new("S2", "Bob", marks())).unwrap();

        let names: Vec<String> = store
            .list_all()
            .unwrap()
            .into_iter()
            .map(|r| r.name)
            .collect();
        // BINARY collation: uppercase sorts before lowercase.
        assert_eq!(names, ["Bob", "alice"]);
    }

    #[test]
    fn test_snapshot_fails_with_io_error_when_database_missing() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        std::fs::remove_file(store.db_path()).unwrap();
        assert!(matches!(store.snapshot(), Err(Error::Io(_))));
    }

    #[test]
    fn test_snapshot_copies_database() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        store.add(NewStudent::new("S1", "Priya", marks())).unwrap();

        let backup = store.snapshot().unwrap();
        assert!(backup.exists());
        assert!(backup.starts_with(store.backup_dir()));

        // The copy is a complete database in its own right.
        let copy = RecordStore::open(&backup, dir.path().join("backups")).unwrap();
        assert_eq!(copy.count().unwrap(), 1);
    }
}
