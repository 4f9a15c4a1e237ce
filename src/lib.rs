//! # gradebook-db: Embedded Student Gradebook Store
//!
//! SQLite-backed persistence for per-student academic records with derived
//! summary metrics (total, percentage, letter grade), lookup/search/filter
//! queries, class-wide statistics, and a one-time migration from the legacy
//! flat-file format.
//!
//! The interactive front ends, report rendering, and mail delivery that sit
//! on top of this store are external collaborators; this crate is the
//! persistence-and-query core only.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use gradebook_db::{Gradebook, Marks, NewStudent};
//!
//! let gradebook = Gradebook::open("student_records")?;
//!
//! let record = gradebook.store().add(NewStudent::new(
//!     "S1",
//!     "Priya",
//!     Marks::new(90.0, 85.0, 80.0, 75.0, 70.0),
//! ))?;
//! assert_eq!(record.grade.to_string(), "A");
//!
//! let summary = gradebook.store().summarize()?;
//! println!("class average: {}", summary.average_percentage);
//! # Ok::<(), gradebook_db::Error>(())
//! ```
//!
//! ## Concurrency Model
//!
//! Single-threaded and synchronous. Each operation opens, uses, and releases
//! its own connection; nothing is held across operations. One process at a
//! time is assumed - concurrent writers from separate processes are outside
//! the store's consistency guarantees.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod grade;
pub mod migrate;
pub mod query;
pub mod record;
pub mod stats;
pub mod store;

use std::path::{Path, PathBuf};

use tracing::info;

pub use error::{Error, Result};
pub use grade::Grade;
pub use migrate::MigrationOutcome;
pub use query::GradeFilter;
pub use record::{Marks, NewStudent, StudentRecord};
pub use stats::ClassSummary;
pub use store::RecordStore;

/// Default database file name under the data directory.
const DB_FILE: &str = "students.db";
/// Legacy flat-file name checked for at startup.
const LEGACY_FILE: &str = "students.csv";
/// Backup directory name under the data directory.
const BACKUP_DIR: &str = "backups";

/// Top-level handle: an opened store plus the startup migration outcome.
#[derive(Debug)]
pub struct Gradebook {
    store: RecordStore,
    migration: MigrationOutcome,
}

impl Gradebook {
    /// Open the gradebook under `data_dir` with default file names.
    ///
    /// Creates the directory tree if needed, ensures the schema, and runs
    /// the legacy migration when `students.csv` is present. Migration
    /// failure is non-fatal; inspect [`Gradebook::migration`] for the
    /// outcome.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directories cannot be created or
    /// [`Error::Sqlite`] if the database cannot be opened.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(data_dir).build()
    }

    /// Create a builder to override file locations.
    #[must_use]
    pub fn builder(data_dir: impl Into<PathBuf>) -> GradebookBuilder {
        GradebookBuilder {
            data_dir: data_dir.into(),
            legacy_csv: None,
            backup_dir: None,
        }
    }

    /// The underlying record store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore {
        &self.store
    }

    /// What the legacy migrator did at startup.
    #[must_use]
    pub const fn migration(&self) -> &MigrationOutcome {
        &self.migration
    }
}

/// Builder for [`Gradebook`] with overridable file locations.
#[derive(Debug)]
pub struct GradebookBuilder {
    data_dir: PathBuf,
    legacy_csv: Option<PathBuf>,
    backup_dir: Option<PathBuf>,
}

impl GradebookBuilder {
    /// Override the legacy flat-file location (default
    /// `<data_dir>/students.csv`).
    #[must_use]
    pub fn legacy_csv(mut self, path: impl Into<PathBuf>) -> Self {
        self.legacy_csv = Some(path.into());
        self
    }

    /// Override the backup directory (default `<data_dir>/backups`).
    #[must_use]
    pub fn backup_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.backup_dir = Some(path.into());
        self
    }

    /// Open the store and run the startup migration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the directories cannot be created or
    /// [`Error::Sqlite`] if the database cannot be opened.
    pub fn build(self) -> Result<Gradebook> {
        std::fs::create_dir_all(&self.data_dir)?;
        let backup_dir = self
            .backup_dir
            .unwrap_or_else(|| self.data_dir.join(BACKUP_DIR));
        let legacy_csv = self
            .legacy_csv
            .unwrap_or_else(|| default_legacy_path(&self.data_dir));

        let store = RecordStore::open(self.data_dir.join(DB_FILE), backup_dir)?;
        let migration = migrate::run(&store, &legacy_csv);
        info!(
            db = %store.db_path().display(),
            migration = ?migration,
            "gradebook opened"
        );
        Ok(Gradebook { store, migration })
    }
}

/// Default legacy flat-file path under `data_dir`, as checked at startup.
#[must_use]
pub fn default_legacy_path(data_dir: &Path) -> PathBuf {
    data_dir.join(LEGACY_FILE)
}
