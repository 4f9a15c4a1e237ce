//! Legacy flat-file migration
//!
//! One-shot import of the legacy comma-delimited record file into the
//! relational store, run at startup when the file is present. The legacy
//! rows already carry their derived fields (`Total`, `Percentage`, `Grade`),
//! which are trusted and not recomputed. Import is best-effort: rows that
//! fail to parse or validate are skipped and counted, never fatal. After
//! processing, the source file is moved to a timestamped archive so a second
//! run finds nothing to do.
//!
//! An unexpected failure mid-migration aborts the import without failing
//! startup; the outcome records how far it got.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::grade::Grade;
use crate::record::{Marks, StudentRecord};
use crate::store::RecordStore;
use crate::Result;

/// What the migrator did at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// No legacy file was present; nothing to import.
    NoLegacyFile,
    /// The legacy file was processed and archived.
    Migrated {
        /// Rows imported into the store (upsert, last writer wins).
        imported: usize,
        /// Rows skipped because they failed to parse or validate.
        skipped: usize,
        /// Where the source file was archived.
        archived_to: PathBuf,
    },
    /// Migration stopped on an unexpected error. Startup continues; the
    /// legacy file may remain in place with some rows already imported.
    Aborted {
        /// Rows imported before the failure.
        imported: usize,
        /// Description of the failure.
        reason: String,
    },
}

impl MigrationOutcome {
    /// True when every row of a processed legacy file was imported.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Migrated { skipped: 0, .. })
    }
}

/// One data row of the legacy file, as written by the flat-file variant.
///
/// Derived columns are trusted; the legacy format carries no email or
/// creation date.
#[derive(Debug, Deserialize)]
struct LegacyRow {
    #[serde(rename = "Student_ID")]
    student_id: String,
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Math")]
    math: f64,
    #[serde(rename = "Science")]
    science: f64,
    #[serde(rename = "English")]
    english: f64,
    #[serde(rename = "Social_Studies")]
    social_studies: f64,
    #[serde(rename = "Computer")]
    computer: f64,
    #[serde(rename = "Total")]
    total: f64,
    #[serde(rename = "Percentage")]
    percentage: f64,
    #[serde(rename = "Grade")]
    grade: String,
}

impl LegacyRow {
    /// Convert to a store record, stamping `created_date` now (the legacy
    /// format has no date column). Fails on an unknown grade label.
    fn into_record(self) -> std::result::Result<StudentRecord, String> {
        let grade: Grade = self.grade.parse()?;
        Ok(StudentRecord {
            student_id: self.student_id,
            name: self.name,
            marks: Marks {
                math: self.math,
                science: self.science,
                english: self.english,
                social_studies: self.social_studies,
                computer: self.computer,
            },
            total: self.total,
            percentage: self.percentage,
            grade,
            email: None,
            created_date: Utc::now().date_naive(),
        })
    }
}

/// Import the legacy file at `legacy_csv` into `store`, then archive it.
///
/// Never fails startup: every error path collapses into the returned
/// [`MigrationOutcome`]. Re-running after the file was archived is a no-op.
pub fn run(store: &RecordStore, legacy_csv: &Path) -> MigrationOutcome {
    if !legacy_csv.exists() {
        return MigrationOutcome::NoLegacyFile;
    }

    let mut imported = 0;
    match import_rows(store, legacy_csv, &mut imported) {
        Ok(skipped) => match archive(store, legacy_csv) {
            Ok(archived_to) => {
                info!(
                    imported,
                    skipped,
                    archive = %archived_to.display(),
                    "legacy migration finished"
                );
                MigrationOutcome::Migrated {
                    imported,
                    skipped,
                    archived_to,
                }
            }
            Err(e) => {
                warn!(imported, error = %e, "legacy file imported but could not be archived");
                MigrationOutcome::Aborted {
                    imported,
                    reason: format!("archive failed: {e}"),
                }
            }
        },
        Err(e) => {
            warn!(imported, error = %e, "legacy migration aborted");
            MigrationOutcome::Aborted {
                imported,
                reason: e.to_string(),
            }
        }
    }
}

/// Upsert every parseable row; returns the skipped-row count.
fn import_rows(store: &RecordStore, legacy_csv: &Path, imported: &mut usize) -> Result<usize> {
    let mut reader = csv::Reader::from_path(legacy_csv)?;
    let mut skipped = 0;

    for row in reader.deserialize::<LegacyRow>() {
        let record = match row.map_err(|e| e.to_string()).and_then(LegacyRow::into_record) {
            Ok(record) => record,
            Err(e) => {
                debug!(error = %e, "skipping unparseable legacy row");
                skipped += 1;
                continue;
            }
        };
        match store.upsert(&record) {
            Ok(()) => *imported += 1,
            Err(crate::Error::Validation(e)) => {
                debug!(student_id = %record.student_id, error = %e, "skipping invalid legacy row");
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }
    Ok(skipped)
}

/// Move the processed file into the backup directory with a timestamp suffix.
fn archive(store: &RecordStore, legacy_csv: &Path) -> Result<PathBuf> {
    let stamp = Utc::now().format("%Y%m%d_%H%M%S");
    let archived_to = store
        .backup_dir()
        .join(format!("students_migrated_{stamp}.csv"));
    fs::rename(legacy_csv, &archived_to)?;
    Ok(archived_to)
}
