//! Lookup, search, and filter queries
//!
//! Read-side companion to the record store. Semantics fixed here:
//!
//! - ID lookup is exact match.
//! - Name search is an ASCII case-insensitive substring match (SQLite
//!   `LIKE`), results in name order.
//! - Grade filtering ranks by `percentage` descending, ties broken by
//!   `student_id` ascending, so result order is a documented total order.

use rusqlite::params;

use crate::grade::Grade;
use crate::record::StudentRecord;
use crate::store::{row_to_record, RecordStore, COLUMNS};
use crate::Result;

/// Filter argument for [`RecordStore::filter_by_grade`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GradeFilter {
    /// Every record, still ranked by percentage.
    All,
    /// Only records whose grade equals the given label.
    Only(Grade),
}

impl From<Grade> for GradeFilter {
    fn from(grade: Grade) -> Self {
        Self::Only(grade)
    }
}

/// Escape `%`, `_`, and the escape character itself for a LIKE pattern.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl RecordStore {
    /// Look up a student by exact ID. Alias for [`RecordStore::get`].
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Sqlite`] on storage failure.
    pub fn find_by_id(&self, student_id: &str) -> Result<Option<StudentRecord>> {
        self.get(student_id)
    }

    /// All students whose name contains `needle`, ASCII case-insensitively.
    ///
    /// Possibly empty; ordered by name ascending. LIKE metacharacters in
    /// the needle are matched literally.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Sqlite`] on storage failure.
    pub fn find_by_name(&self, needle: &str) -> Result<Vec<StudentRecord>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {COLUMNS} FROM students \
             WHERE name LIKE ?1 ESCAPE '\\' ORDER BY name"
        ))?;
        let pattern = format!("%{}%", escape_like(needle));
        let rows = stmt
            .query_map(params![pattern], row_to_record)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    }

    /// Students matching the grade filter, ranked by `percentage`
    /// descending with ties broken by `student_id` ascending.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Sqlite`] on storage failure.
    pub fn filter_by_grade(&self, filter: GradeFilter) -> Result<Vec<StudentRecord>> {
        let conn = self.connect()?;
        let rows = match filter {
            GradeFilter::All => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM students \
                     ORDER BY percentage DESC, student_id ASC"
                ))?;
                let rows = stmt
                    .query_map([], row_to_record)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
            GradeFilter::Only(grade) => {
                let mut stmt = conn.prepare(&format!(
                    "SELECT {COLUMNS} FROM students WHERE grade = ?1 \
                     ORDER BY percentage DESC, student_id ASC"
                ))?;
                let rows = stmt
                    .query_map(params![grade], row_to_record)?
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                rows
            }
        };
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_a\\b"), "50\\%\\_a\\\\b");
    }

    #[test]
    fn test_grade_filter_from_grade() {
        assert_eq!(GradeFilter::from(Grade::B), GradeFilter::Only(Grade::B));
    }
}
