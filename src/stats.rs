//! Class-wide statistics
//!
//! Aggregates the full current record set on demand. The empty-store policy
//! is fixed: `summarize` always returns a summary; `count = 0` with no top
//! performer is how "no students yet" reads, rather than a separate signal.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::grade::Grade;
use crate::record::{round2, StudentRecord};
use crate::store::{row_to_record, RecordStore, COLUMNS};
use crate::Result;

/// Summary of the whole class at a point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassSummary {
    /// Number of stored records (may be 0).
    pub count: u64,
    /// Mean of `percentage` across all records, rounded to 2 decimals.
    /// Reported as 0.0 for an empty store.
    pub average_percentage: f64,
    /// Count per observed grade, best band first. Grades with zero
    /// occurrences are absent, not present with value 0.
    pub grade_distribution: BTreeMap<Grade, u64>,
    /// Record with the maximum `percentage`; ties broken by `student_id`
    /// ascending. `None` when the store is empty.
    pub top_performer: Option<StudentRecord>,
}

impl RecordStore {
    /// Compute count, class average, grade histogram, and top performer
    /// over the full current record set.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Sqlite`] on storage failure.
    pub fn summarize(&self) -> Result<ClassSummary> {
        let conn = self.connect()?;

        let count: u64 = conn.query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        if count == 0 {
            return Ok(ClassSummary {
                count: 0,
                average_percentage: 0.0,
                grade_distribution: BTreeMap::new(),
                top_performer: None,
            });
        }

        let average: f64 =
            conn.query_row("SELECT AVG(percentage) FROM students", [], |row| row.get(0))?;

        let mut stmt = conn.prepare("SELECT grade, COUNT(*) FROM students GROUP BY grade")?;
        let grade_distribution = stmt
            .query_map([], |row| Ok((row.get::<_, Grade>(0)?, row.get::<_, u64>(1)?)))?
            .collect::<rusqlite::Result<BTreeMap<_, _>>>()?;

        let top_performer = conn.query_row(
            &format!(
                "SELECT {COLUMNS} FROM students \
                 ORDER BY percentage DESC, student_id ASC LIMIT 1"
            ),
            [],
            row_to_record,
        )?;

        Ok(ClassSummary {
            count,
            average_percentage: round2(average),
            grade_distribution,
            top_performer: Some(top_performer),
        })
    }
}
