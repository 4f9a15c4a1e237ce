//! Student record types
//!
//! `NewStudent` is the caller-supplied input to [`RecordStore::add`];
//! `StudentRecord` is the fully-derived row as persisted. Derived fields
//! (`total`, `percentage`, `grade`) are computed exactly once at write time
//! and never re-validated on read.
//!
//! [`RecordStore::add`]: crate::store::RecordStore::add

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::grade::Grade;
use crate::{Error, Result};

/// Round to two decimal places (percentage precision in the stored row).
#[must_use]
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// The five subject scores, each constrained to [0, 100].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marks {
    /// Mathematics score
    pub math: f64,
    /// Science score
    pub science: f64,
    /// English score
    pub english: f64,
    /// Social studies score
    pub social_studies: f64,
    /// Computer science score
    pub computer: f64,
}

impl Marks {
    /// Create marks from the five subject scores.
    #[must_use]
    pub const fn new(
        math: f64,
        science: f64,
        english: f64,
        social_studies: f64,
        computer: f64,
    ) -> Self {
        Self {
            math,
            science,
            english,
            social_studies,
            computer,
        }
    }

    /// Sum of the five scores, range [0, 500] for valid marks.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.math + self.science + self.english + self.social_studies + self.computer
    }

    /// Mean of the five scores, rounded to 2 decimals.
    #[must_use]
    pub fn percentage(&self) -> f64 {
        round2(self.total() / 5.0)
    }

    /// Check every score lies in [0, 100].
    ///
    /// NaN fails the range check and is rejected like any other
    /// out-of-range value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] naming the first offending subject.
    pub fn validate(&self) -> Result<()> {
        let subjects = [
            ("math", self.math),
            ("science", self.science),
            ("english", self.english),
            ("social_studies", self.social_studies),
            ("computer", self.computer),
        ];
        for (subject, score) in subjects {
            if !(0.0..=100.0).contains(&score) {
                return Err(Error::Validation(format!(
                    "{subject} score {score} outside [0, 100]"
                )));
            }
        }
        Ok(())
    }
}

/// Caller-supplied fields for a new student.
///
/// Derived fields and `created_date` are computed by the store; caller
/// timestamps are not accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewStudent {
    /// Unique student identifier (primary key, immutable after creation)
    pub student_id: String,
    /// Student name (non-empty)
    pub name: String,
    /// The five subject scores
    pub marks: Marks,
    /// Optional contact address; no format validation enforced
    pub email: Option<String>,
}

impl NewStudent {
    /// Create input for a new student without an email address.
    #[must_use]
    pub fn new(student_id: impl Into<String>, name: impl Into<String>, marks: Marks) -> Self {
        Self {
            student_id: student_id.into(),
            name: name.into(),
            marks,
            email: None,
        }
    }

    /// Attach an email address.
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// One fully-derived row of the `students` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRecord {
    /// Unique student identifier (primary key)
    pub student_id: String,
    /// Student name
    pub name: String,
    /// The five subject scores
    pub marks: Marks,
    /// Sum of the five scores, invariant `total = sum(marks)`
    pub total: f64,
    /// Invariant `percentage = total / 5`, rounded to 2 decimals
    pub percentage: f64,
    /// Invariant `grade = Grade::from_percentage(percentage)`
    pub grade: Grade,
    /// Optional contact address
    pub email: Option<String>,
    /// Date of insertion, stamped once at creation time
    pub created_date: NaiveDate,
}

impl StudentRecord {
    /// Derive a full record from validated input, stamping `created_date`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if a score is outside [0, 100] or the
    /// trimmed `student_id` or `name` is empty.
    pub fn derive(input: NewStudent, created_date: NaiveDate) -> Result<Self> {
        if input.student_id.trim().is_empty() {
            return Err(Error::Validation("student_id must not be empty".to_string()));
        }
        if input.name.trim().is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }
        input.marks.validate()?;

        let total = input.marks.total();
        let percentage = input.marks.percentage();
        Ok(Self {
            student_id: input.student_id,
            name: input.name,
            marks: input.marks,
            total,
            percentage,
            grade: Grade::from_percentage(percentage),
            email: input.email,
            created_date,
        })
    }
}
