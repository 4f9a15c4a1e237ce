//! Letter-grade bands
//!
//! Pure derivation from percentage to letter grade. The bands use inclusive
//! lower bounds with the highest matching band winning:
//!
//! | percentage >= | grade |
//! |---------------|-------|
//! | 90            | A+    |
//! | 80            | A     |
//! | 70            | B     |
//! | 60            | C     |
//! | 50            | D     |
//! | else          | F     |

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

/// Letter grade assigned to a percentage.
///
/// Ordering follows band order: `A+` sorts first, `F` last. This makes
/// `BTreeMap<Grade, u64>` distributions iterate best-to-worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    /// 90 and above
    #[serde(rename = "A+")]
    APlus,
    /// 80 to 89.99
    A,
    /// 70 to 79.99
    B,
    /// 60 to 69.99
    C,
    /// 50 to 59.99
    D,
    /// Below 50
    F,
}

impl Grade {
    /// All grades in band order, best first.
    pub const ALL: [Self; 6] = [Self::APlus, Self::A, Self::B, Self::C, Self::D, Self::F];

    /// Derive the grade for a percentage.
    ///
    /// Total function: every input maps to a band, including values outside
    /// [0, 100] (anything below 50, NaN included, falls through to `F`).
    #[must_use]
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            Self::APlus
        } else if percentage >= 80.0 {
            Self::A
        } else if percentage >= 70.0 {
            Self::B
        } else if percentage >= 60.0 {
            Self::C
        } else if percentage >= 50.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// The grade label as stored in the `students` table.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "A+" => Ok(Self::APlus),
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            "C" => Ok(Self::C),
            "D" => Ok(Self::D),
            "F" => Ok(Self::F),
            other => Err(format!("unknown grade label: {other}")),
        }
    }
}

impl ToSql for Grade {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for Grade {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_thresholds() {
        assert_eq!(Grade::from_percentage(100.0), Grade::APlus);
        assert_eq!(Grade::from_percentage(90.0), Grade::APlus);
        assert_eq!(Grade::from_percentage(89.99), Grade::A);
        assert_eq!(Grade::from_percentage(80.0), Grade::A);
        assert_eq!(Grade::from_percentage(70.0), Grade::B);
        assert_eq!(Grade::from_percentage(60.0), Grade::C);
        assert_eq!(Grade::from_percentage(50.0), Grade::D);
        assert_eq!(Grade::from_percentage(49.99), Grade::F);
        assert_eq!(Grade::from_percentage(0.0), Grade::F);
    }

    #[test]
    fn test_labels_round_trip() {
        for grade in Grade::ALL {
            assert_eq!(grade.as_str().parse::<Grade>().unwrap(), grade);
        }
        assert!("A-".parse::<Grade>().is_err());
        assert!("a+".parse::<Grade>().is_err());
    }

    #[test]
    fn test_band_order() {
        assert!(Grade::APlus < Grade::A);
        assert!(Grade::D < Grade::F);
    }

    #[test]
    fn test_serde_label() {
        let json = serde_json::to_string(&Grade::APlus).unwrap();
        assert_eq!(json, "\"A+\"");
    }
}
