//! Property-based tests for grade derivation.

use gradebook_db::{Grade, Marks};
use proptest::prelude::*;

/// Numeric rank of a grade band, best = highest.
fn band_rank(grade: Grade) -> u8 {
    match grade {
        Grade::F => 0,
        Grade::D => 1,
        Grade::C => 2,
        Grade::B => 3,
        Grade::A => 4,
        Grade::APlus => 5,
    }
}

proptest! {
    /// Repeated calls on the same input always agree.
    #[test]
    fn grade_is_stable(p in 0.0f64..=100.0) {
        prop_assert_eq!(Grade::from_percentage(p), Grade::from_percentage(p));
    }

    /// The band never decreases as the percentage increases.
    #[test]
    fn grade_is_monotonic(a in 0.0f64..=100.0, b in 0.0f64..=100.0) {
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            band_rank(Grade::from_percentage(lo)) <= band_rank(Grade::from_percentage(hi))
        );
    }

    /// Derived totals and percentages follow their defining formulas for
    /// any valid marks.
    #[test]
    fn derivation_matches_formula(
        math in 0.0f64..=100.0,
        science in 0.0f64..=100.0,
        english in 0.0f64..=100.0,
        social in 0.0f64..=100.0,
        computer in 0.0f64..=100.0,
    ) {
        let marks = Marks::new(math, science, english, social, computer);
        prop_assert!(marks.validate().is_ok());

        let total = marks.total();
        prop_assert_eq!(total, math + science + english + social + computer);
        prop_assert!((0.0..=500.0).contains(&total));

        let percentage = marks.percentage();
        prop_assert!((0.0..=100.0).contains(&percentage));
        // Rounded to 2 decimals: scaling by 100 yields an integer.
        prop_assert!(((percentage * 100.0).round() - percentage * 100.0).abs() < 1e-9);
        prop_assert!((percentage - total / 5.0).abs() <= 0.005);
    }

    /// Any score outside [0, 100] fails validation.
    #[test]
    fn out_of_range_score_rejected(excess in 1.0f64..=1000.0) {
        let high = Marks::new(100.0 + excess, 50.0, 50.0, 50.0, 50.0);
        prop_assert!(high.validate().is_err());

        let low = Marks::new(50.0, -excess, 50.0, 50.0, 50.0);
        prop_assert!(low.validate().is_err());
    }
}

#[test]
fn band_boundaries_exact() {
    // 89.99 sits below the A+ boundary; 90.00 is on it.
    assert_eq!(Grade::from_percentage(89.99), Grade::A);
    assert_eq!(Grade::from_percentage(90.00), Grade::APlus);
}
