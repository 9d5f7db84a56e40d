//! Age Labeling
//!
//! Converts measurement timestamps into fractional ages in months.

use chrono::{DateTime, Datelike, Utc};

/// Days per month used for the fractional part. A fixed approximation,
/// not calendar-accurate.
const DAYS_PER_MONTH: f64 = 30.0;

/// Fractional age in months at `at` for a child born on `birth`.
///
/// Whole months are counted calendar-wise (year and month components),
/// then the day-of-month difference is folded in as `days / 30`. The
/// result is not clamped: a measurement before birth yields a negative
/// age, and ages past the reference table's 60-month ceiling pass
/// through unchanged.
pub fn age_in_months(birth: chrono::NaiveDate, at: DateTime<Utc>) -> f64 {
    let date = at.date_naive();
    let whole_months =
        (date.year() - birth.year()) * 12 + (date.month() as i32 - birth.month() as i32);
    let day_diff = date.day() as i32 - birth.day() as i32;
    whole_months as f64 + day_diff as f64 / DAYS_PER_MONTH
}

/// Months elapsed since `first`, for the relative timeline used when no
/// birth date is available. Not comparable with [`age_in_months`] output.
pub fn months_since(first: DateTime<Utc>, at: DateTime<Utc>) -> f64 {
    (at - first).num_seconds() as f64 / (86_400.0 * DAYS_PER_MONTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn instant(y: i32, m: u32, d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
    }

    #[test]
    fn six_weeks_is_about_one_and_a_half_months() {
        let age = age_in_months(date(2024, 1, 1), instant(2024, 2, 15));
        assert!((age - (1.0 + 14.0 / 30.0)).abs() < 1e-9);
        assert!((age - 1.47).abs() < 0.01);
    }

    #[test]
    fn birth_day_is_zero() {
        assert_eq!(age_in_months(date(2024, 3, 10), instant(2024, 3, 10)), 0.0);
    }

    #[test]
    fn measurement_before_birth_goes_negative() {
        let age = age_in_months(date(2024, 3, 10), instant(2024, 2, 10));
        assert!(age < 0.0);
    }

    #[test]
    fn non_decreasing_for_increasing_timestamps() {
        let birth = date(2024, 1, 15);
        let instants = [
            instant(2024, 1, 15),
            instant(2024, 1, 31),
            instant(2024, 2, 1),
            instant(2024, 2, 14),
            instant(2024, 6, 2),
            instant(2025, 1, 15),
            instant(2029, 3, 1),
        ];
        let ages: Vec<f64> = instants
            .iter()
            .map(|at| age_in_months(birth, *at))
            .collect();
        for pair in ages.windows(2) {
            assert!(pair[1] >= pair[0], "ages regressed: {:?}", ages);
        }
        assert!(ages.iter().all(|a| *a >= 0.0));
    }

    #[test]
    fn ages_beyond_table_pass_through() {
        let age = age_in_months(date(2019, 1, 1), instant(2025, 1, 1));
        assert!((age - 72.0).abs() < 1e-9);
    }

    #[test]
    fn relative_timeline_counts_from_first_measurement() {
        let first = instant(2024, 1, 1);
        assert_eq!(months_since(first, first), 0.0);

        let later = instant(2024, 1, 16);
        assert!((months_since(first, later) - 0.5).abs() < 1e-9);

        let month_out = first + chrono::Duration::days(30);
        assert!((months_since(first, month_out) - 1.0).abs() < 1e-9);
    }
}
