//! Posting-date arithmetic
//!
//! The monthly clearing run posts into the period it reconciles: when the
//! run happens on the first business day after a month's ultimo, postings
//! carry the previous month's last business day. All functions are pure
//! over a caller-supplied "today" and holiday list, so the calculation is
//! fully deterministic and testable.

use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// Whether a day is a business day (Mon-Fri and not a holiday)
pub fn is_business_day(day: NaiveDate, holidays: &[NaiveDate]) -> bool {
    !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) && !holidays.contains(&day)
}

/// First day of the month containing `day`
pub fn start_of_month(day: NaiveDate) -> NaiveDate {
    day.with_day(1).unwrap_or(day)
}

/// First business day of the month containing `day`
pub fn first_business_day(day: NaiveDate, holidays: &[NaiveDate]) -> NaiveDate {
    let mut current = start_of_month(day);
    while !is_business_day(current, holidays) {
        current += Duration::days(1);
    }
    current
}

/// The posting date for a clearing run executed on `today`
///
/// On the first business day of a month ("ultimo + 1") the clearing date
/// is the previous month's last business day, so the postings land in the
/// period being reconciled. On any other day it is simply `today`.
pub fn clearing_date(today: NaiveDate, holidays: &[NaiveDate]) -> NaiveDate {
    if first_business_day(today, holidays) != today {
        return today;
    }

    let mut previous = start_of_month(today) - Duration::days(1);
    while !is_business_day(previous, holidays) {
        previous -= Duration::days(1);
    }
    previous
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[rstest]
    #[case::monday(2026, 2, 2, true)]
    #[case::friday(2026, 2, 6, true)]
    #[case::saturday(2026, 2, 7, false)]
    #[case::sunday(2026, 2, 8, false)]
    fn test_weekends_are_not_business_days(
        #[case] y: i32,
        #[case] m: u32,
        #[case] d: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(is_business_day(day(y, m, d), &[]), expected);
    }

    #[test]
    fn test_holidays_are_not_business_days() {
        let holidays = vec![day(2026, 1, 1)];
        assert!(!is_business_day(day(2026, 1, 1), &holidays));
        assert!(is_business_day(day(2026, 1, 2), &holidays));
    }

    #[test]
    fn test_first_business_day_skips_weekend() {
        // 2026-02-01 is a Sunday
        assert_eq!(first_business_day(day(2026, 2, 15), &[]), day(2026, 2, 2));
    }

    #[test]
    fn test_first_business_day_skips_holidays() {
        // 2026-01-01 is a Thursday and a holiday
        let holidays = vec![day(2026, 1, 1)];
        assert_eq!(
            first_business_day(day(2026, 1, 20), &holidays),
            day(2026, 1, 2)
        );
    }

    #[test]
    fn test_mid_month_run_posts_on_the_same_day() {
        assert_eq!(clearing_date(day(2026, 2, 17), &[]), day(2026, 2, 17));
    }

    #[test]
    fn test_ultimo_plus_one_posts_into_previous_month() {
        // 2026-02-02 (Monday) is the first business day of February;
        // the previous month's last business day is Friday 2026-01-30
        assert_eq!(clearing_date(day(2026, 2, 2), &[]), day(2026, 1, 30));
    }

    #[test]
    fn test_ultimo_plus_one_respects_holidays_on_both_sides() {
        // New Year's Day pushes the first business day to 2026-01-02, and
        // the year-end holiday pushes the clearing date back to Dec 30
        let holidays = vec![day(2025, 12, 31), day(2026, 1, 1)];
        assert_eq!(
            clearing_date(day(2026, 1, 2), &holidays),
            day(2025, 12, 30)
        );
    }

    #[test]
    fn test_second_business_day_is_not_ultimo_plus_one() {
        assert_eq!(clearing_date(day(2026, 2, 3), &[]), day(2026, 2, 3));
    }
}
