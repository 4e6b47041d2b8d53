use chrono::{Datelike, Days, NaiveDate};

use crate::shared::core::errors::ApplicationError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const MAX_MINUTES_PER_DAY: i32 = 1440;
pub const MAX_YEAR: i32 = 9999;

/// Only four-digit years are accepted. chrono itself parses signed years far
/// beyond that, where day arithmetic overflows.
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate, ApplicationError> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT)
        .ok()
        .filter(|date| (0..=MAX_YEAR).contains(&date.year()))
        .ok_or_else(|| {
            ApplicationError::validation(format!("{field} must be a YYYY-MM-DD date, got '{raw}'"))
        })
}

pub fn parse_optional_date(
    field: &str,
    raw: Option<&str>,
) -> Result<Option<NaiveDate>, ApplicationError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => parse_date(field, value).map(Some),
        None => Ok(None),
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Rejects inverted windows before any query reaches storage.
pub fn ensure_window(
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> Result<(), ApplicationError> {
    match (from, to) {
        (Some(from), Some(to)) if from > to => Err(ApplicationError::validation(format!(
            "from ({}) must not be after to ({})",
            format_date(from),
            format_date(to)
        ))),
        _ => Ok(()),
    }
}

/// `min_minutes` is 1 for direct entry writes and 0 for grid cell updates.
pub fn ensure_minutes(minutes: i32, min_minutes: i32) -> Result<i32, ApplicationError> {
    if (min_minutes..=MAX_MINUTES_PER_DAY).contains(&minutes) {
        Ok(minutes)
    } else {
        Err(ApplicationError::validation(format!(
            "minutes must be between {min_minutes} and {MAX_MINUTES_PER_DAY}, got {minutes}"
        )))
    }
}

pub fn week_days(week_start: NaiveDate) -> Result<Vec<NaiveDate>, ApplicationError> {
    (0..7)
        .map(|offset| {
            week_start.checked_add_days(Days::new(offset)).ok_or_else(|| {
                ApplicationError::validation(format!(
                    "week starting {} runs past the last supported date",
                    format_date(week_start)
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod primitives_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn it_should_parse_iso_dates() {
        let date = parse_date("workDate", "2024-02-29").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
    }

    #[rstest]
    #[case("2023-02-29")]
    #[case("29-02-2024")]
    #[case("yesterday")]
    #[case("+262142-12-31")]
    #[case("-0001-01-01")]
    #[case("10000-01-01")]
    fn it_should_reject_malformed_dates(#[case] raw: &str) {
        let result = parse_date("workDate", raw);
        assert!(matches!(result, Err(ApplicationError::Validation(_))));
    }

    #[rstest]
    fn it_should_treat_blank_optional_dates_as_absent() {
        assert_eq!(parse_optional_date("from", Some("  ")).unwrap(), None);
        assert_eq!(parse_optional_date("from", None).unwrap(), None);
    }

    #[rstest]
    fn it_should_reject_an_inverted_window() {
        let from = NaiveDate::from_ymd_opt(2024, 3, 2);
        let to = NaiveDate::from_ymd_opt(2024, 3, 1);
        assert!(ensure_window(from, to).is_err());
        assert!(ensure_window(to, from).is_ok());
        assert!(ensure_window(from, None).is_ok());
    }

    #[rstest]
    #[case(1, 1, true)]
    #[case(1440, 1, true)]
    #[case(0, 1, false)]
    #[case(0, 0, true)]
    #[case(1441, 0, false)]
    #[case(-5, 0, false)]
    fn it_should_bound_minutes(#[case] minutes: i32, #[case] min: i32, #[case] ok: bool) {
        assert_eq!(ensure_minutes(minutes, min).is_ok(), ok);
    }

    #[rstest]
    fn it_should_build_seven_consecutive_days() {
        let start = NaiveDate::from_ymd_opt(2023, 12, 28).unwrap();
        let days: Vec<String> = week_days(start)
            .unwrap()
            .into_iter()
            .map(format_date)
            .collect();
        assert_eq!(
            days,
            vec![
                "2023-12-28",
                "2023-12-29",
                "2023-12-30",
                "2023-12-31",
                "2024-01-01",
                "2024-01-02",
                "2024-01-03"
            ]
        );
    }

    #[rstest]
    fn it_should_refuse_a_week_past_the_end_of_the_calendar() {
        let result = week_days(NaiveDate::MAX);
        assert!(matches!(result, Err(ApplicationError::Validation(_))));
    }

    #[rstest]
    fn it_should_accept_the_last_four_digit_year() {
        let start = parse_date("weekStart", "9999-12-31").unwrap();
        assert_eq!(week_days(start).unwrap().len(), 7);
    }
}
