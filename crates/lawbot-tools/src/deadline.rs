use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::error;

use lawbot_core::error::{Error, Result};

use crate::outcome::ToolResult;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEADLINE_SOURCE: &str = "Date Calculator";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Deadline {
    pub start_date: String,
    pub deadline: String,
    pub days: i64,
    pub source: &'static str,
}

/// `start + days` as calendar dates. A missing or blank `start` means `today`.
///
/// Parse failures come back as `Invalid date format: ..`; nothing panics.
pub fn calculate_deadline(days: i64, start: Option<&str>, today: NaiveDate) -> ToolResult<Deadline> {
    deadline_from(days, start, today).into()
}

fn deadline_from(days: i64, start: Option<&str>, today: NaiveDate) -> Result<Deadline> {
    let base = match start.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|e| {
            error!(start = raw, "date calculation error: {}", e);
            Error::InvalidToolParameter(format!("Invalid date format: {e}"))
        })?,
        None => today,
    };
    let deadline = Duration::try_days(days)
        .and_then(|d| base.checked_add_signed(d))
        .ok_or_else(|| Error::InvalidToolParameter(format!("Invalid date format: {} days from {} is out of range", days, base)))?;
    Ok(Deadline {
        start_date: base.format(DATE_FORMAT).to_string(),
        deadline: deadline.format(DATE_FORMAT).to_string(),
        days,
        source: DEADLINE_SOURCE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate { NaiveDate::from_ymd_opt(2025, 3, 10).unwrap() }

    #[test]
    fn crosses_month_and_leap_day() {
        let r = calculate_deadline(1, Some("2024-02-28"), today());
        assert_eq!(r.data.unwrap().deadline, "2024-02-29");
    }

    #[test]
    fn missing_or_blank_start_uses_today() {
        let r = calculate_deadline(5, None, today());
        assert_eq!(r.data.as_ref().unwrap().start_date, "2025-03-10");
        assert_eq!(r.data.unwrap().deadline, "2025-03-15");
        let r = calculate_deadline(0, Some("  "), today());
        assert_eq!(r.data.unwrap().deadline, "2025-03-10");
    }

    #[test]
    fn negative_days_count_backwards() {
        let r = calculate_deadline(-10, Some("2024-01-05"), today());
        assert_eq!(r.data.unwrap().deadline, "2023-12-26");
    }

    #[test]
    fn absurd_offsets_are_reported_not_panicked() {
        let r = calculate_deadline(i64::MAX, Some("2024-01-01"), today());
        assert!(!r.success);
        assert!(r.error.unwrap().contains("out of range"));
    }

    #[test]
    fn bad_start_is_an_invalid_tool_parameter() {
        let err = deadline_from(3, Some("not-a-date"), today()).unwrap_err();
        assert!(matches!(&err, Error::InvalidToolParameter(m) if m.starts_with("Invalid date format: ")), "{err}");

        let r = calculate_deadline(3, Some("not-a-date"), today());
        assert!(!r.success);
        assert!(r.data.is_none());
        assert_eq!(r.error.unwrap(), err.to_string());
    }
}
