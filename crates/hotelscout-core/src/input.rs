//! Validators for free-text conversation input.
//!
//! Each function either yields the parsed value or a `Validation` error
//! whose message is the exact re-prompt text shown to the user. A rejection
//! never advances the conversation.

use chrono::NaiveDate;

use crate::error::{Result, ScoutError};

/// Parses a whole number within `min..=max`.
pub fn parse_bounded_number(text: &str, min: u32, max: u32) -> Result<u32> {
    let value: u32 = text
        .trim()
        .parse()
        .map_err(|_| ScoutError::validation(format!("Enter a number between {min} and {max}.")))?;
    if value < min || value > max {
        return Err(ScoutError::validation(format!(
            "Enter a number between {min} and {max}."
        )));
    }
    Ok(value)
}

/// Parses a `yyyy-mm-dd` date that is not in the past.
pub fn parse_future_date(text: &str, today: NaiveDate) -> Result<NaiveDate> {
    let message = format!(
        "Wrong date format. It must be yyyy-mm-dd and not earlier than today, for example {}.",
        today.format("%Y-%m-%d")
    );
    let date = NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| ScoutError::validation(message.clone()))?;
    if date < today {
        return Err(ScoutError::validation(message));
    }
    Ok(date)
}

/// Validates that the check-out date lies strictly after check-in.
pub fn parse_checkout_after(text: &str, today: NaiveDate, check_in: NaiveDate) -> Result<NaiveDate> {
    let date = parse_future_date(text, today)?;
    if date <= check_in {
        return Err(ScoutError::validation(
            "The check-out date must be later than the check-in date. Try again.",
        ));
    }
    Ok(date)
}

/// Parses a `low-high` whole-number range with `low < high`.
pub fn parse_price_range(text: &str) -> Result<(u32, u32)> {
    let (low, high) = split_range(text)?;
    let low: u32 = low
        .parse()
        .map_err(|_| range_error("whole numbers, for example 50-200"))?;
    let high: u32 = high
        .parse()
        .map_err(|_| range_error("whole numbers, for example 50-200"))?;
    if low >= high {
        return Err(range_error("whole numbers, for example 50-200"));
    }
    Ok((low, high))
}

/// Parses a `low-high` distance range in km with `low < high`.
/// A decimal comma is accepted alongside a decimal point.
pub fn parse_dist_range(text: &str) -> Result<(f64, f64)> {
    let (low, high) = split_range(text)?;
    let low: f64 = low
        .replace(',', ".")
        .parse()
        .map_err(|_| range_error("numbers, for example 0.5-3"))?;
    let high: f64 = high
        .replace(',', ".")
        .parse()
        .map_err(|_| range_error("numbers, for example 0.5-3"))?;
    if !low.is_finite() || !high.is_finite() || low < 0.0 || low >= high {
        return Err(range_error("numbers, for example 0.5-3"));
    }
    Ok((low, high))
}

fn split_range(text: &str) -> Result<(String, String)> {
    let mut parts = text.trim().splitn(2, '-');
    match (parts.next(), parts.next()) {
        (Some(low), Some(high)) if !low.trim().is_empty() && !high.trim().is_empty() => {
            Ok((low.trim().to_string(), high.trim().to_string()))
        }
        _ => Err(range_error("two values, for example 1-5")),
    }
}

fn range_error(expected: &str) -> ScoutError {
    ScoutError::validation(format!(
        "Enter a range as min-max with min below max: {expected}."
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_bounded_number() {
        assert_eq!(parse_bounded_number("5", 1, 15).unwrap(), 5);
        assert_eq!(parse_bounded_number(" 25 ", 1, 25).unwrap(), 25);
        assert!(parse_bounded_number("0", 1, 15).unwrap_err().is_validation());
        assert!(parse_bounded_number("26", 1, 25).unwrap_err().is_validation());
        assert!(parse_bounded_number("five", 1, 15).unwrap_err().is_validation());
        assert!(parse_bounded_number("-3", 1, 15).unwrap_err().is_validation());
    }

    #[test]
    fn test_future_date() {
        let today = day("2024-06-10");
        assert_eq!(parse_future_date("2024-06-10", today).unwrap(), today);
        assert_eq!(parse_future_date("2024-07-01", today).unwrap(), day("2024-07-01"));
        assert!(parse_future_date("2024-06-09", today).unwrap_err().is_validation());
        assert!(parse_future_date("10.06.2024", today).unwrap_err().is_validation());
        assert!(parse_future_date("not a date", today).unwrap_err().is_validation());
    }

    #[test]
    fn test_checkout_must_follow_checkin() {
        let today = day("2024-06-10");
        let check_in = day("2024-06-12");
        assert_eq!(
            parse_checkout_after("2024-06-15", today, check_in).unwrap(),
            day("2024-06-15")
        );
        assert!(parse_checkout_after("2024-06-12", today, check_in)
            .unwrap_err()
            .is_validation());
        assert!(parse_checkout_after("2024-06-11", today, check_in)
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_price_range() {
        assert_eq!(parse_price_range("50-200").unwrap(), (50, 200));
        assert_eq!(parse_price_range(" 1 - 5 ").unwrap(), (1, 5));
        assert!(parse_price_range("200-50").unwrap_err().is_validation());
        assert!(parse_price_range("5-5").unwrap_err().is_validation());
        assert!(parse_price_range("abc-5").unwrap_err().is_validation());
        assert!(parse_price_range("100").unwrap_err().is_validation());
    }

    #[test]
    fn test_dist_range() {
        assert_eq!(parse_dist_range("0.5-3").unwrap(), (0.5, 3.0));
        assert_eq!(parse_dist_range("0,5-1,5").unwrap(), (0.5, 1.5));
        assert!(parse_dist_range("3-0.5").unwrap_err().is_validation());
        assert!(parse_dist_range("1.2").unwrap_err().is_validation());
        assert!(parse_dist_range("-1-2").unwrap_err().is_validation());
    }
}
