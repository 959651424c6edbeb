//! Date and time normalization.
//!
//! Orders arrive either with a separate `order_date` + `order_time`
//! (`HH:MM[:SS[.fff]]`) or with a single ISO timestamp in `order_time`.
//! Both shapes end up as a wall-clock `(NaiveDate, NaiveTime)` pair with
//! whole seconds. Offsets are not converted: `12:30:00+05:00` is hour 12.

use chrono::{ DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike };

use crate::error::DashboardError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

const TIME_FORMATS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const TIMESTAMP_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Parses a query parameter holding an ISO calendar date.
pub fn parse_date(field: &'static str, value: &str) -> Result<NaiveDate, DashboardError> {
	NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|e|
		DashboardError::invalid(field, format!("'{}' is not a YYYY-MM-DD date ({})", value, e))
	)
}

pub fn parse_time(value: &str) -> Option<NaiveTime> {
	let value = value.trim();
	TIME_FORMATS.iter()
		.find_map(|format| NaiveTime::parse_from_str(value, format).ok())
		.map(whole_seconds)
}

pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
	let value = value.trim();

	if let Ok(with_offset) = DateTime::parse_from_rfc3339(value) {
		return Some(with_offset.naive_local());
	}

	TIMESTAMP_FORMATS.iter().find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
}

/// Resolves the date and time of an order record.
///
/// An explicit `order_date` takes precedence over the date part of a full
/// timestamp in `order_time`.
pub fn normalize_order_moment(
	order_date: Option<&str>,
	order_time: &str
) -> Result<(NaiveDate, NaiveTime), String> {
	let explicit_date = match order_date.map(str::trim).filter(|d| !d.is_empty()) {
		Some(date) =>
			Some(
				NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|e|
					format!("invalid order_date '{}': {}", date, e)
				)?
			),
		None => None,
	};

	if let Some(timestamp) = parse_timestamp(order_time) {
		let date = explicit_date.unwrap_or(timestamp.date());
		return Ok((date, whole_seconds(timestamp.time())));
	}

	match (explicit_date, parse_time(order_time)) {
		(Some(date), Some(time)) => Ok((date, time)),
		(None, Some(_)) =>
			Err(format!("order_time '{}' has no date and order_date is missing", order_time)),
		(_, None) => Err(format!("invalid order_time '{}'", order_time)),
	}
}

fn whole_seconds(time: NaiveTime) -> NaiveTime {
	time.with_nanosecond(0).unwrap_or(time)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn date(s: &str) -> NaiveDate {
		NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
	}

	#[test]
	fn split_and_iso_representations_agree() {
		let split = normalize_order_moment(Some("2024-01-05"), "19:45:10").unwrap();
		let iso = normalize_order_moment(None, "2024-01-05T19:45:10.123Z").unwrap();
		let naive = normalize_order_moment(None, "2024-01-05 19:45:10").unwrap();

		assert_eq!(split, iso);
		assert_eq!(split, naive);
		assert_eq!(split.1.hour(), 19);
	}

	#[test]
	fn offsets_keep_the_written_wall_clock() {
		let (day, time) = normalize_order_moment(None, "2024-03-01T23:10:00+05:30").unwrap();
		assert_eq!(day, date("2024-03-01"));
		assert_eq!(time.hour(), 23);
	}

	#[test]
	fn explicit_date_wins_over_timestamp_date() {
		let (day, _) = normalize_order_moment(Some("2024-02-02"), "2024-02-01T10:00:00Z").unwrap();
		assert_eq!(day, date("2024-02-02"));
	}

	#[test]
	fn bare_time_without_date_is_rejected() {
		assert!(normalize_order_moment(None, "12:00:00").is_err());
		assert!(normalize_order_moment(Some("2024-01-01"), "noon").is_err());
		assert!(normalize_order_moment(Some("01/02/2024"), "12:00").is_err());
	}

	#[test]
	fn short_times_are_accepted() {
		assert_eq!(parse_time("08:05"), NaiveTime::from_hms_opt(8, 5, 0));
	}

	#[test]
	fn query_dates_must_be_iso() {
		assert_eq!(parse_date("start_date", " 2024-01-31 ").unwrap(), date("2024-01-31"));
		assert!(matches!(
			parse_date("start_date", "2024-02-30"),
			Err(DashboardError::InvalidInput { field: "start_date", .. })
		));
	}
}
