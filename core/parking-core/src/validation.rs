//! Field validation for user-entered check-in and checkout details.
//!
//! Formats are strict: dates must be written exactly as `yyyy-MM-dd` and
//! times exactly as `HH:mm`. Anything chrono would leniently accept but that
//! does not round-trip back to the same text is rejected.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ParkingError, Result};

pub const REGN_ID_LEN: usize = 6;
pub const MINIMUM_SIZE: usize = 7;
/// Largest accepted lot dimension; keeps the cell grid a bounded allocation.
pub const MAXIMUM_SIZE: usize = 200;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M";

const EARLIEST_DATE: &str = "1970-01-01";
const LATEST_DATE: &str = "2099-12-31";

/// Registration ids are a fixed-length token with no embedded whitespace.
pub fn validate_regn_id(value: &str) -> Result<&str> {
    if value.chars().any(char::is_whitespace) {
        return Err(ParkingError::validation(
            "registration id",
            "must not contain spaces",
        ));
    }
    if value.chars().count() != REGN_ID_LEN {
        return Err(ParkingError::validation(
            "registration id",
            format!("must be exactly {} characters", REGN_ID_LEN),
        ));
    }
    Ok(value)
}

pub fn parse_date(value: &str) -> Result<NaiveDate> {
    let format_error = || {
        ParkingError::validation(
            "date",
            "Incorrect date format, please enter date in yyyy-MM-dd format",
        )
    };
    if value.len() != 10 || !value.contains('-') {
        return Err(format_error());
    }
    let date = NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|_| format_error())?;
    if date.format(DATE_FORMAT).to_string() != value {
        return Err(format_error());
    }
    if value < EARLIEST_DATE || value > LATEST_DATE {
        return Err(ParkingError::validation(
            "date",
            format!(
                "Incorrect date format, please enter date in yyyy-MM-dd format between {} and {}",
                EARLIEST_DATE, LATEST_DATE
            ),
        ));
    }
    Ok(date)
}

pub fn parse_time(value: &str) -> Result<NaiveTime> {
    let format_error = || {
        ParkingError::validation(
            "time",
            "Incorrect time format, please enter time in HH:mm format",
        )
    };
    let Some((hour, minute)) = value.split_once(':') else {
        return Err(format_error());
    };
    let two_digits = |part: &str| part.len() == 2 && part.chars().all(|c| c.is_ascii_digit());
    if !two_digits(hour) || !two_digits(minute) {
        return Err(format_error());
    }
    NaiveTime::parse_from_str(value, TIME_FORMAT).map_err(|_| format_error())
}

pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime> {
    Ok(NaiveDateTime::new(parse_date(date)?, parse_time(time)?))
}

/// Parses a lot dimension typed by the user: digits only, between
/// [`MINIMUM_SIZE`] and [`MAXIMUM_SIZE`].
pub fn parse_dimension(dimension: &'static str, value: &str) -> Result<usize> {
    let value = value.trim();
    if value.is_empty() || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(ParkingError::validation(
            dimension,
            "must be a whole number",
        ));
    }
    let parsed: usize = value
        .parse()
        .map_err(|_| ParkingError::validation(dimension, "is too large"))?;
    check_dimension(dimension, parsed)
}

pub fn check_dimension(dimension: &'static str, value: usize) -> Result<usize> {
    if value < MINIMUM_SIZE {
        return Err(ParkingError::SizeTooSmall {
            dimension,
            value,
            min: MINIMUM_SIZE,
        });
    }
    if value > MAXIMUM_SIZE {
        return Err(ParkingError::SizeTooLarge {
            dimension,
            value,
            max: MAXIMUM_SIZE,
        });
    }
    Ok(value)
}
