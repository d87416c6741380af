//! Field validators shared by every entity, plus the object reader that
//! applies them to untyped JSON input.

pub mod clock;
pub mod reader;

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Violation, ViolationKind};

pub use clock::{Clock, FixedClock, SystemClock};
pub use reader::ObjectReader;

/// Decimal places kept on latitude and longitude (about 0.11 m).
pub const COORDINATE_DECIMALS: i32 = 6;

pub const LAT_RANGE: (f64, f64) = (-90.0, 90.0);
pub const LON_RANGE: (f64, f64) = (-180.0, 180.0);

static PHONE_SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s\-()]").unwrap());

/// Rounds half away from zero (`f64::round`), so `0.0078125` becomes `0.007813`.
pub fn round_coordinate(value: f64) -> f64 {
    let scale = 10f64.powi(COORDINATE_DECIMALS);
    (value * scale).round() / scale
}

/// Strips whitespace, hyphens and parentheses. Nothing else is touched.
pub fn normalize_phone(raw: &str) -> String {
    PHONE_SEPARATORS.replace_all(raw, "").into_owned()
}

pub fn check_range(field: &str, value: f64, (min, max): (f64, f64)) -> Result<f64, Violation> {
    if (min..=max).contains(&value) {
        Ok(value)
    } else {
        Err(Violation {
            field: field.to_string(),
            kind: ViolationKind::OutOfRange,
            message: format!("must be between {min} and {max}, got {value}"),
        })
    }
}

/// Strictly positive and finite; infinity has no JSON form.
pub fn check_positive(field: &str, value: f64) -> Result<f64, Violation> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(Violation {
            field: field.to_string(),
            kind: ViolationKind::NotPositive,
            message: format!("must be a finite number greater than 0, got {value}"),
        })
    }
}

/// `value` must be strictly after `now`; equal is rejected.
pub fn check_future(
    field: &str,
    value: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<DateTime<Utc>, Violation> {
    if value > now {
        Ok(value)
    } else {
        Err(Violation {
            field: field.to_string(),
            kind: ViolationKind::NotInFuture,
            message: format!("must be in the future, got {} (now {})", value.to_rfc3339(), now.to_rfc3339()),
        })
    }
}

pub fn parse_timestamp(field: &str, raw: &str) -> Result<DateTime<Utc>, Violation> {
    DateTime::parse_from_rfc3339(raw)
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| Violation {
            field: field.to_string(),
            kind: ViolationKind::InvalidFormat,
            message: format!("expected an RFC 3339 timestamp with offset: {err}"),
        })
}

pub fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}
