use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

/// Values that can be fed to [`parse_number`]: raw CSV text or numbers.
pub trait NumberLike {
    fn to_finite(&self) -> Option<f64>;
}

impl NumberLike for str {
    fn to_finite(&self) -> Option<f64> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl NumberLike for String {
    fn to_finite(&self) -> Option<f64> {
        self.as_str().to_finite()
    }
}

impl NumberLike for f64 {
    fn to_finite(&self) -> Option<f64> {
        Some(*self).filter(|v| v.is_finite())
    }
}

impl NumberLike for f32 {
    fn to_finite(&self) -> Option<f64> {
        f64::from(*self).to_finite()
    }
}

impl NumberLike for i64 {
    fn to_finite(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl<T: NumberLike + ?Sized> NumberLike for &T {
    fn to_finite(&self) -> Option<f64> {
        (**self).to_finite()
    }
}

/// Parse a value as a finite float. Never panics; `None` marks an invalid value.
///
/// # Examples
/// ```
/// use rtwqms_processor::utils::parse_number;
///
/// assert_eq!(parse_number(" 12.5 "), Some(12.5));
/// assert_eq!(parse_number("n/a"), None);
/// assert_eq!(parse_number(f64::NAN), None);
/// ```
pub fn parse_number<T: NumberLike>(raw: T) -> Option<f64> {
    raw.to_finite()
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Parse a date-like string into a local timestamp.
///
/// Zoned timestamps (RFC 3339, RFC 2822) are converted to local time. Naive
/// date-times and plain dates are taken as local wall-clock time.
pub fn parse_local_datetime(raw: &str) -> Option<DateTime<Local>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Local));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Local));
    }

    let naive = DATE_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })?;

    // DST gaps have no local representation; fall back to the earliest valid reading
    Local.from_local_datetime(&naive).earliest()
}

/// Normalise a date-like string to a `YYYY-MM-DD` day key in local time.
///
/// Returns an empty string when the input cannot be parsed.
pub fn format_date(raw: &str) -> String {
    let trimmed = raw.trim();

    // Plain calendar dates keep their day regardless of the local offset
    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
    {
        return format_naive_date(date);
    }

    parse_local_datetime(trimmed)
        .map(|dt| format_naive_date(dt.date_naive()))
        .unwrap_or_default()
}

pub fn format_naive_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
