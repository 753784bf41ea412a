//! Lenient timestamp parsing for API date fields

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::warn;

/// Naive layouts accepted as ISO-8601 (fraction optional, interpreted as UTC)
const ISO_NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset-bearing layouts RFC 3339 does not cover (no colon in the offset, minutes only)
const ISO_OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M%:z",
];

/// Fixed layouts tried on the raw text once ISO-8601 parsing failed
const FALLBACK_FORMATS: &[(&str, bool)] = &[
    ("%Y-%m-%dT%H:%M:%S%.f%z", true),
    ("%Y-%m-%d %H:%M:%S", false),
    ("%Y-%m-%dT%H:%M:%S%.fZ", false),
];

/// Values that can be turned into a UTC instant
pub trait IntoTimestamp {
    fn into_timestamp(self) -> Option<DateTime<Utc>>;
}

impl IntoTimestamp for &str {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        parse_text(self)
    }
}

impl IntoTimestamp for &String {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        parse_text(self)
    }
}

impl<Tz: TimeZone> IntoTimestamp for DateTime<Tz> {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        Some(self.with_timezone(&Utc))
    }
}

impl IntoTimestamp for NaiveDateTime {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        Some(self.and_utc())
    }
}

impl<T: IntoTimestamp> IntoTimestamp for Option<T> {
    fn into_timestamp(self) -> Option<DateTime<Utc>> {
        self.and_then(IntoTimestamp::into_timestamp)
    }
}

/// Parse a timestamp that may already be structured or may be text.
/// Values without a timezone are taken as UTC.
pub fn parse_datetime(value: impl IntoTimestamp) -> Option<DateTime<Utc>> {
    value.into_timestamp()
}

fn parse_text(raw: &str) -> Option<DateTime<Utc>> {
    let text = raw.trim();
    let normalized = match text.strip_suffix('Z').or_else(|| text.strip_suffix('z')) {
        Some(rest) => format!("{}+00:00", rest),
        None => text.to_string(),
    };

    if let Some(parsed) = parse_iso8601(&normalized) {
        return Some(parsed);
    }

    for (format, has_offset) in FALLBACK_FORMATS {
        let parsed = if *has_offset {
            DateTime::parse_from_str(text, format)
                .ok()
                .map(|dt| dt.with_timezone(&Utc))
        } else {
            NaiveDateTime::parse_from_str(text, format)
                .ok()
                .map(|dt| dt.and_utc())
        };
        if parsed.is_some() {
            return parsed;
        }
    }

    warn!("Could not parse datetime value: {}", raw);
    None
}

fn parse_iso8601(text: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ISO_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for format in ISO_NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc());
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}
