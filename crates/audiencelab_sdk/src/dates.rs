//! Calendar-day and timestamp formatting.
//!
//! Retention is counted in local calendar days. Days are kept as
//! `dd/mm/yyyy` text and compared as text; arithmetic goes through
//! [`local_date_to_iso`], which reorders the three parts into `yyyy-mm-dd`.

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};

/// Format of persisted calendar days.
pub const LOCAL_DATE_FORMAT: &str = "%d/%m/%Y";

/// Format of `created_at` in webhook envelopes (UTC, whole seconds).
pub const ENVELOPE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The local calendar day of `now` as `dd/mm/yyyy`.
pub fn local_date_string(now: &DateTime<FixedOffset>) -> String {
    now.format(LOCAL_DATE_FORMAT).to_string()
}

/// Reorders `dd/mm/yyyy` into `yyyy-mm-dd` by splitting on `/`, reversing the
/// parts and joining them with `-`. Input with another shape is reordered the
/// same way and will simply fail to parse afterwards.
pub fn local_date_to_iso(date: &str) -> String {
    date.split('/').rev().collect::<Vec<_>>().join("-")
}

/// Parses a persisted `dd/mm/yyyy` day.
pub fn parse_local_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&local_date_to_iso(date), "%Y-%m-%d").ok()
}

/// Whole days from `from` to `to`; negative when `to` is earlier.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn envelope_timestamp(now: &DateTime<FixedOffset>) -> String {
    now.with_timezone(&Utc)
        .format(ENVELOPE_TIMESTAMP_FORMAT)
        .to_string()
}

/// RFC 3339 in UTC with millisecond precision, e.g. `2024-01-10T08:30:00.000Z`.
pub fn iso_timestamp(now: &DateTime<FixedOffset>) -> String {
    now.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Minutes to add to local time to get UTC, i.e. `-120` for UTC+2.
pub fn timezone_offset_minutes(now: &DateTime<FixedOffset>) -> i32 {
    -now.offset().local_minus_utc() / 60
}

/// Formats a [`timezone_offset_minutes`] value as `±HH:MM`.
///
/// The sign is inverted relative to ISO 8601 notation of that value: zero or
/// negative minutes (local time at or ahead of UTC) print `+`, positive
/// minutes print `-`. Ingestion parsers depend on this exact output.
pub fn format_utc_offset(offset_minutes: i32) -> String {
    let sign = if offset_minutes <= 0 { '+' } else { '-' };
    let magnitude = offset_minutes.unsigned_abs();
    format!("{}{:02}:{:02}", sign, magnitude / 60, magnitude % 60)
}
