use chrono::{DateTime, SecondsFormat, Utc};

/// Formats a timestamp the way the API reports them: RFC 3339, UTC, milliseconds.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Parses a client supplied timestamp. Accepts RFC 3339 and, failing that,
/// a naive `YYYY-MM-DDTHH:MM:SS[.fff]` which is taken to be UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(s) {
        return Some(ts.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
