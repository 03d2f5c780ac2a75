use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime, UtcOffset};

use crate::html_escape;

/// Formats a published timestamp as `YYYY/M/D`, escaped for HTML.
///
/// Accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates. Anything else is
/// shown as-is rather than dropped.
pub fn format_published(raw: &str) -> String {
    let raw = raw.trim();
    if raw.is_empty() {
        return "Unknown date".to_string();
    }

    match parse_date(raw) {
        Some(date) => format_date(date),
        None => html_escape(raw),
    }
}

fn parse_date(raw: &str) -> Option<Date> {
    if let Ok(ts) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Some(ts.to_offset(UtcOffset::UTC).date());
    }
    let day = raw.get(..10).unwrap_or(raw);
    Date::parse(day, format_description!("[year]-[month]-[day]")).ok()
}

fn format_date(date: Date) -> String {
    date.format(format_description!(
        "[year]/[month padding:none]/[day padding:none]"
    ))
    .unwrap_or_else(|_| date.to_string())
}
