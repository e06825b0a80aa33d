use jiff::civil::DateTime;
use jiff::tz::TimeZone;
use jiff::Timestamp;
use wormhole_core::{UrlRecord, UrlStatsRecord};

/// Formats a service timestamp as a calendar date.
///
/// Instants are shown in the local time zone. Anything jiff cannot parse
/// is shown as sent.
pub fn format_date(raw: &str) -> String {
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return ts.to_zoned(TimeZone::system()).strftime("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = raw.parse::<DateTime>() {
        return dt.strftime("%Y-%m-%d").to_string();
    }
    raw.to_string()
}

pub fn format_record(record: &UrlRecord, redirect_url: &str) -> String {
    format!(
        "{}  {}\n    {}  (created {})",
        record.short_code,
        record.original_url,
        redirect_url,
        format_date(&record.created_at)
    )
}

pub fn format_stats(stats: &UrlStatsRecord, redirect_url: &str) -> String {
    let mut out = format_record(&stats.record, redirect_url);
    out.push_str(&format!("\n    accessed {} time(s)", stats.access_count));
    if stats.record.updated_at != stats.record.created_at {
        out.push_str(&format!(", updated {}", format_date(&stats.record.updated_at)));
    }
    out
}
