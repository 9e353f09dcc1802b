use crate::error::DashboardError;
use crate::models::{MetricRecord, RawCsvRow, SourceType};
use chrono::{NaiveDate, NaiveDateTime};

// ── Parsers ───────────────────────────────────────────────────────────────────

/// Parse an integer counter.
/// "1,234" → 1234 | "12.0" → 12 | "12.5" → None
pub fn parse_count(s: &str) -> Option<i64> {
    let s = s.trim().replace(',', "");
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }

    // Spreadsheet exports sometimes write integer columns as floats
    let f: f64 = s.parse().ok()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Parse dates: ISO first, then the usual spreadsheet renderings.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();

    for fmt in ["%Y-%m-%d", "%m/%d/%Y", "%d/%m/%Y", "%b %d, %Y", "%d %b %Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }

    None
}

// ── CSV row → MetricRecord ────────────────────────────────────────────────────

fn required_count(
    field: Option<&str>,
    header: &str,
    line: u64,
) -> Result<i64, DashboardError> {
    let raw = field.unwrap_or_default();
    parse_count(raw).ok_or_else(|| DashboardError::InvalidRow {
        line,
        reason: format!("{} is not an integer: {:?}", header, raw),
    })
}

/// Convert one raw row, deriving `net_subscribers`. Any bad cell fails the row.
pub fn csv_row_to_record(row: &RawCsvRow, line: u64) -> Result<MetricRecord, DashboardError> {
    let date_str = row.date.as_deref().unwrap_or_default();
    let date = parse_date(date_str).ok_or_else(|| DashboardError::InvalidRow {
        line,
        reason: format!("unparseable DATE {:?}", date_str),
    })?;

    let subscribers_gained =
        required_count(row.subscribers_gained.as_deref(), "SUBSCRIBERS_GAINED", line)?;
    let subscribers_lost =
        required_count(row.subscribers_lost.as_deref(), "SUBSCRIBERS_LOST", line)?;

    let source_type: SourceType = row
        .source_type
        .as_deref()
        .unwrap_or_default()
        .parse()
        .map_err(|reason| DashboardError::InvalidRow { line, reason })?;

    Ok(MetricRecord {
        date,
        subscribers_gained,
        subscribers_lost,
        total_subscribers: required_count(
            row.total_subscribers.as_deref(),
            "TOTAL_SUBSCRIBERS",
            line,
        )?,
        views: required_count(row.views.as_deref(), "VIEWS", line)?,
        watch_hours: required_count(row.watch_hours.as_deref(), "WATCH_HOURS", line)?,
        likes: required_count(row.likes.as_deref(), "LIKES", line)?,
        net_subscribers: subscribers_gained - subscribers_lost,
        source_type,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(gained: &str, lost: &str, kind: &str) -> RawCsvRow {
        RawCsvRow {
            date: Some("2024-01-01".into()),
            subscribers_gained: Some(gained.into()),
            subscribers_lost: Some(lost.into()),
            total_subscribers: Some("100".into()),
            views: Some("1,200".into()),
            watch_hours: Some("35.0".into()),
            likes: Some("9".into()),
            source_type: Some(kind.into()),
        }
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1,234"), Some(1234));
        assert_eq!(parse_count(" 42 "), Some(42));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count(""), None);
        assert_eq!(parse_count("n/a"), None);
        assert_eq!(parse_count("1e30"), None);
        assert_eq!(parse_count("-1e30"), None);
    }

    #[test]
    fn test_parse_date_formats() {
        let jan5 = NaiveDate::from_ymd_opt(2024, 1, 5);
        assert_eq!(parse_date("2024-01-05"), jan5);
        assert_eq!(parse_date("2024-01-05 00:00:00"), jan5);
        assert_eq!(parse_date("01/05/2024"), jan5);
        assert_eq!(parse_date("Jan 05, 2024"), jan5);
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn test_net_subscribers_derived() {
        let r = csv_row_to_record(&raw("5", "8", "paid"), 2).unwrap();
        assert_eq!(r.net_subscribers, -3);
        assert_eq!(r.views, 1200);
        assert_eq!(r.watch_hours, 35);
        assert_eq!(r.source_type, SourceType::Paid);
    }

    #[test]
    fn test_bad_cells_name_the_line() {
        let err = csv_row_to_record(&raw("x", "1", "organic"), 7).unwrap_err();
        assert!(err.to_string().starts_with("line 7:"));
        assert!(err.to_string().contains("SUBSCRIBERS_GAINED"));

        let err = csv_row_to_record(&raw("1e30", "1", "organic"), 5).unwrap_err();
        assert!(err.to_string().starts_with("line 5:"));

        let err = csv_row_to_record(&raw("1", "1", "referral"), 3).unwrap_err();
        assert!(err.to_string().contains("referral"));
    }
}
