use crate::error::DashboardError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ── Source type ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Organic,
    Paid,
}

impl SourceType {
    pub const ALL: [SourceType; 2] = [SourceType::Organic, SourceType::Paid];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceType::Organic => "organic",
            SourceType::Paid => "paid",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "organic" => Ok(SourceType::Organic),
            "paid" => Ok(SourceType::Paid),
            other => Err(format!("unknown source type `{}`", other)),
        }
    }
}

// ── Daily metric record ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricRecord {
    pub date: NaiveDate,
    pub subscribers_gained: i64,
    pub subscribers_lost: i64,
    pub total_subscribers: i64,
    pub views: i64,
    pub watch_hours: i64,
    pub likes: i64,
    pub net_subscribers: i64,  // gained - lost
    pub source_type: SourceType,
}

/// Every numeric counter column of a [`MetricRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MetricColumn {
    SubscribersGained,
    SubscribersLost,
    TotalSubscribers,
    Views,
    WatchHours,
    Likes,
    NetSubscribers,
}

impl MetricColumn {
    pub const ALL: [MetricColumn; 7] = [
        MetricColumn::SubscribersGained,
        MetricColumn::SubscribersLost,
        MetricColumn::TotalSubscribers,
        MetricColumn::Views,
        MetricColumn::WatchHours,
        MetricColumn::Likes,
        MetricColumn::NetSubscribers,
    ];

    /// Header name as it appears in the source CSV (or the derived column name).
    pub fn header(self) -> &'static str {
        match self {
            MetricColumn::SubscribersGained => "SUBSCRIBERS_GAINED",
            MetricColumn::SubscribersLost => "SUBSCRIBERS_LOST",
            MetricColumn::TotalSubscribers => "TOTAL_SUBSCRIBERS",
            MetricColumn::Views => "VIEWS",
            MetricColumn::WatchHours => "WATCH_HOURS",
            MetricColumn::Likes => "LIKES",
            MetricColumn::NetSubscribers => "NET_SUBSCRIBERS",
        }
    }

    pub fn value(self, r: &MetricRecord) -> i64 {
        match self {
            MetricColumn::SubscribersGained => r.subscribers_gained,
            MetricColumn::SubscribersLost => r.subscribers_lost,
            MetricColumn::TotalSubscribers => r.total_subscribers,
            MetricColumn::Views => r.views,
            MetricColumn::WatchHours => r.watch_hours,
            MetricColumn::Likes => r.likes,
            MetricColumn::NetSubscribers => r.net_subscribers,
        }
    }

    pub fn value_mut(self, r: &mut MetricRecord) -> &mut i64 {
        match self {
            MetricColumn::SubscribersGained => &mut r.subscribers_gained,
            MetricColumn::SubscribersLost => &mut r.subscribers_lost,
            MetricColumn::TotalSubscribers => &mut r.total_subscribers,
            MetricColumn::Views => &mut r.views,
            MetricColumn::WatchHours => &mut r.watch_hours,
            MetricColumn::Likes => &mut r.likes,
            MetricColumn::NetSubscribers => &mut r.net_subscribers,
        }
    }
}

impl fmt::Display for MetricColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

/// Accepts the CSV header (`WATCH_HOURS`) or its kebab form (`watch-hours`).
impl FromStr for MetricColumn {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase().replace('-', "_");
        MetricColumn::ALL
            .into_iter()
            .find(|c| c.header() == wanted)
            .ok_or_else(|| DashboardError::UnknownColumn(s.to_string()))
    }
}

// ── Table ─────────────────────────────────────────────────────────────────────

/// Immutable, date-ordered set of daily records.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct MetricTable {
    records: Vec<MetricRecord>,
}

impl MetricTable {
    pub fn new(records: Vec<MetricRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[MetricRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column(&self, column: MetricColumn) -> impl Iterator<Item = i64> + '_ {
        self.records.iter().map(move |r| column.value(r))
    }

    /// Earliest and latest date in the table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }

    pub fn filter(&self, range: DateRange) -> MetricTable {
        MetricTable::new(
            self.records
                .iter()
                .filter(|r| range.contains(r.date))
                .cloned()
                .collect(),
        )
    }

    pub fn last(&self) -> Option<&MetricRecord> {
        self.records.last()
    }
}

// ── Selection state ───────────────────────────────────────────────────────────

/// Inclusive date range. `start > end` selects nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_reversed(&self) -> bool {
        self.start > self.end
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Daily,
    Cumulative,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewMode::Daily => f.write_str("Daily"),
            ViewMode::Cumulative => f.write_str("Cumulative"),
        }
    }
}

// ── Raw CSV row ───────────────────────────────────────────────────────────────

/// Channel export CSV: DATE, SUBSCRIBERS_GAINED, SUBSCRIBERS_LOST,
/// TOTAL_SUBSCRIBERS, VIEWS, WATCH_HOURS, LIKES, type
#[derive(Debug, Clone, Default)]
pub struct RawCsvRow {
    pub date: Option<String>,
    pub subscribers_gained: Option<String>,
    pub subscribers_lost: Option<String>,
    pub total_subscribers: Option<String>,
    pub views: Option<String>,
    pub watch_hours: Option<String>,
    pub likes: Option<String>,
    pub source_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn test_metric_column_from_str() {
        assert_eq!("VIEWS".parse::<MetricColumn>().unwrap(), MetricColumn::Views);
        assert_eq!("watch-hours".parse::<MetricColumn>().unwrap(), MetricColumn::WatchHours);
        assert_eq!("net_subscribers".parse::<MetricColumn>().unwrap(), MetricColumn::NetSubscribers);
        assert!("comments".parse::<MetricColumn>().is_err());
    }

    #[test]
    fn test_date_range_inclusive_and_reversed() {
        let r = DateRange::new(day(2), day(4));
        assert!(r.contains(day(2)));
        assert!(r.contains(day(4)));
        assert!(!r.contains(day(5)));

        let rev = DateRange::new(day(4), day(2));
        assert!(rev.is_reversed());
        assert!(!rev.contains(day(3)));
    }

    #[test]
    fn test_source_type_parse() {
        assert_eq!(" Paid ".parse::<SourceType>(), Ok(SourceType::Paid));
        assert!("referral".parse::<SourceType>().is_err());
    }
}
