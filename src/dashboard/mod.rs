//! Dashboard view model: loaded table in, chart-ready view out.
//!
//! ## Flow
//!
//! `Dashboard::new()` — once per process:
//!   1. Take the cached base table
//!   2. Derive the cumulative table from it (never mutating the base)
//!
//! `Dashboard::render(state)` — on every selection change:
//!   1. Pick the base or cumulative table from the view mode
//!   2. Total each tracked metric over the date range, shape its trend series
//!   3. Build the organic/paid donuts and the all-time figures
//!   Pure: the same state always yields the same view, nothing is memoized.

use crate::aggregate::{cumulative_table, proportions, total_over_range};
use crate::charts::{trend_series, DonutChart, Palette, TrendPoint};
use crate::config::DashboardConfig;
use crate::error::DashboardError;
use crate::models::{DateRange, MetricColumn, MetricRecord, MetricTable, SourceType, ViewMode};
use crate::utils::{format_number, format_with_commas};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

pub const TITLE: &str = "YouTube Channel Dashboard";

/// A metric shown as a card with an inline trend chart.
#[derive(Debug, Clone, Copy)]
pub struct TrackedMetric {
    pub title: &'static str,
    pub column: MetricColumn,
    pub color: &'static str,
}

pub const TRACKED_METRICS: [TrackedMetric; 4] = [
    TrackedMetric { title: "Total Subscribers", column: MetricColumn::NetSubscribers, color: "#29b5e8" },
    TrackedMetric { title: "Total Views", column: MetricColumn::Views, color: "#FF9F36" },
    TrackedMetric { title: "Total Watch Hours", column: MetricColumn::WatchHours, color: "#D45B90" },
    TrackedMetric { title: "Total Likes", column: MetricColumn::Likes, color: "#7D44CF" },
];

/// Per-interaction input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardState {
    pub range: DateRange,
    pub mode: ViewMode,
    pub organic_palette: Palette,
    pub paid_palette: Palette,
    pub show_raw_table: bool,
}

impl DashboardState {
    pub fn new(range: DateRange, config: &DashboardConfig) -> Self {
        Self {
            range,
            mode: config.default_view_mode,
            organic_palette: config.organic_palette,
            paid_palette: config.paid_palette,
            show_raw_table: config.show_raw_table,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AllTimeStats {
    pub total_subscribers: i64,
    pub total_views: i64,
    pub total_subscribers_short: String,
    pub total_views_short: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrafficShare {
    pub organic: DonutChart,
    pub paid: DonutChart,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricCard {
    pub title: &'static str,
    pub column: MetricColumn,
    pub color: &'static str,
    pub total: i64,
    pub total_display: String,
    pub total_short: String,
    /// Selected-mode series restricted to the selected range.
    pub trend: Vec<TrendPoint>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ViewModel {
    pub title: &'static str,
    pub date_bounds: Option<DateRange>,
    pub range: DateRange,
    pub mode: ViewMode,
    pub all_time: AllTimeStats,
    pub traffic: TrafficShare,
    pub cards: Vec<MetricCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_table: Option<Vec<MetricRecord>>,
}

pub struct Dashboard {
    base: Arc<MetricTable>,
    cumulative: MetricTable,
}

impl Dashboard {
    pub fn new(base: Arc<MetricTable>) -> Self {
        let cumulative = cumulative_table(&base);
        info!("Dashboard ready: {} daily records", base.len());
        Self { base, cumulative }
    }

    pub fn base(&self) -> &MetricTable {
        &self.base
    }

    pub fn table(&self, mode: ViewMode) -> &MetricTable {
        match mode {
            ViewMode::Daily => &self.base,
            ViewMode::Cumulative => &self.cumulative,
        }
    }

    /// Full dataset span, used as the default selection.
    pub fn date_bounds(&self) -> Option<DateRange> {
        self.base
            .date_bounds()
            .map(|(start, end)| DateRange::new(start, end))
    }

    pub fn all_time(&self) -> AllTimeStats {
        // latest reported total, not a running sum of totals
        let total_subscribers = self
            .base
            .records()
            .iter()
            .max_by_key(|r| r.date)
            .map(|r| r.total_subscribers)
            .unwrap_or_default();
        let total_views = self.cumulative.last().map(|r| r.views).unwrap_or_default();

        AllTimeStats {
            total_subscribers,
            total_views,
            total_subscribers_short: format_number(total_subscribers),
            total_views_short: format_number(total_views),
        }
    }

    pub fn traffic(&self, organic: Palette, paid: Palette) -> Result<TrafficShare, DashboardError> {
        let shares = proportions(&self.base)?;
        Ok(TrafficShare {
            organic: DonutChart::new(shares[&SourceType::Organic], "Organic", organic),
            paid: DonutChart::new(shares[&SourceType::Paid], "Paid", paid),
        })
    }

    pub fn render(&self, state: &DashboardState) -> Result<ViewModel, DashboardError> {
        let table = self.table(state.mode);
        let selected = table.filter(state.range);
        debug!(
            "Rendering {} view for {} → {} ({} rows)",
            state.mode,
            state.range.start,
            state.range.end,
            selected.len()
        );

        let cards = TRACKED_METRICS
            .iter()
            .map(|m| {
                let total = total_over_range(table, m.column, state.range);
                MetricCard {
                    title: m.title,
                    column: m.column,
                    color: m.color,
                    total,
                    total_display: format_with_commas(total),
                    total_short: format_number(total),
                    trend: trend_series(&selected, m.column),
                }
            })
            .collect();

        Ok(ViewModel {
            title: TITLE,
            date_bounds: self.date_bounds(),
            range: state.range,
            mode: state.mode,
            all_time: self.all_time(),
            traffic: self.traffic(state.organic_palette, state.paid_palette)?,
            cards,
            raw_table: state
                .show_raw_table
                .then(|| self.base.records().to_vec()),
        })
    }
}
