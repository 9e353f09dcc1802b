//! Chart-ready shapes: trend series, donut rings and the year/period heatmap.
//!
//! Nothing here draws. Each function turns table data into the minimal
//! structure a plotting front end needs, serializable as JSON.

use crate::error::DashboardError;
use crate::models::{MetricColumn, MetricRecord, MetricTable};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ── Trend series ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub value: i64,
}

/// One point per row, oldest first.
pub fn trend_series(table: &MetricTable, column: MetricColumn) -> Vec<TrendPoint> {
    let mut points: Vec<TrendPoint> = table
        .records()
        .iter()
        .zip(table.column(column))
        .map(|(r, value)| TrendPoint { date: r.date, value })
        .collect();
    points.sort_by_key(|p| p.date);
    points
}

// ── Donut ─────────────────────────────────────────────────────────────────────

/// Two-tone colour schemes for donut rings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    Blue,
    Green,
    Orange,
    Red,
}

impl Palette {
    /// (value colour, remainder colour)
    pub fn colors(self) -> (&'static str, &'static str) {
        match self {
            Palette::Blue => ("#29b5e8", "#155F7A"),
            Palette::Green => ("#27AE60", "#12783D"),
            Palette::Orange => ("#F39C12", "#875A12"),
            Palette::Red => ("#E74C3C", "#781F16"),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Palette::Blue => "blue",
            Palette::Green => "green",
            Palette::Orange => "orange",
            Palette::Red => "red",
        })
    }
}

impl FromStr for Palette {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "blue" => Ok(Palette::Blue),
            "green" => Ok(Palette::Green),
            "orange" => Ok(Palette::Orange),
            "red" => Ok(Palette::Red),
            _ => Err(DashboardError::UnknownPalette(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutSlice {
    pub label: String,
    pub value: f64,
}

impl DonutSlice {
    fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// `[(label, percentage), ("", 100 - percentage)]`
pub fn donut_slices(percentage: f64, label: &str) -> [DonutSlice; 2] {
    [
        DonutSlice::new(label, percentage),
        DonutSlice::new("", 100.0 - percentage),
    ]
}

/// A value ring drawn over a full background "track" ring in the same colours.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DonutChart {
    pub title: String,
    pub percentage: f64,
    pub value_ring: [DonutSlice; 2],
    pub track_ring: [DonutSlice; 2],
    pub value_color: &'static str,
    pub remainder_color: &'static str,
    pub center_text: String,
}

impl DonutChart {
    pub fn new(percentage: f64, label: &str, palette: Palette) -> Self {
        let (value_color, remainder_color) = palette.colors();
        Self {
            title: label.to_string(),
            percentage,
            value_ring: donut_slices(percentage, label),
            track_ring: [DonutSlice::new(label, 0.0), DonutSlice::new("", 100.0)],
            value_color,
            remainder_color,
            center_text: format!("{:.1} %", percentage),
        }
    }
}

// ── Heatmap ───────────────────────────────────────────────────────────────────

/// Categorical axis derived from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatmapAxis {
    Year,
    Month,
    Weekday,
    SourceType,
}

impl HeatmapAxis {
    /// (sort key, display label)
    fn category(self, r: &MetricRecord) -> (i64, String) {
        match self {
            HeatmapAxis::Year => (i64::from(r.date.year()), r.date.year().to_string()),
            HeatmapAxis::Month => (i64::from(r.date.month()), r.date.format("%b").to_string()),
            HeatmapAxis::Weekday => (
                i64::from(r.date.weekday().num_days_from_monday()),
                r.date.format("%a").to_string(),
            ),
            HeatmapAxis::SourceType => (r.source_type as i64, r.source_type.to_string()),
        }
    }
}

impl FromStr for HeatmapAxis {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "year" => Ok(HeatmapAxis::Year),
            "month" => Ok(HeatmapAxis::Month),
            "weekday" => Ok(HeatmapAxis::Weekday),
            "type" | "source_type" => Ok(HeatmapAxis::SourceType),
            _ => Err(DashboardError::UnknownAxis(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeatmapCell {
    pub y: String,
    pub x: String,
    pub value: i64,
}

/// One cell per observed (y, x) pair holding the maximum `value` for it,
/// ordered by y then x.
pub fn heatmap_matrix(
    table: &MetricTable,
    y: HeatmapAxis,
    x: HeatmapAxis,
    value: MetricColumn,
) -> Vec<HeatmapCell> {
    let mut cells: BTreeMap<((i64, String), (i64, String)), i64> = BTreeMap::new();

    for r in table.records() {
        let v = value.value(r);
        cells
            .entry((y.category(r), x.category(r)))
            .and_modify(|max| *max = (*max).max(v))
            .or_insert(v);
    }

    cells
        .into_iter()
        .map(|(((_, y), (_, x)), value)| HeatmapCell { y, x, value })
        .collect()
}
