//! Reductions over a [`MetricTable`]: running sums, range totals, category shares.

use crate::error::DashboardError;
use crate::models::{DateRange, MetricColumn, MetricTable, SourceType};
use std::collections::BTreeMap;
use tracing::debug;

/// Sum `column` over rows whose date falls inside `range` (both ends inclusive).
pub fn total_over_range(table: &MetricTable, column: MetricColumn, range: DateRange) -> i64 {
    if range.is_reversed() {
        debug!("Reversed range {} > {}, empty selection", range.start, range.end);
    }
    table
        .records()
        .iter()
        .filter(|r| range.contains(r.date))
        .map(|r| column.value(r))
        .sum()
}

/// New table where every counter holds its running sum from the first row.
/// Rows are put in date order first; the input is left untouched.
pub fn cumulative_table(table: &MetricTable) -> MetricTable {
    let mut records = table.records().to_vec();
    records.sort_by_key(|r| r.date);

    let mut running = [0i64; MetricColumn::ALL.len()];
    for record in &mut records {
        for (acc, column) in running.iter_mut().zip(MetricColumn::ALL) {
            let slot = column.value_mut(record);
            *acc += *slot;
            *slot = *acc;
        }
    }

    MetricTable::new(records)
}

/// Each source type's share of rows as a 0–100 percentage, rounded to
/// three places of the fraction (`round(fraction, 3) * 100`).
pub fn proportions(table: &MetricTable) -> Result<BTreeMap<SourceType, f64>, DashboardError> {
    let mut counts: BTreeMap<SourceType, usize> = BTreeMap::new();
    for r in table.records() {
        *counts.entry(r.source_type).or_default() += 1;
    }

    let total = table.len() as f64;
    SourceType::ALL
        .into_iter()
        .map(|kind| {
            let n = counts
                .get(&kind)
                .copied()
                .ok_or_else(|| DashboardError::MissingCategory(kind.to_string()))?;
            let permille = (n as f64 / total * 1000.0).round_ties_even();
            Ok((kind, permille / 10.0))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MetricRecord;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn record(d: u32, value: i64, kind: SourceType) -> MetricRecord {
        MetricRecord {
            date: day(d),
            subscribers_gained: value,
            subscribers_lost: 0,
            total_subscribers: value,
            views: value,
            watch_hours: value,
            likes: value,
            net_subscribers: value,
            source_type: kind,
        }
    }

    fn views_table(views: &[i64]) -> MetricTable {
        MetricTable::new(
            views
                .iter()
                .enumerate()
                .map(|(i, &v)| record(i as u32 + 1, v, SourceType::Organic))
                .collect(),
        )
    }

    #[test]
    fn test_cumulative_of_zeros_is_zero() {
        let table = views_table(&[0, 0, 0, 0]);
        let cum = cumulative_table(&table);
        for column in MetricColumn::ALL {
            assert!(cum.column(column).all(|v| v == 0));
        }
    }

    #[test]
    fn test_cumulative_of_ones_counts_up() {
        let table = views_table(&[1; 6]);
        let cum = cumulative_table(&table);
        let views: Vec<i64> = cum.column(MetricColumn::Views).collect();
        assert_eq!(views, vec![1, 2, 3, 4, 5, 6]);
        // every counter column is accumulated, including the derived one
        let net: Vec<i64> = cum.column(MetricColumn::NetSubscribers).collect();
        assert_eq!(net, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_cumulative_sorts_by_date_and_leaves_input_alone() {
        let table = MetricTable::new(vec![
            record(3, 5, SourceType::Paid),
            record(1, 1, SourceType::Paid),
            record(2, 2, SourceType::Paid),
        ]);
        let cum = cumulative_table(&table);
        let views: Vec<i64> = cum.column(MetricColumn::Views).collect();
        assert_eq!(views, vec![1, 3, 8]);
        assert_eq!(table.records()[0].views, 5);
    }

    #[test]
    fn test_total_over_full_span_is_raw_sum() {
        let table = views_table(&[10, 20, 30, 40, 50]);
        let (start, end) = table.date_bounds().unwrap();
        assert_eq!(
            total_over_range(&table, MetricColumn::Views, DateRange::new(start, end)),
            150
        );
    }

    #[test]
    fn test_total_over_reversed_or_empty_range_is_zero() {
        let table = views_table(&[10, 20, 30]);
        let reversed = DateRange::new(day(3), day(1));
        assert_eq!(total_over_range(&table, MetricColumn::Views, reversed), 0);

        let outside = DateRange::new(day(20), day(25));
        assert_eq!(total_over_range(&table, MetricColumn::Views, outside), 0);
    }

    #[test]
    fn test_daily_vs_cumulative_range_totals() {
        let table = views_table(&[10, 20, 30, 40, 50]);
        let range = DateRange::new(day(2), day(4));
        assert_eq!(total_over_range(&table, MetricColumn::Views, range), 90);

        let cum = cumulative_table(&table);
        assert_eq!(total_over_range(&cum, MetricColumn::Views, range), 190);
    }

    #[test]
    fn test_proportions_seven_three() {
        let mut records: Vec<MetricRecord> =
            (1..=7).map(|d| record(d, 1, SourceType::Organic)).collect();
        records.extend((8..=10).map(|d| record(d, 1, SourceType::Paid)));

        let shares = proportions(&MetricTable::new(records)).unwrap();
        assert_eq!(shares[&SourceType::Organic], 70.0);
        assert_eq!(shares[&SourceType::Paid], 30.0);
    }

    #[test]
    fn test_proportions_round_to_three_places() {
        let records = vec![
            record(1, 1, SourceType::Organic),
            record(2, 1, SourceType::Paid),
            record(3, 1, SourceType::Paid),
        ];
        let shares = proportions(&MetricTable::new(records)).unwrap();
        assert_eq!(shares[&SourceType::Organic], 33.3);
        assert_eq!(shares[&SourceType::Paid], 66.7);
    }

    #[test]
    fn test_proportions_exact_tie_rounds_to_even() {
        let mut records: Vec<MetricRecord> =
            (1..=15).map(|d| record(d, 1, SourceType::Organic)).collect();
        records.push(record(16, 1, SourceType::Paid));

        // 1/16 = 0.0625 exactly
        let shares = proportions(&MetricTable::new(records)).unwrap();
        assert_eq!(shares[&SourceType::Paid], 6.2);
        assert_eq!(shares[&SourceType::Organic], 93.8);
    }

    #[test]
    fn test_proportions_missing_category_fails() {
        let table = views_table(&[1, 2, 3]);
        match proportions(&table) {
            Err(DashboardError::MissingCategory(kind)) => assert_eq!(kind, "paid"),
            other => panic!("expected MissingCategory, got {:?}", other),
        }
        assert!(proportions(&MetricTable::default()).is_err());
    }
}
