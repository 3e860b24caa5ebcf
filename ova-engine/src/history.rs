//! Bounded historical store and trend analysis
//!
//! Append-only with FIFO eviction at 1000 records. Trends are least-squares
//! slopes over index order; a slope magnitude under 0.01 is "stable"
//! regardless of sign.

use ova_core::model::{
    DrivingPattern, HistoricalRecord, Trend, TrendAnalysis, TrendDirection,
};
use std::collections::{BTreeMap, VecDeque};

/// Maximum number of retained records.
pub const HISTORY_CAPACITY: usize = 1000;

/// Slope magnitudes below this are classified stable.
const STABLE_SLOPE: f64 = 0.01;

#[derive(Debug, Default)]
pub struct HistoricalStore {
    records: VecDeque<HistoricalRecord>,
}

impl HistoricalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, evicting the oldest past capacity.
    pub fn push(&mut self, record: HistoricalRecord) {
        self.records.push_back(record);
        while self.records.len() > HISTORY_CAPACITY {
            self.records.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Most recent `n` records, oldest first.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoricalRecord> {
        let skip = self.records.len().saturating_sub(n);
        self.records.iter().skip(skip)
    }

    /// Trend analysis over the stored window.
    ///
    /// `None` is the no-data sentinel for an empty store; it is a valid
    /// outcome, not a failure.
    pub fn analyze(&self) -> Option<TrendAnalysis> {
        if self.records.is_empty() {
            return None;
        }

        let efficiencies: Vec<f64> = self.records.iter().map(|r| r.fuel_efficiency).collect();
        let healths: Vec<f64> = self.records.iter().map(|r| r.engine_health).collect();

        let mut driving_patterns: BTreeMap<DrivingPattern, usize> = BTreeMap::new();
        for r in &self.records {
            *driving_patterns.entry(r.driving_pattern).or_insert(0) += 1;
        }

        let n = self.records.len() as f64;
        Some(TrendAnalysis {
            efficiency_trend: linear_trend(&efficiencies),
            health_trend: linear_trend(&healths),
            driving_patterns,
            avg_efficiency: efficiencies.iter().sum::<f64>() / n,
            avg_health: healths.iter().sum::<f64>() / n,
        })
    }
}

/// Least-squares slope of `values` against their index.
pub fn linear_trend(values: &[f64]) -> Trend {
    if values.len() < 2 {
        return Trend {
            direction: TrendDirection::Stable,
            magnitude: 0.0,
        };
    }

    let n = values.len() as f64;
    let x_mean = (n - 1.0) / 2.0;
    let y_mean = values.iter().sum::<f64>() / n;

    let mut num = 0.0;
    let mut den = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        num += dx * (y - y_mean);
        den += dx * dx;
    }
    let slope = num / den;

    let direction = if slope.abs() < STABLE_SLOPE {
        TrendDirection::Stable
    } else if slope > 0.0 {
        TrendDirection::Improving
    } else {
        TrendDirection::Degrading
    };

    Trend {
        direction,
        magnitude: slope.abs(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(i: usize, efficiency: f64, health: f64) -> HistoricalRecord {
        HistoricalRecord {
            timestamp: Utc::now(),
            engine_temp: 90.0,
            oil_temp: 100.0,
            rpm: 1500.0 + i as f64,
            speed: 55.0,
            throttle_pos: 20.0,
            fuel_efficiency: efficiency,
            engine_health: health,
            driving_pattern: if i % 3 == 0 {
                DrivingPattern::Economic
            } else {
                DrivingPattern::Normal
            },
        }
    }

    #[test]
    fn empty_store_returns_no_data_sentinel() {
        let store = HistoricalStore::new();
        assert!(store.analyze().is_none());
    }

    #[test]
    fn store_never_exceeds_capacity_and_keeps_latest() {
        let mut store = HistoricalStore::new();
        for i in 0..1500 {
            store.push(record(i, i as f64, 100.0));
        }
        assert_eq!(store.len(), HISTORY_CAPACITY);

        // The survivors are the last 1000, in arrival order.
        let rpms: Vec<f64> = store.recent(usize::MAX).map(|r| r.rpm).collect();
        assert_eq!(rpms.first().copied(), Some(1500.0 + 500.0));
        assert_eq!(rpms.last().copied(), Some(1500.0 + 1499.0));
        for pair in rpms.windows(2) {
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn rising_series_trends_improving() {
        let values: Vec<f64> = (0..100).map(|i| 20.0 + i as f64 * 0.1).collect();
        let trend = linear_trend(&values);
        assert_eq!(trend.direction, TrendDirection::Improving);
        assert!((trend.magnitude - 0.1).abs() < 1e-9);
    }

    #[test]
    fn falling_series_trends_degrading() {
        let values: Vec<f64> = (0..100).map(|i| 90.0 - i as f64 * 0.5).collect();
        let trend = linear_trend(&values);
        assert_eq!(trend.direction, TrendDirection::Degrading);
        assert!((trend.magnitude - 0.5).abs() < 1e-9);
    }

    #[test]
    fn tiny_negative_slope_is_still_stable() {
        let values: Vec<f64> = (0..100).map(|i| 50.0 - i as f64 * 0.005).collect();
        let trend = linear_trend(&values);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert!(trend.magnitude < STABLE_SLOPE);
    }

    #[test]
    fn single_record_is_stable_with_zero_magnitude() {
        let trend = linear_trend(&[42.0]);
        assert_eq!(trend.direction, TrendDirection::Stable);
        assert_eq!(trend.magnitude, 0.0);
    }

    #[test]
    fn analyze_counts_patterns_and_averages() {
        let mut store = HistoricalStore::new();
        for i in 0..30 {
            store.push(record(i, 25.0, 90.0));
        }
        let analysis = store.analyze().expect("store is non-empty");
        assert_eq!(analysis.avg_efficiency, 25.0);
        assert_eq!(analysis.avg_health, 90.0);
        let total: usize = analysis.driving_patterns.values().sum();
        assert_eq!(total, 30);
        assert_eq!(analysis.driving_patterns[&DrivingPattern::Economic], 10);
        assert_eq!(analysis.driving_patterns[&DrivingPattern::Normal], 20);
        // Flat series on both metrics.
        assert_eq!(analysis.efficiency_trend.direction, TrendDirection::Stable);
        assert_eq!(analysis.health_trend.direction, TrendDirection::Stable);
    }
}
