use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{Alert, Metal, Parameter};

/// Running sum/count pair, finalized into a mean.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningStat {
    pub sum: f64,
    pub count: u64,
}

impl RunningStat {
    pub fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointMeta {
    pub station_name: String,
    pub date: String,
    pub hmpi: f64,
}

#[derive(Deserialize)]
struct SeriesParts {
    x: Vec<f64>,
    y: Vec<f64>,
    meta: Vec<PointMeta>,
}

/// Turbidity (x) against dissolved oxygen (y) scatter points with per-point metadata.
///
/// The three sequences are index-aligned; points can only be appended as a whole.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SeriesParts")]
pub struct TurbiditySeries {
    x: Vec<f64>,
    y: Vec<f64>,
    meta: Vec<PointMeta>,
}

impl TryFrom<SeriesParts> for TurbiditySeries {
    type Error = String;

    fn try_from(parts: SeriesParts) -> Result<Self, Self::Error> {
        if parts.x.len() != parts.y.len() || parts.x.len() != parts.meta.len() {
            return Err(format!(
                "turbidity series misaligned: x={}, y={}, meta={}",
                parts.x.len(),
                parts.y.len(),
                parts.meta.len()
            ));
        }
        Ok(Self {
            x: parts.x,
            y: parts.y,
            meta: parts.meta,
        })
    }
}

impl TurbiditySeries {
    pub fn push(&mut self, turbidity: f64, dissolved_oxygen: f64, meta: PointMeta) {
        self.x.push(turbidity);
        self.y.push(dissolved_oxygen);
        self.meta.push(meta);
    }

    pub fn x(&self) -> &[f64] {
        &self.x
    }

    pub fn y(&self) -> &[f64] {
        &self.y
    }

    pub fn meta(&self) -> &[PointMeta] {
        &self.meta
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RegionRollup {
    pub hmpi_sum: f64,
    pub count: u64,
    pub critical_count: u64,
}

/// Metal observation counts in first-observed order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MetalCounter {
    counts: Vec<(Metal, u64)>,
}

impl MetalCounter {
    pub fn bump(&mut self, metal: Metal) {
        match self.counts.iter_mut().find(|(m, _)| *m == metal) {
            Some((_, count)) => *count += 1,
            None => self.counts.push((metal, 1)),
        }
    }

    pub fn count(&self, metal: Metal) -> u64 {
        self.counts
            .iter()
            .find(|(m, _)| *m == metal)
            .map_or(0, |(_, c)| *c)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metal, u64)> + '_ {
        self.counts.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunningStats {
    pub samples_processed: u64,
    pub critical_count: u64,
    /// Reserved; never populated
    pub total_metals: u64,
    pub top_metals: MetalCounter,
}

/// Accumulator for one processing run. Consumed by `finalize`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregate {
    pub daily_exceedances: BTreeMap<String, u64>,
    pub turbidity: TurbiditySeries,
    pub daily_avg_params: BTreeMap<Parameter, BTreeMap<String, RunningStat>>,
    pub region_summary: BTreeMap<String, RegionRollup>,
    pub alerts: Vec<Alert>,
    pub stats: RunningStats,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyAverage {
    pub date: String,
    pub avg: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub hmpi_sum: f64,
    pub count: u64,
    pub critical_count: u64,
    #[serde(rename = "mean_HMPI")]
    pub mean_hmpi: f64,
    pub pct_critical: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FinalizedStats {
    pub samples_processed: u64,
    pub critical_count: u64,
    pub total_metals: u64,
    pub top_metals: Vec<Metal>,
}

/// Read-only snapshot handed to chart and report consumers and persisted as JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FinalizedAggregate {
    pub daily_exceedances: BTreeMap<String, u64>,
    pub turbidity: TurbiditySeries,
    pub daily_avg_params: BTreeMap<String, Vec<DailyAverage>>,
    pub region_summary: BTreeMap<String, RegionSummary>,
    pub alerts: Vec<Alert>,
    pub stats: FinalizedStats,
}

impl FinalizedAggregate {
    /// Daily averages for a column; empty when the parameter was never observed.
    pub fn daily_averages(&self, column: &str) -> &[DailyAverage] {
        self.daily_avg_params
            .get(column)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Critical counts per day, ascending by day key.
    pub fn exceedance_series(&self) -> Vec<(&str, u64)> {
        self.daily_exceedances
            .iter()
            .map(|(day, count)| (day.as_str(), *count))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.samples_processed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> PointMeta {
        PointMeta {
            station_name: name.to_string(),
            date: "2024-01-01".to_string(),
            hmpi: 10.0,
        }
    }

    #[test]
    fn test_running_stat_mean() {
        let mut stat = RunningStat::default();
        assert_eq!(stat.mean(), 0.0);
        stat.add(2.0);
        stat.add(4.0);
        assert_eq!(stat.count, 2);
        assert_eq!(stat.mean(), 3.0);
    }

    #[test]
    fn test_metal_counter_keeps_first_observed_order() {
        let mut counter = MetalCounter::default();
        counter.bump(Metal::Zn);
        counter.bump(Metal::Pb);
        counter.bump(Metal::Zn);

        let order: Vec<_> = counter.iter().collect();
        assert_eq!(order, vec![(Metal::Zn, 2), (Metal::Pb, 1)]);
        assert_eq!(counter.count(Metal::Hg), 0);
    }

    #[test]
    fn test_misaligned_series_rejected_on_load() {
        let json = r#"{"x":[1.0,2.0],"y":[1.0],"meta":[]}"#;
        assert!(serde_json::from_str::<TurbiditySeries>(json).is_err());

        let mut series = TurbiditySeries::default();
        series.push(3.0, 8.0, meta("A"));
        let json = serde_json::to_string(&series).unwrap();
        let back: TurbiditySeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, series);
    }

    #[test]
    fn test_consumer_helpers_tolerate_missing_data() {
        let empty = FinalizedAggregate::default();
        assert!(empty.daily_averages("Pb").is_empty());
        assert!(empty.exceedance_series().is_empty());
        assert!(empty.turbidity.is_empty());
        assert!(empty.is_empty());

        // Older or partial snapshots still load
        let partial: FinalizedAggregate =
            serde_json::from_str(r#"{"dailyExceedances":{"2024-01-01":2}}"#).unwrap();
        assert_eq!(partial.exceedance_series(), vec![("2024-01-01", 2)]);
    }

    #[test]
    fn test_finalized_json_shape() {
        let mut aggregate = FinalizedAggregate::default();
        aggregate.region_summary.insert(
            "X".to_string(),
            RegionSummary {
                hmpi_sum: 10.0,
                count: 1,
                critical_count: 0,
                mean_hmpi: 10.0,
                pct_critical: 0.0,
            },
        );
        aggregate.stats.top_metals = vec![Metal::Pb];

        let value = serde_json::to_value(&aggregate).unwrap();
        for key in [
            "dailyExceedances",
            "turbidity",
            "dailyAvgParams",
            "regionSummary",
            "alerts",
            "stats",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(value["regionSummary"]["X"]["mean_HMPI"], 10.0);
        assert_eq!(value["stats"]["top_metals"][0], "Pb");
        assert_eq!(value["stats"]["total_metals"], 0);
    }
}
