pub mod file_store;
pub mod memory_store;

pub use file_store::FileStore;
pub use memory_store::MemoryStore;

use crate::error::Result;
use crate::models::{Alert, FinalizedAggregate};
use crate::utils::constants::{AGGREGATE_KEY, ALERTS_KEY};

/// Minimal string key-value blob store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// Typed access to the two persisted snapshots.
pub struct SnapshotStore<S> {
    store: S,
}

impl<S: KeyValueStore> SnapshotStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Overwrite the persisted aggregate.
    pub fn save_aggregate(&mut self, aggregate: &FinalizedAggregate) -> Result<()> {
        let json = serde_json::to_string(aggregate)?;
        self.store.set(AGGREGATE_KEY, &json)
    }

    pub fn load_aggregate(&self) -> Result<Option<FinalizedAggregate>> {
        match self.store.get(AGGREGATE_KEY)? {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Overwrite the persisted alert list; `alerts` must be newest first.
    pub fn save_alerts(&mut self, alerts: &[Alert]) -> Result<()> {
        let json = serde_json::to_string(alerts)?;
        self.store.set(ALERTS_KEY, &json)
    }

    /// Persisted alerts, newest first. Missing key means no alerts.
    pub fn load_alerts(&self) -> Result<Vec<Alert>> {
        match self.store.get(ALERTS_KEY)? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(Vec::new()),
        }
    }

    pub fn clear_alerts(&mut self) -> Result<()> {
        self.store.remove(ALERTS_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DailyAverage, Metal, PointMeta, RegionSummary};
    use pretty_assertions::assert_eq;

    fn alert(id: &str) -> Alert {
        Alert {
            id: id.to_string(),
            station_id: "S2".to_string(),
            station_name: "Weir".to_string(),
            lat: 11.0,
            lon: 21.0,
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            hmpi: 500.0,
            message: "Critical HMPI value of 500 recorded.".to_string(),
        }
    }

    fn sample_aggregate() -> FinalizedAggregate {
        let mut aggregate = FinalizedAggregate::default();
        aggregate
            .daily_exceedances
            .insert("2024-01-01".to_string(), 1);
        aggregate.turbidity.push(
            3.0,
            8.0,
            PointMeta {
                station_name: "Gate".to_string(),
                date: "2024-01-01".to_string(),
                hmpi: 33.33,
            },
        );
        aggregate.daily_avg_params.insert(
            "Pb".to_string(),
            vec![DailyAverage {
                date: "2024-01-01".to_string(),
                avg: 27.5,
            }],
        );
        aggregate.region_summary.insert(
            "X".to_string(),
            RegionSummary {
                hmpi_sum: 550.0,
                count: 3,
                critical_count: 1,
                mean_hmpi: 550.0 / 3.0,
                pct_critical: 100.0 / 3.0,
            },
        );
        aggregate.alerts.push(alert("1-S2"));
        aggregate.stats.samples_processed = 3;
        aggregate.stats.critical_count = 1;
        aggregate.stats.top_metals = vec![Metal::Pb, Metal::Cd];
        aggregate
    }

    #[test]
    fn test_aggregate_round_trip() -> Result<()> {
        let mut snapshots = SnapshotStore::new(MemoryStore::new());
        assert!(snapshots.load_aggregate()?.is_none());

        let aggregate = sample_aggregate();
        snapshots.save_aggregate(&aggregate)?;

        assert_eq!(snapshots.load_aggregate()?, Some(aggregate));
        Ok(())
    }

    #[test]
    fn test_alerts_save_load_clear() -> Result<()> {
        let mut snapshots = SnapshotStore::new(MemoryStore::new());
        assert!(snapshots.load_alerts()?.is_empty());

        let alerts = vec![alert("2-S2"), alert("1-S2")];
        snapshots.save_alerts(&alerts)?;
        assert_eq!(snapshots.load_alerts()?, alerts);

        snapshots.clear_alerts()?;
        assert!(snapshots.load_alerts()?.is_empty());
        Ok(())
    }

    #[test]
    fn test_corrupt_snapshot_is_an_error() {
        let mut store = MemoryStore::new();
        store.set(AGGREGATE_KEY, "{not json").unwrap();
        let snapshots = SnapshotStore::new(store);
        assert!(snapshots.load_aggregate().is_err());
    }
}
