use serde::{Deserialize, Serialize};

/// A critical-reading alert. Built once by the alert factory and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub station_id: String,
    pub station_name: String,
    pub lat: f64,
    pub lon: f64,
    /// ISO-8601 / RFC 3339 instant
    pub timestamp: String,
    pub hmpi: f64,
    pub message: String,
}

impl Alert {
    pub fn summary(&self) -> String {
        format!(
            "[{}] {} ({}) at ({:.4}, {:.4}): {}",
            self.timestamp, self.station_name, self.station_id, self.lat, self.lon, self.message
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_json_field_names() {
        let alert = Alert {
            id: "1700000000000-S2".to_string(),
            station_id: "S2".to_string(),
            station_name: "Weir".to_string(),
            lat: 11.0,
            lon: 21.0,
            timestamp: "2024-01-01T00:00:00+00:00".to_string(),
            hmpi: 500.0,
            message: "Critical HMPI value of 500 recorded.".to_string(),
        };

        let value = serde_json::to_value(&alert).unwrap();
        for key in [
            "id",
            "station_id",
            "station_name",
            "lat",
            "lon",
            "timestamp",
            "hmpi",
            "message",
        ] {
            assert!(value.get(key).is_some(), "missing key {}", key);
        }
        assert!(alert.summary().contains("Weir (S2)"));
    }
}
