use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::{Alert, ScoredSample};
use crate::utils::parse_local_datetime;

/// Builds alerts for critical samples with ids unique within a run.
///
/// Ids combine a strictly increasing millisecond stamp with the station id, so
/// several critical rows landing in the same millisecond still get distinct ids.
pub struct AlertFactory {
    clock: Box<dyn Fn() -> DateTime<Utc> + Send>,
    last_stamp: i64,
}

impl AlertFactory {
    pub fn new() -> Self {
        Self::with_clock(Utc::now)
    }

    pub fn with_clock<F>(clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + 'static,
    {
        Self {
            clock: Box::new(clock),
            last_stamp: i64::MIN,
        }
    }

    /// Build the alert for a critical sample. The caller only passes samples that
    /// passed coordinate validation and scored Critical.
    pub fn create_alert(&mut self, scored: &ScoredSample) -> Alert {
        let now = (self.clock)();
        let stamp = self.next_stamp(now.timestamp_millis());
        let sample = &scored.sample;

        let timestamp = parse_local_datetime(&sample.timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now)
            .to_rfc3339_opts(SecondsFormat::Millis, true);

        Alert {
            id: format!("{}-{}", stamp, sample.station_id),
            station_id: sample.station_id.clone(),
            station_name: sample.station_name.clone(),
            lat: sample.latitude,
            lon: sample.longitude,
            timestamp,
            hmpi: scored.hmpi.value,
            message: format!("Critical HMPI value of {} recorded.", scored.hmpi.value),
        }
    }

    fn next_stamp(&mut self, millis: i64) -> i64 {
        self.last_stamp = if millis > self.last_stamp {
            millis
        } else {
            self.last_stamp + 1
        };
        self.last_stamp
    }
}

impl Default for AlertFactory {
    fn default() -> Self {
        Self::new()
    }
}
