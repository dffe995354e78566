//! Seams for the collaborators that consume pipeline output: map markers and
//! alert feeds take [`Alert`]s, charts and reports take the finalized aggregate.

use tracing::warn;

use crate::models::{Alert, FinalizedAggregate};

/// Receives alerts as critical samples are processed.
pub trait AlertSink {
    /// Called synchronously for each critical sample, in processing order.
    fn on_alert(&mut self, alert: &Alert);

    /// Called once at startup with all previously persisted alerts, newest first.
    fn replay(&mut self, alerts: &[Alert]);
}

/// Read-only consumer of a finished run.
///
/// Must accept empty exceedance calendars, empty scatter series and missing
/// parameters; those mean "no data yet", not failure.
pub trait AggregateConsumer {
    fn consume(&mut self, aggregate: &FinalizedAggregate);
}

/// Alert sink that reports every alert through `tracing`.
#[derive(Debug, Default)]
pub struct LogAlertSink {
    seen: usize,
}

impl LogAlertSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seen(&self) -> usize {
        self.seen
    }
}

impl AlertSink for LogAlertSink {
    fn on_alert(&mut self, alert: &Alert) {
        self.seen += 1;
        warn!(
            alert_id = %alert.id,
            station_id = %alert.station_id,
            hmpi = alert.hmpi,
            "{}",
            alert.message
        );
    }

    fn replay(&mut self, alerts: &[Alert]) {
        self.seen += alerts.len();
        if let Some(latest) = alerts.first() {
            warn!(
                count = alerts.len(),
                latest = %latest.timestamp,
                "Restored persisted alerts"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(id: &str) -> Alert {
        Alert {
            id: id.to_string(),
            station_id: "S1".to_string(),
            station_name: "Gate".to_string(),
            lat: 1.0,
            lon: 2.0,
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
            hmpi: 99.0,
            message: "Critical HMPI value of 99 recorded.".to_string(),
        }
    }

    #[test]
    fn test_log_sink_counts_alerts() {
        let mut sink = LogAlertSink::new();
        sink.replay(&[alert("1-S1"), alert("2-S1")]);
        sink.on_alert(&alert("3-S1"));
        sink.replay(&[]);
        assert_eq!(sink.seen(), 3);
    }
}
