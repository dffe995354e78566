use std::path::Path;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{Aggregate, Alert, FinalizedAggregate, RawRow, SampleRow, ScoredSample};
use crate::processors::{aggregator, finalizer, hmpi_scorer, AlertFactory};
use crate::readers::{CsvChunkSource, SourceEvent};
use crate::sinks::{AggregateConsumer, AlertSink};
use crate::store::{KeyValueStore, SnapshotStore};
use crate::utils::constants::DEFAULT_CHUNK_SIZE;
use crate::utils::Debouncer;

/// Live counters for presentation-layer previews.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewUpdate {
    pub samples_processed: u64,
    pub critical_count: u64,
    pub rows_discarded: u64,
}

/// Outcome of a completed run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub rows_received: u64,
    pub rows_discarded: u64,
    pub alerts_created: usize,
    /// False when the snapshot store rejected the results
    pub persisted: bool,
    pub aggregate: FinalizedAggregate,
}

/// State owned by a single run; dropped unpersisted if the stream fails.
struct RunState {
    aggregate: Aggregate,
    factory: AlertFactory,
    rows_received: u64,
    rows_discarded: u64,
}

impl RunState {
    fn new() -> Self {
        Self {
            aggregate: Aggregate::new(),
            factory: AlertFactory::new(),
            rows_received: 0,
            rows_discarded: 0,
        }
    }

    fn preview(&self) -> PreviewUpdate {
        PreviewUpdate {
            samples_processed: self.aggregate.stats.samples_processed,
            critical_count: self.aggregate.stats.critical_count,
            rows_discarded: self.rows_discarded,
        }
    }
}

/// Drives sample streams through scoring, alerting, aggregation and persistence.
///
/// All state that outlives a run (alert history, collaborators, the store) lives
/// here. `process` borrows the driver mutably, so runs on one driver never overlap.
pub struct Pipeline<S: KeyValueStore> {
    snapshots: SnapshotStore<S>,
    /// Alert history, newest first
    alerts: Vec<Alert>,
    alert_sinks: Vec<Box<dyn AlertSink>>,
    consumers: Vec<Box<dyn AggregateConsumer>>,
    preview: Option<Debouncer<PreviewUpdate>>,
    chunk_size: usize,
}

impl<S: KeyValueStore> Pipeline<S> {
    /// Build a driver over `store`, picking up any previously persisted alerts.
    pub fn new(store: S) -> Self {
        let snapshots = SnapshotStore::new(store);
        let alerts = snapshots.load_alerts().unwrap_or_else(|e| {
            warn!(error = %e, "Could not load persisted alerts; starting with none");
            Vec::new()
        });

        Self {
            snapshots,
            alerts,
            alert_sinks: Vec::new(),
            consumers: Vec::new(),
            preview: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_alert_sink(mut self, sink: impl AlertSink + 'static) -> Self {
        self.alert_sinks.push(Box::new(sink));
        self
    }

    pub fn with_consumer(mut self, consumer: impl AggregateConsumer + 'static) -> Self {
        self.consumers.push(Box::new(consumer));
        self
    }

    pub fn with_preview(mut self, preview: Debouncer<PreviewUpdate>) -> Self {
        self.preview = Some(preview);
        self
    }

    /// Alert history, newest first.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    pub fn snapshots(&self) -> &SnapshotStore<S> {
        &self.snapshots
    }

    /// Hand the persisted alert history to every sink. Call once at startup.
    pub fn replay_alerts(&mut self) {
        for sink in &mut self.alert_sinks {
            sink.replay(&self.alerts);
        }
    }

    /// Clear alert history in memory and in the store. Alerts already delivered
    /// to sinks are not retracted.
    pub fn reset_alerts(&mut self) -> Result<()> {
        self.alerts.clear();
        self.snapshots.clear_alerts()?;
        info!("Alert history cleared");
        Ok(())
    }

    /// Deliver any pending preview update and stop the preview worker.
    pub async fn flush_preview(&mut self) -> Result<()> {
        if let Some(preview) = self.preview.take() {
            preview.shutdown().await?;
        }
        Ok(())
    }

    /// Stream a CSV file through the pipeline.
    pub async fn process_file(&mut self, path: &Path) -> Result<RunReport> {
        info!(path = %path.display(), chunk_size = self.chunk_size, "Processing sample file");
        let events = CsvChunkSource::new()
            .with_chunk_size(self.chunk_size)
            .spawn_file(path)?;
        self.process(events).await
    }

    /// Consume source events until the stream terminates.
    ///
    /// On `Complete` the run is finalized, persisted and handed to consumers. On a
    /// stream error the partial run is discarded and nothing is persisted.
    pub async fn process(&mut self, mut events: mpsc::Receiver<SourceEvent>) -> Result<RunReport> {
        self.post_preview(PreviewUpdate::default());
        let mut run = RunState::new();

        loop {
            match events.recv().await {
                Some(SourceEvent::Chunk(rows)) => {
                    self.process_chunk(&mut run, rows);
                    self.post_preview(run.preview());
                }
                Some(SourceEvent::Complete) => return Ok(self.complete(run)),
                Some(SourceEvent::Error(reason)) => {
                    error!(
                        %reason,
                        rows_received = run.rows_received,
                        "Sample stream failed; discarding partial run"
                    );
                    return Err(ProcessingError::Stream(reason));
                }
                None => {
                    error!(
                        rows_received = run.rows_received,
                        "Sample stream closed without completing; discarding partial run"
                    );
                    return Err(ProcessingError::Stream(
                        "source closed before completion".to_string(),
                    ));
                }
            }
        }
    }

    /// Rows within a chunk are handled synchronously, in order.
    fn process_chunk(&mut self, run: &mut RunState, rows: Vec<RawRow>) {
        for raw in rows {
            run.rows_received += 1;

            let sample = match SampleRow::from_raw(&raw) {
                Ok(sample) => sample,
                Err(e) => {
                    run.rows_discarded += 1;
                    debug!(row = run.rows_received, error = %e, "Discarding sample row");
                    continue;
                }
            };

            let hmpi = hmpi_scorer::score(&sample);
            let scored = ScoredSample { sample, hmpi };

            if hmpi.is_critical() {
                let alert = run.factory.create_alert(&scored);
                for sink in &mut self.alert_sinks {
                    sink.on_alert(&alert);
                }
                run.aggregate.record_alert(alert);
            }

            aggregator::update(&mut run.aggregate, &scored);
        }
    }

    fn complete(&mut self, run: RunState) -> RunReport {
        let RunState {
            aggregate,
            rows_received,
            rows_discarded,
            ..
        } = run;

        let finalized = finalizer::finalize(aggregate);
        let alerts_created = finalized.alerts.len();

        let mut history: Vec<Alert> = finalized.alerts.iter().rev().cloned().collect();
        history.append(&mut self.alerts);
        self.alerts = history;

        let persisted = self.persist(&finalized);
        self.post_preview(PreviewUpdate {
            samples_processed: finalized.stats.samples_processed,
            critical_count: finalized.stats.critical_count,
            rows_discarded,
        });

        for consumer in &mut self.consumers {
            consumer.consume(&finalized);
        }

        info!(
            rows_received,
            rows_discarded,
            samples = finalized.stats.samples_processed,
            critical = finalized.stats.critical_count,
            alerts = alerts_created,
            persisted,
            "Processing run complete"
        );

        RunReport {
            rows_received,
            rows_discarded,
            alerts_created,
            persisted,
            aggregate: finalized,
        }
    }

    /// Persistence failures are logged, not raised: results stay in memory.
    fn persist(&mut self, aggregate: &FinalizedAggregate) -> bool {
        let mut ok = true;

        if let Err(e) = self.snapshots.save_aggregate(aggregate) {
            warn!(error = %e, "Failed to persist aggregate; results will not survive a restart");
            ok = false;
        }
        if let Err(e) = self.snapshots.save_alerts(&self.alerts) {
            warn!(error = %e, "Failed to persist alerts; results will not survive a restart");
            ok = false;
        }

        ok
    }

    fn post_preview(&self, update: PreviewUpdate) {
        if let Some(preview) = &self.preview {
            preview.call(update);
        }
    }
}
