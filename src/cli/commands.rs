use std::fs::OpenOptions;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::analyzers::{AggregateSummary, ConsoleReport};
use crate::cli::args::{Cli, Commands};
use crate::config::Settings;
use crate::error::Result;
use crate::processors::{Pipeline, PreviewUpdate};
use crate::sinks::{AlertSink, LogAlertSink};
use crate::store::{FileStore, SnapshotStore};
use crate::utils::{Debouncer, ProgressReporter};

/// Install the global `tracing` subscriber. `RUST_LOG` takes precedence.
pub fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose);

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .ok();
        }
        None => {
            builder.with_writer(std::io::stderr).try_init().ok();
        }
    }

    Ok(())
}

/// Build the processing pipeline over the configured store and replay the
/// persisted alert history to `alert_sink`.
fn open_pipeline(
    settings: &Settings,
    alert_sink: impl AlertSink + 'static,
) -> Result<Pipeline<FileStore>> {
    let store = FileStore::new(&settings.store_dir)?;
    let mut pipeline = Pipeline::new(store)
        .with_chunk_size(settings.chunk_size)
        .with_alert_sink(alert_sink)
        .with_consumer(ConsoleReport::new());

    pipeline.replay_alerts();
    info!(restored = pipeline.alerts().len(), "Alert history loaded");
    Ok(pipeline)
}

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut settings = Settings::load(cli.config.as_deref())?;
    if let Some(dir) = cli.store_dir {
        settings.store_dir = dir;
    }

    match cli.command {
        Commands::Process {
            input_file,
            chunk_size,
            quiet,
        } => {
            if let Some(size) = chunk_size {
                settings.chunk_size = size.max(1);
            }

            println!("Processing water samples...");
            println!("Input file: {}", input_file.display());
            println!("Store: {}", settings.store_dir.display());
            println!("Chunk size: {}", settings.chunk_size);

            let progress = Arc::new(ProgressReporter::new_spinner("Reading samples...", quiet));
            let preview_progress = progress.clone();
            let preview = Debouncer::new(
                Duration::from_millis(settings.preview_debounce_ms),
                move |update: PreviewUpdate| preview_progress.show_preview(&update),
            );

            let mut pipeline =
                open_pipeline(&settings, LogAlertSink::new())?.with_preview(preview);

            let report = pipeline.process_file(&input_file).await?;
            pipeline.flush_preview().await?;

            progress.finish_with_message(&format!(
                "Processed {} rows ({} discarded)",
                report.rows_received, report.rows_discarded
            ));

            if !report.persisted {
                println!("⚠️  Results could not be saved; they will be lost on exit");
            }
            println!(
                "Created {} alerts; {} alerts on record",
                report.alerts_created,
                pipeline.alerts().len()
            );
            println!("Processing complete!");
        }

        Commands::Alerts { limit } => {
            let snapshots = SnapshotStore::new(FileStore::new(&settings.store_dir)?);
            let alerts = snapshots.load_alerts()?;

            if alerts.is_empty() {
                println!("No alerts on record");
                return Ok(());
            }

            println!(
                "Showing {} of {} alerts (newest first):",
                limit.min(alerts.len()),
                alerts.len()
            );
            for (i, alert) in alerts.iter().take(limit).enumerate() {
                println!("{}. {}", i + 1, alert.summary());
            }
        }

        Commands::ResetAlerts => {
            let store = FileStore::new(&settings.store_dir)?;
            let mut pipeline = Pipeline::new(store);
            let cleared = pipeline.alerts().len();
            pipeline.reset_alerts()?;
            info!(cleared, "Reset alert history");
            println!("Cleared {} alerts", cleared);
        }

        Commands::Summary => {
            let snapshots = SnapshotStore::new(FileStore::new(&settings.store_dir)?);
            match snapshots.load_aggregate()? {
                Some(aggregate) => println!("{}", AggregateSummary::new().render(&aggregate)),
                None => println!("No data processed yet"),
            }
        }
    }

    Ok(())
}
