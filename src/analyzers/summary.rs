use crate::models::{FinalizedAggregate, Parameter};
use crate::sinks::AggregateConsumer;

/// Text rendering of a finalized aggregate for console reports.
pub struct AggregateSummary;

impl AggregateSummary {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, aggregate: &FinalizedAggregate) -> String {
        let stats = &aggregate.stats;
        let mut summary = String::new();

        summary.push_str("=== Water Quality Summary ===\n");
        summary.push_str(&format!("Samples Processed: {}\n", stats.samples_processed));

        let critical_pct = if stats.samples_processed == 0 {
            0.0
        } else {
            100.0 * stats.critical_count as f64 / stats.samples_processed as f64
        };
        summary.push_str(&format!(
            "Critical Samples: {} ({:.1}%)\n",
            stats.critical_count, critical_pct
        ));

        if stats.top_metals.is_empty() {
            summary.push_str("Top Metals: none observed\n");
        } else {
            let names: Vec<&str> = stats.top_metals.iter().map(|m| m.symbol()).collect();
            summary.push_str(&format!("Top Metals: {}\n", names.join(", ")));
        }

        summary.push_str("\nDaily Exceedances:\n");
        let exceedances = aggregate.exceedance_series();
        if exceedances.is_empty() {
            summary.push_str("  No critical samples recorded\n");
        }
        for (day, count) in exceedances {
            let label = if day.is_empty() { "(undated)" } else { day };
            summary.push_str(&format!("  {}: {}\n", label, count));
        }

        summary.push_str("\nRegions:\n");
        if aggregate.region_summary.is_empty() {
            summary.push_str("  No regional data\n");
        }
        for (district, region) in &aggregate.region_summary {
            summary.push_str(&format!(
                "  {}: {} samples, mean HMPI {:.2}, {:.1}% critical\n",
                district, region.count, region.mean_hmpi, region.pct_critical
            ));
        }

        summary.push_str(&format!(
            "\nTurbidity/DO Points: {}\n",
            aggregate.turbidity.len()
        ));

        for param in [Parameter::Turbidity, Parameter::DissolvedOxygen] {
            if let Some(latest) = aggregate.daily_averages(param.column()).last() {
                summary.push_str(&format!(
                    "Latest {} daily average: {:.2} on {}\n",
                    param, latest.avg, latest.date
                ));
            }
        }

        if !aggregate.alerts.is_empty() {
            summary.push_str(&format!("\nAlerts ({}):\n", aggregate.alerts.len()));
            for (i, alert) in aggregate.alerts.iter().take(10).enumerate() {
                summary.push_str(&format!("  {}. {}\n", i + 1, alert.summary()));
            }
        }

        summary
    }
}

impl Default for AggregateSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// Consumer that prints the summary of each finished run to stdout.
#[derive(Default)]
pub struct ConsoleReport {
    summary: AggregateSummary,
}

impl ConsoleReport {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AggregateConsumer for ConsoleReport {
    fn consume(&mut self, aggregate: &FinalizedAggregate) {
        println!("\n{}", self.summary.render(aggregate));
    }
}
