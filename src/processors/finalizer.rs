use std::collections::BTreeMap;

use crate::models::{
    Aggregate, DailyAverage, FinalizedAggregate, FinalizedStats, Metal, MetalCounter,
    RegionSummary,
};
use crate::utils::constants::TOP_METALS_LIMIT;

/// Turn running sums into derived statistics.
///
/// Takes the aggregate by value: a run can only be finalized once.
pub fn finalize(aggregate: Aggregate) -> FinalizedAggregate {
    let Aggregate {
        daily_exceedances,
        turbidity,
        daily_avg_params,
        region_summary,
        alerts,
        stats,
    } = aggregate;

    // Inner maps are BTreeMaps, so days already come out in key order
    let daily_avg_params = daily_avg_params
        .into_iter()
        .map(|(param, days)| {
            let series = days
                .into_iter()
                .map(|(date, stat)| DailyAverage {
                    date,
                    avg: stat.mean(),
                })
                .collect();
            (param.column().to_string(), series)
        })
        .collect::<BTreeMap<_, Vec<_>>>();

    let region_summary = region_summary
        .into_iter()
        .map(|(district, rollup)| {
            let count = rollup.count as f64;
            let summary = RegionSummary {
                hmpi_sum: rollup.hmpi_sum,
                count: rollup.count,
                critical_count: rollup.critical_count,
                mean_hmpi: rollup.hmpi_sum / count,
                pct_critical: rollup.critical_count as f64 / count * 100.0,
            };
            (district, summary)
        })
        .collect();

    FinalizedAggregate {
        daily_exceedances,
        turbidity,
        daily_avg_params,
        region_summary,
        alerts,
        stats: FinalizedStats {
            samples_processed: stats.samples_processed,
            critical_count: stats.critical_count,
            total_metals: stats.total_metals,
            top_metals: top_metals(&stats.top_metals),
        },
    }
}

fn top_metals(counter: &MetalCounter) -> Vec<Metal> {
    let mut ranked: Vec<_> = counter.iter().collect();
    // sort_by is stable: equal counts keep first-observed order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
        .into_iter()
        .take(TOP_METALS_LIMIT)
        .map(|(metal, _)| metal)
        .collect()
}
