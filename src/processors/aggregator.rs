use crate::models::{Aggregate, Parameter, PointMeta, ScoredSample};

/// Fold one scored sample into the running aggregate.
///
/// Called for every valid sample regardless of status. The four updates are
/// independent; a reading that is missing for one of them never skips another.
pub fn update(aggregate: &mut Aggregate, scored: &ScoredSample) {
    let sample = &scored.sample;
    let day = sample.day.as_str();
    let critical = scored.hmpi.is_critical();

    // Counters and exceedance calendar
    aggregate.stats.samples_processed += 1;
    if critical {
        aggregate.stats.critical_count += 1;
        *aggregate
            .daily_exceedances
            .entry(day.to_string())
            .or_insert(0) += 1;
    }

    // Turbidity / DO scatter
    if let (Some(turbidity), Some(dissolved_oxygen)) = (
        sample.reading(Parameter::Turbidity),
        sample.reading(Parameter::DissolvedOxygen),
    ) {
        aggregate.turbidity.push(
            turbidity,
            dissolved_oxygen,
            PointMeta {
                station_name: sample.station_name.clone(),
                date: day.to_string(),
                hmpi: scored.hmpi.value,
            },
        );
    }

    // Daily trends for every tracked reading, metal frequency on the side
    for (param, value) in sample.readings() {
        aggregate
            .daily_avg_params
            .entry(param)
            .or_default()
            .entry(day.to_string())
            .or_default()
            .add(value);

        if let Some(metal) = param.metal() {
            aggregate.stats.top_metals.bump(metal);
        }
    }

    // Regional rollup
    let region = aggregate
        .region_summary
        .entry(sample.district_or_default().to_string())
        .or_default();
    region.hmpi_sum += scored.hmpi.value;
    region.count += 1;
    if critical {
        region.critical_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample::raw_row;
    use crate::models::{HmpiResult, HmpiStatus, Metal, SampleRow};

    fn scored(fields: &[(&str, &str)], value: f64, status: HmpiStatus) -> ScoredSample {
        let mut all = vec![("latitude", "10"), ("longitude", "20"), ("station_name", "Gate")];
        all.extend_from_slice(fields);
        ScoredSample {
            sample: SampleRow::from_raw(&raw_row(&all)).unwrap(),
            hmpi: HmpiResult { value, status },
        }
    }

    #[test]
    fn test_counts_and_exceedances() {
        let mut aggregate = Aggregate::new();
        update(
            &mut aggregate,
            &scored(&[("timestamp", "2024-01-01")], 80.0, HmpiStatus::Critical),
        );
        update(
            &mut aggregate,
            &scored(&[("timestamp", "2024-01-01")], 10.0, HmpiStatus::Good),
        );
        update(
            &mut aggregate,
            &scored(&[("timestamp", "2024-01-02")], 90.0, HmpiStatus::Critical),
        );

        assert_eq!(aggregate.stats.samples_processed, 3);
        assert_eq!(aggregate.stats.critical_count, 2);
        assert_eq!(aggregate.daily_exceedances.get("2024-01-01"), Some(&1));
        assert_eq!(aggregate.daily_exceedances.get("2024-01-02"), Some(&1));
        assert_eq!(aggregate.stats.total_metals, 0);
    }

    #[test]
    fn test_scatter_requires_both_readings() {
        let mut aggregate = Aggregate::new();
        update(
            &mut aggregate,
            &scored(&[("turbidity", "3"), ("DO", "8")], 0.0, HmpiStatus::Good),
        );
        update(
            &mut aggregate,
            &scored(&[("turbidity", "4")], 0.0, HmpiStatus::Good),
        );
        update(
            &mut aggregate,
            &scored(&[("turbidity", "x"), ("DO", "7")], 0.0, HmpiStatus::Good),
        );

        let series = &aggregate.turbidity;
        assert_eq!(series.len(), 1);
        assert_eq!(series.x().len(), series.y().len());
        assert_eq!(series.y().len(), series.meta().len());
        assert_eq!(series.meta()[0].station_name, "Gate");
    }

    #[test]
    fn test_daily_params_track_all_numeric_readings() {
        let mut aggregate = Aggregate::new();
        let fields = [
            ("timestamp", "2024-01-01"),
            ("Pb", "4"),
            ("turbidity", "3"),
            ("DO", "8"),
            ("pH", "7.1"),
        ];
        update(&mut aggregate, &scored(&fields, 40.0, HmpiStatus::Bad));
        update(
            &mut aggregate,
            &scored(&[("timestamp", "2024-01-01"), ("Pb", "6")], 60.0, HmpiStatus::Bad),
        );

        let pb = &aggregate.daily_avg_params[&Parameter::Metal(Metal::Pb)]["2024-01-01"];
        assert_eq!(pb.count, 2);
        assert_eq!(pb.sum, 10.0);
        assert!(aggregate.daily_avg_params.contains_key(&Parameter::Turbidity));
        assert!(aggregate.daily_avg_params.contains_key(&Parameter::Ph));

        // Only metals count towards top_metals
        assert_eq!(aggregate.stats.top_metals.count(Metal::Pb), 2);
        assert_eq!(aggregate.stats.top_metals.iter().count(), 1);
    }

    #[test]
    fn test_region_rollup_defaults_district() {
        let mut aggregate = Aggregate::new();
        update(&mut aggregate, &scored(&[], 30.0, HmpiStatus::Bad));
        update(
            &mut aggregate,
            &scored(&[("district", "")], 90.0, HmpiStatus::Critical),
        );
        update(
            &mut aggregate,
            &scored(&[("district", "East")], 5.0, HmpiStatus::Good),
        );

        let unknown = aggregate.region_summary["Unknown District"];
        assert_eq!(unknown.count, 2);
        assert_eq!(unknown.hmpi_sum, 120.0);
        assert_eq!(unknown.critical_count, 1);
        assert_eq!(aggregate.region_summary["East"].count, 1);
    }

    #[test]
    fn test_unparseable_timestamp_buckets_under_empty_day() {
        let mut aggregate = Aggregate::new();
        update(
            &mut aggregate,
            &scored(&[("timestamp", "garbage")], 99.0, HmpiStatus::Critical),
        );
        assert_eq!(aggregate.daily_exceedances.get(""), Some(&1));
    }
}
