use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rtwqms_processor::models::{Aggregate, RawRow, SampleRow, ScoredSample};
use rtwqms_processor::processors::{finalize, score, update};
use rtwqms_processor::utils::parse_number;

const METALS: [&str; 6] = ["Pb", "Cd", "Hg", "As", "Zn", "Cu"];

// Synthetic rows spread over a month and four districts
fn create_test_rows(count: usize) -> Vec<RawRow> {
    (0..count)
        .map(|i| {
            let mut row = RawRow::new();
            row.insert("station_id".to_string(), format!("S{}", i % 50));
            row.insert("station_name".to_string(), format!("Test Station {}", i % 50));
            row.insert("latitude".to_string(), format!("{}", 20.0 + (i % 50) as f64 * 0.01));
            row.insert("longitude".to_string(), format!("{}", 78.0 + (i % 50) as f64 * 0.01));
            row.insert("district".to_string(), format!("District {}", i % 4));
            row.insert("timestamp".to_string(), format!("2024-01-{:02}", 1 + i % 28));
            for (j, metal) in METALS.iter().enumerate() {
                if (i + j) % 3 != 0 {
                    row.insert(metal.to_string(), format!("{}", ((i * 7 + j) % 40) as f64 * 0.5));
                }
            }
            row.insert("turbidity".to_string(), format!("{}", (i % 10) as f64 * 1.5));
            row.insert("DO".to_string(), format!("{}", 5.0 + (i % 5) as f64));
            row.insert("pH".to_string(), "7.2".to_string());
            row
        })
        .collect()
}

fn scored_samples(rows: &[RawRow]) -> Vec<ScoredSample> {
    rows.iter()
        .filter_map(|raw| SampleRow::from_raw(raw).ok())
        .map(|sample| {
            let hmpi = score(&sample);
            ScoredSample { sample, hmpi }
        })
        .collect()
}

fn benchmark_row_parsing(c: &mut Criterion) {
    let rows = create_test_rows(1000);

    c.bench_function("sample_row_from_raw", |b| {
        b.iter(|| {
            let parsed = rows
                .iter()
                .filter(|raw| SampleRow::from_raw(raw).is_ok())
                .count();
            black_box(parsed)
        })
    });
}

fn benchmark_number_parsing(c: &mut Criterion) {
    let inputs = ["12.5", " 7 ", "abc", "", "1e3", "-0.25", "NaN", "inf"];

    c.bench_function("parse_number", |b| {
        b.iter(|| {
            let valid = inputs.iter().filter_map(|s| parse_number(*s)).count();
            black_box(valid)
        })
    });
}

fn benchmark_hmpi_scoring(c: &mut Criterion) {
    let samples: Vec<SampleRow> = create_test_rows(1000)
        .iter()
        .filter_map(|raw| SampleRow::from_raw(raw).ok())
        .collect();

    c.bench_function("hmpi_score", |b| {
        b.iter(|| {
            let critical = samples
                .iter()
                .filter(|sample| score(sample).is_critical())
                .count();
            black_box(critical)
        })
    });
}

fn benchmark_aggregation_by_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("aggregate_and_finalize_by_size");

    for &size in &[100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("rows", size), &size, |b, &count| {
            let samples = scored_samples(&create_test_rows(count));

            b.iter(|| {
                let mut aggregate = Aggregate::new();
                for scored in &samples {
                    update(&mut aggregate, scored);
                }
                let finalized = finalize(aggregate);
                black_box(finalized.stats.samples_processed)
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_row_parsing,
    benchmark_number_parsing,
    benchmark_hmpi_scoring,
    benchmark_aggregation_by_size
);
criterion_main!(benches);
