//! Feature extraction benchmarks
//!
//! Run with: cargo bench -p corr-features --bench extract_bench

use corr_features::{Complex64, DetectionEvent, FeatureExtractor};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn synthetic_correlation(len: usize, lag: usize) -> Vec<Complex64> {
    (0..len)
        .map(|i| {
            let offset = i.abs_diff(lag);
            let magnitude = if offset % 80 == 0 && offset <= 160 {
                10.0
            } else {
                1.0 + 0.2 * (0.9 * i as f64).sin()
            };
            Complex64::from_polar(magnitude, 0.3 * i as f64)
        })
        .collect()
}

fn bench_single_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    let extractor = FeatureExtractor::default();

    for len in [320usize, 1024, 4096, 16384] {
        let lag = len / 2;
        let corr = synthetic_correlation(len, lag);
        group.throughput(Throughput::Elements(len as u64));
        group.bench_with_input(BenchmarkId::new("len", len), &corr, |b, corr| {
            b.iter(|| extractor.extract(black_box(corr), black_box(lag)))
        });
    }

    group.finish();
}

fn bench_batch_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_batch");
    let extractor = FeatureExtractor::default();
    let signals: Vec<Vec<Complex64>> = (0..256).map(|_| synthetic_correlation(2048, 1024)).collect();
    let events: Vec<DetectionEvent> = signals
        .iter()
        .map(|corr| DetectionEvent::new(corr, 1024))
        .collect();

    group.throughput(Throughput::Elements(events.len() as u64));
    group.bench_function("256_events", |b| {
        b.iter(|| extractor.extract_batch(black_box(&events)))
    });

    group.finish();
}

criterion_group!(benches, bench_single_extraction, bench_batch_extraction);
criterion_main!(benches);
