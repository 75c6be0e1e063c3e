use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use rand_distr::Normal;
use trend_core::Series;
use trend_segment::{
    DivideConquerSegmenter, ModelSearchParameters, ModelSearchSegmenter, Segmenter,
};

/// Rise-then-fall series with Gaussian noise, peaking at the midpoint
fn generate_peaked_series(size: usize, seed: u64) -> Series {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 3.0).unwrap();
    let peak = size / 2;
    let xs: Vec<i64> = (0..size).map(|i| 1990 + i as i64).collect();
    let ys: Vec<f64> = (0..size)
        .map(|i| {
            let base = if i <= peak {
                (i * 10) as f64
            } else {
                ((2 * peak).saturating_sub(i) * 10) as f64
            };
            (base + noise.sample(&mut rng)).max(0.0)
        })
        .collect();
    Series::new(xs, ys).unwrap()
}

fn bench_divide_conquer(c: &mut Criterion) {
    let mut group = c.benchmark_group("DivideConquer");
    for size in [16, 32, 64, 128] {
        let series = generate_peaked_series(size, 42);
        let segmenter = DivideConquerSegmenter::new();
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, series| {
            b.iter(|| segmenter.segment(black_box(series)).unwrap());
        });
    }
    group.finish();
}

fn bench_model_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("ModelSearch");
    group.sample_size(10);
    for size in [16, 32, 64] {
        let series = generate_peaked_series(size, 42);
        let params = ModelSearchParameters {
            max_breakpoints: 5,
            n_boot: 50,
            seed: Some(42),
            ..Default::default()
        };
        let segmenter = ModelSearchSegmenter::with_params(params);
        group.bench_with_input(BenchmarkId::from_parameter(size), &series, |b, series| {
            b.iter(|| segmenter.segment(black_box(series)).unwrap());
        });
    }
    group.finish();
}

criterion_group!(benches, bench_divide_conquer, bench_model_search);
criterion_main!(benches);
