use std::time::Duration;

use bopgraph::{
    GraphOrError, PatternMinerConfig,
    bench_utils::{GraphShape, generate_graph},
    mining::{TopKOptions, top_k},
    run_pattern_miner,
};
use criterion::{Criterion, criterion_group, criterion_main};
use rand::{Rng, SeedableRng, rngs::StdRng};

const DB_SEED: u64 = 0xE550;
const SF_SEED: u64 = 0xF661;
const SAMPLE_SIZE: usize = 20;
const WARM_UP: Duration = Duration::from_millis(300);
const MEASURE: Duration = Duration::from_millis(500);

fn bench_scale() -> usize {
    #[cfg(feature = "bench-ci")]
    {
        40
    }
    #[cfg(not(feature = "bench-ci"))]
    {
        150
    }
}

fn random_db(sequences: usize, items: usize, seed: u64) -> Vec<Vec<usize>> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..sequences)
        .map(|_| {
            let mut row: Vec<usize> = (0..items).filter(|_| rng.gen_bool(0.3)).collect();
            row.sort_unstable();
            row
        })
        .collect()
}

fn bench_top_k(c: &mut Criterion) {
    let db = random_db(bench_scale(), 24, DB_SEED);
    let options = TopKOptions {
        closed: true,
        min_length: 1,
        max_length: 1000,
    };
    let mut group = c.benchmark_group("top_k");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    for k in [10, 100] {
        group.bench_function(format!("closed_k{k}"), |b| {
            b.iter(|| top_k(&db, k, options));
        });
    }
    group.finish();
}

fn bench_pattern_miner(c: &mut Criterion) {
    let nodes = bench_scale();
    let batch: Vec<GraphOrError> = (0..3)
        .map(|offset| {
            Ok(generate_graph(GraphShape::ScaleFree { m: 2 }, nodes, SF_SEED + offset)
                .expect("sf graph"))
        })
        .collect();
    let config = PatternMinerConfig::default();
    let mut group = c.benchmark_group("pattern_miner");
    group.sample_size(SAMPLE_SIZE);
    group.warm_up_time(WARM_UP);
    group.measurement_time(MEASURE);
    group.bench_function("scalefree_batch", |b| {
        b.iter(|| run_pattern_miner(&batch, &config).expect("mine"));
    });
    group.finish();
}

criterion_group!(benches, bench_top_k, bench_pattern_miner);
criterion_main!(benches);
