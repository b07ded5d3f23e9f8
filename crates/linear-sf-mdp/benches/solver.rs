use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use linear_sf_agent::LinearSfAgent;
use linear_sf_core::EnvironmentConfig;
use linear_sf_env::RandomWalkChain;
use linear_sf_mdp::{Evaluator, GroundTruth};

fn chain(n_states: usize) -> RandomWalkChain {
    let config = EnvironmentConfig::with_seed(0).param("n_states", n_states);
    RandomWalkChain::new(config).expect("valid chain config")
}

fn bench_ground_truth(c: &mut Criterion) {
    let mut group = c.benchmark_group("ground_truth");
    for n_states in [20, 100, 400] {
        let env = chain(n_states);
        group.bench_with_input(BenchmarkId::from_parameter(n_states), &env, |b, env| {
            b.iter(|| GroundTruth::solve(black_box(env), 0.9).expect("solvable chain"));
        });
    }
    group.finish();
}

fn bench_evaluate(c: &mut Criterion) {
    let env = chain(100);
    let truth = GroundTruth::solve(&env, 0.9).expect("solvable chain");
    let agent = LinearSfAgent::from_successor_features(
        truth.linear_sf_param.clone(),
        truth.linear_reward_param.clone(),
    )
    .expect("square parameters");
    let evaluator = Evaluator::new(&env).expect("consistent model");

    c.bench_function("evaluate_100", |b| {
        b.iter(|| evaluator.evaluate(black_box(&agent), &truth).expect("evaluation"));
    });
}

criterion_group!(benches, bench_ground_truth, bench_evaluate);
criterion_main!(benches);
