//! Benchmarks for strategy generation and profile scoring
//!
//! Run with: cargo bench --package sources

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use pipeline::{QualityFilter, quality_score};
use scout_model::{KeywordBundle, RawProfile};
use sources::{SearchContext, StrategyBuilder};

fn create_bench_bundle() -> KeywordBundle {
    KeywordBundle {
        core_languages: vec!["Python".into(), "Go".into(), "Rust".into()],
        primary_frameworks: vec!["Django".into(), "FastAPI".into(), "Axum".into()],
        related_technologies: vec![
            "PostgreSQL".into(),
            "Redis".into(),
            "Kafka".into(),
            "Docker".into(),
            "Kubernetes".into(),
            "AWS".into(),
        ],
        repository_topics: vec![
            "machine learning".into(),
            "mlops".into(),
            "data pipeline".into(),
        ],
        domain_keywords: vec!["ml engineer".into(), "data platform".into()],
        seniority: None,
        alternative_terms: vec!["k8s".into(), "postgres".into()],
    }
}

fn create_bench_profiles() -> Vec<RawProfile> {
    (0..500u32)
        .map(|i| RawProfile {
            login: format!("user{}", i),
            name: (i % 2 == 0).then(|| format!("User {}", i)),
            bio: Some("Backend engineer working on data platforms".to_string()),
            location: (i % 3 == 0).then(|| "Berlin".to_string()),
            public_repos: i % 40,
            followers: i % 150,
            following: i % 60,
            ..Default::default()
        })
        .collect()
}

fn bench_build_strategies(c: &mut Criterion) {
    let context = SearchContext::new(create_bench_bundle())
        .with_location(Some("San Francisco"))
        .with_seen_count(40);
    let builder = StrategyBuilder::new().with_seed(42);

    c.bench_function("build_strategies", |b| {
        b.iter(|| {
            let strategies = builder.build(black_box(&context));
            black_box(strategies)
        })
    });
}

fn bench_quality_score(c: &mut Criterion) {
    let profiles = create_bench_profiles();

    c.bench_function("quality_score_500", |b| {
        b.iter(|| {
            let total: u32 = profiles
                .iter()
                .map(|p| quality_score(black_box(p)) as u32)
                .sum();
            black_box(total)
        })
    });
}

fn bench_screen_profiles(c: &mut Criterion) {
    let profiles = create_bench_profiles();
    let filter = QualityFilter::new();

    c.bench_function("screen_500", |b| {
        b.iter(|| {
            let passed = profiles
                .iter()
                .filter(|p| filter.screen(black_box(p)).is_ok())
                .count();
            black_box(passed)
        })
    });
}

criterion_group!(
    benches,
    bench_build_strategies,
    bench_quality_score,
    bench_screen_profiles
);
criterion_main!(benches);
