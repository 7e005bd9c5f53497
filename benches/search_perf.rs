//! Criterion benchmarks for performance-critical paths.
//!
//! Targets:
//! - hash_embedding: < 1μs per short profile text
//! - fusion: < 1ms for merging two 100-entry branches
//! - scoring: < 1ms for ranking 100 enriched results

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use scout::embed::HashEmbedder;
use scout::scoring;
use scout::search::fusion::merge_results;
use scout::search::{EnrichedResult, MatchSource, SearchMatch};
use scout::test_utils::creator;

fn hash_embedding_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_embedding");

    let embedder = HashEmbedder::new(384);

    for size in [10, 100, 500].iter() {
        let input: String = "creator ".repeat(*size);

        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_with_input(BenchmarkId::new("text_size", size), &input, |b, input| {
            b.iter(|| embedder.embed_text(black_box(input)));
        });
    }

    group.finish();
}

fn fusion_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("fusion");

    let vector: Vec<SearchMatch> = (0..100)
        .map(|i| SearchMatch {
            creator_id: format!("c{i}"),
            score: 1.0 - (i as f32) * 0.005,
            metadata: None,
        })
        .collect();
    // half the keyword branch overlaps the vector branch
    let keyword: Vec<SearchMatch> = (50..150)
        .map(|i| SearchMatch {
            creator_id: format!("c{i}"),
            score: 1.0 / (1.0 + (i - 50) as f32),
            metadata: None,
        })
        .collect();

    group.throughput(Throughput::Elements(200));
    group.bench_function("merge_100x100", |b| {
        b.iter(|| merge_results(black_box(&vector), black_box(&keyword), 1.2));
    });

    group.finish();
}

fn scoring_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("scoring");

    let results: Vec<EnrichedResult> = (0..100u32)
        .map(|i| {
            let mut record = creator(
                &format!("c{i}"),
                "Bench",
                "education",
                "youtube",
                u64::from(i) * 17_000,
                f64::from(i) * 0.09,
            );
            record.collaborations = i;
            EnrichedResult {
                creator: record,
                combined_score: (i as f32) / 100.0,
                source: MatchSource::Hybrid,
            }
        })
        .collect();

    group.throughput(Throughput::Elements(results.len() as u64));
    group.bench_function("rank_100", |b| {
        b.iter(|| scoring::rank(black_box(&results)));
    });

    group.finish();
}

criterion_group!(
    benches,
    hash_embedding_benchmarks,
    fusion_benchmarks,
    scoring_benchmarks
);
criterion_main!(benches);
