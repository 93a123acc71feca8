//! Criterion benchmarks for questionnaire scoring.
//!
//! Run benchmarks with:
//! ```bash
//! cargo bench --package persona-scorer
//! ```

// Criterion macros generate code that triggers missing_docs warnings.
#![allow(missing_docs, reason = "Criterion macros generate undocumented code")]

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use persona_core::test_support::sample_answers;
use persona_scorer::{Classifier, CoefficientTable, Normalizer, score_answers};

fn bench_scoring(c: &mut Criterion) {
    let Ok(table) = CoefficientTable::builtin() else {
        return;
    };
    let answers = sample_answers();
    let normalizer = Normalizer::default();
    let features = normalizer.normalize(&answers);

    let mut group = c.benchmark_group("scoring");
    group.bench_function("normalize", |b| {
        b.iter(|| normalizer.normalize(black_box(&answers)));
    });
    group.bench_function("classify", |b| {
        let classifier = Classifier::new(table);
        b.iter(|| classifier.classify(black_box(&features)));
    });
    group.bench_function("score_answers", |b| {
        b.iter(|| score_answers(black_box(&answers), table));
    });
    group.finish();
}

criterion_group!(benches, bench_scoring);
criterion_main!(benches);
