use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use matchflow::events::parse_match_events_json;
use matchflow::fake_events::synthetic_match_json;
use matchflow::matrix::TransitionMatrix;
use matchflow::transitions::extract_transitions;

static MATCH_EVENTS_JSON: &str = include_str!("../tests/fixtures/match_events.json");

fn bench_fixture_parse(c: &mut Criterion) {
    c.bench_function("fixture_parse", |b| {
        b.iter(|| {
            let events = parse_match_events_json(black_box(MATCH_EVENTS_JSON)).unwrap();
            black_box(events.len());
        })
    });
}

fn bench_full_match_parse(c: &mut Criterion) {
    let raw = synthetic_match_json(11, 3000, 1, 2);
    c.bench_function("full_match_parse", |b| {
        b.iter(|| {
            let events = parse_match_events_json(black_box(&raw)).unwrap();
            black_box(events.len());
        })
    });
}

fn bench_transition_extract(c: &mut Criterion) {
    let raw = synthetic_match_json(11, 3000, 1, 2);
    let events = parse_match_events_json(&raw).unwrap();
    c.bench_function("transition_extract", |b| {
        b.iter(|| {
            let transitions = extract_transitions(black_box(&events));
            black_box(transitions.len());
        })
    });
}

fn bench_matrix_build(c: &mut Criterion) {
    let raw = synthetic_match_json(11, 3000, 1, 2);
    let events = parse_match_events_json(&raw).unwrap();
    let transitions = extract_transitions(&events);
    c.bench_function("matrix_build", |b| {
        b.iter(|| {
            let matrix = TransitionMatrix::from_transitions(black_box(&transitions));
            black_box(matrix.labels().len());
        })
    });
}

fn bench_matrix_csv_parse(c: &mut Criterion) {
    let raw = synthetic_match_json(11, 3000, 1, 2);
    let events = parse_match_events_json(&raw).unwrap();
    let csv = TransitionMatrix::from_transitions(&extract_transitions(&events)).to_csv();
    c.bench_function("matrix_csv_parse", |b| {
        b.iter(|| {
            let matrix = TransitionMatrix::from_csv(black_box(&csv)).unwrap();
            black_box(matrix.labels().len());
        })
    });
}

criterion_group!(
    perf,
    bench_fixture_parse,
    bench_full_match_parse,
    bench_transition_extract,
    bench_matrix_build,
    bench_matrix_csv_parse
);
criterion_main!(perf);
