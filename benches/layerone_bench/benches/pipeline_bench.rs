//! Validation pipeline benchmarks
//!
//! Measures a full pipeline run per request for each stage outcome, and how
//! the type and business stages scale with sequence length.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use layerone_core::{Request, TestRequest};
use layerone_validate::{predicates, Rule, Settings, Validator};
use serde_json::{json, Value};

fn user_validator() -> Validator {
    Validator::body(vec![
        Rule::new("id")
            .of_type(predicates::is_number)
            .biz(predicates::is_positive_integer),
        Rule::new("username")
            .of_type(predicates::is_string)
            .biz(predicates::is_username),
    ])
    .unwrap()
    .with_settings(Settings::default().log_faults(false))
}

fn post(body: Value) -> Request {
    TestRequest::post("/user").json(&body).build()
}

/// Benchmark one request per outcome
fn bench_outcomes(c: &mut Criterion) {
    let mut group = c.benchmark_group("outcome");
    let validator = user_validator();

    let cases = [
        ("pass", post(json!({ "id": 3, "username": "vikcch" }))),
        ("presence", post(json!({ "id": 3, "username": "vikcch", "admin": true }))),
        ("type", post(json!({ "id": "3", "username": "vikcch" }))),
        ("business", post(json!({ "id": 3, "username": "vik" }))),
        (
            "fatal",
            TestRequest::post("/user").body(r#"{"id":3}"#).build(),
        ),
    ];

    for (name, req) in cases.iter() {
        group.bench_function(*name, |b| b.iter(|| validator.check(black_box(req))));
    }

    group.finish();
}

/// Benchmark sequence values of growing length
fn bench_sequences(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence_items");

    let validator = Validator::body(vec![Rule::new("values")
        .of_type(predicates::is_object)
        .biz(predicates::is_coords)])
    .unwrap();

    for len in [1usize, 10, 100, 1000].iter() {
        let values: Vec<Value> = (1..=*len).map(|n| json!({ "x": n, "y": n })).collect();
        let req = post(json!({ "values": values }));

        group.bench_with_input(BenchmarkId::new("coords", len), &req, |b, req| {
            b.iter(|| validator.check(black_box(req)))
        });
    }

    group.finish();
}

/// Benchmark binding, including the sentinel self-check
fn bench_bind(c: &mut Criterion) {
    c.bench_function("bind", |b| b.iter(|| black_box(user_validator())));
}

criterion_group!(benches, bench_outcomes, bench_sequences, bench_bind);
criterion_main!(benches);
