//! Benchmarks for pattern derivation and grouping.
//!
//! Grouping is recomputed on every read, so its cost against a
//! retention-capped collection is the panel's main per-render expense.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use netpanel::ingest::RequestDraft;
use netpanel::models::ResourceType;
use netpanel::pattern::pattern_of;
use netpanel::store::RequestStore;
use std::collections::HashMap;

fn draft(url: &str, start_time: i64) -> RequestDraft {
    RequestDraft {
        url: url.to_string(),
        method: "GET".to_string(),
        status: 200,
        status_text: "OK".to_string(),
        request_headers: HashMap::new(),
        response_headers: HashMap::new(),
        request_body: None,
        response_body: None,
        start_time,
        end_time: start_time + 10,
        duration: 10,
        size: 0,
        resource_type: ResourceType::Xhr,
        initiator: "unknown".to_string(),
        page_url: "https://example.com/".to_string(),
    }
}

fn populated_store(request_count: i64) -> RequestStore {
    let mut store = RequestStore::new();
    for i in 0..request_count {
        let url = match i % 3 {
            0 => format!("https://api.example.com/users/{}", i),
            1 => format!(
                "https://api.example.com/items/550e8400-e29b-41d4-a716-4466554400{:02}",
                i % 100
            ),
            _ => "https://api.example.com/orders".to_string(),
        };
        store.add(draft(&url, i));
    }
    store
}

fn bench_pattern_of(c: &mut Criterion) {
    c.bench_function("pattern_of numeric id", |b| {
        b.iter(|| pattern_of(black_box("https://api.example.com/users/12345/orders")))
    });

    c.bench_function("pattern_of uuid", |b| {
        b.iter(|| {
            pattern_of(black_box(
                "https://api.example.com/items/550e8400-e29b-41d4-a716-446655440000",
            ))
        })
    });

    c.bench_function("pattern_of unparseable", |b| {
        b.iter(|| pattern_of(black_box("not a url at all")))
    });
}

fn bench_group_by_pattern(c: &mut Criterion) {
    let store = populated_store(1_000);
    c.bench_function("group_by_pattern 1k requests", |b| {
        b.iter(|| black_box(store.group_by_pattern()))
    });
}

criterion_group!(benches, bench_pattern_of, bench_group_by_pattern);
criterion_main!(benches);
