// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// BENCHMARK SUITE — waterfall-core
//
// Measures a full round across fund sizes, and request parsing.
// Run: cargo bench -p waterfall-core
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use waterfall_core::{
    calculate_waterfall, parse_request, Bps, DistributionRequest, FundTerms, Investor,
};

fn fund(num_investors: usize) -> DistributionRequest {
    let contributed = NaiveDate::from_ymd_opt(2021, 3, 15).unwrap();
    let mut req = DistributionRequest::new(
        NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        (num_investors as u128) * 175_000 * 100,
    )
    .with_terms(&FundTerms::standard(
        "Bench Fund",
        Bps(800),
        Bps(2000),
        Bps(2000),
        Bps(8000),
    ));
    for i in 0..num_investors {
        req.investors.push(Investor::new(
            &format!("INV-{:05}", i),
            &format!("Investor {}", i),
            i % 10 == 0,
            (100_000 + (i as u128 % 7) * 25_000) * 100,
            contributed,
        ));
    }
    req
}

// ─────────────────────────────────────────────────────────────────
// FULL ROUND
// ─────────────────────────────────────────────────────────────────

fn bench_full_round(c: &mut Criterion) {
    let mut group = c.benchmark_group("waterfall/full_round");
    for num_investors in [10usize, 100, 1_000] {
        let req = fund(num_investors);
        group.bench_with_input(
            BenchmarkId::new("investors", num_investors),
            &req,
            |b, req| b.iter(|| black_box(calculate_waterfall(req))),
        );
    }
    group.finish();
}

// ─────────────────────────────────────────────────────────────────
// PARSING
// ─────────────────────────────────────────────────────────────────

fn bench_parse_request(c: &mut Criterion) {
    let json = serde_json::to_string(&fund(100)).unwrap_or_default();
    c.bench_function("request/parse_100_investors", |b| {
        b.iter(|| black_box(parse_request(&json)))
    });
}

criterion_group!(benches, bench_full_round, bench_parse_request);
criterion_main!(benches);
