//! Criterion benchmarks for tierdraw-core.
//!
//! Covers: fixed-point multiply/divide and pseudo-random preimage hashing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use tierdraw_core::crypto::{encode_preimage_v1, Blake3DrawHasher, Sha256DrawHasher};
use tierdraw_core::fixed::UFixed18;
use tierdraw_core::traits::DrawHasher;
use tierdraw_core::types::{AccountId, WinningRandomNumber};

fn bench_fixed_mul(c: &mut Criterion) {
    let a = UFixed18::from_ratio(10, 3).unwrap();
    let b = UFixed18::from_int(1_000_000).unwrap();

    c.bench_function("ufixed_mul", |bench| {
        bench.iter(|| black_box(a).checked_mul(black_box(b)))
    });
}

fn bench_fixed_div(c: &mut Criterion) {
    let a = UFixed18::from_int(1_000_000).unwrap();
    let b = UFixed18::from_ratio(22, 7).unwrap();

    c.bench_function("ufixed_div", |bench| {
        bench.iter(|| black_box(a).checked_div(black_box(b)))
    });
}

fn bench_preimage_hash(c: &mut Criterion) {
    let user = AccountId::from([0x11; 32]);
    let random = WinningRandomNumber::from_be_bytes([0xCC; 32]);

    c.bench_function("preimage_sha256", |b| {
        b.iter(|| Sha256DrawHasher.hash(&encode_preimage_v1(black_box(&user), 3, black_box(&random))))
    });
    c.bench_function("preimage_blake3", |b| {
        b.iter(|| Blake3DrawHasher.hash(&encode_preimage_v1(black_box(&user), 3, black_box(&random))))
    });
}

criterion_group!(benches, bench_fixed_mul, bench_fixed_div, bench_preimage_hash);
criterion_main!(benches);
