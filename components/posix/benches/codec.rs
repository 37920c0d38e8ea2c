use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use posix::{split_env_pairs, WaitStatus};

fn bench_split_env_pairs(c: &mut Criterion) {
    let pairs: Vec<String> = (0..64).map(|i| format!("VAR_{i}=value={i}")).collect();
    c.bench_function("split_env_pairs/64", |b| {
        b.iter(|| split_env_pairs(black_box(&pairs)))
    });
}

fn bench_wait_status(c: &mut Criterion) {
    c.bench_function("wait_status/pack_unpack", |b| {
        b.iter(|| {
            let status = WaitStatus::exited_with(black_box(7));
            (status.exited(), status.exit_status())
        })
    });
}

criterion_group!(benches, bench_split_env_pairs, bench_wait_status);
criterion_main!(benches);
