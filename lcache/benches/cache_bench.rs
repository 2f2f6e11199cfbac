//! Criterion benchmarks for lcache: fast-path hits, load-on-miss, direct set.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use lcache::{CacheConfig, ExpireVal, LoadError, LocalCache};

fn config() -> CacheConfig {
    CacheConfig::new(Duration::from_secs(300), Duration::ZERO)
}

fn bench_hit(c: &mut Criterion) {
    let cache = LocalCache::with_loader(
        &config(),
        |key: &str| -> Result<ExpireVal<usize>, LoadError> { Ok(ExpireVal::never(key.len())) },
    );
    cache.get("alice.eth").unwrap();

    let mut g = c.benchmark_group("hit");
    g.throughput(Throughput::Elements(1));
    g.bench_function("get", |b| {
        b.iter(|| black_box(cache.get(black_box("alice.eth"))).unwrap());
    });
    g.bench_function("get_from_cache", |b| {
        b.iter(|| black_box(cache.get_from_cache(black_box("alice.eth"))));
    });
    g.finish();
}

fn bench_miss(c: &mut Criterion) {
    let cache: LocalCache<usize> = LocalCache::new(&config());
    let loader =
        |key: &str| -> Result<ExpireVal<usize>, LoadError> { Ok(ExpireVal::never(key.len())) };
    let keys: Vec<String> = (0..1024).map(|i| format!("key-{i}")).collect();

    let mut g = c.benchmark_group("miss");
    g.throughput(Throughput::Elements(1));
    g.bench_function("get_with_loader", |b| {
        let mut i = 0usize;
        b.iter(|| {
            if i % keys.len() == 0 {
                cache.store().flush();
            }
            let key = &keys[i % keys.len()];
            i += 1;
            black_box(cache.get_with_loader(key, &loader)).unwrap()
        });
    });
    g.finish();
}

fn bench_set(c: &mut Criterion) {
    let cache: LocalCache<u64> = LocalCache::new(&config());
    let mut g = c.benchmark_group("set");
    g.throughput(Throughput::Elements(1));
    g.bench_function("set", |b| {
        b.iter(|| cache.set("alice.eth", ExpireVal::new(black_box(7), Duration::from_secs(60))));
    });
    g.finish();
}

criterion_group!(benches, bench_hit, bench_miss, bench_set);
criterion_main!(benches);
