use chemreg_id::{
    Allocator, AllocatorConfig, Domain, IdentifierFormat, MemorySequenceStore, SequenceStore,
    weighted_digit_checksum,
};
use core::hint::black_box;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::{thread::scope, time::Instant};

// Number of identifiers produced per benchmark iteration (per-thread for
// multi-threaded).
const TOTAL_IDS: usize = 4096;

fn bench_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));
    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for n in 2_000_000..2_000_000 + TOTAL_IDS as u64 {
                black_box(weighted_digit_checksum(black_box(n)));
            }
        });
    });
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let format = IdentifierFormat::new("DTX", Domain::Compound).unwrap();
    let ids: Vec<String> = (0..TOTAL_IDS as u64)
        .map(|n| format.build(2_000_000 + n))
        .collect();

    let mut group = c.benchmark_group("format");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));
    group.bench_function(format!("build/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for n in 0..TOTAL_IDS as u64 {
                black_box(format.build(black_box(2_000_000 + n)));
            }
        });
    });
    group.bench_function(format!("parse/{TOTAL_IDS}"), |b| {
        b.iter(|| {
            for id in &ids {
                black_box(format.parse(black_box(id)).unwrap());
            }
        });
    });
    group.finish();
}

/// Benchmarks the hot path where the counter is always present.
fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");
    group.throughput(Throughput::Elements(TOTAL_IDS as u64));

    group.bench_function(format!("elems/{TOTAL_IDS}"), |b| {
        b.iter_custom(|iters| {
            let store = MemorySequenceStore::new();
            let allocator = Allocator::new(
                AllocatorConfig::new(Domain::Compound),
                &store,
                Vec::<String>::new(),
            )
            .unwrap();
            allocator.allocate_payload().unwrap();

            let start = Instant::now();
            for _ in 0..iters {
                for _ in 0..TOTAL_IDS {
                    black_box(allocator.build_identifier(None).unwrap());
                }
            }
            start.elapsed()
        });
    });

    for threads in [2, 4, 8] {
        group.throughput(Throughput::Elements((TOTAL_IDS * threads) as u64));
        group.bench_function(format!("threads/{threads}/elems/{TOTAL_IDS}"), |b| {
            b.iter_custom(|iters| {
                let store = MemorySequenceStore::new();
                store
                    .set_if_absent("compound_seq", 1_999_999, core::time::Duration::MAX)
                    .unwrap();
                let allocator = Allocator::new(
                    AllocatorConfig::new(Domain::Compound),
                    &store,
                    Vec::<String>::new(),
                )
                .unwrap();

                let start = Instant::now();
                for _ in 0..iters {
                    scope(|s| {
                        for _ in 0..threads {
                            s.spawn(|| {
                                for _ in 0..TOTAL_IDS {
                                    black_box(allocator.allocate_payload().unwrap());
                                }
                            });
                        }
                    });
                }
                start.elapsed()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_checksum, bench_format, bench_allocate);
criterion_main!(benches);
