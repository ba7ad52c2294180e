use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use crossbeam_utils::CachePadded;
use halo_atomic::{Atomic, LoadOrdering, StoreOrdering, UpdateOrdering, WordPair};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;

const OPS: u64 = 10_000;

fn bench_uncontended(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");
    group.throughput(Throughput::Elements(OPS));

    group.bench_function("std_atomic_u64_fetch_add", |b| {
        let counter = AtomicU64::new(0);
        b.iter(|| {
            for _ in 0..OPS {
                black_box(counter.fetch_add(1, Ordering::AcqRel));
            }
        })
    });

    group.bench_function("atomic_u64_fetch_add", |b| {
        let counter = Atomic::new(0u64);
        b.iter(|| {
            for _ in 0..OPS {
                black_box(counter.fetch_add(1, UpdateOrdering::AcquiringAndReleasing));
            }
        })
    });

    group.bench_function("atomic_u64_load_store", |b| {
        let cell = Atomic::new(0u64);
        b.iter(|| {
            for i in 0..OPS {
                cell.store(i, StoreOrdering::Releasing);
                black_box(cell.load(LoadOrdering::Acquiring));
            }
        })
    });

    group.bench_function("atomic_f64_fetch_update", |b| {
        let cell = Atomic::new(0.0f64);
        b.iter(|| {
            for _ in 0..OPS {
                let _ = black_box(cell.fetch_update(
                    UpdateOrdering::AcquiringAndReleasing,
                    LoadOrdering::Acquiring,
                    |v| Some(v + 0.5),
                ));
            }
        })
    });

    group.bench_function("atomic_word_pair_cas", |b| {
        let cell = Atomic::new(WordPair::default());
        b.iter(|| {
            for _ in 0..OPS {
                let current = cell.load(LoadOrdering::Relaxed);
                let next = WordPair::new(current.first + 1, current.second);
                black_box(cell.compare_exchange_cas(current, next).is_ok());
            }
        })
    });

    group.bench_function("atomic_arc_swap", |b| {
        let handle = Arc::new(0u64);
        let cell = Atomic::new(Arc::clone(&handle));
        b.iter(|| {
            for _ in 0..OPS {
                drop(cell.swap(Arc::clone(&handle), UpdateOrdering::AcquiringAndReleasing));
            }
        })
    });

    group.finish();
}

fn bench_contended(c: &mut Criterion) {
    let mut group = c.benchmark_group("contended");

    for threads in [2usize, 4, 8] {
        group.throughput(Throughput::Elements(OPS * threads as u64));

        group.bench_with_input(BenchmarkId::new("fetch_add", threads), &threads, |b, &threads| {
            let counter = CachePadded::new(Atomic::new(0u64));
            b.iter(|| {
                thread::scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            for _ in 0..OPS {
                                counter.fetch_add(1, UpdateOrdering::Relaxed);
                            }
                        });
                    }
                });
            })
        });

        group.bench_with_input(BenchmarkId::new("cas_loop", threads), &threads, |b, &threads| {
            let counter = CachePadded::new(Atomic::new(0u64));
            b.iter(|| {
                thread::scope(|s| {
                    for _ in 0..threads {
                        s.spawn(|| {
                            for _ in 0..OPS {
                                let _ = counter.fetch_update(
                                    UpdateOrdering::Relaxed,
                                    LoadOrdering::Relaxed,
                                    |v| Some(v + 1),
                                );
                            }
                        });
                    }
                });
            })
        });

        group.bench_with_input(BenchmarkId::new("padded_per_thread", threads), &threads, |b, &threads| {
            let counters: Vec<CachePadded<Atomic<u64>>> =
                (0..threads).map(|_| CachePadded::new(Atomic::new(0))).collect();
            b.iter(|| {
                thread::scope(|s| {
                    for counter in &counters {
                        s.spawn(move || {
                            for _ in 0..OPS {
                                counter.fetch_add(1, UpdateOrdering::Relaxed);
                            }
                        });
                    }
                });
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_uncontended, bench_contended);
criterion_main!(benches);
