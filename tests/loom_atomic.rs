//! Model-checked interleavings. Run with:
//!
//! ```text
//! RUSTFLAGS="--cfg loom" cargo test --release --test loom_atomic
//! ```
#![cfg(loom)]

use halo_atomic::{Atomic, LoadOrdering, StoreOrdering, UpdateOrdering};
use loom::sync::Arc;
use loom::thread;

#[test]
fn release_acquire_publication() {
    loom::model(|| {
        let payload = Arc::new(Atomic::new(0u32));
        let ready = Arc::new(Atomic::new(false));

        let writer = {
            let payload = Arc::clone(&payload);
            let ready = Arc::clone(&ready);
            thread::spawn(move || {
                payload.store(42, StoreOrdering::Relaxed);
                ready.store(true, StoreOrdering::Releasing);
            })
        };

        if ready.load(LoadOrdering::Acquiring) {
            assert_eq!(payload.load(LoadOrdering::Relaxed), 42);
        }
        writer.join().unwrap();
    });
}

#[test]
fn two_swappers_exchange_distinct_values() {
    loom::model(|| {
        let cell = Arc::new(Atomic::new(0u8));

        let other = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || cell.swap(1, UpdateOrdering::AcquiringAndReleasing))
        };
        let mine = cell.swap(2, UpdateOrdering::AcquiringAndReleasing);
        let theirs = other.join().unwrap();
        let last = cell.load(LoadOrdering::Acquiring);

        let mut seen = [mine, theirs, last];
        seen.sort_unstable();
        assert_eq!(seen, [0, 1, 2]);
    });
}

#[test]
fn fetch_update_counts_every_increment() {
    loom::model(|| {
        let cell = Arc::new(Atomic::new(0usize));

        let handles: Vec<_> = (0..2)
            .map(|_| {
                let cell = Arc::clone(&cell);
                thread::spawn(move || {
                    let _ = cell.fetch_update(
                        UpdateOrdering::AcquiringAndReleasing,
                        LoadOrdering::Acquiring,
                        |v| Some(v + 1),
                    );
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cell.load(LoadOrdering::Acquiring), 2);
    });
}

#[test]
fn owned_box_is_released_by_whoever_ends_up_with_it() {
    loom::model(|| {
        let cell = Arc::new(Atomic::new(Box::new(0u8)));

        let other = {
            let cell = Arc::clone(&cell);
            thread::spawn(move || drop(cell.swap(Box::new(1), UpdateOrdering::AcquiringAndReleasing)))
        };
        drop(cell.swap(Box::new(2), UpdateOrdering::AcquiringAndReleasing));
        other.join().unwrap();
    });
}

#[test]
fn exclusive_access_on_flag_cells() {
    loom::model(|| {
        let mut flag = Atomic::new(false);
        flag.store(true, StoreOrdering::Relaxed);
        assert!(flag.with_mut(|v| std::mem::replace(v, false)));
        assert!(!flag.into_inner());

        // Dropping the last shared handle runs the cell's exclusive read.
        let shared = Arc::new(Atomic::new(true));
        let reader = {
            let shared = Arc::clone(&shared);
            thread::spawn(move || shared.fetch_not(UpdateOrdering::AcquiringAndReleasing))
        };
        let before = reader.join().unwrap();
        assert!(before);
        assert!(!shared.load(LoadOrdering::Acquiring));
    });
}
