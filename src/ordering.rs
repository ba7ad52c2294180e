//! Typed memory-ordering selectors.
//!
//! `core::sync::atomic::Ordering` accepts every ordering for every operation
//! and panics at runtime on nonsense such as a releasing load. These selectors
//! carry only the orderings an operation class can honor, so an invalid choice
//! does not type-check.

use core::fmt;

use crate::sync::Ordering;

/// Ordering for operations that only read: [`Atomic::load`](crate::Atomic::load)
/// and the failure path of a compare-exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadOrdering {
    /// No ordering constraints beyond atomicity.
    Relaxed,
    /// Later reads and writes cannot be reordered before this load.
    Acquiring,
    /// Acquiring, and part of the single total order of sequentially
    /// consistent operations.
    SequentiallyConsistent,
}

/// Ordering for operations that only write: [`Atomic::store`](crate::Atomic::store).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOrdering {
    /// No ordering constraints beyond atomicity.
    Relaxed,
    /// Earlier reads and writes cannot be reordered after this store.
    Releasing,
    /// Releasing, and part of the single total order of sequentially
    /// consistent operations.
    SequentiallyConsistent,
}

/// Ordering for read-modify-write operations: swaps, compare-exchanges and
/// the fetch operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UpdateOrdering {
    /// No ordering constraints beyond atomicity.
    Relaxed,
    /// The read half acquires.
    Acquiring,
    /// The write half releases.
    Releasing,
    /// The read half acquires and the write half releases.
    AcquiringAndReleasing,
    /// Acquiring and releasing, and part of the single total order of
    /// sequentially consistent operations.
    SequentiallyConsistent,
}

impl LoadOrdering {
    /// Returns `true` if this is usable as the failure ordering of a
    /// compare-exchange whose success ordering is `success`.
    ///
    /// The failure path only reads, and it may not synchronize more strongly
    /// than the success path would have.
    #[inline]
    pub const fn is_valid_failure_for(self, success: UpdateOrdering) -> bool {
        match self {
            LoadOrdering::Relaxed => true,
            LoadOrdering::Acquiring => matches!(
                success,
                UpdateOrdering::Acquiring
                    | UpdateOrdering::AcquiringAndReleasing
                    | UpdateOrdering::SequentiallyConsistent
            ),
            LoadOrdering::SequentiallyConsistent => {
                matches!(success, UpdateOrdering::SequentiallyConsistent)
            }
        }
    }
}

impl UpdateOrdering {
    /// The strongest failure ordering a compare-exchange with this success
    /// ordering may use.
    ///
    /// The write half is dropped: `Releasing` becomes `Relaxed` and
    /// `AcquiringAndReleasing` becomes `Acquiring`.
    #[inline]
    pub const fn failure_ordering(self) -> LoadOrdering {
        match self {
            UpdateOrdering::Relaxed | UpdateOrdering::Releasing => LoadOrdering::Relaxed,
            UpdateOrdering::Acquiring | UpdateOrdering::AcquiringAndReleasing => {
                LoadOrdering::Acquiring
            }
            UpdateOrdering::SequentiallyConsistent => LoadOrdering::SequentiallyConsistent,
        }
    }
}

impl From<LoadOrdering> for Ordering {
    #[inline]
    fn from(order: LoadOrdering) -> Self {
        match order {
            LoadOrdering::Relaxed => Ordering::Relaxed,
            LoadOrdering::Acquiring => Ordering::Acquire,
            LoadOrdering::SequentiallyConsistent => Ordering::SeqCst,
        }
    }
}

impl From<StoreOrdering> for Ordering {
    #[inline]
    fn from(order: StoreOrdering) -> Self {
        match order {
            StoreOrdering::Relaxed => Ordering::Relaxed,
            StoreOrdering::Releasing => Ordering::Release,
            StoreOrdering::SequentiallyConsistent => Ordering::SeqCst,
        }
    }
}

impl From<UpdateOrdering> for Ordering {
    #[inline]
    fn from(order: UpdateOrdering) -> Self {
        match order {
            UpdateOrdering::Relaxed => Ordering::Relaxed,
            UpdateOrdering::Acquiring => Ordering::Acquire,
            UpdateOrdering::Releasing => Ordering::Release,
            UpdateOrdering::AcquiringAndReleasing => Ordering::AcqRel,
            UpdateOrdering::SequentiallyConsistent => Ordering::SeqCst,
        }
    }
}

impl TryFrom<Ordering> for LoadOrdering {
    type Error = InvalidOrdering;

    fn try_from(order: Ordering) -> Result<Self, Self::Error> {
        match order {
            Ordering::Relaxed => Ok(LoadOrdering::Relaxed),
            Ordering::Acquire => Ok(LoadOrdering::Acquiring),
            Ordering::SeqCst => Ok(LoadOrdering::SequentiallyConsistent),
            other => Err(InvalidOrdering::new(other, OperationKind::Load)),
        }
    }
}

impl TryFrom<Ordering> for StoreOrdering {
    type Error = InvalidOrdering;

    fn try_from(order: Ordering) -> Result<Self, Self::Error> {
        match order {
            Ordering::Relaxed => Ok(StoreOrdering::Relaxed),
            Ordering::Release => Ok(StoreOrdering::Releasing),
            Ordering::SeqCst => Ok(StoreOrdering::SequentiallyConsistent),
            other => Err(InvalidOrdering::new(other, OperationKind::Store)),
        }
    }
}

impl TryFrom<Ordering> for UpdateOrdering {
    type Error = InvalidOrdering;

    fn try_from(order: Ordering) -> Result<Self, Self::Error> {
        match order {
            Ordering::Relaxed => Ok(UpdateOrdering::Relaxed),
            Ordering::Acquire => Ok(UpdateOrdering::Acquiring),
            Ordering::Release => Ok(UpdateOrdering::Releasing),
            Ordering::AcqRel => Ok(UpdateOrdering::AcquiringAndReleasing),
            Ordering::SeqCst => Ok(UpdateOrdering::SequentiallyConsistent),
            // `Ordering` is non-exhaustive.
            other => Err(InvalidOrdering::new(other, OperationKind::Update)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperationKind {
    Load,
    Store,
    Update,
}

/// The error returned when a `core::sync::atomic::Ordering` has no meaning
/// for the requested class of operation, e.g. `Release` for a load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidOrdering {
    ordering: Ordering,
    kind: OperationKind,
}

impl InvalidOrdering {
    #[inline]
    const fn new(ordering: Ordering, kind: OperationKind) -> Self {
        Self { ordering, kind }
    }

    /// The rejected ordering.
    #[inline]
    pub const fn ordering(&self) -> Ordering {
        self.ordering
    }
}

impl fmt::Display for InvalidOrdering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            OperationKind::Load => "load",
            OperationKind::Store => "store",
            OperationKind::Update => "read-modify-write",
        };
        write!(f, "{:?} is not a valid {kind} ordering", self.ordering)
    }
}

impl std::error::Error for InvalidOrdering {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rejects_release_orderings() {
        assert_eq!(LoadOrdering::try_from(Ordering::Acquire), Ok(LoadOrdering::Acquiring));
        let err = LoadOrdering::try_from(Ordering::Release).unwrap_err();
        assert_eq!(err.ordering(), Ordering::Release);
        assert_eq!(err.to_string(), "Release is not a valid load ordering");
        assert!(LoadOrdering::try_from(Ordering::AcqRel).is_err());
    }

    #[test]
    fn store_rejects_acquire_orderings() {
        assert_eq!(StoreOrdering::try_from(Ordering::Release), Ok(StoreOrdering::Releasing));
        assert!(StoreOrdering::try_from(Ordering::Acquire).is_err());
        assert!(StoreOrdering::try_from(Ordering::AcqRel).is_err());
    }

    #[test]
    fn update_accepts_everything_std_offers() {
        for order in [
            Ordering::Relaxed,
            Ordering::Acquire,
            Ordering::Release,
            Ordering::AcqRel,
            Ordering::SeqCst,
        ] {
            let typed = UpdateOrdering::try_from(order).unwrap();
            assert_eq!(Ordering::from(typed), order);
        }
    }

    #[test]
    fn failure_ordering_never_exceeds_success() {
        for success in [
            UpdateOrdering::Relaxed,
            UpdateOrdering::Acquiring,
            UpdateOrdering::Releasing,
            UpdateOrdering::AcquiringAndReleasing,
            UpdateOrdering::SequentiallyConsistent,
        ] {
            assert!(success.failure_ordering().is_valid_failure_for(success));
            assert!(LoadOrdering::Relaxed.is_valid_failure_for(success));
        }
        assert!(!LoadOrdering::Acquiring.is_valid_failure_for(UpdateOrdering::Releasing));
        assert!(!LoadOrdering::SequentiallyConsistent
            .is_valid_failure_for(UpdateOrdering::AcquiringAndReleasing));
    }
}
