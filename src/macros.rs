//! Crate-internal logging hook.

/// Emits a `tracing` event at `TRACE` level when the `tracing` feature is
/// enabled, and nothing otherwise.
///
/// Only used off the hot path; a successful load or swap never logs.
macro_rules! trace_event {
    ($($arg:tt)+) => {
        #[cfg(feature = "tracing")]
        ::tracing::trace!(target: "halo_atomic", $($arg)+);
    };
}

pub(crate) use trace_event;
