// ---------------------------------------------------------------------------
// Conditional tracing support
// ---------------------------------------------------------------------------

/// Enter a tracing span for a selection phase (when the `tracing` feature is
/// enabled). When disabled, this is a no-op and the compiler eliminates it.
macro_rules! trace_phase {
    ($name:expr) => {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!("selection_phase", phase = $name).entered();
    };
}

/// `tracing::debug!` behind the `tracing` feature.
macro_rules! debug_event {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        tracing::debug!($($arg)*);
    };
}
