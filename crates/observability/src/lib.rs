//! Tracing/logging setup shared by hosts embedding the checker.
//!
//! The checker emits `debug!` lines on grant and denial; whether those reach
//! an output is decided here (or by the host's own subscriber).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;
