//! Testing utilities and helpers
//!
//! - **[`temp`]**: Temporary directory helpers
//! - [`init_test_tracing`]: route `tracing` output through the test harness

pub mod temp;

use std::sync::Once;

pub use temp::TempDir;

pub use crate::time::MockClock;

static TRACING: Once = Once::new();

/// Install a test-friendly tracing subscriber once per process.
///
/// Honors `RUST_LOG`; defaults to `debug` for appraisal crates.
pub fn init_test_tracing() {
    TRACING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("appraisal=debug"));
        let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
    });
}
