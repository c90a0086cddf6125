//! Test utilities for the workload resolver
//!
//! Helpers for writing tests: logging initialization and on-disk workload fixtures.
//!
//! # Example
//!
//! ```rust,no_run
//! use workload_resolver::test_utils::{WorkloadFixture, fixtures::manifests};
//!
//! let fixture = WorkloadFixture::new();
//! fixture.write("app.yaml", manifests::SERVICE);
//! let config = fixture.standalone("webstore", &["app.yaml"]);
//! assert!(config.exists());
//! ```

pub mod fixtures;

pub use fixtures::WorkloadFixture;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber once, no matter how often it is called. Uses
/// `level` when given, otherwise `RUST_LOG` when set, otherwise stays silent.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
