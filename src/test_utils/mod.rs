//! Test utilities for extgen
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suite:
//!
//! - [`init_test_logging`] installs a tracing subscriber once per process
//! - [`fixtures`] provides small component types whose behavior is easy to
//!   predict, for exercising the engine without the built-in library
//!
//! # Example
//!
//! ```rust,no_run
//! use extgen_cli::collector::ComponentCollector;
//! use extgen_cli::schema::SchemaIntrospector;
//! use extgen_cli::test_utils::fixtures::{data, fixture_resolver};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let schemas = SchemaIntrospector::new(Arc::new(fixture_resolver()));
//! let collection = ComponentCollector::new(&schemas)
//!     .collect(data(json!({"base": "thing", "root_name": "alpha"})))
//!     .unwrap();
//! assert_eq!(collection.len(), 1);
//! ```

pub mod fixtures;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Initializes the tracing subscriber only once regardless of how many times
/// it's called. Uses the provided level, else `RUST_LOG`; with neither, tests
/// run without logging.
///
/// ```bash
/// RUST_LOG=extgen_cli=trace cargo test collector
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
