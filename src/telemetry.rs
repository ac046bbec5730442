//! Tracing subscriber setup.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,valkey_playground=debug,testcontainers=info";

static TRACING_INIT: OnceLock<()> = OnceLock::new();

/// Install a fmt subscriber that writes through the test harness.
///
/// `RUST_LOG` takes precedence over `default_filter`. Safe to call from every
/// test; only the first call installs the subscriber.
pub fn init_tracing(default_filter: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
