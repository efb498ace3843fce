//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_FILTER: &str = "warn,pointer_router=info";

/// Installs a fmt subscriber filtered by `RUST_LOG`, falling back to `filter`
///
/// Safe to call more than once; only the first call installs a subscriber.
/// Returns true if this call installed it.
pub fn init(filter: &str) -> bool {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => match EnvFilter::try_new(filter) {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new(DEFAULT_FILTER),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Subscriber for tests: writes through the test harness capture
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new("pointer_router=trace"))
        .with_test_writer()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        init_for_tests();
        // A subscriber is already installed, so nothing more is set up
        assert!(!init("debug"));
    }
}
