//! Shared helpers for integration tests.
//!
//! `RUST_LOG`-style filtering is not wired up; set `KARY_PARTITION_LOG=1` to
//! see `debug` level events from the crate while a test runs.

use std::sync::Once;

static INIT: Once = Once::new();

pub fn init_tracing() {
    INIT.call_once(|| {
        if std::env::var_os("KARY_PARTITION_LOG").is_none() {
            return;
        }
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}
