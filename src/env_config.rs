//! Environment configuration shared by the binaries.
//!
//! Consolidates `RUST_LOG` and `CODE_STIMULI_CONFIG_DIR` reads.

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use crate::constants::DEFAULT_CONFIG_DIR;

/// Install the global `tracing` subscriber. `RUST_LOG` overrides the default
/// `info` level. Safe to call more than once.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// Read `CODE_STIMULI_CONFIG_DIR` (default [`DEFAULT_CONFIG_DIR`]).
pub fn config_dir() -> PathBuf {
    std::env::var("CODE_STIMULI_CONFIG_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_DIR))
}
