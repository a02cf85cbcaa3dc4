// src/infra/logger.rs — tracing setup
//
// Filter resolution: PROXYDASH_LOG, then RUST_LOG, then the given default.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(default_level: &str) {
    let filter = EnvFilter::try_from_env("PROXYDASH_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
