//! Structured logging set-up emitting JSON lines through `tracing`.
//!
//! Events across the crate use a shared field vocabulary: `ev` (event name),
//! `dur_ms`, `code` and domain identifiers such as `dataset`.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::common::config::AppCfg;

static INIT: OnceLock<bool> = OnceLock::new();

/// Install the global subscriber once. Later calls are no-ops.
///
/// Returns `false` when another subscriber was already installed by the host
/// process; events then flow to that subscriber instead.
pub fn init(cfg: &AppCfg) -> bool {
    *INIT.get_or_init(|| {
        let filter = EnvFilter::try_new(&cfg.log_filter).unwrap_or_else(|_| EnvFilter::new("info"));
        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr);

        let installed = if cfg.log_json {
            builder.json().flatten_event(true).try_init()
        } else {
            builder.compact().try_init()
        };
        installed.is_ok()
    })
}

/// Milliseconds elapsed since `start`, for the `dur_ms` field.
pub fn elapsed_ms(start: std::time::Instant) -> u128 {
    start.elapsed().as_millis()
}
