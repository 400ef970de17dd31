//! Logging bootstrap.
//!
//! Builds the global tracing subscriber from telemetry settings. `RUST_LOG`
//! overrides the default `info` filter.

use libris_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Initialize the tracing/logging pipeline. Safe to call more than once;
/// later calls are no-ops (relevant for tests).
pub fn init(settings: &TelemetrySettings) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    let initialized = match settings.log_format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    if initialized.is_ok() {
        tracing::debug!(target: "libris-telemetry", format = ?settings.log_format, "telemetry initialized");
    }
}
