//! Telemetry helpers shared by the receiver services.
//! Installs the tracing subscriber and exposes span/metric helpers keyed by
//! messaging labels.

use anyhow::Result;

mod config;
mod context;
mod metrics;
mod tracing_init;

pub use config::TelemetryConfig;
pub use context::TelemetryLabels;
pub use self::metrics::{record_counter, with_common_fields};
pub use tracing_init::init_telemetry;

/// Installs the subscriber configured from `RUST_LOG` and `LOG_FORMAT`.
pub fn install(service_name: &str) -> Result<()> {
    init_telemetry(TelemetryConfig::from_env(
        service_name,
        env!("CARGO_PKG_VERSION"),
    ))
}
