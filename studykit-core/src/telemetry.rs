//! Logging setup.
//!
//! All studykit crates emit `tracing` events; this installs the subscriber
//! that renders them. `RUST_LOG` overrides `general.log_level`.

use tracing_subscriber::EnvFilter;

use crate::config::GeneralConfig;

/// Install a global `tracing` subscriber.
///
/// Returns `false` if a subscriber was already installed (for example by a
/// test harness or a second call); the existing one stays in place.
pub fn init_logging(config: &GeneralConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.log_format.eq_ignore_ascii_case("json") {
        builder.json().try_init().is_ok()
    } else {
        builder.try_init().is_ok()
    };

    if installed {
        tracing::debug!(level = %config.log_level, format = %config.log_format, "Logging initialised");
    }
    installed
}
