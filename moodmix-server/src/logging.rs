//! Tracing setup shared by the binaries
//!
//! The subscriber starts before the config file is read so that config
//! warnings are visible. The configured level is applied afterwards through
//! a reload handle, unless `RUST_LOG` is set, which always wins.

use tracing::warn;
use tracing_subscriber::{
    layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter, Registry,
};

/// Handle for adjusting the log filter after startup
pub struct LogControl {
    handle: reload::Handle<EnvFilter, Registry>,
    from_env: bool,
}

/// Install the global subscriber with `default_level` unless `RUST_LOG` is set
pub fn init_tracing(default_level: &str) -> LogControl {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).is_ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let (filter, handle) = reload::Layer::new(filter);

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    LogControl { handle, from_env }
}

impl LogControl {
    /// Switch to the level from the config file
    pub fn apply_level(&self, level: &str) {
        if self.from_env {
            return;
        }

        match EnvFilter::try_new(level) {
            Ok(filter) => {
                if let Err(e) = self.handle.reload(filter) {
                    warn!("Could not apply log level '{}': {}", level, e);
                }
            }
            Err(e) => warn!("Invalid log level '{}' in config: {}", level, e),
        }
    }
}
