//! Process-wide tracing setup.
//!
//! The subscriber is installed before config is read so the loader's own
//! messages are kept. Once config is loaded, `logging.filter` replaces the
//! startup filter unless `RUST_LOG` was set.

use tandem_common::TandemError;
use tracing::Subscriber;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, reload, EnvFilter, Registry};

/// Filter in effect until config is loaded.
pub const STARTUP_FILTER: &str = "tandem_relay=info,tandem_config=info";

/// Handle for swapping the active filter after startup.
pub struct LogFilter {
    handle: reload::Handle<EnvFilter, Registry>,
    pinned: bool,
}

impl LogFilter {
    /// Install `directives` as the active filter. A filter taken from
    /// `RUST_LOG` is left alone. Returns whether the filter changed.
    pub fn apply_config(&self, directives: &str) -> Result<bool, TandemError> {
        if self.pinned {
            return Ok(false);
        }

        let filter = EnvFilter::try_new(directives)
            .map_err(|e| TandemError::Other(format!("invalid log filter {directives:?}: {e}")))?;
        self.handle
            .reload(filter)
            .map_err(|e| TandemError::Other(format!("failed to swap log filter: {e}")))?;
        Ok(true)
    }
}

/// Build the subscriber. `rust_log` is the raw `RUST_LOG` value; when it
/// parses it pins the filter for the life of the process.
pub fn subscriber(rust_log: Option<&str>) -> (impl Subscriber + Send + Sync + 'static, LogFilter) {
    let from_env = rust_log
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok());
    let pinned = from_env.is_some();
    let filter = from_env.unwrap_or_else(|| EnvFilter::new(STARTUP_FILTER));

    let (filter, handle) = reload::Layer::new(filter);
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr));

    (subscriber, LogFilter { handle, pinned })
}
