use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Room lifecycle timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RoomsConfig {
    /// Seconds without a game start or accepted move before a room resets
    /// (valid range: 10-86400).
    pub inactivity_timeout_secs: u64,
    /// Seconds a dropped connection may resume its identity and seat
    /// (valid range: 0-3600, 0 disables recovery).
    pub recovery_window_secs: u64,
    /// Events buffered for a dropped connection while it can still resume
    /// (valid range: 1-4096).
    pub recovery_buffer: usize,
    /// Seconds between sweeps that forget empty rooms (0 disables;
    /// otherwise 10-86400).
    pub prune_interval_secs: u64,
}

impl Default for RoomsConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout_secs: 300,
            recovery_window_secs: 120,
            recovery_buffer: 256,
            prune_interval_secs: 0,
        }
    }
}

impl RoomsConfig {
    pub fn inactivity_timeout(&self) -> Duration {
        Duration::from_secs(self.inactivity_timeout_secs)
    }

    pub fn recovery_window(&self) -> Duration {
        Duration::from_secs(self.recovery_window_secs)
    }

    /// `None` when pruning is disabled.
    pub fn prune_interval(&self) -> Option<Duration> {
        (self.prune_interval_secs > 0).then(|| Duration::from_secs(self.prune_interval_secs))
    }
}
