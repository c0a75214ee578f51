use std::time::Duration;

/// Period between two probe sweeps on the same interface.
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(5);
/// Upper bound for the sweep period, one day.
pub const MAX_PROBE_INTERVAL_SECS: u64 = 86_400;
pub const MAX_PROBE_INTERVAL: Duration = Duration::from_secs(MAX_PROBE_INTERVAL_SECS);
/// How long a capture read may block before the reader thread re-checks its queue.
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct Config {
    /// Delay between sweeps. The first sweep starts one period after launch.
    pub probe_interval: Duration,
    pub read_timeout: Duration,
    /// Interfaces to scan by name. Empty means every eligible interface.
    pub interfaces: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            probe_interval: DEFAULT_PROBE_INTERVAL,
            read_timeout: DEFAULT_READ_TIMEOUT,
            interfaces: Vec::new(),
        }
    }
}

impl Config {
    pub fn allows(&self, name: &str) -> bool {
        self.interfaces.is_empty() || self.interfaces.iter().any(|n| n == name)
    }
}
