use anyhow::Context;
use is_root::is_root;
use tracing::{debug, info, warn};

use arpsweep_common::config::Config;
use arpsweep_core::scanner::{self, TaskExit, TaskReport};

use crate::signal;

pub async fn scan(cfg: &Config) -> anyhow::Result<()> {
    if !is_root() {
        warn!("not running as root, opening capture sessions will most likely fail");
    }

    let token = signal::shutdown_token()?;
    info!(
        "sweeping every {}s, press Ctrl-C to stop",
        cfg.probe_interval.as_secs()
    );

    let reports: Vec<TaskReport> = scanner::perform_scan(cfg, token)
        .await
        .context("unable to start the scan")?;

    let failed: usize = reports
        .iter()
        .filter(|r| matches!(r.exit, TaskExit::WriteFailed(_)))
        .count();
    debug!("{} tasks finished, {failed} after a write failure", reports.len());
    info!("scan stopped");
    Ok(())
}
