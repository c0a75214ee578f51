use std::sync::Arc;
use std::time::Duration;

use pnet::datalink::MacAddr;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, trace, warn};

use arpsweep_common::capture::FrameSink;
use arpsweep_common::config::{DEFAULT_PROBE_INTERVAL, MAX_PROBE_INTERVAL};
use arpsweep_common::network::interface::InterfaceDescriptor;
use arpsweep_protocols::{FrameError, arp};

use super::{TaskExit, TaskReport, TaskRole};

/// Serializes one request from raw (sender hw, sender proto, target proto) bytes.
type FrameBuilder = fn(&[u8], &[u8], &[u8]) -> Result<Vec<u8>, FrameError>;

/// Sweeps the interface's subnet once per `period` until cancelled or a write fails.
///
/// The first sweep starts one full period after launch. A sweep that overruns
/// the period delays the next one instead of bursting to catch up.
pub async fn drive(
    iface: Arc<InterfaceDescriptor>,
    sink: Box<dyn FrameSink>,
    period: Duration,
    token: CancellationToken,
) -> TaskReport {
    drive_with(iface, sink, period, token, arp::create_request_from_slices).await
}

async fn drive_with(
    iface: Arc<InterfaceDescriptor>,
    mut sink: Box<dyn FrameSink>,
    period: Duration,
    token: CancellationToken,
    build: FrameBuilder,
) -> TaskReport {
    let period: Duration = effective_period(period);
    if period == MAX_PROBE_INTERVAL {
        trace!("[{}] sweep period capped at {}s", iface.name(), period.as_secs());
    }
    let start: Instant = Instant::now().checked_add(period).unwrap_or_else(Instant::now);
    let mut ticker = time::interval_at(start, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let exit: TaskExit = loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => {
                info!("[{}] stop scanner", iface.name());
                break TaskExit::Cancelled;
            }

            _ = ticker.tick() => {
                if let Err(exit) = sweep(&iface, sink.as_mut(), &token, build).await {
                    break exit;
                }
            }
        }
    };

    TaskReport::new(iface.name(), TaskRole::Driver, exit)
}

/// Zero falls back to the default period, anything above one day is capped.
fn effective_period(period: Duration) -> Duration {
    if period.is_zero() {
        DEFAULT_PROBE_INTERVAL
    } else {
        period.min(MAX_PROBE_INTERVAL)
    }
}

fn mac_octets(mac: MacAddr) -> [u8; 6] {
    let MacAddr(a, b, c, d, e, f) = mac;
    [a, b, c, d, e, f]
}

/// Writes one ARP request per subnet candidate, in ascending order.
///
/// Cancellation is checked before every write. A candidate whose frame cannot
/// be built is skipped. Returns the number of frames written.
async fn sweep(
    iface: &InterfaceDescriptor,
    sink: &mut dyn FrameSink,
    token: &CancellationToken,
    build: FrameBuilder,
) -> Result<usize, TaskExit> {
    let src_hw: [u8; 6] = mac_octets(iface.mac());
    let src_proto: [u8; 4] = iface.addr().octets();
    let mut written: usize = 0;

    for target in iface.subnet().candidates() {
        if token.is_cancelled() {
            info!("[{}] stop writer", iface.name());
            return Err(TaskExit::Cancelled);
        }

        let frame: Vec<u8> = match build(&src_hw, &src_proto, &target.octets()) {
            Ok(frame) => frame,
            Err(e) => {
                warn!("[{}] cannot build request for {target}: {e}", iface.name());
                continue;
            }
        };

        if let Err(e) = sink.send_frame(&frame) {
            error!("[{}] error writing packets: {e}", iface.name());
            return Err(TaskExit::WriteFailed(e));
        }
        written += 1;

        // Large subnets would otherwise monopolize the worker between ticks.
        tokio::task::yield_now().await;
    }

    trace!("[{}] sweep done, {written} requests", iface.name());
    Ok(written)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
