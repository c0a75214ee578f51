use std::sync::Arc;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use arpsweep_common::network::interface::InterfaceDescriptor;
use arpsweep_common::report::{Discovery, DiscoveryReporter};
use arpsweep_protocols::arp::{self, ArpRecord};

use super::{TaskExit, TaskReport, TaskRole};

/// Decodes captured frames until `token` is cancelled.
///
/// A closed frame queue does not end the task early. It keeps waiting for
/// cancellation so the coordinator always sees both tasks of an interface exit
/// for the same reason.
pub async fn listen(
    iface: Arc<InterfaceDescriptor>,
    mut frames: UnboundedReceiver<Vec<u8>>,
    reporter: Arc<dyn DiscoveryReporter>,
    token: CancellationToken,
) -> TaskReport {
    loop {
        tokio::select! {
            biased;

            _ = token.cancelled() => break,

            frame = frames.recv() => match frame {
                Some(bytes) => {
                    if let Some(discovery) = inspect_frame(&iface, &bytes) {
                        reporter.report(&discovery);
                    }
                }
                None => {
                    debug!("[{}] capture closed, waiting for shutdown", iface.name());
                    token.cancelled().await;
                    break;
                }
            },
        }
    }

    info!("[{}] stop reader", iface.name());
    TaskReport::new(iface.name(), TaskRole::Listener, TaskExit::Cancelled)
}

/// Turns an inbound frame into a discovery when it is an ARP reply from
/// another station.
///
/// Non-ARP traffic, requests and our own replies yield `None`.
pub fn inspect_frame(iface: &InterfaceDescriptor, frame: &[u8]) -> Option<Discovery> {
    let record: ArpRecord = arp::parse_frame(frame)?;
    if !record.is_reply() {
        return None;
    }
    if record.sender_mac == iface.mac() {
        trace!("[{}] ignoring own reply for {}", iface.name(), record.sender_addr);
        return None;
    }

    Some(Discovery {
        interface: iface.name().to_string(),
        ip: record.sender_addr,
        mac: record.sender_mac,
    })
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
