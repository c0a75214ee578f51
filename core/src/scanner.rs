//! Continuous ARP scanning across every eligible interface.
//!
//! For each interface that passes the eligibility checks, the coordinator opens
//! one capture session and splits it into two cooperating tasks:
//!
//! * a **listener** ([`listen`]) decoding inbound ARP replies and handing them to
//!   the [`DiscoveryReporter`],
//! * a **driver** ([`drive`]) sweeping the interface's subnet with ARP requests
//!   once per probe interval.
//!
//! All tasks share one [`CancellationToken`]. [`ScanCoordinator::run`] returns
//! only after every task has observed it (or failed on its own) and reported back,
//! and after every capture reader thread has released its source.

use std::io;
use std::sync::Arc;

use pnet::datalink::NetworkInterface;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use arpsweep_common::capture::CaptureProvider;
use arpsweep_common::config::Config;
use arpsweep_common::error::ScanError;
use arpsweep_common::network::interface::{
    InterfaceDescriptor, PhysicalClassifier, SysfsClassifier, check_viability,
};
use arpsweep_common::report::DiscoveryReporter;
use arpsweep_common::system::InterfaceRepository;

use crate::discovery::LogReporter;
use crate::network::channel::{self, PnetCapture};
use crate::system::SystemRepo;

mod driver;
mod listener;

pub use driver::drive;
pub use listener::{inspect_frame, listen};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRole {
    Listener,
    Driver,
}

/// Why a scan task stopped.
#[derive(Debug)]
pub enum TaskExit {
    /// The shared token was cancelled.
    Cancelled,
    /// Writing a probe failed. Only the driver of that interface stops.
    WriteFailed(io::Error),
}

impl TaskExit {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, TaskExit::Cancelled)
    }
}

/// Completion signal every task sends back to the coordinator.
#[derive(Debug)]
pub struct TaskReport {
    pub interface: String,
    pub role: TaskRole,
    pub exit: TaskExit,
}

impl TaskReport {
    pub fn new(interface: &str, role: TaskRole, exit: TaskExit) -> Self {
        Self {
            interface: interface.to_string(),
            role,
            exit,
        }
    }
}

pub struct ScanCoordinator {
    cfg: Config,
    capture: Arc<dyn CaptureProvider>,
    classifier: Arc<dyn PhysicalClassifier>,
    reporter: Arc<dyn DiscoveryReporter>,
}

impl ScanCoordinator {
    pub fn new(
        cfg: Config,
        capture: Arc<dyn CaptureProvider>,
        classifier: Arc<dyn PhysicalClassifier>,
        reporter: Arc<dyn DiscoveryReporter>,
    ) -> Self {
        Self {
            cfg,
            capture,
            classifier,
            reporter,
        }
    }

    /// Filters the enumerated interfaces down to the ones worth sweeping.
    ///
    /// Ineligible interfaces are skipped silently (debug only), interfaces
    /// lacking an address are skipped with a warning.
    pub fn select_interfaces(&self, interfaces: Vec<NetworkInterface>) -> Vec<InterfaceDescriptor> {
        interfaces
            .into_iter()
            .filter(|intf| self.cfg.allows(&intf.name))
            .filter_map(|intf| {
                if let Err(reason) = check_viability(&intf, self.classifier.as_ref()) {
                    debug!("[{}] skipped: {reason}", intf.name);
                    return None;
                }
                match InterfaceDescriptor::try_from(&intf) {
                    Ok(descriptor) => Some(descriptor),
                    Err(e) => {
                        warn!("{e}, skipping");
                        None
                    }
                }
            })
            .collect()
    }

    /// Starts a listener and a driver per usable interface, then waits for all of them.
    ///
    /// Returns one [`TaskReport`] per started task. With no usable interface
    /// this returns immediately with an empty list.
    pub async fn run(
        &self,
        interfaces: Vec<NetworkInterface>,
        token: CancellationToken,
    ) -> Vec<TaskReport> {
        let mut tasks: JoinSet<TaskReport> = JoinSet::new();

        for descriptor in self.select_interfaces(interfaces) {
            if let Err(e) = self.start_session(descriptor, &token, &mut tasks) {
                warn!("{e}, skipping");
            }
        }

        if tasks.is_empty() {
            warn!("no interface available for scanning");
            return Vec::new();
        }

        let mut reports: Vec<TaskReport> = Vec::with_capacity(tasks.len());
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => {
                    debug!("[{}] {:?} finished: {:?}", report.interface, report.role, report.exit);
                    reports.push(report);
                }
                Err(e) => error!("scan task aborted: {e}"),
            }
        }
        reports
    }

    fn start_session(
        &self,
        iface: InterfaceDescriptor,
        token: &CancellationToken,
        tasks: &mut JoinSet<TaskReport>,
    ) -> Result<(), ScanError> {
        let session = self.capture.open(&iface)?;
        let (frames, reader) = channel::start_capture(iface.name(), session.source)?;

        info!("[{}] scanning interface {}", iface.name(), iface.ipv4());

        let iface = Arc::new(iface);
        let listener = listen(iface.clone(), frames, self.reporter.clone(), token.clone());
        // The listener drops the frame queue on exit, which releases the reader.
        tasks.spawn(async move {
            let report: TaskReport = listener.await;
            reader.join().await;
            report
        });
        tasks.spawn(drive(
            iface,
            session.sink,
            self.cfg.probe_interval,
            token.clone(),
        ));
        Ok(())
    }
}

/// Scans every eligible host interface until `token` is cancelled.
///
/// Fails only when the interface list cannot be obtained.
pub async fn perform_scan(
    cfg: &Config,
    token: CancellationToken,
) -> Result<Vec<TaskReport>, ScanError> {
    let interfaces: Vec<NetworkInterface> = SystemRepo.get_network_interfaces()?;
    let coordinator = ScanCoordinator::new(
        cfg.clone(),
        Arc::new(PnetCapture::new(cfg.read_timeout)),
        Arc::new(SysfsClassifier::default()),
        Arc::new(LogReporter),
    );
    Ok(coordinator.run(interfaces, token).await)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
