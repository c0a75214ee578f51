use std::net::Ipv4Addr;
use std::path::{Component, Path, PathBuf};

use pnet::datalink::{MacAddr, NetworkInterface};
use pnet::ipnetwork::{IpNetwork, Ipv4Network};
use thiserror::Error;
use tracing::trace;

use crate::error::ScanError;
use crate::network::subnet::Subnet;

const SYSFS_CLASS_NET: &str = "/sys/class/net";
const SYSFS_VIRTUAL_DEVICES: &str = "/sys/devices/virtual";

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum ViabilityError {
    #[error("interface is down")]
    IsDown,
    #[error("loopback interface")]
    IsLoopback,
    /// The interface is a point-to-point link (e.g., a VPN tunnel).
    #[error("point-to-point interface")]
    IsPointToPoint,
    /// The interface was classified as virtual (bridge, veth, ...).
    #[error("not a physical interface")]
    NotPhysical,
}

/// Decides whether an interface name refers to a physical NIC.
pub trait PhysicalClassifier: Send + Sync {
    fn is_physical(&self, name: &str) -> bool;
}

impl<F> PhysicalClassifier for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn is_physical(&self, name: &str) -> bool {
        self(name)
    }
}

/// Classifies interfaces by following their `/sys/class/net/<name>` link.
///
/// Virtual devices resolve below `/sys/devices/virtual`. A link that cannot
/// be read counts as not physical.
#[derive(Debug, Clone)]
pub struct SysfsClassifier {
    class_root: PathBuf,
    virtual_root: PathBuf,
}

impl Default for SysfsClassifier {
    fn default() -> Self {
        Self::with_roots(SYSFS_CLASS_NET, SYSFS_VIRTUAL_DEVICES)
    }
}

impl SysfsClassifier {
    pub fn with_roots(class_root: impl Into<PathBuf>, virtual_root: impl Into<PathBuf>) -> Self {
        Self {
            class_root: class_root.into(),
            virtual_root: virtual_root.into(),
        }
    }
}

impl PhysicalClassifier for SysfsClassifier {
    fn is_physical(&self, name: &str) -> bool {
        let target: PathBuf = match std::fs::read_link(self.class_root.join(name)) {
            Ok(target) => target,
            Err(e) => {
                trace!("[{name}] cannot resolve device link: {e}");
                return false;
            }
        };
        let resolved: PathBuf = normalize(&self.class_root.join(target));
        !resolved.starts_with(&self.virtual_root)
    }
}

/// Lexically resolves `.` and `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::ParentDir => {
                out.pop();
            }
            Component::CurDir => {}
            other => out.push(other.as_os_str()),
        }
    }
    out
}

pub trait NetworkInterfaceExtension {
    fn get_ipv4_net(&self) -> Option<Ipv4Network>;
}

impl NetworkInterfaceExtension for NetworkInterface {
    fn get_ipv4_net(&self) -> Option<Ipv4Network> {
        self.ips.iter().find_map(|ip| match ip {
            IpNetwork::V4(net) => Some(*net),
            _ => None,
        })
    }
}

/// Checks whether an interface may carry an ARP sweep.
///
/// Address requirements are checked separately when the
/// [`InterfaceDescriptor`] is built, so they can be reported as warnings.
pub fn check_viability(
    interface: &NetworkInterface,
    classifier: &dyn PhysicalClassifier,
) -> Result<(), ViabilityError> {
    if !interface.is_up() {
        return Err(ViabilityError::IsDown);
    }
    if interface.is_loopback() {
        return Err(ViabilityError::IsLoopback);
    }
    if interface.is_point_to_point() {
        return Err(ViabilityError::IsPointToPoint);
    }
    if !classifier.is_physical(&interface.name) {
        return Err(ViabilityError::NotPhysical);
    }
    Ok(())
}

/// Immutable snapshot of an interface, taken once when a scan starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptor {
    name: String,
    mac: MacAddr,
    ipv4: Ipv4Network,
    is_up: bool,
    link: NetworkInterface,
}

impl TryFrom<&NetworkInterface> for InterfaceDescriptor {
    type Error = ScanError;

    fn try_from(interface: &NetworkInterface) -> Result<Self, Self::Error> {
        let mac: MacAddr = interface
            .mac
            .ok_or_else(|| ScanError::NoMacAddress(interface.name.clone()))?;
        let ipv4: Ipv4Network = interface
            .get_ipv4_net()
            .ok_or_else(|| ScanError::NoIpv4Address(interface.name.clone()))?;

        Ok(Self {
            name: interface.name.clone(),
            mac,
            ipv4,
            is_up: interface.is_up(),
            link: interface.clone(),
        })
    }
}

impl InterfaceDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mac(&self) -> MacAddr {
        self.mac
    }

    pub fn ipv4(&self) -> Ipv4Network {
        self.ipv4
    }

    pub fn addr(&self) -> Ipv4Addr {
        self.ipv4.ip()
    }

    pub fn is_up(&self) -> bool {
        self.is_up
    }

    pub fn subnet(&self) -> Subnet {
        Subnet::from(self.ipv4)
    }

    /// The `pnet` interface the snapshot was taken from, needed to open a channel.
    pub fn link(&self) -> &NetworkInterface {
        &self.link
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
