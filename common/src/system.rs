use pnet::datalink::NetworkInterface;

use crate::error::ScanError;

/// Source of the host's interface list.
pub trait InterfaceRepository: Send + Sync {
    fn get_network_interfaces(&self) -> Result<Vec<NetworkInterface>, ScanError>;
}
