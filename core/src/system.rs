use pnet::datalink::{self, NetworkInterface};

use arpsweep_common::error::ScanError;
use arpsweep_common::system::InterfaceRepository;

pub struct SystemRepo;

impl InterfaceRepository for SystemRepo {
    fn get_network_interfaces(&self) -> Result<Vec<NetworkInterface>, ScanError> {
        let interfaces: Vec<NetworkInterface> = datalink::interfaces();
        // Every host reports at least a loopback device.
        if interfaces.is_empty() {
            return Err(ScanError::Enumeration(
                "the system reported no network interfaces".into(),
            ));
        }
        Ok(interfaces)
    }
}
