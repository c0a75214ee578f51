use pnet::datalink::NetworkInterface;
use tracing::{info, warn};

use arpsweep_common::config::Config;
use arpsweep_common::network::interface::{
    InterfaceDescriptor, PhysicalClassifier, SysfsClassifier, check_viability,
};
use arpsweep_common::system::InterfaceRepository;
use arpsweep_core::system::SystemRepo;

pub fn interfaces(cfg: &Config) -> anyhow::Result<()> {
    let classifier = SysfsClassifier::default();
    let interfaces: Vec<NetworkInterface> = SystemRepo.get_network_interfaces()?;

    for interface in &interfaces {
        match verdict(interface, &classifier, cfg) {
            Ok(descriptor) => info!(
                "{:<16} {} {} ({} probes per sweep)",
                descriptor.name(),
                descriptor.ipv4(),
                descriptor.mac(),
                descriptor.subnet().len()
            ),
            Err(reason) => warn!("{:<16} skipped: {reason}", interface.name),
        }
    }
    Ok(())
}

/// Same decision chain the scanner applies, with a printable reason.
fn verdict(
    interface: &NetworkInterface,
    classifier: &dyn PhysicalClassifier,
    cfg: &Config,
) -> Result<InterfaceDescriptor, String> {
    if !cfg.allows(&interface.name) {
        return Err("not selected with --interface".into());
    }
    check_viability(interface, classifier).map_err(|e| e.to_string())?;
    InterfaceDescriptor::try_from(interface).map_err(|e| e.to_string())
}
