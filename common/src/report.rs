use std::fmt;
use std::net::Ipv4Addr;

use pnet::datalink::MacAddr;

/// A host that answered on one of the scanned segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub interface: String,
    pub ip: Ipv4Addr,
    pub mac: MacAddr,
}

impl fmt::Display for Discovery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] found {} ({})", self.interface, self.ip, self.mac)
    }
}

/// Receives every discovery as soon as a listener decodes it.
///
/// Called from many listener tasks concurrently, once per reply; nothing is
/// deduplicated upstream.
pub trait DiscoveryReporter: Send + Sync {
    fn report(&self, discovery: &Discovery);
}
