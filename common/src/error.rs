use std::io;

use thiserror::Error;

/// Failures raised while enumerating interfaces or preparing a scan session.
///
/// Apart from [`ScanError::Enumeration`], every variant is scoped to a single
/// interface and only causes that interface to be skipped.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("failed to enumerate network interfaces: {0}")]
    Enumeration(String),

    #[error("interface '{0}' has no IPv4 address")]
    NoIpv4Address(String),

    #[error("interface '{0}' has no hardware address")]
    NoMacAddress(String),

    #[error("failed to open capture on '{name}': {source}")]
    CaptureOpen {
        name: String,
        #[source]
        source: io::Error,
    },

    #[error("non-ethernet channel for '{0}'")]
    UnsupportedChannel(String),
}
