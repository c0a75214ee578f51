//! Link-layer frame construction and parsing.

use thiserror::Error;

pub mod arp;
pub mod ethernet;

pub const ETH_HDR_LEN: usize = 14;
pub const ARP_LEN: usize = 28;
pub const MIN_ETH_FRAME_NO_FCS: usize = 60;

pub const HW_ADDR_LEN: usize = 6;
pub const PROTO_ADDR_LEN: usize = 4;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("buffer too small for {0} header")]
    Buffer(&'static str),

    #[error("hardware address must be 6 bytes, got {0}")]
    HardwareAddrLen(usize),

    #[error("protocol address must be 4 bytes, got {0}")]
    ProtocolAddrLen(usize),
}
