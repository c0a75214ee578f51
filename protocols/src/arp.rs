use std::net::Ipv4Addr;

use pnet::datalink::MacAddr;
use pnet::packet::Packet;
use pnet::packet::arp::{ArpHardwareTypes, ArpOperation, ArpOperations, ArpPacket, MutableArpPacket};
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};

use crate::{ARP_LEN, ETH_HDR_LEN, FrameError, HW_ADDR_LEN, MIN_ETH_FRAME_NO_FCS, PROTO_ADDR_LEN, ethernet};

/// Decoded fields of an ARP-over-IPv4 frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArpRecord {
    pub operation: ArpOperation,
    pub sender_mac: MacAddr,
    pub sender_addr: Ipv4Addr,
    pub target_mac: MacAddr,
    pub target_addr: Ipv4Addr,
}

impl ArpRecord {
    pub fn is_request(&self) -> bool {
        self.operation == ArpOperations::Request
    }

    pub fn is_reply(&self) -> bool {
        self.operation == ArpOperations::Reply
    }
}

/// Builds a broadcast "who has `dst_addr`? tell `src_addr`" frame.
pub fn create_request(
    src_mac: MacAddr,
    src_addr: Ipv4Addr,
    dst_addr: Ipv4Addr,
) -> Result<Vec<u8>, FrameError> {
    create_frame(
        src_mac,
        MacAddr::broadcast(),
        ArpOperations::Request,
        src_addr,
        MacAddr::zero(),
        dst_addr,
    )
}

/// Same as [`create_request`] but for raw address bytes, validating their lengths.
pub fn create_request_from_slices(
    src_hw: &[u8],
    src_proto: &[u8],
    dst_proto: &[u8],
) -> Result<Vec<u8>, FrameError> {
    let hw: [u8; HW_ADDR_LEN] = src_hw
        .try_into()
        .map_err(|_| FrameError::HardwareAddrLen(src_hw.len()))?;
    let src: [u8; PROTO_ADDR_LEN] = src_proto
        .try_into()
        .map_err(|_| FrameError::ProtocolAddrLen(src_proto.len()))?;
    let dst: [u8; PROTO_ADDR_LEN] = dst_proto
        .try_into()
        .map_err(|_| FrameError::ProtocolAddrLen(dst_proto.len()))?;

    let src_mac = MacAddr::new(hw[0], hw[1], hw[2], hw[3], hw[4], hw[5]);
    create_request(src_mac, Ipv4Addr::from(src), Ipv4Addr::from(dst))
}

/// Builds a unicast "`sender_addr` is at `sender_mac`" frame addressed to `target_mac`.
pub fn create_reply(
    sender_mac: MacAddr,
    sender_addr: Ipv4Addr,
    target_mac: MacAddr,
    target_addr: Ipv4Addr,
) -> Result<Vec<u8>, FrameError> {
    create_frame(
        sender_mac,
        target_mac,
        ArpOperations::Reply,
        sender_addr,
        target_mac,
        target_addr,
    )
}

fn create_frame(
    src_mac: MacAddr,
    eth_dst: MacAddr,
    operation: ArpOperation,
    src_addr: Ipv4Addr,
    target_mac: MacAddr,
    target_addr: Ipv4Addr,
) -> Result<Vec<u8>, FrameError> {
    let mut buffer = [0u8; MIN_ETH_FRAME_NO_FCS];
    ethernet::make_header(&mut buffer, src_mac, eth_dst, EtherTypes::Arp)?;
    let mut arp_packet = MutableArpPacket::new(&mut buffer[ETH_HDR_LEN..ETH_HDR_LEN + ARP_LEN])
        .ok_or(FrameError::Buffer("ARP"))?;
    arp_packet.set_hardware_type(ArpHardwareTypes::Ethernet);
    arp_packet.set_protocol_type(EtherTypes::Ipv4);
    arp_packet.set_hw_addr_len(HW_ADDR_LEN as u8);
    arp_packet.set_proto_addr_len(PROTO_ADDR_LEN as u8);
    arp_packet.set_operation(operation);
    arp_packet.set_sender_hw_addr(src_mac);
    arp_packet.set_sender_proto_addr(src_addr);
    arp_packet.set_target_hw_addr(target_mac);
    arp_packet.set_target_proto_addr(target_addr);
    Ok(Vec::from(buffer))
}

/// Decodes an Ethernet frame carrying ARP for IPv4.
///
/// Returns `None` for other ethertypes, truncated payloads or unexpected
/// address sizes.
pub fn parse_frame(frame: &[u8]) -> Option<ArpRecord> {
    let eth = EthernetPacket::new(frame)?;
    if eth.get_ethertype() != EtherTypes::Arp {
        return None;
    }
    let arp = ArpPacket::new(eth.payload())?;
    if arp.get_hardware_type() != ArpHardwareTypes::Ethernet
        || arp.get_protocol_type() != EtherTypes::Ipv4
        || usize::from(arp.get_hw_addr_len()) != HW_ADDR_LEN
        || usize::from(arp.get_proto_addr_len()) != PROTO_ADDR_LEN
    {
        return None;
    }

    Some(ArpRecord {
        operation: arp.get_operation(),
        sender_mac: arp.get_sender_hw_addr(),
        sender_addr: arp.get_sender_proto_addr(),
        target_mac: arp.get_target_hw_addr(),
        target_addr: arp.get_target_proto_addr(),
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
