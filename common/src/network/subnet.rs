//! Candidate enumeration for an interface's IPv4 subnet.
//!
//! A sweep probes every address from the network (base) address up to, but
//! not including, the broadcast address. The base address stays in the set.

use std::net::Ipv4Addr;

use pnet::ipnetwork::Ipv4Network;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subnet {
    base: Ipv4Addr,
    mask: Ipv4Addr,
}

impl Subnet {
    pub fn new(addr: Ipv4Addr, mask: Ipv4Addr) -> Self {
        let base: u32 = u32::from(addr) & u32::from(mask);
        Self {
            base: Ipv4Addr::from(base),
            mask,
        }
    }

    pub fn base(&self) -> Ipv4Addr {
        self.base
    }

    pub fn mask(&self) -> Ipv4Addr {
        self.mask
    }

    /// Number of addresses covered by the mask, broadcast included.
    fn span(&self) -> u64 {
        1u64 << (32 - u32::from(self.mask).count_ones())
    }

    /// Number of probe candidates, i.e. the span minus the broadcast address.
    pub fn len(&self) -> u64 {
        self.span() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ascending iterator over `[base, broadcast)`.
    ///
    /// Recomputed on every call. A /32 yields nothing.
    pub fn candidates(&self) -> Candidates {
        Candidates {
            next: u64::from(u32::from(self.base)),
            remaining: self.len(),
        }
    }
}

impl From<Ipv4Network> for Subnet {
    fn from(network: Ipv4Network) -> Self {
        Self::new(network.ip(), network.mask())
    }
}

#[derive(Debug, Clone)]
pub struct Candidates {
    next: u64,
    remaining: u64,
}

impl Iterator for Candidates {
    type Item = Ipv4Addr;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let addr = Ipv4Addr::from(self.next as u32);
        self.next += 1;
        self.remaining -= 1;
        Some(addr)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
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
