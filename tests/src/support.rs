use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc as std_mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use arpsweep_common::capture::{CaptureProvider, CaptureSession, FrameSink, FrameSource};
use arpsweep_common::error::ScanError;
use arpsweep_common::network::interface::InterfaceDescriptor;
use pnet::datalink::{MacAddr, NetworkInterface};
use pnet::ipnetwork::IpNetwork;

pub const IFF_UP: u32 = 1;
pub const IFF_BROADCAST: u32 = 1 << 1;
pub const IFF_LOOPBACK: u32 = 1 << 3;

pub fn interface(name: &str, cidr: Option<&str>, mac: MacAddr, flags: u32) -> NetworkInterface {
    NetworkInterface {
        name: name.to_string(),
        description: String::new(),
        index: 0,
        mac: Some(mac),
        ips: cidr
            .map(|c| vec![IpNetwork::V4(c.parse().unwrap())])
            .unwrap_or_default(),
        flags,
    }
}

/// Test-side handle on one opened capture session.
pub struct Link {
    writes: Arc<AtomicUsize>,
    inject: Mutex<std_mpsc::Sender<Vec<u8>>>,
}

impl Link {
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn inject(&self, frame: Vec<u8>) {
        let _ = self.inject.lock().unwrap().send(frame);
    }
}

struct QueueSource(std_mpsc::Receiver<Vec<u8>>);

impl FrameSource for QueueSource {
    fn next_frame(&mut self) -> io::Result<Vec<u8>> {
        match self.0.recv_timeout(Duration::from_millis(10)) {
            Ok(frame) => Ok(frame),
            Err(std_mpsc::RecvTimeoutError::Timeout) => {
                Err(io::Error::from(io::ErrorKind::TimedOut))
            }
            Err(std_mpsc::RecvTimeoutError::Disconnected) => {
                std::thread::sleep(Duration::from_millis(10));
                Err(io::Error::from(io::ErrorKind::TimedOut))
            }
        }
    }
}

struct CountingSink {
    writes: Arc<AtomicUsize>,
    broken: bool,
}

impl FrameSink for CountingSink {
    fn send_frame(&mut self, _frame: &[u8]) -> io::Result<()> {
        if self.broken {
            return Err(io::Error::new(io::ErrorKind::NetworkDown, "link down"));
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// In-memory capture provider recording every session it hands out.
#[derive(Default)]
pub struct FakeCapture {
    refused: HashSet<String>,
    broken: HashSet<String>,
    links: Mutex<HashMap<String, Arc<Link>>>,
}

impl FakeCapture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn refusing(mut self, name: &str) -> Self {
        self.refused.insert(name.to_string());
        self
    }

    pub fn with_broken_writes(mut self, name: &str) -> Self {
        self.broken.insert(name.to_string());
        self
    }

    pub fn link(&self, name: &str) -> Option<Arc<Link>> {
        self.links.lock().unwrap().get(name).cloned()
    }

    pub fn opened(&self) -> Vec<String> {
        let mut names: Vec<String> = self.links.lock().unwrap().keys().cloned().collect();
        names.sort();
        names
    }
}

impl CaptureProvider for FakeCapture {
    fn open(&self, interface: &InterfaceDescriptor) -> Result<CaptureSession, ScanError> {
        let name: &str = interface.name();
        if self.refused.contains(name) {
            return Err(ScanError::CaptureOpen {
                name: name.to_string(),
                source: io::Error::from(io::ErrorKind::PermissionDenied),
            });
        }

        let (inject, frames) = std_mpsc::channel();
        let writes = Arc::new(AtomicUsize::new(0));
        let link = Arc::new(Link {
            writes: writes.clone(),
            inject: Mutex::new(inject),
        });
        self.links.lock().unwrap().insert(name.to_string(), link);

        Ok(CaptureSession {
            source: Box::new(QueueSource(frames)),
            sink: Box::new(CountingSink {
                writes,
                broken: self.broken.contains(name),
            }),
        })
    }
}

/// Polls `condition` until it holds or `limit` runs out.
pub async fn wait_until<F>(condition: F, limit: Duration) -> bool
where
    F: Fn() -> bool,
{
    let poll = async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    };
    within(limit, poll).await.is_some()
}

pub async fn within<T>(limit: Duration, fut: impl Future<Output = T>) -> Option<T> {
    tokio::time::timeout(limit, fut).await.ok()
}
