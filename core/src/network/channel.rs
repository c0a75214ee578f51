use std::io;
use std::thread;
use std::time::Duration;

use pnet::datalink::{
    self, Channel, Config as DatalinkConfig, DataLinkReceiver, DataLinkSender, NetworkInterface,
};
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use arpsweep_common::capture::{CaptureProvider, CaptureSession, FrameSink, FrameSource};
use arpsweep_common::error::ScanError;
use arpsweep_common::network::interface::InterfaceDescriptor;

/// Back-off after a read error that is not a plain timeout.
const READ_ERROR_BACKOFF: Duration = Duration::from_millis(100);

/// Opens promiscuous Ethernet channels through `pnet`.
#[derive(Debug, Clone, Copy)]
pub struct PnetCapture {
    read_timeout: Duration,
}

impl PnetCapture {
    pub fn new(read_timeout: Duration) -> Self {
        Self { read_timeout }
    }

    fn config(&self) -> DatalinkConfig {
        DatalinkConfig {
            read_timeout: Some(self.read_timeout),
            promiscuous: true,
            ..Default::default()
        }
    }
}

impl CaptureProvider for PnetCapture {
    fn open(&self, interface: &InterfaceDescriptor) -> Result<CaptureSession, ScanError> {
        let (tx, rx) = open_eth_channel(interface.link(), &self.config(), datalink::channel)?;
        debug!("[{}] capture session opened", interface.name());
        Ok(CaptureSession {
            source: Box::new(PnetSource(rx)),
            sink: Box::new(PnetSink(tx)),
        })
    }
}

pub struct PnetSource(Box<dyn DataLinkReceiver>);

impl FrameSource for PnetSource {
    fn next_frame(&mut self) -> io::Result<Vec<u8>> {
        self.0.next().map(|frame| frame.to_vec())
    }
}

pub struct PnetSink(Box<dyn DataLinkSender>);

impl FrameSink for PnetSink {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()> {
        match self.0.send_to(frame, None) {
            Some(result) => result,
            None => Err(io::Error::other("datalink sender returned no result")),
        }
    }
}

fn open_eth_channel<F>(
    intf: &NetworkInterface,
    cfg: &DatalinkConfig,
    channel_opener: F,
) -> Result<(Box<dyn DataLinkSender>, Box<dyn DataLinkReceiver>), ScanError>
where
    F: FnOnce(&NetworkInterface, DatalinkConfig) -> io::Result<Channel>,
{
    match channel_opener(intf, *cfg) {
        Ok(Channel::Ethernet(tx, rx)) => Ok((tx, rx)),
        Ok(_) => Err(ScanError::UnsupportedChannel(intf.name.clone())),
        Err(source) => Err(ScanError::CaptureOpen {
            name: intf.name.clone(),
            source,
        }),
    }
}

/// Handle on the thread owning a session's [`FrameSource`].
pub struct CaptureReader {
    name: String,
    handle: thread::JoinHandle<()>,
}

impl CaptureReader {
    /// Waits until the reader thread has dropped its source.
    ///
    /// Only returns after the frame queue was dropped, at most one read
    /// timeout later.
    pub async fn join(self) {
        let name: String = self.name;
        let handle = self.handle;
        match tokio::task::spawn_blocking(move || handle.join()).await {
            Ok(Ok(())) => {}
            Ok(Err(_)) => warn!("[{name}] capture reader panicked"),
            Err(e) => warn!("[{name}] failed to join capture reader: {e}"),
        }
    }
}

/// Moves the blocking read side onto its own thread and bridges frames into
/// an async queue.
///
/// The thread exits once the returned receiver is dropped. It notices this on
/// the next frame or read timeout.
pub fn start_capture(
    name: &str,
    mut source: Box<dyn FrameSource>,
) -> Result<(mpsc::UnboundedReceiver<Vec<u8>>, CaptureReader), ScanError> {
    let (queue_tx, queue_rx) = mpsc::unbounded_channel();
    let label: String = name.to_string();

    let handle = thread::Builder::new()
        .name(format!("capture-{name}"))
        .spawn(move || {
            while !queue_tx.is_closed() {
                match source.next_frame() {
                    Ok(frame) => {
                        if queue_tx.send(frame).is_err() {
                            break;
                        }
                    }
                    Err(e) if e.kind() == io::ErrorKind::TimedOut => {}
                    Err(e) => {
                        trace!("[{label}] capture read failed: {e}");
                        thread::sleep(READ_ERROR_BACKOFF);
                    }
                }
            }
            debug!("[{label}] capture reader released");
        })
        .map_err(|source| ScanError::CaptureOpen {
            name: name.to_string(),
            source,
        })?;

    let reader = CaptureReader {
        name: name.to_string(),
        handle,
    };
    Ok((queue_rx, reader))
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
