//! Ports for raw link-layer capture sessions.
//!
//! A session is split into its two directions up front: the listener side
//! only ever reads, the probing side only ever writes, so neither half needs
//! to be shared or locked.

use std::io;

use crate::error::ScanError;
use crate::network::interface::InterfaceDescriptor;

/// Blocking read side of a capture session.
pub trait FrameSource: Send {
    /// Blocks until the next frame arrives.
    ///
    /// Implementations may return [`io::ErrorKind::TimedOut`] periodically so
    /// the caller gets a chance to notice shutdown.
    fn next_frame(&mut self) -> io::Result<Vec<u8>>;
}

/// Write side of a capture session.
pub trait FrameSink: Send {
    fn send_frame(&mut self, frame: &[u8]) -> io::Result<()>;
}

pub struct CaptureSession {
    pub source: Box<dyn FrameSource>,
    pub sink: Box<dyn FrameSink>,
}

/// Opens one capture session per interface.
pub trait CaptureProvider: Send + Sync {
    fn open(&self, interface: &InterfaceDescriptor) -> Result<CaptureSession, ScanError>;
}
