//! Discovery reporters.
//!
//! Listeners hand every decoded reply to a [`DiscoveryReporter`]. The binary
//! logs them; embedders and tests collect them through a channel instead.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use arpsweep_common::report::{Discovery, DiscoveryReporter};

/// Emits one log line per discovery.
pub struct LogReporter;

impl DiscoveryReporter for LogReporter {
    fn report(&self, discovery: &Discovery) {
        info!("{discovery}");
    }
}

/// Forwards discoveries to an unbounded channel.
pub struct ChannelReporter {
    tx: UnboundedSender<Discovery>,
}

impl ChannelReporter {
    pub fn new() -> (Self, UnboundedReceiver<Discovery>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl DiscoveryReporter for ChannelReporter {
    fn report(&self, discovery: &Discovery) {
        if self.tx.send(discovery.clone()).is_err() {
            debug!("discovery receiver dropped, {discovery} not delivered");
        }
    }
}
