pub mod interfaces;
pub mod scan;

use std::time::Duration;

use arpsweep_common::config::{Config, MAX_PROBE_INTERVAL_SECS};
use clap::{ArgAction, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "arpsweep")]
#[command(about = "Continuously discover hosts on local Ethernet segments with ARP.")]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Seconds between two sweeps of the same interface
    #[arg(short = 'n', long, global = true, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..=MAX_PROBE_INTERVAL_SECS))]
    pub interval: u64,

    /// Only use the named interface (repeatable)
    #[arg(short, long = "interface", value_name = "NAME", global = true)]
    pub interfaces: Vec<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Probe and listen on every eligible interface until interrupted (default)
    #[command(alias = "s")]
    Scan,
    /// List local interfaces and whether they are eligible for scanning
    #[command(alias = "i")]
    Interfaces,
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> Config {
        Config {
            probe_interval: Duration::from_secs(self.interval),
            interfaces: self.interfaces.clone(),
            ..Default::default()
        }
    }
}
