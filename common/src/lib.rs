//! Shared models, ports and configuration for `arpsweep`.
//!
//! * **[`network`]**: interface snapshots, eligibility checks and subnet enumeration.
//! * **[`capture`]**, **[`report`]**, **[`system`]**: the traits the scanner core
//!   consumes. Concrete adapters live in `arpsweep-core`.
//! * **[`config`]** and **[`error`]**: runtime settings and error types.

pub mod capture;
pub mod config;
pub mod error;
pub mod network;
pub mod report;
pub mod system;
