//! Per-interface ARP scanning engine.
//!
//! * **[`scanner`]**: the coordinator fanning out one reply listener and one
//!   probe driver per eligible interface.
//! * **[`network`]**: `pnet` backed capture sessions.
//! * **[`discovery`]**, **[`system`]**: adapters for reporting and interface enumeration.

pub mod discovery;
pub mod network;
pub mod scanner;
pub mod system;
