//! # Ports Module
//!
//! Domain collaborators the monitor reads from and escalates through. The
//! chain provider and the message bus come from the shared crates.

pub mod outbound;

pub use outbound::*;
