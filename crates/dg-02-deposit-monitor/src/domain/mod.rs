//! # Domain Module
//!
//! Pure logic of a detection cycle: the state snapshot and its dedup rule,
//! the key intersection and topic derivation.

pub mod intersection;
pub mod state;
pub mod topic;

pub use intersection::find_intersections;
pub use state::ContractsState;
pub use topic::{message_topic, ChainPrefixes};
