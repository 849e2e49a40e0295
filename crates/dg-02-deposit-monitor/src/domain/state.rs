//! # Contracts State
//!
//! Snapshot read once per attest cycle and compared against the previous
//! one to skip redundant attestations.

use serde::{Deserialize, Serialize};
use shared_types::Hash;

/// Deposit state observed by one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractsState {
    /// Operation index of the keys registry.
    pub keys_op_index: u64,
    /// Root of the beacon deposit contract.
    pub deposit_root: Hash,
    /// Block the state was read at.
    pub block_number: u64,
}

impl ContractsState {
    /// Resigning period this state falls into.
    ///
    /// A window of zero is treated as one block.
    #[must_use]
    pub fn window_index(&self, resigning_window: u64) -> u64 {
        self.block_number / resigning_window.max(1)
    }

    /// Whether `self` repeats `previous`.
    ///
    /// Same root, same op index and the same resigning period. There is no
    /// previous state on the first cycle, which is never the same.
    #[must_use]
    pub fn is_same_state(&self, previous: Option<&ContractsState>, resigning_window: u64) -> bool {
        let Some(previous) = previous else {
            return false;
        };

        self.deposit_root == previous.deposit_root
            && self.keys_op_index == previous.keys_op_index
            && self.window_index(resigning_window) == previous.window_index(resigning_window)
    }
}
