//! # Adapters Module
//!
//! Port implementations the runtime wires into the subsystems.
//!
//! | Adapter | Ports |
//! |---------|-------|
//! | `DevnetChain` | `ChainProvider`, `AddressResolver`, `KeysRegistry` |
//! | `DevnetConnector` | `ContractConnector` |
//! | `BoundDepositRegistry` | `DepositRegistry` |
//! | `DevnetSecurityGateway` | `SecurityGateway` |

pub mod contracts;
pub mod devnet;
pub mod security;

pub use contracts::{BoundDepositRegistry, DevnetConnector};
pub use devnet::DevnetChain;
pub use security::DevnetSecurityGateway;

use sha3::{Digest, Keccak256};
use shared_types::Hash;

/// Keccak-256 over the concatenation of `parts`.
pub(crate) fn keccak(parts: &[&[u8]]) -> Hash {
    let mut hasher = Keccak256::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}
