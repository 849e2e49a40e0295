//! # Guardian Messages
//!
//! Payloads a guardian broadcasts. Both carry the guardian's view of the
//! deposit state at a block plus its signature over that view; the signing
//! scheme itself is produced by the security collaborator.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash};

/// Evidence that deposits must be paused at `block_number`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PauseMessage {
    /// Deposit contract root observed by the guardian.
    #[serde(with = "shared_types::hex_serde")]
    pub deposit_root: Hash,
    /// Registry keys operation index observed by the guardian.
    pub keys_op_index: u64,
    /// Block the pause was signed for.
    pub block_number: u64,
    /// Hash of that block.
    #[serde(with = "shared_types::hex_serde")]
    pub block_hash: Hash,
    /// Address of the signing guardian.
    #[serde(with = "shared_types::hex_serde")]
    pub guardian_address: Address,
    /// Position in the on-chain guardian list, `None` if absent.
    pub guardian_index: Option<u32>,
    /// Signature over the pause message.
    #[serde(with = "shared_types::hex_serde")]
    pub signature: Vec<u8>,
}

/// Attestation that the deposit state is clean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositMessage {
    /// Deposit contract root the attestation covers.
    #[serde(with = "shared_types::hex_serde")]
    pub deposit_root: Hash,
    /// Registry keys operation index the attestation covers.
    pub keys_op_index: u64,
    /// Block the attestation was signed for.
    pub block_number: u64,
    /// Hash of that block.
    #[serde(with = "shared_types::hex_serde")]
    pub block_hash: Hash,
    /// Address of the signing guardian.
    #[serde(with = "shared_types::hex_serde")]
    pub guardian_address: Address,
    /// Position in the on-chain guardian list, `None` if absent.
    pub guardian_index: Option<u32>,
    /// Signature over the attest message.
    #[serde(with = "shared_types::hex_serde")]
    pub signature: Vec<u8>,
}

/// Message kinds, used as log fields and metric labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    Pause,
    Deposit,
}

impl MessageType {
    /// Stable lowercase name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Pause => "pause",
            MessageType::Deposit => "deposit",
        }
    }
}

/// Everything a guardian can publish.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GuardianMessage {
    Pause(PauseMessage),
    Deposit(DepositMessage),
}

impl GuardianMessage {
    /// Kind of this message.
    #[must_use]
    pub fn message_type(&self) -> MessageType {
        match self {
            GuardianMessage::Pause(_) => MessageType::Pause,
            GuardianMessage::Deposit(_) => MessageType::Deposit,
        }
    }

    /// Guardian list position of the signer.
    #[must_use]
    pub fn guardian_index(&self) -> Option<u32> {
        match self {
            GuardianMessage::Pause(m) => m.guardian_index,
            GuardianMessage::Deposit(m) => m.guardian_index,
        }
    }

    /// Block the message was signed for.
    #[must_use]
    pub fn block_number(&self) -> u64 {
        match self {
            GuardianMessage::Pause(m) => m.block_number,
            GuardianMessage::Deposit(m) => m.block_number,
        }
    }
}

impl From<PauseMessage> for GuardianMessage {
    fn from(message: PauseMessage) -> Self {
        GuardianMessage::Pause(message)
    }
}

impl From<DepositMessage> for GuardianMessage {
    fn from(message: DepositMessage) -> Self {
        GuardianMessage::Deposit(message)
    }
}

/// A message together with the topic it was published to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusEnvelope {
    pub topic: String,
    pub message: GuardianMessage,
}
