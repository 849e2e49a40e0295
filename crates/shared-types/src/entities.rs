//! # Core Chain Entities
//!
//! ## Clusters
//!
//! - **Primitives**: `Address`, `Hash`, `PubKey`
//! - **Block references**: `BlockTag`, `BlockRef`, `BlockHeader`

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::ParseError;

// =============================================================================
// PRIMITIVES
// =============================================================================

/// A 32-byte hash (block hash, deposit root, message prefix).
pub type Hash = [u8; 32];

/// A 20-byte Ethereum-style address.
pub type Address = [u8; 20];

/// Numeric chain identifier (EIP-155).
pub type ChainId = u64;

/// Length of a BLS12-381 validator public key.
pub const PUBKEY_LENGTH: usize = 48;

/// A validator public key.
///
/// Serialized as a `0x`-prefixed hex string.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PubKey(#[serde(with = "crate::hex_serde")] pub [u8; PUBKEY_LENGTH]);

impl PubKey {
    /// Raw key bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8; PUBKEY_LENGTH] {
        &self.0
    }
}

impl From<[u8; PUBKEY_LENGTH]> for PubKey {
    fn from(bytes: [u8; PUBKEY_LENGTH]) -> Self {
        Self(bytes)
    }
}

impl FromStr for PubKey {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = hex::decode(s.trim_start_matches("0x"))
            .map_err(|e| ParseError::InvalidHex(e.to_string()))?;
        let bytes: [u8; PUBKEY_LENGTH] = raw.try_into().map_err(|raw: Vec<u8>| {
            ParseError::InvalidLength {
                expected: PUBKEY_LENGTH,
                got: raw.len(),
            }
        })?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_hex(&self.0))
    }
}

impl fmt::Debug for PubKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PubKey({})", to_hex(&self.0))
    }
}

/// Format bytes as lowercase `0x`-prefixed hex.
#[must_use]
pub fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

// =============================================================================
// BLOCK REFERENCES
// =============================================================================

/// Named block tags understood by the chain provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockTag {
    /// The most recent mined block.
    Latest,
    /// The block currently being built.
    Pending,
}

impl fmt::Display for BlockTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockTag::Latest => f.write_str("latest"),
            BlockTag::Pending => f.write_str("pending"),
        }
    }
}

/// The block at which a contract read is evaluated.
///
/// Either pinned to a block hash or resolved by tag at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BlockRef {
    /// Pin to an exact block.
    Hash(#[serde(with = "crate::hex_serde")] Hash),
    /// Resolve by tag when the call executes.
    Tag(BlockTag),
}

impl BlockRef {
    /// Shorthand for `BlockRef::Tag(BlockTag::Latest)`.
    pub const LATEST: BlockRef = BlockRef::Tag(BlockTag::Latest);

    /// Shorthand for `BlockRef::Tag(BlockTag::Pending)`.
    pub const PENDING: BlockRef = BlockRef::Tag(BlockTag::Pending);
}

impl fmt::Display for BlockRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockRef::Hash(hash) => f.write_str(&to_hex(hash)),
            BlockRef::Tag(tag) => fmt::Display::fmt(tag, f),
        }
    }
}

impl From<Hash> for BlockRef {
    fn from(hash: Hash) -> Self {
        BlockRef::Hash(hash)
    }
}

/// Minimal block header returned by the chain provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockHeader {
    /// Block hash.
    #[serde(with = "crate::hex_serde")]
    pub hash: Hash,
    /// Block number (height).
    pub number: u64,
}

impl BlockHeader {
    /// Reference that pins contract reads to this block.
    #[must_use]
    pub fn block_ref(&self) -> BlockRef {
        BlockRef::Hash(self.hash)
    }
}
