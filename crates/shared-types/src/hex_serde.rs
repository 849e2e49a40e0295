//! Hex (de)serialisation for byte containers.
//!
//! Use with `#[serde(with = "shared_types::hex_serde")]` on any field whose
//! type is `AsRef<[u8]>` and `TryFrom<Vec<u8>>` (fixed arrays and `Vec<u8>`).
//! Output is lowercase with a `0x` prefix; input accepts the prefix optionally.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serializer};

/// Serialize bytes as a `0x`-prefixed hex string.
pub fn serialize<S, T>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    T: AsRef<[u8]>,
{
    serializer.serialize_str(&crate::entities::to_hex(bytes.as_ref()))
}

/// Deserialize bytes from a hex string, checking the length for fixed arrays.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<Vec<u8>>,
{
    let text = String::deserialize(deserializer)?;
    let raw = hex::decode(text.trim_start_matches("0x")).map_err(D::Error::custom)?;
    let len = raw.len();
    T::try_from(raw).map_err(|_| D::Error::custom(format!("unexpected byte length {len}")))
}
