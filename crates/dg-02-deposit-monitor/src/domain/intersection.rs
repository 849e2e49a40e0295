//! # Key Intersection
//!
//! Keys queued for signing that are already deposited. Any hit is evidence
//! of a front-run with a reused key.

use shared_types::PubKey;
use std::collections::HashSet;

/// Keys of `next_signing_keys` present in `deposited`, in queue order.
#[must_use]
pub fn find_intersections(next_signing_keys: &[PubKey], deposited: &HashSet<PubKey>) -> Vec<PubKey> {
    next_signing_keys
        .iter()
        .filter(|key| deposited.contains(*key))
        .copied()
        .collect()
}
