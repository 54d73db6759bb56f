//! Merkle root construction over ordered JSON leaves.
//!
//! Hash layout:
//!   leaf  = SHA-256(canonical bytes of the leaf value)
//!   inner = SHA-256(left ‖ right), raw 32-byte digests, left first
//!
//! Odd layers duplicate their last node before pairing, so a layer of `n`
//! nodes always yields `⌈n/2⌉` parents.  An empty leaf list has the fixed
//! root SHA-256("").
//!
//! Only whole-tree roots are computed.  Every append rehashes the full log.

use serde_json::Value;
use sha2::{Digest as _, Sha256};

use crate::encode::encode_leaf;

/// A raw SHA-256 digest.
pub type Digest = [u8; 32];

/// Hex root of an empty leaf list: SHA-256 of the empty byte string.
pub const EMPTY_ROOT_HEX: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// SHA-256 of `data`.
pub fn hash_bytes(data: &[u8]) -> Digest {
    Sha256::digest(data).into()
}

/// Hash one leaf through the canonical encoder.
pub fn hash_leaf(value: &Value) -> Digest {
    hash_bytes(&encode_leaf(value))
}

/// Hash the concatenation `left ‖ right`.
pub fn hash_pair(left: &Digest, right: &Digest) -> Digest {
    let mut hasher = Sha256::new();
    hasher.update(left);
    hasher.update(right);
    hasher.finalize().into()
}

/// Fold one layer into its parent layer.
///
/// A trailing unpaired node is paired with itself.
pub fn next_layer(nodes: &[Digest]) -> Vec<Digest> {
    nodes
        .chunks(2)
        .filter_map(|pair| Some(hash_pair(pair.first()?, pair.last()?)))
        .collect()
}

/// Compute the Merkle root of `leaves` in order.
pub fn merkle_root(leaves: &[Value]) -> Digest {
    if leaves.is_empty() {
        return hash_bytes(b"");
    }

    let mut layer: Vec<Digest> = leaves.iter().map(hash_leaf).collect();
    while layer.len() > 1 {
        layer = next_layer(&layer);
    }
    layer[0]
}

/// `merkle_root` rendered as 64 lowercase hex characters.
pub fn merkle_root_hex(leaves: &[Value]) -> String {
    hex::encode(merkle_root(leaves))
}
