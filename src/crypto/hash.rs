//! SHA-256 hashing for block digests
//!
//! Every digest in the chain is a hex-encoded SHA-256 of a block's
//! canonical serialization. The genesis block carries the fixed sentinel
//! `"0"` as its previous hash, so digests are held in string form.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Previous-hash value carried by the genesis block
pub const GENESIS_SENTINEL: &str = "0";

/// Hex-encoded SHA-256 digest, or the genesis sentinel
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlockHash(String);

impl BlockHash {
    /// The sentinel used as the genesis block's previous hash
    pub fn sentinel() -> Self {
        BlockHash(GENESIS_SENTINEL.to_string())
    }

    /// Whether this is the genesis sentinel rather than a real digest
    pub fn is_sentinel(&self) -> bool {
        self.0 == GENESIS_SENTINEL
    }

    /// Get the hex string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlockHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Hash arbitrary bytes with SHA-256, hex-encoded
pub fn sha256_hex(data: &[u8]) -> BlockHash {
    let digest = Sha256::digest(data);
    BlockHash(hex::encode(digest))
}
