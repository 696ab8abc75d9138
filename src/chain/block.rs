//! Block structure for the invoice chain
//!
//! Defines the immutable block, its invoice payload, and the canonical
//! serialization its digest is computed over.

use chrono::{SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::crypto::{sha256_hex, BlockHash};

/// Invoice data recorded in a block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceRecord {
    /// Stored base name of the evidence image
    pub file_name: String,
    /// Monetary amount extracted from the invoice
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// A single link in the invoice chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    /// Position in the chain (0 = genesis)
    pub index: u64,
    /// RFC 3339 instant recorded at creation
    pub timestamp: String,
    /// Invoice payload
    pub invoice: InvoiceRecord,
    /// Digest of the preceding block, or `"0"` for genesis
    pub previous_hash: BlockHash,
    /// Digest of this block's canonical serialization
    pub hash: BlockHash,
}

impl Block {
    /// Create a block, deriving its digest from the other four fields
    pub fn new(
        index: u64,
        timestamp: String,
        invoice: InvoiceRecord,
        previous_hash: BlockHash,
    ) -> Self {
        let hash = hash_fields(index, &timestamp, &invoice, &previous_hash);
        Self {
            index,
            timestamp,
            invoice,
            previous_hash,
            hash,
        }
    }

    /// Recompute the digest from the stored fields
    pub fn compute_hash(&self) -> BlockHash {
        hash_fields(self.index, &self.timestamp, &self.invoice, &self.previous_hash)
    }

    /// Whether the stored digest matches the block's contents
    pub fn is_intact(&self) -> bool {
        self.compute_hash() == self.hash
    }

    /// Check if this is the genesis block
    pub fn is_genesis(&self) -> bool {
        self.index == 0 && self.previous_hash.is_sentinel()
    }
}

/// Digest over the canonical serialization of the four input fields.
///
/// The encoding is a JSON object; `serde_json`'s default map keeps keys in
/// lexicographic order, so the same logical content always serializes to
/// the same bytes regardless of field-construction order.
fn hash_fields(
    index: u64,
    timestamp: &str,
    invoice: &InvoiceRecord,
    previous_hash: &BlockHash,
) -> BlockHash {
    let canonical = serde_json::json!({
        "index": index,
        "timestamp": timestamp,
        "invoice": invoice,
        "previous_hash": previous_hash,
    });
    sha256_hex(canonical.to_string().as_bytes())
}

/// RFC 3339 timestamp for newly created blocks
pub fn current_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
