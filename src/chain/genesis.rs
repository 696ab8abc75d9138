//! Genesis block construction
//!
//! Every chain starts from a genesis block carrying the fixed sentinel
//! previous hash and a zero-amount placeholder record. The genesis block
//! is stamped with the current time at creation, so it is unique per
//! ledger rather than reproducible across runs.

use rust_decimal::Decimal;

use crate::chain::{current_timestamp, Block, InvoiceRecord};
use crate::constants::GENESIS_FILE_NAME;
use crate::crypto::BlockHash;

/// Create the genesis block
pub fn create_genesis_block() -> Block {
    Block::new(
        0,
        current_timestamp(),
        InvoiceRecord {
            file_name: GENESIS_FILE_NAME.to_string(),
            amount: Decimal::ZERO,
        },
        BlockHash::sentinel(),
    )
}
