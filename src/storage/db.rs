//! Chain persistence using Sled
//!
//! Blocks are made durable before they are published to readers: the
//! ledger calls `append_block`, which flushes to disk, and only then
//! pushes the block into the in-memory chain.

use sled::{Db, Tree};
use std::path::Path;

use crate::chain::Block;
use crate::error::Result;

const HEIGHT_KEY: &str = "height";
const TIP_KEY: &str = "tip_hash";

/// Database wrapper
#[derive(Debug, Clone)]
pub struct ChainDb {
    db: Db,
    blocks_tree: Tree,
    metadata_tree: Tree,
}

impl ChainDb {
    /// Open or create the database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path)?;
        let blocks_tree = db.open_tree("blocks")?;
        let metadata_tree = db.open_tree("metadata")?;

        Ok(Self {
            db,
            blocks_tree,
            metadata_tree,
        })
    }

    /// Whether no block has been written yet
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.blocks_tree.is_empty())
    }

    /// Durably append a block under its index
    pub fn append_block(&self, block: &Block) -> Result<()> {
        let key = block.index.to_be_bytes();
        let value = bincode::serialize(block)?;
        self.blocks_tree.insert(key, value)?;
        self.metadata_tree
            .insert(HEIGHT_KEY, &block.index.to_be_bytes())?;
        self.metadata_tree
            .insert(TIP_KEY, block.hash.as_str().as_bytes())?;
        self.db.flush()?;
        Ok(())
    }

    /// Load every block, in index order
    ///
    /// Big-endian keys sort the same way the indexes do, so the tree scan
    /// yields the chain in order.
    pub fn load_chain(&self) -> Result<Vec<Block>> {
        let mut chain = Vec::new();
        for item in self.blocks_tree.iter() {
            let (_, value) = item?;
            let block: Block = bincode::deserialize(&value)?;
            chain.push(block);
        }
        Ok(chain)
    }

    /// Load the height/tip metadata mirror, if present
    pub fn load_metadata(&self) -> Result<Option<(u64, String)>> {
        let height_bytes = self.metadata_tree.get(HEIGHT_KEY)?;
        let tip_bytes = self.metadata_tree.get(TIP_KEY)?;

        if let (Some(height), Some(tip)) = (height_bytes, tip_bytes) {
            if height.len() != 8 {
                return Ok(None);
            }
            let mut h_bytes = [0u8; 8];
            h_bytes.copy_from_slice(&height);

            Ok(Some((
                u64::from_be_bytes(h_bytes),
                String::from_utf8_lossy(&tip).to_string(),
            )))
        } else {
            Ok(None)
        }
    }
}
