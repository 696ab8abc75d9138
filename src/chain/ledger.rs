//! The ledger core: append and report over the hash-linked chain
//!
//! The ledger is the sole owner of the in-memory chain, the chain store,
//! and the evidence directory. Appends run under a mutex so no two
//! callers can extend from the same tail, and a block becomes visible to
//! readers only after it has been made durable.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::chain::{
    build_report, create_genesis_block, current_timestamp, Block, InvoiceRecord, Period, Report,
};
use crate::config::Config;
use crate::crypto::BlockHash;
use crate::error::{Error, Result};
use crate::evidence::EvidenceStore;
use crate::storage::ChainDb;

/// Append-only invoice ledger
pub struct Ledger {
    inner: Mutex<LedgerInner>,
}

struct LedgerInner {
    chain: Vec<Block>,
    db: ChainDb,
    evidence: EvidenceStore,
}

impl Ledger {
    /// Open a ledger, creating directories and the genesis block on first use
    ///
    /// An existing chain store is reloaded and integrity-checked; a store
    /// that fails verification refuses to open.
    pub fn open(config: &Config) -> Result<Self> {
        let evidence = EvidenceStore::open(&config.evidence_dir, config.collision_policy)?;
        let db = ChainDb::open(&config.data_dir)?;

        let chain = if db.is_empty()? {
            let genesis = create_genesis_block();
            db.append_block(&genesis)?;
            tracing::info!(hash = %genesis.hash, "created genesis block");
            vec![genesis]
        } else {
            let chain = db.load_chain()?;
            verify_chain(&chain)?;

            if let Some((height, tip)) = db.load_metadata()? {
                let last = &chain[chain.len() - 1];
                if height != last.index || tip != last.hash.as_str() {
                    tracing::warn!(height, %tip, "store metadata out of step with block log");
                }
            }

            let tip = &chain[chain.len() - 1];
            tracing::info!(height = tip.index, hash = %tip.hash, "loaded chain from store");
            chain
        };

        Ok(Self {
            inner: Mutex::new(LedgerInner {
                chain,
                db,
                evidence,
            }),
        })
    }

    /// Validate and store an invoice image, then append a block recording it
    ///
    /// All-or-nothing: any failure leaves both the chain and the evidence
    /// directory unchanged (a stored copy is removed again if the block
    /// write fails).
    pub fn append(&self, source_path: &Path, amount: Decimal) -> Result<Block> {
        if amount <= Decimal::ZERO {
            return Err(Error::MalformedAmount(format!(
                "amount must be positive, got {amount}"
            )));
        }

        let mut inner = self.inner.lock().unwrap();

        let stored_name = inner.evidence.validate_and_store(source_path)?;

        let previous_hash = inner
            .chain
            .last()
            .expect("chain always contains genesis")
            .hash
            .clone();
        let block = Block::new(
            inner.chain.len() as u64,
            current_timestamp(),
            InvoiceRecord {
                file_name: stored_name.clone(),
                amount,
            },
            previous_hash,
        );

        if let Err(err) = inner.db.append_block(&block) {
            tracing::error!(%err, file = %stored_name, "block write failed, removing stored evidence");
            inner.evidence.remove(&stored_name);
            return Err(err);
        }

        tracing::info!(index = block.index, file = %stored_name, %amount, "appended invoice block");
        inner.chain.push(block.clone());
        Ok(block)
    }

    /// Aggregate non-genesis entries for a period, evaluated against now
    pub fn report(&self, period: Period) -> Report {
        self.report_at(period, Utc::now())
    }

    /// Report variant taking an explicit instant (fixed clock in tests)
    pub fn report_at(&self, period: Period, now: DateTime<Utc>) -> Report {
        let inner = self.inner.lock().unwrap();
        build_report(&inner.chain, period, now)
    }

    /// Recompute every digest and check linkage, sentinel, and contiguity
    pub fn verify(&self) -> Result<()> {
        let inner = self.inner.lock().unwrap();
        verify_chain(&inner.chain)
    }

    /// Number of blocks after genesis
    pub fn height(&self) -> u64 {
        let inner = self.inner.lock().unwrap();
        (inner.chain.len() as u64) - 1
    }

    /// Digest of the newest block
    pub fn tip_hash(&self) -> BlockHash {
        let inner = self.inner.lock().unwrap();
        inner.chain[inner.chain.len() - 1].hash.clone()
    }

    /// Snapshot of the chain contents
    pub fn blocks(&self) -> Vec<Block> {
        let inner = self.inner.lock().unwrap();
        inner.chain.clone()
    }
}

/// Check the full set of chain invariants over a block sequence
fn verify_chain(chain: &[Block]) -> Result<()> {
    let genesis = chain
        .first()
        .ok_or_else(|| Error::CorruptChain("chain is empty".to_string()))?;
    if !genesis.is_genesis() {
        return Err(Error::CorruptChain(
            "first block is not a genesis block".to_string(),
        ));
    }

    for (i, block) in chain.iter().enumerate() {
        if block.index != i as u64 {
            return Err(Error::CorruptChain(format!(
                "block at position {i} carries index {}",
                block.index
            )));
        }
        if !block.is_intact() {
            return Err(Error::CorruptChain(format!(
                "block {} digest does not match its contents",
                block.index
            )));
        }
        if i > 0 && block.previous_hash != chain[i - 1].hash {
            return Err(Error::CorruptChain(format!(
                "block {} does not link to its predecessor",
                block.index
            )));
        }
    }

    Ok(())
}
