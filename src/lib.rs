//! Facturachain Core Library
//!
//! A tamper-evident, append-only invoice ledger: each recorded invoice
//! image is persisted under an evidence directory and bound into a
//! SHA-256 hash-linked chain, with time-windowed aggregation reports.

pub mod chain;
pub mod config;
pub mod crypto;
pub mod error;
pub mod evidence;
pub mod storage;

pub use chain::{Block, InvoiceRecord, Ledger, Period, Report};
pub use config::Config;
pub use error::{Error, Result};

/// Ledger constants
pub mod constants {
    /// Default directory where evidence images are stored
    pub const EVIDENCE_DIR: &str = "facturas";

    /// Default directory for the chain store
    pub const DATA_DIR: &str = "ledger-db";

    /// File name recorded in the genesis payload
    pub const GENESIS_FILE_NAME: &str = "genesis";

    /// Decimal places used for report totals
    pub const AMOUNT_SCALE: u32 = 2;
}
