//! Property-based tests for the invoice chain
//!
//! These verify the chain invariants hold under random inputs.

use chrono::Utc;
use proptest::prelude::*;
use rust_decimal::Decimal;

use facturachain::chain::{build_report, create_genesis_block, Block, InvoiceRecord, Period};
use facturachain::crypto::BlockHash;

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    // cents in [0.01, 10_000.00]
    (1i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn build_chain(amounts: &[Decimal]) -> Vec<Block> {
    let mut chain = vec![create_genesis_block()];
    for (i, amount) in amounts.iter().enumerate() {
        let previous_hash = chain[chain.len() - 1].hash.clone();
        chain.push(Block::new(
            chain.len() as u64,
            Utc::now().to_rfc3339(),
            InvoiceRecord {
                file_name: format!("invoice_{i}.jpg"),
                amount: *amount,
            },
            previous_hash,
        ));
    }
    chain
}

proptest! {
    /// Every non-genesis block links to its predecessor's digest, and
    /// indexes are contiguous from zero
    #[test]
    fn prop_chain_linkage(
        amounts in proptest::collection::vec(amount_strategy(), 0..20)
    ) {
        let chain = build_chain(&amounts);

        prop_assert_eq!(chain[0].index, 0);
        prop_assert!(chain[0].previous_hash.is_sentinel());

        for i in 1..chain.len() {
            prop_assert_eq!(&chain[i].previous_hash, &chain[i - 1].hash);
            prop_assert_eq!(chain[i].index, i as u64);
        }
    }

    /// Recomputing a digest from the stored fields reproduces the stored value
    #[test]
    fn prop_hash_recomputable(
        amounts in proptest::collection::vec(amount_strategy(), 1..10)
    ) {
        let chain = build_chain(&amounts);
        for block in &chain {
            prop_assert_eq!(block.compute_hash(), block.hash.clone());
            prop_assert!(block.is_intact());
        }
    }

    /// Same fields always produce the same digest
    #[test]
    fn prop_hash_deterministic(amount in amount_strategy()) {
        let record = InvoiceRecord {
            file_name: "invoice.jpg".to_string(),
            amount,
        };
        let timestamp = "2026-03-01T10:00:00+00:00".to_string();

        let a = Block::new(1, timestamp.clone(), record.clone(), BlockHash::sentinel());
        let b = Block::new(1, timestamp, record, BlockHash::sentinel());
        prop_assert_eq!(a.hash, b.hash);
    }

    /// Mutating the amount invalidates the stored digest
    #[test]
    fn prop_tamper_detection(
        amount in amount_strategy(),
        delta in 1i64..100_000
    ) {
        let chain = build_chain(&[amount]);
        let mut tampered = chain[1].clone();
        tampered.invoice.amount += Decimal::new(delta, 2);

        prop_assert_ne!(tampered.compute_hash(), tampered.hash.clone());
        prop_assert!(!tampered.is_intact());
    }

    /// An "all" report conserves the total of every non-genesis amount
    #[test]
    fn prop_report_all_conserves_total(
        amounts in proptest::collection::vec(amount_strategy(), 0..20)
    ) {
        let chain = build_chain(&amounts);
        let report = build_report(&chain, Period::All, Utc::now());

        let expected: Decimal = amounts.iter().copied().sum();
        prop_assert_eq!(report.total, expected.round_dp(2));
        prop_assert_eq!(report.entries.len(), amounts.len());
    }

    /// The genesis block is excluded from every period
    #[test]
    fn prop_genesis_excluded_from_reports(
        amounts in proptest::collection::vec(amount_strategy(), 0..5)
    ) {
        let chain = build_chain(&amounts);
        for period in [Period::Weekly, Period::Monthly, Period::Yearly, Period::All] {
            let report = build_report(&chain, period, Utc::now());
            for entry in &report.entries {
                prop_assert_ne!(&entry.file_name, "genesis");
            }
        }
    }
}
