//! Benchmark suite for the matching strategies
//!
//! Compares the per-account matching strategies over synthetic item
//! tables using the divan benchmarking framework.
//!
//! # Running Benchmarks
//!
//! ```bash
//! cargo bench
//! ```

use chrono::NaiveDate;
use rust_clearing_engine::core::{CascadeKey, MatchStrategy};
use rust_clearing_engine::types::LedgerItem;
use rust_decimal::Decimal;

fn main() {
    divan::main();
}

/// Build a synthetic account table of `pairs` offsetting item pairs
fn synthetic_items(pairs: usize) -> Vec<LedgerItem> {
    let mut items = Vec::with_capacity(pairs * 2);
    for n in 0..pairs {
        let amount = Decimal::new(1000 + n as i64, 2);
        for signed in [amount, -amount] {
            items.push(LedgerItem {
                entity: "0001".to_string(),
                account: "10000000".to_string(),
                currency: if n % 3 == 0 { "EUR" } else { "USD" }.to_string(),
                amount: signed,
                amount_abs: amount,
                document_number: format!("49{:08}", n),
                document_type: "SA".to_string(),
                document_date: NaiveDate::from_ymd_opt(2026, 1, (n % 27 + 1) as u32),
                posting_date: NaiveDate::from_ymd_opt(2026, 1, 31),
                value_date: NaiveDate::from_ymd_opt(2026, 1, (n % 27 + 1) as u32),
                assignment: format!("ASSIGN{:04}", n % 50),
                reference: format!("INV-{:04}", n % 25),
                trading_partner: format!("VND{:02}", n % 5),
                text: format!("item {}", n),
                deal_number: Some(format!("60{:011}", n)),
                posting_number: None,
                matched: false,
                processed: false,
                excluded: false,
                message: String::new(),
            });
        }
    }
    items
}

#[divan::bench(args = [100, 1000])]
fn oldest_assignment(bencher: divan::Bencher, pairs: usize) {
    let items = synthetic_items(pairs);
    bencher.bench(|| {
        let mut table = items.clone();
        MatchStrategy::OldestAssignment
            .apply(divan::black_box(&mut table), "0001")
            .expect("matching failed");
        table
    });
}

#[divan::bench(args = [100, 1000])]
fn cumulative_sum(bencher: divan::Bencher, pairs: usize) {
    let items = synthetic_items(pairs);
    bencher.bench(|| {
        let mut table = items.clone();
        MatchStrategy::CumulativeSum
            .apply(divan::black_box(&mut table), "0001")
            .expect("matching failed");
        table
    });
}

#[divan::bench(args = [100, 1000])]
fn deal_number(bencher: divan::Bencher, pairs: usize) {
    let items = synthetic_items(pairs);
    bencher.bench(|| {
        let mut table = items.clone();
        MatchStrategy::DealNumber
            .apply(divan::black_box(&mut table), "499L")
            .expect("matching failed");
        table
    });
}

#[divan::bench(args = [100, 1000])]
fn amount_sum_cascade(bencher: divan::Bencher, pairs: usize) {
    let items = synthetic_items(pairs);
    let strategy = MatchStrategy::AmountSum {
        partners: vec![],
        cascade: vec![CascadeKey::Assignment, CascadeKey::Reference],
    };
    bencher.bench(|| {
        let mut table = items.clone();
        strategy
            .apply(divan::black_box(&mut table), "0001")
            .expect("matching failed");
        table
    });
}
