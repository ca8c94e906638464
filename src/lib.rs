//! Rust Clearing Engine Library
//! # Overview
//!
//! This library reconciles open financial ledger items: raw records
//! extracted from an external ledger system are matched into zero-sum
//! groups according to per-account rules, and the matched groups are
//! condensed into clearing input for posting.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (LedgerItem, ClearingGroup, RuleSet, etc.)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Per-entity matching orchestration
//!   - [`core::matchers`] - The account-level matching strategies
//!   - [`core::clearing_input`] - Grouping of matched items for posting
//!   - [`core::entity_state`] - Per-entity run-state tracking
//!   - [`core::posting`] - Posting boundary and outcome write-back
//!   - [`core::calendar`] - Posting-date arithmetic
//! - [`io`] - Export parsing and report output
//! - [`strategy`] - Sequential and entity-parallel run strategies
//! - [`logging`] - Tracing subscriber setup
//!
//! # Matching Strategies
//!
//! Each account is matched by one of five strategies, selected from its
//! rule in fixed priority order:
//!
//! - **Oldest-Assignment**: pair duplicated magnitudes within an
//!   assignment, oldest documents first
//! - **Cumulative-Sum**: match the value-date-ordered prefix through the
//!   last zero crossing of the running sum
//! - **Deal-Number**: match (currency, deal number) groups that net to
//!   zero, with a per-entity exclusion filter
//! - **Trading-Partner**: restrict candidates to a partner id set, then
//!   run the general cascade
//! - **General cascade**: whole-currency sums, absolute-amount groups,
//!   then one pass per configured criterion
//!
//! # Item Status
//!
//! Each item carries four mutable status fields maintained by the run:
//! - `matched`: part of a zero-sum group
//! - `processed`: evaluated, no further matching attempt
//! - `excluded`: matched but intentionally not cleared
//! - `message`: human-readable outcome of matching or posting

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod strategy;
pub mod types;

pub use crate::core::{
    clear_open_items, generate_clearing_input, EntityStates, ItemPoster, MatchStrategy,
    MatchingEngine, SharedEntityStates,
};
pub use io::write_items_csv;
pub use types::{
    AccountId, ClearingError, ClearingGroup, ClearingInput, Criterion, EntityCode, EntityRules,
    LedgerItem, PostingError, RuleSet,
};
