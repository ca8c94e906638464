//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `item`: Ledger item row and identifier aliases
//! - `clearing`: Clearing-input group structures
//! - `rules`: Matching rules and rule-file loading
//! - `error`: Error types for the clearing engine

pub mod clearing;
pub mod error;
pub mod item;
pub mod rules;

pub use clearing::{ClearingGroup, ClearingInput};
pub use error::{ClearingError, PostingError};
pub use item::{AccountId, EntityCode, LedgerItem};
pub use rules::{AccountRule, Criterion, EntityRules, RuleSet};
