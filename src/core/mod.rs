//! Core business logic module
//!
//! This module contains the reconciliation components:
//! - `normalize` - Amount/date parsing and their inverse formatters
//! - `engine` - Per-entity matching orchestration
//! - `matchers` - The account-level matching strategies
//! - `clearing_input` - Grouping of matched items for posting
//! - `entity_state` - Per-entity run-state tracking (sync and shared)
//! - `posting` - Posting collaborator boundary and outcome write-back
//! - `calendar` - Deterministic posting-date arithmetic

pub mod calendar;
pub mod clearing_input;
pub mod engine;
pub mod entity_state;
pub mod matchers;
pub mod normalize;
pub mod posting;

pub use clearing_input::generate_clearing_input;
pub use engine::MatchingEngine;
pub use entity_state::{EntityState, EntityStates, SharedEntityStates};
pub use matchers::{CascadeKey, MatchStrategy};
pub use posting::{clear_open_items, ItemPoster};
