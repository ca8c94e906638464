//! Run strategy module for entity processing
//!
//! This module defines the Strategy pattern for complete clearing runs:
//! reading entity exports, converting them, matching and building the
//! clearing input, while maintaining per-entity run states. This allows
//! different processing implementations (synchronous, entity-parallel)
//! to be selected at runtime.

use crate::core::EntityStates;
use crate::types::{ClearingInput, LedgerItem, RuleSet};
use std::path::PathBuf;

pub mod r#async;
pub mod sync;

pub use self::r#async::{AsyncProcessingStrategy, RunConfig};
pub use sync::SyncProcessingStrategy;

/// One entity's export file, as handed to a run strategy
#[derive(Debug, Clone, PartialEq)]
pub struct EntityExport {
    /// Entity (company) code the export belongs to
    pub entity: String,

    /// Path to the raw export text file
    pub path: PathBuf,
}

/// One processed entity's results
#[derive(Debug, Clone, PartialEq)]
pub struct EntityOutcome {
    /// Entity (company) code
    pub entity: String,

    /// The annotated item table, in the engine's canonical order
    pub items: Vec<LedgerItem>,

    /// Clearing input built from the matched items
    pub clearing_input: ClearingInput,
}

/// Results of a whole clearing run
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutput {
    /// Per-entity outcomes, sorted by entity code
    pub outcomes: Vec<EntityOutcome>,

    /// Final per-entity run states
    pub states: EntityStates,
}

impl RunOutput {
    /// Total count of matched, non-excluded items across all entities
    pub fn total_matched(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| o.clearing_input.total_matched)
            .sum()
    }
}

/// Run strategy trait for complete clearing runs
///
/// Each strategy processes a batch of entity exports against the loaded
/// rule set: read, convert, match, build clearing input, and track the
/// per-entity run state.
///
/// # Error Handling
///
/// Entity-level failures (unreadable file, empty export, unparsable
/// amount) are recorded in the run states and logged; processing
/// continues with the next entity. Unusable rules abort the run: a
/// misconfigured account must never be silently skipped.
pub trait ProcessingStrategy: Send + Sync {
    /// Process all entity exports and return the run's outcomes
    ///
    /// # Arguments
    ///
    /// * `exports` - One export file per entity
    /// * `rules` - The loaded rule set
    ///
    /// # Returns
    ///
    /// * `Ok(RunOutput)` with outcomes sorted by entity code
    /// * `Err(String)` if a fatal error occurred (rule configuration,
    ///   runtime construction)
    fn run(&self, exports: &[EntityExport], rules: &RuleSet) -> Result<RunOutput, String>;
}

/// Create a run strategy based on the specified strategy type
///
/// Factory selecting the implementation at runtime from the CLI's
/// strategy flag; the optional config only applies to the async
/// strategy.
pub fn create_strategy(
    strategy_type: crate::cli::StrategyType,
    config: Option<RunConfig>,
) -> Box<dyn ProcessingStrategy> {
    match strategy_type {
        crate::cli::StrategyType::Sync => Box::new(SyncProcessingStrategy),
        crate::cli::StrategyType::Async => {
            let config = config.unwrap_or_default();
            Box::new(AsyncProcessingStrategy::new(config))
        }
    }
}
