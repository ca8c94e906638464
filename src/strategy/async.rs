//! Entity-parallel run strategy
//!
//! This module provides an asynchronous, multi-threaded implementation of
//! the ProcessingStrategy trait. Entity passes are independent and
//! stateless relative to each other, so they are spawned as concurrent
//! tasks on a tokio runtime; each task owns its entity's item table from
//! read to clearing input.
//!
//! # Shared State
//!
//! The only shared state is the entity state tracker
//! ([`SharedEntityStates`]), written with single-writer-per-key
//! discipline: every entity's flags are touched solely by the task
//! processing that entity.

use crate::core::entity_state::SharedEntityStates;
use crate::core::{generate_clearing_input, MatchingEngine};
use crate::io::async_reader;
use crate::strategy::{EntityExport, EntityOutcome, ProcessingStrategy, RunOutput};
use crate::types::{ClearingError, RuleSet};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Configuration for the entity-parallel strategy
#[derive(Clone, Debug)]
pub struct RunConfig {
    /// Number of runtime worker threads processing entities concurrently
    pub max_concurrent_entities: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_concurrent_entities: num_cpus::get(),
        }
    }
}

impl RunConfig {
    /// Create a new RunConfig with a custom concurrency bound
    ///
    /// A zero value falls back to the default (CPU count) with a warning.
    pub fn new(max_concurrent_entities: usize) -> Self {
        let default = Self::default();

        let max_concurrent_entities = if max_concurrent_entities == 0 {
            warn!(
                "invalid max_concurrent_entities (0), using default ({})",
                default.max_concurrent_entities
            );
            default.max_concurrent_entities
        } else {
            max_concurrent_entities
        };

        Self {
            max_concurrent_entities,
        }
    }
}

/// Entity-parallel run strategy
///
/// Spawns one task per entity export on a multi-threaded tokio runtime.
/// Produces the same outcomes as [`super::SyncProcessingStrategy`] for
/// the same inputs; only wall-clock behavior differs.
#[derive(Debug, Clone)]
pub struct AsyncProcessingStrategy {
    config: RunConfig,
}

impl AsyncProcessingStrategy {
    /// Create a new AsyncProcessingStrategy with the given configuration
    pub fn new(config: RunConfig) -> Self {
        Self { config }
    }
}

impl ProcessingStrategy for AsyncProcessingStrategy {
    fn run(&self, exports: &[EntityExport], rules: &RuleSet) -> Result<RunOutput, String> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(self.config.max_concurrent_entities)
            .build()
            .map_err(|e| format!("Failed to create tokio runtime: {}", e))?;

        runtime.block_on(async {
            let states = SharedEntityStates::new(rules);
            let rules = Arc::new(rules.clone());

            let mut handles = Vec::with_capacity(exports.len());
            for export in exports.iter().cloned() {
                let states = states.clone();
                let rules = Arc::clone(&rules);
                handles.push(tokio::spawn(async move {
                    process_entity(export, &rules, &states).await
                }));
            }

            let mut outcomes = Vec::new();
            for handle in handles {
                match handle.await {
                    Ok(Ok(Some(outcome))) => outcomes.push(outcome),
                    Ok(Ok(None)) => {}
                    Ok(Err(e)) => return Err(e.to_string()),
                    Err(e) => return Err(format!("entity task failed: {}", e)),
                }
            }

            // concurrent completion order is arbitrary
            outcomes.sort_by(|a, b| a.entity.cmp(&b.entity));

            Ok(RunOutput {
                outcomes,
                states: states.snapshot(),
            })
        })
    }
}

/// Process one entity end to end, recording its run state
///
/// Returns `Ok(None)` for entity-level failures that the run recovers
/// from; only rule configuration errors propagate.
async fn process_entity(
    export: EntityExport,
    rules: &RuleSet,
    states: &SharedEntityStates,
) -> Result<Option<EntityOutcome>, ClearingError> {
    let Some(entity_rules) = rules.entities.get(&export.entity) else {
        warn!(
            "skipping export for entity '{}': not in the active rule set",
            export.entity
        );
        return Ok(None);
    };

    info!("processing export for entity '{}'", export.entity);

    let items = match async_reader::read_export(&export.path, &export.entity).await {
        Ok(items) => {
            states.set_exported(&export.entity, true);
            items
        }
        Err(e @ ClearingError::Io { .. }) => {
            error!("export for entity '{}' unreadable: {}", export.entity, e);
            return Ok(None);
        }
        Err(ClearingError::Conversion { .. }) => {
            states.set_exported(&export.entity, true);
            states.set_no_open_items(&export.entity, true);
            warn!("no open items found for entity '{}'", export.entity);
            return Ok(None);
        }
        Err(e) => {
            states.set_exported(&export.entity, true);
            error!("conversion failed for entity '{}': {}", export.entity, e);
            return Ok(None);
        }
    };

    let engine = MatchingEngine::new(entity_rules, &export.entity);
    let annotated = engine.find_matches(items)?;

    let clearing_input = generate_clearing_input(&annotated, &export.entity);
    info!(
        "{} items to clear found for entity '{}'",
        clearing_input.total_matched, export.entity
    );

    Ok(Some(EntityOutcome {
        entity: export.entity,
        items: annotated,
        clearing_input,
    }))
}
