//! Synchronous run strategy
//!
//! This module provides a synchronous, single-threaded implementation of
//! the ProcessingStrategy trait. Entities are processed one after the
//! other; each pass coordinates the sync export reader, the matching
//! engine and the clearing-input builder, and records the entity's run
//! state.
//!
//! # Error Handling
//!
//! Per-entity failures never stop the run: an unreadable export leaves
//! `exported` false, an export without item lines sets `no_open_items`,
//! and a conversion failure is logged. Only unusable rules abort the
//! whole run.

use crate::core::entity_state::EntityStates;
use crate::core::{generate_clearing_input, MatchingEngine};
use crate::io::sync_reader;
use crate::strategy::{EntityExport, EntityOutcome, ProcessingStrategy, RunOutput};
use crate::types::{ClearingError, RuleSet};
use tracing::{error, info, warn};

/// Synchronous run strategy
///
/// Processes entities sequentially with no shared state beyond the
/// entity state tracker. Deterministic: outcomes depend only on the
/// inputs.
#[derive(Debug, Clone, Copy)]
pub struct SyncProcessingStrategy;

impl ProcessingStrategy for SyncProcessingStrategy {
    fn run(&self, exports: &[EntityExport], rules: &RuleSet) -> Result<RunOutput, String> {
        let mut states = EntityStates::new(rules);
        let mut outcomes = Vec::new();

        for export in exports {
            let Some(entity_rules) = rules.entities.get(&export.entity) else {
                warn!(
                    "skipping export for entity '{}': not in the active rule set",
                    export.entity
                );
                continue;
            };

            info!("processing export for entity '{}'", export.entity);

            let items = match sync_reader::read_export(&export.path, &export.entity) {
                Ok(items) => {
                    states.set_exported(&export.entity, true);
                    items
                }
                Err(e @ ClearingError::Io { .. }) => {
                    error!("export for entity '{}' unreadable: {}", export.entity, e);
                    continue;
                }
                Err(ClearingError::Conversion { .. }) => {
                    states.set_exported(&export.entity, true);
                    states.set_no_open_items(&export.entity, true);
                    warn!("no open items found for entity '{}'", export.entity);
                    continue;
                }
                Err(e) => {
                    states.set_exported(&export.entity, true);
                    error!("conversion failed for entity '{}': {}", export.entity, e);
                    continue;
                }
            };

            let engine = MatchingEngine::new(entity_rules, &export.entity);
            let annotated = engine.find_matches(items).map_err(|e| e.to_string())?;

            let clearing_input = generate_clearing_input(&annotated, &export.entity);
            if clearing_input.is_empty() {
                info!("no matches found for entity '{}'", export.entity);
            } else {
                info!(
                    "{} items to clear found for entity '{}'",
                    clearing_input.total_matched, export.entity
                );
            }

            outcomes.push(EntityOutcome {
                entity: export.entity.clone(),
                items: annotated,
                clearing_input,
            });
        }

        outcomes.sort_by(|a, b| a.entity.cmp(&b.entity));

        Ok(RunOutput { outcomes, states })
    }
}
