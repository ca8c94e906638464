//! Per-entity run-state tracking
//!
//! Orchestration phases record three independent flags per entity and
//! consult them to decide whether later phases should skip the entity.
//! The key set is fixed when the rules are loaded: touching an unknown
//! entity is a programming error, not a runtime condition, and panics.
//!
//! Two flavors exist, mirroring the sync/async split of the run
//! strategies: [`EntityStates`] for sequential runs and
//! [`SharedEntityStates`] (DashMap-backed) for concurrent entity passes
//! with single-writer-per-key discipline.

use crate::types::RuleSet;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Run state of one entity
///
/// Created all-false when rules are loaded, updated once per phase,
/// read by later phases, dropped at the end of the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntityState {
    /// The entity's export was obtained and read successfully
    pub exported: bool,

    /// The entity's clearing phase ran to completion
    pub cleared: bool,

    /// The entity's export contained no open items
    pub no_open_items: bool,
}

/// Single-threaded entity state tracker
///
/// # Panics
///
/// All accessors panic when given an entity code that was not present in
/// the rule set at construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityStates {
    states: HashMap<String, EntityState>,
}

impl EntityStates {
    /// Create one all-false state per entity in the rule set
    pub fn new(rules: &RuleSet) -> Self {
        EntityStates {
            states: rules
                .entities
                .keys()
                .map(|code| (code.clone(), EntityState::default()))
                .collect(),
        }
    }

    /// Read an entity's state
    pub fn get(&self, entity: &str) -> EntityState {
        match self.states.get(entity) {
            Some(state) => *state,
            None => panic!("unknown entity '{}' in state tracker", entity),
        }
    }

    /// Record whether the entity's export was read successfully
    pub fn set_exported(&mut self, entity: &str, value: bool) {
        self.state_mut(entity).exported = value;
    }

    /// Record that the entity's clearing phase completed
    pub fn set_cleared(&mut self, entity: &str, value: bool) {
        self.state_mut(entity).cleared = value;
    }

    /// Record that the entity's export held no open items
    pub fn set_no_open_items(&mut self, entity: &str, value: bool) {
        self.state_mut(entity).no_open_items = value;
    }

    /// Iterate states in unspecified order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &EntityState)> {
        self.states.iter()
    }

    fn state_mut(&mut self, entity: &str) -> &mut EntityState {
        match self.states.get_mut(entity) {
            Some(state) => state,
            None => panic!("unknown entity '{}' in state tracker", entity),
        }
    }
}

/// Thread-safe entity state tracker for concurrent entity passes
///
/// Cloning is cheap (shared map). Each entity's flags must only be
/// written by the task responsible for that entity.
///
/// # Panics
///
/// Like [`EntityStates`], accessors panic for entities outside the fixed
/// key set.
#[derive(Debug, Clone)]
pub struct SharedEntityStates {
    states: Arc<DashMap<String, EntityState>>,
}

impl SharedEntityStates {
    /// Create one all-false state per entity in the rule set
    pub fn new(rules: &RuleSet) -> Self {
        let states = DashMap::new();
        for code in rules.entities.keys() {
            states.insert(code.clone(), EntityState::default());
        }
        SharedEntityStates {
            states: Arc::new(states),
        }
    }

    /// Read an entity's state
    pub fn get(&self, entity: &str) -> EntityState {
        match self.states.get(entity) {
            Some(state) => *state,
            None => panic!("unknown entity '{}' in state tracker", entity),
        }
    }

    /// Record whether the entity's export was read successfully
    pub fn set_exported(&self, entity: &str, value: bool) {
        self.with_state(entity, |state| state.exported = value);
    }

    /// Record that the entity's clearing phase completed
    pub fn set_cleared(&self, entity: &str, value: bool) {
        self.with_state(entity, |state| state.cleared = value);
    }

    /// Record that the entity's export held no open items
    pub fn set_no_open_items(&self, entity: &str, value: bool) {
        self.with_state(entity, |state| state.no_open_items = value);
    }

    /// Copy the current states into a single-threaded tracker
    pub fn snapshot(&self) -> EntityStates {
        EntityStates {
            states: self
                .states
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
        }
    }

    fn with_state(&self, entity: &str, f: impl FnOnce(&mut EntityState)) {
        match self.states.get_mut(entity) {
            Some(mut state) => f(state.value_mut()),
            None => panic!("unknown entity '{}' in state tracker", entity),
        }
    }
}
