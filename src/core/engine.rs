//! Open-item matching engine
//!
//! This module provides the MatchingEngine that orchestrates one entity's
//! matching pass: it sorts the item table into a deterministic order,
//! walks the per-account runs, validates each account's rule and hands
//! the subset to the strategy selected from that rule.
//!
//! The engine enforces:
//! - a stable global sort by (account, currency, absolute amount, posting
//!   date) so every downstream strategy sees reproducible tie-breaks
//! - skipping of inactive accounts (their items stay unmatched)
//! - immediate surfacing of unusable rules instead of silent skips

use crate::core::matchers::{cmp_dates_missing_last, MatchStrategy};
use crate::types::{ClearingError, Criterion, EntityRules, LedgerItem};
use tracing::debug;

/// Matching engine for one entity's item table
///
/// Holds the entity's rules and code; `find_matches` consumes an item
/// table and returns it annotated, sorted into the engine's canonical
/// order. The table is passed by value: callers must not assume aliasing
/// with their own copy.
pub struct MatchingEngine<'a> {
    rules: &'a EntityRules,
    entity: &'a str,
}

impl<'a> MatchingEngine<'a> {
    /// Create an engine for one entity
    ///
    /// # Arguments
    ///
    /// * `rules` - The entity's per-account matching rules
    /// * `entity` - The entity code the items belong to
    pub fn new(rules: &'a EntityRules, entity: &'a str) -> Self {
        MatchingEngine { rules, entity }
    }

    /// Match one entity's items against its account rules
    ///
    /// Sorts the table, then applies each active account's strategy to
    /// its contiguous run of rows. Items of inactive accounts are left
    /// untouched (unmatched but retained).
    ///
    /// # Returns
    ///
    /// The annotated table in (account, currency, absolute amount,
    /// posting date) order.
    ///
    /// # Errors
    ///
    /// * `EmptyInput` - the table contains no rows
    /// * `Configuration` - an account has no rule, an empty criterion
    ///   list, or an unrecognized criterion code
    pub fn find_matches(
        &self,
        mut items: Vec<LedgerItem>,
    ) -> Result<Vec<LedgerItem>, ClearingError> {
        if items.is_empty() {
            return Err(ClearingError::empty_input(self.entity));
        }

        sort_for_matching(&mut items);

        let mut start = 0;
        while start < items.len() {
            let account = items[start].account.clone();
            let end = start
                + items[start..]
                    .iter()
                    .position(|it| it.account != account)
                    .unwrap_or(items.len() - start);

            let rule = self.rules.accounts.get(&account).ok_or_else(|| {
                ClearingError::configuration(&account, "no rule configured for account")
            })?;

            if !rule.active {
                debug!("account '{}' inactive, items left unmatched", account);
                start = end;
                continue;
            }

            let criteria = Criterion::parse_all(&account, &rule.criteria)?;
            let strategy = MatchStrategy::from_criteria(&criteria);
            debug!(
                "matching account '{}' ({} items) with {:?}",
                account,
                end - start,
                strategy
            );

            strategy
                .apply(&mut items[start..end], self.entity)
                .map_err(|e| match e {
                    ClearingError::EmptyInput { .. } => ClearingError::empty_input(&account),
                    other => other,
                })?;

            start = end;
        }

        Ok(items)
    }
}

/// Stable sort into the canonical matching order
///
/// (account, currency, absolute amount, posting date), missing posting
/// dates last. Stability is what makes every later tie-break (oldest
/// document selection, cumulative-sum ordering) reproducible.
fn sort_for_matching(items: &mut [LedgerItem]) {
    items.sort_by(|a, b| {
        a.account
            .cmp(&b.account)
            .then_with(|| a.currency.cmp(&b.currency))
            .then_with(|| a.amount_abs.cmp(&b.amount_abs))
            .then_with(|| cmp_dates_missing_last(a.posting_date, b.posting_date))
    });
}
