//! Clearing-input types
//!
//! The clearing-input builder condenses matched, non-excluded items into
//! per-(account, currency) groups that a posting collaborator can consume
//! in a single clearing call.

use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// One clearing call's worth of matched items for an (account, currency)
///
/// Carries both the raw per-item columns (amounts, document data, texts)
/// and the derived unique-value lists the posting collaborator uses as
/// open-item selection keys.
///
/// # Invariants
///
/// `unique_assignments` / `unique_references` are `Some` only when every
/// member item has a non-empty value for that field; a single empty value
/// suppresses the whole list, signalling that selection by this key is
/// unsafe.
#[derive(Debug, Clone, PartialEq)]
pub struct ClearingGroup {
    /// Signed amounts of the member items, in group order
    pub amounts: Vec<Decimal>,

    /// Document numbers of the member items
    pub document_numbers: Vec<String>,

    /// Document types of the member items
    pub document_types: Vec<String>,

    /// Document dates formatted `dd.mm.yyyy`, empty string for missing dates
    pub document_dates: Vec<String>,

    /// Posting dates formatted `dd.mm.yyyy`, empty string for missing dates
    pub posting_dates: Vec<String>,

    /// Unique assignment values usable as a selection key, if safe
    pub unique_assignments: Option<Vec<String>>,

    /// Unique reference values usable as a selection key, if safe
    pub unique_references: Option<Vec<String>>,

    /// Unique document numbers, always usable as a selection key
    pub unique_document_numbers: Vec<String>,

    /// Assignment of every member item, in group order
    pub assignments: Vec<String>,

    /// Free text of every member item, in group order
    pub texts: Vec<String>,

    /// Trading partner of every member item, in group order
    pub trading_partners: Vec<String>,

    /// Row indexes into the annotated item table, used by the posting
    /// write-back to record outcomes on the originating rows
    pub indexes: Vec<usize>,
}

impl ClearingGroup {
    /// Number of items in the group
    pub fn len(&self) -> usize {
        self.indexes.len()
    }

    /// Whether the group contains no items
    pub fn is_empty(&self) -> bool {
        self.indexes.is_empty()
    }
}

/// Clearing input for one entity: account → currency → group
///
/// Ordered maps keep posting calls deterministic; the iteration order
/// equals the engine's (account, currency) sort order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClearingInput {
    /// Groups ready for posting, keyed by account then currency
    pub accounts: BTreeMap<String, BTreeMap<String, ClearingGroup>>,

    /// Total count of matched, non-excluded items across the entity,
    /// reported to users
    pub total_matched: usize,
}

impl ClearingInput {
    /// Whether any group was produced
    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Iterate groups in posting order: by account, then currency
    pub fn groups(&self) -> impl Iterator<Item = (&String, &String, &ClearingGroup)> {
        self.accounts.iter().flat_map(|(account, currencies)| {
            currencies
                .iter()
                .map(move |(currency, group)| (account, currency, group))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn group(indexes: Vec<usize>) -> ClearingGroup {
        ClearingGroup {
            amounts: vec![],
            document_numbers: vec![],
            document_types: vec![],
            document_dates: vec![],
            posting_dates: vec![],
            unique_assignments: None,
            unique_references: None,
            unique_document_numbers: vec![],
            assignments: vec![],
            texts: vec![],
            trading_partners: vec![],
            indexes,
        }
    }

    #[test]
    fn test_groups_iterate_in_account_then_currency_order() {
        let mut input = ClearingInput::default();
        let mut acc_b = BTreeMap::new();
        acc_b.insert("EUR".to_string(), group(vec![0]));
        let mut acc_a = BTreeMap::new();
        acc_a.insert("USD".to_string(), group(vec![1]));
        acc_a.insert("EUR".to_string(), group(vec![2]));
        input.accounts.insert("20000000".to_string(), acc_b);
        input.accounts.insert("10000000".to_string(), acc_a);

        let order: Vec<(String, String)> = input
            .groups()
            .map(|(acc, curr, _)| (acc.clone(), curr.clone()))
            .collect();

        assert_eq!(
            order,
            vec![
                ("10000000".to_string(), "EUR".to_string()),
                ("10000000".to_string(), "USD".to_string()),
                ("20000000".to_string(), "EUR".to_string()),
            ]
        );
    }

    #[test]
    fn test_group_len() {
        let g = group(vec![3, 5, 8]);
        assert_eq!(g.len(), 3);
        assert!(!g.is_empty());
    }
}
