//! Clearing-input builder
//!
//! Condenses a matched item table into per-(account, currency) groups
//! ready for a posting call, plus the total matched count for reporting.
//! Matched-but-excluded items never enter a group; their status is only
//! visible in the report.

use crate::core::normalize::format_date_opt;
use crate::types::{ClearingGroup, ClearingInput, LedgerItem};
use std::collections::BTreeMap;
use std::collections::HashSet;

/// (entity, account) whose assignment/reference selection keys are always
/// suppressed: the account's open-item volume makes key-based selection
/// slower than selecting by document number alone
const SUPPRESSED_SELECTION: (&str, &str) = ("0073", "24182000");

/// Build the clearing input for one entity's annotated item table
///
/// For each account with at least one matched, non-excluded item, one
/// group per currency is produced, carrying the member columns and the
/// row indexes needed for the posting write-back. Deterministic and
/// idempotent: the same table always yields identical groups and index
/// lists.
pub fn generate_clearing_input(items: &[LedgerItem], entity: &str) -> ClearingInput {
    let mut input = ClearingInput::default();

    if !items.iter().any(|it| it.matched) {
        return input;
    }

    for account in unique_in_order(items.iter().map(|it| it.account.as_str())) {
        let subset: Vec<usize> = (0..items.len())
            .filter(|&i| items[i].account == account)
            .collect();

        if !subset.iter().any(|&i| items[i].matched) {
            continue;
        }

        let to_clear: Vec<usize> = subset
            .into_iter()
            .filter(|&i| items[i].is_clearable())
            .collect();

        // every match was excluded, nothing to post for this account
        if to_clear.is_empty() {
            continue;
        }

        input.total_matched += to_clear.len();

        let mut currencies: BTreeMap<String, ClearingGroup> = BTreeMap::new();
        for currency in unique_in_order(to_clear.iter().map(|&i| items[i].currency.as_str())) {
            let rows: Vec<usize> = to_clear
                .iter()
                .copied()
                .filter(|&i| items[i].currency == currency)
                .collect();

            currencies.insert(currency, build_group(items, &rows, entity, &account));
        }

        input.accounts.insert(account, currencies);
    }

    input
}

/// Assemble one (account, currency) group from its member rows
fn build_group(
    items: &[LedgerItem],
    rows: &[usize],
    entity: &str,
    account: &str,
) -> ClearingGroup {
    let assignments: Vec<String> = rows.iter().map(|&i| items[i].assignment.clone()).collect();
    let references: Vec<String> = rows.iter().map(|&i| items[i].reference.clone()).collect();
    let document_numbers: Vec<String> = rows
        .iter()
        .map(|&i| items[i].document_number.clone())
        .collect();

    let suppressed = (entity, account) == SUPPRESSED_SELECTION;
    let unique_assignments = selection_key(&assignments, suppressed);
    let unique_references = selection_key(&references, suppressed);

    ClearingGroup {
        amounts: rows.iter().map(|&i| items[i].amount).collect(),
        document_types: rows.iter().map(|&i| items[i].document_type.clone()).collect(),
        document_dates: rows
            .iter()
            .map(|&i| format_date_opt(items[i].document_date))
            .collect(),
        posting_dates: rows
            .iter()
            .map(|&i| format_date_opt(items[i].posting_date))
            .collect(),
        unique_assignments,
        unique_references,
        unique_document_numbers: unique_in_order(document_numbers.iter().map(String::as_str)),
        document_numbers,
        assignments,
        texts: rows.iter().map(|&i| items[i].text.clone()).collect(),
        trading_partners: rows
            .iter()
            .map(|&i| items[i].trading_partner.clone())
            .collect(),
        indexes: rows.to_vec(),
    }
}

/// Unique values usable as an open-item selection key
///
/// Suppressed (None) when requested by the caller or when any member
/// value is empty: a blank key would select unrelated open items.
fn selection_key(values: &[String], suppressed: bool) -> Option<Vec<String>> {
    if suppressed || values.iter().any(|v| v.is_empty()) {
        return None;
    }
    Some(unique_in_order(values.iter().map(String::as_str)))
}

/// Unique values preserving first-appearance order
fn unique_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(v.to_string()))
        .map(str::to_string)
        .collect()
}
