//! Reporting handoff
//!
//! Serializes an annotated item table to CSV. This file is the sole
//! contract with the reporting collaborator: every status the run
//! produced (match flags, exclusions, posting numbers, messages) is
//! visible here, one row per open item, in table order.

use crate::core::normalize::{format_amount, format_date_opt};
use crate::types::LedgerItem;
use std::io::Write;

/// Column order of the report
const REPORT_HEADER: [&str; 18] = [
    "entity",
    "account",
    "document_number",
    "document_type",
    "document_date",
    "posting_date",
    "value_date",
    "currency",
    "amount",
    "assignment",
    "reference",
    "trading_partner",
    "text",
    "deal_number",
    "matched",
    "excluded",
    "posting_number",
    "message",
];

/// Write an annotated item table to CSV
///
/// Amounts and dates are rendered in the external ledger's formats
/// (`1.234,56-`, `dd.mm.yyyy`) so the report reads like the source
/// system. Row order equals table order, which the engine already made
/// deterministic.
///
/// # Errors
///
/// Returns an error string when writing fails.
pub fn write_items_csv(items: &[LedgerItem], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(REPORT_HEADER)
        .map_err(|e| format!("Failed to write report header: {}", e))?;

    for item in items {
        writer
            .write_record(&[
                item.entity.clone(),
                item.account.clone(),
                item.document_number.clone(),
                item.document_type.clone(),
                format_date_opt(item.document_date),
                format_date_opt(item.posting_date),
                format_date_opt(item.value_date),
                item.currency.clone(),
                format_amount(item.amount),
                item.assignment.clone(),
                item.reference.clone(),
                item.trading_partner.clone(),
                item.text.clone(),
                item.deal_number.clone().unwrap_or_default(),
                item.matched.to_string(),
                item.excluded.to_string(),
                item.posting_number.clone().unwrap_or_default(),
                item.message.clone(),
            ])
            .map_err(|e| format!("Failed to write report row: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush report: {}", e))?;

    Ok(())
}
