//! Raw export format handling for ledger item records
//!
//! This module centralizes the record-converter concerns:
//! - Filtering item lines out of a raw export text block
//! - RawItemRecord structure for `|`-delimited deserialization
//! - Conversion from raw records to typed ledger items
//!
//! All functions are pure (no I/O); the sync and async readers wrap them.

use crate::core::normalize::{parse_amount, parse_date};
use crate::types::{ClearingError, LedgerItem};
use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;
use tracing::warn;

/// Shape of a data line carrying one open item: a 3-character currency
/// token, then the account, then the remaining pipe-delimited fields.
/// Headers, footers and separator art do not match.
const ITEM_LINE_PATTERN: &str = r"(?m)^\|\s+\w{3}\s+\|\w+\s*\|.*\|$";

/// Entity whose deal numbers are a trailing 13-digit token in the text
const DEAL_IN_TEXT_ENTITY: &str = "499L";

/// Entity whose deal numbers trail a semicolon in the text
const DEAL_AFTER_SEMICOLON_ENTITY: &str = "0073";

fn item_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(ITEM_LINE_PATTERN).unwrap())
}

fn deal_in_text_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d{13})$").unwrap())
}

fn deal_after_semicolon_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r";(\d+)$").unwrap())
}

/// Raw record structure for deserialization
///
/// Matches one item line after the outer pipes are stripped: 12 columns
/// in the fixed export layout order. All fields arrive untrimmed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawItemRecord {
    pub currency: String,
    pub account: String,
    pub amount: String,
    pub document_number: String,
    pub document_type: String,
    pub document_date: String,
    pub posting_date: String,
    pub assignment: String,
    pub reference: String,
    pub trading_partner: String,
    pub text: String,
    pub value_date: String,
}

/// Select the item lines of a raw export and strip their outer pipes
///
/// Returns `None` when no line matches the item shape (malformed or
/// empty export).
pub fn extract_item_lines(text: &str) -> Option<String> {
    let lines: Vec<&str> = item_line_regex()
        .find_iter(text)
        .map(|m| {
            let line = m.as_str();
            &line[1..line.len() - 1]
        })
        .collect();

    if lines.is_empty() {
        return None;
    }
    Some(lines.join("\n"))
}

/// Convert a RawItemRecord to a LedgerItem
///
/// Trims every text field except the assignment, which is only
/// right-trimmed: items are entered with leading whitespace on some
/// accounts, and stripping it would break assignment-based open-item
/// selection against the external system. Amounts and dates go through
/// the normalizer; the absolute amount, deal number and status fields
/// are derived here.
///
/// # Errors
///
/// Returns a `Format` error when the amount field cannot be parsed.
pub fn convert_raw_record(raw: RawItemRecord, entity: &str) -> Result<LedgerItem, ClearingError> {
    let amount = parse_amount(&raw.amount)?;
    let text = raw.text.trim().to_string();
    let deal_number = extract_deal_number(&text, entity);

    Ok(LedgerItem {
        entity: entity.to_string(),
        account: raw.account.trim().to_string(),
        currency: raw.currency.trim().to_string(),
        amount,
        amount_abs: amount.abs(),
        document_number: raw.document_number.trim().to_string(),
        document_type: raw.document_type.trim().to_string(),
        document_date: parse_date(&raw.document_date),
        posting_date: parse_date(&raw.posting_date),
        value_date: parse_date(&raw.value_date),
        assignment: raw.assignment.trim_end().to_string(),
        reference: raw.reference.trim().to_string(),
        trading_partner: raw.trading_partner.trim().to_string(),
        text,
        deal_number,
        posting_number: None,
        matched: false,
        processed: false,
        excluded: false,
        message: String::new(),
    })
}

/// Extract the deal number from an item's free text, where applicable
///
/// Only the two designated entities encode deal numbers in the text;
/// everything else keeps `None`.
pub fn extract_deal_number(text: &str, entity: &str) -> Option<String> {
    let regex = match entity {
        DEAL_IN_TEXT_ENTITY => deal_in_text_regex(),
        DEAL_AFTER_SEMICOLON_ENTITY => deal_after_semicolon_regex(),
        _ => return None,
    };

    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Convert a raw export text block into an item table
///
/// Filters the item lines, parses them as `|`-delimited records and
/// converts each into a [`LedgerItem`]. Lines that fail to split are
/// skipped with a warning; an unparsable amount aborts the conversion.
///
/// # Errors
///
/// * `Conversion` - no item lines were recovered
/// * `Format` - an amount field could not be parsed
pub fn convert_export_data(text: &str, entity: &str) -> Result<Vec<LedgerItem>, ClearingError> {
    let preprocessed =
        extract_item_lines(text).ok_or_else(|| ClearingError::conversion(entity))?;

    // no trimming at the CSV layer: the assignment column's leading
    // whitespace must survive into the item
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .trim(csv::Trim::None)
        .from_reader(preprocessed.as_bytes());

    let mut items = Vec::new();
    for result in reader.deserialize::<RawItemRecord>() {
        match result {
            Ok(raw) => items.push(convert_raw_record(raw, entity)?),
            Err(e) => warn!("skipping malformed item line: {}", e),
        }
    }

    if items.is_empty() {
        return Err(ClearingError::conversion(entity));
    }

    Ok(items)
}
