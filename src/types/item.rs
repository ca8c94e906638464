//! Ledger item types for the Rust Clearing Engine
//!
//! This module defines the ledger item row and its identifier aliases
//! used throughout the system for open-item matching and clearing.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Entity (company) code
///
/// A 4-character code identifying an accounting entity, e.g. "0073" or "499L".
pub type EntityCode = String;

/// General-ledger account identifier
///
/// Account ids are kept as strings because some accounts contain letters.
pub type AccountId = String;

/// One open item extracted from the external ledger system
///
/// A row of the item table produced by the record converter. The first
/// block of fields is read-only input data; `deal_number` is derived
/// during conversion; the status fields at the end are mutated by the
/// matching engine and the posting write-back.
///
/// # Invariants
///
/// - `matched` implies `processed`
/// - `excluded` implies `matched`
/// - the signed amounts of any matched group sum to zero after rounding
///   to 2 decimal places
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerItem {
    /// Entity (company) code this item belongs to
    pub entity: EntityCode,

    /// General-ledger account the item is posted on
    pub account: AccountId,

    /// ISO currency code of the amount
    pub currency: String,

    /// Signed debit/credit amount
    pub amount: Decimal,

    /// Absolute value of `amount`, the primary grouping key for matching
    pub amount_abs: Decimal,

    /// Accounting document number
    pub document_number: String,

    /// Accounting document type
    pub document_type: String,

    /// Document date; `None` when the extracted field was blank or unparsable
    pub document_date: Option<NaiveDate>,

    /// Posting date; `None` when the extracted field was blank or unparsable
    pub posting_date: Option<NaiveDate>,

    /// Value date; `None` when the extracted field was blank or unparsable
    pub value_date: Option<NaiveDate>,

    /// Assignment field
    ///
    /// Only right-trimmed during conversion: leading whitespace is part of
    /// the selection key used against the external ledger system.
    pub assignment: String,

    /// Reference field
    pub reference: String,

    /// Trading-partner id, empty when not filled
    pub trading_partner: String,

    /// Free text
    pub text: String,

    /// Deal number extracted from the free text for designated entities
    pub deal_number: Option<String>,

    /// Posting reference number written back after a successful clearing call
    pub posting_number: Option<String>,

    /// Whether the item was selected into a zero-sum match group
    pub matched: bool,

    /// Internal bookkeeping: the item has been evaluated and no further
    /// matching attempt will consider it
    pub processed: bool,

    /// Matched but intentionally left out of the clearing input
    pub excluded: bool,

    /// Human-readable outcome, empty until matching or posting writes one
    pub message: String,
}

impl LedgerItem {
    /// Whether this item should enter the clearing input
    ///
    /// True for items that were matched and not excluded.
    pub fn is_clearable(&self) -> bool {
        self.matched && !self.excluded
    }

    /// Mark the item as part of a zero-sum match group
    ///
    /// Also sets `processed` to maintain the `matched ⇒ processed` invariant.
    pub fn mark_matched(&mut self) {
        self.matched = true;
        self.processed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(matched: bool, excluded: bool) -> LedgerItem {
        LedgerItem {
            entity: "0001".to_string(),
            account: "10000000".to_string(),
            currency: "EUR".to_string(),
            amount: Decimal::new(10000, 2),
            amount_abs: Decimal::new(10000, 2),
            document_number: "4900000001".to_string(),
            document_type: "SA".to_string(),
            document_date: None,
            posting_date: None,
            value_date: None,
            assignment: String::new(),
            reference: String::new(),
            trading_partner: String::new(),
            text: String::new(),
            deal_number: None,
            posting_number: None,
            matched,
            processed: matched,
            excluded,
            message: String::new(),
        }
    }

    #[test]
    fn test_clearable_requires_matched_and_not_excluded() {
        assert!(item(true, false).is_clearable());
        assert!(!item(true, true).is_clearable());
        assert!(!item(false, false).is_clearable());
    }

    #[test]
    fn test_mark_matched_sets_processed() {
        let mut it = item(false, false);
        it.mark_matched();
        assert!(it.matched);
        assert!(it.processed);
    }
}
