//! Amount and date normalization for extracted ledger data
//!
//! The external ledger system renders amounts with `.` thousands
//! separators, `,` decimal separators and a trailing minus sign, and
//! dates day-first (`dd.mm.yyyy`). This module converts those strings to
//! canonical `Decimal` / `NaiveDate` values and back.
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::ClearingError;
use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Day-first formats accepted for extracted date fields
const DATE_FORMATS: [&str; 3] = ["%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"];

/// Format used when rendering dates for clearing input and reports
const DATE_FORMAT: &str = "%d.%m.%Y";

/// Parse an amount in the external ledger's string format
///
/// Strips surrounding whitespace, removes `.` thousands separators,
/// converts the `,` decimal separator to `.` and reinterprets a trailing
/// minus sign as a leading sign.
///
/// # Errors
///
/// Returns a `Format` error when non-numeric residue remains. This is
/// fatal to the field, not to the run.
pub fn parse_amount(text: &str) -> Result<Decimal, ClearingError> {
    let trimmed = text.trim();

    let mut normalized = trimmed.replace('.', "").replace(',', ".");
    if normalized.ends_with('-') {
        normalized = format!("-{}", normalized.replace('-', ""));
    }

    normalized
        .parse::<Decimal>()
        .map_err(|_| ClearingError::format(trimmed))
}

/// Parse a day-first formatted date field
///
/// Unparsable or blank input yields `None` rather than an error: some
/// extracted date fields are legitimately empty and are propagated as
/// missing data.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

/// Render an amount back into the external ledger's string format
///
/// The inverse of [`parse_amount`]: two decimal places, `.` thousands
/// separators, `,` decimal separator, trailing minus sign.
pub fn format_amount(value: Decimal) -> String {
    let rounded = value.round_dp(2);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let plain = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(plain.len() + digits.len() / 3);
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(*c);
    }

    let mut out = format!("{},{}", grouped, frac_part);
    if negative {
        out.push('-');
    }
    out
}

/// Render a date in the external ledger's `dd.mm.yyyy` format
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Render an optional date, with missing dates as the empty string
pub fn format_date_opt(date: Option<NaiveDate>) -> String {
    date.map(format_date).unwrap_or_default()
}
