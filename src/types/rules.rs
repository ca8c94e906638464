//! Matching-rule types and rule-file loading
//!
//! Rules map entity codes to per-account matching configuration. They are
//! loaded once per run from a TOML file and treated as read-only input to
//! the matching engine.
//!
//! # Rule file format
//!
//! ```toml
//! holidays = ["2026-01-01", "2026-12-24"]
//!
//! [entities."0073"]
//! active = true
//! country = "Finland"
//!
//! [entities."0073".accounts."24182000"]
//! active = true
//! criteria = ["A", "R"]
//! ```
//!
//! Criterion codes follow the accounting configuration convention:
//! `A` assignment, `C` cumulative sum, `D` document number, `O` oldest
//! assignment, `P` trading partner (filter values appended with
//! underscores, e.g. `P_VND01_VND02`), `R` reference, `T` text, `X` deal
//! number. Unknown codes are a configuration error at match time.

use crate::types::error::ClearingError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

/// Matching configuration for a single GL account
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AccountRule {
    /// Whether the account takes part in clearing
    pub active: bool,

    /// Ordered criterion codes, e.g. `["O"]` or `["A", "R", "T"]`
    #[serde(default)]
    pub criteria: Vec<String>,
}

/// Matching configuration for one entity (company code)
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EntityRules {
    /// Whether the entity takes part in clearing
    pub active: bool,

    /// Country name, used for report and export file naming
    pub country: String,

    /// Per-account rules, keyed by account id
    pub accounts: BTreeMap<String, AccountRule>,
}

/// The full rule set for a clearing run
///
/// Only active entities with at least one active account survive loading;
/// everything else is dropped with a warning, matching the behavior users
/// rely on to park entities without deleting their configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RuleSet {
    /// Off-work days used by the posting-date calculation
    #[serde(default)]
    pub holidays: Vec<NaiveDate>,

    /// Active entities, keyed by 4-character entity code
    pub entities: BTreeMap<String, EntityRules>,
}

impl RuleSet {
    /// Parse and filter a rule set from TOML text
    ///
    /// Inactive entities and entities without any active account are
    /// dropped (with a warning). Entity codes must be exactly 4
    /// alphanumeric characters.
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error for malformed TOML or an invalid
    /// entity code.
    pub fn from_toml_str(text: &str) -> Result<Self, ClearingError> {
        let parsed: RuleSet = toml::from_str(text)
            .map_err(|e| ClearingError::configuration("rules", &e.to_string()))?;

        let mut entities = BTreeMap::new();

        for (code, entity) in parsed.entities {
            if !is_valid_entity_code(&code) {
                return Err(ClearingError::configuration(
                    &code,
                    "invalid entity code, expected 4 alphanumeric characters",
                ));
            }

            if !entity.active {
                warn!("entity '{}' excluded from clearing by rule settings", code);
                continue;
            }

            if !entity.accounts.values().any(|acc| acc.active) {
                warn!(
                    "entity '{}' excluded from clearing: no active accounts configured",
                    code
                );
                continue;
            }

            entities.insert(code, entity);
        }

        if entities.is_empty() {
            warn!("no active entity found in the rule set");
        }

        Ok(RuleSet {
            holidays: parsed.holidays,
            entities,
        })
    }

    /// Load a rule set from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an `Io` error when the file cannot be read and a
    /// `Configuration` error when its content is unusable.
    pub fn load(path: &Path) -> Result<Self, ClearingError> {
        let text = fs::read_to_string(path)
            .map_err(|e| ClearingError::io(&path.display().to_string(), &e.to_string()))?;
        Self::from_toml_str(&text)
    }

    /// Whether any entity survived loading
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

/// Entity codes are 4 alphanumeric characters, e.g. "0073" or "499L"
fn is_valid_entity_code(code: &str) -> bool {
    code.len() == 4 && code.chars().all(|c| c.is_ascii_alphanumeric())
}

/// A recognized matching criterion, decoded from its rule-file code
///
/// The matching engine selects one strategy per account from the ordered
/// criterion list; see `core::matchers` for the priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    /// `A` — group by assignment
    Assignment,
    /// `C` — running-sum prefix matching over value dates
    CumulativeSum,
    /// `D` — group by document number
    DocumentNumber,
    /// `O` — oldest-assignment pairing
    OldestAssignment,
    /// `P[_v1_v2…]` — restrict to the given trading-partner ids
    TradingPartner(Vec<String>),
    /// `R` — group by reference
    Reference,
    /// `T` — group by text
    Text,
    /// `X` — group by extracted deal number
    DealNumber,
}

impl Criterion {
    /// Decode a single criterion code
    ///
    /// The code's first underscore-separated segment selects the
    /// criterion; for `P`, the remaining segments are trading-partner
    /// filter values. Returns `None` for unrecognized codes.
    pub fn parse(code: &str) -> Option<Criterion> {
        let mut segments = code.split('_');
        let key = segments.next().unwrap_or_default();

        match key {
            "A" => Some(Criterion::Assignment),
            "C" => Some(Criterion::CumulativeSum),
            "D" => Some(Criterion::DocumentNumber),
            "O" => Some(Criterion::OldestAssignment),
            "P" => Some(Criterion::TradingPartner(
                segments.map(str::to_string).collect(),
            )),
            "R" => Some(Criterion::Reference),
            "T" => Some(Criterion::Text),
            "X" => Some(Criterion::DealNumber),
            _ => None,
        }
    }

    /// Decode an account's criterion codes in rule order
    ///
    /// # Errors
    ///
    /// Returns a `Configuration` error when the list is empty or any code
    /// is unrecognized; accounts must never be silently skipped.
    pub fn parse_all(account: &str, codes: &[String]) -> Result<Vec<Criterion>, ClearingError> {
        if codes.is_empty() {
            return Err(ClearingError::configuration(
                account,
                "no matching criteria configured",
            ));
        }

        codes
            .iter()
            .map(|code| {
                Criterion::parse(code).ok_or_else(|| {
                    ClearingError::configuration(
                        account,
                        &format!("unknown criterion code '{}'", code),
                    )
                })
            })
            .collect()
    }
}
