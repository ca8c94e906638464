//! Error types for the Rust Clearing Engine
//!
//! This module defines all error types that can occur during open-item
//! processing. Errors are designed to be descriptive and user-friendly
//! for CLI output.
//!
//! # Error Categories
//!
//! - **I/O Errors**: Export file not found, permission denied, etc.
//! - **Format Errors**: Unparsable amount strings in extracted data
//! - **Conversion Errors**: No item lines recoverable from a raw export
//! - **Matching Errors**: Empty account subsets, unusable matching rules
//!
//! Posting-side failures are a separate type, [`PostingError`], because
//! they are recovered per clearing group rather than propagated.

use thiserror::Error;

/// Main error type for the clearing engine
///
/// This enum represents all possible errors that can occur while
/// converting, matching, and grouping open items. Each variant includes
/// relevant context to help diagnose and resolve the issue.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClearingError {
    /// I/O error occurred while reading an export or rules file
    ///
    /// This is a fatal error for the file being read.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// Path of the file being accessed, empty when unknown
        path: String,
        /// Description of the I/O error
        message: String,
    },

    /// An amount string could not be parsed
    ///
    /// Fatal to the field (and therefore to the row being converted),
    /// not to the run: other entities continue processing.
    #[error("Invalid amount format '{value}'")]
    Format {
        /// The unparsable amount string
        value: String,
    },

    /// No item lines could be recovered from a raw export
    ///
    /// Either the export is malformed or the entity has no open items.
    /// Fatal to the affected entity; other entities continue.
    #[error("No open item lines recovered from export for entity '{entity}'")]
    Conversion {
        /// Entity code of the affected export
        entity: String,
    },

    /// An empty account subset reached a matcher
    ///
    /// This indicates an upstream filtering bug. It aborts the affected
    /// entity's matching pass and is surfaced to the caller.
    #[error("No items to match{}", scope.as_ref().map(|s| format!(" for '{}'", s)).unwrap_or_default())]
    EmptyInput {
        /// Account or entity the empty subset belongs to, if known
        scope: Option<String>,
    },

    /// A matching rule is missing or contains no recognized criterion
    ///
    /// This is a fatal error and must be surfaced immediately rather
    /// than silently skipping the account.
    #[error("Unusable clearing rule for '{account}': {detail}")]
    Configuration {
        /// Account (or entity) whose rule is unusable
        account: String,
        /// What is wrong with the rule
        detail: String,
    },
}

// Conversion from io::Error to ClearingError (path filled in by callers
// that have one)
impl From<std::io::Error> for ClearingError {
    fn from(error: std::io::Error) -> Self {
        ClearingError::Io {
            path: String::new(),
            message: error.to_string(),
        }
    }
}

// Helper functions for creating common errors

impl ClearingError {
    /// Create an Io error with path context
    pub fn io(path: &str, message: &str) -> Self {
        ClearingError::Io {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a Format error
    pub fn format(value: &str) -> Self {
        ClearingError::Format {
            value: value.to_string(),
        }
    }

    /// Create a Conversion error
    pub fn conversion(entity: &str) -> Self {
        ClearingError::Conversion {
            entity: entity.to_string(),
        }
    }

    /// Create an EmptyInput error with scope context
    pub fn empty_input(scope: &str) -> Self {
        ClearingError::EmptyInput {
            scope: Some(scope.to_string()),
        }
    }

    /// Create a Configuration error
    pub fn configuration(account: &str, detail: &str) -> Self {
        ClearingError::Configuration {
            account: account.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// Errors reported by the external posting collaborator
///
/// Both variants are recovered per clearing group: the group's rows are
/// annotated with a failure message and processing continues with the
/// next group. They never abort the whole entity or run, and the engine
/// performs no retries.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PostingError {
    /// The posting call was rejected due to missing authorization
    #[error("missing authorization: {message}")]
    Permission {
        /// Description returned by the posting collaborator
        message: String,
    },

    /// The posting call failed for any other reason
    #[error("{message}")]
    Failed {
        /// Description returned by the posting collaborator
        message: String,
    },
}

impl PostingError {
    /// Create a Permission error
    pub fn permission(message: &str) -> Self {
        PostingError::Permission {
            message: message.to_string(),
        }
    }

    /// Create a Failed error
    pub fn failed(message: &str) -> Self {
        PostingError::Failed {
            message: message.to_string(),
        }
    }
}
