//! Synchronous export reading
//!
//! Reads one entity's raw export file and runs it through the record
//! converter. The whole file is materialized before conversion: item
//! lines are selected by shape from the surrounding decoration, which
//! needs the full text.

use crate::io::export_format::convert_export_data;
use crate::types::{ClearingError, LedgerItem};
use std::fs;
use std::path::Path;

/// Read and convert one entity's export file
///
/// # Errors
///
/// * `Io` - the file cannot be read
/// * `Conversion` - no item lines were recovered from the text
/// * `Format` - an amount field could not be parsed
pub fn read_export(path: &Path, entity: &str) -> Result<Vec<LedgerItem>, ClearingError> {
    let text = fs::read_to_string(path)
        .map_err(|e| ClearingError::io(&path.display().to_string(), &e.to_string()))?;

    convert_export_data(&text, entity)
}
