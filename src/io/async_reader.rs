//! Asynchronous export reading
//!
//! The async counterpart of `sync_reader`, used by the concurrent run
//! strategy: the file is read through tokio and the preprocessed item
//! lines are deserialized with csv-async. Conversion semantics are
//! identical to the synchronous path.

use crate::io::export_format::{convert_raw_record, extract_item_lines, RawItemRecord};
use crate::types::{ClearingError, LedgerItem};
use csv_async::AsyncReaderBuilder;
use futures::stream::StreamExt;
use std::path::Path;
use tracing::warn;

/// Convert a raw export text block into an item table, asynchronously
///
/// # Errors
///
/// * `Conversion` - no item lines were recovered
/// * `Format` - an amount field could not be parsed
pub async fn convert_export_data(
    text: &str,
    entity: &str,
) -> Result<Vec<LedgerItem>, ClearingError> {
    let preprocessed =
        extract_item_lines(text).ok_or_else(|| ClearingError::conversion(entity))?;

    let mut reader = AsyncReaderBuilder::new()
        .delimiter(b'|')
        .has_headers(false)
        .create_deserializer(futures::io::Cursor::new(preprocessed.into_bytes()));

    let mut items = Vec::new();
    let mut records = reader.deserialize::<RawItemRecord>();
    while let Some(result) = records.next().await {
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

/// Read and convert one entity's export file, asynchronously
///
/// # Errors
///
/// * `Io` - the file cannot be read
/// * `Conversion` - no item lines were recovered from the text
/// * `Format` - an amount field could not be parsed
pub async fn read_export(path: &Path, entity: &str) -> Result<Vec<LedgerItem>, ClearingError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ClearingError::io(&path.display().to_string(), &e.to_string()))?;

    convert_export_data(&text, entity).await
}
