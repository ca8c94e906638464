//! I/O module
//!
//! Handles export parsing and report output.
//!
//! # Components
//!
//! - `export_format` - Raw export format handling (line filtering, record
//!   conversion)
//! - `sync_reader` - Synchronous export file reading
//! - `async_reader` - Asynchronous export file reading (csv-async)
//! - `report` - Annotated item table serialization for the reporting
//!   collaborator

pub mod async_reader;
pub mod export_format;
pub mod report;
pub mod sync_reader;

pub use export_format::{convert_export_data, RawItemRecord};
pub use report::write_items_csv;
