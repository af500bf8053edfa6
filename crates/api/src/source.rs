// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reading and validation of the external catalog source.
//!
//! The source is an operator-maintained, headerless CSV file: one record
//! per line, `id,label`. It is authoritative for option existence and
//! label text, never for vote history.

use csv::{ReaderBuilder, StringRecord};
use std::collections::HashMap;
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use reel_poll_domain::CatalogRecord;

/// Errors reading the catalog source file.
#[derive(Debug, Error)]
pub enum CatalogSourceError {
    /// The source file could not be opened or read.
    #[error("Failed to read catalog source: {0}")]
    Io(#[from] std::io::Error),

    /// The source file could not be parsed as CSV.
    #[error("Failed to parse catalog source: {0}")]
    Parse(#[from] csv::Error),
}

/// Reads the catalog source file into usable records.
///
/// Rows with fewer than two fields, or with an empty id or label after
/// trimming, are skipped silently. When the same id appears more than once
/// the last label wins, while the record keeps the position of its first
/// occurrence.
///
/// # Arguments
///
/// * `path` - The path to the CSV source file
///
/// # Errors
///
/// Returns an error if the file cannot be opened or parsed at all;
/// individual unusable rows are not errors.
pub fn read_catalog_source<P: AsRef<Path>>(
    path: P,
) -> Result<Vec<CatalogRecord>, CatalogSourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path.as_ref())?;

    let mut records: Vec<CatalogRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for row in reader.records() {
        let row: StringRecord = row?;
        let Some(raw_id) = row.get(0) else {
            continue;
        };
        let Some(raw_label) = row.get(1) else {
            debug!("Skipping source row with fewer than two fields");
            continue;
        };
        let Some(record) = CatalogRecord::parse(raw_id, raw_label) else {
            debug!("Skipping source row with empty id or label");
            continue;
        };

        match positions.get(record.id().as_str()) {
            // Last record wins, first occurrence keeps its position.
            Some(&index) => records[index] = record,
            None => {
                positions.insert(record.id().to_string(), records.len());
                records.push(record);
            }
        }
    }

    Ok(records)
}
