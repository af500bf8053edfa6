// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The catalog synchronizer.
//!
//! Reconciles the external catalog source into the catalog store. The
//! source is authoritative for option existence and label text, but votes
//! are historical facts that must survive catalog edits: an option with
//! votes is never deleted, no matter what the source says.

use std::path::Path;
use tracing::{info, warn};

use reel_poll_domain::CatalogRecord;
use reel_poll_persistence::{Persistence, SyncReport};

use crate::error::ApiError;

/// Synchronizes the catalog store against the external source file.
///
/// Fail-safe, not fail-open: if the source is missing or unparseable, no
/// mutation is performed and the existing catalog remains authoritative.
/// Otherwise the reconciliation (insert new, update labels, guarded
/// delete) runs as one transaction.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `source_path` - The path to the CSV catalog source
///
/// # Errors
///
/// Returns [`ApiError::SourceUnreadable`] if the source cannot be read,
/// or [`ApiError::Internal`] if the reconciliation itself fails.
pub fn sync_catalog<P: AsRef<Path>>(
    persistence: &mut Persistence,
    source_path: P,
) -> Result<SyncReport, ApiError> {
    let records: Vec<CatalogRecord> = match crate::source::read_catalog_source(&source_path) {
        Ok(records) => records,
        Err(e) => {
            warn!(
                "Catalog source {} not usable, catalog left unchanged: {}",
                source_path.as_ref().display(),
                e
            );
            return Err(ApiError::SourceUnreadable {
                reason: e.to_string(),
            });
        }
    };

    let report: SyncReport = persistence.reconcile_catalog(&records)?;

    info!(
        "Catalog synchronized: {} added, {} updated, {} removed, {} retained",
        report.added, report.updated, report.removed, report.retained
    );

    Ok(report)
}
