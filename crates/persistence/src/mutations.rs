// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the catalog and vote tables.
//!
//! All mutations use Diesel DSL. Operations that must be indivisible with
//! respect to concurrent readers (`replace_vote`, `reconcile_catalog`) are
//! wrapped in a transaction here rather than left to callers.

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

use reel_poll_domain::{CatalogEntry, CatalogRecord, OptionId, VoterId};

use crate::diesel_schema::{options, votes};
use crate::error::PersistenceError;
use crate::queries;

/// Summary of one catalog reconciliation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncReport {
    /// Options inserted because they were new in the source.
    pub added: usize,
    /// Options whose label was updated in place.
    pub updated: usize,
    /// Options deleted because they left the source and held no votes.
    pub removed: usize,
    /// Options absent from the source but retained because votes exist.
    pub retained: usize,
}

/// Returns the next creation-order marker.
fn next_created_seq(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    let max_seq: Option<i64> = options::table
        .select(diesel::dsl::max(options::created_seq))
        .first(conn)?;
    Ok(max_seq.unwrap_or(0) + 1)
}

/// Inserts a new catalog option with the next creation-order marker.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `option_id` - The option identifier
/// * `label` - The display label
///
/// # Errors
///
/// Returns an error if the insert fails (e.g., the identifier exists).
pub fn insert_option(
    conn: &mut SqliteConnection,
    option_id: &OptionId,
    label: &str,
) -> Result<(), PersistenceError> {
    let created_seq: i64 = next_created_seq(conn)?;

    diesel::insert_into(options::table)
        .values((
            options::option_id.eq(option_id.as_str()),
            options::label.eq(label),
            options::created_seq.eq(created_seq),
        ))
        .execute(conn)?;

    info!("Added catalog option: {} - {}", option_id, label);
    Ok(())
}

/// Updates the label of an existing option in place.
///
/// The identifier and creation-order marker are left untouched.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `option_id` - The option identifier
/// * `label` - The new display label
///
/// # Errors
///
/// Returns an error if the database update fails.
pub fn update_option_label(
    conn: &mut SqliteConnection,
    option_id: &OptionId,
    label: &str,
) -> Result<(), PersistenceError> {
    diesel::update(options::table)
        .filter(options::option_id.eq(option_id.as_str()))
        .set(options::label.eq(label))
        .execute(conn)?;

    info!("Updated catalog option: {} - {}", option_id, label);
    Ok(())
}

/// Inserts an option or updates its label if it already exists.
///
/// Idempotent at the row level: upserting the same `(id, label)` pair twice
/// leaves the table unchanged on the second call.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `option_id` - The option identifier
/// * `label` - The display label
///
/// # Errors
///
/// Returns an error if the database write fails.
pub fn upsert_option(
    conn: &mut SqliteConnection,
    option_id: &OptionId,
    label: &str,
) -> Result<(), PersistenceError> {
    match queries::get_option(conn, option_id)? {
        None => insert_option(conn, option_id, label),
        Some(existing) if existing.label() != label => {
            update_option_label(conn, option_id, label)
        }
        Some(_) => Ok(()),
    }
}

/// Deletes a catalog option.
///
/// Idempotent: deleting an absent option is not an error. Callers are
/// responsible for the vote-count deletion guard; this function does not
/// re-check it.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `option_id` - The option identifier
///
/// # Errors
///
/// Returns an error if the database delete fails.
pub fn delete_option(
    conn: &mut SqliteConnection,
    option_id: &OptionId,
) -> Result<(), PersistenceError> {
    diesel::delete(options::table.filter(options::option_id.eq(option_id.as_str())))
        .execute(conn)?;

    info!("Deleted catalog option: {}", option_id);
    Ok(())
}

/// Atomically replaces a voter's vote.
///
/// Any existing row for the voter is deleted and the new row inserted
/// within a single transaction, so a concurrent tally never observes the
/// voter with zero or two votes. On failure the transaction rolls back and
/// the store is left in its pre-call state.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `voter_id` - The voter identifier
/// * `voter_label` - The voter's current display name
/// * `option_id` - The chosen option identifier
///
/// # Errors
///
/// Returns an error if the underlying write cannot complete; no partial
/// replace is ever visible.
pub fn replace_vote(
    conn: &mut SqliteConnection,
    voter_id: &VoterId,
    voter_label: &str,
    option_id: &OptionId,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        diesel::delete(votes::table.filter(votes::voter_id.eq(voter_id.as_str())))
            .execute(conn)?;

        diesel::insert_into(votes::table)
            .values((
                votes::voter_id.eq(voter_id.as_str()),
                votes::voter_label.eq(voter_label),
                votes::option_id.eq(option_id.as_str()),
            ))
            .execute(conn)?;

        Ok(())
    })
}

/// Reconciles the catalog against an ordered list of source records.
///
/// The whole reconciliation runs in one transaction:
/// 1. Records absent from the store are inserted; source order becomes
///    creation order for new entries only.
/// 2. Records present with a differing label are updated in place.
/// 3. Stored options absent from the source are deleted only if they hold
///    zero votes; otherwise they are retained as protected orphans that
///    remain tallyable.
///
/// The caller guarantees `records` carries at most one entry per id
/// (last record wins when the source repeats an id).
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `records` - The usable source records, in source order
///
/// # Errors
///
/// Returns an error if any database operation fails; the transaction rolls
/// back and the catalog is unchanged.
pub fn reconcile_catalog(
    conn: &mut SqliteConnection,
    records: &[CatalogRecord],
) -> Result<SyncReport, PersistenceError> {
    conn.transaction(|conn| {
        let existing: Vec<CatalogEntry> = queries::list_options(conn)?;
        let existing_by_id: HashMap<&OptionId, &CatalogEntry> = existing
            .iter()
            .map(|entry| (entry.option_id(), entry))
            .collect();
        let source_ids: HashSet<&OptionId> = records.iter().map(CatalogRecord::id).collect();
        let mut report: SyncReport = SyncReport::default();

        for record in records {
            match existing_by_id.get(record.id()) {
                None => {
                    insert_option(conn, record.id(), record.label())?;
                    report.added += 1;
                }
                Some(entry) if entry.label() != record.label() => {
                    update_option_label(conn, record.id(), record.label())?;
                    report.updated += 1;
                }
                Some(_) => {}
            }
        }

        for entry in &existing {
            if source_ids.contains(entry.option_id()) {
                continue;
            }
            let vote_count: i64 = queries::count_votes_for(conn, entry.option_id())?;
            if vote_count == 0 {
                delete_option(conn, entry.option_id())?;
                report.removed += 1;
            } else {
                debug!(
                    "Retaining option {} absent from source: {} vote(s) exist",
                    entry.option_id(),
                    vote_count
                );
                report.retained += 1;
            }
        }

        Ok(report)
    })
}
