// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Reel Poll voting backend.
//!
//! This crate provides database persistence for the option catalog and the
//! vote ledger. It is built on Diesel with a `SQLite` backend.
//!
//! ## Store Contracts
//!
//! Two durable tables back the system:
//!
//! - **`options`** — the catalog: stable external identifier, mutable
//!   display label, monotonic creation-order marker.
//! - **`votes`** — the ledger: at most one row per voter, enforced by a
//!   database-level unique constraint. Replacing a vote is a single
//!   transaction (delete prior row, insert new row) so concurrent readers
//!   never observe a voter with zero or two votes.
//!
//! ## Testing Philosophy
//!
//! - Standard tests run against unique shared in-memory databases
//! - Each in-memory database receives a sequential name from an atomic
//!   counter, so tests are isolated without time-based collisions
//! - File-backed databases enable WAL mode for read concurrency

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use reel_poll_domain::{CatalogEntry, CatalogRecord, OptionId, OptionTally, VoterId};

/// Atomic counter for generating unique in-memory database names.
///
/// This ensures deterministic test isolation by eliminating time-based
/// collisions. Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod sqlite;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use mutations::SyncReport;

/// Persistence adapter for the option catalog and the vote ledger.
///
/// All store mutations run against one physical `SQLite` database; the
/// replace-on-revote operation and catalog reconciliation rely on its
/// transactional guarantees rather than process-level locking.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter,
    /// ensuring deterministic test isolation without time-based collisions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        // Create a unique shared in-memory database name per call so tests are isolated.
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name: String = format!("memdb_poll_{db_id}");
        let shared_memory_url: String = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = sqlite::initialize_database(&shared_memory_url)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = sqlite::initialize_database(path_str)?;

        // Enable WAL mode for better read concurrency
        sqlite::enable_wal_mode(&mut conn)?;
        sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    // ========================================================================
    // Catalog Store
    // ========================================================================

    /// Lists all catalog options ordered by creation order.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn list_options(&mut self) -> Result<Vec<CatalogEntry>, PersistenceError> {
        queries::list_options(&mut self.conn)
    }

    /// Retrieves a single catalog option.
    ///
    /// # Arguments
    ///
    /// * `option_id` - The option identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    /// Returns `Ok(None)` if the option does not exist.
    pub fn get_option(
        &mut self,
        option_id: &OptionId,
    ) -> Result<Option<CatalogEntry>, PersistenceError> {
        queries::get_option(&mut self.conn, option_id)
    }

    /// Inserts an option or updates its label in place.
    ///
    /// # Arguments
    ///
    /// * `option_id` - The option identifier
    /// * `label` - The display label
    ///
    /// # Errors
    ///
    /// Returns an error if the database write fails.
    pub fn upsert_option(
        &mut self,
        option_id: &OptionId,
        label: &str,
    ) -> Result<(), PersistenceError> {
        mutations::upsert_option(&mut self.conn, option_id, label)
    }

    /// Deletes a catalog option. Idempotent at the row level.
    ///
    /// Callers are responsible for the vote-count deletion guard.
    ///
    /// # Arguments
    ///
    /// * `option_id` - The option identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the database delete fails.
    pub fn delete_option(&mut self, option_id: &OptionId) -> Result<(), PersistenceError> {
        mutations::delete_option(&mut self.conn, option_id)
    }

    /// Counts all catalog options.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn count_options(&mut self) -> Result<i64, PersistenceError> {
        queries::count_options(&mut self.conn)
    }

    // ========================================================================
    // Vote Store
    // ========================================================================

    /// Retrieves the current vote of a voter, if any.
    ///
    /// # Arguments
    ///
    /// * `voter_id` - The voter identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    /// Returns `Ok(None)` if the voter has not voted.
    pub fn get_vote(&mut self, voter_id: &VoterId) -> Result<Option<OptionId>, PersistenceError> {
        queries::get_vote(&mut self.conn, voter_id)
    }

    /// Atomically replaces a voter's vote.
    ///
    /// Removes any existing row for the voter and inserts the new one
    /// within one transaction. On failure the store is left in its
    /// pre-call state.
    ///
    /// # Arguments
    ///
    /// * `voter_id` - The voter identifier
    /// * `voter_label` - The voter's current display name
    /// * `option_id` - The chosen option identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying write cannot complete.
    pub fn replace_vote(
        &mut self,
        voter_id: &VoterId,
        voter_label: &str,
        option_id: &OptionId,
    ) -> Result<(), PersistenceError> {
        mutations::replace_vote(&mut self.conn, voter_id, voter_label, option_id)
    }

    /// Aggregates all current votes per option.
    ///
    /// Voter display names are collected first-voted-first. Options
    /// without votes do not appear in the mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn tally(&mut self) -> Result<HashMap<OptionId, OptionTally>, PersistenceError> {
        queries::tally(&mut self.conn)
    }

    /// Counts the current votes for a single option.
    ///
    /// # Arguments
    ///
    /// * `option_id` - The option identifier
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn count_votes_for(&mut self, option_id: &OptionId) -> Result<i64, PersistenceError> {
        queries::count_votes_for(&mut self.conn, option_id)
    }

    /// Counts all current votes across all options.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be queried.
    pub fn count_votes(&mut self) -> Result<i64, PersistenceError> {
        queries::count_votes(&mut self.conn)
    }

    // ========================================================================
    // Catalog Reconciliation
    // ========================================================================

    /// Reconciles the catalog against an ordered list of source records.
    ///
    /// Inserts new options (source order becomes creation order for new
    /// entries only), updates differing labels in place, and deletes
    /// options absent from the source only when they hold zero votes. The
    /// whole reconciliation runs in one transaction; on failure the
    /// catalog is unchanged.
    ///
    /// # Arguments
    ///
    /// * `records` - The usable source records, in source order, at most
    ///   one per id
    ///
    /// # Errors
    ///
    /// Returns an error if any database operation fails.
    pub fn reconcile_catalog(
        &mut self,
        records: &[CatalogRecord],
    ) -> Result<SyncReport, PersistenceError> {
        mutations::reconcile_catalog(&mut self.conn, records)
    }
}
