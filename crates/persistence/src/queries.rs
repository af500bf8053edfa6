// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries against the catalog and vote tables.
//!
//! All queries use Diesel DSL and never mutate state. Functions in this
//! module take an explicit connection so they can run standalone or inside
//! a transaction owned by a mutation.

use diesel::prelude::*;
use diesel::SqliteConnection;
use std::collections::HashMap;
use tracing::debug;

use reel_poll_domain::{CatalogEntry, OptionId, OptionTally, VoterId};

use crate::diesel_schema::{options, votes};
use crate::error::PersistenceError;

/// Diesel Queryable struct for option rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = options)]
pub(crate) struct OptionRow {
    pub(crate) option_id: String,
    pub(crate) label: String,
    pub(crate) created_seq: i64,
}

impl OptionRow {
    fn into_entry(self) -> Result<CatalogEntry, PersistenceError> {
        let option_id: OptionId = OptionId::new(&self.option_id)
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
        Ok(CatalogEntry::new(option_id, self.label, self.created_seq))
    }
}

/// Lists all catalog options ordered by creation order.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_options(conn: &mut SqliteConnection) -> Result<Vec<CatalogEntry>, PersistenceError> {
    let rows: Vec<OptionRow> = options::table
        .order(options::created_seq.asc())
        .select(OptionRow::as_select())
        .load(conn)?;

    rows.into_iter().map(OptionRow::into_entry).collect()
}

/// Retrieves a single catalog option by identifier.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `option_id` - The option identifier
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the option does not exist.
pub fn get_option(
    conn: &mut SqliteConnection,
    option_id: &OptionId,
) -> Result<Option<CatalogEntry>, PersistenceError> {
    let result: Result<OptionRow, diesel::result::Error> = options::table
        .filter(options::option_id.eq(option_id.as_str()))
        .select(OptionRow::as_select())
        .first(conn);

    match result {
        Ok(row) => Ok(Some(row.into_entry()?)),
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Retrieves the current vote of a voter, if any.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `voter_id` - The voter identifier
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the voter has not voted.
pub fn get_vote(
    conn: &mut SqliteConnection,
    voter_id: &VoterId,
) -> Result<Option<OptionId>, PersistenceError> {
    debug!("Looking up vote for voter: {}", voter_id);

    let result: Result<String, diesel::result::Error> = votes::table
        .filter(votes::voter_id.eq(voter_id.as_str()))
        .select(votes::option_id)
        .first(conn);

    match result {
        Ok(raw) => {
            let option_id: OptionId =
                OptionId::new(&raw).map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
            Ok(Some(option_id))
        }
        Err(diesel::result::Error::NotFound) => Ok(None),
        Err(e) => Err(PersistenceError::from(e)),
    }
}

/// Aggregates all current votes per option.
///
/// Voter display names are collected in insertion order (`vote_id`), which
/// is the authoritative first-voted-first ordering. Options without votes
/// do not appear in the result; callers merge against the catalog.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn tally(
    conn: &mut SqliteConnection,
) -> Result<HashMap<OptionId, OptionTally>, PersistenceError> {
    let rows: Vec<(String, String)> = votes::table
        .order(votes::vote_id.asc())
        .select((votes::option_id, votes::voter_label))
        .load(conn)?;

    let mut tallies: HashMap<OptionId, OptionTally> = HashMap::new();
    for (raw_option_id, voter_label) in rows {
        let option_id: OptionId = OptionId::new(&raw_option_id)
            .map_err(|e| PersistenceError::QueryFailed(e.to_string()))?;
        tallies.entry(option_id).or_default().record(voter_label);
    }

    Ok(tallies)
}

/// Counts the current votes for a single option.
///
/// Used by the synchronizer as the deletion guard: an option with at least
/// one vote must never be removed from the catalog.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `option_id` - The option identifier
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_votes_for(
    conn: &mut SqliteConnection,
    option_id: &OptionId,
) -> Result<i64, PersistenceError> {
    let count: i64 = votes::table
        .filter(votes::option_id.eq(option_id.as_str()))
        .count()
        .get_result(conn)?;

    Ok(count)
}

/// Counts all catalog options.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_options(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(options::table.count().get_result(conn)?)
}

/// Counts all current votes across all options.
///
/// # Arguments
///
/// * `conn` - The database connection
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_votes(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(votes::table.count().get_result(conn)?)
}
