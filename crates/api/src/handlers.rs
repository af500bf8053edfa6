// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Vote ledger operations and read-only reporting.

use std::collections::HashMap;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::info;

use reel_poll_domain::{CatalogEntry, OptionId, OptionTally, VoterId};
use reel_poll_persistence::Persistence;

use crate::error::ApiError;
use crate::request_response::{
    BallotEntry, CastVoteOutcome, StatusReport, TallyEntry, TallyReport, VoteChoice,
};

/// Casts (or changes) a voter's vote.
///
/// The option is re-validated against the catalog at the moment of
/// casting; the presentation layer's view of the ballot is never trusted.
/// On success exactly one vote row exists for the voter.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `voter_id` - The voter's stable external identity
/// * `voter_label` - The voter's current display name
/// * `option_id` - The chosen option
///
/// # Errors
///
/// Returns [`ApiError::UnknownOption`] if the option is not in the catalog
/// (no state changes), or [`ApiError::VoteWriteFailure`] if the store
/// rejects the atomic replace (no partial state).
pub fn cast_vote(
    persistence: &mut Persistence,
    voter_id: &VoterId,
    voter_label: &str,
    option_id: &OptionId,
) -> Result<CastVoteOutcome, ApiError> {
    let Some(chosen) = persistence.get_option(option_id)? else {
        return Err(ApiError::UnknownOption {
            option_id: option_id.to_string(),
        });
    };

    // Capture the prior choice before it is replaced, for "changed from X
    // to Y" reporting.
    let previous: Option<VoteChoice> = match persistence.get_vote(voter_id)? {
        Some(prior_id) => {
            let label: String = persistence
                .get_option(&prior_id)?
                .map_or_else(|| prior_id.to_string(), |entry| entry.label().to_string());
            Some(VoteChoice {
                option_id: prior_id.to_string(),
                label,
            })
        }
        None => None,
    };

    persistence
        .replace_vote(voter_id, voter_label, option_id)
        .map_err(|e| ApiError::VoteWriteFailure {
            message: e.to_string(),
        })?;

    let current: VoteChoice = VoteChoice {
        option_id: option_id.to_string(),
        label: chosen.label().to_string(),
    };
    let message: String = previous.as_ref().map_or_else(
        || format!("Vote recorded for '{}'", current.label),
        |prior| {
            format!(
                "Vote changed from '{}' to '{}'",
                prior.label, current.label
            )
        },
    );

    info!(
        "Vote cast: voter={} option={} previous={:?}",
        voter_id,
        option_id,
        previous.as_ref().map(|choice| choice.option_id.as_str())
    );

    Ok(CastVoteOutcome {
        previous,
        current,
        message,
    })
}

/// Returns a voter's current vote, if any. Pure read, no side effect.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
/// * `voter_id` - The voter's stable external identity
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn current_vote(
    persistence: &mut Persistence,
    voter_id: &VoterId,
) -> Result<Option<OptionId>, ApiError> {
    Ok(persistence.get_vote(voter_id)?)
}

/// Builds the aggregate tally report across all options in catalog order.
///
/// Each entry carries the vote count and the voter display names in the
/// order they voted (first-voted-first). Options without votes appear
/// with a zero count.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn tally_report(persistence: &mut Persistence) -> Result<TallyReport, ApiError> {
    let options: Vec<CatalogEntry> = persistence.list_options()?;
    let mut tallies: HashMap<OptionId, OptionTally> = persistence.tally()?;

    let entries: Vec<TallyEntry> = options
        .into_iter()
        .map(|entry| {
            let tally: OptionTally = tallies.remove(entry.option_id()).unwrap_or_default();
            TallyEntry {
                option_id: entry.option_id().to_string(),
                label: entry.label().to_string(),
                count: tally.count,
                voters: tally.voter_labels,
            }
        })
        .collect();

    Ok(TallyReport { entries })
}

/// Builds the selectable ballot: one entry per option in catalog order,
/// with the current vote count and a truncated label.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn ballot(persistence: &mut Persistence) -> Result<Vec<BallotEntry>, ApiError> {
    let options: Vec<CatalogEntry> = persistence.list_options()?;
    let tallies: HashMap<OptionId, OptionTally> = persistence.tally()?;

    Ok(options
        .into_iter()
        .map(|entry| {
            let count: usize = tallies
                .get(entry.option_id())
                .map_or(0, |tally| tally.count);
            BallotEntry::new(entry.option_id().to_string(), count, entry.label())
        })
        .collect())
}

/// Builds the system status report: option count, total vote count, and a
/// freshness timestamp.
///
/// # Arguments
///
/// * `persistence` - The persistence adapter
///
/// # Errors
///
/// Returns an error if the store cannot be queried.
pub fn status_report(persistence: &mut Persistence) -> Result<StatusReport, ApiError> {
    let option_count: i64 = persistence.count_options()?;
    let vote_count: i64 = persistence.count_votes()?;
    let generated_at: String = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| ApiError::Internal {
            message: e.to_string(),
        })?;

    Ok(StatusReport {
        option_count,
        vote_count,
        generated_at,
    })
}
