// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API response data transfer objects.
//!
//! These DTOs are the outbound rendering contract for the transport
//! layer: selectable ballot entries with truncated labels, and tally lines
//! with a bounded voter-name preview.

use serde::{Deserialize, Serialize};

/// Maximum number of characters of an option label shown on a ballot
/// control before truncation.
pub(crate) const MAX_BALLOT_LABEL_CHARS: usize = 30;

/// Maximum number of voter display names shown per tally line.
pub(crate) const VOTER_PREVIEW_LIMIT: usize = 3;

/// A voter's choice, resolved to its display label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteChoice {
    /// The option identifier.
    pub option_id: String,
    /// The option's display label at the time of the cast.
    pub label: String,
}

/// API response for a successful vote cast.
///
/// The `(previous, current)` pair is what the boundary layer uses to
/// report "changed from X to Y" vs "voted for Y".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastVoteOutcome {
    /// The voter's prior choice, if any.
    pub previous: Option<VoteChoice>,
    /// The confirmed new choice.
    pub current: VoteChoice,
    /// A success message.
    pub message: String,
}

/// One selectable control on the ballot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotEntry {
    /// The option identifier.
    pub option_id: String,
    /// The current vote count for the option.
    pub count: usize,
    /// The display label, truncated for control width.
    pub label: String,
}

impl BallotEntry {
    /// Creates a ballot entry, truncating the label if necessary.
    #[must_use]
    pub fn new(option_id: String, count: usize, label: &str) -> Self {
        Self {
            option_id,
            count,
            label: truncate_label(label),
        }
    }
}

/// One line of the tally report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyEntry {
    /// The option identifier.
    pub option_id: String,
    /// The full display label.
    pub label: String,
    /// The current vote count for the option.
    pub count: usize,
    /// Voter display names, first-voted-first.
    pub voters: Vec<String>,
}

impl TallyEntry {
    /// Returns up to [`VOTER_PREVIEW_LIMIT`] voter names for display.
    #[must_use]
    pub fn voter_preview(&self) -> &[String] {
        let limit: usize = VOTER_PREVIEW_LIMIT.min(self.voters.len());
        &self.voters[..limit]
    }

    /// Returns the number of voters beyond the preview ("+N more").
    #[must_use]
    pub fn overflow(&self) -> usize {
        self.voters.len().saturating_sub(VOTER_PREVIEW_LIMIT)
    }
}

/// API response for the aggregate tally, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TallyReport {
    /// One entry per catalog option, ordered by creation order.
    pub entries: Vec<TallyEntry>,
}

/// API response for the system status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    /// The number of catalog options.
    pub option_count: i64,
    /// The total number of current votes.
    pub vote_count: i64,
    /// When this report was generated (RFC 3339).
    pub generated_at: String,
}

/// API response for a catalog synchronization run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Options inserted because they were new in the source.
    pub added: usize,
    /// Options whose label was updated in place.
    pub updated: usize,
    /// Options deleted because they left the source and held no votes.
    pub removed: usize,
    /// Options absent from the source but retained because votes exist.
    pub retained: usize,
}

impl From<reel_poll_persistence::SyncReport> for SyncOutcome {
    fn from(report: reel_poll_persistence::SyncReport) -> Self {
        Self {
            added: report.added,
            updated: report.updated,
            removed: report.removed,
            retained: report.retained,
        }
    }
}

/// Truncates a label to [`MAX_BALLOT_LABEL_CHARS`] characters, appending
/// an ellipsis when shortened. Operates on characters, not bytes.
fn truncate_label(label: &str) -> String {
    if label.chars().count() > MAX_BALLOT_LABEL_CHARS {
        let truncated: String = label.chars().take(MAX_BALLOT_LABEL_CHARS).collect();
        format!("{truncated}...")
    } else {
        label.to_string()
    }
}
