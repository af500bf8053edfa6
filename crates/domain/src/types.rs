// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};

/// The stable, externally assigned identifier of a catalog option.
///
/// Option identifiers come from the operator-maintained catalog source and
/// are immutable once an option has been created. They are always stored
/// trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(String);

impl OptionId {
    /// Creates an option identifier from a raw string.
    ///
    /// The input is trimmed; surrounding whitespace is never part of an
    /// identifier.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyOptionId`] if the trimmed input is empty.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let trimmed: &str = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyOptionId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The stable external identity of a voter.
///
/// Voter identifiers are opaque to the system; they only need to be stable
/// across votes so the one-vote-per-voter invariant can be enforced.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VoterId(String);

impl VoterId {
    /// Creates a voter identifier from a raw string.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::EmptyVoterId`] if the trimmed input is empty.
    pub fn new(raw: &str) -> Result<Self, DomainError> {
        let trimmed: &str = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::EmptyVoterId);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VoterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted catalog option.
///
/// The identifier is immutable once created; the label may be updated in
/// place by the synchronizer without changing the identifier or the
/// creation-order marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    option_id: OptionId,
    label: String,
    created_seq: i64,
}

impl CatalogEntry {
    /// Creates a catalog entry.
    #[must_use]
    pub const fn new(option_id: OptionId, label: String, created_seq: i64) -> Self {
        Self {
            option_id,
            label,
            created_seq,
        }
    }

    /// Returns the option identifier.
    #[must_use]
    pub const fn option_id(&self) -> &OptionId {
        &self.option_id
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Returns the monotonic creation-order marker.
    ///
    /// Entries created earlier carry a smaller marker. The marker is
    /// assigned at insert time and never changes afterwards, even when the
    /// label is updated or the source reorders its records.
    #[must_use]
    pub const fn created_seq(&self) -> i64 {
        self.created_seq
    }
}

/// A single usable record from the external catalog source.
///
/// Records are produced by the source reader after trimming and validation;
/// a `CatalogRecord` is therefore guaranteed to carry a non-empty id and a
/// non-empty label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogRecord {
    id: OptionId,
    label: String,
}

impl CatalogRecord {
    /// Parses a raw `(id, label)` field pair into a record.
    ///
    /// Both fields are trimmed. Returns `None` when either field is empty
    /// after trimming; the caller is expected to skip such rows silently.
    #[must_use]
    pub fn parse(raw_id: &str, raw_label: &str) -> Option<Self> {
        let id: OptionId = OptionId::new(raw_id).ok()?;
        let label: &str = raw_label.trim();
        if label.is_empty() {
            return None;
        }
        Some(Self {
            id,
            label: label.to_string(),
        })
    }

    /// Returns the option identifier.
    #[must_use]
    pub const fn id(&self) -> &OptionId {
        &self.id
    }

    /// Returns the display label.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

/// Aggregate vote data for a single option.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OptionTally {
    /// The number of current votes for the option.
    pub count: usize,
    /// Display names of the voters, first-voted-first.
    pub voter_labels: Vec<String>,
}

impl OptionTally {
    /// Records one vote with the given display name.
    pub fn record(&mut self, voter_label: String) {
        self.count += 1;
        self.voter_labels.push(voter_label);
    }
}
