// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use reel_poll_domain::DomainError;
use reel_poll_persistence::PersistenceError;

/// API-level errors.
///
/// These are distinct from domain/persistence errors and represent the API
/// contract: every failure mode the transport layer has to translate into
/// user-visible messaging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// A vote was cast against an option that is not in the catalog.
    ///
    /// No state changes; callers re-offer the current ballot.
    UnknownOption {
        /// The option identifier that was not found.
        option_id: String,
    },
    /// The external catalog source is missing or unparseable.
    ///
    /// The synchronizer performed no mutation; the existing catalog
    /// remains authoritative.
    SourceUnreadable {
        /// The reason the source could not be read.
        reason: String,
    },
    /// The store rejected the atomic vote replace.
    ///
    /// No partial state exists; a retry is caller-initiated.
    VoteWriteFailure {
        /// A description of the underlying failure.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownOption { option_id } => {
                write!(f, "Unknown option: '{option_id}' is not in the catalog")
            }
            Self::SourceUnreadable { reason } => {
                write!(f, "Catalog source unreadable: {reason}")
            }
            Self::VoteWriteFailure { message } => {
                write!(f, "Vote could not be recorded: {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for '{field}': {message}")
            }
            Self::Internal { message } => write!(f, "Internal error: {message}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl From<PersistenceError> for ApiError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let field: &str = match &err {
            DomainError::EmptyOptionId => "option_id",
            DomainError::EmptyVoterId => "voter_id",
            DomainError::EmptyLabel { .. } => "label",
        };
        Self::InvalidInput {
            field: field.to_string(),
            message: err.to_string(),
        }
    }
}
