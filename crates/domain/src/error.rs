// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An option identifier is empty after trimming.
    EmptyOptionId,
    /// A voter identifier is empty after trimming.
    EmptyVoterId,
    /// An option label is empty after trimming.
    EmptyLabel {
        /// The option the label belongs to.
        option_id: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyOptionId => write!(f, "Option identifier must not be empty"),
            Self::EmptyVoterId => write!(f, "Voter identifier must not be empty"),
            Self::EmptyLabel { option_id } => {
                write!(f, "Label for option '{option_id}' must not be empty")
            }
        }
    }
}

impl std::error::Error for DomainError {}
