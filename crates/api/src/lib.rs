// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the Reel Poll voting backend.
//!
//! This crate exposes the vote ledger operations (`cast_vote`,
//! `current_vote`, `tally_report`, `ballot`, `status_report`) and the
//! catalog synchronizer (`sync_catalog`). All failures are recovered here
//! and surfaced as [`ApiError`]; the transport layer above is responsible
//! for user-visible messaging and never sees a crash.

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

mod error;
mod handlers;
mod request_response;
mod source;
mod sync;

#[cfg(test)]
mod tests;

pub use error::ApiError;
pub use handlers::{ballot, cast_vote, current_vote, status_report, tally_report};
pub use request_response::{
    BallotEntry, CastVoteOutcome, StatusReport, SyncOutcome, TallyEntry, TallyReport, VoteChoice,
};
pub use source::{CatalogSourceError, read_catalog_source};
pub use sync::sync_catalog;
