// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod reconcile_tests;
mod vote_tests;

use crate::Persistence;
use reel_poll_domain::{CatalogRecord, OptionId, VoterId};

pub fn new_store() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory store")
}

pub fn option_id(raw: &str) -> OptionId {
    OptionId::new(raw).expect("Valid option id")
}

pub fn voter_id(raw: &str) -> VoterId {
    VoterId::new(raw).expect("Valid voter id")
}

pub fn record(id: &str, label: &str) -> CatalogRecord {
    CatalogRecord::parse(id, label).expect("Valid catalog record")
}

/// Seeds the two-movie catalog used by most vote and tally tests.
pub fn seed_movies(store: &mut Persistence) {
    store
        .upsert_option(&option_id("m1"), "Inception")
        .expect("Failed to seed m1");
    store
        .upsert_option(&option_id("m2"), "Dune")
        .expect("Failed to seed m2");
}
