// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod sync_tests;

use reel_poll_domain::{OptionId, VoterId};
use reel_poll_persistence::Persistence;
use std::io::Write;
use tempfile::NamedTempFile;

pub fn new_store() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory store")
}

pub fn option_id(raw: &str) -> OptionId {
    OptionId::new(raw).expect("Valid option id")
}

pub fn voter_id(raw: &str) -> VoterId {
    VoterId::new(raw).expect("Valid voter id")
}

/// Writes a catalog source file with the given contents.
pub fn write_source(contents: &str) -> NamedTempFile {
    let mut file: NamedTempFile = NamedTempFile::new().expect("Failed to create source file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write source file");
    file.flush().expect("Failed to flush source file");
    file
}

/// Seeds the two-movie catalog used by most vote and render tests.
pub fn seed_movies(store: &mut Persistence) {
    store
        .upsert_option(&option_id("m1"), "Inception")
        .expect("Failed to seed m1");
    store
        .upsert_option(&option_id("m2"), "Dune")
        .expect("Failed to seed m2");
}
