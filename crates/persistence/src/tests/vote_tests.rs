// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the vote store contract: the one-row-per-voter invariant and
//! the atomicity of replace-on-revote.

use crate::tests::{new_store, option_id, seed_movies, voter_id};

#[test]
fn test_get_vote_absent() {
    let mut store = new_store();
    assert_eq!(store.get_vote(&voter_id("u1")).unwrap(), None);
}

#[test]
fn test_first_vote_creates_single_row() {
    let mut store = new_store();
    seed_movies(&mut store);

    store
        .replace_vote(&voter_id("u1"), "Alice", &option_id("m1"))
        .unwrap();

    assert_eq!(store.get_vote(&voter_id("u1")).unwrap(), Some(option_id("m1")));
    assert_eq!(store.count_votes().unwrap(), 1);
}

#[test]
fn test_revote_replaces_not_accumulates() {
    let mut store = new_store();
    seed_movies(&mut store);
    let alice = voter_id("u1");

    store.replace_vote(&alice, "Alice", &option_id("m1")).unwrap();
    store.replace_vote(&alice, "Alice", &option_id("m2")).unwrap();

    assert_eq!(store.get_vote(&alice).unwrap(), Some(option_id("m2")));
    assert_eq!(store.count_votes().unwrap(), 1, "Exactly one row per voter");
    assert_eq!(store.count_votes_for(&option_id("m1")).unwrap(), 0);
    assert_eq!(store.count_votes_for(&option_id("m2")).unwrap(), 1);
}

#[test]
fn test_current_vote_tracks_most_recent_cast() {
    let mut store = new_store();
    seed_movies(&mut store);
    let alice = voter_id("u1");

    for chosen in ["m1", "m2", "m1", "m1", "m2"] {
        store.replace_vote(&alice, "Alice", &option_id(chosen)).unwrap();
        assert_eq!(
            store.get_vote(&alice).unwrap(),
            Some(option_id(chosen)),
            "Current vote must equal the most recently cast option"
        );
        assert_eq!(store.count_votes().unwrap(), 1);
    }
}

#[test]
fn test_revote_refreshes_voter_label() {
    let mut store = new_store();
    seed_movies(&mut store);
    let alice = voter_id("u1");

    store.replace_vote(&alice, "Alice", &option_id("m1")).unwrap();
    store.replace_vote(&alice, "Alicia", &option_id("m2")).unwrap();

    let tallies = store.tally().unwrap();
    assert_eq!(tallies[&option_id("m2")].voter_labels, vec!["Alicia"]);
}

#[test]
fn test_votes_for_different_voters_are_independent() {
    let mut store = new_store();
    seed_movies(&mut store);

    store
        .replace_vote(&voter_id("u1"), "Alice", &option_id("m1"))
        .unwrap();
    store
        .replace_vote(&voter_id("u2"), "Bob", &option_id("m1"))
        .unwrap();

    assert_eq!(store.count_votes_for(&option_id("m1")).unwrap(), 2);
    assert_eq!(store.count_votes().unwrap(), 2);
}

#[test]
fn test_failed_replace_leaves_prior_vote_intact() {
    let mut store = new_store();
    seed_movies(&mut store);
    let alice = voter_id("u1");

    store.replace_vote(&alice, "Alice", &option_id("m1")).unwrap();

    // The insert violates the foreign key reference, so the whole
    // transaction (including the delete of the prior row) must roll back.
    let result = store.replace_vote(&alice, "Alice", &option_id("ghost"));
    assert!(result.is_err(), "Write against unknown option must fail");

    assert_eq!(
        store.get_vote(&alice).unwrap(),
        Some(option_id("m1")),
        "Store must be left in its pre-call state"
    );
    assert_eq!(store.count_votes().unwrap(), 1);
}
