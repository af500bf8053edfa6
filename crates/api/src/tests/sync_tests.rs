// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the catalog synchronizer's fail-safe and reconciliation
//! behavior against real source files.

use crate::error::ApiError;
use crate::sync::sync_catalog;
use crate::tests::{new_store, option_id, voter_id, write_source};

#[test]
fn test_sync_populates_catalog_from_source() {
    let mut store = new_store();
    let file = write_source("m1,Inception\nm2,Dune\n");

    let report = sync_catalog(&mut store, file.path()).unwrap();

    assert_eq!(report.added, 2);
    let labels: Vec<String> = store
        .list_options()
        .unwrap()
        .iter()
        .map(|entry| entry.label().to_string())
        .collect();
    assert_eq!(labels, vec!["Inception", "Dune"]);
}

#[test]
fn test_sync_twice_is_idempotent() {
    let mut store = new_store();
    let file = write_source("m1,Inception\nm2,Dune\n");

    sync_catalog(&mut store, file.path()).unwrap();
    let before = store.list_options().unwrap();
    let report = sync_catalog(&mut store, file.path()).unwrap();

    assert_eq!(report.added + report.updated + report.removed, 0);
    assert_eq!(store.list_options().unwrap(), before);
}

#[test]
fn test_sync_missing_source_is_soft_failure_without_mutation() {
    let mut store = new_store();
    let file = write_source("m1,Inception\n");
    sync_catalog(&mut store, file.path()).unwrap();

    let result = sync_catalog(&mut store, "/nonexistent/movies.csv");

    assert!(matches!(result, Err(ApiError::SourceUnreadable { .. })));
    assert_eq!(
        store.count_options().unwrap(),
        1,
        "Existing catalog remains authoritative"
    );
}

#[test]
fn test_sync_scenario_label_update_and_guarded_delete() {
    // The end-to-end scenario: two options, a voter moves from m1 to m2,
    // then the source shrinks to a renamed m2.
    let mut store = new_store();
    let initial = write_source("m1,Inception\nm2,Dune\n");
    sync_catalog(&mut store, initial.path()).unwrap();

    let alice = voter_id("u1");
    store.replace_vote(&alice, "Alice", &option_id("m1")).unwrap();
    store.replace_vote(&alice, "Alice", &option_id("m2")).unwrap();

    let updated = write_source("m2,Dune: Part Two\n");
    let report = sync_catalog(&mut store, updated.path()).unwrap();

    assert_eq!(report.updated, 1);
    assert_eq!(report.removed, 1, "m1 has no votes and is deleted");
    assert_eq!(store.get_option(&option_id("m1")).unwrap(), None);
    assert_eq!(
        store
            .get_option(&option_id("m2"))
            .unwrap()
            .unwrap()
            .label(),
        "Dune: Part Two"
    );
}

#[test]
fn test_sync_retains_voted_option_gone_from_source() {
    let mut store = new_store();
    let initial = write_source("m1,Inception\nm2,Dune\n");
    sync_catalog(&mut store, initial.path()).unwrap();
    store
        .replace_vote(&voter_id("u1"), "Alice", &option_id("m1"))
        .unwrap();

    let shrunk = write_source("m2,Dune\n");
    let report = sync_catalog(&mut store, shrunk.path()).unwrap();

    assert_eq!(report.retained, 1);
    assert!(
        store.get_option(&option_id("m1")).unwrap().is_some(),
        "Protected orphan stays in the catalog"
    );
}

#[test]
fn test_sync_skips_malformed_rows_but_uses_good_ones() {
    let mut store = new_store();
    let file = write_source("m1,Inception\nbroken\n ,NoId\nm2,Dune\n");

    let report = sync_catalog(&mut store, file.path()).unwrap();

    assert_eq!(report.added, 2);
    assert_eq!(store.count_options().unwrap(), 2);
}
