// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for catalog reconciliation against source records.

use crate::SyncReport;
use crate::tests::{new_store, option_id, record, voter_id};

#[test]
fn test_reconcile_populates_empty_catalog() {
    let mut store = new_store();
    let records = vec![record("m1", "Inception"), record("m2", "Dune")];

    let report = store.reconcile_catalog(&records).unwrap();

    assert_eq!(
        report,
        SyncReport {
            added: 2,
            ..SyncReport::default()
        }
    );
    let labels: Vec<String> = store
        .list_options()
        .unwrap()
        .iter()
        .map(|entry| entry.label().to_string())
        .collect();
    assert_eq!(labels, vec!["Inception", "Dune"]);
}

#[test]
fn test_reconcile_is_idempotent() {
    let mut store = new_store();
    let records = vec![record("m1", "Inception"), record("m2", "Dune")];

    store.reconcile_catalog(&records).unwrap();
    let before = store.list_options().unwrap();

    let report = store.reconcile_catalog(&records).unwrap();

    assert_eq!(report, SyncReport::default(), "Second run changes nothing");
    assert_eq!(store.list_options().unwrap(), before);
}

#[test]
fn test_reconcile_updates_label_in_place() {
    let mut store = new_store();
    store
        .reconcile_catalog(&[record("m2", "Dune")])
        .unwrap();
    let before = store.get_option(&option_id("m2")).unwrap().unwrap();

    let report = store
        .reconcile_catalog(&[record("m2", "Dune: Part Two")])
        .unwrap();

    assert_eq!(report.updated, 1);
    let after = store.get_option(&option_id("m2")).unwrap().unwrap();
    assert_eq!(after.label(), "Dune: Part Two");
    assert_eq!(after.created_seq(), before.created_seq());
}

#[test]
fn test_reconcile_deletes_unvoted_absentee() {
    let mut store = new_store();
    store
        .reconcile_catalog(&[record("m1", "Inception"), record("m2", "Dune")])
        .unwrap();

    let report = store.reconcile_catalog(&[record("m2", "Dune")]).unwrap();

    assert_eq!(report.removed, 1);
    assert_eq!(store.get_option(&option_id("m1")).unwrap(), None);
}

#[test]
fn test_reconcile_retains_voted_absentee() {
    let mut store = new_store();
    store
        .reconcile_catalog(&[record("m1", "Inception"), record("m2", "Dune")])
        .unwrap();
    store
        .replace_vote(&voter_id("u1"), "Alice", &option_id("m1"))
        .unwrap();

    let report = store.reconcile_catalog(&[record("m2", "Dune")]).unwrap();

    assert_eq!(report.retained, 1);
    assert_eq!(report.removed, 0);
    let entry = store.get_option(&option_id("m1")).unwrap();
    assert!(entry.is_some(), "Vote-bearing option must survive the source");
    assert_eq!(store.count_votes_for(&option_id("m1")).unwrap(), 1);
}

#[test]
fn test_reconcile_preserves_creation_order_on_source_reorder() {
    let mut store = new_store();
    store
        .reconcile_catalog(&[record("m1", "Inception"), record("m2", "Dune")])
        .unwrap();

    // Source reorders existing entries and appends a new one.
    store
        .reconcile_catalog(&[
            record("m2", "Dune"),
            record("m1", "Inception"),
            record("m3", "Arrival"),
        ])
        .unwrap();

    let ids: Vec<String> = store
        .list_options()
        .unwrap()
        .iter()
        .map(|entry| entry.option_id().to_string())
        .collect();
    assert_eq!(
        ids,
        vec!["m1", "m2", "m3"],
        "Pre-existing entries retain their original creation order"
    );
}

#[test]
fn test_reconcile_full_scenario() {
    // Scenario: sync, vote, revote, shrink the source, sync again.
    let mut store = new_store();
    store
        .reconcile_catalog(&[record("m1", "Inception"), record("m2", "Dune")])
        .unwrap();

    let alice = voter_id("u1");
    store.replace_vote(&alice, "Alice", &option_id("m1")).unwrap();
    store.replace_vote(&alice, "Alice", &option_id("m2")).unwrap();

    let m2_before = store.get_option(&option_id("m2")).unwrap().unwrap();
    let report = store
        .reconcile_catalog(&[record("m2", "Dune: Part Two")])
        .unwrap();

    // m1 lost its only vote to the revote, so it is removed; m2 keeps its
    // creation marker across the label update.
    assert_eq!(
        report,
        SyncReport {
            updated: 1,
            removed: 1,
            ..SyncReport::default()
        }
    );
    assert_eq!(store.get_option(&option_id("m1")).unwrap(), None);
    let m2_after = store.get_option(&option_id("m2")).unwrap().unwrap();
    assert_eq!(m2_after.label(), "Dune: Part Two");
    assert_eq!(m2_after.created_seq(), m2_before.created_seq());

    let tallies = store.tally().unwrap();
    assert_eq!(tallies[&option_id("m2")].count, 1);
    assert_eq!(tallies[&option_id("m2")].voter_labels, vec!["Alice"]);
}

#[test]
fn test_reconcile_empty_source_respects_guard() {
    let mut store = new_store();
    store
        .reconcile_catalog(&[record("m1", "Inception"), record("m2", "Dune")])
        .unwrap();
    store
        .replace_vote(&voter_id("u1"), "Alice", &option_id("m2"))
        .unwrap();

    let report = store.reconcile_catalog(&[]).unwrap();

    assert_eq!(report.removed, 1, "Unvoted m1 is removed");
    assert_eq!(report.retained, 1, "Voted m2 is retained");
    assert_eq!(store.count_options().unwrap(), 1);
}
