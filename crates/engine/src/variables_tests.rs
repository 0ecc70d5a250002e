// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn seeded_store_holds_declared_values() {
    let initial: BTreeMap<String, Any> = [("USER".to_string(), Any::from("alice"))]
        .into_iter()
        .collect();
    let store = VariableStore::seeded(&initial);
    assert_eq!(store.get("USER"), Some(&Any::from("alice")));
    assert_eq!(store.get("MISSING"), None);
    assert_eq!(store.len(), 1);
}

#[test]
fn last_write_wins() {
    let mut store = VariableStore::new();
    assert!(store.is_empty());
    store.set("MSG", Any::from("first"));
    store.set("MSG", Any::from("second"));
    assert_eq!(store.get("MSG"), Some(&Any::from("second")));
    assert_eq!(store.snapshot().len(), 1);
}
