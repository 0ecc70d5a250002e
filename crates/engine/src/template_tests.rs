// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use karness_core::Any;

fn vars(entries: &[(&str, &str)]) -> VariableStore {
    let mut store = VariableStore::new();
    for (name, value) in entries {
        store.set(*name, Any::from(*value));
    }
    store
}

#[test]
fn interpolate_simple() {
    let vars = vars(&[("USER", "alice")]);
    assert_eq!(interpolate("Hello {USER}!", &vars), "Hello alice!");
}

#[test]
fn interpolate_multiple() {
    let vars = vars(&[("A", "1"), ("B", "2")]);
    assert_eq!(interpolate("{A} + {B} = {A}{B}", &vars), "1 + 2 = 12");
}

#[test]
fn interpolate_unknown_left_alone() {
    let vars = VariableStore::new();
    assert_eq!(interpolate("Hello {UNKNOWN}!", &vars), "Hello {UNKNOWN}!");
}

#[test]
fn interpolate_inside_json_body() {
    let vars = vars(&[("USER", "alice")]);
    assert_eq!(
        interpolate(r#"{"name":"{USER}","tags":{}}"#, &vars),
        r#"{"name":"alice","tags":{}}"#
    );
}
