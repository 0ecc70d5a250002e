// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn key_display_and_parse() {
    let key = ObjectKey::new("default", "test");
    assert_eq!(key.to_string(), "default/test");
    assert_eq!("default/test".parse::<ObjectKey>().unwrap(), key);
}

#[test]
fn cluster_scoped_key() {
    let key: ObjectKey = "test".parse().unwrap();
    assert_eq!(key.namespace, "");
    assert_eq!(key.to_string(), "test");
}

#[test]
fn malformed_keys_rejected() {
    assert!("a/b/c".parse::<ObjectKey>().is_err());
    assert!("".parse::<ObjectKey>().is_err());
    assert!("ns/".parse::<ObjectKey>().is_err());
}
