// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest directory watcher

use crate::Notification;
use karness_core::{Object, ObjectKey};
use karness_manifest::{load_file, Format};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Polls a directory of manifests and reports what changed since the last
/// scan.
///
/// A file that fails to parse keeps contributing the objects it declared
/// when it last parsed, so a half-saved edit never deletes a scenario.
pub struct ManifestWatcher {
    dir: PathBuf,
    files: HashMap<PathBuf, Vec<Object>>,
    seen: BTreeMap<ObjectKey, Object>,
}

impl ManifestWatcher {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            files: HashMap::new(),
            seen: BTreeMap::new(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Re-read the directory and return the notifications it implies
    pub fn scan(&mut self) -> Vec<Notification> {
        let paths = match manifest_paths(&self.dir) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::warn!(dir = %self.dir.display(), error = %e, "cannot read manifest directory");
                return Vec::new();
            }
        };

        self.files.retain(|path, _| paths.contains(path));
        for path in &paths {
            match load_file(path) {
                Ok(objects) => {
                    self.files.insert(path.clone(), objects);
                }
                Err(e) => {
                    tracing::error!(path = %path.display(), error = %e, "invalid manifest, keeping previous objects");
                }
            }
        }

        let mut current: BTreeMap<ObjectKey, Object> = BTreeMap::new();
        for path in &paths {
            for object in self.files.get(path).into_iter().flatten() {
                if current.insert(object.key(), object.clone()).is_some() {
                    tracing::warn!(key = %object.key(), path = %path.display(), "duplicate object, last declaration wins");
                }
            }
        }

        let mut notifications = Vec::new();
        for key in self.seen.keys() {
            if !current.contains_key(key) {
                notifications.push(Notification::Deleted(key.clone()));
            }
        }
        for (key, object) in &current {
            match self.seen.get(key) {
                None => notifications.push(Notification::Added(object.clone())),
                Some(previous) if !same_definition(previous, object) => {
                    notifications.push(Notification::Updated(object.clone()))
                }
                Some(_) => {}
            }
        }

        self.seen = current;
        notifications
    }
}

/// Manifest files directly inside `dir`, sorted by path
fn manifest_paths(dir: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && Format::from_path(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

/// Objects are the same definition when kind and spec agree; status is ignored
fn same_definition(a: &Object, b: &Object) -> bool {
    match (a, b) {
        (Object::Scenario(a), Object::Scenario(b)) => a.spec == b.spec,
        (Object::Unsupported { kind: a, .. }, Object::Unsupported { kind: b, .. }) => a == b,
        _ => false,
    }
}

#[cfg(test)]
#[path = "watcher_tests.rs"]
mod tests;
