// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Manifest parsing (YAML and JSON)

use karness_core::{
    Object, ObjectMeta, Scenario, ScenarioSpec, ScenarioStatus, API_VERSION, SCENARIO_KIND,
};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Namespace given to objects that declare none
const DEFAULT_NAMESPACE: &str = "default";

/// Errors that can occur during manifest parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("unsupported manifest file: {0}")]
    UnsupportedFile(PathBuf),
    #[error("missing required field: {0}")]
    MissingField(String),
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}

/// Manifest encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Pick the format from a file extension
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Some(Format::Yaml),
            Some("json") => Some(Format::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    metadata: RawMeta,
    #[serde(default)]
    spec: Value,
    #[serde(default)]
    status: Value,
}

#[derive(Debug, Default, Deserialize)]
struct RawMeta {
    #[serde(default)]
    namespace: Option<String>,
    #[serde(default)]
    name: Option<String>,
}

/// Read and parse a manifest file, choosing the format by extension
pub fn load_file(path: &Path) -> Result<Vec<Object>, ParseError> {
    let format =
        Format::from_path(path).ok_or_else(|| ParseError::UnsupportedFile(path.to_path_buf()))?;
    let content = std::fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_manifests(&content, format)
}

/// Parse every object declared in `content`.
///
/// YAML content may hold several `---` separated documents; JSON content may
/// be a single object or an array of objects. Empty documents are skipped.
pub fn parse_manifests(content: &str, format: Format) -> Result<Vec<Object>, ParseError> {
    let documents = match format {
        Format::Yaml => {
            let mut documents = Vec::new();
            for document in serde_yaml::Deserializer::from_str(content) {
                documents.push(Value::deserialize(document)?);
            }
            documents
        }
        Format::Json => match serde_json::from_str::<Value>(content)? {
            Value::Array(items) => items,
            single => vec![single],
        },
    };

    documents
        .into_iter()
        .filter(|document| !document.is_null())
        .enumerate()
        .map(|(index, document)| parse_object(index, document))
        .collect()
}

fn parse_object(index: usize, document: Value) -> Result<Object, ParseError> {
    let raw: RawManifest = serde_json::from_value(document)?;

    if raw.kind.is_empty() {
        return Err(ParseError::MissingField(format!("document {}: kind", index)));
    }
    if raw.api_version != API_VERSION {
        return Err(ParseError::InvalidFormat(format!(
            "document {}: unsupported apiVersion {:?} (expected {:?})",
            index, raw.api_version, API_VERSION
        )));
    }

    let name = raw
        .metadata
        .name
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ParseError::MissingField(format!("document {}: metadata.name", index)))?;
    let metadata = ObjectMeta {
        namespace: raw
            .metadata
            .namespace
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string()),
        name,
    };

    if raw.kind != SCENARIO_KIND {
        return Ok(Object::Unsupported {
            kind: raw.kind,
            metadata,
        });
    }

    let spec: ScenarioSpec = if raw.spec.is_null() {
        ScenarioSpec::default()
    } else {
        serde_json::from_value(raw.spec)?
    };
    let status: ScenarioStatus = if raw.status.is_null() {
        ScenarioStatus::default()
    } else {
        serde_json::from_value(raw.status)?
    };

    validate_spec(&metadata, &spec)?;

    Ok(Object::from(Scenario {
        metadata,
        spec,
        status,
    }))
}

fn validate_spec(metadata: &ObjectMeta, spec: &ScenarioSpec) -> Result<(), ParseError> {
    for (index, event) in spec.events.iter().enumerate() {
        if let Err(e) = event.action.call() {
            return Err(ParseError::InvalidFormat(format!(
                "{}: event {} ({:?}): {}",
                metadata.name, index, event.name, e
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "parser_tests.rs"]
mod tests;
