// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Request and response payloads
//!
//! A body may be declared three ways: as a key/value mapping, as raw bytes,
//! or as a JSON string. Each representation is optional on its own, and an
//! unset representation is distinct from an empty one.

use crate::Any;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A payload in up to three interchangeable representations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Body {
    #[serde(default, alias = "KV", skip_serializing_if = "Option::is_none")]
    pub kv: Option<BTreeMap<String, Any>>,
    #[serde(
        default,
        alias = "Byte",
        with = "bytes",
        skip_serializing_if = "Option::is_none"
    )]
    pub byte: Option<Vec<u8>>,
    #[serde(default, alias = "JSON", skip_serializing_if = "Option::is_none")]
    pub json: Option<String>,
}

impl Body {
    pub fn from_kv<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Any>,
    {
        Body {
            kv: Some(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
            ..Body::default()
        }
    }

    pub fn from_json(json: impl Into<String>) -> Self {
        Body {
            json: Some(json.into()),
            ..Body::default()
        }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Body {
            byte: Some(bytes.into()),
            ..Body::default()
        }
    }

    /// The representation that gets sent.
    ///
    /// Precedence: `json` when set, then non-empty `byte`, then non-empty
    /// `kv`. Anything else sends an empty payload.
    pub fn encoding(&self) -> Encoding {
        if self.json.is_some() {
            Encoding::Json
        } else if self.byte.as_ref().is_some_and(|b| !b.is_empty()) {
            Encoding::Byte
        } else if self.kv.as_ref().is_some_and(|kv| !kv.is_empty()) {
            Encoding::Kv
        } else {
            Encoding::Empty
        }
    }

    /// Encode the active representation for sending; `kv` is JSON-encoded
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        match (self.encoding(), &self.json, &self.byte, &self.kv) {
            (Encoding::Json, Some(json), _, _) => Ok(json.as_bytes().to_vec()),
            (Encoding::Byte, _, Some(bytes), _) => Ok(bytes.clone()),
            (Encoding::Kv, _, _, Some(kv)) => serde_json::to_vec(kv),
            _ => Ok(Vec::new()),
        }
    }
}

/// Active representation of a [`Body`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Json,
    Byte,
    Kv,
    Empty,
}

/// Bytes may be declared as a UTF-8 string or as an array of integers
mod bytes {
    use serde::{Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Octets(Vec<u8>),
    }

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => match std::str::from_utf8(bytes) {
                Ok(text) => serializer.serialize_str(text),
                Err(_) => serializer.serialize_bytes(bytes),
            },
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<u8>>, D::Error> {
        Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
            Raw::Text(text) => text.into_bytes(),
            Raw::Octets(bytes) => bytes,
        }))
    }
}

#[cfg(test)]
#[path = "body_tests.rs"]
mod tests;
