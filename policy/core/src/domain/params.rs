// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Submitted Params
//!
//! The proposed attribute changes for a project, as decoded from the request
//! body. Values are kept as raw JSON; the engine only ever reads the few keys
//! it needs (`service_fee`, `integrations_attributes`) and never fails on
//! malformed input.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::project::Integration;

pub const SERVICE_FEE_KEY: &str = "service_fee";
pub const INTEGRATIONS_KEY: &str = "integrations_attributes";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmittedParams(Map<String, Value>);

impl SubmittedParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Anything other than a JSON object is treated as empty params.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Self(map),
            _ => Self::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }

    /// The submitted service fee, if one was given and is not blank.
    pub fn service_fee(&self) -> Option<&Value> {
        self.get(SERVICE_FEE_KEY).filter(|v| is_present(v))
    }

    /// Integrations submitted alongside the update, materialized into the same
    /// shape as the persisted ones. Returns `None` when none were submitted.
    ///
    /// Accepts both a JSON array and an index-keyed object (`{"0": {...}}`).
    /// Entries without a string `name` are skipped.
    pub fn integrations(&self) -> Option<Vec<Integration>> {
        let raw = self.get(INTEGRATIONS_KEY).filter(|v| is_present(v))?;
        let entries: Vec<&Value> = match raw {
            Value::Array(items) => items.iter().collect(),
            Value::Object(indexed) => indexed.values().collect(),
            _ => return None,
        };

        Some(entries.into_iter().filter_map(integration_from_value).collect())
    }
}

impl From<Map<String, Value>> for SubmittedParams {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

fn integration_from_value(value: &Value) -> Option<Integration> {
    let entry = value.as_object()?;
    let name = entry.get("name")?.as_str()?.to_string();
    let data = entry
        .get("data")
        .and_then(Value::as_object)
        .map(|data| {
            data.iter()
                .filter_map(|(k, v)| scalar_to_string(v).map(|s| (k.clone(), s)))
                .collect()
        })
        .unwrap_or_else(HashMap::new);

    Some(Integration { name, data })
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Blank values are null, false, whitespace-only strings, and empty collections.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Number(_) => true,
    }
}

/// Lenient float coercion: numbers as-is, strings by their leading decimal
/// prefix (`"0.1abc"` is `0.1`), everything else `0.0`. Never fails.
pub fn coerce_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => leading_decimal(s),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

fn leading_decimal(input: &str) -> f64 {
    let trimmed = input.trim_start();
    let candidate_len = trimmed
        .char_indices()
        .find(|(_, c)| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
        .map(|(idx, _)| idx)
        .unwrap_or(trimmed.len());
    let candidate = &trimmed[..candidate_len];

    (1..=candidate.len())
        .rev()
        .find_map(|end| candidate[..end].parse::<f64>().ok())
        .unwrap_or(0.0)
}
