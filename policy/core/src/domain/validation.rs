// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Project Record Validators
//!
//! Record-level invariants checked when a project is saved. Validators never
//! fail fast: each one appends `{field, message}` entries to a
//! caller-owned [`ValidationErrors`] collection, so every violation on a
//! record is reported at once.
//!
//! | Validator | Field | Invariant |
//! |-----------|-------|-----------|
//! | [`PermalinkValidator`] | `permalink` | permalink does not shadow a reserved route |
//! | [`RewardCountValidator`] | `rewards.size` | at least one reward |
//! | [`TagCountValidator`] | `public_tags` | at most N public tags (default 5) |

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::project::Project;

pub const PERMALINK_FIELD: &str = "permalink";
pub const REWARDS_SIZE_FIELD: &str = "rewards.size";
pub const PUBLIC_TAGS_FIELD: &str = "public_tags";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Append-only error collection owned by the caller for a single save.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.push(ValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Messages recorded against `field`.
    pub fn get(&self, field: &str) -> Vec<&str> {
        self.0
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field == field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn full_messages(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_messages().join(", "))
    }
}

/// A record-level invariant checked at save time.
pub trait ProjectValidator: Send + Sync {
    fn validate(&self, project: &Project, errors: &mut ValidationErrors);
}

/// Top-level route segments the application already serves
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReservedRoutes(HashSet<String>);

impl ReservedRoutes {
    pub fn contains(&self, segment: &str) -> bool {
        self.0.contains(segment)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ReservedRoutes {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Debug, Clone)]
pub struct PermalinkValidator {
    reserved: ReservedRoutes,
}

impl PermalinkValidator {
    pub fn new(reserved: ReservedRoutes) -> Self {
        Self { reserved }
    }

    /// Exact, case-sensitive match against the reserved set.
    pub fn is_reserved(permalink: &str, reserved: &ReservedRoutes) -> bool {
        reserved.contains(permalink)
    }
}

impl ProjectValidator for PermalinkValidator {
    fn validate(&self, project: &Project, errors: &mut ValidationErrors) {
        if let Some(permalink) = project.permalink.as_deref() {
            if Self::is_reserved(permalink, &self.reserved) {
                errors.add(PERMALINK_FIELD, "is reserved");
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RewardCountValidator;

impl ProjectValidator for RewardCountValidator {
    fn validate(&self, project: &Project, errors: &mut ValidationErrors) {
        if project.rewards.is_empty() {
            errors.add(REWARDS_SIZE_FIELD, "must have at least one reward");
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TagCountValidator {
    max_tags: usize,
}

impl TagCountValidator {
    pub fn new(max_tags: usize) -> Self {
        Self { max_tags }
    }

    pub fn max_tags(&self) -> usize {
        self.max_tags
    }

    /// Split a comma-separated id list; blank segments are ignored.
    pub fn parse_tag_ids(list: &str) -> Vec<&str> {
        list.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .collect()
    }
}

impl Default for TagCountValidator {
    fn default() -> Self {
        Self::new(5)
    }
}

impl ProjectValidator for TagCountValidator {
    fn validate(&self, project: &Project, errors: &mut ValidationErrors) {
        let Some(list) = project.all_public_tags.as_deref() else {
            return;
        };
        let count = Self::parse_tag_ids(list).len();
        if count > self.max_tags {
            errors.add(
                PUBLIC_TAGS_FIELD,
                format!("must have at most {} tags ({} given)", self.max_tags, count),
            );
        }
    }
}
