// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Project Aggregate Snapshot
//!
//! Read-only snapshot of a crowdfunding project (campaign) as handed to the
//! policy engine by the data layer. The engine never mutates or persists it.
//!
//! | Type | Description |
//! |------|-------------|
//! | `Project` | The campaign record under authorization |
//! | `ProjectState` | Lifecycle state driving most policy decisions |
//! | `UserRecord` | Snapshot of the owning user, consumed by the nested user policy |
//! | `Integration` | Named third-party integration attached to a project |
//! | `Reward` | Reward tier; only its presence matters to validation |

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Project identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectId(pub Uuid);

impl ProjectId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// User identifier, shared by viewers and project owners
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub Uuid);

impl UserId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown project state: {0}")]
pub struct ParseProjectStateError(pub String);

/// Project lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectState {
    Draft,
    Rejected,
    Deleted,
    InAnalysis,
    Approved,
    Online,
    WaitingFunds,
    Failed,
    Successful,
}

impl ProjectState {
    pub const ALL: [ProjectState; 9] = [
        ProjectState::Draft,
        ProjectState::Rejected,
        ProjectState::Deleted,
        ProjectState::InAnalysis,
        ProjectState::Approved,
        ProjectState::Online,
        ProjectState::WaitingFunds,
        ProjectState::Failed,
        ProjectState::Successful,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectState::Draft => "draft",
            ProjectState::Rejected => "rejected",
            ProjectState::Deleted => "deleted",
            ProjectState::InAnalysis => "in_analysis",
            ProjectState::Approved => "approved",
            ProjectState::Online => "online",
            ProjectState::WaitingFunds => "waiting_funds",
            ProjectState::Failed => "failed",
            ProjectState::Successful => "successful",
        }
    }

    /// Draft and rejected projects are still being edited by their owners.
    pub fn is_editable(&self) -> bool {
        matches!(self, ProjectState::Draft | ProjectState::Rejected)
    }

    /// Funding has ended (or is settling); reward delivery dates are frozen.
    pub fn is_funding_closed(&self) -> bool {
        matches!(
            self,
            ProjectState::WaitingFunds | ProjectState::Failed | ProjectState::Successful
        )
    }
}

impl fmt::Display for ProjectState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectState {
    type Err = ParseProjectStateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProjectState::ALL
            .iter()
            .copied()
            .find(|state| state.as_str() == s)
            .ok_or_else(|| ParseProjectStateError(s.to_string()))
    }
}

/// Third-party integration attached to a project (e.g. a solidarity fee agreement)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub name: String,
    #[serde(default)]
    pub data: HashMap<String, String>,
}

impl Integration {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: HashMap::new(),
        }
    }
}

/// Snapshot of the user owning a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    /// Column names of the user record, used by the nested user policy
    #[serde(default)]
    pub attribute_names: Vec<String>,
}

impl UserRecord {
    pub fn new(id: UserId) -> Self {
        Self {
            id,
            attribute_names: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShippingFee {
    pub id: u64,
    pub value: f64,
    pub destination: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: String,
    pub minimum_value: f64,
    #[serde(default)]
    pub maximum_contributions: Option<u32>,
    #[serde(default)]
    pub deliver_at: Option<NaiveDate>,
    #[serde(default)]
    pub shipping_options: Option<String>,
    #[serde(default)]
    pub shipping_fees: Vec<ShippingFee>,
}

/// Crowdfunding project snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    /// The owning user; `owner_id()` is derived from it
    pub owner: UserRecord,
    pub state: ProjectState,
    #[serde(default)]
    pub service_fee: f64,
    #[serde(default)]
    pub integrations: Vec<Integration>,
    /// Column names of the project record
    #[serde(default)]
    pub attribute_names: Vec<String>,
    #[serde(default)]
    pub permalink: Option<String>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    /// Comma-separated public tag ids as submitted by the dashboard
    #[serde(default)]
    pub all_public_tags: Option<String>,
}

impl Project {
    pub fn new(owner: UserRecord, state: ProjectState) -> Self {
        Self {
            id: ProjectId::new(),
            owner,
            state,
            service_fee: 0.0,
            integrations: Vec::new(),
            attribute_names: Vec::new(),
            permalink: None,
            rewards: Vec::new(),
            all_public_tags: None,
        }
    }

    pub fn owner_id(&self) -> UserId {
        self.owner.id
    }

    pub fn with_attribute_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attribute_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_integrations(mut self, integrations: Vec<Integration>) -> Self {
        self.integrations = integrations;
        self
    }

    pub fn with_rewards(mut self, rewards: Vec<Reward>) -> Self {
        self.rewards = rewards;
        self
    }

    pub fn with_permalink(mut self, permalink: impl Into<String>) -> Self {
        self.permalink = Some(permalink.into());
        self
    }

    pub fn with_public_tags(mut self, tags: impl Into<String>) -> Self {
        self.all_public_tags = Some(tags.into());
        self
    }
}
