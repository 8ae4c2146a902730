// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Viewer
//!
//! The acting identity for a policy evaluation. Anonymous requests are modeled
//! as `Option<&Viewer>::None` at every call site rather than a sentinel viewer.

use serde::{Deserialize, Serialize};

use crate::domain::project::{Project, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewer {
    pub id: UserId,
    #[serde(default)]
    pub is_admin: bool,
}

impl Viewer {
    pub fn new(id: UserId) -> Self {
        Self { id, is_admin: false }
    }

    pub fn admin(id: UserId) -> Self {
        Self { id, is_admin: true }
    }

    pub fn owns(&self, project: &Project) -> bool {
        self.id == project.owner_id()
    }
}

/// Owner-or-admin gate shared by every project action.
pub fn is_owner_or_admin(viewer: Option<&Viewer>, project: &Project) -> bool {
    viewer.is_some_and(|v| v.is_admin || v.owns(project))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{ProjectState, UserRecord};

    #[test]
    fn test_owner_or_admin_gate() {
        let owner = UserId::new();
        let project = Project::new(UserRecord::new(owner), ProjectState::Draft);

        assert!(is_owner_or_admin(Some(&Viewer::new(owner)), &project));
        assert!(is_owner_or_admin(Some(&Viewer::admin(UserId::new())), &project));
        assert!(!is_owner_or_admin(Some(&Viewer::new(UserId::new())), &project));
        assert!(!is_owner_or_admin(None, &project));
    }
}
