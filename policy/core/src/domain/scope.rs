// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Project Scope
//!
//! Visibility filter used when listing a user's projects. Admins and the user
//! whose projects are listed see everything but deleted projects; anyone else
//! additionally loses drafts and rejected projects.

use serde::Serialize;

use crate::domain::project::{Project, ProjectState, UserId};
use crate::domain::viewer::Viewer;

const HIDDEN_FROM_OWNER: &[ProjectState] = &[ProjectState::Deleted];
const HIDDEN_FROM_PUBLIC: &[ProjectState] =
    &[ProjectState::Deleted, ProjectState::Draft, ProjectState::Rejected];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectScope {
    excluded_states: Vec<ProjectState>,
}

impl ProjectScope {
    /// Scope for `viewer` browsing the projects of `scope_owner`.
    pub fn new(viewer: Option<&Viewer>, scope_owner: Option<UserId>) -> Self {
        let sees_unpublished = viewer
            .is_some_and(|v| v.is_admin || scope_owner.is_some_and(|owner| owner == v.id));

        let excluded = if sees_unpublished {
            HIDDEN_FROM_OWNER
        } else {
            HIDDEN_FROM_PUBLIC
        };
        Self::excluding(excluded.to_vec())
    }

    pub fn excluding(excluded_states: Vec<ProjectState>) -> Self {
        Self { excluded_states }
    }

    pub fn excluded_states(&self) -> &[ProjectState] {
        &self.excluded_states
    }

    pub fn excludes(&self, state: ProjectState) -> bool {
        self.excluded_states.contains(&state)
    }

    pub fn resolve<I>(&self, candidates: I) -> Vec<Project>
    where
        I: IntoIterator<Item = Project>,
    {
        candidates
            .into_iter()
            .filter(|project| !self.excludes(project.state))
            .collect()
    }

    /// Borrowing variant of [`ProjectScope::resolve`].
    pub fn resolve_refs<'a>(&self, candidates: &'a [Project]) -> Vec<&'a Project> {
        candidates
            .iter()
            .filter(|project| !self.excludes(project.state))
            .collect()
    }
}
