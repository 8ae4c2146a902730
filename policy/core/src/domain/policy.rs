// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Project Action Policy
//!
//! Boolean permissions for the actions a viewer may take on a project. Every
//! action sits behind the same owner-or-admin gate; `update` additionally
//! refuses deleted projects. Anonymous viewers are refused everything.
//!
//! | Action | Rule |
//! |--------|------|
//! | `create` | owner or admin |
//! | `update` | `create` and state is not `deleted` |
//! | `publish` | owner or admin |
//! | `publish_by_steps` | owner or admin |
//! | `validate_publish` | owner or admin |
//! | `push_to_online` | owner or admin |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::project::{Project, ProjectState};
use crate::domain::viewer::{is_owner_or_admin, Viewer};

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown project action: {0}")]
pub struct ParseProjectActionError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectAction {
    Create,
    Update,
    Publish,
    PublishBySteps,
    ValidatePublish,
    PushToOnline,
}

impl ProjectAction {
    pub const ALL: [ProjectAction; 6] = [
        ProjectAction::Create,
        ProjectAction::Update,
        ProjectAction::Publish,
        ProjectAction::PublishBySteps,
        ProjectAction::ValidatePublish,
        ProjectAction::PushToOnline,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectAction::Create => "create",
            ProjectAction::Update => "update",
            ProjectAction::Publish => "publish",
            ProjectAction::PublishBySteps => "publish_by_steps",
            ProjectAction::ValidatePublish => "validate_publish",
            ProjectAction::PushToOnline => "push_to_online",
        }
    }
}

impl fmt::Display for ProjectAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectAction {
    type Err = ParseProjectActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().trim_end_matches('?');
        ProjectAction::ALL
            .iter()
            .copied()
            .find(|action| action.as_str() == normalized)
            .ok_or_else(|| ParseProjectActionError(s.to_string()))
    }
}

/// Action permissions of one viewer over one project snapshot.
#[derive(Debug, Clone, Copy)]
pub struct ProjectPolicy<'a> {
    viewer: Option<&'a Viewer>,
    project: &'a Project,
}

impl<'a> ProjectPolicy<'a> {
    pub fn new(viewer: Option<&'a Viewer>, project: &'a Project) -> Self {
        Self { viewer, project }
    }

    pub fn create(&self) -> bool {
        self.done_by_owner_or_admin()
    }

    pub fn push_to_online(&self) -> bool {
        self.done_by_owner_or_admin()
    }

    pub fn update(&self) -> bool {
        self.create() && self.project.state != ProjectState::Deleted
    }

    pub fn publish(&self) -> bool {
        self.done_by_owner_or_admin()
    }

    pub fn publish_by_steps(&self) -> bool {
        self.done_by_owner_or_admin()
    }

    pub fn validate_publish(&self) -> bool {
        self.done_by_owner_or_admin()
    }

    pub fn permits(&self, action: ProjectAction) -> bool {
        match action {
            ProjectAction::Create => self.create(),
            ProjectAction::Update => self.update(),
            ProjectAction::Publish => self.publish(),
            ProjectAction::PublishBySteps => self.publish_by_steps(),
            ProjectAction::ValidatePublish => self.validate_publish(),
            ProjectAction::PushToOnline => self.push_to_online(),
        }
    }

    fn done_by_owner_or_admin(&self) -> bool {
        is_owner_or_admin(self.viewer, self.project)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{UserId, UserRecord};

    fn project(state: ProjectState) -> (UserId, Project) {
        let owner = UserId::new();
        (owner, Project::new(UserRecord::new(owner), state))
    }

    #[test]
    fn test_owner_and_admin_may_act() {
        let (owner, project) = project(ProjectState::Online);
        let owner = Viewer::new(owner);
        let admin = Viewer::admin(UserId::new());

        for viewer in [&owner, &admin] {
            let policy = ProjectPolicy::new(Some(viewer), &project);
            for action in ProjectAction::ALL {
                assert!(policy.permits(action), "{action} should be allowed");
            }
        }
    }

    #[test]
    fn test_strangers_and_anonymous_may_not_act() {
        let (_, project) = project(ProjectState::Draft);
        let stranger = Viewer::new(UserId::new());

        for viewer in [Some(&stranger), None] {
            let policy = ProjectPolicy::new(viewer, &project);
            for action in ProjectAction::ALL {
                assert!(!policy.permits(action), "{action} should be refused");
            }
        }
    }

    #[test]
    fn test_deleted_project_cannot_be_updated_even_by_owner() {
        let (owner, project) = project(ProjectState::Deleted);
        let owner = Viewer::new(owner);
        let admin = Viewer::admin(UserId::new());

        assert!(!ProjectPolicy::new(Some(&owner), &project).update());
        assert!(!ProjectPolicy::new(Some(&admin), &project).update());
        // the other gates ignore state
        assert!(ProjectPolicy::new(Some(&owner), &project).create());
        assert!(ProjectPolicy::new(Some(&owner), &project).publish());
    }

    #[test]
    fn test_update_allowed_on_every_other_state() {
        for state in ProjectState::ALL.into_iter().filter(|s| *s != ProjectState::Deleted) {
            let (owner, project) = project(state);
            assert!(ProjectPolicy::new(Some(&Viewer::new(owner)), &project).update());
        }
    }

    #[test]
    fn test_action_parsing() {
        assert_eq!("publish_by_steps".parse::<ProjectAction>(), Ok(ProjectAction::PublishBySteps));
        assert_eq!("update?".parse::<ProjectAction>(), Ok(ProjectAction::Update));
        assert_eq!(" push_to_online ".parse::<ProjectAction>(), Ok(ProjectAction::PushToOnline));
        assert!("destroy".parse::<ProjectAction>().is_err());
    }
}
