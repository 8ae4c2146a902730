// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Project Validation Service
//!
//! Runs the record validators from the persistence layer's save hook. The
//! permalink and tag checks always run; the reward-count check only runs once
//! a project has left the drafting phase or is being published.

use thiserror::Error;
use tracing::{debug, info};

use crate::domain::policy_config::PolicyConfigSpec;
use crate::domain::project::{Project, ProjectId, ProjectState};
use crate::domain::validation::{
    PermalinkValidator, ProjectValidator, ReservedRoutes, RewardCountValidator, TagCountValidator,
    ValidationErrors,
};

/// States in which a project must carry at least one reward
pub const REWARD_REQUIRED_STATES: &[ProjectState] = &[
    ProjectState::InAnalysis,
    ProjectState::Approved,
    ProjectState::Online,
    ProjectState::WaitingFunds,
    ProjectState::Successful,
    ProjectState::Failed,
];

#[derive(Debug, Error)]
#[error("Project {project_id} is invalid: {errors}")]
pub struct ValidationFailed {
    pub project_id: ProjectId,
    pub errors: ValidationErrors,
}

pub struct ProjectValidationService {
    permalink: PermalinkValidator,
    rewards: RewardCountValidator,
    tags: TagCountValidator,
}

impl ProjectValidationService {
    pub fn new(reserved_routes: ReservedRoutes, max_public_tags: usize) -> Self {
        Self {
            permalink: PermalinkValidator::new(reserved_routes),
            rewards: RewardCountValidator,
            tags: TagCountValidator::new(max_public_tags),
        }
    }

    pub fn from_config(spec: &PolicyConfigSpec) -> Self {
        let reserved: ReservedRoutes = spec.routes.reserved.iter().cloned().collect();
        Self::new(reserved, spec.tags.max_public_tags)
    }

    pub fn requires_rewards(project: &Project, publishing: bool) -> bool {
        publishing || REWARD_REQUIRED_STATES.contains(&project.state)
    }

    /// Collect every violation on `project`. `publishing` forces the reward check.
    pub fn validate(&self, project: &Project, publishing: bool) -> ValidationErrors {
        let mut errors = ValidationErrors::new();
        self.validate_into(project, publishing, &mut errors);
        errors
    }

    /// Append violations to an error collection the caller already owns.
    pub fn validate_into(&self, project: &Project, publishing: bool, errors: &mut ValidationErrors) {
        self.permalink.validate(project, errors);
        self.tags.validate(project, errors);
        if Self::requires_rewards(project, publishing) {
            self.rewards.validate(project, errors);
        }

        debug!(
            project_id = %project.id,
            state = %project.state,
            publishing,
            errors = errors.len(),
            "project validated"
        );
    }

    /// Refuse a save that carries any violation.
    pub fn ensure_valid(&self, project: &Project, publishing: bool) -> Result<(), ValidationFailed> {
        let errors = self.validate(project, publishing);
        if errors.is_empty() {
            return Ok(());
        }

        info!(project_id = %project.id, %errors, "project save refused");
        Err(ValidationFailed {
            project_id: project.id,
            errors,
        })
    }
}

impl Default for ProjectValidationService {
    fn default() -> Self {
        Self::from_config(&PolicyConfigSpec::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{Reward, UserId, UserRecord};
    use crate::domain::validation::{PERMALINK_FIELD, PUBLIC_TAGS_FIELD, REWARDS_SIZE_FIELD};

    fn reward() -> Reward {
        Reward {
            id: 7,
            title: None,
            description: "Thank-you card".to_string(),
            minimum_value: 5.0,
            maximum_contributions: Some(100),
            deliver_at: None,
            shipping_options: Some("free".to_string()),
            shipping_fees: vec![],
        }
    }

    fn project(state: ProjectState) -> Project {
        Project::new(UserRecord::new(UserId::new()), state)
    }

    #[test]
    fn test_draft_without_rewards_is_valid_until_publishing() {
        let service = ProjectValidationService::default();
        let draft = project(ProjectState::Draft);

        assert!(service.validate(&draft, false).is_empty());
        assert!(service.validate(&draft, true).contains(REWARDS_SIZE_FIELD));
    }

    #[test]
    fn test_online_requires_rewards() {
        let service = ProjectValidationService::default();
        assert!(service
            .validate(&project(ProjectState::Online), false)
            .contains(REWARDS_SIZE_FIELD));
        assert!(service
            .validate(&project(ProjectState::Online).with_rewards(vec![reward()]), false)
            .is_empty());
    }

    #[test]
    fn test_default_routes_reserve_projects() {
        let service = ProjectValidationService::default();
        let errors = service.validate(&project(ProjectState::Draft).with_permalink("projects"), false);
        assert!(errors.contains(PERMALINK_FIELD));

        let errors = service.validate(&project(ProjectState::Draft).with_permalink("permalink_test"), false);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_all_violations_reported_together() {
        let service = ProjectValidationService::new(["start"].into_iter().collect(), 2);
        let p = project(ProjectState::Online)
            .with_permalink("start")
            .with_public_tags("1,2,3");

        let err = service.ensure_valid(&p, false).unwrap_err();
        assert_eq!(err.project_id, p.id);
        assert!(err.errors.contains(PERMALINK_FIELD));
        assert!(err.errors.contains(PUBLIC_TAGS_FIELD));
        assert!(err.errors.contains(REWARDS_SIZE_FIELD));
        assert!(err.to_string().contains("public_tags must have at most 2 tags"));
    }

    #[test]
    fn test_existing_errors_are_preserved() {
        let service = ProjectValidationService::default();
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");

        service.validate_into(&project(ProjectState::Draft).with_public_tags("1,2,3,4,5,6"), false, &mut errors);
        assert_eq!(errors.len(), 2);
        assert!(errors.contains("name"));
    }
}
