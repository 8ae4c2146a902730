// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Project Attribute Filter
//!
//! Computes the whitelist of attribute keys a viewer may submit when writing a
//! project. Keys absent from the result are dropped by the caller before any
//! write, so this module is the field-level half of project authorization.
//!
//! ## Composition
//!
//! The result is composed declaratively from three steps:
//!
//! 1. **Base set by role** ([`AttributeRole`]):
//!    - `Admin` and `Editor` start from every project column plus the
//!      structural keys (`all_tags`, `all_public_tags`, `content_rating`) and
//!      all nested groups including goals.
//!    - `Public` gets the fixed public subset and every nested group but goals.
//! 2. **Deny-list difference** for `Editor` only ([`EDITOR_DENIED_ATTRIBUTES`]).
//! 3. **Conditional grants** for `Admin` and `Editor` (see
//!    [`crate::domain::conditional`]).
//!
//! Independently of role, the reward group drops `deliver_at` once funding has
//! closed (`waiting_funds`, `failed`, `successful`).

use std::sync::Arc;

use tracing::debug;

use crate::domain::attributes::{AttributeSet, PermittedAttribute, DESTROY_FLAG};
use crate::domain::conditional::ServiceFeeRule;
use crate::domain::params::SubmittedParams;
use crate::domain::policy_config::PolicyConfigSpec;
use crate::domain::project::{Project, ProjectState};
use crate::domain::user_policy::{NestedPolicyComposer, UserPolicy};
use crate::domain::viewer::Viewer;

/// Scalar keys anyone may submit
pub const PUBLIC_ATTRIBUTES: &[&str] = &[
    "about_html",
    "online_days",
    "video_url",
    "cover_image",
    "uploaded_image",
    "headline",
    "budget",
    "city_id",
    "city",
];

/// Keys stripped from the full set when the privileged viewer is not an admin
pub const EDITOR_DENIED_ATTRIBUTES: &[&str] = &[
    "audited_user_name",
    "audited_user_cpf",
    "audited_user_phone_number",
    "state",
    "origin_id",
    "service_fee",
    "total_installments",
    "recommended",
    "created_at",
    "updated_at",
    "expires_at",
    "all_tags",
];

pub const USER_ATTRIBUTES_KEY: &str = "user_attributes";
pub const BUDGETS_ATTRIBUTES_KEY: &str = "budgets_attributes";
pub const POSTS_ATTRIBUTES_KEY: &str = "posts_attributes";
pub const REWARDS_ATTRIBUTES_KEY: &str = "rewards_attributes";
pub const SHIPPING_FEES_ATTRIBUTES_KEY: &str = "shipping_fees_attributes";
pub const GOALS_ATTRIBUTES_KEY: &str = "goals_attributes";
pub const INTEGRATIONS_ATTRIBUTES_KEY: &str = "integrations_attributes";

/// How much of the project a viewer may write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeRole {
    /// Full writable set, nothing denied
    Admin,
    /// Full writable set minus [`EDITOR_DENIED_ATTRIBUTES`]
    Editor,
    /// Fixed public subset
    Public,
}

pub fn budgets_attributes() -> PermittedAttribute {
    PermittedAttribute::nested_keys(BUDGETS_ATTRIBUTES_KEY, &["id", "name", "value", DESTROY_FLAG])
}

pub fn posts_attributes() -> PermittedAttribute {
    PermittedAttribute::nested_keys(
        POSTS_ATTRIBUTES_KEY,
        &[DESTROY_FLAG, "title", "comment_html", "exclusive", "id"],
    )
}

pub fn goals_attributes() -> PermittedAttribute {
    PermittedAttribute::nested_keys(
        GOALS_ATTRIBUTES_KEY,
        &[DESTROY_FLAG, "id", "value", "description", "title"],
    )
}

pub fn integrations_attributes() -> PermittedAttribute {
    PermittedAttribute::nested(
        INTEGRATIONS_ATTRIBUTES_KEY,
        vec![
            PermittedAttribute::key(DESTROY_FLAG),
            PermittedAttribute::key("name"),
            PermittedAttribute::key("id"),
            PermittedAttribute::nested_keys("data", &["name"]),
        ],
    )
}

/// Reward group; `deliver_at` is frozen once funding has closed.
pub fn rewards_attributes(state: ProjectState) -> PermittedAttribute {
    let mut keys = vec![
        DESTROY_FLAG,
        "id",
        "maximum_contributions",
        "description",
        "deliver_at",
        "minimum_value",
        "title",
        "shipping_options",
    ];
    if state.is_funding_closed() {
        keys.retain(|key| *key != "deliver_at");
    }

    let mut attributes: Vec<PermittedAttribute> =
        keys.into_iter().map(PermittedAttribute::key).collect();
    attributes.push(PermittedAttribute::nested_keys(
        SHIPPING_FEES_ATTRIBUTES_KEY,
        &[DESTROY_FLAG, "id", "value", "destination"],
    ));

    PermittedAttribute::nested(REWARDS_ATTRIBUTES_KEY, attributes)
}

pub struct ProjectAttributeFilter {
    user_policy: Arc<dyn NestedPolicyComposer>,
    service_fee_rule: ServiceFeeRule,
    require_ownership: bool,
}

impl ProjectAttributeFilter {
    pub fn new(user_policy: Arc<dyn NestedPolicyComposer>) -> Self {
        Self {
            user_policy,
            service_fee_rule: ServiceFeeRule::default(),
            require_ownership: true,
        }
    }

    pub fn from_config(spec: &PolicyConfigSpec, user_policy: Arc<dyn NestedPolicyComposer>) -> Self {
        Self {
            user_policy,
            service_fee_rule: ServiceFeeRule::new(spec.service_fee.clone()),
            require_ownership: spec.attributes.require_ownership,
        }
    }

    pub fn with_service_fee_rule(mut self, rule: ServiceFeeRule) -> Self {
        self.service_fee_rule = rule;
        self
    }

    /// When disabled, any signed-in viewer is an editor of draft/rejected projects.
    pub fn with_require_ownership(mut self, require_ownership: bool) -> Self {
        self.require_ownership = require_ownership;
        self
    }

    pub fn role(&self, viewer: Option<&Viewer>, project: &Project) -> AttributeRole {
        match viewer {
            Some(v) if v.is_admin => AttributeRole::Admin,
            Some(v) if project.state.is_editable() && (!self.require_ownership || v.owns(project)) => {
                AttributeRole::Editor
            }
            _ => AttributeRole::Public,
        }
    }

    pub fn permitted_attributes(
        &self,
        viewer: Option<&Viewer>,
        project: &Project,
        params: &SubmittedParams,
    ) -> Vec<PermittedAttribute> {
        let role = self.role(viewer, project);

        let mut permitted = match role {
            AttributeRole::Admin => self.full_set(viewer, project),
            AttributeRole::Editor => self.full_set(viewer, project).difference(EDITOR_DENIED_ATTRIBUTES),
            AttributeRole::Public => self.public_set(viewer, project),
        };

        if role != AttributeRole::Public {
            permitted.extend(self.service_fee_rule.allow_conditionally(project, params));
        }

        debug!(
            project_id = %project.id,
            viewer_id = ?viewer.map(|v| v.id.to_string()),
            state = %project.state,
            ?role,
            count = permitted.len(),
            "computed permitted project attributes"
        );

        permitted.into_vec()
    }

    fn full_set(&self, viewer: Option<&Viewer>, project: &Project) -> AttributeSet {
        let mut set: AttributeSet = project
            .attribute_names
            .iter()
            .map(PermittedAttribute::key)
            .collect();

        set.extend([
            PermittedAttribute::key("all_tags"),
            PermittedAttribute::key("all_public_tags"),
            self.user_attributes(viewer, project),
            budgets_attributes(),
            posts_attributes(),
            rewards_attributes(project.state),
            goals_attributes(),
            integrations_attributes(),
            PermittedAttribute::key("content_rating"),
        ]);
        set
    }

    fn public_set(&self, viewer: Option<&Viewer>, project: &Project) -> AttributeSet {
        let mut set: AttributeSet = PUBLIC_ATTRIBUTES
            .iter()
            .map(|key| PermittedAttribute::key(*key))
            .collect();

        // goals are not writable outside the full set
        set.extend([
            self.user_attributes(viewer, project),
            posts_attributes(),
            budgets_attributes(),
            rewards_attributes(project.state),
            integrations_attributes(),
        ]);
        set
    }

    fn user_attributes(&self, viewer: Option<&Viewer>, project: &Project) -> PermittedAttribute {
        PermittedAttribute::nested(
            USER_ATTRIBUTES_KEY,
            self.user_policy.permitted_attributes(viewer, &project.owner),
        )
    }
}

impl Default for ProjectAttributeFilter {
    fn default() -> Self {
        Self::new(Arc::new(UserPolicy::new()))
    }
}
