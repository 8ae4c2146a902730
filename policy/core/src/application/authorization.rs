// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Project Authorization Service
//!
//! Entry point for the request layer. Combines the action policy with the
//! attribute filter:
//!
//! 1. [`ProjectAuthorizationService::authorize`] turns a refused action into an
//!    [`AuthorizationError`] the caller maps to a forbidden response.
//! 2. [`ProjectAuthorizationService::permit`] authorizes `update` and returns the
//!    submitted params reduced to the permitted keys.
//!
//! Rejected attribute keys are dropped silently; they are never reported back
//! to the submitter.

use std::sync::Arc;

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::domain::attributes::{find, PermittedAttribute};
use crate::domain::params::SubmittedParams;
use crate::domain::permitted_attributes::ProjectAttributeFilter;
use crate::domain::policy::{ProjectAction, ProjectPolicy};
use crate::domain::policy_config::PolicyConfigSpec;
use crate::domain::project::{Project, ProjectId, UserId};
use crate::domain::user_policy::NestedPolicyComposer;
use crate::domain::viewer::Viewer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthorizationError {
    #[error("Anonymous viewers may not {action} project {project_id}")]
    Unauthenticated {
        action: ProjectAction,
        project_id: ProjectId,
    },

    #[error("Viewer {viewer_id} may not {action} project {project_id}")]
    Forbidden {
        viewer_id: UserId,
        action: ProjectAction,
        project_id: ProjectId,
    },
}

#[derive(Default)]
pub struct ProjectAuthorizationService {
    attribute_filter: ProjectAttributeFilter,
}

impl ProjectAuthorizationService {
    pub fn new(attribute_filter: ProjectAttributeFilter) -> Self {
        Self { attribute_filter }
    }

    pub fn from_config(spec: &PolicyConfigSpec, user_policy: Arc<dyn NestedPolicyComposer>) -> Self {
        Self::new(ProjectAttributeFilter::from_config(spec, user_policy))
    }

    pub fn attribute_filter(&self) -> &ProjectAttributeFilter {
        &self.attribute_filter
    }

    pub fn can(&self, viewer: Option<&Viewer>, project: &Project, action: ProjectAction) -> bool {
        ProjectPolicy::new(viewer, project).permits(action)
    }

    pub fn authorize(
        &self,
        viewer: Option<&Viewer>,
        project: &Project,
        action: ProjectAction,
    ) -> Result<(), AuthorizationError> {
        if self.can(viewer, project, action) {
            debug!(project_id = %project.id, %action, "action authorized");
            return Ok(());
        }

        warn!(
            project_id = %project.id,
            viewer_id = ?viewer.map(|v| v.id.to_string()),
            %action,
            state = %project.state,
            "project action refused"
        );

        Err(match viewer {
            Some(v) => AuthorizationError::Forbidden {
                viewer_id: v.id,
                action,
                project_id: project.id,
            },
            None => AuthorizationError::Unauthenticated {
                action,
                project_id: project.id,
            },
        })
    }

    pub fn permitted_attributes(
        &self,
        viewer: Option<&Viewer>,
        project: &Project,
        params: &SubmittedParams,
    ) -> Vec<PermittedAttribute> {
        self.attribute_filter.permitted_attributes(viewer, project, params)
    }

    /// Authorize `update` and reduce `params` to what the viewer may write.
    pub fn permit(
        &self,
        viewer: Option<&Viewer>,
        project: &Project,
        params: &SubmittedParams,
    ) -> Result<SubmittedParams, AuthorizationError> {
        self.authorize(viewer, project, ProjectAction::Update)?;
        let permitted = self.permitted_attributes(viewer, project, params);
        Ok(sanitize(params, &permitted))
    }
}

/// Keep only the whitelisted keys of `params`, recursing into nested groups.
///
/// Plain keys accept scalar values only. Nested groups accept an array of
/// objects, an index-keyed object (`{"0": {...}}`), or a single object.
pub fn sanitize(params: &SubmittedParams, permitted: &[PermittedAttribute]) -> SubmittedParams {
    SubmittedParams::from(filter_object(params.as_map(), permitted))
}

fn filter_object(object: &Map<String, Value>, permitted: &[PermittedAttribute]) -> Map<String, Value> {
    let mut kept = Map::new();
    for (key, value) in object {
        let filtered = match find(permitted, key) {
            Some(PermittedAttribute::Key(_)) if is_scalar(value) => Some(value.clone()),
            Some(PermittedAttribute::Nested { attributes, .. }) => filter_nested(value, attributes),
            _ => None,
        };

        match filtered {
            Some(value) => {
                kept.insert(key.clone(), value);
            }
            None => debug!(key = %key, "dropping unpermitted attribute"),
        }
    }
    kept
}

fn filter_nested(value: &Value, permitted: &[PermittedAttribute]) -> Option<Value> {
    match value {
        Value::Array(items) => Some(Value::Array(
            items
                .iter()
                .filter_map(Value::as_object)
                .map(|item| Value::Object(filter_object(item, permitted)))
                .collect(),
        )),
        Value::Object(map) if is_index_keyed(map) => Some(Value::Object(
            map.iter()
                .filter_map(|(index, item)| {
                    item.as_object()
                        .map(|item| (index.clone(), Value::Object(filter_object(item, permitted))))
                })
                .collect(),
        )),
        Value::Object(map) => Some(Value::Object(filter_object(map, permitted))),
        _ => None,
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

fn is_index_keyed(map: &Map<String, Value>) -> bool {
    !map.is_empty() && map.keys().all(|k| !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()))
}
