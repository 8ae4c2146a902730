// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Policy evaluation commands
//!
//! Commands: authorize, attributes, scope, validate
//!
//! Every command reads one request file (YAML or JSON) and prints its result
//! as JSON on stdout.

use anyhow::{Context, Result};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

use crowdfund_policy::application::authorization::{sanitize, ProjectAuthorizationService};
use crowdfund_policy::application::validation_service::ProjectValidationService;
use crowdfund_policy::domain::params::SubmittedParams;
use crowdfund_policy::domain::policy::ProjectAction;
use crowdfund_policy::domain::policy_config::PolicyConfigManifest;
use crowdfund_policy::domain::project::{Project, UserId};
use crowdfund_policy::domain::scope::ProjectScope;
use crowdfund_policy::domain::user_policy::UserPolicy;
use crowdfund_policy::domain::viewer::Viewer;

/// Request file shared by all evaluation commands
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// Acting viewer; omit for anonymous requests
    #[serde(default)]
    pub viewer: Option<Viewer>,

    /// Project under evaluation (authorize, attributes, validate)
    #[serde(default)]
    pub project: Option<Project>,

    /// Submitted attribute changes (attributes)
    #[serde(default)]
    pub params: SubmittedParams,

    /// User whose projects are being listed (scope)
    #[serde(default)]
    pub scope_owner: Option<UserId>,

    /// Projects to filter (scope)
    #[serde(default)]
    pub candidates: Vec<Project>,
}

impl EvaluationRequest {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(path = ?path, "loading evaluation request");
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read request file {:?}", path))?;
        Self::from_yaml_str(&content).with_context(|| format!("Failed to parse request file {:?}", path))
    }

    /// JSON is accepted as a subset of YAML.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    fn project(&self) -> Result<&Project> {
        self.project
            .as_ref()
            .context("Request file has no `project` entry")
    }
}

fn authorization_service(config: &PolicyConfigManifest) -> ProjectAuthorizationService {
    ProjectAuthorizationService::from_config(&config.spec, Arc::new(UserPolicy::new()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn authorize(config: &PolicyConfigManifest, action: ProjectAction, request: &Path) -> Result<()> {
    let request = EvaluationRequest::from_file(request)?;
    let project = request.project()?;

    let outcome = authorization_service(config).authorize(request.viewer.as_ref(), project, action);
    let allowed = outcome.is_ok();

    print_json(&json!({
        "action": action,
        "allowed": allowed,
        "reason": outcome.err().map(|e| e.to_string()),
    }))?;

    if !allowed {
        eprintln!("{}", format!("✗ {} refused", action).red());
    }
    Ok(())
}

pub fn attributes(config: &PolicyConfigManifest, request: &Path, sanitize_params: bool) -> Result<()> {
    let request = EvaluationRequest::from_file(request)?;
    let project = request.project()?;
    let service = authorization_service(config);

    let permitted = service.permitted_attributes(request.viewer.as_ref(), project, &request.params);
    if sanitize_params {
        print_json(&sanitize(&request.params, &permitted))
    } else {
        print_json(&permitted)
    }
}

pub fn scope(request: &Path) -> Result<()> {
    let request = EvaluationRequest::from_file(request)?;
    let scope = ProjectScope::new(request.viewer.as_ref(), request.scope_owner);
    let visible = scope.resolve_refs(&request.candidates);

    print_json(&json!({
        "excluded_states": scope.excluded_states(),
        "visible": visible.iter().map(|p| json!({ "id": p.id, "state": p.state })).collect::<Vec<_>>(),
    }))
}

pub fn validate(config: &PolicyConfigManifest, request: &Path, publishing: bool) -> Result<()> {
    let request = EvaluationRequest::from_file(request)?;
    let project = request.project()?;

    let errors = ProjectValidationService::from_config(&config.spec).validate(project, publishing);
    print_json(&errors)?;

    if errors.is_empty() {
        eprintln!("{}", "✓ Project is valid".green());
        Ok(())
    } else {
        anyhow::bail!("Project has {} validation error(s): {}", errors.len(), errors)
    }
}
