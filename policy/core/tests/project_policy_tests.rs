// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use std::sync::Arc;

use crowdfund_policy::application::authorization::ProjectAuthorizationService;
use crowdfund_policy::application::validation_service::ProjectValidationService;
use crowdfund_policy::domain::attributes::{find, PermittedAttribute};
use crowdfund_policy::domain::conditional::ServiceFeeRule;
use crowdfund_policy::domain::params::SubmittedParams;
use crowdfund_policy::domain::permitted_attributes::{
    ProjectAttributeFilter, EDITOR_DENIED_ATTRIBUTES, PUBLIC_ATTRIBUTES, REWARDS_ATTRIBUTES_KEY,
};
use crowdfund_policy::domain::policy::{ProjectAction, ProjectPolicy};
use crowdfund_policy::domain::policy_config::PolicyConfigManifest;
use crowdfund_policy::domain::project::{Integration, Project, ProjectState, Reward, UserId, UserRecord};
use crowdfund_policy::domain::scope::ProjectScope;
use crowdfund_policy::domain::user_policy::UserPolicy;
use crowdfund_policy::domain::validation::{PermalinkValidator, ReservedRoutes};
use crowdfund_policy::domain::viewer::Viewer;
use serde_json::json;

const COLUMNS: &[&str] = &[
    "id",
    "name",
    "permalink",
    "goal",
    "headline",
    "about_html",
    "state",
    "service_fee",
    "audited_user_name",
    "audited_user_cpf",
    "audited_user_phone_number",
    "origin_id",
    "total_installments",
    "recommended",
    "created_at",
    "updated_at",
    "expires_at",
    "content_rating",
];

fn owner_record() -> UserRecord {
    UserRecord {
        id: UserId::new(),
        attribute_names: vec!["id".into(), "name".into(), "public_name".into(), "admin".into()],
    }
}

fn project(state: ProjectState) -> Project {
    Project::new(owner_record(), state).with_attribute_names(COLUMNS.iter().copied())
}

fn scalar_names(attrs: &[PermittedAttribute]) -> Vec<&str> {
    attrs
        .iter()
        .filter(|a| !a.is_nested())
        .map(|a| a.name())
        .collect()
}

#[test]
fn test_non_owner_viewers_get_public_subset_in_every_state() {
    let filter = ProjectAttributeFilter::default();
    let stranger = Viewer::new(UserId::new());

    for state in ProjectState::ALL {
        let project = project(state);
        for viewer in [Some(&stranger), None] {
            let attrs = filter.permitted_attributes(viewer, &project, &SubmittedParams::new());
            assert_eq!(scalar_names(&attrs), PUBLIC_ATTRIBUTES.to_vec(), "state {state}");
            assert!(find(&attrs, "goals_attributes").is_none());
        }
    }
}

#[test]
fn test_deleted_projects_cannot_be_updated() {
    let project = project(ProjectState::Deleted);
    let owner = Viewer::new(project.owner_id());
    let admin = Viewer::admin(UserId::new());

    assert!(!ProjectPolicy::new(Some(&owner), &project).update());
    assert!(!ProjectPolicy::new(Some(&admin), &project).update());
}

#[test]
fn test_admins_keep_every_denied_column() {
    let filter = ProjectAttributeFilter::default();
    let admin = Viewer::admin(UserId::new());

    for state in ProjectState::ALL {
        let attrs = filter.permitted_attributes(Some(&admin), &project(state), &SubmittedParams::new());
        for key in EDITOR_DENIED_ATTRIBUTES {
            assert!(find(&attrs, key).is_some(), "admin lost {key} in {state}");
        }
    }
}

#[test]
fn test_owners_of_drafts_lose_denied_columns() {
    let filter = ProjectAttributeFilter::default();
    for state in [ProjectState::Draft, ProjectState::Rejected] {
        let project = project(state);
        let owner = Viewer::new(project.owner_id());
        let attrs = filter.permitted_attributes(Some(&owner), &project, &SubmittedParams::new());
        for key in EDITOR_DENIED_ATTRIBUTES {
            assert!(find(&attrs, key).is_none(), "owner kept {key} in {state}");
        }
        // owner sees their own user columns except admin-only ones
        let user = find(&attrs, "user_attributes").unwrap();
        let user_keys: Vec<&str> = user.children().iter().map(|a| a.name()).collect();
        assert_eq!(user_keys, vec!["name", "public_name"]);
    }
}

#[test]
fn test_reward_deliver_at_follows_funding_state() {
    let filter = ProjectAttributeFilter::default();
    let admin = Viewer::admin(UserId::new());
    let stranger = Viewer::new(UserId::new());

    for state in ProjectState::ALL {
        let project = project(state);
        for viewer in [Some(&admin), Some(&stranger), None] {
            let attrs = filter.permitted_attributes(viewer, &project, &SubmittedParams::new());
            let rewards = find(&attrs, REWARDS_ATTRIBUTES_KEY).unwrap();
            let closed = matches!(
                state,
                ProjectState::WaitingFunds | ProjectState::Failed | ProjectState::Successful
            );
            assert_eq!(find(rewards.children(), "deliver_at").is_none(), closed, "state {state}");
        }
    }
}

#[test]
fn test_service_fee_override_boundaries() {
    let rule = ServiceFeeRule::default();
    let with_integration = |state| {
        Project::new(owner_record(), state)
            .with_integrations(vec![Integration::named("SOLIDARITY_SERVICE_FEE")])
    };
    let fee = |value: serde_json::Value| SubmittedParams::from_value(json!({ "service_fee": value }));

    let draft = with_integration(ProjectState::Draft);
    assert!(rule.allow_conditionally(&draft, &fee(json!(0.04))).is_some());
    assert!(rule.allow_conditionally(&draft, &fee(json!(0.20))).is_some());
    assert!(rule.allow_conditionally(&draft, &fee(json!(0.039))).is_none());
    assert!(rule.allow_conditionally(&draft, &fee(json!(0.21))).is_none());

    let online = with_integration(ProjectState::Online);
    assert!(rule.allow_conditionally(&online, &fee(json!(0.1))).is_none());

    let bare = Project::new(owner_record(), ProjectState::Draft);
    assert!(rule.allow_conditionally(&bare, &fee(json!(0.1))).is_none());
}

#[test]
fn test_reserved_permalinks() {
    let routes: ReservedRoutes = PolicyConfigManifest::default()
        .spec
        .routes
        .reserved
        .into_iter()
        .collect();
    assert!(PermalinkValidator::is_reserved("projects", &routes));
    assert!(!PermalinkValidator::is_reserved("permalink_test", &routes));
}

#[test]
fn test_record_validation_at_publish_time() {
    let service = ProjectValidationService::default();
    let reward = Reward {
        id: 1,
        title: Some("Zine".to_string()),
        description: "Printed zine".to_string(),
        minimum_value: 25.0,
        maximum_contributions: None,
        deliver_at: None,
        shipping_options: None,
        shipping_fees: vec![],
    };

    let empty = project(ProjectState::Draft);
    assert!(service.validate(&empty, true).contains("rewards.size"));

    let stocked = project(ProjectState::Draft)
        .with_rewards(vec![reward])
        .with_public_tags("1,2,3,4,5");
    assert!(service.validate(&stocked, true).is_empty());

    let overtagged = stocked.clone().with_public_tags("1,2,3,4,5,6");
    assert!(service.validate(&overtagged, true).contains("public_tags"));
}

#[test]
fn test_scope_visibility_by_viewer() {
    let owner = UserId::new();
    let candidates: Vec<Project> = ProjectState::ALL
        .into_iter()
        .map(|state| Project::new(UserRecord::new(owner), state))
        .collect();

    let for_owner = ProjectScope::new(Some(&Viewer::new(owner)), Some(owner)).resolve(candidates.clone());
    assert!(for_owner.iter().all(|p| p.state != ProjectState::Deleted));
    assert_eq!(for_owner.len(), candidates.len() - 1);

    let for_admin = ProjectScope::new(Some(&Viewer::admin(UserId::new())), Some(owner)).resolve(candidates.clone());
    assert_eq!(for_admin.len(), candidates.len() - 1);

    let for_public = ProjectScope::new(Some(&Viewer::new(UserId::new())), Some(owner)).resolve(candidates.clone());
    assert_eq!(for_public.len(), candidates.len() - 3);
}

#[test]
fn test_authorize_then_permit_flow_from_config() {
    let yaml = r#"
apiVersion: crowdfund.policy/v1
kind: PolicyConfig
metadata:
  name: test
spec:
  service_fee:
    min: 0.05
    max: 0.10
"#;
    let config = PolicyConfigManifest::from_yaml_str(yaml).unwrap();
    config.validate().unwrap();
    let service = ProjectAuthorizationService::from_config(&config.spec, Arc::new(UserPolicy::new()));

    let project = project(ProjectState::Draft)
        .with_integrations(vec![Integration::named("SOLIDARITY_SERVICE_FEE")]);
    let owner = Viewer::new(project.owner_id());

    assert!(service.can(Some(&owner), &project, ProjectAction::ValidatePublish));

    let params = SubmittedParams::from_value(json!({
        "name": "Library",
        "service_fee": "0.12",
        "recommended": true
    }));
    let clean = service.permit(Some(&owner), &project, &params).unwrap();
    assert_eq!(clean.into_value(), json!({ "name": "Library" }));

    let params = SubmittedParams::from_value(json!({ "service_fee": "0.07" }));
    let clean = service.permit(Some(&owner), &project, &params).unwrap();
    assert_eq!(clean.into_value(), json!({ "service_fee": "0.07" }));
}

#[test]
fn test_owner_cannot_write_payment_account_through_user_attributes() {
    let owner = UserRecord {
        id: UserId::new(),
        attribute_names: vec!["id".into(), "name".into(), "moip_login".into(), "zero_credits".into()],
    };
    let project = Project::new(owner, ProjectState::Draft).with_attribute_names(COLUMNS.iter().copied());
    let viewer = Viewer::new(project.owner_id());

    let params = SubmittedParams::from_value(json!({
        "user_attributes": { "name": "Ana", "moip_login": "attacker@example.com", "zero_credits": true }
    }));
    let clean = ProjectAuthorizationService::default()
        .permit(Some(&viewer), &project, &params)
        .unwrap();
    assert_eq!(clean.into_value(), json!({ "user_attributes": { "name": "Ana" } }));
}
