// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! # Conditional Capability Grants
//!
//! Some attributes are normally denied to project owners but may be submitted
//! under narrow conditions. Today there is one such grant: an owner may set
//! `service_fee` on a draft project that carries the solidarity integration,
//! provided the fee falls inside the accepted bounds.
//!
//! ## Evaluation
//!
//! [`ServiceFeeRule::allow_conditionally`] grants the `service_fee` key iff all hold:
//! 1. `service_fee` was submitted and is not blank
//! 2. an integration with the configured name is submitted or already attached
//!    (submitted integrations are searched first)
//! 3. the project is in the configured state (draft)
//! 4. `min <= fee <= max`, after lenient float coercion
//!
//! A failed condition yields `None`, never an error.

use tracing::debug;

use crate::domain::attributes::PermittedAttribute;
use crate::domain::params::{coerce_f64, SubmittedParams, SERVICE_FEE_KEY};
use crate::domain::policy_config::ServiceFeeRuleConfig;
use crate::domain::project::{Integration, Project};

/// Find an integration by exact name; the first match wins.
pub fn find_integration<'a>(integrations: &'a [Integration], name: &str) -> Option<&'a Integration> {
    integrations.iter().find(|integration| integration.name == name)
}

#[derive(Debug, Clone, Default)]
pub struct ServiceFeeRule {
    config: ServiceFeeRuleConfig,
}

impl ServiceFeeRule {
    pub fn new(config: ServiceFeeRuleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ServiceFeeRuleConfig {
        &self.config
    }

    pub fn allow_conditionally(
        &self,
        project: &Project,
        params: &SubmittedParams,
    ) -> Option<PermittedAttribute> {
        let fee = params.service_fee()?;

        if project.state != self.config.state {
            debug!(
                project_id = %project.id,
                state = %project.state,
                "service fee override ignored: project state does not allow it"
            );
            return None;
        }

        if !self.has_solidarity_integration(project, params) {
            debug!(
                project_id = %project.id,
                integration = %self.config.integration_name,
                "service fee override ignored: integration not present"
            );
            return None;
        }

        let fee = coerce_f64(fee);
        if fee < self.config.min || fee > self.config.max {
            debug!(
                project_id = %project.id,
                fee,
                min = self.config.min,
                max = self.config.max,
                "service fee override ignored: fee out of bounds"
            );
            return None;
        }

        debug!(project_id = %project.id, fee, "service fee override granted");
        Some(PermittedAttribute::key(SERVICE_FEE_KEY))
    }

    fn has_solidarity_integration(&self, project: &Project, params: &SubmittedParams) -> bool {
        let name = self.config.integration_name.as_str();
        let submitted = params.integrations().unwrap_or_default();

        find_integration(&submitted, name)
            .or_else(|| find_integration(&project.integrations, name))
            .is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::project::{ProjectState, UserId, UserRecord};
    use serde_json::json;

    fn project(state: ProjectState, integrations: Vec<Integration>) -> Project {
        Project::new(UserRecord::new(UserId::new()), state).with_integrations(integrations)
    }

    fn fee_params(fee: serde_json::Value) -> SubmittedParams {
        SubmittedParams::from_value(json!({ "service_fee": fee }))
    }

    fn solidarity() -> Vec<Integration> {
        vec![Integration::named("SOLIDARITY_SERVICE_FEE")]
    }

    #[test]
    fn test_grants_inside_bounds_inclusive() {
        let rule = ServiceFeeRule::default();
        let draft = project(ProjectState::Draft, solidarity());

        for fee in [json!(0.04), json!(0.1), json!(0.20), json!("0.2")] {
            assert_eq!(
                rule.allow_conditionally(&draft, &fee_params(fee.clone())),
                Some(PermittedAttribute::key("service_fee")),
                "fee {fee} should be accepted"
            );
        }
    }

    #[test]
    fn test_rejects_outside_bounds() {
        let rule = ServiceFeeRule::default();
        let draft = project(ProjectState::Draft, solidarity());

        for fee in [json!(0.039), json!(0.21), json!("abc"), json!(0)] {
            assert!(rule.allow_conditionally(&draft, &fee_params(fee)).is_none());
        }
    }

    #[test]
    fn test_requires_submitted_fee() {
        let rule = ServiceFeeRule::default();
        let draft = project(ProjectState::Draft, solidarity());
        assert!(rule.allow_conditionally(&draft, &SubmittedParams::new()).is_none());
        assert!(rule.allow_conditionally(&draft, &fee_params(json!(""))).is_none());
    }

    #[test]
    fn test_requires_draft_state() {
        let rule = ServiceFeeRule::default();
        for state in ProjectState::ALL.into_iter().filter(|s| *s != ProjectState::Draft) {
            let p = project(state, solidarity());
            assert!(rule.allow_conditionally(&p, &fee_params(json!(0.1))).is_none());
        }
    }

    #[test]
    fn test_requires_solidarity_integration() {
        let rule = ServiceFeeRule::default();
        let p = project(ProjectState::Draft, vec![Integration::named("GA")]);
        assert!(rule.allow_conditionally(&p, &fee_params(json!(0.1))).is_none());
    }

    #[test]
    fn test_submitted_integration_counts() {
        let rule = ServiceFeeRule::default();
        let p = project(ProjectState::Draft, vec![]);
        let params = SubmittedParams::from_value(json!({
            "service_fee": "0.1",
            "integrations_attributes": [{ "name": "SOLIDARITY_SERVICE_FEE", "data": { "name": "ONG" } }]
        }));
        assert!(rule.allow_conditionally(&p, &params).is_some());
    }

    #[test]
    fn test_persisted_integration_found_when_params_list_other_names() {
        let rule = ServiceFeeRule::default();
        let p = project(ProjectState::Draft, solidarity());
        let params = SubmittedParams::from_value(json!({
            "service_fee": 0.1,
            "integrations_attributes": [{ "name": "GA" }]
        }));
        assert!(rule.allow_conditionally(&p, &params).is_some());
    }

    #[test]
    fn test_custom_bounds() {
        let rule = ServiceFeeRule::new(ServiceFeeRuleConfig {
            min: 0.01,
            max: 0.05,
            ..ServiceFeeRuleConfig::default()
        });
        let draft = project(ProjectState::Draft, solidarity());
        assert!(rule.allow_conditionally(&draft, &fee_params(json!(0.02))).is_some());
        assert!(rule.allow_conditionally(&draft, &fee_params(json!(0.1))).is_none());
    }

    #[test]
    fn test_find_integration_first_match() {
        let mut first = Integration::named("SOLIDARITY_SERVICE_FEE");
        first.data.insert("name".to_string(), "first".to_string());
        let mut second = Integration::named("SOLIDARITY_SERVICE_FEE");
        second.data.insert("name".to_string(), "second".to_string());
        let list = vec![Integration::named("GA"), first, second];

        let found = find_integration(&list, "SOLIDARITY_SERVICE_FEE").unwrap();
        assert_eq!(found.data.get("name").map(String::as_str), Some("first"));
        assert!(find_integration(&list, "solidarity_service_fee").is_none());
    }
}
