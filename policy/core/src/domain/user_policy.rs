// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! User Policy
//!
//! Permitted attributes for the project owner's user record, embedded into the
//! project's permitted set under `user_attributes`. The project attribute
//! filter depends on the [`NestedPolicyComposer`] trait rather than on
//! [`UserPolicy`] directly so the nested policy can be swapped out.

use crate::domain::attributes::PermittedAttribute;
use crate::domain::project::UserRecord;
use crate::domain::viewer::Viewer;

/// Computes the permitted attribute set for an embedded sub-resource.
pub trait NestedPolicyComposer: Send + Sync {
    fn permitted_attributes(&self, viewer: Option<&Viewer>, user: &UserRecord) -> Vec<PermittedAttribute>;
}

/// User columns only an admin may write
pub const ADMIN_ONLY_USER_ATTRIBUTES: &[&str] = &[
    "admin",
    "banned_at",
    "created_at",
    "id",
    "moip_login",
    "permalink",
    "updated_at",
    "zero_credits",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct UserPolicy;

impl UserPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl NestedPolicyComposer for UserPolicy {
    fn permitted_attributes(&self, viewer: Option<&Viewer>, user: &UserRecord) -> Vec<PermittedAttribute> {
        let Some(viewer) = viewer else {
            return Vec::new();
        };

        let names = user.attribute_names.iter();
        if viewer.is_admin {
            names.map(PermittedAttribute::key).collect()
        } else if viewer.id == user.id {
            names
                .filter(|name| !ADMIN_ONLY_USER_ATTRIBUTES.contains(&name.as_str()))
                .map(PermittedAttribute::key)
                .collect()
        } else {
            Vec::new()
        }
    }
}
