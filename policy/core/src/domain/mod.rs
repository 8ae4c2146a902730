// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Provides the project policy domain model.
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Snapshots, policies, scopes and validators

pub mod project;
pub mod viewer;
pub mod params;
pub mod attributes;
pub mod policy;
pub mod conditional;
pub mod user_policy;
pub mod permitted_attributes;
pub mod scope;
pub mod validation;
pub mod policy_config;
