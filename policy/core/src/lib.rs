// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Crowdfund Policy
//!
//! Authorization and field-level mutation policy for crowdfunding projects.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Pure policy evaluation over read-only project snapshots

pub mod domain;
pub mod application;

pub use domain::*;
