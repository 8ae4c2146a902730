// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Mod
//!
//! Application services composing the domain policies for callers.
//!
//! # Architecture
//!
//! - **Layer:** Application Layer
//! - **Purpose:** Entry points used by the request and persistence layers

pub mod authorization;
pub mod validation_service;
