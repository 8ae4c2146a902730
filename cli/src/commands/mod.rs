// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Command implementations for the cfpolicy CLI

pub mod config;
pub mod evaluate;

pub use self::config::ConfigCommand;
pub use self::evaluate::EvaluationRequest;
