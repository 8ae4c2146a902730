// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Configuration management commands
//!
//! Commands: show, validate, generate

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::Colorize;
use std::path::PathBuf;

use crowdfund_policy::domain::policy_config::PolicyConfigManifest;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Show config file paths checked
        #[arg(long)]
        paths: bool,
    },

    /// Validate configuration file
    Validate {
        /// Path to config file (default: discover)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Generate sample configuration
    Generate {
        /// Output path (default: ./cfpolicy-config.yaml)
        #[arg(short, long, default_value = "./cfpolicy-config.yaml")]
        output: PathBuf,
    },
}

pub fn handle_command(command: ConfigCommand, config_override: Option<PathBuf>) -> Result<()> {
    match command {
        ConfigCommand::Show { paths } => show(config_override, paths),
        ConfigCommand::Validate { file } => validate(file.or(config_override)),
        ConfigCommand::Generate { output } => generate(output),
    }
}

fn show(config_override: Option<PathBuf>, show_paths: bool) -> Result<()> {
    let config = PolicyConfigManifest::load_or_default(config_override.clone())
        .context("Failed to load configuration")?;

    if show_paths {
        println!("{}", "Configuration discovery paths:".bold());
        if let Some(path) = &config_override {
            println!("  1. --config flag: {}", path.display());
        } else {
            println!("  1. --config flag: {}", "(not set)".dimmed());
        }
        for (index, path) in PolicyConfigManifest::candidate_paths().iter().enumerate() {
            let found = if path.is_file() { "found".green() } else { "missing".dimmed() };
            println!("  {}. {} ({})", index + 2, path.display(), found);
        }
        println!();
    }

    println!("{}", "Current configuration:".bold());
    println!("  Name: {}", config.metadata.name);
    println!();

    let fee = &config.spec.service_fee;
    println!("{}", "Service fee override:".bold());
    println!("  Integration: {}", fee.integration_name);
    println!("  Accepted range: [{}, {}]", fee.min, fee.max);
    println!("  Project state: {}", fee.state);
    println!();

    println!("{}", "Validation:".bold());
    println!("  Max public tags: {}", config.spec.tags.max_public_tags);
    println!("  Reserved routes: {}", config.spec.routes.reserved.len());
    for route in &config.spec.routes.reserved {
        println!("    - {}", route);
    }
    println!();

    println!("{}", "Attributes:".bold());
    println!(
        "  Draft editing requires ownership: {}",
        config.spec.attributes.require_ownership
    );

    Ok(())
}

fn validate(config_path: Option<PathBuf>) -> Result<()> {
    println!("Validating configuration...");

    let config = PolicyConfigManifest::load_or_default(config_path)
        .context("Failed to load configuration")?;

    config
        .validate()
        .context("Configuration validation failed")?;

    println!("{}", "✓ Configuration is valid".green());

    Ok(())
}

fn generate(output: PathBuf) -> Result<()> {
    let sample = include_str!("../../templates/policy-config.yaml");

    std::fs::write(&output, sample)
        .with_context(|| format!("Failed to write config to {:?}", output))?;

    println!(
        "{}",
        format!("✓ Configuration generated: {}", output.display()).green()
    );

    Ok(())
}
