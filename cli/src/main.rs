// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # cfpolicy
//!
//! Evaluates the crowdfund project policy against request files, for
//! debugging policy decisions and checking configuration changes.
//!
//! ## Commands
//!
//! - `cfpolicy authorize --action <ACTION> <REQUEST>` - Is the action allowed?
//! - `cfpolicy attributes [--sanitize] <REQUEST>` - Permitted attribute keys
//! - `cfpolicy scope <REQUEST>` - Projects visible to the viewer
//! - `cfpolicy validate [--publishing] <REQUEST>` - Record validation errors
//! - `cfpolicy config show|validate|generate` - Configuration management

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crowdfund_policy::domain::policy::ProjectAction;
use crowdfund_policy::domain::policy_config::PolicyConfigManifest;
use crowdfund_policy_cli::commands::{self, ConfigCommand};

/// Crowdfund project policy evaluator
#[derive(Parser)]
#[command(name = "cfpolicy")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (overrides discovery)
    #[arg(
        short,
        long,
        global = true,
        env = "CFPOLICY_CONFIG_PATH",
        value_name = "FILE"
    )]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "CFPOLICY_LOG_LEVEL", default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether the viewer may perform an action on the project
    Authorize {
        /// create, update, publish, publish_by_steps, validate_publish, push_to_online
        #[arg(short, long)]
        action: ProjectAction,

        /// Request file (YAML or JSON)
        #[arg(value_name = "REQUEST")]
        request: PathBuf,
    },

    /// Print the attribute keys the viewer may submit
    Attributes {
        /// Print the request params reduced to the permitted keys instead
        #[arg(long)]
        sanitize: bool,

        #[arg(value_name = "REQUEST")]
        request: PathBuf,
    },

    /// Print the candidate projects visible to the viewer
    Scope {
        #[arg(value_name = "REQUEST")]
        request: PathBuf,
    },

    /// Run the record validators against the request's project
    Validate {
        /// Validate as if the project were being published
        #[arg(long)]
        publishing: bool,

        #[arg(value_name = "REQUEST")]
        request: PathBuf,
    },

    /// Configuration management
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.log_level)?;

    match cli.command {
        Commands::Config { command } => commands::config::handle_command(command, cli.config),
        Commands::Authorize { action, request } => {
            commands::evaluate::authorize(&load_config(cli.config)?, action, &request)
        }
        Commands::Attributes { sanitize, request } => {
            commands::evaluate::attributes(&load_config(cli.config)?, &request, sanitize)
        }
        Commands::Scope { request } => commands::evaluate::scope(&request),
        Commands::Validate { publishing, request } => {
            commands::evaluate::validate(&load_config(cli.config)?, &request, publishing)
        }
    }
}

fn load_config(path: Option<PathBuf>) -> Result<PolicyConfigManifest> {
    let config = PolicyConfigManifest::load_or_default(path)
        .context("Failed to load policy configuration")?;
    config
        .validate()
        .context("Policy configuration is invalid")?;
    Ok(config)
}

/// Initialize tracing subscriber for logging
fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(level))
        .context("Failed to create log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    Ok(())
}
