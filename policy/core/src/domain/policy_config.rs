// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Policy Configuration Types
//
// Defines the configuration schema for the project policy engine:
// - Kubernetes-style manifest format (apiVersion/kind/metadata/spec)
// - Service fee override rule (integration name and accepted fee bounds)
// - Public tag limit
// - Reserved top-level routes that permalinks must not shadow
// - Attribute filter privilege mode

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::domain::project::ProjectState;

pub const API_VERSION: &str = "crowdfund.policy/v1";
pub const KIND: &str = "PolicyConfig";
pub const CONFIG_PATH_ENV: &str = "CFPOLICY_CONFIG_PATH";

/// Top-level policy configuration manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyConfigManifest {
    /// API version (must be "crowdfund.policy/v1")
    #[serde(rename = "apiVersion")]
    pub api_version: String,

    /// Resource kind (must be "PolicyConfig")
    pub kind: String,

    pub metadata: ManifestMetadata,

    #[serde(default)]
    pub spec: PolicyConfigSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    pub name: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PolicyConfigSpec {
    #[serde(default)]
    pub service_fee: ServiceFeeRuleConfig,

    #[serde(default)]
    pub tags: TagConfig,

    #[serde(default)]
    pub routes: RoutesConfig,

    #[serde(default)]
    pub attributes: AttributeConfig,
}

/// Conditional grant of the `service_fee` attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceFeeRuleConfig {
    /// Integration that must be attached (or submitted) for the override
    #[serde(default = "default_integration_name")]
    pub integration_name: String,

    /// Lowest accepted fee, inclusive
    #[serde(default = "default_min_fee")]
    pub min: f64,

    /// Highest accepted fee, inclusive
    #[serde(default = "default_max_fee")]
    pub max: f64,

    /// The only state in which the override applies
    #[serde(default = "default_fee_state")]
    pub state: ProjectState,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagConfig {
    #[serde(default = "default_max_public_tags")]
    pub max_public_tags: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutesConfig {
    /// Top-level route segments already used by the application
    #[serde(default = "default_reserved_routes")]
    pub reserved: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeConfig {
    /// When true, the full writable key set on draft/rejected projects is
    /// limited to admins and the project owner. When false, any signed-in
    /// viewer qualifies on those states.
    ///
    /// `false` is the legacy state-only rule; `true` is the default.
    #[serde(default = "default_true")]
    pub require_ownership: bool,
}

fn default_true() -> bool {
    true
}

fn default_integration_name() -> String {
    "SOLIDARITY_SERVICE_FEE".to_string()
}

fn default_min_fee() -> f64 {
    0.04
}

fn default_max_fee() -> f64 {
    0.20
}

fn default_fee_state() -> ProjectState {
    ProjectState::Draft
}

fn default_max_public_tags() -> usize {
    5
}

fn default_reserved_routes() -> Vec<String> {
    [
        "about", "admin", "api", "assets", "auth", "auto_complete_projects", "contributions",
        "credits", "explore", "flexible_projects", "login", "logout", "notifications",
        "posts", "projects", "reports", "rewards", "sign_up", "start", "users",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for ServiceFeeRuleConfig {
    fn default() -> Self {
        Self {
            integration_name: default_integration_name(),
            min: default_min_fee(),
            max: default_max_fee(),
            state: default_fee_state(),
        }
    }
}

impl Default for TagConfig {
    fn default() -> Self {
        Self {
            max_public_tags: default_max_public_tags(),
        }
    }
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            reserved: default_reserved_routes(),
        }
    }
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            require_ownership: default_true(),
        }
    }
}

impl Default for PolicyConfigManifest {
    fn default() -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            kind: KIND.to_string(),
            metadata: ManifestMetadata {
                name: "default".to_string(),
                version: None,
                labels: None,
            },
            spec: PolicyConfigSpec::default(),
        }
    }
}

impl PolicyConfigManifest {
    /// Load configuration from YAML file
    pub fn from_yaml_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to YAML file
    pub fn to_yaml_file(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        Ok(())
    }

    /// Parse configuration from YAML string
    pub fn from_yaml_str(yaml: &str) -> anyhow::Result<Self> {
        let config = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Config file locations in precedence order, most specific first.
    ///
    /// `CFPOLICY_CONFIG_PATH` leads when set, then the working directory, the
    /// user's home, and the system-wide location.
    pub fn candidate_paths() -> Vec<PathBuf> {
        candidate_paths_from(std::env::var(CONFIG_PATH_ENV).ok(), dirs::home_dir())
    }

    /// First existing file among [`PolicyConfigManifest::candidate_paths`].
    pub fn discover_config() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|path| path.is_file())
    }

    /// Load `cli_path` if given, else the discovered file, else the defaults.
    /// Environment overrides apply on top in every case.
    pub fn load_or_default(cli_path: Option<PathBuf>) -> anyhow::Result<Self> {
        let source = match cli_path {
            Some(path) => Some((path, "explicit")),
            None => Self::discover_config().map(|path| (path, "discovered")),
        };

        let mut config = match source {
            Some((path, origin)) => {
                tracing::info!(path = ?path, origin, "loading policy configuration");
                Self::load_file(&path)?
            }
            None => {
                tracing::warn!("no policy configuration file found, using defaults");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    fn load_file(path: &Path) -> anyhow::Result<Self> {
        Self::from_yaml_file(path)
            .with_context(|| format!("Failed to load policy config at {:?}", path))
    }

    /// Apply environment variable overrides to configuration
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CFPOLICY_MAX_PUBLIC_TAGS") {
            match val.trim().parse::<usize>() {
                Ok(limit) => {
                    tracing::info!("Environment override: CFPOLICY_MAX_PUBLIC_TAGS={}", limit);
                    self.spec.tags.max_public_tags = limit;
                }
                Err(_) => {
                    tracing::warn!(
                        "Invalid value for CFPOLICY_MAX_PUBLIC_TAGS: '{}'. Expected a non-negative integer. Ignoring.",
                        val
                    );
                }
            }
        }

        if let Ok(val) = std::env::var("CFPOLICY_REQUIRE_OWNERSHIP") {
            match parse_flag(&val) {
                Some(flag) => {
                    tracing::info!("Environment override: CFPOLICY_REQUIRE_OWNERSHIP={}", flag);
                    self.spec.attributes.require_ownership = flag;
                }
                None => {
                    tracing::warn!(
                        "Invalid value for CFPOLICY_REQUIRE_OWNERSHIP: '{}'. Expected true/false. Ignoring.",
                        val
                    );
                }
            }
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_version != API_VERSION {
            anyhow::bail!(
                "Invalid apiVersion: '{}'. Must be '{}'",
                self.api_version,
                API_VERSION
            );
        }

        if self.kind != KIND {
            anyhow::bail!("Invalid kind: '{}'. Must be '{}'", self.kind, KIND);
        }

        if self.metadata.name.is_empty() {
            anyhow::bail!("metadata.name cannot be empty");
        }

        let fee = &self.spec.service_fee;
        if fee.integration_name.trim().is_empty() {
            anyhow::bail!("spec.service_fee.integration_name cannot be empty");
        }
        if !(fee.min.is_finite() && fee.max.is_finite()) || fee.min < 0.0 {
            anyhow::bail!(
                "spec.service_fee bounds must be finite and non-negative (min={}, max={})",
                fee.min,
                fee.max
            );
        }
        if fee.min > fee.max {
            anyhow::bail!(
                "spec.service_fee.min ({}) cannot exceed spec.service_fee.max ({})",
                fee.min,
                fee.max
            );
        }

        if self.spec.routes.reserved.is_empty() {
            anyhow::bail!("spec.routes.reserved must list at least one route");
        }
        if let Some(blank) = self.spec.routes.reserved.iter().find(|r| r.trim().is_empty()) {
            anyhow::bail!("spec.routes.reserved contains a blank route: {:?}", blank);
        }

        Ok(())
    }
}

fn candidate_paths_from(env_path: Option<String>, home: Option<PathBuf>) -> Vec<PathBuf> {
    let mut paths: Vec<PathBuf> = env_path
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from)
        .into_iter()
        .collect();
    paths.push(PathBuf::from("./cfpolicy-config.yaml"));
    paths.extend(home.map(|home| home.join(".cfpolicy").join("config.yaml")));

    #[cfg(windows)]
    paths.push(PathBuf::from("C:\\ProgramData\\CfPolicy\\config.yaml"));
    #[cfg(not(windows))]
    paths.push(PathBuf::from("/etc/cfpolicy/config.yaml"));

    paths
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
