// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Configuration schema for uacheck.
//!
//! ```yaml
//! server:
//!   endpoint: opc.tcp://localhost:4840
//!   security_mode: none
//!   request_timeout: 5s
//! validation:
//!   start_nodes: ["i=85"]
//!   max_depth: 3
//!   profile: lenient
//!   rules:
//!     type_definition_cardinality: error
//! output:
//!   dump: dump.txt
//!   format: json
//! logging:
//!   level: debug
//!   format: compact
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uacheck_opcua::{NodeId, OpcUaConfig};
use uacheck_validator::{Profile, RulePolicy, Severity, WalkConfig};

use crate::error::{ConfigError, ConfigResult};

/// Default node limit of a walk.
pub const DEFAULT_MAX_NODES: usize = 10_000;

/// Upper bound accepted for `validation.max_nodes`.
pub const MAX_MAX_NODES: usize = 10_000_000;

// =============================================================================
// Root Configuration
// =============================================================================

/// Root configuration of a uacheck run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Server connection settings.
    #[serde(default)]
    pub server: OpcUaConfig,

    /// What to validate and how strictly.
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Dump and report output.
    #[serde(default)]
    pub output: OutputConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CheckConfig {
    /// Validates the configuration.
    ///
    /// The server endpoint may be empty here since the CLI can supply it;
    /// use [`CheckConfig::validate_server`] once it is final.
    pub fn validate(&self) -> ConfigResult<()> {
        if !self.server.endpoint.is_empty() {
            self.validate_server()?;
        }
        self.validation.validate()?;
        self.output.validate()?;
        Ok(())
    }

    /// Validates the server section, requiring an endpoint.
    pub fn validate_server(&self) -> ConfigResult<()> {
        if self.server.endpoint.is_empty() {
            return Err(ConfigError::missing_field("server.endpoint"));
        }
        self.server
            .validate()
            .map_err(|e| ConfigError::validation("server", e.to_string()))
    }
}

// =============================================================================
// Validation Configuration
// =============================================================================

/// What to validate and how strictly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationConfig {
    /// Node ids to start from, in `ns=2;i=1001` notation.
    #[serde(default = "default_start_nodes")]
    pub start_nodes: Vec<String>,

    /// Number of levels a walk validates. 0 = unlimited.
    #[serde(default)]
    pub max_depth: usize,

    /// Node limit of a walk.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,

    /// Severity profile.
    #[serde(default)]
    pub profile: Profile,

    /// Per-rule severity overrides (`rule_name: severity`).
    #[serde(default)]
    pub rules: BTreeMap<String, String>,
}

fn default_start_nodes() -> Vec<String> {
    vec![NodeId::ROOT_FOLDER.to_string()]
}

fn default_max_nodes() -> usize {
    DEFAULT_MAX_NODES
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            start_nodes: default_start_nodes(),
            max_depth: 0,
            max_nodes: DEFAULT_MAX_NODES,
            profile: Profile::default(),
            rules: BTreeMap::new(),
        }
    }
}

impl ValidationConfig {
    /// Validates the section.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.start_nodes.is_empty() {
            return Err(ConfigError::validation(
                "validation.start_nodes",
                "at least one start node is required",
            ));
        }
        if self.max_nodes == 0 || self.max_nodes > MAX_MAX_NODES {
            return Err(ConfigError::out_of_range(
                "validation.max_nodes",
                self.max_nodes,
                1,
                MAX_MAX_NODES,
            ));
        }
        self.start_node_ids()?;
        self.rule_policy()?;
        Ok(())
    }

    /// Parses the start nodes.
    pub fn start_node_ids(&self) -> ConfigResult<Vec<NodeId>> {
        self.start_nodes
            .iter()
            .map(|s| {
                NodeId::from_str(s).map_err(|e| {
                    ConfigError::invalid_node_id("validation.start_nodes", s, e.to_string())
                })
            })
            .collect()
    }

    /// Builds the rule policy from the profile and overrides.
    pub fn rule_policy(&self) -> ConfigResult<RulePolicy> {
        RulePolicy::from_profile(self.profile)
            .with_overrides(&self.rules)
            .map_err(|e| ConfigError::validation("validation.rules", e.to_string()))
    }

    /// Builds the walk limits.
    pub fn walk_config(&self) -> ConfigResult<WalkConfig> {
        Ok(WalkConfig {
            start_nodes: self.start_node_ids()?,
            max_depth: self.max_depth,
            max_nodes: self.max_nodes,
        })
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

/// Dump and report output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Dump file. The dump is discarded when unset.
    #[serde(default)]
    pub dump: Option<PathBuf>,

    /// Format of the final report on stdout.
    #[serde(default)]
    pub format: ReportFormat,

    /// Diagnostics below this severity are not printed.
    #[serde(default = "default_min_severity")]
    pub min_severity: Severity,
}

fn default_min_severity() -> Severity {
    Severity::Info
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dump: None,
            format: ReportFormat::default(),
            min_severity: default_min_severity(),
        }
    }
}

impl OutputConfig {
    /// Validates the section.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(ref dump) = self.dump {
            if dump.as_os_str().is_empty() {
                return Err(ConfigError::validation("output.dump", "cannot be empty"));
            }
        }
        Ok(())
    }
}

/// Format of the final report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable summary.
    #[default]
    Text,
    /// One JSON document.
    Json,
}

impl ReportFormat {
    /// Returns the format name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Text => "text",
            ReportFormat::Json => "json",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            other => Err(ConfigError::validation(
                "output.format",
                format!("unknown report format '{}'", other),
            )),
        }
    }
}

// =============================================================================
// Logging Configuration
// =============================================================================

/// Logging configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level.
    #[serde(default)]
    pub level: LogLevel,

    /// Log format.
    #[serde(default)]
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level.
    Trace,
    /// Debug level.
    Debug,
    /// Info level.
    Info,
    /// Warning level.
    #[default]
    Warn,
    /// Error level.
    Error,
}

impl LogLevel {
    /// Returns the level as an `EnvFilter` directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// Parses a level name; `warning` is accepted for `warn`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "trace" => Some(LogLevel::Trace),
            "debug" => Some(LogLevel::Debug),
            "info" => Some(LogLevel::Info),
            "warn" | "warning" => Some(LogLevel::Warn),
            "error" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// Compact single-line text.
    Compact,
    /// JSON lines.
    Json,
}

impl LogFormat {
    /// Parses a format name.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "text" => Some(LogFormat::Text),
            "compact" => Some(LogFormat::Compact),
            "json" => Some(LogFormat::Json),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uacheck_validator::Rule;

    #[test]
    fn test_defaults_validate() {
        let config = CheckConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.validation.start_nodes, vec!["i=84".to_string()]);
        assert_eq!(config.output.min_severity, Severity::Info);
        assert!(matches!(
            config.validate_server(),
            Err(ConfigError::MissingField { .. })
        ));
    }

    #[test]
    fn test_output_min_severity_defaults_to_info() {
        assert_eq!(OutputConfig::default().min_severity, Severity::Info);

        let without_section: CheckConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(without_section.output, OutputConfig::default());

        let partial: CheckConfig =
            serde_json::from_str(r#"{ "output": { "format": "json" } }"#).unwrap();
        assert_eq!(partial.output.min_severity, Severity::Info);
        assert_eq!(partial.output.format, ReportFormat::Json);
    }

    #[test]
    fn test_invalid_start_node() {
        let config = ValidationConfig {
            start_nodes: vec!["ns=abc;i=1".to_string()],
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidNodeId { .. })
        ));
    }

    #[test]
    fn test_max_nodes_range() {
        let config = ValidationConfig {
            max_nodes: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange { .. })));
    }

    #[test]
    fn test_rule_policy_overrides() {
        let mut config = ValidationConfig {
            profile: Profile::Lenient,
            ..Default::default()
        };
        config
            .rules
            .insert("type_definition_cardinality".to_string(), "error".to_string());

        let policy = config.rule_policy().unwrap();
        assert_eq!(policy.severity_of(Rule::TypeDefinitionCardinality), Severity::Error);
        assert_eq!(policy.severity_of(Rule::ModellingRuleCardinality), Severity::Warning);

        config.rules.insert("no_such_rule".to_string(), "error".to_string());
        assert!(matches!(
            config.rule_policy(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn test_walk_config() {
        let config = ValidationConfig {
            start_nodes: vec!["i=85".to_string(), "ns=2;s=Plant".to_string()],
            max_depth: 2,
            ..Default::default()
        };
        let walk = config.walk_config().unwrap();
        assert_eq!(walk.start_nodes[0], NodeId::OBJECTS_FOLDER);
        assert_eq!(walk.max_depth, 2);
        assert_eq!(walk.max_nodes, DEFAULT_MAX_NODES);
    }

    #[test]
    fn test_report_format_parse() {
        assert_eq!("JSON".parse::<ReportFormat>().unwrap(), ReportFormat::Json);
        assert!("xml".parse::<ReportFormat>().is_err());
    }

    #[test]
    fn test_log_level_parse() {
        assert_eq!(LogLevel::parse("warning"), Some(LogLevel::Warn));
        assert_eq!(LogLevel::parse("DEBUG"), Some(LogLevel::Debug));
        assert_eq!(LogLevel::parse("loud"), None);
        assert_eq!(LogFormat::parse("compact"), Some(LogFormat::Compact));
    }
}
