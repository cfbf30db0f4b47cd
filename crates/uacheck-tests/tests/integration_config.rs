// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Configuration Integration Tests
//!
//! ## Test Categories
//!
//! - `test_load_*`: loading YAML, TOML and JSON files
//! - `test_override_*`: `UACHECK_*` overrides and placeholders
//! - `test_invalid_*`: configurations that must be rejected
//! - `test_derived_*`: rule policies and walk limits built from a config
//! - `test_cli_*`: command-line arguments layered over a config

use std::fs;
use std::time::Duration;

use clap::Parser;
use uacheck_bin::cli::Commands;
use uacheck_bin::runtime::apply_common_args;
use uacheck_bin::Cli;
use uacheck_config::{
    load_config, load_config_str, CheckConfig, ConfigError, ConfigFormat, ConfigLoader, LogFormat,
    LogLevel, ReportFormat,
};
use uacheck_tests::common::temp_test_dir;
use uacheck_tests::prelude::*;

fn write_config(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = temp_test_dir("uacheck-config");
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    (dir, path)
}

// =============================================================================
// Loading
// =============================================================================

#[test]
fn test_load_full_yaml() {
    let (dir, path) = write_config("uacheck.yaml", ConfigFixtures::full_yaml());

    let config = load_config(&path).unwrap();

    assert_eq!(config.server.endpoint, "opc.tcp://plc.local:4840");
    assert_eq!(config.server.request_timeout, Duration::from_secs(10));
    assert_eq!(config.validation.start_nodes, vec!["i=85", "ns=2;i=1"]);
    assert_eq!(config.validation.max_depth, 4);
    assert_eq!(config.validation.max_nodes, 500);
    assert_eq!(config.validation.profile, Profile::Lenient);
    assert_eq!(config.output.format, ReportFormat::Json);
    assert_eq!(config.output.min_severity, Severity::Warning);
    assert_eq!(config.logging.level, LogLevel::Info);
    assert_eq!(config.logging.format, LogFormat::Compact);
    // Relative dump paths resolve against the config file.
    assert_eq!(config.output.dump, Some(dir.path().join("dump.txt")));
}

#[test]
fn test_load_minimal_yaml_defaults() {
    let config = load_config_str(ConfigFixtures::minimal_yaml(), ConfigFormat::Yaml).unwrap();

    assert_eq!(config.validation.start_nodes, vec!["i=84"]);
    assert_eq!(config.validation.max_depth, 0);
    assert_eq!(config.validation.profile, Profile::Strict);
    assert!(config.validation.rules.is_empty());
    assert_eq!(config.output.dump, None);
    assert_eq!(config.output.format, ReportFormat::Text);
    assert_eq!(config.output.min_severity, Severity::Info);
}

#[test]
fn test_load_without_output_section() {
    let yaml = r#"
server:
  endpoint: "opc.tcp://localhost:4840"
validation:
  profile: lenient
"#;
    let config = load_config_str(yaml, ConfigFormat::Yaml).unwrap();

    // Info-level diagnostics such as a missing definition stay visible.
    assert_eq!(config.output.min_severity, Severity::Info);
    let policy = config.validation.rule_policy().unwrap();
    assert!(policy.severity_of(Rule::DataTypeDefinitionMissing) >= config.output.min_severity);
}

#[test]
fn test_load_toml() {
    let (_dir, path) = write_config("uacheck.toml", ConfigFixtures::toml());

    let config = load_config(&path).unwrap();

    assert_eq!(config.validation.max_depth, 2);
    assert_eq!(
        config.validation.rules.get("type_definition_cardinality").map(String::as_str),
        Some("warning")
    );
}

#[test]
fn test_load_json() {
    let json = r#"{
        "server": { "endpoint": "opc.tcp://localhost:4840" },
        "validation": { "start_nodes": ["ns=3;s=Line1"], "max_nodes": 50 }
    }"#;
    let (_dir, path) = write_config("uacheck.json", json);

    let config = load_config(&path).unwrap();

    assert_eq!(config.validation.max_nodes, 50);
    assert_eq!(
        config.validation.start_node_ids().unwrap()[0].to_string(),
        "ns=3;s=Line1"
    );
}

#[test]
fn test_load_missing_file() {
    let dir = temp_test_dir("uacheck-config");
    let result = load_config(dir.path().join("absent.yaml"));
    assert!(matches!(result, Err(ConfigError::FileNotFound { .. })));
}

#[test]
fn test_load_unknown_extension() {
    let (_dir, path) = write_config("uacheck.ini", "endpoint = x");
    assert!(matches!(load_config(&path), Err(ConfigError::UnsupportedFormat { .. })));
}

// =============================================================================
// Overrides
// =============================================================================

#[test]
fn test_override_from_lookup() {
    let mut config = load_config_str(ConfigFixtures::minimal_yaml(), ConfigFormat::Yaml).unwrap();
    let vars = [
        ("UACHECK_ENDPOINT", "opc.tcp://other:4841"),
        ("UACHECK_PROFILE", "lenient"),
        ("UACHECK_MAX_DEPTH", "3"),
        ("UACHECK_LOG_FORMAT", "json"),
    ];

    ConfigLoader::new()
        .apply_overrides_from(&mut config, |name| {
            vars.iter().find(|(k, _)| *k == name).map(|(_, v)| v.to_string())
        })
        .unwrap();

    assert_eq!(config.server.endpoint, "opc.tcp://other:4841");
    assert_eq!(config.validation.profile, Profile::Lenient);
    assert_eq!(config.validation.max_depth, 3);
    assert_eq!(config.logging.format, LogFormat::Json);
}

#[test]
fn test_override_invalid_number() {
    let mut config = CheckConfig::default();
    let result = ConfigLoader::new().apply_overrides_from(&mut config, |name| {
        (name == "UACHECK_MAX_NODES").then(|| "many".to_string())
    });
    assert!(matches!(result, Err(ConfigError::InvalidEnvVar { .. })));
}

#[test]
fn test_override_custom_prefix() {
    let mut config = CheckConfig::default();
    ConfigLoader::new()
        .with_env_prefix("PLANT")
        .apply_overrides_from(&mut config, |name| {
            (name == "PLANT_ENDPOINT").then(|| "opc.tcp://plant:4840".to_string())
        })
        .unwrap();
    assert_eq!(config.server.endpoint, "opc.tcp://plant:4840");
}

#[test]
fn test_override_placeholder_default() {
    let loader = ConfigLoader::new();
    let resolved = loader
        .resolve_env_placeholders("endpoint: ${UACHECK_TEST_SURELY_UNSET_VAR:opc.tcp://fallback:4840}")
        .unwrap();
    assert_eq!(resolved, "endpoint: opc.tcp://fallback:4840");
}

// =============================================================================
// Invalid configurations
// =============================================================================

#[test]
fn test_invalid_start_node() {
    let yaml = r#"
validation:
  start_nodes: ["ns=x;i=1"]
"#;
    let result = load_config_str(yaml, ConfigFormat::Yaml);
    assert!(matches!(result, Err(ConfigError::InvalidNodeId { .. })));
}

#[test]
fn test_invalid_zero_max_nodes() {
    let yaml = r#"
validation:
  max_nodes: 0
"#;
    let result = load_config_str(yaml, ConfigFormat::Yaml);
    assert!(matches!(result, Err(ConfigError::OutOfRange { .. })));
}

#[test]
fn test_invalid_rule_override() {
    for rules in [
        "no_such_rule: error",
        "view_invalid_reference: fatal",
        "browse_failed: info",
    ] {
        let yaml = format!("validation:\n  rules:\n    {}\n", rules);
        let result = load_config_str(&yaml, ConfigFormat::Yaml);
        assert!(
            matches!(result, Err(ConfigError::Validation { .. })),
            "'{}' should be rejected",
            rules
        );
    }
}

#[test]
fn test_invalid_malformed_yaml() {
    let (_dir, path) = write_config("broken.yaml", "server: [unclosed");
    assert!(matches!(load_config(&path), Err(ConfigError::Parse { .. })));
}

#[test]
fn test_invalid_missing_endpoint_for_run() {
    let config = CheckConfig::default();
    assert!(config.validate().is_ok());
    assert!(matches!(
        config.validate_server(),
        Err(ConfigError::MissingField { .. })
    ));
}

// =============================================================================
// Derived settings
// =============================================================================

#[test]
fn test_derived_rule_policy() {
    let config = load_config_str(ConfigFixtures::full_yaml(), ConfigFormat::Yaml).unwrap();
    let policy = config.validation.rule_policy().unwrap();

    assert_eq!(policy.profile(), Profile::Lenient);
    // Overridden on top of the lenient profile.
    assert_eq!(policy.severity_of(Rule::ViewInvalidReference), Severity::Error);
    assert_eq!(policy.severity_of(Rule::DataTypeDefinitionMissing), Severity::Warning);
    // Lenient default.
    assert_eq!(policy.severity_of(Rule::TypeDefinitionCardinality), Severity::Warning);
}

#[test]
fn test_derived_walk_config() {
    let config = load_config_str(ConfigFixtures::full_yaml(), ConfigFormat::Yaml).unwrap();
    let walk = config.validation.walk_config().unwrap();

    assert_eq!(walk.start_nodes, vec![NodeId::OBJECTS_FOLDER, Plant::PUMP]);
    assert_eq!(walk.max_depth, 4);
    assert_eq!(walk.max_nodes, 500);
}

// =============================================================================
// Command line
// =============================================================================

fn node_command(args: &[&str]) -> uacheck_bin::cli::CommonArgs {
    let mut argv = vec!["uacheck", "node", "ns=2;i=1"];
    argv.extend_from_slice(args);
    match Cli::parse_from(argv).command {
        Commands::Node(node) => node.common,
        _ => unreachable!("parsed a node command"),
    }
}

#[test]
fn test_cli_args_override_config() {
    let config = load_config_str(ConfigFixtures::minimal_yaml(), ConfigFormat::Yaml).unwrap();
    let args = node_command(&[
        "--endpoint",
        "opc.tcp://cli:4840",
        "--profile",
        "lenient",
        "--rule",
        "view_invalid_reference = error",
    ]);

    let config = apply_common_args(config, &args).unwrap();

    assert_eq!(config.server.endpoint, "opc.tcp://cli:4840");
    assert_eq!(config.validation.profile, Profile::Lenient);
    assert_eq!(
        config.validation.rules.get("view_invalid_reference").map(String::as_str),
        Some("error")
    );
}

#[test]
fn test_cli_requires_endpoint() {
    let args = node_command(&[]);
    assert!(apply_common_args(CheckConfig::default(), &args).is_err());

    let args = node_command(&["--rule", "view_invalid_reference"]);
    let config = ConfigFixtures::with_endpoint("opc.tcp://localhost:4840");
    assert!(apply_common_args(config, &args).is_err());
}
