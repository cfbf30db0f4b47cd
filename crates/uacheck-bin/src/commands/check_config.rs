// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `check-config` command.

use std::path::Path;

use uacheck_config::CheckConfig;
use uacheck_opcua::UserTokenType;

use crate::cli::{CheckConfigArgs, Cli, OutputFormat};
use crate::error::{CliError, CliResult};

/// Validates the configuration file without connecting.
///
/// The file was already loaded and validated by the time this runs, so this
/// only adds the checks that need the final values and prints the summary.
pub fn check_config(cli: &Cli, config: &CheckConfig, args: &CheckConfigArgs) -> CliResult<()> {
    let config_path = cli
        .config
        .as_deref()
        .ok_or_else(|| CliError::config("no configuration file given (use --config)"))?;

    let policy = config.validation.rule_policy()?;
    let start_nodes = config.validation.start_node_ids()?;
    let warnings = collect_warnings(config);

    match args.format {
        OutputFormat::Text => {
            println!("✓ Configuration is valid: {}", config_path.display());
            println!();
            println!("Summary:");
            println!(
                "  Endpoint:    {}",
                if config.server.endpoint.is_empty() { "(not set)" } else { &config.server.endpoint }
            );
            println!("  Profile:     {}", policy.profile());
            println!("  Overrides:   {}", config.validation.rules.len());
            println!("  Start nodes: {}", start_nodes.len());
            println!("  Max depth:   {}", config.validation.max_depth);
            println!("  Max nodes:   {}", config.validation.max_nodes);
            println!(
                "  Dump:        {}",
                config
                    .output
                    .dump
                    .as_deref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(none)".to_string())
            );

            if !warnings.is_empty() {
                println!();
                println!("Warnings:");
                for warning in &warnings {
                    println!("  ⚠ {}", warning);
                }
            }

            if args.show_config {
                println!();
                println!("Parsed configuration:");
                println!("{}", to_json(&redacted(config))?);
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "valid": true,
                "config_path": config_path.display().to_string(),
                "summary": {
                    "endpoint": config.server.endpoint,
                    "profile": policy.profile().to_string(),
                    "rule_overrides": config.validation.rules.len(),
                    "start_nodes": start_nodes.iter().map(|n| n.to_string()).collect::<Vec<_>>(),
                    "max_depth": config.validation.max_depth,
                    "max_nodes": config.validation.max_nodes,
                },
                "warnings": warnings,
                "config": if args.show_config { Some(redacted(config)) } else { None },
            });
            println!("{}", to_json(&output)?);
        }
    }

    Ok(())
}

/// Non-fatal findings about the configuration.
pub(crate) fn collect_warnings(config: &CheckConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.server.endpoint.is_empty() {
        warnings.push("No server endpoint configured; pass --endpoint".to_string());
    }

    if let Some(ref dump) = config.output.dump {
        if let Some(parent) = dump.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                warnings.push(format!("Dump directory does not exist: {}", parent.display()));
            }
        }
    }

    if let Some(ref pki_dir) = config.server.pki_dir {
        if !Path::new(pki_dir).exists() {
            warnings.push(format!("PKI directory does not exist: {}", pki_dir));
        }
    }

    if let UserTokenType::UserName { ref password, .. } = config.server.user_token {
        if password.is_empty() {
            warnings.push("Username authentication with an empty password".to_string());
        }
    }

    warnings
}

/// Copy of the configuration with secrets masked.
fn redacted(config: &CheckConfig) -> CheckConfig {
    let mut config = config.clone();
    if let UserTokenType::UserName { ref mut password, .. } = config.server.user_token {
        *password = "********".to_string();
    }
    config
}

fn to_json<T: serde::Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| CliError::runtime(format!("cannot serialize configuration: {}", e)))
}
