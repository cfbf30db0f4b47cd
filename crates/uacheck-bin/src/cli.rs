// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI argument parsing and command definitions.
//!
//! - `node`: Validate the given nodes
//! - `walk`: Walk the address space and validate every node
//! - `check-config`: Validate the configuration file
//! - `version`: Show version information

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

// =============================================================================
// Main CLI Structure
// =============================================================================

/// uacheck - OPC UA address-space node validator
///
/// Reads the attributes and references of OPC UA nodes, checks them against
/// the information-model rules and writes a dump of every validated node.
#[derive(Parser, Debug)]
#[command(
    name = "uacheck",
    author = "Sylvex <contact@sylvex.io>",
    version = crate::VERSION,
    about = "OPC UA address-space node validator",
    long_about = None,
    propagate_version = true
)]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "UACHECK_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "UACHECK_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Log format (text, json, compact)
    #[arg(long, env = "UACHECK_LOG_FORMAT", global = true)]
    pub log_format: Option<LogFormat>,

    /// Only print errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

// =============================================================================
// Subcommands
// =============================================================================

/// Available subcommands for the uacheck CLI.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate one or more nodes
    Node(NodeArgs),

    /// Walk the address space and validate every reachable node
    ///
    /// Follows forward hierarchical references breadth first from the start
    /// nodes and validates each node once.
    Walk(WalkArgs),

    /// Validate the configuration file
    ///
    /// Parses and validates the configuration without connecting.
    #[command(name = "check-config")]
    CheckConfig(CheckConfigArgs),

    /// Show detailed version information
    Version,
}

// =============================================================================
// Command Arguments
// =============================================================================

/// Options shared by the commands that talk to a server.
#[derive(Args, Debug, Default, Clone)]
pub struct CommonArgs {
    /// Server endpoint, overriding the configuration
    #[arg(short, long)]
    pub endpoint: Option<String>,

    /// Dump file path
    #[arg(short, long)]
    pub dump: Option<PathBuf>,

    /// Report format on stdout
    #[arg(short, long)]
    pub format: Option<OutputFormat>,

    /// Severity profile
    #[arg(short, long)]
    pub profile: Option<ProfileArg>,

    /// Rule severity override, e.g. `type_definition_cardinality=warning`
    #[arg(long = "rule", value_name = "RULE=SEVERITY")]
    pub rules: Vec<String>,
}

/// Arguments for the `node` command.
#[derive(Args, Debug, Clone)]
pub struct NodeArgs {
    /// Node ids, e.g. `ns=2;i=1001` or `i=85`
    #[arg(required = true)]
    pub node_ids: Vec<String>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the `walk` command.
#[derive(Args, Debug, Default, Clone)]
pub struct WalkArgs {
    /// Start node, repeatable. Defaults to the configured start nodes
    #[arg(short, long = "start")]
    pub start: Vec<String>,

    /// Number of levels to validate (0 = unlimited)
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Maximum number of nodes to validate
    #[arg(long)]
    pub max_nodes: Option<usize>,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Arguments for the `check-config` command.
#[derive(Args, Debug, Default, Clone)]
pub struct CheckConfigArgs {
    /// Show parsed configuration after validation
    #[arg(short, long)]
    pub show_config: bool,

    /// Output format for validation results
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,
}

// =============================================================================
// Enums
// =============================================================================

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for structured logging
    Json,
    /// Compact format for minimal output
    Compact,
}

impl From<uacheck_config::LogFormat> for LogFormat {
    fn from(format: uacheck_config::LogFormat) -> Self {
        match format {
            uacheck_config::LogFormat::Text => LogFormat::Text,
            uacheck_config::LogFormat::Json => LogFormat::Json,
            uacheck_config::LogFormat::Compact => LogFormat::Compact,
        }
    }
}

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    #[default]
    Text,
    /// JSON format for programmatic parsing
    Json,
}

impl From<OutputFormat> for uacheck_config::ReportFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => uacheck_config::ReportFormat::Text,
            OutputFormat::Json => uacheck_config::ReportFormat::Json,
        }
    }
}

/// Severity profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ProfileArg {
    /// Cardinality and reference violations fail the node
    Strict,
    /// Only DataType violations fail the node
    Lenient,
}

impl From<ProfileArg> for uacheck_validator::Profile {
    fn from(profile: ProfileArg) -> Self {
        match profile {
            ProfileArg::Strict => uacheck_validator::Profile::Strict,
            ProfileArg::Lenient => uacheck_validator::Profile::Lenient,
        }
    }
}

// =============================================================================
// Helper Methods
// =============================================================================

impl Cli {
    /// Parse CLI arguments from the command line.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Check if verbose logging is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose && !self.quiet
    }

    /// Get the effective log level; flags win over `--log-level`, which wins
    /// over the configured level.
    pub fn effective_log_level<'a>(&'a self, configured: &'a str) -> &'a str {
        if self.quiet {
            "error"
        } else if self.verbose {
            "debug"
        } else {
            self.log_level.as_deref().unwrap_or(configured)
        }
    }

    /// Get the effective log format.
    pub fn effective_log_format(&self, configured: uacheck_config::LogFormat) -> LogFormat {
        self.log_format.unwrap_or_else(|| configured.into())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_command() {
        let cli = Cli::parse_from(["uacheck", "node", "ns=2;i=1001", "i=85", "-e", "opc.tcp://h:4840"]);
        if let Commands::Node(args) = cli.command {
            assert_eq!(args.node_ids, vec!["ns=2;i=1001", "i=85"]);
            assert_eq!(args.common.endpoint.as_deref(), Some("opc.tcp://h:4840"));
        } else {
            panic!("Expected Node command");
        }
    }

    #[test]
    fn test_node_requires_ids() {
        assert!(Cli::try_parse_from(["uacheck", "node"]).is_err());
    }

    #[test]
    fn test_walk_command() {
        let cli = Cli::parse_from([
            "uacheck", "walk", "--start", "i=85", "--max-depth", "3", "--profile", "lenient",
            "--rule", "view_invalid_reference=error",
        ]);
        if let Commands::Walk(args) = cli.command {
            assert_eq!(args.start, vec!["i=85"]);
            assert_eq!(args.max_depth, Some(3));
            assert_eq!(args.max_nodes, None);
            assert_eq!(args.common.profile, Some(ProfileArg::Lenient));
            assert_eq!(args.common.rules, vec!["view_invalid_reference=error"]);
        } else {
            panic!("Expected Walk command");
        }
    }

    #[test]
    fn test_check_config_command() {
        let cli = Cli::parse_from(["uacheck", "-c", "/etc/uacheck.yaml", "check-config", "--show-config"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/uacheck.yaml")));
        if let Commands::CheckConfig(args) = cli.command {
            assert!(args.show_config);
            assert_eq!(args.format, OutputFormat::Text);
        } else {
            panic!("Expected CheckConfig command");
        }
    }

    #[test]
    fn test_effective_log_level() {
        let cli = Cli::parse_from(["uacheck", "version"]);
        assert_eq!(cli.effective_log_level("warn"), "warn");

        let cli = Cli::parse_from(["uacheck", "-l", "trace", "version"]);
        assert_eq!(cli.effective_log_level("warn"), "trace");

        let cli = Cli::parse_from(["uacheck", "-q", "version"]);
        assert_eq!(cli.effective_log_level("warn"), "error");

        let cli = Cli::parse_from(["uacheck", "-v", "version"]);
        assert!(cli.is_verbose());
        assert_eq!(cli.effective_log_level("warn"), "debug");
    }

    #[test]
    fn test_effective_log_format() {
        let cli = Cli::parse_from(["uacheck", "version"]);
        assert_eq!(cli.effective_log_format(uacheck_config::LogFormat::Json), LogFormat::Json);

        let cli = Cli::parse_from(["uacheck", "--log-format", "compact", "version"]);
        assert_eq!(cli.effective_log_format(uacheck_config::LogFormat::Json), LogFormat::Compact);
    }
}
