// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Run orchestration.
//!
//! - Effective configuration: file, environment, then command-line flags
//! - Transport construction and connection
//! - Dump and diagnostic sinks
//! - Validation of node lists and address-space walks

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::str::FromStr;

use tracing::{info, warn};
use uacheck_config::{CheckConfig, ConfigLoader, OutputConfig};
use uacheck_opcua::{NodeId, OpcUaConfig, OpcUaTransport};
use uacheck_validator::{
    AddressSpaceWalker, ConsoleSink, DiagnosticSink, NodeValidator, RulePolicy, Severity,
    TracingSink, ValidationReport, WalkConfig, WalkSummary,
};

use crate::cli::{Cli, CommonArgs};
use crate::error::{CliError, CliResult};

// =============================================================================
// Configuration
// =============================================================================

/// Loads the configuration file, or the defaults plus `UACHECK_*`
/// overrides when no file is given.
pub fn load_base_config(cli: &Cli) -> CliResult<CheckConfig> {
    match cli.config {
        Some(ref path) => Ok(uacheck_config::load_config(path)?),
        None => {
            let mut config = CheckConfig::default();
            ConfigLoader::new().apply_overrides_from(&mut config, |name| std::env::var(name).ok())?;
            config.validate()?;
            Ok(config)
        }
    }
}

/// Applies the shared command-line options on top of the configuration.
pub fn apply_common_args(mut config: CheckConfig, args: &CommonArgs) -> CliResult<CheckConfig> {
    if let Some(ref endpoint) = args.endpoint {
        config.server.endpoint = endpoint.clone();
    }
    if let Some(ref dump) = args.dump {
        config.output.dump = Some(dump.clone());
    }
    if let Some(format) = args.format {
        config.output.format = format.into();
    }
    if let Some(profile) = args.profile {
        config.validation.profile = profile.into();
    }
    for rule in &args.rules {
        let (name, severity) = rule.split_once('=').ok_or_else(|| {
            CliError::config(format!("rule override '{}' must be RULE=SEVERITY", rule))
        })?;
        config
            .validation
            .rules
            .insert(name.trim().to_string(), severity.trim().to_string());
    }

    config.validate()?;
    config.validate_server()?;
    Ok(config)
}

/// Parses node ids given on the command line.
pub fn parse_node_ids(ids: &[String]) -> CliResult<Vec<NodeId>> {
    ids.iter()
        .map(|s| {
            NodeId::from_str(s).map_err(|e| CliError::config(format!("invalid node id '{}': {}", s, e)))
        })
        .collect()
}

// =============================================================================
// Transport
// =============================================================================

/// Creates and connects the client transport.
#[cfg(feature = "real-transport")]
pub async fn connect(config: &OpcUaConfig) -> CliResult<Box<dyn OpcUaTransport>> {
    let mut transport = uacheck_opcua::RealOpcUaTransport::new(config.clone());
    transport
        .connect()
        .await
        .map_err(|e| CliError::from(e).with_context(format!("connecting to {}", config.endpoint)))?;
    Ok(Box::new(transport))
}

/// Creates and connects the client transport.
#[cfg(not(feature = "real-transport"))]
pub async fn connect(config: &OpcUaConfig) -> CliResult<Box<dyn OpcUaTransport>> {
    Err(CliError::init(format!(
        "cannot connect to {}: built without the real-transport feature",
        config.endpoint
    )))
}

/// Disconnects, logging failures.
pub async fn disconnect(mut transport: Box<dyn OpcUaTransport>) {
    if let Err(e) = transport.disconnect().await {
        warn!(endpoint = %transport.endpoint(), error = %e, "Disconnect failed");
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// Dump and diagnostic destinations of one run.
pub struct Outputs {
    /// Dump writer; discards when no dump file is configured.
    pub dump: Box<dyn Write + Send>,
    /// Diagnostic sink.
    pub sink: Box<dyn DiagnosticSink>,
}

impl Outputs {
    /// Opens the configured outputs.
    ///
    /// With `structured`, diagnostics become tracing events instead of
    /// console lines.
    pub fn open(config: &OutputConfig, quiet: bool, structured: bool) -> CliResult<Self> {
        let dump: Box<dyn Write + Send> = match config.dump {
            Some(ref path) => {
                let file = File::create(path).map_err(|e| {
                    CliError::io(format!("cannot create dump file {}: {}", path.display(), e))
                })?;
                info!(path = %path.display(), "Writing dump");
                Box::new(BufWriter::new(file))
            }
            None => Box::new(io::sink()),
        };

        let sink: Box<dyn DiagnosticSink> = if structured {
            Box::new(TracingSink)
        } else {
            let min = if quiet { Severity::Error } else { config.min_severity };
            Box::new(ConsoleSink::stderr().with_min_severity(min))
        };

        Ok(Self { dump, sink })
    }

    /// Flushes the dump.
    pub fn finish(mut self) -> CliResult<()> {
        self.dump.flush()?;
        Ok(())
    }
}

// =============================================================================
// Runs
// =============================================================================

/// Validates each node in order.
pub async fn run_nodes<T, W, S>(
    client: &T,
    nodes: &[NodeId],
    policy: RulePolicy,
    dump: &mut W,
    sink: &mut S,
) -> CliResult<Vec<ValidationReport>>
where
    T: OpcUaTransport + ?Sized,
    W: Write + Send,
    S: DiagnosticSink,
{
    let mut validator = NodeValidator::new(client).with_policy(policy);
    let mut reports = Vec::with_capacity(nodes.len());

    for node_id in nodes {
        let report = validator.validate(node_id, dump, sink).await?;
        info!(node_id = %node_id, passed = report.passed(), "Node checked");
        reports.push(report);
    }
    Ok(reports)
}

/// Walks the address space.
pub async fn run_walk<T, W, S>(
    client: &T,
    walk: WalkConfig,
    policy: RulePolicy,
    dump: &mut W,
    sink: &mut S,
) -> CliResult<WalkSummary>
where
    T: OpcUaTransport + ?Sized,
    W: Write + Send,
    S: DiagnosticSink,
{
    let validator = NodeValidator::new(client).with_policy(policy);
    let mut walker = AddressSpaceWalker::new(validator, walk);
    Ok(walker.walk(dump, sink).await?)
}
