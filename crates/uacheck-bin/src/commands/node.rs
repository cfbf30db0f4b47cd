// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `node` command.

use tracing::info;
use uacheck_config::CheckConfig;

use crate::cli::{Cli, LogFormat, NodeArgs};
use crate::error::{CliError, CliResult};
use crate::report::render_node_reports;
use crate::runtime::{self, Outputs};

/// Validates each given node and prints the reports.
pub async fn node(cli: &Cli, config: CheckConfig, args: &NodeArgs) -> CliResult<()> {
    let config = runtime::apply_common_args(config, &args.common)?;
    let nodes = runtime::parse_node_ids(&args.node_ids)?;
    let policy = config.validation.rule_policy()?;
    let structured = cli.effective_log_format(config.logging.format) == LogFormat::Json;

    let mut outputs = Outputs::open(&config.output, cli.quiet, structured)?;
    let transport = runtime::connect(&config.server).await?;
    info!(endpoint = %config.server.endpoint, nodes = nodes.len(), "Validating nodes");

    let result = runtime::run_nodes(
        transport.as_ref(),
        &nodes,
        policy,
        &mut outputs.dump,
        &mut outputs.sink,
    )
    .await;
    runtime::disconnect(transport).await;
    let reports = result?;
    outputs.finish()?;

    print!("{}", render_node_reports(&reports, config.output.format)?);

    let failed = reports.iter().filter(|r| !r.passed()).count();
    if failed > 0 {
        return Err(CliError::validation_failed(failed, reports.len()));
    }
    Ok(())
}
