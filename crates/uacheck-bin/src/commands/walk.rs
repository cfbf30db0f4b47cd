// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Implementation of the `walk` command.

use tracing::info;
use uacheck_config::CheckConfig;
use uacheck_validator::WalkConfig;

use crate::cli::{Cli, LogFormat, WalkArgs};
use crate::error::{CliError, CliResult};
use crate::report::render_walk_summary;
use crate::runtime::{self, Outputs};

/// Walks the address space and prints the summary.
pub async fn walk(cli: &Cli, config: CheckConfig, args: &WalkArgs) -> CliResult<()> {
    let config = runtime::apply_common_args(config, &args.common)?;
    let walk_config = walk_config(&config, args)?;
    let policy = config.validation.rule_policy()?;
    let structured = cli.effective_log_format(config.logging.format) == LogFormat::Json;

    let mut outputs = Outputs::open(&config.output, cli.quiet, structured)?;
    let transport = runtime::connect(&config.server).await?;
    info!(
        endpoint = %config.server.endpoint,
        start_nodes = walk_config.start_nodes.len(),
        max_depth = walk_config.max_depth,
        max_nodes = walk_config.max_nodes,
        "Walking address space"
    );

    let result = runtime::run_walk(
        transport.as_ref(),
        walk_config,
        policy,
        &mut outputs.dump,
        &mut outputs.sink,
    )
    .await;
    runtime::disconnect(transport).await;
    let summary = result?;
    outputs.finish()?;

    print!("{}", render_walk_summary(&summary, config.output.format)?);

    if !summary.all_passed() {
        return Err(CliError::validation_failed(summary.failed, summary.visited));
    }
    Ok(())
}

/// Configured walk limits with the command-line overrides applied.
pub(crate) fn walk_config(config: &CheckConfig, args: &WalkArgs) -> CliResult<WalkConfig> {
    let mut walk = config.validation.walk_config()?;
    if !args.start.is_empty() {
        walk.start_nodes = runtime::parse_node_ids(&args.start)?;
    }
    if let Some(max_depth) = args.max_depth {
        walk.max_depth = max_depth;
    }
    if let Some(max_nodes) = args.max_nodes {
        if max_nodes == 0 {
            return Err(CliError::config("--max-nodes must be greater than 0"));
        }
        walk.max_nodes = max_nodes;
    }
    Ok(walk)
}
