// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! CLI command implementations.
//!
//! - `node`: Validate the given nodes
//! - `walk`: Walk the address space from the start nodes
//! - `check-config`: Validate the configuration file
//! - `version`: Show version information

mod check_config;
mod node;
mod version;
mod walk;

pub use check_config::check_config;
pub use node::node;
pub use version::version;
pub use walk::walk;

use uacheck_config::CheckConfig;

use crate::cli::{Cli, Commands};
use crate::error::CliResult;

/// Executes the appropriate command based on CLI arguments.
pub async fn execute(cli: &Cli, config: CheckConfig) -> CliResult<()> {
    match cli.command {
        Commands::Node(ref args) => node::node(cli, config, args).await,
        Commands::Walk(ref args) => walk::walk(cli, config, args).await,
        Commands::CheckConfig(ref args) => check_config::check_config(cli, &config, args),
        Commands::Version => version::version(cli),
    }
}
