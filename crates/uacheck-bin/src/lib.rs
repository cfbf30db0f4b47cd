// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Library side of the `uacheck` binary.
//!
//! `main.rs` parses a [`Cli`] and hands it to [`run`]. [`runtime`] layers
//! flags over the configuration file, opens the session and drives the
//! validator; [`report`] renders what comes back; [`logging`] installs the
//! tracing subscriber.
//!
//! ## Usage
//!
//! ```bash
//! # Validate two nodes
//! uacheck node -e opc.tcp://localhost:4840 "ns=2;i=1001" i=85
//!
//! # Walk the Objects folder, three levels deep, with a dump file
//! uacheck walk -e opc.tcp://localhost:4840 --start i=85 --max-depth 3 -d dump.txt
//!
//! # Validate configuration
//! uacheck -c uacheck.yaml check-config
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod report;
pub mod runtime;

pub use cli::{Cli, Commands};
pub use error::{CliError, CliResult, EXIT_VALIDATION_FAILED};
pub use logging::init_logging;
pub use runtime::{run_nodes, run_walk, Outputs};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name.
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Loads the configuration, installs logging and runs the selected command.
pub async fn run(cli: Cli) -> CliResult<()> {
    let config = runtime::load_base_config(&cli)?;

    init_logging(
        cli.effective_log_level(config.logging.level.as_str()),
        cli.effective_log_format(config.logging.format),
    );
    tracing::debug!(name = NAME, version = VERSION, "Starting");

    commands::execute(&cli, config).await
}
