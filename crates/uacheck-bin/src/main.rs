// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! uacheck - OPC UA address-space node validator
//!
//! Main binary entry point.

use uacheck_bin::Cli;
use uacheck_bin::error::report_error_and_exit;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();

    if let Err(error) = uacheck_bin::run(cli).await {
        report_error_and_exit(error);
    }
}
