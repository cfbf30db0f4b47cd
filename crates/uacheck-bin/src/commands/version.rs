// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! `uacheck version`

use uacheck_validator::{Profile, Rule, RulePolicy};

use crate::cli::Cli;
use crate::error::CliResult;

/// Prints crate versions, the client backend and the default rule severities.
pub fn version(_cli: &Cli) -> CliResult<()> {
    println!("uacheck {} ({}/{})", crate::VERSION, std::env::consts::OS, std::env::consts::ARCH);
    for (name, version) in [
        ("uacheck-opcua", uacheck_opcua::VERSION),
        ("uacheck-validator", uacheck_validator::VERSION),
        ("uacheck-config", uacheck_config::VERSION),
    ] {
        println!("  {:<18} {}", name, version);
    }

    let backend = if cfg!(feature = "real-transport") { "opcua" } else { "none" };
    println!("  {:<18} {}", "client backend", backend);

    println!();
    println!("{:<38} {:<8} {}", "rule", Profile::Strict.as_str(), Profile::Lenient.as_str());
    let (strict, lenient) = (RulePolicy::strict(), RulePolicy::lenient());
    for rule in Rule::MODEL_RULES {
        println!(
            "{:<38} {:<8} {}",
            rule.key(),
            strict.severity_of(rule).as_str(),
            lenient.severity_of(rule)
        );
    }
    Ok(())
}
