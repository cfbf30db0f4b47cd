// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Logging and tracing initialization.
//!
//! Logs go to stderr so that stdout carries only the report.

use std::io::IsTerminal;

use tracing_subscriber::{
    filter::Directive, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
    Registry,
};

use crate::cli::LogFormat;

/// Installs the global subscriber, writing to stderr.
///
/// `RUST_LOG` overrides `level`. The `opcua` stack is capped at `warn`
/// either way. A second call keeps the first subscriber.
pub fn init_logging(level: &str, format: LogFormat) {
    let ansi = std::io::stderr().is_terminal();

    let layer: Box<dyn Layer<Registry> + Send + Sync> = match format {
        LogFormat::Text => fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(ansi)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(ansi)
            .boxed(),
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_file(true)
            .with_line_number(true)
            .with_current_span(true)
            .boxed(),
    };

    let _ = tracing_subscriber::registry()
        .with(layer)
        .with(build_filter(level))
        .try_init();
}

/// Filter from `RUST_LOG`, else `level`, plus `opcua=warn`.
pub fn build_filter(level: &str) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    match "opcua=warn".parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

// =============================================================================
// Tests
// =============================================================================
