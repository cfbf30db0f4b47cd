// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uacheck-config
//!
//! Run configuration for uacheck.
//!
//! - **Multi-Format Support**: YAML, TOML and JSON configuration files
//! - **Placeholders**: `${VAR}` and `${VAR:default}` in any value
//! - **Environment Overrides**: `UACHECK_*` variables win over the file
//! - **Validation**: start nodes, limits and rule overrides are checked on load
//!
//! ## Quick Start
//!
//! ```no_run
//! use uacheck_config::load_config;
//!
//! let config = load_config("uacheck.yaml").unwrap();
//! println!("Endpoint: {}", config.server.endpoint);
//! println!("Profile: {}", config.validation.profile);
//! ```
//!
//! ## Configuration Schema
//!
//! - `server` - endpoint, security, user token, timeouts
//! - `validation` - start nodes, walk limits, profile, per-rule overrides
//! - `output` - dump file, report format, console severity
//! - `logging` - level and format

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod loader;
pub mod schema;

pub use error::{ConfigError, ConfigResult};
pub use loader::{load_config, load_config_str, ConfigFormat, ConfigLoader};
pub use schema::{
    CheckConfig, LogFormat, LogLevel, LoggingConfig, OutputConfig, ReportFormat,
    ValidationConfig,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
