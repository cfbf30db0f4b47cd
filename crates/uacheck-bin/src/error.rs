// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the uacheck binary.

use thiserror::Error;

/// Result type alias for uacheck-bin operations.
pub type CliResult<T> = Result<T, CliError>;

/// Exit code when at least one node failed validation.
pub const EXIT_VALIDATION_FAILED: i32 = 10;

/// Errors that can occur in the uacheck binary.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad arguments or settings detected by the binary itself.
    #[error("Invalid setup: {0}")]
    Configuration(String),

    /// No usable client backend.
    #[error("Cannot start: {0}")]
    Initialization(String),

    /// Report or config rendering failed.
    #[error("Cannot render output: {0}")]
    Runtime(String),

    /// Dump or stdout write failed.
    #[error("Output error: {0}")]
    Io(String),

    /// The configuration file was rejected.
    #[error("{0}")]
    Config(#[from] uacheck_config::ConfigError),

    /// Client stack error.
    #[error("OPC UA error: {0}")]
    Transport(#[from] uacheck_opcua::OpcUaError),

    /// Validator error.
    #[error("Validator error: {0}")]
    Validator(#[from] uacheck_validator::ValidatorError),

    /// One or more nodes failed validation.
    #[error("Validation failed: {failed} of {total} node(s) failed")]
    ValidationFailed {
        /// Failing nodes.
        failed: usize,
        /// Validated nodes.
        total: usize,
    },

    /// `source`, raised while doing `context`.
    #[error("{context}: {source}")]
    WithContext {
        /// What was being done.
        context: String,
        /// Wrapped error.
        #[source]
        source: Box<CliError>,
    },
}

impl CliError {
    /// [`CliError::Configuration`].
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// [`CliError::Initialization`].
    pub fn init(message: impl Into<String>) -> Self {
        Self::Initialization(message.into())
    }

    /// [`CliError::Runtime`].
    pub fn runtime(message: impl Into<String>) -> Self {
        Self::Runtime(message.into())
    }

    /// [`CliError::Io`].
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io(message.into())
    }

    /// `failed` of `total` nodes did not pass.
    pub fn validation_failed(failed: usize, total: usize) -> Self {
        Self::ValidationFailed { failed, total }
    }

    /// Wraps `self` with what was being done when it happened.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Self::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Process exit status; validation failures use [`EXIT_VALIDATION_FAILED`].
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) | Self::Configuration(_) => 1,
            Self::Initialization(_) => 2,
            Self::Runtime(_) => 3,
            Self::Io(_) => 4,
            Self::Transport(_) => 5,
            Self::Validator(_) => 6,
            Self::ValidationFailed { .. } => EXIT_VALIDATION_FAILED,
            Self::WithContext { source, .. } => source.exit_code(),
        }
    }

    /// Returns the client-stack error behind this one, if any.
    pub fn transport_error(&self) -> Option<&uacheck_opcua::OpcUaError> {
        match self {
            Self::Transport(e) | Self::Validator(uacheck_validator::ValidatorError::Transport(e)) => {
                Some(e)
            }
            Self::WithContext { source, .. } => source.transport_error(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

/// Prints `error`, its causes, and the code and hints of a client-stack error.
pub fn report_error(error: &CliError) {
    eprintln!("Error: {}", error);

    let mut cause = std::error::Error::source(error);
    while let Some(inner) = cause {
        eprintln!("  Caused by: {}", inner);
        cause = inner.source();
    }

    if let Some(transport) = error.transport_error() {
        transport.log("uacheck");
        eprintln!("  Code: {}", transport.error_code());
        for hint in transport.recovery_hints() {
            eprintln!("  Hint: {}", hint);
        }
    }
}

/// [`report_error`], then exit with the error's code.
pub fn report_error_and_exit(error: CliError) -> ! {
    report_error(&error);
    std::process::exit(error.exit_code())
}
