// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Errors raised while loading and checking a uacheck configuration.

use std::path::PathBuf;
use thiserror::Error;

/// Placeholder origin for configurations parsed from a string.
pub const INLINE_SOURCE: &str = "<inline>";

/// Why a configuration could not be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file does not exist.
    #[error("Configuration file not found: {path}")]
    FileNotFound {
        /// Requested path.
        path: PathBuf,
    },

    /// The file exists but cannot be read.
    #[error("Cannot read configuration file '{path}': {source}")]
    Io {
        /// Requested path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The extension names no known format.
    #[error("Unsupported configuration format '{format}' (use .yaml, .yml, .toml or .json)")]
    UnsupportedFormat {
        /// Offending extension.
        format: String,
    },

    /// The document is malformed or has fields of the wrong type.
    #[error("Cannot parse '{}': {message}", path.display())]
    Parse {
        /// File path, or [`INLINE_SOURCE`].
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// A `UACHECK_*` override has a value of the wrong form.
    #[error("Environment override {name} is invalid: {message}")]
    InvalidEnvVar {
        /// Variable name.
        name: String,
        /// Expected form.
        message: String,
    },

    /// A required setting is empty.
    #[error("Missing required setting: {field}")]
    MissingField {
        /// Dotted setting path.
        field: String,
    },

    /// A start node does not parse as a node id.
    #[error("'{node_id}' in {field} is not a node id: {message}")]
    InvalidNodeId {
        /// Dotted setting path.
        field: String,
        /// Offending string.
        node_id: String,
        /// Parser message.
        message: String,
    },

    /// A number is outside its accepted range.
    #[error("{field} = {value} is out of range {min}..={max}")]
    OutOfRange {
        /// Dotted setting path.
        field: String,
        /// Given value.
        value: String,
        /// Smallest accepted value.
        min: String,
        /// Largest accepted value.
        max: String,
    },

    /// A setting is well-formed but not acceptable.
    #[error("Invalid {field}: {message}")]
    Validation {
        /// Dotted setting path.
        field: String,
        /// What is wrong.
        message: String,
    },
}

impl ConfigError {
    /// `path` does not exist.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound { path: path.into() }
    }

    /// `path` cannot be read.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Unknown extension.
    pub fn unsupported_format(format: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    /// Malformed document.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Bad override value.
    pub fn invalid_env_var(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidEnvVar {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Empty required setting.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// Unparseable node id.
    pub fn invalid_node_id(
        field: impl Into<String>,
        node_id: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidNodeId {
            field: field.into(),
            node_id: node_id.into(),
            message: message.into(),
        }
    }

    /// Number outside `min..=max`.
    pub fn out_of_range<T: std::fmt::Display>(
        field: impl Into<String>,
        value: T,
        min: T,
        max: T,
    ) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
        }
    }

    /// Unacceptable setting.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns `true` when the file itself could not be opened.
    pub fn is_io_error(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::FileNotFound { .. })
    }

    /// Short kind name for log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::FileNotFound { .. } => "file_not_found",
            Self::Io { .. } => "io",
            Self::UnsupportedFormat { .. } => "unsupported_format",
            Self::Parse { .. } => "parse",
            Self::InvalidEnvVar { .. } => "invalid_env_var",
            Self::MissingField { .. } => "missing_field",
            Self::InvalidNodeId { .. } => "invalid_node_id",
            Self::OutOfRange { .. } => "out_of_range",
            Self::Validation { .. } => "validation",
        }
    }
}

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_setting() {
        let error = ConfigError::missing_field("server.endpoint");
        assert_eq!(error.to_string(), "Missing required setting: server.endpoint");
        assert_eq!(error.kind(), "missing_field");

        let error = ConfigError::invalid_node_id("validation.start_nodes", "ns=x", "bad namespace");
        assert_eq!(
            error.to_string(),
            "'ns=x' in validation.start_nodes is not a node id: bad namespace"
        );

        let error = ConfigError::out_of_range("validation.max_nodes", 0, 1, 1_000_000);
        assert_eq!(
            error.to_string(),
            "validation.max_nodes = 0 is out of range 1..=1000000"
        );
    }

    #[test]
    fn test_inline_parse_error() {
        let error = ConfigError::parse(INLINE_SOURCE, "expected a mapping");
        assert_eq!(error.to_string(), "Cannot parse '<inline>': expected a mapping");
        assert_eq!(error.kind(), "parse");
    }

    #[test]
    fn test_is_io_error() {
        let error = ConfigError::io(
            "uacheck.yaml",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(error.is_io_error());
        assert!(ConfigError::file_not_found("uacheck.yaml").is_io_error());
        assert!(!ConfigError::validation("output.dump", "cannot be empty").is_io_error());
    }
}
