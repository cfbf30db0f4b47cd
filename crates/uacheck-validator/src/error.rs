// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Validator error types.
//!
//! Rule violations and per-attribute read failures are diagnostics, not
//! errors. A [`ValidatorError`] means the run itself cannot continue: the
//! dump sink failed, the client lost its connection, or the policy was
//! misconfigured.

use thiserror::Error;
use uacheck_opcua::OpcUaError;

/// Errors that abort a validation run.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Writing the dump failed.
    #[error("Failed to write dump: {0}")]
    Io(#[from] std::io::Error),

    /// The client stack failed in a way that affects every further request.
    #[error("Transport failure: {0}")]
    Transport(#[from] OpcUaError),

    /// A rule, severity or profile name was invalid.
    #[error("Invalid rule policy: {message}")]
    InvalidPolicy {
        /// Error message.
        message: String,
    },
}

impl ValidatorError {
    /// Creates an invalid policy error.
    pub fn invalid_policy(message: impl Into<String>) -> Self {
        Self::InvalidPolicy {
            message: message.into(),
        }
    }

    /// Returns `true` if retrying the run after reconnecting may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_retryable(),
            _ => false,
        }
    }
}

/// Result type for validator operations.
pub type ValidatorResult<T> = Result<T, ValidatorError>;

/// Returns `true` if a client error invalidates every further request.
///
/// Lost connections, closed sessions and timeouts end the run. Everything
/// else is local to one attribute or one browse and becomes a diagnostic.
pub(crate) fn is_fatal(error: &OpcUaError) -> bool {
    matches!(
        error,
        OpcUaError::Connection(_) | OpcUaError::Session(_) | OpcUaError::Timeout(_)
    )
}
