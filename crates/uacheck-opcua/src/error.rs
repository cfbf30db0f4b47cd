// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Error types for the OPC UA client seam.
//!
//! Every failure of the client stack surfaces as an [`OpcUaError`]. Callers
//! split them in two: `Connection`, `Session` and `Timeout` mean the server
//! is gone for the rest of the run, everything else is local to the node or
//! attribute that was being read.
//!
//! # Error Categories
//!
//! ```text
//! OpcUaError
//! ├── Connection    - endpoint selection, channel, not connected
//! ├── Session       - session activation and loss
//! ├── Browse        - Browse / BrowseNext service failures
//! ├── Operation     - Read service failures and bad status codes
//! ├── Conversion    - attribute value of an unexpected type or domain
//! ├── Configuration - invalid client settings or node id strings
//! └── Timeout       - request deadline exceeded
//! ```
//!
//! # Examples
//!
//! ```
//! use uacheck_opcua::error::{OpcUaError, OperationError};
//!
//! let error = OpcUaError::operation(OperationError::bad_status("i=85", 0x8034_0000));
//! assert!(error.to_string().contains("BadNodeIdUnknown"));
//! assert_eq!(error.error_code().to_string(), "UA-0402");
//! ```

use std::fmt;
use std::time::Duration;

use thiserror::Error;
use tracing::Level;

// =============================================================================
// OpcUaError
// =============================================================================

/// Any failure of a read, browse or session operation.
#[derive(Debug, Error)]
pub enum OpcUaError {
    /// The server cannot be reached or is not connected.
    #[error("{0}")]
    Connection(#[from] ConnectionError),

    /// The session could not be activated or was lost.
    #[error("{0}")]
    Session(#[from] SessionError),

    /// A Browse or BrowseNext call failed.
    #[error("{0}")]
    Browse(#[from] BrowseError),

    /// A Read call failed or returned a bad status.
    #[error("{0}")]
    Operation(#[from] OperationError),

    /// An attribute value could not be interpreted.
    #[error("{0}")]
    Conversion(#[from] ConversionError),

    /// The client settings are invalid.
    #[error("{0}")]
    Configuration(#[from] ConfigurationError),

    /// A request ran past its deadline.
    #[error("{0}")]
    Timeout(#[from] TimeoutError),
}

impl OpcUaError {
    /// Wraps a connection error.
    pub fn connection(error: ConnectionError) -> Self {
        Self::Connection(error)
    }

    /// Wraps a session error.
    pub fn session(error: SessionError) -> Self {
        Self::Session(error)
    }

    /// Wraps a browse error.
    pub fn browse(error: BrowseError) -> Self {
        Self::Browse(error)
    }

    /// Wraps an operation error.
    pub fn operation(error: OperationError) -> Self {
        Self::Operation(error)
    }

    /// Wraps a conversion error.
    pub fn conversion(error: ConversionError) -> Self {
        Self::Conversion(error)
    }

    /// Wraps a configuration error.
    pub fn configuration(error: ConfigurationError) -> Self {
        Self::Configuration(error)
    }

    /// Wraps a timeout error.
    pub fn timeout(error: TimeoutError) -> Self {
        Self::Timeout(error)
    }

    /// No session is open.
    pub fn not_connected() -> Self {
        Self::Connection(ConnectionError::NotConnected)
    }

    /// The Read service call for a node failed.
    pub fn read_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Operation(OperationError::read_failed(node_id, message))
    }

    /// The Browse service call for a node failed.
    pub fn browse_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Browse(BrowseError::browse_failed(node_id, message))
    }

    /// Returns `true` if repeating the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Connection(e) => e.is_retryable(),
            Self::Session(e) => e.is_retryable(),
            Self::Browse(e) => e.is_retryable(),
            Self::Operation(e) => e.is_retryable(),
            Self::Timeout(_) => true,
            Self::Conversion(_) | Self::Configuration(_) => false,
        }
    }

    /// Returns how loudly the error should be reported.
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Connection(ConnectionError::NotConnected) => ErrorSeverity::Warning,
            Self::Connection(_) | Self::Session(_) | Self::Conversion(_) => ErrorSeverity::Error,
            Self::Browse(_) | Self::Operation(_) | Self::Timeout(_) => ErrorSeverity::Warning,
            Self::Configuration(_) => ErrorSeverity::Critical,
        }
    }

    /// Returns the category name used in log fields.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Connection(_) => "connection",
            Self::Session(_) => "session",
            Self::Browse(_) => "browse",
            Self::Operation(_) => "operation",
            Self::Conversion(_) => "conversion",
            Self::Configuration(_) => "configuration",
            Self::Timeout(_) => "timeout",
        }
    }

    /// Returns the `UA-XXYY` code of the error.
    pub fn error_code(&self) -> ErrorCode {
        match self {
            Self::Connection(e) => e.error_code(),
            Self::Session(e) => e.error_code(),
            Self::Browse(e) => e.error_code(),
            Self::Operation(e) => e.error_code(),
            Self::Conversion(e) => e.error_code(),
            Self::Configuration(e) => e.error_code(),
            Self::Timeout(_) => ErrorCode::new(7, 1),
        }
    }

    /// Returns what an operator can try next.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Connection(e) => e.recovery_hints(),
            Self::Session(_) => vec![
                "Check the user token and security settings",
                "Check the server's session limits",
            ],
            Self::Browse(_) => vec!["Check the browse permissions of the user"],
            Self::Operation(e) => e.recovery_hints(),
            Self::Conversion(_) => vec!["Inspect the node with a generic OPC UA browser"],
            Self::Configuration(e) => e.recovery_hints(),
            Self::Timeout(_) => vec!["Raise server.request_timeout"],
        }
    }

    /// Logs the error at the level its severity maps to.
    pub fn log(&self, context: &str) {
        let code = self.error_code();
        let retryable = self.is_retryable();

        match self.severity().to_tracing_level() {
            Level::ERROR => tracing::error!(
                error_code = %code,
                category = self.category(),
                context,
                retryable,
                "{self}"
            ),
            Level::WARN => tracing::warn!(
                error_code = %code,
                category = self.category(),
                context,
                retryable,
                "{self}"
            ),
            _ => tracing::info!(
                error_code = %code,
                category = self.category(),
                context,
                retryable,
                "{self}"
            ),
        }
    }
}

// =============================================================================
// Category errors
// =============================================================================

/// Endpoint and channel errors.
#[derive(Debug, Error)]
pub enum ConnectionError {
    /// The server refused or dropped the connection.
    #[error("Connection to '{endpoint}' refused: {message}")]
    Refused {
        /// Endpoint URL.
        endpoint: String,
        /// Stack message.
        message: String,
    },

    /// GetEndpoints failed.
    #[error("Cannot list endpoints of '{endpoint}'")]
    EndpointNotFound {
        /// Endpoint URL and stack message.
        endpoint: String,
    },

    /// No endpoint offers the configured security.
    #[error("Server offers no endpoint for security '{security}'")]
    NoSuitableEndpoint {
        /// `policy/mode` that was asked for.
        security: String,
    },

    /// The client stack rejected its own settings.
    #[error("Cannot initialise OPC UA client: {message}")]
    ClientInit {
        /// Stack message.
        message: String,
    },

    /// No session is open.
    #[error("Not connected to an OPC UA server")]
    NotConnected,
}

impl ConnectionError {
    /// The server refused or dropped the connection.
    pub fn refused(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Refused {
            endpoint: endpoint.into(),
            message: message.into(),
        }
    }

    /// GetEndpoints failed.
    pub fn endpoint_not_found(endpoint: impl Into<String>) -> Self {
        Self::EndpointNotFound {
            endpoint: endpoint.into(),
        }
    }

    /// No endpoint offers `security`.
    pub fn no_suitable_endpoint(security: impl Into<String>) -> Self {
        Self::NoSuitableEndpoint {
            security: security.into(),
        }
    }

    /// The client stack rejected its settings.
    pub fn client_init(message: impl Into<String>) -> Self {
        Self::ClientInit {
            message: message.into(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Refused { .. } | Self::NotConnected)
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::Refused { .. } => ErrorCode::new(1, 1),
            Self::EndpointNotFound { .. } => ErrorCode::new(1, 2),
            Self::NoSuitableEndpoint { .. } => ErrorCode::new(1, 3),
            Self::ClientInit { .. } => ErrorCode::new(1, 4),
            Self::NotConnected => ErrorCode::new(1, 5),
        }
    }

    fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::Refused { .. } | Self::EndpointNotFound { .. } => vec![
                "Check that the server is running",
                "Check the endpoint URL, e.g. opc.tcp://host:4840",
            ],
            Self::NoSuitableEndpoint { .. } => {
                vec!["Match server.security_mode and server.security_policy to the server"]
            }
            Self::ClientInit { .. } => vec!["Check that server.pki_dir is writable"],
            Self::NotConnected => vec!["Connect before reading or browsing"],
        }
    }
}

/// Session errors.
#[derive(Debug, Error)]
pub enum SessionError {
    /// CreateSession or ActivateSession failed.
    #[error("Cannot open session: {message}")]
    CreationFailed {
        /// Stack message.
        message: String,
    },

    /// The server closed or forgot the session.
    #[error("Session lost: {reason}")]
    Closed {
        /// Status reported by the server.
        reason: String,
    },
}

impl SessionError {
    /// CreateSession or ActivateSession failed.
    pub fn creation_failed(message: impl Into<String>) -> Self {
        Self::CreationFailed {
            message: message.into(),
        }
    }

    /// The session was lost.
    pub fn closed(reason: impl Into<String>) -> Self {
        Self::Closed {
            reason: reason.into(),
        }
    }

    fn is_retryable(&self) -> bool {
        matches!(self, Self::Closed { .. })
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::CreationFailed { .. } => ErrorCode::new(2, 1),
            Self::Closed { .. } => ErrorCode::new(2, 2),
        }
    }
}

/// Browse service errors.
#[derive(Debug, Error)]
pub enum BrowseError {
    /// Browse or BrowseNext failed for a node.
    #[error("Browse failed for node '{node_id}': {message}")]
    BrowseFailed {
        /// Browsed node.
        node_id: String,
        /// Stack message or status.
        message: String,
    },

    /// The continuation point was rejected or never ran out.
    #[error("Continuation point of '{node_id}' is invalid or exhausted")]
    BadContinuationPoint {
        /// Browsed node.
        node_id: String,
    },
}

impl BrowseError {
    /// Browse failed for `node_id`.
    pub fn browse_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BrowseFailed {
            node_id: node_id.into(),
            message: message.into(),
        }
    }

    /// The continuation point of `node_id` was bad.
    pub fn bad_continuation_point(node_id: impl Into<String>) -> Self {
        Self::BadContinuationPoint {
            node_id: node_id.into(),
        }
    }

    fn is_retryable(&self) -> bool {
        true
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::BrowseFailed { .. } => ErrorCode::new(3, 1),
            Self::BadContinuationPoint { .. } => ErrorCode::new(3, 2),
        }
    }
}

/// Read service errors.
#[derive(Debug, Error)]
pub enum OperationError {
    /// The Read call itself failed.
    #[error("Read failed for node '{node_id}': {message}")]
    ReadFailed {
        /// Read node.
        node_id: String,
        /// Stack message.
        message: String,
    },

    /// The Read call succeeded but the value carries a bad status.
    #[error("Bad status code {status_code:#010x} ({status_name}) for node '{node_id}'")]
    BadStatus {
        /// Read node.
        node_id: String,
        /// Raw status code.
        status_code: u32,
        /// Symbolic name, see [`OperationError::status_code_name`].
        status_name: String,
    },
}

impl OperationError {
    /// The Read call for `node_id` failed.
    pub fn read_failed(node_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReadFailed {
            node_id: node_id.into(),
            message: message.into(),
        }
    }

    /// `node_id` was read with a bad status.
    pub fn bad_status(node_id: impl Into<String>, status_code: u32) -> Self {
        Self::BadStatus {
            node_id: node_id.into(),
            status_code,
            status_name: Self::status_code_name(status_code).to_string(),
        }
    }

    /// Returns the raw status code, if any.
    pub fn status_code(&self) -> Option<u32> {
        match self {
            Self::BadStatus { status_code, .. } => Some(*status_code),
            Self::ReadFailed { .. } => None,
        }
    }

    /// Symbolic name of the status codes a validation run meets.
    ///
    /// Only the severity and sub-code bits are compared.
    pub fn status_code_name(code: u32) -> &'static str {
        match code & 0xFFFF_0000 {
            0x0000_0000 => "Good",
            0x8000_0000 => "Bad",
            0x8001_0000 => "BadUnexpectedError",
            0x8002_0000 => "BadInternalError",
            0x8005_0000 => "BadCommunicationError",
            0x8007_0000 => "BadDecodingError",
            0x800A_0000 => "BadTimeout",
            0x800B_0000 => "BadServiceUnsupported",
            0x800D_0000 => "BadServerNotConnected",
            0x800E_0000 => "BadServerHalted",
            0x8010_0000 => "BadTooManyOperations",
            0x801F_0000 => "BadUserAccessDenied",
            0x8025_0000 => "BadSessionIdInvalid",
            0x8026_0000 => "BadSessionClosed",
            0x8027_0000 => "BadSessionNotActivated",
            0x8033_0000 => "BadNodeIdInvalid",
            0x8034_0000 => "BadNodeIdUnknown",
            0x8035_0000 => "BadAttributeIdInvalid",
            0x803A_0000 => "BadNotReadable",
            0x803D_0000 => "BadNotSupported",
            0x803E_0000 => "BadNotFound",
            0x804A_0000 => "BadContinuationPointInvalid",
            0x804B_0000 => "BadNoContinuationPoints",
            0x804C_0000 => "BadReferenceTypeIdInvalid",
            0x804D_0000 => "BadBrowseDirectionInvalid",
            0x804E_0000 => "BadNodeNotInView",
            0x8074_0000 => "BadTypeMismatch",
            0x80AE_0000 => "BadConnectionClosed",
            _ if code & 0x8000_0000 != 0 => "BadUnknown",
            _ if code & 0x4000_0000 != 0 => "Uncertain",
            _ => "Good",
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            Self::ReadFailed { .. } => true,
            Self::BadStatus { status_code, .. } => matches!(
                status_code & 0xFFFF_0000,
                0x8005_0000 | 0x800A_0000 | 0x8010_0000
            ),
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::ReadFailed { .. } => ErrorCode::new(4, 1),
            Self::BadStatus { .. } => ErrorCode::new(4, 2),
        }
    }

    fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::ReadFailed { .. } => vec!["Check the server connection"],
            Self::BadStatus { .. } => vec![
                "Check that the attribute applies to the node class",
                "Check the read permissions of the user",
            ],
        }
    }
}

/// Attribute value errors.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// The value has the wrong variant type.
    #[error("Type mismatch for {attribute}: expected {expected}, got {actual}")]
    TypeMismatch {
        /// Attribute name.
        attribute: String,
        /// Expected type.
        expected: String,
        /// Received type.
        actual: String,
    },

    /// The value has the right type but is out of its domain.
    #[error("Invalid value for {attribute}: {message}")]
    InvalidValue {
        /// Attribute name.
        attribute: String,
        /// What is wrong with it.
        message: String,
    },

    /// The attribute is Good but empty.
    #[error("Missing value for {attribute}")]
    NullValue {
        /// Attribute name.
        attribute: String,
    },
}

impl ConversionError {
    /// Wrong variant type.
    pub fn type_mismatch(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            attribute: attribute.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Value out of its domain.
    pub fn invalid_value(attribute: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            attribute: attribute.into(),
            message: message.into(),
        }
    }

    /// Empty value.
    pub fn null_value(attribute: impl Into<String>) -> Self {
        Self::NullValue {
            attribute: attribute.into(),
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::TypeMismatch { .. } => ErrorCode::new(5, 1),
            Self::InvalidValue { .. } => ErrorCode::new(5, 2),
            Self::NullValue { .. } => ErrorCode::new(5, 3),
        }
    }
}

/// Client settings errors.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The endpoint is not an `opc.tcp://` URL.
    #[error("Invalid endpoint URL: {url} ({reason})")]
    InvalidEndpoint {
        /// Given URL.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A node id string does not parse.
    #[error("Invalid node ID format: {node_id} ({reason})")]
    InvalidNodeId {
        /// Given string.
        node_id: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Security mode, policy and user token do not fit together.
    #[error("Invalid security configuration: {message}")]
    InvalidSecurity {
        /// What does not fit.
        message: String,
    },

    /// A timeout is zero or too large.
    #[error("Invalid timeout: {duration:?} ({reason})")]
    InvalidTimeout {
        /// Given duration.
        duration: Duration,
        /// Why it was rejected.
        reason: String,
    },

    /// A required setting is empty.
    #[error("Missing required configuration: {field}")]
    MissingField {
        /// Setting name.
        field: String,
    },

    /// Unknown security mode name.
    #[error("Invalid security mode: {mode}")]
    InvalidSecurityMode {
        /// Given name.
        mode: String,
    },

    /// Unknown security policy name.
    #[error("Invalid security policy: {policy}")]
    InvalidSecurityPolicy {
        /// Given name.
        policy: String,
    },
}

impl ConfigurationError {
    /// Rejected endpoint URL.
    pub fn invalid_endpoint(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidEndpoint {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Rejected node id string.
    pub fn invalid_node_id(node_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidNodeId {
            node_id: node_id.into(),
            reason: reason.into(),
        }
    }

    /// Inconsistent security settings.
    pub fn invalid_security(message: impl Into<String>) -> Self {
        Self::InvalidSecurity {
            message: message.into(),
        }
    }

    /// Rejected timeout.
    pub fn invalid_timeout(duration: Duration, reason: impl Into<String>) -> Self {
        Self::InvalidTimeout {
            duration,
            reason: reason.into(),
        }
    }

    /// Empty required setting.
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField { field: field.into() }
    }

    /// Unknown security mode.
    pub fn invalid_security_mode(mode: impl Into<String>) -> Self {
        Self::InvalidSecurityMode { mode: mode.into() }
    }

    /// Unknown security policy.
    pub fn invalid_security_policy(policy: impl Into<String>) -> Self {
        Self::InvalidSecurityPolicy {
            policy: policy.into(),
        }
    }

    fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidEndpoint { .. } => ErrorCode::new(6, 1),
            Self::InvalidNodeId { .. } => ErrorCode::new(6, 2),
            Self::InvalidSecurity { .. } => ErrorCode::new(6, 3),
            Self::InvalidTimeout { .. } => ErrorCode::new(6, 4),
            Self::MissingField { .. } => ErrorCode::new(6, 5),
            Self::InvalidSecurityMode { .. } => ErrorCode::new(6, 6),
            Self::InvalidSecurityPolicy { .. } => ErrorCode::new(6, 7),
        }
    }

    /// Returns what to change in the configuration.
    pub fn recovery_hints(&self) -> Vec<&'static str> {
        match self {
            Self::InvalidEndpoint { .. } => vec!["Use opc.tcp://host:port[/path]"],
            Self::InvalidNodeId { .. } => vec![
                "Use ns=<index>;i=<number>, ns=<index>;s=<text>, g=<guid> or b=<base64>",
                "Namespace 0 may omit the prefix, e.g. i=85",
            ],
            Self::InvalidSecurity { .. }
            | Self::InvalidSecurityMode { .. }
            | Self::InvalidSecurityPolicy { .. } => vec![
                "Modes: None, Sign, SignAndEncrypt",
                "Policy None goes with mode None only",
            ],
            Self::InvalidTimeout { .. } => vec!["Use humantime syntax, e.g. 5s or 500ms"],
            Self::MissingField { .. } => vec!["Set it in the file, on the command line or via UACHECK_*"],
        }
    }
}

/// Request deadline errors.
#[derive(Debug, Error)]
#[error("Request timed out after {duration:?}")]
pub struct TimeoutError {
    duration: Duration,
}

impl TimeoutError {
    /// A request ran past `duration`.
    pub fn request(duration: Duration) -> Self {
        Self { duration }
    }

    /// Returns the deadline that was exceeded.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

// =============================================================================
// ErrorSeverity / ErrorCode
// =============================================================================

/// Reporting severity of an [`OpcUaError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ErrorSeverity {
    /// Worth a note.
    Info,
    /// The run goes on.
    Warning,
    /// The operation failed.
    Error,
    /// Nothing can run until the configuration is fixed.
    Critical,
}

impl ErrorSeverity {
    /// Maps to a tracing level.
    pub fn to_tracing_level(self) -> Level {
        match self {
            Self::Info => Level::INFO,
            Self::Warning => Level::WARN,
            Self::Error | Self::Critical => Level::ERROR,
        }
    }

    /// Returns the lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `UA-XXYY` error code: XX is the category (1 connection, 2 session,
/// 3 browse, 4 operation, 5 conversion, 6 configuration, 7 timeout), YY
/// the error within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ErrorCode {
    /// Category number.
    pub category: u8,
    /// Error number within the category.
    pub code: u8,
}

impl ErrorCode {
    /// Creates an error code.
    pub const fn new(category: u8, code: u8) -> Self {
        Self { category, code }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "UA-{:02}{:02}", self.category, self.code)
    }
}

/// Result alias for client-seam operations.
pub type OpcUaResult<T> = Result<T, OpcUaError>;
