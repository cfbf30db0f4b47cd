// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address-space vocabulary shared by the client seam and the validator.
//!
//! Node ids, node classes, attribute ids and the namespace-0 nodes the
//! information-model rules refer to, plus [`OpcUaConfig`] for opening a
//! session.
//!
//! ```
//! use uacheck_opcua::types::{ids, NodeClass, NodeId};
//!
//! let node: NodeId = "ns=2;s=Pump.Speed".parse().unwrap();
//! assert_eq!(node.namespace_index, 2);
//!
//! assert_eq!(ids::HAS_PROPERTY.as_numeric(), Some(46));
//! assert_eq!(NodeClass::from_value(2), Some(NodeClass::Variable));
//! ```

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{ConfigurationError, OpcUaError};

// =============================================================================
// NodeId
// =============================================================================

/// Address of a node: a namespace index plus an identifier.
///
/// Printed in the usual text form, with `ns=0;` left out:
///
/// ```
/// use uacheck_opcua::types::NodeId;
///
/// assert_eq!(NodeId::numeric(0, 85).to_string(), "i=85");
/// assert_eq!(NodeId::string(2, "Line1").to_string(), "ns=2;s=Line1");
/// assert_eq!("ns=2;i=7".parse::<NodeId>().unwrap(), NodeId::numeric(2, 7));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId {
    /// Index into the server's namespace array.
    pub namespace_index: u16,
    /// Identifier within the namespace.
    pub identifier: NodeIdentifier,
}

impl NodeId {
    /// Root folder, `i=84`.
    pub const ROOT_FOLDER: NodeId = NodeId::ns0(84);
    /// Objects folder, `i=85`.
    pub const OBJECTS_FOLDER: NodeId = NodeId::ns0(85);
    /// Types folder, `i=86`.
    pub const TYPES_FOLDER: NodeId = NodeId::ns0(86);
    /// Views folder, `i=87`.
    pub const VIEWS_FOLDER: NodeId = NodeId::ns0(87);

    /// `ns=<namespace_index>;i=<value>`
    pub const fn numeric(namespace_index: u16, value: u32) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Numeric(value),
        }
    }

    /// `i=<value>` in namespace 0.
    pub const fn ns0(value: u32) -> Self {
        Self::numeric(0, value)
    }

    /// `ns=<namespace_index>;s=<value>`
    pub fn string(namespace_index: u16, value: impl Into<String>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::String(value.into()),
        }
    }

    /// `ns=<namespace_index>;g=<value>`
    pub fn guid(namespace_index: u16, value: Uuid) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Guid(value),
        }
    }

    /// `ns=<namespace_index>;b=<base64 of value>`
    pub fn opaque(namespace_index: u16, value: Vec<u8>) -> Self {
        Self {
            namespace_index,
            identifier: NodeIdentifier::Opaque(value),
        }
    }

    /// The null node id, `i=0`.
    pub const fn null() -> Self {
        Self::ns0(0)
    }

    /// Returns `true` for `i=0`.
    pub fn is_null(&self) -> bool {
        *self == Self::null()
    }

    /// Returns the numeric identifier, if the id is numeric.
    pub fn as_numeric(&self) -> Option<u32> {
        match self.identifier {
            NodeIdentifier::Numeric(value) => Some(value),
            _ => None,
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.namespace_index != 0 {
            write!(f, "ns={};", self.namespace_index)?;
        }
        write!(f, "{}", self.identifier)
    }
}

impl FromStr for NodeId {
    type Err = OpcUaError;

    /// Accepts `[ns=<u16>;]{i=<u32>|s=<text>|g=<guid>|b=<base64>}`,
    /// ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let reject = |reason: &str| {
            OpcUaError::configuration(ConfigurationError::invalid_node_id(text, reason))
        };

        let (namespace_index, rest) = match text.strip_prefix("ns=") {
            None => (0, text),
            Some(rest) => {
                let (ns, id) = rest
                    .split_once(';')
                    .ok_or_else(|| reject("namespace is not followed by ';'"))?;
                let ns = ns
                    .parse::<u16>()
                    .map_err(|_| reject("namespace index is not a 16-bit number"))?;
                (ns, id)
            }
        };

        let (kind, value) = rest
            .split_once('=')
            .ok_or_else(|| reject("expected i=, s=, g= or b="))?;
        let identifier = match kind {
            "i" => NodeIdentifier::Numeric(
                value
                    .parse()
                    .map_err(|_| reject("numeric identifier is not a 32-bit number"))?,
            ),
            "s" => NodeIdentifier::String(value.to_string()),
            "g" => NodeIdentifier::Guid(
                Uuid::parse_str(value).map_err(|e| reject(&format!("bad GUID: {}", e)))?,
            ),
            "b" => NodeIdentifier::Opaque(
                BASE64
                    .decode(value)
                    .map_err(|e| reject(&format!("bad base64: {}", e)))?,
            ),
            _ => return Err(reject("expected i=, s=, g= or b=")),
        };

        Ok(Self {
            namespace_index,
            identifier,
        })
    }
}

/// The four identifier kinds of a [`NodeId`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "value")]
pub enum NodeIdentifier {
    /// `i=`
    Numeric(u32),
    /// `s=`
    String(String),
    /// `g=`
    Guid(Uuid),
    /// `b=`, printed as base64.
    Opaque(Vec<u8>),
}

impl fmt::Display for NodeIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(v) => write!(f, "i={}", v),
            Self::String(v) => write!(f, "s={}", v),
            Self::Guid(v) => write!(f, "g={}", v),
            Self::Opaque(v) => write!(f, "b={}", BASE64.encode(v)),
        }
    }
}

// =============================================================================
// Well-known nodes
// =============================================================================

/// Well-known namespace-0 node ids used by the information-model rules.
pub mod ids {
    use super::NodeId;

    /// References (abstract root of all reference types) - i=31.
    pub const REFERENCES: NodeId = NodeId::ns0(31);
    /// NonHierarchicalReferences - i=32.
    pub const NON_HIERARCHICAL_REFERENCES: NodeId = NodeId::ns0(32);
    /// HierarchicalReferences - i=33.
    pub const HIERARCHICAL_REFERENCES: NodeId = NodeId::ns0(33);
    /// HasChild - i=34.
    pub const HAS_CHILD: NodeId = NodeId::ns0(34);
    /// Organizes - i=35.
    pub const ORGANIZES: NodeId = NodeId::ns0(35);
    /// HasModellingRule - i=37.
    pub const HAS_MODELLING_RULE: NodeId = NodeId::ns0(37);
    /// HasEncoding - i=38.
    pub const HAS_ENCODING: NodeId = NodeId::ns0(38);
    /// HasTypeDefinition - i=40.
    pub const HAS_TYPE_DEFINITION: NodeId = NodeId::ns0(40);
    /// Aggregates - i=44.
    pub const AGGREGATES: NodeId = NodeId::ns0(44);
    /// HasSubtype - i=45.
    pub const HAS_SUBTYPE: NodeId = NodeId::ns0(45);
    /// HasProperty - i=46.
    pub const HAS_PROPERTY: NodeId = NodeId::ns0(46);
    /// HasComponent - i=47.
    pub const HAS_COMPONENT: NodeId = NodeId::ns0(47);

    /// BaseDataType - i=24.
    pub const BASE_DATA_TYPE: NodeId = NodeId::ns0(24);
    /// Structure - i=22.
    pub const STRUCTURE: NodeId = NodeId::ns0(22);
    /// UInteger - i=28.
    pub const UINTEGER: NodeId = NodeId::ns0(28);
    /// Enumeration - i=29.
    pub const ENUMERATION: NodeId = NodeId::ns0(29);
    /// DataTypeDefinition (abstract data type) - i=97.
    pub const DATA_TYPE_DEFINITION: NodeId = NodeId::ns0(97);
    /// OptionSetValues property - i=12745.
    pub const OPTION_SET_VALUES: NodeId = NodeId::ns0(12745);
    /// OptionSet - i=12755.
    pub const OPTION_SET: NodeId = NodeId::ns0(12755);

    /// BaseObjectType - i=58.
    pub const BASE_OBJECT_TYPE: NodeId = NodeId::ns0(58);
    /// FolderType - i=61.
    pub const FOLDER_TYPE: NodeId = NodeId::ns0(61);
    /// BaseDataVariableType - i=63.
    pub const BASE_DATA_VARIABLE_TYPE: NodeId = NodeId::ns0(63);
    /// PropertyType - i=68.
    pub const PROPERTY_TYPE: NodeId = NodeId::ns0(68);
    /// ModellingRule Mandatory - i=78.
    pub const MODELLING_RULE_MANDATORY: NodeId = NodeId::ns0(78);
    /// ModellingRule Optional - i=80.
    pub const MODELLING_RULE_OPTIONAL: NodeId = NodeId::ns0(80);

    /// Encoding id of a binary-encoded StructureDefinition - i=122.
    pub const STRUCTURE_DEFINITION_ENCODING: NodeId = NodeId::ns0(122);
    /// Encoding id of a binary-encoded EnumDefinition - i=123.
    pub const ENUM_DEFINITION_ENCODING: NodeId = NodeId::ns0(123);

    /// Browse name of the OptionSetValues property.
    pub const OPTION_SET_VALUES_NAME: &str = "OptionSetValues";

    /// Returns the standard browse name of a well-known reference type.
    pub fn reference_type_name(node_id: &NodeId) -> Option<&'static str> {
        if node_id.namespace_index != 0 {
            return None;
        }
        let name = match node_id.as_numeric()? {
            31 => "References",
            32 => "NonHierarchicalReferences",
            33 => "HierarchicalReferences",
            34 => "HasChild",
            35 => "Organizes",
            36 => "HasEventSource",
            37 => "HasModellingRule",
            38 => "HasEncoding",
            39 => "HasDescription",
            40 => "HasTypeDefinition",
            41 => "GeneratesEvent",
            44 => "Aggregates",
            45 => "HasSubtype",
            46 => "HasProperty",
            47 => "HasComponent",
            48 => "HasNotifier",
            49 => "HasOrderedComponent",
            _ => return None,
        };
        Some(name)
    }
}

// =============================================================================
// Names
// =============================================================================

/// A name qualified by a namespace index, as used by the BrowseName attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Namespace index of the name.
    pub namespace_index: u16,
    /// The name text.
    pub name: String,
}

impl QualifiedName {
    /// Creates a qualified name.
    pub fn new(namespace_index: u16, name: impl Into<String>) -> Self {
        Self {
            namespace_index,
            name: name.into(),
        }
    }

    /// Returns `true` if the name text is empty.
    pub fn is_null(&self) -> bool {
        self.name.is_empty()
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace_index, self.name)
    }
}

/// Human-readable text with an optional locale.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LocalizedText {
    /// Locale identifier (e.g. `en-US`), empty when unspecified.
    #[serde(default)]
    pub locale: String,
    /// The text.
    pub text: String,
}

impl LocalizedText {
    /// Creates a localized text.
    pub fn new(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            text: text.into(),
        }
    }

    /// Creates a localized text without locale.
    pub fn text(text: impl Into<String>) -> Self {
        Self::new("", text)
    }
}

impl fmt::Display for LocalizedText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}


// =============================================================================
// Session settings
// =============================================================================

/// Message security mode of the secure channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityMode {
    /// Plain messages.
    #[default]
    None,
    /// Signed messages.
    Sign,
    /// Signed and encrypted messages.
    SignAndEncrypt,
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Sign => "Sign",
            Self::SignAndEncrypt => "SignAndEncrypt",
        })
    }
}

impl FromStr for SecurityMode {
    type Err = OpcUaError;

    /// Case-insensitive; `-` and `_` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "none" => Ok(Self::None),
            "sign" => Ok(Self::Sign),
            "signandencrypt" => Ok(Self::SignAndEncrypt),
            _ => Err(ConfigurationError::invalid_security_mode(s).into()),
        }
    }
}

/// Security policy of the secure channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecurityPolicy {
    /// No signing or encryption.
    #[default]
    None,
    /// Basic128Rsa15 (deprecated).
    Basic128Rsa15,
    /// Basic256 (deprecated).
    Basic256,
    /// Basic256Sha256
    Basic256Sha256,
    /// Aes128_Sha256_RsaOaep
    Aes128Sha256RsaOaep,
    /// Aes256_Sha256_RsaPss
    Aes256Sha256RsaPss,
}

impl fmt::Display for SecurityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::None => "None",
            Self::Basic128Rsa15 => "Basic128Rsa15",
            Self::Basic256 => "Basic256",
            Self::Basic256Sha256 => "Basic256Sha256",
            Self::Aes128Sha256RsaOaep => "Aes128Sha256RsaOaep",
            Self::Aes256Sha256RsaPss => "Aes256Sha256RsaPss",
        })
    }
}

impl FromStr for SecurityPolicy {
    type Err = OpcUaError;

    /// Case-insensitive; `-` and `_` are ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "none" => Ok(Self::None),
            "basic128rsa15" => Ok(Self::Basic128Rsa15),
            "basic256" => Ok(Self::Basic256),
            "basic256sha256" => Ok(Self::Basic256Sha256),
            "aes128sha256rsaoaep" => Ok(Self::Aes128Sha256RsaOaep),
            "aes256sha256rsapss" => Ok(Self::Aes256Sha256RsaPss),
            _ => Err(ConfigurationError::invalid_security_policy(s).into()),
        }
    }
}

fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Identity presented when activating the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserTokenType {
    /// No identity.
    #[default]
    Anonymous,
    /// User name and password.
    UserName {
        /// User name.
        username: String,
        /// Password; never printed.
        password: String,
    },
    /// X.509 user certificate.
    Certificate {
        /// DER or PEM certificate file.
        certificate_path: String,
        /// Matching private key file.
        private_key_path: String,
    },
}

impl fmt::Display for UserTokenType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("Anonymous"),
            Self::UserName { username, .. } => write!(f, "UserName({})", username),
            Self::Certificate {
                certificate_path, ..
            } => write!(f, "Certificate({})", certificate_path),
        }
    }
}

/// How to reach and log on to the server under test.
///
/// Durations are written in humantime syntax (`10s`, `500ms`).
///
/// ```
/// use uacheck_opcua::types::OpcUaConfig;
///
/// let config = OpcUaConfig::builder()
///     .endpoint("opc.tcp://localhost:4840")
///     .build()
///     .unwrap();
/// assert_eq!(config.application_uri(), "urn:uacheck:uacheck");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpcUaConfig {
    /// `opc.tcp://host:port[/path]`
    #[serde(default)]
    pub endpoint: String,

    /// Channel security mode.
    #[serde(default)]
    pub security_mode: SecurityMode,

    /// Channel security policy.
    #[serde(default)]
    pub security_policy: SecurityPolicy,

    /// Session identity.
    #[serde(default)]
    pub user_token: UserTokenType,

    /// Client application name; also forms the application URI.
    #[serde(default = "default_application_name")]
    pub application_name: String,

    /// Requested session lifetime.
    #[serde(default = "default_session_timeout", with = "humantime_serde")]
    pub session_timeout: Duration,

    /// Deadline of a single Read or Browse call.
    #[serde(default = "default_request_timeout", with = "humantime_serde")]
    pub request_timeout: Duration,

    /// Client certificate store.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pki_dir: Option<String>,

    /// Accept any server certificate.
    #[serde(default)]
    pub trust_all_certificates: bool,
}

fn default_application_name() -> String {
    "uacheck".to_string()
}

fn default_session_timeout() -> Duration {
    Duration::from_secs(60)
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(10)
}

impl OpcUaConfig {
    /// Starts a builder.
    pub fn builder() -> OpcUaConfigBuilder {
        OpcUaConfigBuilder::default()
    }

    /// Application URI sent to the server.
    pub fn application_uri(&self) -> String {
        format!("urn:uacheck:{}", self.application_name.replace(' ', ""))
    }

    /// Checks the settings without contacting the server.
    pub fn validate(&self) -> Result<(), OpcUaError> {
        if self.endpoint.is_empty() {
            return Err(ConfigurationError::missing_field("endpoint").into());
        }
        if !self.endpoint.starts_with("opc.tcp://") {
            return Err(
                ConfigurationError::invalid_endpoint(&self.endpoint, "scheme must be opc.tcp")
                    .into(),
            );
        }

        let plain_mode = self.security_mode == SecurityMode::None;
        let plain_policy = self.security_policy == SecurityPolicy::None;
        if plain_mode != plain_policy {
            return Err(ConfigurationError::invalid_security(format!(
                "mode {} cannot be combined with policy {}",
                self.security_mode, self.security_policy
            ))
            .into());
        }

        for (value, what) in [
            (self.session_timeout, "session timeout"),
            (self.request_timeout, "request timeout"),
        ] {
            if value.is_zero() {
                return Err(
                    ConfigurationError::invalid_timeout(value, format!("{} must be positive", what))
                        .into(),
                );
            }
        }
        Ok(())
    }
}

impl Default for OpcUaConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            security_mode: SecurityMode::None,
            security_policy: SecurityPolicy::None,
            user_token: UserTokenType::Anonymous,
            application_name: default_application_name(),
            session_timeout: default_session_timeout(),
            request_timeout: default_request_timeout(),
            pki_dir: None,
            trust_all_certificates: false,
        }
    }
}

/// Builder for [`OpcUaConfig`]; [`build`](Self::build) validates.
#[derive(Debug, Default)]
pub struct OpcUaConfigBuilder {
    config: OpcUaConfig,
}

impl OpcUaConfigBuilder {
    /// Server endpoint.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.config.endpoint = endpoint.into();
        self
    }

    /// Channel security.
    pub fn security(mut self, mode: SecurityMode, policy: SecurityPolicy) -> Self {
        self.config.security_mode = mode;
        self.config.security_policy = policy;
        self
    }

    /// Session identity.
    pub fn user_token(mut self, token: UserTokenType) -> Self {
        self.config.user_token = token;
        self
    }

    /// Per-call deadline.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Validates and returns the configuration.
    pub fn build(self) -> Result<OpcUaConfig, OpcUaError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

// =============================================================================
// Wire enumerations
// =============================================================================

/// Which way a Browse follows references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BrowseDirection {
    /// Source to target.
    #[default]
    Forward,
    /// Target to source.
    Inverse,
    /// Either way.
    Both,
}

impl BrowseDirection {
    /// Returns `true` if a reference stored with `is_forward` is returned.
    pub const fn matches(&self, is_forward: bool) -> bool {
        match self {
            Self::Forward => is_forward,
            Self::Inverse => !is_forward,
            Self::Both => true,
        }
    }
}

impl fmt::Display for BrowseDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Class of a node.
///
/// `Unspecified` is wire value 0; a node reporting it is malformed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
pub enum NodeClass {
    /// 0
    Unspecified = 0,
    /// 1
    Object = 1,
    /// 2
    Variable = 2,
    /// 4
    Method = 4,
    /// 8
    ObjectType = 8,
    /// 16
    VariableType = 16,
    /// 32
    ReferenceType = 32,
    /// 64
    DataType = 64,
    /// 128
    View = 128,
}

impl NodeClass {
    const ALL: [NodeClass; 9] = [
        Self::Unspecified,
        Self::Object,
        Self::Variable,
        Self::Method,
        Self::ObjectType,
        Self::VariableType,
        Self::ReferenceType,
        Self::DataType,
        Self::View,
    ];

    /// Wire value, a single bit of the node class mask (0 for `Unspecified`).
    pub const fn value(&self) -> u32 {
        *self as u32
    }

    /// Maps a wire value back; anything but a known single bit or 0 is `None`.
    pub fn from_value(value: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|class| class.value() == value)
    }

    /// Name as printed in dumps and messages.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unspecified => "Unspecified",
            Self::Object => "Object",
            Self::Variable => "Variable",
            Self::Method => "Method",
            Self::ObjectType => "ObjectType",
            Self::VariableType => "VariableType",
            Self::ReferenceType => "ReferenceType",
            Self::DataType => "DataType",
            Self::View => "View",
        }
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Attribute ids 1 to 26.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u32)]
#[allow(missing_docs)]
pub enum AttributeId {
    NodeId = 1,
    NodeClass,
    BrowseName,
    DisplayName,
    Description,
    WriteMask,
    UserWriteMask,
    IsAbstract,
    Symmetric,
    InverseName,
    ContainsNoLoops,
    EventNotifier,
    #[default]
    Value,
    DataType,
    ValueRank,
    ArrayDimensions,
    AccessLevel,
    UserAccessLevel,
    MinimumSamplingInterval,
    Historizing,
    Executable,
    UserExecutable,
    DataTypeDefinition,
    RolePermissions,
    UserRolePermissions,
    AccessRestrictions,
}

const ATTRIBUTE_NAMES: [&str; 26] = [
    "NodeId",
    "NodeClass",
    "BrowseName",
    "DisplayName",
    "Description",
    "WriteMask",
    "UserWriteMask",
    "IsAbstract",
    "Symmetric",
    "InverseName",
    "ContainsNoLoops",
    "EventNotifier",
    "Value",
    "DataType",
    "ValueRank",
    "ArrayDimensions",
    "AccessLevel",
    "UserAccessLevel",
    "MinimumSamplingInterval",
    "Historizing",
    "Executable",
    "UserExecutable",
    "DataTypeDefinition",
    "RolePermissions",
    "UserRolePermissions",
    "AccessRestrictions",
];

impl AttributeId {
    /// Wire value.
    pub const fn value(&self) -> u32 {
        *self as u32
    }

    /// Name as printed in dumps.
    pub const fn name(&self) -> &'static str {
        ATTRIBUTE_NAMES[(*self as u32 - 1) as usize]
    }
}

impl fmt::Display for AttributeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// `Duration` as humantime text in serde.
mod humantime_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&humantime::format_duration(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}
