// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! The client seam: the two services the validator uses and what they return.
//!
//! Read and Browse sit behind [`OpcUaTransport`] so the same validator runs
//! against a live server or an in-memory address space.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::OpcUaResult;
use crate::types::{AttributeId, BrowseDirection, LocalizedText, NodeClass, NodeId, QualifiedName};

/// Session state of a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportState {
    /// No session.
    #[default]
    Disconnected,
    /// Opening the channel and session.
    Connecting,
    /// Session active.
    Connected,
    /// The last connect failed or the session was lost.
    Failed,
}

impl TransportState {
    /// Returns `true` while a session is active.
    pub fn is_connected(&self) -> bool {
        *self == Self::Connected
    }
}

impl fmt::Display for TransportState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One attribute of one node, as returned by a Read call.
///
/// A Read that reaches the server always yields a `ReadResult`; a bad
/// `status_code` means this attribute could not be read.
#[derive(Debug, Clone)]
pub struct ReadResult {
    /// Node that was read.
    pub node_id: NodeId,
    /// Attribute that was read.
    pub attribute: AttributeId,
    /// Value, absent when the status is bad.
    pub value: Option<OpcUaValue>,
    /// OPC UA status code; 0 is Good.
    pub status_code: u32,
}

impl ReadResult {
    /// A Good read of `value`.
    pub fn success(node_id: NodeId, attribute: AttributeId, value: OpcUaValue) -> Self {
        Self {
            node_id,
            attribute,
            value: Some(value),
            status_code: 0,
        }
    }

    /// A read that produced only `status_code`.
    pub fn failure(node_id: NodeId, attribute: AttributeId, status_code: u32) -> Self {
        Self {
            node_id,
            attribute,
            value: None,
            status_code,
        }
    }

    /// Returns `true` when the severity bit of the status is set.
    pub fn is_bad(&self) -> bool {
        self.status_code & 0x8000_0000 != 0
    }
}

/// Decoded attribute value.
///
/// The scalar built-ins, the id and name types of the base attributes, and
/// the two DataTypeDefinition structures. Anything else arrives as
/// `ExtensionObject` with its encoding id.
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub enum OpcUaValue {
    Boolean(bool),
    SByte(i8),
    Byte(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Int64(i64),
    UInt64(u64),
    Float(f32),
    Double(f64),
    String(String),
    DateTime(chrono::DateTime<chrono::Utc>),
    Guid(uuid::Uuid),
    ByteString(Vec<u8>),
    NodeId(NodeId),
    QualifiedName(QualifiedName),
    LocalizedText(LocalizedText),
    StructureDefinition(StructureDefinition),
    EnumDefinition(EnumDefinition),
    ExtensionObject(NodeId),
    Array(Vec<OpcUaValue>),
    #[default]
    Null,
}

impl OpcUaValue {
    /// Built-in type name, used in type-mismatch messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Boolean(_) => "Boolean",
            Self::SByte(_) => "SByte",
            Self::Byte(_) => "Byte",
            Self::Int16(_) => "Int16",
            Self::UInt16(_) => "UInt16",
            Self::Int32(_) => "Int32",
            Self::UInt32(_) => "UInt32",
            Self::Int64(_) => "Int64",
            Self::UInt64(_) => "UInt64",
            Self::Float(_) => "Float",
            Self::Double(_) => "Double",
            Self::String(_) => "String",
            Self::DateTime(_) => "DateTime",
            Self::Guid(_) => "Guid",
            Self::ByteString(_) => "ByteString",
            Self::NodeId(_) => "NodeId",
            Self::QualifiedName(_) => "QualifiedName",
            Self::LocalizedText(_) => "LocalizedText",
            Self::StructureDefinition(_) => "StructureDefinition",
            Self::EnumDefinition(_) => "EnumDefinition",
            Self::ExtensionObject(_) => "ExtensionObject",
            Self::Array(_) => "Array",
            Self::Null => "Null",
        }
    }

    /// Returns `true` for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The value of a `Boolean`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for OpcUaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boolean(v) => fmt::Display::fmt(v, f),
            Self::SByte(v) => fmt::Display::fmt(v, f),
            Self::Byte(v) => fmt::Display::fmt(v, f),
            Self::Int16(v) => fmt::Display::fmt(v, f),
            Self::UInt16(v) => fmt::Display::fmt(v, f),
            Self::Int32(v) => fmt::Display::fmt(v, f),
            Self::UInt32(v) => fmt::Display::fmt(v, f),
            Self::Int64(v) => fmt::Display::fmt(v, f),
            Self::UInt64(v) => fmt::Display::fmt(v, f),
            Self::Float(v) => fmt::Display::fmt(v, f),
            Self::Double(v) => fmt::Display::fmt(v, f),
            Self::String(v) => f.write_str(v),
            Self::DateTime(v) => f.write_str(&v.to_rfc3339()),
            Self::Guid(v) => fmt::Display::fmt(v, f),
            Self::ByteString(v) => write!(f, "<{} bytes>", v.len()),
            Self::NodeId(v) => fmt::Display::fmt(v, f),
            Self::QualifiedName(v) => fmt::Display::fmt(v, f),
            Self::LocalizedText(v) => fmt::Display::fmt(v, f),
            Self::StructureDefinition(v) => write!(f, "StructureDefinition({} fields)", v.fields.len()),
            Self::EnumDefinition(v) => write!(f, "EnumDefinition({} fields)", v.fields.len()),
            Self::ExtensionObject(encoding) => write!(f, "ExtensionObject({})", encoding),
            Self::Array(values) => {
                f.write_str("[")?;
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    fmt::Display::fmt(value, f)?;
                }
                f.write_str("]")
            }
            Self::Null => f.write_str("null"),
        }
    }
}

// =============================================================================
// DataTypeDefinition
// =============================================================================

/// Kind of structure described by a StructureDefinition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum StructureType {
    /// Plain structure.
    #[default]
    Structure,
    /// Structure whose fields may be absent.
    StructureWithOptionalFields,
    /// Union of the fields.
    Union,
}

impl StructureType {
    /// Returns the OPC UA value.
    pub const fn value(&self) -> i32 {
        match self {
            Self::Structure => 0,
            Self::StructureWithOptionalFields => 1,
            Self::Union => 2,
        }
    }

    /// Creates from OPC UA value.
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Structure),
            1 => Some(Self::StructureWithOptionalFields),
            2 => Some(Self::Union),
            _ => None,
        }
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One field of a StructureDefinition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureField {
    /// Field name.
    pub name: String,
    /// Field description.
    pub description: LocalizedText,
    /// Data type of the field.
    pub data_type: NodeId,
    /// Value rank of the field.
    pub value_rank: i32,
    /// Array dimensions of the field.
    pub array_dimensions: Vec<u32>,
    /// Maximum string length (0 = unlimited).
    pub max_string_length: u32,
    /// Whether the field is optional.
    pub is_optional: bool,
}

/// Layout of a structured DataType.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructureDefinition {
    /// Default encoding node.
    pub default_encoding_id: NodeId,
    /// Base data type.
    pub base_data_type: NodeId,
    /// Structure kind.
    pub structure_type: StructureType,
    /// Fields in declaration order.
    pub fields: Vec<StructureField>,
}

/// One field of an EnumDefinition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumField {
    /// Numeric value of the field.
    pub value: i64,
    /// Display name.
    pub display_name: LocalizedText,
    /// Description.
    pub description: LocalizedText,
    /// Symbolic name.
    pub name: String,
}

/// Layout of an enumeration or option-set DataType.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumDefinition {
    /// Fields in declaration order.
    pub fields: Vec<EnumField>,
}

/// A decoded DataTypeDefinition attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum DataTypeDefinition {
    /// Structure layout.
    Structure(StructureDefinition),
    /// Enumeration or option-set layout.
    Enum(EnumDefinition),
}

impl DataTypeDefinition {
    /// Returns the OPC UA type name of the definition.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Structure(_) => "StructureDefinition",
            Self::Enum(_) => "EnumDefinition",
        }
    }
}

// =============================================================================
// Browse
// =============================================================================

/// Parameters of a browse call.
///
/// # Examples
///
/// ```
/// use uacheck_opcua::{ids, BrowseRequest, NodeClass};
///
/// let request = BrowseRequest::forward()
///     .with_reference_type(ids::HIERARCHICAL_REFERENCES)
///     .with_node_classes(&[NodeClass::Object, NodeClass::Variable]);
/// assert_eq!(request.node_class_mask, 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowseRequest {
    /// Browse direction.
    pub direction: BrowseDirection,

    /// Reference type to follow (None = all references).
    pub reference_type_id: Option<NodeId>,

    /// Include subtypes of the reference type.
    pub include_subtypes: bool,

    /// Node class mask of the targets (0 = all classes).
    pub node_class_mask: u32,
}

impl Default for BrowseRequest {
    fn default() -> Self {
        Self {
            direction: BrowseDirection::Forward,
            reference_type_id: None,
            include_subtypes: true,
            node_class_mask: 0,
        }
    }
}

impl BrowseRequest {
    /// All forward references.
    pub fn forward() -> Self {
        Self::default()
    }

    /// All inverse references.
    pub fn inverse() -> Self {
        Self {
            direction: BrowseDirection::Inverse,
            ..Self::default()
        }
    }

    /// Sets the reference type to follow.
    pub fn with_reference_type(mut self, reference_type: NodeId) -> Self {
        self.reference_type_id = Some(reference_type);
        self
    }

    /// Sets whether to include subtypes of the reference type.
    pub fn with_include_subtypes(mut self, include: bool) -> Self {
        self.include_subtypes = include;
        self
    }

    /// Restricts targets to the given node classes.
    pub fn with_node_classes(mut self, classes: &[NodeClass]) -> Self {
        self.node_class_mask = classes.iter().fold(0, |acc, c| acc | c.value());
        self
    }

    /// Checks if a target node class passes the mask.
    pub fn matches_node_class(&self, class: Option<NodeClass>) -> bool {
        if self.node_class_mask == 0 {
            return true;
        }
        class.is_some_and(|c| self.node_class_mask & c.value() != 0)
    }
}

/// One reference returned by a browse call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceDescription {
    /// Reference type of the edge.
    pub reference_type_id: NodeId,

    /// `true` if the edge points away from the browsed node.
    pub is_forward: bool,

    /// Target node of the edge.
    pub target_id: NodeId,

    /// Browse name of the target.
    pub browse_name: QualifiedName,

    /// Display name of the target.
    pub display_name: LocalizedText,

    /// Node class of the target, when the server returned one.
    pub node_class: Option<NodeClass>,

    /// Type definition of the target (Objects and Variables only).
    pub type_definition: Option<NodeId>,
}

// =============================================================================
// OpcUaTransport
// =============================================================================

/// Read and Browse against one server.
///
/// A failed service call is an `Err`; a Read that reached the server but
/// could not read the attribute is an `Ok` [`ReadResult`] with a bad status.
#[async_trait]
pub trait OpcUaTransport: Send + Sync {
    /// Opens the channel and activates a session.
    async fn connect(&mut self) -> OpcUaResult<()>;

    /// Closes the session.
    async fn disconnect(&mut self) -> OpcUaResult<()>;

    /// Returns `true` while a session is active.
    fn is_connected(&self) -> bool;

    /// Current session state.
    fn state(&self) -> TransportState;

    /// Reads one attribute of a node.
    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> OpcUaResult<ReadResult>;

    /// Returns every reference of `node_id` matching `request`, following
    /// continuation points to the end.
    async fn browse(
        &self,
        node_id: &NodeId,
        request: &BrowseRequest,
    ) -> OpcUaResult<Vec<ReferenceDescription>>;

    /// Endpoint URL, for log fields.
    fn endpoint(&self) -> &str;
}
