// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed attribute reads.
//!
//! [`AttributeReads`] is implemented for every [`OpcUaTransport`]. Each method
//! issues one generic [`OpcUaTransport::read_attribute`] call and converts the
//! result:
//!
//! - a bad status code becomes [`OperationError::BadStatus`];
//! - a value of the wrong type becomes [`ConversionError::TypeMismatch`];
//! - a missing value becomes [`ConversionError::NullValue`], except where
//!   the attribute may legitimately be empty.

use async_trait::async_trait;

use crate::client::transport::{
    BrowseRequest, DataTypeDefinition, OpcUaTransport, OpcUaValue, ReferenceDescription,
};
use crate::error::{ConversionError, OpcUaError, OpcUaResult, OperationError};
use crate::types::{AttributeId, LocalizedText, NodeClass, NodeId, QualifiedName};

/// Reads an attribute and rejects bad status codes.
async fn read_good<T>(client: &T, node_id: &NodeId, attribute: AttributeId) -> OpcUaResult<OpcUaValue>
where
    T: OpcUaTransport + ?Sized,
{
    let result = client.read_attribute(node_id, attribute).await?;
    if result.is_bad() {
        return Err(OpcUaError::operation(OperationError::bad_status(
            node_id.to_string(),
            result.status_code,
        )));
    }
    Ok(result.value.unwrap_or(OpcUaValue::Null))
}

fn mismatch(attribute: AttributeId, expected: &str, value: &OpcUaValue) -> OpcUaError {
    match value {
        OpcUaValue::Null => OpcUaError::conversion(ConversionError::null_value(attribute.name())),
        other => OpcUaError::conversion(ConversionError::type_mismatch(
            attribute.name(),
            expected,
            other.type_name(),
        )),
    }
}

/// Typed reads of the standard node attributes.
#[async_trait]
pub trait AttributeReads: OpcUaTransport {
    /// Reads a Boolean attribute.
    async fn read_bool(&self, node_id: &NodeId, attribute: AttributeId) -> OpcUaResult<bool> {
        let value = read_good(self, node_id, attribute).await?;
        value.as_bool().ok_or_else(|| mismatch(attribute, "Boolean", &value))
    }

    /// Reads a UInt32 attribute.
    async fn read_u32(&self, node_id: &NodeId, attribute: AttributeId) -> OpcUaResult<u32> {
        match read_good(self, node_id, attribute).await? {
            OpcUaValue::UInt32(v) => Ok(v),
            other => Err(mismatch(attribute, "UInt32", &other)),
        }
    }

    /// Reads a Byte attribute.
    async fn read_byte(&self, node_id: &NodeId, attribute: AttributeId) -> OpcUaResult<u8> {
        match read_good(self, node_id, attribute).await? {
            OpcUaValue::Byte(v) => Ok(v),
            other => Err(mismatch(attribute, "Byte", &other)),
        }
    }

    /// Reads a LocalizedText attribute.
    async fn read_text(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> OpcUaResult<LocalizedText> {
        match read_good(self, node_id, attribute).await? {
            OpcUaValue::LocalizedText(v) => Ok(v),
            other => Err(mismatch(attribute, "LocalizedText", &other)),
        }
    }

    // =========================================================================
    // Base attributes
    // =========================================================================

    /// Reads the NodeClass attribute.
    ///
    /// Values outside the defined set are rejected.
    async fn read_node_class(&self, node_id: &NodeId) -> OpcUaResult<NodeClass> {
        let attribute = AttributeId::NodeClass;
        let raw = match read_good(self, node_id, attribute).await? {
            OpcUaValue::Int32(v) => v,
            other => return Err(mismatch(attribute, "Int32", &other)),
        };
        u32::try_from(raw)
            .ok()
            .and_then(NodeClass::from_value)
            .ok_or_else(|| {
                OpcUaError::conversion(ConversionError::invalid_value(
                    attribute.name(),
                    format!("unknown node class value {}", raw),
                ))
            })
    }

    /// Reads the BrowseName attribute.
    async fn read_browse_name(&self, node_id: &NodeId) -> OpcUaResult<QualifiedName> {
        let attribute = AttributeId::BrowseName;
        match read_good(self, node_id, attribute).await? {
            OpcUaValue::QualifiedName(v) => Ok(v),
            other => Err(mismatch(attribute, "QualifiedName", &other)),
        }
    }

    /// Reads the DisplayName attribute.
    async fn read_display_name(&self, node_id: &NodeId) -> OpcUaResult<LocalizedText> {
        self.read_text(node_id, AttributeId::DisplayName).await
    }

    /// Reads the Description attribute.
    async fn read_description(&self, node_id: &NodeId) -> OpcUaResult<LocalizedText> {
        self.read_text(node_id, AttributeId::Description).await
    }

    /// Reads the WriteMask attribute.
    async fn read_write_mask(&self, node_id: &NodeId) -> OpcUaResult<u32> {
        self.read_u32(node_id, AttributeId::WriteMask).await
    }

    /// Reads the UserWriteMask attribute.
    async fn read_user_write_mask(&self, node_id: &NodeId) -> OpcUaResult<u32> {
        self.read_u32(node_id, AttributeId::UserWriteMask).await
    }

    // =========================================================================
    // Type attributes
    // =========================================================================

    /// Reads the IsAbstract attribute.
    async fn read_is_abstract(&self, node_id: &NodeId) -> OpcUaResult<bool> {
        self.read_bool(node_id, AttributeId::IsAbstract).await
    }

    /// Reads the Symmetric attribute.
    async fn read_symmetric(&self, node_id: &NodeId) -> OpcUaResult<bool> {
        self.read_bool(node_id, AttributeId::Symmetric).await
    }

    /// Reads the InverseName attribute.
    async fn read_inverse_name(&self, node_id: &NodeId) -> OpcUaResult<LocalizedText> {
        self.read_text(node_id, AttributeId::InverseName).await
    }

    /// Reads the ContainsNoLoops attribute.
    async fn read_contains_no_loops(&self, node_id: &NodeId) -> OpcUaResult<bool> {
        self.read_bool(node_id, AttributeId::ContainsNoLoops).await
    }

    /// Reads the EventNotifier attribute.
    async fn read_event_notifier(&self, node_id: &NodeId) -> OpcUaResult<u8> {
        self.read_byte(node_id, AttributeId::EventNotifier).await
    }

    // =========================================================================
    // Variable attributes
    // =========================================================================

    /// Reads the Value attribute. A null value is returned as [`OpcUaValue::Null`].
    async fn read_value(&self, node_id: &NodeId) -> OpcUaResult<OpcUaValue> {
        read_good(self, node_id, AttributeId::Value).await
    }

    /// Reads the DataType attribute.
    async fn read_data_type(&self, node_id: &NodeId) -> OpcUaResult<NodeId> {
        let attribute = AttributeId::DataType;
        match read_good(self, node_id, attribute).await? {
            OpcUaValue::NodeId(v) => Ok(v),
            other => Err(mismatch(attribute, "NodeId", &other)),
        }
    }

    /// Reads the ValueRank attribute.
    async fn read_value_rank(&self, node_id: &NodeId) -> OpcUaResult<i32> {
        let attribute = AttributeId::ValueRank;
        match read_good(self, node_id, attribute).await? {
            OpcUaValue::Int32(v) => Ok(v),
            other => Err(mismatch(attribute, "Int32", &other)),
        }
    }

    /// Reads the ArrayDimensions attribute.
    async fn read_array_dimensions(&self, node_id: &NodeId) -> OpcUaResult<Vec<u32>> {
        let attribute = AttributeId::ArrayDimensions;
        match read_good(self, node_id, attribute).await? {
            OpcUaValue::Array(values) => values
                .iter()
                .map(|v| match v {
                    OpcUaValue::UInt32(d) => Ok(*d),
                    other => Err(mismatch(attribute, "UInt32", other)),
                })
                .collect(),
            other => Err(mismatch(attribute, "Array of UInt32", &other)),
        }
    }

    /// Reads the AccessLevel attribute.
    async fn read_access_level(&self, node_id: &NodeId) -> OpcUaResult<u8> {
        self.read_byte(node_id, AttributeId::AccessLevel).await
    }

    /// Reads the UserAccessLevel attribute.
    async fn read_user_access_level(&self, node_id: &NodeId) -> OpcUaResult<u8> {
        self.read_byte(node_id, AttributeId::UserAccessLevel).await
    }

    /// Reads the MinimumSamplingInterval attribute.
    async fn read_minimum_sampling_interval(&self, node_id: &NodeId) -> OpcUaResult<f64> {
        let attribute = AttributeId::MinimumSamplingInterval;
        match read_good(self, node_id, attribute).await? {
            OpcUaValue::Double(v) => Ok(v),
            other => Err(mismatch(attribute, "Double", &other)),
        }
    }

    /// Reads the Historizing attribute.
    async fn read_historizing(&self, node_id: &NodeId) -> OpcUaResult<bool> {
        self.read_bool(node_id, AttributeId::Historizing).await
    }

    // =========================================================================
    // Method attributes
    // =========================================================================

    /// Reads the Executable attribute.
    async fn read_executable(&self, node_id: &NodeId) -> OpcUaResult<bool> {
        self.read_bool(node_id, AttributeId::Executable).await
    }

    /// Reads the UserExecutable attribute.
    async fn read_user_executable(&self, node_id: &NodeId) -> OpcUaResult<bool> {
        self.read_bool(node_id, AttributeId::UserExecutable).await
    }

    // =========================================================================
    // DataType attributes
    // =========================================================================

    /// Reads the DataTypeDefinition attribute.
    ///
    /// Returns `Ok(None)` when the server answers with a good status but no
    /// value. Any value other than a decoded definition is a type mismatch.
    async fn read_data_type_definition(
        &self,
        node_id: &NodeId,
    ) -> OpcUaResult<Option<DataTypeDefinition>> {
        let attribute = AttributeId::DataTypeDefinition;
        match read_good(self, node_id, attribute).await? {
            OpcUaValue::Null => Ok(None),
            OpcUaValue::StructureDefinition(v) => Ok(Some(DataTypeDefinition::Structure(v))),
            OpcUaValue::EnumDefinition(v) => Ok(Some(DataTypeDefinition::Enum(v))),
            other => Err(mismatch(
                attribute,
                "StructureDefinition or EnumDefinition",
                &other,
            )),
        }
    }

    // =========================================================================
    // Browse
    // =========================================================================

    /// Browses every forward reference of a node.
    async fn browse_forward(&self, node_id: &NodeId) -> OpcUaResult<Vec<ReferenceDescription>> {
        self.browse(node_id, &BrowseRequest::forward()).await
    }
}

impl<T: OpcUaTransport + ?Sized> AttributeReads for T {}
