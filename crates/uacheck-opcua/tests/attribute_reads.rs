// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Typed attribute read tests.
//!
//! Runs [`AttributeReads`] against a table-driven transport so every
//! conversion path (good value, bad status, wrong type, null) is covered
//! without a server.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use uacheck_opcua::{
    AttributeId, AttributeReads, BrowseRequest, DataTypeDefinition, EnumDefinition, EnumField,
    LocalizedText, NodeClass, NodeId, OpcUaError, OpcUaResult, OpcUaTransport, OpcUaValue,
    QualifiedName, ReadResult, ReferenceDescription, TransportState, ConversionError,
    OperationError,
};

// =============================================================================
// Table transport
// =============================================================================

#[derive(Default)]
struct TableTransport {
    values: HashMap<(NodeId, AttributeId), Result<OpcUaValue, u32>>,
    reads: AtomicU32,
}

impl TableTransport {
    fn with(mut self, node: &NodeId, attribute: AttributeId, value: OpcUaValue) -> Self {
        self.values.insert((node.clone(), attribute), Ok(value));
        self
    }

    fn with_status(mut self, node: &NodeId, attribute: AttributeId, status: u32) -> Self {
        self.values.insert((node.clone(), attribute), Err(status));
        self
    }
}

#[async_trait]
impl OpcUaTransport for TableTransport {
    async fn connect(&mut self) -> OpcUaResult<()> {
        Ok(())
    }

    async fn disconnect(&mut self) -> OpcUaResult<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }

    fn state(&self) -> TransportState {
        TransportState::Connected
    }

    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> OpcUaResult<ReadResult> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        Ok(match self.values.get(&(node_id.clone(), attribute)) {
            Some(Ok(value)) => ReadResult::success(node_id.clone(), attribute, value.clone()),
            Some(Err(status)) => ReadResult::failure(node_id.clone(), attribute, *status),
            None => ReadResult::failure(node_id.clone(), attribute, 0x8035_0000),
        })
    }

    async fn browse(
        &self,
        _node_id: &NodeId,
        _request: &BrowseRequest,
    ) -> OpcUaResult<Vec<ReferenceDescription>> {
        Ok(Vec::new())
    }

    fn endpoint(&self) -> &str {
        "opc.tcp://table:4840"
    }
}

fn node() -> NodeId {
    NodeId::numeric(2, 1001)
}

// =============================================================================
// Tests
// =============================================================================

#[tokio::test]
async fn test_read_node_class() {
    let transport = TableTransport::default().with(&node(), AttributeId::NodeClass, OpcUaValue::Int32(2));
    assert_eq!(transport.read_node_class(&node()).await.unwrap(), NodeClass::Variable);
}

#[tokio::test]
async fn test_read_node_class_unknown_value() {
    let transport = TableTransport::default().with(&node(), AttributeId::NodeClass, OpcUaValue::Int32(3));
    let err = transport.read_node_class(&node()).await.unwrap_err();
    assert!(matches!(
        err,
        OpcUaError::Conversion(ConversionError::InvalidValue { .. })
    ));
}

#[tokio::test]
async fn test_read_node_class_unspecified_is_returned() {
    let transport = TableTransport::default().with(&node(), AttributeId::NodeClass, OpcUaValue::Int32(0));
    assert_eq!(transport.read_node_class(&node()).await.unwrap(), NodeClass::Unspecified);
}

#[tokio::test]
async fn test_bad_status_becomes_operation_error() {
    let transport =
        TableTransport::default().with_status(&node(), AttributeId::BrowseName, 0x803A_0000);
    let err = transport.read_browse_name(&node()).await.unwrap_err();
    match err {
        OpcUaError::Operation(OperationError::BadStatus { status_name, .. }) => {
            assert_eq!(status_name, "BadNotReadable");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_type_mismatch() {
    let transport = TableTransport::default().with(
        &node(),
        AttributeId::DisplayName,
        OpcUaValue::String("Pump".to_string()),
    );
    let err = transport.read_display_name(&node()).await.unwrap_err();
    assert!(matches!(
        err,
        OpcUaError::Conversion(ConversionError::TypeMismatch { .. })
    ));
}

#[tokio::test]
async fn test_null_is_reported_for_mandatory_scalar() {
    let transport = TableTransport::default().with(&node(), AttributeId::Historizing, OpcUaValue::Null);
    let err = transport.read_historizing(&node()).await.unwrap_err();
    assert!(matches!(
        err,
        OpcUaError::Conversion(ConversionError::NullValue { .. })
    ));
}

#[tokio::test]
async fn test_read_value_allows_null() {
    let transport = TableTransport::default().with(&node(), AttributeId::Value, OpcUaValue::Null);
    assert_eq!(transport.read_value(&node()).await.unwrap(), OpcUaValue::Null);
}

#[tokio::test]
async fn test_read_names_and_texts() {
    let transport = TableTransport::default()
        .with(
            &node(),
            AttributeId::BrowseName,
            OpcUaValue::QualifiedName(QualifiedName::new(2, "Temperature")),
        )
        .with(
            &node(),
            AttributeId::Description,
            OpcUaValue::LocalizedText(LocalizedText::new("en", "Inlet temperature")),
        );

    assert_eq!(
        transport.read_browse_name(&node()).await.unwrap().to_string(),
        "2:Temperature"
    );
    assert_eq!(
        transport.read_description(&node()).await.unwrap().text,
        "Inlet temperature"
    );
}

#[tokio::test]
async fn test_read_array_dimensions() {
    let transport = TableTransport::default().with(
        &node(),
        AttributeId::ArrayDimensions,
        OpcUaValue::Array(vec![OpcUaValue::UInt32(2), OpcUaValue::UInt32(3)]),
    );
    assert_eq!(transport.read_array_dimensions(&node()).await.unwrap(), vec![2, 3]);
}

#[tokio::test]
async fn test_read_array_dimensions_rejects_wrong_element() {
    let transport = TableTransport::default().with(
        &node(),
        AttributeId::ArrayDimensions,
        OpcUaValue::Array(vec![OpcUaValue::Int32(-1)]),
    );
    assert!(transport.read_array_dimensions(&node()).await.is_err());
}

#[tokio::test]
async fn test_read_data_type_definition() {
    let definition = EnumDefinition {
        fields: vec![EnumField {
            value: 1,
            display_name: LocalizedText::text("Running"),
            description: LocalizedText::default(),
            name: "Running".to_string(),
        }],
    };
    let transport = TableTransport::default().with(
        &node(),
        AttributeId::DataTypeDefinition,
        OpcUaValue::EnumDefinition(definition.clone()),
    );

    match transport.read_data_type_definition(&node()).await.unwrap() {
        Some(DataTypeDefinition::Enum(e)) => assert_eq!(e, definition),
        other => panic!("unexpected definition: {other:?}"),
    }
}

#[tokio::test]
async fn test_read_data_type_definition_absent() {
    let transport =
        TableTransport::default().with(&node(), AttributeId::DataTypeDefinition, OpcUaValue::Null);
    assert!(transport.read_data_type_definition(&node()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_read_data_type_definition_wrong_type() {
    let transport = TableTransport::default().with(
        &node(),
        AttributeId::DataTypeDefinition,
        OpcUaValue::ExtensionObject(NodeId::ns0(999)),
    );
    assert!(matches!(
        transport.read_data_type_definition(&node()).await.unwrap_err(),
        OpcUaError::Conversion(ConversionError::TypeMismatch { .. })
    ));
}

#[tokio::test]
async fn test_one_read_per_typed_call() {
    let transport = TableTransport::default()
        .with(&node(), AttributeId::AccessLevel, OpcUaValue::Byte(3))
        .with(&node(), AttributeId::MinimumSamplingInterval, OpcUaValue::Double(100.0));

    assert_eq!(transport.read_access_level(&node()).await.unwrap(), 3);
    assert_eq!(
        transport.read_minimum_sampling_interval(&node()).await.unwrap(),
        100.0
    );
    assert_eq!(transport.reads.load(Ordering::SeqCst), 2);
}
