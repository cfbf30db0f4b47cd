// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Object Builders
//!
//! [`NodeBuilder`] creates a [`MockNode`] that already carries every
//! attribute its node class requires, so a freshly built node validates
//! cleanly. Tests then break exactly the part they are about.

use std::collections::HashMap;

use uacheck_opcua::{
    ids, AttributeId, EnumDefinition, EnumField, LocalizedText, NodeClass, NodeId, OpcUaValue,
    QualifiedName, StructureDefinition, StructureField, StructureType,
};

use super::mocks::{MockNode, MockRead, MockReference};

/// The Double DataType.
pub const DOUBLE: NodeId = NodeId::ns0(11);

// =============================================================================
// NodeBuilder
// =============================================================================

/// Builder for [`MockNode`].
#[derive(Debug, Clone)]
pub struct NodeBuilder {
    node_id: NodeId,
    attributes: HashMap<AttributeId, MockRead>,
    references: Vec<MockReference>,
}

impl NodeBuilder {
    /// Creates a node of the given class with its default attributes.
    pub fn new(node_id: NodeId, class: NodeClass, browse_name: &str) -> Self {
        let mut builder = Self {
            node_id: node_id.clone(),
            attributes: HashMap::new(),
            references: Vec::new(),
        };
        let ns = node_id.namespace_index;

        builder = builder
            .attribute(AttributeId::NodeClass, OpcUaValue::Int32(class.value() as i32))
            .attribute(
                AttributeId::BrowseName,
                OpcUaValue::QualifiedName(QualifiedName::new(ns, browse_name)),
            )
            .attribute(
                AttributeId::DisplayName,
                OpcUaValue::LocalizedText(LocalizedText::new("en", browse_name)),
            )
            .attribute(
                AttributeId::Description,
                OpcUaValue::LocalizedText(LocalizedText::new("en", "")),
            )
            .attribute(AttributeId::WriteMask, OpcUaValue::UInt32(0))
            .attribute(AttributeId::UserWriteMask, OpcUaValue::UInt32(0));

        match class {
            NodeClass::ReferenceType => builder
                .attribute(AttributeId::IsAbstract, OpcUaValue::Boolean(false))
                .attribute(AttributeId::Symmetric, OpcUaValue::Boolean(false))
                .attribute(
                    AttributeId::InverseName,
                    OpcUaValue::LocalizedText(LocalizedText::new("en", "")),
                ),
            NodeClass::View => builder
                .attribute(AttributeId::ContainsNoLoops, OpcUaValue::Boolean(true))
                .attribute(AttributeId::EventNotifier, OpcUaValue::Byte(0)),
            NodeClass::Object => builder.attribute(AttributeId::EventNotifier, OpcUaValue::Byte(0)),
            NodeClass::ObjectType => {
                builder.attribute(AttributeId::IsAbstract, OpcUaValue::Boolean(false))
            }
            NodeClass::Variable => builder
                .attribute(AttributeId::Value, OpcUaValue::Double(0.0))
                .attribute(AttributeId::DataType, OpcUaValue::NodeId(DOUBLE))
                .attribute(AttributeId::ValueRank, OpcUaValue::Int32(-1))
                .attribute(AttributeId::ArrayDimensions, OpcUaValue::Array(Vec::new()))
                .attribute(AttributeId::AccessLevel, OpcUaValue::Byte(1))
                .attribute(AttributeId::UserAccessLevel, OpcUaValue::Byte(1))
                .attribute(AttributeId::MinimumSamplingInterval, OpcUaValue::Double(0.0))
                .attribute(AttributeId::Historizing, OpcUaValue::Boolean(false)),
            NodeClass::VariableType => builder
                .attribute(AttributeId::Value, OpcUaValue::Null)
                .attribute(AttributeId::DataType, OpcUaValue::NodeId(ids::BASE_DATA_TYPE))
                .attribute(AttributeId::ValueRank, OpcUaValue::Int32(-2))
                .attribute(AttributeId::IsAbstract, OpcUaValue::Boolean(false)),
            NodeClass::Method => builder
                .attribute(AttributeId::Executable, OpcUaValue::Boolean(true))
                .attribute(AttributeId::UserExecutable, OpcUaValue::Boolean(true)),
            NodeClass::DataType => builder
                .attribute(AttributeId::IsAbstract, OpcUaValue::Boolean(false))
                .attribute(AttributeId::DataTypeDefinition, OpcUaValue::Null),
            NodeClass::Unspecified => builder,
        }
    }

    /// Object shorthand.
    pub fn object(node_id: NodeId, browse_name: &str) -> Self {
        Self::new(node_id, NodeClass::Object, browse_name)
    }

    /// Variable shorthand.
    pub fn variable(node_id: NodeId, browse_name: &str) -> Self {
        Self::new(node_id, NodeClass::Variable, browse_name)
    }

    /// DataType shorthand.
    pub fn data_type(node_id: NodeId, browse_name: &str) -> Self {
        Self::new(node_id, NodeClass::DataType, browse_name)
    }

    /// ReferenceType shorthand.
    pub fn reference_type(node_id: NodeId, browse_name: &str) -> Self {
        Self::new(node_id, NodeClass::ReferenceType, browse_name)
    }

    /// Sets an attribute value.
    pub fn attribute(mut self, attribute: AttributeId, value: OpcUaValue) -> Self {
        self.attributes.insert(attribute, MockRead::Value(value));
        self
    }

    /// Makes an attribute read return a bad status.
    pub fn bad_status(mut self, attribute: AttributeId, status: u32) -> Self {
        self.attributes.insert(attribute, MockRead::Status(status));
        self
    }

    /// Removes an attribute.
    pub fn without(mut self, attribute: AttributeId) -> Self {
        self.attributes.remove(&attribute);
        self
    }

    /// Adds a forward reference from this node.
    pub fn reference(mut self, reference_type: NodeId, target: NodeId) -> Self {
        self.references
            .push(MockReference::new(self.node_id.clone(), reference_type, target));
        self
    }

    /// Adds a forward reference from `source` to this node.
    pub fn referenced_by(mut self, source: NodeId, reference_type: NodeId) -> Self {
        self.references
            .push(MockReference::new(source, reference_type, self.node_id.clone()));
        self
    }

    /// Adds a HasTypeDefinition reference.
    pub fn type_definition(self, type_id: NodeId) -> Self {
        self.reference(ids::HAS_TYPE_DEFINITION, type_id)
    }

    /// Adds a HasModellingRule reference.
    pub fn modelling_rule(self, rule: NodeId) -> Self {
        self.reference(ids::HAS_MODELLING_RULE, rule)
    }

    /// Declares this node a subtype of `parent`.
    pub fn subtype_of(self, parent: NodeId) -> Self {
        self.referenced_by(parent, ids::HAS_SUBTYPE)
    }

    /// Places this node under `parent` with an Organizes reference.
    pub fn organized_by(self, parent: NodeId) -> Self {
        self.referenced_by(parent, ids::ORGANIZES)
    }

    /// Places this node under `parent` with a HasComponent reference.
    pub fn component_of(self, parent: NodeId) -> Self {
        self.referenced_by(parent, ids::HAS_COMPONENT)
    }

    /// Places this node under `parent` with a HasProperty reference.
    pub fn property_of(self, parent: NodeId) -> Self {
        self.referenced_by(parent, ids::HAS_PROPERTY)
    }

    /// Sets a StructureDefinition with the given field names.
    pub fn structure_definition(self, fields: &[&str]) -> Self {
        let definition = StructureDefinition {
            default_encoding_id: NodeId::null(),
            base_data_type: ids::STRUCTURE,
            structure_type: StructureType::Structure,
            fields: fields
                .iter()
                .map(|name| StructureField {
                    name: (*name).to_string(),
                    description: LocalizedText::text(""),
                    data_type: DOUBLE,
                    value_rank: -1,
                    array_dimensions: Vec::new(),
                    max_string_length: 0,
                    is_optional: false,
                })
                .collect(),
        };
        self.attribute(
            AttributeId::DataTypeDefinition,
            OpcUaValue::StructureDefinition(definition),
        )
    }

    /// Sets an EnumDefinition with the given field names, valued 0, 1, ...
    pub fn enum_definition(self, fields: &[&str]) -> Self {
        let definition = EnumDefinition {
            fields: fields
                .iter()
                .zip(0..)
                .map(|(name, value)| EnumField {
                    value,
                    display_name: LocalizedText::text(*name),
                    description: LocalizedText::text(""),
                    name: (*name).to_string(),
                })
                .collect(),
        };
        self.attribute(
            AttributeId::DataTypeDefinition,
            OpcUaValue::EnumDefinition(definition),
        )
    }

    /// Builds the node.
    pub fn build(self) -> MockNode {
        MockNode {
            node_id: self.node_id,
            attributes: self.attributes,
            references: self.references,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_defaults() {
        let node = NodeBuilder::variable(NodeId::numeric(2, 1), "Speed").build();
        assert_eq!(node.node_class(), Some(NodeClass::Variable));
        assert!(node.attributes.contains_key(&AttributeId::Historizing));
        assert!(node.references.is_empty());
    }

    #[test]
    fn test_subtype_of_points_from_parent() {
        let node = NodeBuilder::data_type(NodeId::numeric(2, 200), "Mode")
            .subtype_of(ids::ENUMERATION)
            .build();
        assert_eq!(node.references[0].source, ids::ENUMERATION);
        assert_eq!(node.references[0].target, NodeId::numeric(2, 200));
    }
}
