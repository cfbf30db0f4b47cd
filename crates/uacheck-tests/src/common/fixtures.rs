// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Test Fixtures
//!
//! Pre-built address spaces and configurations.
//!
//! [`AddressSpaceFixtures::standard`] holds the slice of namespace 0 the
//! validator consults: the reference-type tree, the DataType roots and the
//! top-level folders. [`AddressSpaceFixtures::plant`] adds a small, fully
//! valid namespace-2 model on top.

use uacheck_config::CheckConfig;
use uacheck_opcua::{ids, AttributeId, LocalizedText, NodeClass, NodeId, OpcUaValue, QualifiedName};

use super::builders::{NodeBuilder, DOUBLE};
use super::mocks::{MockAddressSpace, MockNode};

/// BaseDataType > Number.
pub const NUMBER: NodeId = NodeId::ns0(26);

// =============================================================================
// Plant node ids
// =============================================================================

/// Node ids of the plant model.
pub struct Plant;

impl Plant {
    /// `Pump1`, an Object organized by the Objects folder.
    pub const PUMP: NodeId = NodeId::numeric(2, 1);
    /// `Speed`, a Variable component of `Pump1`.
    pub const SPEED: NodeId = NodeId::numeric(2, 2);
    /// `SerialNumber`, a property of `Pump1`.
    pub const SERIAL_NUMBER: NodeId = NodeId::numeric(2, 3);
    /// `Start`, a Method component of `Pump1`.
    pub const START: NodeId = NodeId::numeric(2, 4);
    /// `PumpType`, the ObjectType of `Pump1`.
    pub const PUMP_TYPE: NodeId = NodeId::numeric(2, 100);
    /// `PumpMode`, an Enumeration subtype.
    pub const PUMP_MODE: NodeId = NodeId::numeric(2, 200);
    /// `PumpSettings`, a Structure subtype.
    pub const PUMP_SETTINGS: NodeId = NodeId::numeric(2, 201);
    /// Default binary encoding of `PumpSettings`.
    pub const PUMP_SETTINGS_ENCODING: NodeId = NodeId::numeric(2, 202);
    /// `PlantView`, a View organized by the Views folder.
    pub const PLANT_VIEW: NodeId = NodeId::numeric(2, 300);
    /// `Feeds`, a custom hierarchical ReferenceType.
    pub const FEEDS: NodeId = NodeId::numeric(2, 400);
}

// =============================================================================
// Address space fixtures
// =============================================================================

/// Pre-built address spaces.
pub struct AddressSpaceFixtures;

impl AddressSpaceFixtures {
    /// The namespace-0 subset every test builds on.
    pub fn standard() -> MockAddressSpace {
        let space = MockAddressSpace::new();

        // Reference types
        space.add(
            NodeBuilder::reference_type(ids::REFERENCES, "References")
                .attribute(AttributeId::IsAbstract, OpcUaValue::Boolean(true))
                .attribute(AttributeId::Symmetric, OpcUaValue::Boolean(true))
                .build(),
        );
        let reference_types = [
            (ids::HIERARCHICAL_REFERENCES, "HierarchicalReferences", ids::REFERENCES),
            (ids::NON_HIERARCHICAL_REFERENCES, "NonHierarchicalReferences", ids::REFERENCES),
            (ids::HAS_CHILD, "HasChild", ids::HIERARCHICAL_REFERENCES),
            (ids::ORGANIZES, "Organizes", ids::HIERARCHICAL_REFERENCES),
            (ids::AGGREGATES, "Aggregates", ids::HAS_CHILD),
            (ids::HAS_SUBTYPE, "HasSubtype", ids::HAS_CHILD),
            (ids::HAS_COMPONENT, "HasComponent", ids::AGGREGATES),
            (ids::HAS_PROPERTY, "HasProperty", ids::AGGREGATES),
            (ids::HAS_TYPE_DEFINITION, "HasTypeDefinition", ids::NON_HIERARCHICAL_REFERENCES),
            (ids::HAS_MODELLING_RULE, "HasModellingRule", ids::NON_HIERARCHICAL_REFERENCES),
            (ids::HAS_ENCODING, "HasEncoding", ids::NON_HIERARCHICAL_REFERENCES),
        ];
        for (node_id, name, parent) in reference_types {
            space.add(NodeBuilder::reference_type(node_id, name).subtype_of(parent).build());
        }

        // Data types
        space.add(NodeBuilder::data_type(ids::BASE_DATA_TYPE, "BaseDataType").build());
        let data_types = [
            (ids::STRUCTURE, "Structure", ids::BASE_DATA_TYPE),
            (ids::ENUMERATION, "Enumeration", ids::BASE_DATA_TYPE),
            (NUMBER, "Number", ids::BASE_DATA_TYPE),
            (ids::UINTEGER, "UInteger", NUMBER),
            (DOUBLE, "Double", NUMBER),
            (ids::DATA_TYPE_DEFINITION, "DataTypeDefinition", ids::STRUCTURE),
            (ids::OPTION_SET, "OptionSet", ids::STRUCTURE),
        ];
        for (node_id, name, parent) in data_types {
            space.add(NodeBuilder::data_type(node_id, name).subtype_of(parent).build());
        }

        // Object and variable types
        space.add(NodeBuilder::new(ids::BASE_OBJECT_TYPE, NodeClass::ObjectType, "BaseObjectType").build());
        space.add(
            NodeBuilder::new(ids::FOLDER_TYPE, NodeClass::ObjectType, "FolderType")
                .subtype_of(ids::BASE_OBJECT_TYPE)
                .build(),
        );
        space.add(
            NodeBuilder::new(ids::BASE_DATA_VARIABLE_TYPE, NodeClass::VariableType, "BaseDataVariableType")
                .build(),
        );
        space.add(NodeBuilder::new(ids::PROPERTY_TYPE, NodeClass::VariableType, "PropertyType").build());

        // Modelling rules
        space.add(
            NodeBuilder::object(ids::MODELLING_RULE_MANDATORY, "Mandatory")
                .type_definition(ids::BASE_OBJECT_TYPE)
                .build(),
        );
        space.add(
            NodeBuilder::object(ids::MODELLING_RULE_OPTIONAL, "Optional")
                .type_definition(ids::BASE_OBJECT_TYPE)
                .build(),
        );

        // Folders
        space.add(
            NodeBuilder::object(NodeId::ROOT_FOLDER, "Root")
                .type_definition(ids::FOLDER_TYPE)
                .build(),
        );
        for (node_id, name) in [
            (NodeId::OBJECTS_FOLDER, "Objects"),
            (NodeId::TYPES_FOLDER, "Types"),
            (NodeId::VIEWS_FOLDER, "Views"),
        ] {
            space.add(
                NodeBuilder::object(node_id, name)
                    .type_definition(ids::FOLDER_TYPE)
                    .organized_by(NodeId::ROOT_FOLDER)
                    .build(),
            );
        }

        space
    }

    /// The standard space plus a valid plant model in namespace 2.
    pub fn plant() -> MockAddressSpace {
        let space = Self::standard();

        space.add(
            NodeBuilder::new(Plant::PUMP_TYPE, NodeClass::ObjectType, "PumpType")
                .subtype_of(ids::BASE_OBJECT_TYPE)
                .build(),
        );
        space.add(
            NodeBuilder::object(Plant::PUMP, "Pump1")
                .type_definition(Plant::PUMP_TYPE)
                .organized_by(NodeId::OBJECTS_FOLDER)
                .build(),
        );
        space.add(
            NodeBuilder::variable(Plant::SPEED, "Speed")
                .type_definition(ids::BASE_DATA_VARIABLE_TYPE)
                .attribute(AttributeId::Value, OpcUaValue::Double(1450.0))
                .component_of(Plant::PUMP)
                .build(),
        );
        space.add(
            NodeBuilder::variable(Plant::SERIAL_NUMBER, "SerialNumber")
                .type_definition(ids::PROPERTY_TYPE)
                .modelling_rule(ids::MODELLING_RULE_MANDATORY)
                .attribute(
                    AttributeId::Value,
                    OpcUaValue::String("P-0042".to_string()),
                )
                .property_of(Plant::PUMP)
                .build(),
        );
        space.add(
            NodeBuilder::new(Plant::START, NodeClass::Method, "Start")
                .modelling_rule(ids::MODELLING_RULE_OPTIONAL)
                .component_of(Plant::PUMP)
                .build(),
        );

        space.add(
            NodeBuilder::data_type(Plant::PUMP_MODE, "PumpMode")
                .subtype_of(ids::ENUMERATION)
                .enum_definition(&["Off", "Manual", "Automatic"])
                .build(),
        );
        space.add(
            NodeBuilder::data_type(Plant::PUMP_SETTINGS, "PumpSettings")
                .subtype_of(ids::STRUCTURE)
                .structure_definition(&["Setpoint", "RampTime"])
                .reference(ids::HAS_ENCODING, Plant::PUMP_SETTINGS_ENCODING)
                .build(),
        );
        space.add(
            NodeBuilder::object(Plant::PUMP_SETTINGS_ENCODING, "Default Binary")
                .type_definition(ids::BASE_OBJECT_TYPE)
                .build(),
        );

        space.add(
            NodeBuilder::new(Plant::PLANT_VIEW, NodeClass::View, "PlantView")
                .reference(ids::ORGANIZES, Plant::PUMP)
                .organized_by(NodeId::VIEWS_FOLDER)
                .build(),
        );
        space.add(
            NodeBuilder::reference_type(Plant::FEEDS, "Feeds")
                .subtype_of(ids::HIERARCHICAL_REFERENCES)
                .attribute(
                    AttributeId::InverseName,
                    OpcUaValue::LocalizedText(LocalizedText::new("en", "FedBy")),
                )
                .build(),
        );

        space
    }

    /// A property named OptionSetValues, for UInteger-based option sets.
    pub fn option_set_values_property(node_id: NodeId, owner: NodeId) -> MockNode {
        NodeBuilder::variable(node_id, "OptionSetValues")
            .attribute(
                AttributeId::BrowseName,
                OpcUaValue::QualifiedName(QualifiedName::new(0, ids::OPTION_SET_VALUES_NAME)),
            )
            .type_definition(ids::PROPERTY_TYPE)
            .property_of(owner)
            .build()
    }
}

// =============================================================================
// Configuration fixtures
// =============================================================================

/// Configuration documents.
pub struct ConfigFixtures;

impl ConfigFixtures {
    /// A complete YAML configuration.
    pub fn full_yaml() -> &'static str {
        r#"
server:
  endpoint: "opc.tcp://plc.local:4840"
  application_name: "uacheck"
  request_timeout: "10s"

validation:
  start_nodes: ["i=85", "ns=2;i=1"]
  max_depth: 4
  max_nodes: 500
  profile: lenient
  rules:
    view_invalid_reference: error
    data_type_definition_missing: warning

output:
  dump: "dump.txt"
  format: json
  min_severity: warning

logging:
  level: info
  format: compact
"#
    }

    /// The minimal YAML configuration.
    pub fn minimal_yaml() -> &'static str {
        r#"
server:
  endpoint: "opc.tcp://localhost:4840"
"#
    }

    /// A TOML configuration.
    pub fn toml() -> &'static str {
        r#"
[server]
endpoint = "opc.tcp://localhost:4840"

[validation]
start_nodes = ["i=84"]
max_depth = 2
profile = "strict"

[validation.rules]
type_definition_cardinality = "warning"
"#
    }

    /// A configuration with the endpoint set.
    pub fn with_endpoint(endpoint: &str) -> CheckConfig {
        let mut config = CheckConfig::default();
        config.server.endpoint = endpoint.to_string();
        config
    }
}
