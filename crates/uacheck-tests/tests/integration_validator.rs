// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Node Validator Integration Tests
//!
//! Runs [`NodeValidator`] against the in-memory plant model.
//!
//! ## Test Categories
//!
//! - `test_valid_*`: nodes that must validate cleanly
//! - `test_instance_*`: HasTypeDefinition and HasModellingRule cardinality
//! - `test_reference_type_*`, `test_view_*`, `test_data_type_*`: reference rules
//! - `test_definition_*`: DataTypeDefinition requirements
//! - `test_fault_*`: unreadable attributes, failed browses, lost connections
//! - `test_policy_*`: profiles and overrides
//! - `test_hierarchy_*`: type-hierarchy caching

use uacheck_tests::prelude::*;
use uacheck_opcua::{EnumDefinition, EnumField, LocalizedText};
use uacheck_validator::{TypeHierarchy, ValidatorError};

const EXTRA: NodeId = NodeId::numeric(2, 900);

async fn validate_with(space: &MockAddressSpace, node_id: &NodeId, policy: RulePolicy) -> ValidationReport {
    let mut validator = NodeValidator::new(space).with_policy(policy);
    validator
        .validate(node_id, &mut std::io::sink(), &mut MemorySink::new())
        .await
        .expect("validation run failed")
}

// =============================================================================
// Valid nodes
// =============================================================================

#[tokio::test]
async fn test_valid_plant_nodes() {
    init_test_logging();
    let space = AddressSpaceFixtures::plant();

    for node_id in [
        Plant::PUMP,
        Plant::SPEED,
        Plant::SERIAL_NUMBER,
        Plant::START,
        Plant::PUMP_TYPE,
        Plant::PUMP_MODE,
        Plant::PUMP_SETTINGS,
        Plant::PLANT_VIEW,
        Plant::FEEDS,
        NodeId::ROOT_FOLDER,
        NodeId::OBJECTS_FOLDER,
        ids::HAS_COMPONENT,
        ids::BASE_DATA_VARIABLE_TYPE,
    ] {
        validate(&space, &node_id).await.assert_clean();
    }
}

#[tokio::test]
async fn test_valid_report_fields() {
    let space = AddressSpaceFixtures::plant();
    let report = validate(&space, &Plant::PUMP).await;

    assert_eq!(report.node_class, Some(NodeClass::Object));
    assert_eq!(report.browse_name.as_ref().map(|n| n.name.as_str()), Some("Pump1"));
    assert!(report.attributes_ok);
    assert!(report.references_ok);
    // HasTypeDefinition, two HasComponent, one HasProperty
    assert_eq!(report.reference_count, 4);
}

#[tokio::test]
async fn test_valid_dump_layout() {
    let space = AddressSpaceFixtures::plant();
    let mut validator = NodeValidator::new(&space);
    let mut dump = Vec::new();

    validator
        .validate(&Plant::SPEED, &mut dump, &mut MemorySink::new())
        .await
        .unwrap();
    validator
        .validate(&Plant::PUMP_MODE, &mut dump, &mut MemorySink::new())
        .await
        .unwrap();

    let text = String::from_utf8(dump).unwrap();
    let mut nodes = text.split("\n\n");

    let speed = nodes.next().unwrap();
    assert!(speed.starts_with("Id = ns=2;i=2 Variable\n"));
    assert!(speed.contains("BrowseName = 2:Speed\n"));
    assert!(speed.contains("Value = 1450\n"));
    assert!(speed.contains("ArrayDimensions = []\n"));
    assert!(speed.contains("References:\n\tHasTypeDefinition -> i=63 (0:BaseDataVariableType)"));

    let mode = nodes.next().unwrap();
    assert!(mode.starts_with("Id = ns=2;i=200 DataType\n"));
    assert!(mode.contains("DataTypeDefinition = { Enum:\n\tFieldsSize = 3\n"));
    assert!(mode.contains("\t\tName = Automatic\n"));
}

// =============================================================================
// Instance references
// =============================================================================

#[tokio::test]
async fn test_instance_missing_type_definition() {
    let space = AddressSpaceFixtures::plant();
    space.remove_references(&Plant::PUMP, &ids::HAS_TYPE_DEFINITION);

    let report = validate(&space, &Plant::PUMP).await;
    report.assert_failed();
    report.assert_rule(Rule::TypeDefinitionCardinality, Severity::Error, 1);
    assert_eq!(report.diagnostics[0].context, "ObjectReferences");
}

#[tokio::test]
async fn test_instance_two_type_definitions() {
    let space = AddressSpaceFixtures::plant();
    space.add_reference(&Plant::SPEED, &ids::HAS_TYPE_DEFINITION, &ids::PROPERTY_TYPE);

    let report = validate(&space, &Plant::SPEED).await;
    report.assert_rule(Rule::TypeDefinitionCardinality, Severity::Error, 1);
    assert!(report.diagnostics[0].message.contains("found 2"));
    assert_eq!(report.diagnostics[0].context, "VariableReferences");
}

#[tokio::test]
async fn test_instance_two_modelling_rules() {
    let space = AddressSpaceFixtures::plant();
    space.add_reference(&Plant::SERIAL_NUMBER, &ids::HAS_MODELLING_RULE, &ids::MODELLING_RULE_OPTIONAL);

    let report = validate(&space, &Plant::SERIAL_NUMBER).await;
    report.assert_failed();
    report.assert_rule(Rule::ModellingRuleCardinality, Severity::Error, 1);
    report.assert_no_rule(Rule::TypeDefinitionCardinality);
}

#[tokio::test]
async fn test_instance_method_modelling_rules() {
    let space = AddressSpaceFixtures::plant();
    space.add_reference(&Plant::START, &ids::HAS_MODELLING_RULE, &ids::MODELLING_RULE_MANDATORY);

    let report = validate(&space, &Plant::START).await;
    report.assert_rule(Rule::ModellingRuleCardinality, Severity::Error, 1);
    assert_eq!(report.diagnostics[0].context, "MethodReferences");
}

// =============================================================================
// ReferenceType, View and DataType references
// =============================================================================

#[tokio::test]
async fn test_reference_type_invalid_reference() {
    let space = AddressSpaceFixtures::plant();
    space.add_reference(&Plant::FEEDS, &ids::HAS_COMPONENT, &Plant::SPEED);

    let report = validate(&space, &Plant::FEEDS).await;
    report.assert_failed();
    report.assert_rule(Rule::ReferenceTypeInvalidReference, Severity::Error, 1);
    assert!(report.diagnostics[0].message.contains("HasComponent"));
}

#[tokio::test]
async fn test_reference_type_property_must_be_variable() {
    let space = AddressSpaceFixtures::plant();
    space.add(
        NodeBuilder::variable(EXTRA, "NamingRule")
            .type_definition(ids::PROPERTY_TYPE)
            .property_of(Plant::FEEDS)
            .build(),
    );
    validate(&space, &Plant::FEEDS).await.assert_clean();

    space.add_reference(&Plant::FEEDS, &ids::HAS_PROPERTY, &Plant::PUMP);
    let report = validate(&space, &Plant::FEEDS).await;
    report.assert_rule(Rule::ReferenceTypePropertyNotVariable, Severity::Error, 1);
    assert!(report.diagnostics[0].message.contains("found Object"));
}

#[tokio::test]
async fn test_reference_type_unreadable_target() {
    let space = AddressSpaceFixtures::plant();
    space.add_reference(&Plant::FEEDS, &ids::HAS_PROPERTY, &NodeId::numeric(2, 9999));

    let report = validate(&space, &Plant::FEEDS).await;
    report.assert_rule(Rule::ReferenceTargetUnreadable, Severity::Warning, 1);
    report.assert_passed();
}

#[tokio::test]
async fn test_view_references() {
    let space = AddressSpaceFixtures::plant();
    space.add_reference(&Plant::PLANT_VIEW, &Plant::FEEDS, &Plant::SPEED);
    space.add(
        NodeBuilder::variable(EXTRA, "ViewVersion")
            .type_definition(ids::PROPERTY_TYPE)
            .property_of(Plant::PLANT_VIEW)
            .build(),
    );
    // Custom hierarchical type and HasProperty are both allowed.
    validate(&space, &Plant::PLANT_VIEW).await.assert_clean();

    space.add_reference(&Plant::PLANT_VIEW, &ids::HAS_TYPE_DEFINITION, &ids::BASE_OBJECT_TYPE);
    let report = validate(&space, &Plant::PLANT_VIEW).await;
    report.assert_failed();
    report.assert_rule(Rule::ViewInvalidReference, Severity::Error, 1);
    assert!(report.diagnostics[0].message.contains("HasTypeDefinition"));
}

#[tokio::test]
async fn test_data_type_invalid_reference() {
    let space = AddressSpaceFixtures::plant();
    space.add_reference(&Plant::PUMP_SETTINGS, &ids::HAS_COMPONENT, &Plant::SPEED);

    let report = validate(&space, &Plant::PUMP_SETTINGS).await;
    report.assert_failed();
    report.assert_rule(Rule::DataTypeInvalidReference, Severity::Error, 1);
}

// =============================================================================
// DataTypeDefinition
// =============================================================================

#[tokio::test]
async fn test_definition_missing_on_structure() {
    let space = AddressSpaceFixtures::plant();
    space.set_attribute(&Plant::PUMP_SETTINGS, AttributeId::DataTypeDefinition, OpcUaValue::Null);

    let report = validate(&space, &Plant::PUMP_SETTINGS).await;
    report.assert_rule(Rule::DataTypeDefinitionMissing, Severity::Warning, 1);
    report.assert_passed();
}

#[tokio::test]
async fn test_definition_mismatch_structure_with_enum() {
    let space = AddressSpaceFixtures::plant();
    space.add(
        NodeBuilder::data_type(EXTRA, "BadSettings")
            .subtype_of(ids::STRUCTURE)
            .enum_definition(&["A"])
            .build(),
    );

    let report = validate(&space, &EXTRA).await;
    report.assert_failed();
    report.assert_rule(Rule::DataTypeDefinitionMismatch, Severity::Error, 1);
    assert!(report.diagnostics[0].message.contains("needs a StructureDefinition, got EnumDefinition"));
}

#[tokio::test]
async fn test_definition_mismatch_enum_with_structure() {
    let space = AddressSpaceFixtures::plant();
    space.add(
        NodeBuilder::data_type(EXTRA, "BadMode")
            .subtype_of(Plant::PUMP_MODE)
            .structure_definition(&["A"])
            .build(),
    );

    let report = validate(&space, &EXTRA).await;
    report.assert_rule(Rule::DataTypeDefinitionMismatch, Severity::Error, 1);
    assert!(report.diagnostics[0].message.contains("derives from Enumeration"));
}

#[tokio::test]
async fn test_definition_mismatch_wrong_value_type() {
    let space = AddressSpaceFixtures::plant();
    space.set_attribute(
        &Plant::PUMP_SETTINGS,
        AttributeId::DataTypeDefinition,
        OpcUaValue::String("not a definition".to_string()),
    );

    let report = validate(&space, &Plant::PUMP_SETTINGS).await;
    report.assert_rule(Rule::DataTypeDefinitionMismatch, Severity::Error, 1);
    assert!(report.diagnostics[0].message.contains("got String"));
}

#[tokio::test]
async fn test_definition_option_set() {
    let space = AddressSpaceFixtures::plant();
    space.add(
        NodeBuilder::data_type(EXTRA, "Alarms")
            .subtype_of(ids::OPTION_SET)
            .enum_definition(&["HighPressure", "DryRun"])
            .build(),
    );
    validate(&space, &EXTRA).await.assert_clean();

    space.set_attribute(&EXTRA, AttributeId::DataTypeDefinition, OpcUaValue::Null);
    let report = validate(&space, &EXTRA).await;
    report.assert_rule(Rule::DataTypeDefinitionMissing, Severity::Warning, 1);
    assert!(report.diagnostics[0].message.contains("OptionSet"));
}

#[tokio::test]
async fn test_definition_option_set_takes_precedence_over_structure() {
    let space = AddressSpaceFixtures::plant();
    let mut hierarchy = TypeHierarchy::new();
    assert!(hierarchy.is_subtype(&space, &ids::STRUCTURE, &ids::OPTION_SET).await.unwrap());

    let nested = NodeId::numeric(2, 902);
    space.add(
        NodeBuilder::data_type(EXTRA, "Alarms")
            .subtype_of(ids::OPTION_SET)
            .enum_definition(&["HighPressure"])
            .build(),
    );
    space.add(
        NodeBuilder::data_type(nested.clone(), "PumpAlarms")
            .subtype_of(EXTRA)
            .enum_definition(&["HighPressure", "DryRun"])
            .build(),
    );
    validate(&space, &nested).await.assert_clean();

    space.add(
        NodeBuilder::data_type(nested.clone(), "PumpAlarms")
            .subtype_of(EXTRA)
            .structure_definition(&["HighPressure"])
            .build(),
    );
    let report = validate(&space, &nested).await;
    report.assert_failed();
    report.assert_rule(Rule::DataTypeDefinitionMismatch, Severity::Error, 1);
    assert!(report.diagnostics[0]
        .message
        .contains("derives from OptionSet and needs a EnumDefinition, got StructureDefinition"));
}

#[tokio::test]
async fn test_definition_uinteger_option_set() {
    let space = AddressSpaceFixtures::plant();
    space.add(
        NodeBuilder::data_type(EXTRA, "Flags")
            .subtype_of(ids::UINTEGER)
            .build(),
    );
    // A plain UInteger subtype needs no definition.
    validate(&space, &EXTRA).await.assert_clean();

    space.add(AddressSpaceFixtures::option_set_values_property(
        NodeId::numeric(2, 901),
        EXTRA,
    ));
    let report = validate(&space, &EXTRA).await;
    report.assert_rule(Rule::DataTypeDefinitionMissing, Severity::Warning, 1);
    assert!(report.diagnostics[0].message.contains("UInteger with OptionSetValues"));

    let definition = EnumDefinition {
        fields: vec![EnumField {
            value: 1,
            display_name: LocalizedText::text("Bit0"),
            description: LocalizedText::text(""),
            name: "Bit0".to_string(),
        }],
    };
    space.set_attribute(&EXTRA, AttributeId::DataTypeDefinition, OpcUaValue::EnumDefinition(definition));
    validate(&space, &EXTRA).await.assert_clean();
}

#[tokio::test]
async fn test_definition_data_type_definition_node_exempt() {
    let space = AddressSpaceFixtures::standard();
    validate(&space, &ids::DATA_TYPE_DEFINITION).await.assert_clean();
}

#[tokio::test]
async fn test_definition_not_required_for_other_types() {
    let space = AddressSpaceFixtures::standard();
    validate(&space, &DOUBLE).await.assert_clean();
}

#[tokio::test]
async fn test_definition_unreadable() {
    let space = AddressSpaceFixtures::plant();
    space.set_bad_status(&Plant::PUMP_SETTINGS, AttributeId::DataTypeDefinition, 0x8003_0000);

    let report = validate(&space, &Plant::PUMP_SETTINGS).await;
    report.assert_failed();
    report.assert_rule(Rule::DataTypeDefinitionUnreadable, Severity::Error, 1);
    assert!(!report.attributes_ok);
}

// =============================================================================
// Faults
// =============================================================================

#[tokio::test]
async fn test_fault_mandatory_attribute_missing() {
    let space = AddressSpaceFixtures::plant();
    space.remove_attribute(&Plant::SPEED, AttributeId::AccessLevel);

    let report = validate(&space, &Plant::SPEED).await;
    report.assert_failed();
    report.assert_rule(Rule::AttributeUnreadable, Severity::Error, 1);
    assert!(!report.attributes_ok);
    assert!(report.diagnostics[0].message.contains("AccessLevel"));
    // References are still checked.
    assert_eq!(report.reference_count, 1);
}

#[tokio::test]
async fn test_fault_optional_attribute_missing() {
    let space = AddressSpaceFixtures::plant();
    space.remove_attribute(&Plant::SPEED, AttributeId::MinimumSamplingInterval);
    space.remove_attribute(&Plant::SPEED, AttributeId::ArrayDimensions);
    space.remove_attribute(&Plant::SPEED, AttributeId::Description);

    validate(&space, &Plant::SPEED).await.assert_clean();
}

#[tokio::test]
async fn test_fault_wrong_attribute_type() {
    let space = AddressSpaceFixtures::plant();
    space.set_attribute(&Plant::PUMP, AttributeId::EventNotifier, OpcUaValue::String("x".into()));

    let report = validate(&space, &Plant::PUMP).await;
    report.assert_rule(Rule::AttributeUnreadable, Severity::Error, 1);
    assert_eq!(report.diagnostics[0].context, "ObjectAttributes");
}

#[tokio::test]
async fn test_fault_invalid_node_class() {
    let space = AddressSpaceFixtures::plant();
    space.set_attribute(&Plant::PUMP, AttributeId::NodeClass, OpcUaValue::Int32(3));

    let report = validate(&space, &Plant::PUMP).await;
    report.assert_failed();
    report.assert_rule(Rule::NodeClassInvalid, Severity::Error, 1);
    assert_eq!(report.node_class, None);
}

#[tokio::test]
async fn test_fault_unspecified_node_class() {
    let space = AddressSpaceFixtures::standard();
    space.add(NodeBuilder::new(EXTRA, NodeClass::Unspecified, "Nothing").build());

    let report = validate(&space, &EXTRA).await;
    report.assert_rule(Rule::NodeClassInvalid, Severity::Error, 1);
    assert_eq!(report.node_class, Some(NodeClass::Unspecified));
    assert!(report.browse_name.is_some());
}

#[tokio::test]
async fn test_fault_unknown_node() {
    let space = AddressSpaceFixtures::standard();
    let report = validate(&space, &NodeId::numeric(5, 1)).await;

    report.assert_failed();
    report.assert_rule(Rule::AttributeUnreadable, Severity::Error, 1);
    assert_eq!(report.diagnostics[0].context, "NodeClass");
}

#[tokio::test]
async fn test_fault_browse_failed() {
    let space = AddressSpaceFixtures::plant();
    space.fail_browse_of(&Plant::PUMP);

    let report = validate(&space, &Plant::PUMP).await;
    report.assert_failed();
    report.assert_rule(Rule::BrowseFailed, Severity::Error, 1);
    assert!(!report.references_ok);
    assert!(report.attributes_ok);
    // No cardinality verdict without references.
    report.assert_no_rule(Rule::TypeDefinitionCardinality);
}

#[tokio::test]
async fn test_fault_connection_lost() {
    let space = AddressSpaceFixtures::plant();
    space.lose_connection();

    let mut validator = NodeValidator::new(&space);
    let result = validator
        .validate(&Plant::PUMP, &mut std::io::sink(), &mut MemorySink::new())
        .await;
    assert!(matches!(result, Err(ValidatorError::Transport(_))));
}

#[tokio::test]
async fn test_fault_diagnostics_reach_sink() {
    let space = AddressSpaceFixtures::plant();
    space.remove_references(&Plant::PUMP, &ids::HAS_TYPE_DEFINITION);

    let mut validator = NodeValidator::new(&space);
    let mut sink = MemorySink::new();
    let report = validator
        .validate(&Plant::PUMP, &mut std::io::sink(), &mut sink)
        .await
        .unwrap();

    assert_eq!(sink.diagnostics(), report.diagnostics.as_slice());
    assert_eq!(sink.count(Severity::Error), 1);
}

// =============================================================================
// Policy
// =============================================================================

#[tokio::test]
async fn test_policy_lenient() {
    let space = AddressSpaceFixtures::plant();
    space.remove_references(&Plant::PUMP, &ids::HAS_TYPE_DEFINITION);
    space.set_attribute(&Plant::PUMP_SETTINGS, AttributeId::DataTypeDefinition, OpcUaValue::Null);

    let report = validate_with(&space, &Plant::PUMP, RulePolicy::lenient()).await;
    report.assert_rule(Rule::TypeDefinitionCardinality, Severity::Warning, 1);
    report.assert_passed();

    let report = validate_with(&space, &Plant::PUMP_SETTINGS, RulePolicy::lenient()).await;
    report.assert_rule(Rule::DataTypeDefinitionMissing, Severity::Info, 1);
}

#[tokio::test]
async fn test_policy_override() {
    let space = AddressSpaceFixtures::plant();
    space.remove_references(&Plant::PUMP, &ids::HAS_TYPE_DEFINITION);

    let policy = RulePolicy::strict()
        .with_override(Rule::TypeDefinitionCardinality, Severity::Info)
        .unwrap();
    let report = validate_with(&space, &Plant::PUMP, policy).await;
    report.assert_rule(Rule::TypeDefinitionCardinality, Severity::Info, 1);
    report.assert_passed();
}

#[tokio::test]
async fn test_policy_faults_stay_errors() {
    let space = AddressSpaceFixtures::plant();
    space.fail_browse_of(&Plant::PUMP);

    let report = validate_with(&space, &Plant::PUMP, RulePolicy::lenient()).await;
    report.assert_rule(Rule::BrowseFailed, Severity::Error, 1);
    assert!(RulePolicy::strict()
        .with_override(Rule::BrowseFailed, Severity::Info)
        .is_err());
}

// =============================================================================
// Type hierarchy
// =============================================================================

#[tokio::test]
async fn test_hierarchy_answers_are_cached() {
    let space = AddressSpaceFixtures::plant();
    let mut validator = NodeValidator::new(&space);
    let mut sink = MemorySink::new();

    validator
        .validate(&Plant::PUMP_MODE, &mut std::io::sink(), &mut sink)
        .await
        .unwrap();
    // PumpMode -> Enumeration -> BaseDataType -> none
    assert_eq!(validator.hierarchy().browse_calls(), 3);

    validator
        .validate(&Plant::PUMP_SETTINGS, &mut std::io::sink(), &mut sink)
        .await
        .unwrap();
    assert_eq!(validator.hierarchy().browse_calls(), 4);

    validator
        .validate(&Plant::PUMP_MODE, &mut std::io::sink(), &mut sink)
        .await
        .unwrap();
    assert_eq!(validator.hierarchy().browse_calls(), 4);
    assert!(sink.is_empty());
}

#[tokio::test]
async fn test_hierarchy_is_subtype() {
    let space = AddressSpaceFixtures::plant();
    let mut hierarchy = TypeHierarchy::new();

    assert!(hierarchy.is_subtype(&space, &ids::STRUCTURE, &ids::STRUCTURE).await.unwrap());
    assert!(hierarchy.is_subtype(&space, &ids::BASE_DATA_TYPE, &Plant::PUMP_SETTINGS).await.unwrap());
    assert!(hierarchy.is_subtype(&space, &ids::HIERARCHICAL_REFERENCES, &ids::HAS_PROPERTY).await.unwrap());
    assert!(!hierarchy.is_subtype(&space, &ids::HIERARCHICAL_REFERENCES, &ids::HAS_ENCODING).await.unwrap());
    assert!(!hierarchy.is_subtype(&space, &ids::ENUMERATION, &Plant::PUMP_SETTINGS).await.unwrap());
    assert_eq!(
        hierarchy.supertype(&space, &ids::UINTEGER).await.unwrap(),
        Some(NUMBER)
    );
}

#[tokio::test]
async fn test_hierarchy_cycle_terminates() {
    let space = AddressSpaceFixtures::standard();
    let a = NodeId::numeric(2, 500);
    let b = NodeId::numeric(2, 501);
    space.add(NodeBuilder::data_type(a.clone(), "A").subtype_of(b.clone()).build());
    space.add(NodeBuilder::data_type(b.clone(), "B").subtype_of(a.clone()).build());

    let mut hierarchy = TypeHierarchy::new();
    assert!(!hierarchy.is_subtype(&space, &ids::STRUCTURE, &a).await.unwrap());
    validate(&space, &a).await.assert_clean();
}
