// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Diagnostics produced while validating a node.
//!
//! Every problem the validator finds, from a failed attribute read to a
//! reference-cardinality violation, is reported as a [`Diagnostic`] tagged
//! with the [`Rule`] it broke and the [`Severity`] the active policy assigns
//! to that rule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uacheck_opcua::NodeId;

use crate::error::ValidatorError;

// =============================================================================
// Severity
// =============================================================================

/// Severity of a diagnostic. Only [`Severity::Error`] fails a node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Informational note.
    Info,
    /// Suspicious but tolerated.
    #[default]
    Warning,
    /// Fails the node.
    Error,
}

impl Severity {
    /// Returns the severity name as printed on the console.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "Info",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }

    /// Returns the corresponding tracing level.
    pub fn to_tracing_level(&self) -> tracing::Level {
        match self {
            Self::Info => tracing::Level::INFO,
            Self::Warning => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }

    /// Returns `true` for [`Severity::Error`].
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error)
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(ValidatorError::invalid_policy(format!(
                "unknown severity '{}'",
                s
            ))),
        }
    }
}

// =============================================================================
// Rule
// =============================================================================

/// Information-model rule or fault that a diagnostic refers to.
///
/// Model rules get their severity from the [`RulePolicy`](crate::RulePolicy).
/// Faults (failed reads, failed browses, invalid node classes) are always
/// [`Severity::Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    // ----- model rules -----
    /// A ReferenceType node sources a reference other than HasSubtype or HasProperty.
    ReferenceTypeInvalidReference,
    /// A HasProperty reference of a ReferenceType node targets a non-Variable.
    ReferenceTypePropertyNotVariable,
    /// The NodeClass of a reference target could not be read.
    ReferenceTargetUnreadable,
    /// An Object or Variable does not have exactly one HasTypeDefinition reference.
    TypeDefinitionCardinality,
    /// A node has more than one HasModellingRule reference.
    ModellingRuleCardinality,
    /// A View sources a reference that is neither HasProperty nor hierarchical.
    ViewInvalidReference,
    /// A DataType sources a reference other than HasProperty, HasSubtype or HasEncoding.
    DataTypeInvalidReference,
    /// A DataType that requires a DataTypeDefinition has none.
    DataTypeDefinitionMissing,
    /// The DataTypeDefinition does not match how the DataType derives.
    DataTypeDefinitionMismatch,

    // ----- faults -----
    /// The NodeClass is Unspecified or unknown.
    NodeClassInvalid,
    /// A mandatory attribute could not be read.
    AttributeUnreadable,
    /// Browsing references or the type hierarchy failed.
    BrowseFailed,
    /// The DataTypeDefinition read service failed.
    DataTypeDefinitionUnreadable,
}

impl Rule {
    /// Every rule whose severity is set by the policy.
    pub const MODEL_RULES: [Rule; 9] = [
        Rule::ReferenceTypeInvalidReference,
        Rule::ReferenceTypePropertyNotVariable,
        Rule::ReferenceTargetUnreadable,
        Rule::TypeDefinitionCardinality,
        Rule::ModellingRuleCardinality,
        Rule::ViewInvalidReference,
        Rule::DataTypeInvalidReference,
        Rule::DataTypeDefinitionMissing,
        Rule::DataTypeDefinitionMismatch,
    ];

    /// Returns the configuration key of the rule.
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ReferenceTypeInvalidReference => "reference_type_invalid_reference",
            Self::ReferenceTypePropertyNotVariable => "reference_type_property_not_variable",
            Self::ReferenceTargetUnreadable => "reference_target_unreadable",
            Self::TypeDefinitionCardinality => "type_definition_cardinality",
            Self::ModellingRuleCardinality => "modelling_rule_cardinality",
            Self::ViewInvalidReference => "view_invalid_reference",
            Self::DataTypeInvalidReference => "data_type_invalid_reference",
            Self::DataTypeDefinitionMissing => "data_type_definition_missing",
            Self::DataTypeDefinitionMismatch => "data_type_definition_mismatch",
            Self::NodeClassInvalid => "node_class_invalid",
            Self::AttributeUnreadable => "attribute_unreadable",
            Self::BrowseFailed => "browse_failed",
            Self::DataTypeDefinitionUnreadable => "data_type_definition_unreadable",
        }
    }

    /// Returns `true` if the rule is a fault rather than a model rule.
    pub const fn is_fault(&self) -> bool {
        matches!(
            self,
            Self::NodeClassInvalid
                | Self::AttributeUnreadable
                | Self::BrowseFailed
                | Self::DataTypeDefinitionUnreadable
        )
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Rule {
    type Err = ValidatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('-', "_");
        Rule::MODEL_RULES
            .iter()
            .chain(&[
                Rule::NodeClassInvalid,
                Rule::AttributeUnreadable,
                Rule::BrowseFailed,
                Rule::DataTypeDefinitionUnreadable,
            ])
            .find(|rule| rule.key() == key)
            .copied()
            .ok_or_else(|| ValidatorError::invalid_policy(format!("unknown rule '{}'", s)))
    }
}

// =============================================================================
// Diagnostic
// =============================================================================

/// One finding about one node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Node the finding is about.
    pub node_id: NodeId,
    /// Rule that was broken.
    pub rule: Rule,
    /// Effective severity.
    pub severity: Severity,
    /// Section of the validation that produced it (e.g. `VariableReferences`).
    pub context: String,
    /// Human-readable message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic.
    pub fn new(
        node_id: NodeId,
        rule: Rule,
        severity: Severity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            node_id,
            rule,
            severity,
            context: context.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if the diagnostic fails its node.
    #[inline]
    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: '{}' {}",
            self.severity, self.context, self.node_id, self.message
        )
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_order() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
        assert!(Severity::Error.is_error());
        assert_eq!(Severity::Warning.to_string(), "Warning");
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!("warn".parse::<Severity>().unwrap(), Severity::Warning);
        assert_eq!("ERROR".parse::<Severity>().unwrap(), Severity::Error);
        assert!("fatal".parse::<Severity>().is_err());
    }

    #[test]
    fn test_rule_keys_round_trip() {
        for rule in Rule::MODEL_RULES {
            assert_eq!(rule.key().parse::<Rule>().unwrap(), rule);
            assert!(!rule.is_fault());
        }
        assert_eq!(
            "type-definition-cardinality".parse::<Rule>().unwrap(),
            Rule::TypeDefinitionCardinality
        );
        assert!(Rule::BrowseFailed.is_fault());
        assert!("no_such_rule".parse::<Rule>().is_err());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic::new(
            NodeId::numeric(2, 7),
            Rule::TypeDefinitionCardinality,
            Severity::Error,
            "VariableReferences",
            "expected exactly one HasTypeDefinition reference, found 0",
        );
        assert_eq!(
            diagnostic.to_string(),
            "Error VariableReferences: 'ns=2;i=7' expected exactly one HasTypeDefinition reference, found 0"
        );
        assert!(diagnostic.is_error());
    }

    #[test]
    fn test_diagnostic_serde() {
        let diagnostic = Diagnostic::new(
            NodeId::numeric(2, 7),
            Rule::ViewInvalidReference,
            Severity::Warning,
            "ViewReferences",
            "invalid reference",
        );
        let json = serde_json::to_string(&diagnostic).unwrap();
        assert!(json.contains("\"view_invalid_reference\""));
        assert!(json.contains("\"warning\""));
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back, diagnostic);
    }
}
