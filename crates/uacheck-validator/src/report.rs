// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Per-node validation result.

use serde::Serialize;
use uacheck_opcua::{NodeClass, NodeId, QualifiedName};

use crate::diagnostic::{Diagnostic, Severity};

/// Outcome of validating one node.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    /// The validated node.
    pub node_id: NodeId,

    /// Node class, when it could be read.
    pub node_class: Option<NodeClass>,

    /// Browse name, when it could be read.
    pub browse_name: Option<QualifiedName>,

    /// Every mandatory attribute was read.
    pub attributes_ok: bool,

    /// The references were browsed.
    pub references_ok: bool,

    /// Number of outgoing references found.
    pub reference_count: usize,

    /// Findings, in the order they were produced.
    pub diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    /// Creates a clean report for a node.
    pub fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            node_class: None,
            browse_name: None,
            attributes_ok: true,
            references_ok: true,
            reference_count: 0,
            diagnostics: Vec::new(),
        }
    }

    /// `true` when every read and browse succeeded and no diagnostic is an error.
    pub fn passed(&self) -> bool {
        self.attributes_ok && self.references_ok && self.error_count() == 0
    }

    /// Counts diagnostics of one severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Number of error diagnostics.
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    /// Number of warning diagnostics.
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    /// Returns `true` if a diagnostic for the given rule was produced.
    pub fn has_rule(&self, rule: crate::Rule) -> bool {
        self.diagnostics.iter().any(|d| d.rule == rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;

    #[test]
    fn test_clean_report_passes() {
        let report = ValidationReport::new(NodeId::numeric(2, 1));
        assert!(report.passed());
        assert_eq!(report.error_count(), 0);
    }

    #[test]
    fn test_warning_does_not_fail() {
        let mut report = ValidationReport::new(NodeId::numeric(2, 1));
        report.diagnostics.push(Diagnostic::new(
            NodeId::numeric(2, 1),
            Rule::DataTypeDefinitionMissing,
            Severity::Warning,
            "DataTypeDefinition",
            "missing",
        ));
        assert!(report.passed());
        assert_eq!(report.warning_count(), 1);
        assert!(report.has_rule(Rule::DataTypeDefinitionMissing));
    }

    #[test]
    fn test_error_or_failed_section_fails() {
        let mut report = ValidationReport::new(NodeId::numeric(2, 1));
        report.references_ok = false;
        assert!(!report.passed());

        let mut report = ValidationReport::new(NodeId::numeric(2, 1));
        report.diagnostics.push(Diagnostic::new(
            NodeId::numeric(2, 1),
            Rule::TypeDefinitionCardinality,
            Severity::Error,
            "ObjectReferences",
            "none",
        ));
        assert!(!report.passed());
    }
}
