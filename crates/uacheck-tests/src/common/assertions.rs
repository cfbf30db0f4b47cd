// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Custom Test Assertions
//!
//! Assertion helpers for validation reports, with failure messages that
//! list every diagnostic of the node.

use uacheck_validator::{Rule, Severity, ValidationReport};

fn describe(report: &ValidationReport) -> String {
    if report.diagnostics.is_empty() {
        return "no diagnostics".to_string();
    }
    report
        .diagnostics
        .iter()
        .map(|d| format!("[{}] {} {}: {}", d.severity, d.rule, d.context, d.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assertion extensions for [`ValidationReport`].
pub trait ReportAssertions {
    /// Assert that the node passed with no diagnostics at all.
    fn assert_clean(&self);

    /// Assert that the node passed.
    fn assert_passed(&self);

    /// Assert that the node failed.
    fn assert_failed(&self);

    /// Assert that exactly `count` diagnostics of `rule` were produced, all
    /// with `severity`.
    fn assert_rule(&self, rule: Rule, severity: Severity, count: usize);

    /// Assert that no diagnostic of `rule` was produced.
    fn assert_no_rule(&self, rule: Rule);
}

impl ReportAssertions for ValidationReport {
    fn assert_clean(&self) {
        assert!(
            self.passed() && self.diagnostics.is_empty(),
            "Expected {} to be clean, got:\n{}",
            self.node_id,
            describe(self)
        );
    }

    fn assert_passed(&self) {
        assert!(
            self.passed(),
            "Expected {} to pass (attributes_ok={}, references_ok={}), got:\n{}",
            self.node_id,
            self.attributes_ok,
            self.references_ok,
            describe(self)
        );
    }

    fn assert_failed(&self) {
        assert!(
            !self.passed(),
            "Expected {} to fail, got:\n{}",
            self.node_id,
            describe(self)
        );
    }

    fn assert_rule(&self, rule: Rule, severity: Severity, count: usize) {
        let matching: Vec<_> = self.diagnostics.iter().filter(|d| d.rule == rule).collect();
        assert_eq!(
            matching.len(),
            count,
            "Expected {} {} diagnostic(s) on {}, got:\n{}",
            count,
            rule,
            self.node_id,
            describe(self)
        );
        for diagnostic in matching {
            assert_eq!(
                diagnostic.severity, severity,
                "Expected {} to be {}, got {}",
                rule, severity, diagnostic.severity
            );
        }
    }

    fn assert_no_rule(&self, rule: Rule) {
        assert!(
            !self.has_rule(rule),
            "Expected no {} diagnostic on {}, got:\n{}",
            rule,
            self.node_id,
            describe(self)
        );
    }
}
