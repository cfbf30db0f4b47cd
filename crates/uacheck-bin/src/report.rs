// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Report rendering for stdout.

use std::fmt::Write as _;

use uacheck_config::ReportFormat;
use uacheck_validator::{Severity, ValidationReport, WalkSummary};

use crate::error::{CliError, CliResult};

/// Renders the reports of a `node` run.
pub fn render_node_reports(reports: &[ValidationReport], format: ReportFormat) -> CliResult<String> {
    let failed = reports.iter().filter(|r| !r.passed()).count();

    match format {
        ReportFormat::Json => to_json(&serde_json::json!({
            "passed": failed == 0,
            "total": reports.len(),
            "failed": failed,
            "nodes": reports,
        })),
        ReportFormat::Text => {
            let mut out = String::new();
            for report in reports {
                let _ = writeln!(out, "{}", node_line(report));
            }
            let _ = writeln!(
                out,
                "{} node(s) validated: {} passed, {} failed",
                reports.len(),
                reports.len() - failed,
                failed
            );
            Ok(out)
        }
    }
}

/// Renders the summary of a `walk` run.
pub fn render_walk_summary(summary: &WalkSummary, format: ReportFormat) -> CliResult<String> {
    match format {
        ReportFormat::Json => to_json(summary),
        ReportFormat::Text => {
            let mut out = String::new();
            let _ = writeln!(out, "Visited:         {}", summary.visited);
            let _ = writeln!(out, "Passed:          {}", summary.passed);
            let _ = writeln!(out, "Failed:          {}", summary.failed);
            let _ = writeln!(out, "Browse failures: {}", summary.browse_failures);
            let _ = writeln!(
                out,
                "Diagnostics:     {} error(s), {} warning(s), {} info",
                summary.errors, summary.warnings, summary.infos
            );
            if summary.truncated {
                let _ = writeln!(out, "Walk stopped at the node limit");
            }
            if !summary.failed_nodes.is_empty() {
                let _ = writeln!(out);
                let _ = writeln!(out, "Failed nodes:");
                for node_id in &summary.failed_nodes {
                    let _ = writeln!(out, "  {}", node_id);
                }
            }
            Ok(out)
        }
    }
}

fn node_line(report: &ValidationReport) -> String {
    let status = if report.passed() { "PASS" } else { "FAIL" };
    let class = report
        .node_class
        .map(|c| c.to_string())
        .unwrap_or_else(|| "?".to_string());
    let name = report
        .browse_name
        .as_ref()
        .map(|n| n.to_string())
        .unwrap_or_default();

    let mut line = format!("{}  {}  {}  {}", status, report.node_id, class, name);
    let errors = report.error_count();
    let warnings = report.warning_count();
    let infos = report.count(Severity::Info);
    if errors + warnings + infos > 0 {
        let _ = write!(
            line,
            "  ({} error(s), {} warning(s), {} info)",
            errors, warnings, infos
        );
    }
    line
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map(|mut s| {
            s.push('\n');
            s
        })
        .map_err(|e| CliError::runtime(format!("cannot serialize report: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uacheck_opcua::{NodeClass, NodeId, QualifiedName};
    use uacheck_validator::{Diagnostic, Rule};

    fn report(failed: bool) -> ValidationReport {
        let mut report = ValidationReport::new(NodeId::numeric(2, 1001));
        report.node_class = Some(NodeClass::Variable);
        report.browse_name = Some(QualifiedName::new(2, "Temperature"));
        if failed {
            report.diagnostics.push(Diagnostic::new(
                NodeId::numeric(2, 1001),
                Rule::TypeDefinitionCardinality,
                Severity::Error,
                "VariableReferences",
                "2 HasTypeDefinition references",
            ));
        }
        report
    }

    #[test]
    fn test_text_node_reports() {
        let text = render_node_reports(&[report(false), report(true)], ReportFormat::Text).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("PASS  ns=2;i=1001  Variable"));
        assert!(lines[1].starts_with("FAIL"));
        assert!(lines[1].contains("1 error(s)"));
        assert_eq!(lines[2], "2 node(s) validated: 1 passed, 1 failed");
    }

    #[test]
    fn test_json_node_reports() {
        let json = render_node_reports(&[report(true)], ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["passed"], false);
        assert_eq!(value["failed"], 1);
        assert_eq!(value["nodes"].as_array().map(Vec::len), Some(1));
    }

    #[test]
    fn test_text_walk_summary() {
        let summary = WalkSummary {
            visited: 3,
            passed: 2,
            failed: 1,
            failed_nodes: vec![NodeId::numeric(2, 7)],
            truncated: true,
            ..Default::default()
        };
        let text = render_walk_summary(&summary, ReportFormat::Text).unwrap();
        assert!(text.contains("Visited:         3"));
        assert!(text.contains("node limit"));
        assert!(text.contains("  ns=2;i=7"));
    }
}
