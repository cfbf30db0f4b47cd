// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Diagnostic sinks.
//!
//! The validator never prints on its own. Diagnostics go to the
//! [`DiagnosticSink`] passed into each call; the dump goes to a separate
//! `std::io::Write`.

use std::io::{self, Write};

use crate::diagnostic::{Diagnostic, Severity};

/// Destination for diagnostics.
pub trait DiagnosticSink: Send {
    /// Receives one diagnostic.
    fn emit(&mut self, diagnostic: &Diagnostic);
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        (**self).emit(diagnostic);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        (**self).emit(diagnostic);
    }
}

// =============================================================================
// ConsoleSink
// =============================================================================

/// Writes one `<Severity> <context>: <message>` line per diagnostic.
#[derive(Debug)]
pub struct ConsoleSink<W: Write + Send = io::Stderr> {
    writer: W,
    min_severity: Severity,
}

impl ConsoleSink<io::Stderr> {
    /// Console sink on stderr.
    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    /// Console sink on any writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            min_severity: Severity::Info,
        }
    }

    /// Drops diagnostics below the given severity.
    pub fn with_min_severity(mut self, severity: Severity) -> Self {
        self.min_severity = severity;
        self
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> DiagnosticSink for ConsoleSink<W> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        if diagnostic.severity < self.min_severity {
            return;
        }
        // Console write errors are dropped.
        let _ = writeln!(self.writer, "{}", diagnostic);
    }
}

// =============================================================================
// TracingSink
// =============================================================================

/// Emits each diagnostic as a tracing event at its severity's level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&mut self, d: &Diagnostic) {
        match d.severity {
            Severity::Error => tracing::error!(
                node_id = %d.node_id, rule = %d.rule, context = %d.context, "{}", d.message
            ),
            Severity::Warning => tracing::warn!(
                node_id = %d.node_id, rule = %d.rule, context = %d.context, "{}", d.message
            ),
            Severity::Info => tracing::info!(
                node_id = %d.node_id, rule = %d.rule, context = %d.context, "{}", d.message
            ),
        }
    }
}

// =============================================================================
// MemorySink
// =============================================================================

/// Collects diagnostics in memory.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    diagnostics: Vec<Diagnostic>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every collected diagnostic.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the collected errors.
    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    /// Counts diagnostics of one severity.
    pub fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Returns `true` if nothing was collected.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Removes and returns every collected diagnostic.
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.diagnostics.push(diagnostic.clone());
    }
}

// =============================================================================
// TeeSink
// =============================================================================

/// Forwards every diagnostic to two sinks.
#[derive(Debug)]
pub struct TeeSink<A, B> {
    first: A,
    second: B,
}

impl<A: DiagnosticSink, B: DiagnosticSink> TeeSink<A, B> {
    /// Creates a tee.
    pub fn new(first: A, second: B) -> Self {
        Self { first, second }
    }

    /// Splits the tee back into its sinks.
    pub fn into_parts(self) -> (A, B) {
        (self.first, self.second)
    }
}

impl<A: DiagnosticSink, B: DiagnosticSink> DiagnosticSink for TeeSink<A, B> {
    fn emit(&mut self, diagnostic: &Diagnostic) {
        self.first.emit(diagnostic);
        self.second.emit(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::Rule;
    use uacheck_opcua::NodeId;

    fn diagnostic(severity: Severity) -> Diagnostic {
        Diagnostic::new(
            NodeId::numeric(1, 5),
            Rule::ModellingRuleCardinality,
            severity,
            "MethodReferences",
            "more than one HasModellingRule reference",
        )
    }

    #[test]
    fn test_console_sink_format() {
        let mut sink = ConsoleSink::new(Vec::new());
        sink.emit(&diagnostic(Severity::Error));
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(
            out,
            "Error MethodReferences: 'ns=1;i=5' more than one HasModellingRule reference\n"
        );
    }

    #[test]
    fn test_console_sink_min_severity() {
        let mut sink = ConsoleSink::new(Vec::new()).with_min_severity(Severity::Warning);
        sink.emit(&diagnostic(Severity::Info));
        sink.emit(&diagnostic(Severity::Warning));
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out.lines().count(), 1);
        assert!(out.starts_with("Warning "));
    }

    #[test]
    fn test_memory_sink_counts() {
        let mut sink = MemorySink::new();
        sink.emit(&diagnostic(Severity::Error));
        sink.emit(&diagnostic(Severity::Warning));
        sink.emit(&diagnostic(Severity::Error));
        assert_eq!(sink.count(Severity::Error), 2);
        assert_eq!(sink.errors().count(), 2);
        assert_eq!(sink.take().len(), 3);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_tee_sink() {
        let mut left = MemorySink::new();
        let mut right = MemorySink::new();
        {
            let mut tee = TeeSink::new(&mut left, &mut right);
            tee.emit(&diagnostic(Severity::Info));
        }
        assert_eq!(left.diagnostics().len(), 1);
        assert_eq!(right.diagnostics().len(), 1);
    }

    #[test]
    fn test_tracing_sink_does_not_panic() {
        let mut sink = TracingSink;
        sink.emit(&diagnostic(Severity::Error));
        sink.emit(&diagnostic(Severity::Info));
    }
}
