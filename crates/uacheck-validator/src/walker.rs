// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Address-space walker.
//!
//! Validates every node reachable from the start nodes over forward
//! hierarchical references, breadth first. Each node is validated once even
//! when several parents organise it.

use std::collections::{HashSet, VecDeque};
use std::io::Write;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uacheck_opcua::{ids, BrowseRequest, NodeId, OpcUaTransport};

use crate::diagnostic::Severity;
use crate::error::{is_fatal, ValidatorResult};
use crate::report::ValidationReport;
use crate::sink::DiagnosticSink;
use crate::validator::NodeValidator;

/// Walk limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct WalkConfig {
    /// Nodes the walk starts from.
    pub start_nodes: Vec<NodeId>,

    /// Number of levels validated, start nodes being level one. 0 = unlimited.
    pub max_depth: usize,

    /// Stops after this many nodes were validated.
    pub max_nodes: usize,
}

impl Default for WalkConfig {
    fn default() -> Self {
        Self {
            start_nodes: vec![NodeId::ROOT_FOLDER],
            max_depth: 0,
            max_nodes: 10_000,
        }
    }
}

impl WalkConfig {
    /// Walks from a single node.
    pub fn from_node(node_id: NodeId) -> Self {
        Self {
            start_nodes: vec![node_id],
            ..Default::default()
        }
    }

    /// Sets the depth limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the node limit.
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    fn expands(&self, depth: usize) -> bool {
        self.max_depth == 0 || depth + 1 < self.max_depth
    }
}

/// Totals of one walk.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WalkSummary {
    /// Nodes validated.
    pub visited: usize,
    /// Nodes that passed.
    pub passed: usize,
    /// Nodes that failed.
    pub failed: usize,
    /// Nodes whose children could not be browsed.
    pub browse_failures: usize,
    /// Info diagnostics.
    pub infos: usize,
    /// Warning diagnostics.
    pub warnings: usize,
    /// Error diagnostics.
    pub errors: usize,
    /// Ids of the failing nodes, in visit order.
    pub failed_nodes: Vec<NodeId>,
    /// The walk stopped at `max_nodes`.
    pub truncated: bool,
}

impl WalkSummary {
    /// `true` when every visited node passed.
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    fn record(&mut self, report: &ValidationReport) {
        self.visited += 1;
        self.infos += report.count(Severity::Info);
        self.warnings += report.warning_count();
        self.errors += report.error_count();
        if report.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
            self.failed_nodes.push(report.node_id.clone());
        }
    }
}

/// Breadth-first validation of an address space.
pub struct AddressSpaceWalker<'a, T: OpcUaTransport + ?Sized> {
    validator: NodeValidator<'a, T>,
    config: WalkConfig,
}

impl<'a, T: OpcUaTransport + ?Sized> AddressSpaceWalker<'a, T> {
    /// Creates a walker around a validator.
    pub fn new(validator: NodeValidator<'a, T>, config: WalkConfig) -> Self {
        Self { validator, config }
    }

    /// Returns the walk limits.
    pub fn config(&self) -> &WalkConfig {
        &self.config
    }

    /// Returns the wrapped validator.
    pub fn validator(&self) -> &NodeValidator<'a, T> {
        &self.validator
    }

    /// Validates every reachable node.
    ///
    /// Per-node problems end up in the summary. Only a dump write failure
    /// or a lost connection aborts the walk.
    pub async fn walk<W, S>(&mut self, dump: &mut W, sink: &mut S) -> ValidatorResult<WalkSummary>
    where
        W: Write + Send,
        S: DiagnosticSink,
    {
        let mut summary = WalkSummary::default();
        let mut queue: VecDeque<(NodeId, usize)> = VecDeque::new();
        let mut visited: HashSet<NodeId> = HashSet::new();

        for start in &self.config.start_nodes {
            if visited.insert(start.clone()) {
                queue.push_back((start.clone(), 0));
            }
        }

        info!(
            start_nodes = self.config.start_nodes.len(),
            max_depth = self.config.max_depth,
            max_nodes = self.config.max_nodes,
            "Starting address space walk"
        );

        let children_request = BrowseRequest::forward()
            .with_reference_type(ids::HIERARCHICAL_REFERENCES)
            .with_include_subtypes(true);

        while let Some((node_id, depth)) = queue.pop_front() {
            if summary.visited >= self.config.max_nodes {
                summary.truncated = true;
                warn!(max_nodes = self.config.max_nodes, "Node limit reached, walk truncated");
                break;
            }

            let report = self.validator.validate(&node_id, dump, sink).await?;
            summary.record(&report);

            if !self.config.expands(depth) {
                continue;
            }

            let client = self.validator.client();
            let children = match client.browse(&node_id, &children_request).await {
                Ok(children) => children,
                Err(e) if is_fatal(&e) => return Err(e.into()),
                Err(e) => {
                    debug!(node_id = %node_id, error = %e, "Skipping children of node");
                    summary.browse_failures += 1;
                    continue;
                }
            };

            for child in children {
                if !child.is_forward || child.target_id.is_null() {
                    continue;
                }
                if visited.insert(child.target_id.clone()) {
                    queue.push_back((child.target_id, depth + 1));
                }
            }
        }

        info!(
            visited = summary.visited,
            passed = summary.passed,
            failed = summary.failed,
            errors = summary.errors,
            warnings = summary.warnings,
            "Address space walk finished"
        );
        Ok(summary)
    }
}
