// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # Mock Implementations
//!
//! [`MockAddressSpace`] is an in-memory OPC UA server behind the
//! [`OpcUaTransport`] trait.
//!
//! ## Design Principles
//!
//! - References are stored once, as forward edges; inverse browses are
//!   derived from them
//! - Reference-type filters honour the HasSubtype edges of the space itself
//! - Failures are injected per node or for the whole connection
//! - Every read and browse is counted for verification

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use uacheck_opcua::{
    ids, AttributeId, BrowseDirection, BrowseRequest, LocalizedText, NodeClass, NodeId,
    OpcUaError, OpcUaResult, OpcUaTransport, OpcUaValue, QualifiedName, ReadResult,
    ReferenceDescription, TransportState,
};

/// Status code returned for nodes the space does not contain.
pub const BAD_NODE_ID_UNKNOWN: u32 = 0x8034_0000;

/// Status code returned for attributes a node does not carry.
pub const BAD_ATTRIBUTE_ID_INVALID: u32 = 0x8035_0000;

// =============================================================================
// Mock Nodes
// =============================================================================

/// Outcome of reading one attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum MockRead {
    /// Good status with a value.
    Value(OpcUaValue),
    /// Bad status code.
    Status(u32),
}

/// A forward reference between two nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MockReference {
    /// Source node.
    pub source: NodeId,
    /// Reference type.
    pub reference_type: NodeId,
    /// Target node.
    pub target: NodeId,
}

impl MockReference {
    /// Creates a forward reference.
    pub fn new(source: NodeId, reference_type: NodeId, target: NodeId) -> Self {
        Self {
            source,
            reference_type,
            target,
        }
    }
}

/// A node with its attributes and the references it declares.
#[derive(Debug, Clone)]
pub struct MockNode {
    /// Node id.
    pub node_id: NodeId,
    /// Attribute table; the NodeClass attribute lives here too.
    pub attributes: HashMap<AttributeId, MockRead>,
    /// References declared while building the node.
    pub references: Vec<MockReference>,
}

impl MockNode {
    /// Node class, when the NodeClass attribute holds a known value.
    pub fn node_class(&self) -> Option<NodeClass> {
        match self.attributes.get(&AttributeId::NodeClass) {
            Some(MockRead::Value(OpcUaValue::Int32(v))) => {
                u32::try_from(*v).ok().and_then(NodeClass::from_value)
            }
            _ => None,
        }
    }

    fn browse_name(&self) -> QualifiedName {
        match self.attributes.get(&AttributeId::BrowseName) {
            Some(MockRead::Value(OpcUaValue::QualifiedName(name))) => name.clone(),
            _ => QualifiedName::new(0, ""),
        }
    }

    fn display_name(&self) -> LocalizedText {
        match self.attributes.get(&AttributeId::DisplayName) {
            Some(MockRead::Value(OpcUaValue::LocalizedText(text))) => text.clone(),
            _ => LocalizedText::text(""),
        }
    }
}

// =============================================================================
// Mock Address Space
// =============================================================================

/// In-memory address space implementing [`OpcUaTransport`].
#[derive(Debug)]
pub struct MockAddressSpace {
    endpoint: String,
    nodes: RwLock<HashMap<NodeId, MockNode>>,
    references: RwLock<Vec<MockReference>>,
    state: RwLock<TransportState>,

    /// Nodes whose browse fails with a browse error.
    failing_browses: RwLock<HashSet<NodeId>>,

    /// Every service fails with a connection error.
    connection_lost: AtomicBool,

    /// Connecting fails.
    fail_connect: AtomicBool,

    read_count: AtomicU64,
    browse_count: AtomicU64,
    connect_count: AtomicU64,
    disconnect_count: AtomicU64,
}

impl Default for MockAddressSpace {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAddressSpace {
    /// Creates an empty, connected address space.
    pub fn new() -> Self {
        Self {
            endpoint: "opc.tcp://mock:4840".to_string(),
            nodes: RwLock::new(HashMap::new()),
            references: RwLock::new(Vec::new()),
            state: RwLock::new(TransportState::Connected),
            failing_browses: RwLock::new(HashSet::new()),
            connection_lost: AtomicBool::new(false),
            fail_connect: AtomicBool::new(false),
            read_count: AtomicU64::new(0),
            browse_count: AtomicU64::new(0),
            connect_count: AtomicU64::new(0),
            disconnect_count: AtomicU64::new(0),
        }
    }

    /// Adds a node and the references it declares.
    pub fn add(&self, node: MockNode) -> &Self {
        let mut references = self.references.write();
        for reference in &node.references {
            if !references.contains(reference) {
                references.push(reference.clone());
            }
        }
        self.nodes.write().insert(node.node_id.clone(), node);
        self
    }

    /// Adds a forward reference.
    pub fn add_reference(&self, source: &NodeId, reference_type: &NodeId, target: &NodeId) -> &Self {
        self.references.write().push(MockReference::new(
            source.clone(),
            reference_type.clone(),
            target.clone(),
        ));
        self
    }

    /// Removes every reference of one type from a source node.
    pub fn remove_references(&self, source: &NodeId, reference_type: &NodeId) {
        self.references
            .write()
            .retain(|r| !(r.source == *source && r.reference_type == *reference_type));
    }

    /// Sets an attribute value on an existing node.
    pub fn set_attribute(&self, node_id: &NodeId, attribute: AttributeId, value: OpcUaValue) {
        if let Some(node) = self.nodes.write().get_mut(node_id) {
            node.attributes.insert(attribute, MockRead::Value(value));
        }
    }

    /// Makes reading an attribute return a bad status.
    pub fn set_bad_status(&self, node_id: &NodeId, attribute: AttributeId, status: u32) {
        if let Some(node) = self.nodes.write().get_mut(node_id) {
            node.attributes.insert(attribute, MockRead::Status(status));
        }
    }

    /// Removes an attribute; reading it returns `BadAttributeIdInvalid`.
    pub fn remove_attribute(&self, node_id: &NodeId, attribute: AttributeId) {
        if let Some(node) = self.nodes.write().get_mut(node_id) {
            node.attributes.remove(&attribute);
        }
    }

    /// Makes browsing a node fail.
    pub fn fail_browse_of(&self, node_id: &NodeId) {
        self.failing_browses.write().insert(node_id.clone());
    }

    /// Simulates a lost connection: every later service call fails.
    pub fn lose_connection(&self) {
        self.connection_lost.store(true, Ordering::SeqCst);
        *self.state.write() = TransportState::Failed;
    }

    /// Makes the next connect attempts fail.
    pub fn fail_connect(&self, fail: bool) {
        self.fail_connect.store(fail, Ordering::SeqCst);
    }

    /// Returns `true` if the node exists.
    pub fn contains(&self, node_id: &NodeId) -> bool {
        self.nodes.read().contains_key(node_id)
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.read().len()
    }

    /// Number of attribute reads served.
    pub fn read_count(&self) -> u64 {
        self.read_count.load(Ordering::SeqCst)
    }

    /// Number of browse calls served.
    pub fn browse_count(&self) -> u64 {
        self.browse_count.load(Ordering::SeqCst)
    }

    /// Number of connect calls.
    pub fn connect_count(&self) -> u64 {
        self.connect_count.load(Ordering::SeqCst)
    }

    /// Number of disconnect calls.
    pub fn disconnect_count(&self) -> u64 {
        self.disconnect_count.load(Ordering::SeqCst)
    }

    /// Resets the call counters.
    pub fn reset_counts(&self) {
        self.read_count.store(0, Ordering::SeqCst);
        self.browse_count.store(0, Ordering::SeqCst);
    }

    fn ensure_connected(&self) -> OpcUaResult<()> {
        if self.connection_lost.load(Ordering::SeqCst) {
            return Err(OpcUaError::not_connected());
        }
        Ok(())
    }

    /// `true` when `reference_type` is `ancestor` or one of its subtypes,
    /// following the HasSubtype edges of this space.
    fn is_reference_subtype(
        references: &[MockReference],
        ancestor: &NodeId,
        reference_type: &NodeId,
    ) -> bool {
        let mut seen = HashSet::new();
        let mut current = reference_type.clone();
        loop {
            if current == *ancestor {
                return true;
            }
            if !seen.insert(current.clone()) {
                return false;
            }
            match references
                .iter()
                .find(|r| r.reference_type == ids::HAS_SUBTYPE && r.target == current)
            {
                Some(parent) => current = parent.source.clone(),
                None => return false,
            }
        }
    }

    fn describe(
        nodes: &HashMap<NodeId, MockNode>,
        references: &[MockReference],
        reference: &MockReference,
        is_forward: bool,
    ) -> ReferenceDescription {
        let target_id = if is_forward {
            &reference.target
        } else {
            &reference.source
        };
        let target = nodes.get(target_id);
        let type_definition = references
            .iter()
            .find(|r| r.source == *target_id && r.reference_type == ids::HAS_TYPE_DEFINITION)
            .map(|r| r.target.clone());

        ReferenceDescription {
            reference_type_id: reference.reference_type.clone(),
            is_forward,
            target_id: target_id.clone(),
            browse_name: target
                .map(MockNode::browse_name)
                .unwrap_or_else(|| QualifiedName::new(0, "")),
            display_name: target
                .map(MockNode::display_name)
                .unwrap_or_else(|| LocalizedText::text("")),
            node_class: target.and_then(MockNode::node_class),
            type_definition,
        }
    }
}

#[async_trait]
impl OpcUaTransport for MockAddressSpace {
    async fn connect(&mut self) -> OpcUaResult<()> {
        self.connect_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_connect.load(Ordering::SeqCst) {
            *self.state.write() = TransportState::Failed;
            return Err(OpcUaError::not_connected());
        }
        self.connection_lost.store(false, Ordering::SeqCst);
        *self.state.write() = TransportState::Connected;
        Ok(())
    }

    async fn disconnect(&mut self) -> OpcUaResult<()> {
        self.disconnect_count.fetch_add(1, Ordering::SeqCst);
        *self.state.write() = TransportState::Disconnected;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state.read().is_connected()
    }

    fn state(&self) -> TransportState {
        *self.state.read()
    }

    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> OpcUaResult<ReadResult> {
        self.read_count.fetch_add(1, Ordering::SeqCst);
        self.ensure_connected()?;

        let nodes = self.nodes.read();
        let Some(node) = nodes.get(node_id) else {
            return Ok(ReadResult::failure(node_id.clone(), attribute, BAD_NODE_ID_UNKNOWN));
        };

        Ok(match node.attributes.get(&attribute) {
            Some(MockRead::Value(value)) => {
                ReadResult::success(node_id.clone(), attribute, value.clone())
            }
            Some(MockRead::Status(status)) => {
                ReadResult::failure(node_id.clone(), attribute, *status)
            }
            None => ReadResult::failure(node_id.clone(), attribute, BAD_ATTRIBUTE_ID_INVALID),
        })
    }

    async fn browse(
        &self,
        node_id: &NodeId,
        request: &BrowseRequest,
    ) -> OpcUaResult<Vec<ReferenceDescription>> {
        self.browse_count.fetch_add(1, Ordering::SeqCst);
        self.ensure_connected()?;

        if self.failing_browses.read().contains(node_id) {
            return Err(OpcUaError::browse_failed(node_id.to_string(), "BadInternalError"));
        }

        let nodes = self.nodes.read();
        if !nodes.contains_key(node_id) {
            return Err(OpcUaError::browse_failed(node_id.to_string(), "BadNodeIdUnknown"));
        }

        let references = self.references.read();
        let type_matches = |reference_type: &NodeId| match request.reference_type_id {
            None => true,
            Some(ref wanted) if request.include_subtypes => {
                Self::is_reference_subtype(&references, wanted, reference_type)
            }
            Some(ref wanted) => wanted == reference_type,
        };

        let forward = matches!(request.direction, BrowseDirection::Forward | BrowseDirection::Both);
        let inverse = matches!(request.direction, BrowseDirection::Inverse | BrowseDirection::Both);

        let mut results = Vec::new();
        for reference in references.iter() {
            if !type_matches(&reference.reference_type) {
                continue;
            }
            if forward && reference.source == *node_id {
                results.push(Self::describe(&nodes, &references, reference, true));
            }
            if inverse && reference.target == *node_id {
                results.push(Self::describe(&nodes, &references, reference, false));
            }
        }
        results.retain(|r| request.matches_node_class(r.node_class));
        Ok(results)
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
