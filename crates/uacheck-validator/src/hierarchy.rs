// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Memoised type-hierarchy queries.
//!
//! Supertypes are found by browsing the inverse HasSubtype reference of a
//! type node. Both the direct supertype of every type looked at and every
//! `is_subtype` answer are cached, so repeated questions about the same
//! types cost no further browse calls.

use std::collections::{HashMap, HashSet};

use tracing::trace;
use uacheck_opcua::{ids, BrowseRequest, NodeId, OpcUaResult, OpcUaTransport};

/// Cache of supertype lookups and subtype answers.
#[derive(Debug, Default, Clone)]
pub struct TypeHierarchy {
    supertypes: HashMap<NodeId, Option<NodeId>>,
    answers: HashMap<(NodeId, NodeId), bool>,
    browse_calls: u64,
}

impl TypeHierarchy {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `node` is `ancestor` or derives from it.
    ///
    /// A cycle in the HasSubtype chain ends the walk with `false`.
    pub async fn is_subtype<T>(
        &mut self,
        client: &T,
        ancestor: &NodeId,
        node: &NodeId,
    ) -> OpcUaResult<bool>
    where
        T: OpcUaTransport + ?Sized,
    {
        let key = (ancestor.clone(), node.clone());
        if let Some(answer) = self.answers.get(&key) {
            return Ok(*answer);
        }

        let mut seen = HashSet::new();
        let mut current = node.clone();
        let answer = loop {
            if current == *ancestor {
                break true;
            }
            if !seen.insert(current.clone()) {
                trace!(node_id = %node, "Cycle in type hierarchy");
                break false;
            }
            match self.supertype(client, &current).await? {
                Some(parent) => current = parent,
                None => break false,
            }
        };

        self.answers.insert(key, answer);
        Ok(answer)
    }

    /// Returns the direct supertype of a type node, if it has one.
    pub async fn supertype<T>(&mut self, client: &T, node: &NodeId) -> OpcUaResult<Option<NodeId>>
    where
        T: OpcUaTransport + ?Sized,
    {
        if let Some(parent) = self.supertypes.get(node) {
            return Ok(parent.clone());
        }

        let request = BrowseRequest::inverse()
            .with_reference_type(ids::HAS_SUBTYPE)
            .with_include_subtypes(false);
        self.browse_calls += 1;
        let parent = client
            .browse(node, &request)
            .await?
            .into_iter()
            .find(|r| !r.is_forward)
            .map(|r| r.target_id);

        trace!(node_id = %node, supertype = ?parent, "Resolved supertype");
        self.supertypes.insert(node.clone(), parent.clone());
        Ok(parent)
    }

    /// Number of browse calls issued so far.
    pub fn browse_calls(&self) -> u64 {
        self.browse_calls
    }

    /// Forgets everything cached.
    pub fn clear(&mut self) {
        self.supertypes.clear();
        self.answers.clear();
    }
}
