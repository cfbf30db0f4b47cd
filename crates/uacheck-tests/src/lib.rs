// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! # uacheck Integration Tests
//!
//! Integration tests for the uacheck node validator, run against an
//! in-memory address space.
//!
//! ## Module Structure
//!
//! - [`common`]: Shared test utilities
//!   - `mocks`: [`MockAddressSpace`](common::MockAddressSpace), an in-memory server
//!   - `builders`: [`NodeBuilder`](common::NodeBuilder) for valid-by-default nodes
//!   - `fixtures`: the standard namespace-0 subset and a plant model
//!   - `assertions`: report assertions
//!
//! ## Running Tests
//!
//! ```bash
//! # Run all integration tests
//! cargo test -p uacheck-tests
//!
//! # Run specific test suite
//! cargo test -p uacheck-tests --test integration_validator
//! cargo test -p uacheck-tests --test integration_walker
//! cargo test -p uacheck-tests --test integration_config
//!
//! # Run the tests against a live server
//! UACHECK_TEST_ENDPOINT=opc.tcp://localhost:4840 cargo test -p uacheck-tests -- --ignored
//! ```
//!
//! ## Writing New Tests
//!
//! ```rust,ignore
//! use uacheck_tests::prelude::*;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let space = AddressSpaceFixtures::plant();
//!     space.remove_references(&Plant::PUMP, &ids::HAS_TYPE_DEFINITION);
//!     let report = validate(&space, &Plant::PUMP).await;
//!     report.assert_rule(Rule::TypeDefinitionCardinality, Severity::Error, 1);
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod common;

/// Re-export commonly used items for convenience.
pub mod prelude {
    pub use crate::common::assertions::*;
    pub use crate::common::builders::*;
    pub use crate::common::fixtures::*;
    pub use crate::common::mocks::*;
    pub use crate::common::init_test_logging;
    pub use crate::validate;

    pub use uacheck_opcua::{ids, AttributeId, NodeClass, NodeId, OpcUaValue};
    pub use uacheck_validator::{
        MemorySink, NodeValidator, Profile, Rule, RulePolicy, Severity, ValidationReport,
    };
}

use uacheck_opcua::{NodeId, OpcUaTransport};
use uacheck_validator::{MemorySink, NodeValidator, ValidationReport};

/// Validates one node with the strict policy, discarding the dump.
pub async fn validate<T: OpcUaTransport + ?Sized>(client: &T, node_id: &NodeId) -> ValidationReport {
    let mut validator = NodeValidator::new(client);
    let mut sink = MemorySink::new();
    validator
        .validate(node_id, &mut std::io::sink(), &mut sink)
        .await
        .expect("validation run failed")
}
