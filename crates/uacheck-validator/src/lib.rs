// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA node validator.
//!
//! Given a client, a node id and two sinks, [`NodeValidator`] reads the
//! attributes the node's class requires, browses its references, checks
//! them against the information-model rules and writes a textual dump.
//! Rule violations become [`Diagnostic`]s whose severity comes from a
//! [`RulePolicy`]. [`AddressSpaceWalker`] applies the validator to every
//! node reachable from a set of start nodes.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────┐      ┌──────────────────────┐
//! │ AddressSpaceWalker │─────▶│    NodeValidator     │
//! └────────────────────┘      │  ├─ RulePolicy       │
//!                             │  └─ TypeHierarchy    │
//!                             └──────────┬───────────┘
//!                     ┌──────────────────┼──────────────────┐
//!                     ▼                  ▼                  ▼
//!              OpcUaTransport       DumpWriter        DiagnosticSink
//!              (reads, browse)     (io::Write)   (console, tracing, memory)
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use uacheck_validator::{ConsoleSink, NodeValidator, RulePolicy};
//!
//! let mut validator = NodeValidator::new(&transport).with_policy(RulePolicy::lenient());
//! let mut dump = std::fs::File::create("dump.txt")?;
//! let report = validator
//!     .validate(&"ns=2;i=1001".parse()?, &mut dump, &mut ConsoleSink::stderr())
//!     .await?;
//! println!("passed: {}", report.passed());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod diagnostic;
pub mod dump;
pub mod error;
pub mod hierarchy;
pub mod policy;
pub mod report;
pub mod sink;
pub mod validator;
pub mod walker;

pub use diagnostic::{Diagnostic, Rule, Severity};
pub use dump::DumpWriter;
pub use error::{ValidatorError, ValidatorResult};
pub use hierarchy::TypeHierarchy;
pub use policy::{Profile, RulePolicy};
pub use report::ValidationReport;
pub use sink::{ConsoleSink, DiagnosticSink, MemorySink, TeeSink, TracingSink};
pub use validator::NodeValidator;
pub use walker::{AddressSpaceWalker, WalkConfig, WalkSummary};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
