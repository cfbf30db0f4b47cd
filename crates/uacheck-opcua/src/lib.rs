// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! OPC UA client seam for uacheck.
//!
//! This crate holds everything the validator needs to know about OPC UA
//! without depending on a particular client stack: node identifiers and
//! classes, attribute ids, the attribute value model, the transport trait
//! and typed reads on top of it. The `real-transport` feature adds a
//! backend built on the `opcua` crate.
//!
//! Failures are [`OpcUaError`]s; see [`error`] for which of them end a
//! validation run.
//!
//! # Example
//!
//! ```rust,ignore
//! use uacheck_opcua::{AttributeReads, NodeId, OpcUaConfig, RealOpcUaTransport, OpcUaTransport};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = OpcUaConfig::builder()
//!         .endpoint("opc.tcp://localhost:4840")
//!         .build()?;
//!
//!     let mut transport = RealOpcUaTransport::new(config);
//!     transport.connect().await?;
//!
//!     let class = transport.read_node_class(&NodeId::OBJECTS_FOLDER).await?;
//!     println!("Objects folder is a {}", class);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]
#![deny(unsafe_code)]

pub mod client;
pub mod error;
pub mod types;

pub use error::{
    BrowseError, ConfigurationError, ConnectionError, ConversionError, ErrorCode, ErrorSeverity,
    OpcUaError, OpcUaResult, OperationError, SessionError, TimeoutError,
};

pub use types::{
    ids, AttributeId, BrowseDirection, LocalizedText, NodeClass, NodeId, NodeIdentifier,
    OpcUaConfig, OpcUaConfigBuilder, QualifiedName, SecurityMode, SecurityPolicy, UserTokenType,
};

pub use client::{
    AttributeReads, BrowseRequest, DataTypeDefinition, EnumDefinition, EnumField, OpcUaTransport,
    OpcUaValue, ReadResult, ReferenceDescription, StructureDefinition, StructureField,
    StructureType, TransportState,
};

#[cfg(feature = "real-transport")]
pub use client::RealOpcUaTransport;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
