// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Client seam, in three layers from the validator down:
//!
//! 1. [`AttributeReads`]: one typed method per standard attribute,
//!    implemented for every transport;
//! 2. [`OpcUaTransport`]: the Read and Browse services and the values
//!    they return;
//! 3. `RealOpcUaTransport` over the `opcua` crate (feature
//!    `real-transport`), or an in-memory address space in tests.

mod reads;
mod transport;

#[cfg(feature = "real-transport")]
mod real_transport;

pub use reads::AttributeReads;
pub use transport::{
    BrowseRequest, DataTypeDefinition, EnumDefinition, EnumField, OpcUaTransport, OpcUaValue,
    ReadResult, ReferenceDescription, StructureDefinition, StructureField, StructureType,
    TransportState,
};

#[cfg(feature = "real-transport")]
pub use real_transport::RealOpcUaTransport;
