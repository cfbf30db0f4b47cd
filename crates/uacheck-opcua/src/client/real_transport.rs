// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Real OPC UA transport implementation using the `opcua` crate.
//!
//! Wraps a synchronous `opcua` client session and exposes the read and
//! browse services through [`OpcUaTransport`].
//!
//! # Example
//!
//! ```rust,ignore
//! use uacheck_opcua::client::RealOpcUaTransport;
//! use uacheck_opcua::OpcUaConfig;
//!
//! let config = OpcUaConfig::builder()
//!     .endpoint("opc.tcp://localhost:4840")
//!     .build()?;
//!
//! let mut transport = RealOpcUaTransport::new(config);
//! transport.connect().await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::{debug, info, trace};

use opcua::client::prelude::{
    AttributeService, BrowseDescription, BrowseDescriptionResultMask, Client, ClientBuilder,
    IdentityToken, ReadValueId, Session, TimestampsToReturn, ViewService,
};
use opcua::sync::RwLock as OpcUaRwLock;
use opcua::types::DecodingOptions;

use crate::client::transport::{
    EnumDefinition, EnumField, OpcUaTransport, OpcUaValue, ReadResult, ReferenceDescription,
    StructureDefinition, StructureField, StructureType, TransportState, BrowseRequest,
};
use crate::error::{
    BrowseError, ConnectionError, OpcUaError, OpcUaResult, OperationError, SessionError,
    TimeoutError,
};
use crate::types::{
    ids, AttributeId, BrowseDirection, LocalizedText, NodeClass, NodeId, NodeIdentifier,
    OpcUaConfig, QualifiedName, SecurityMode, SecurityPolicy, UserTokenType,
};

/// Upper bound on BrowseNext round trips for a single node.
const MAX_BROWSE_NEXT: usize = 1000;

/// Session re-activation attempts after a dropped channel.
const SESSION_RETRY_LIMIT: i32 = 1;

// =============================================================================
// RealOpcUaTransport
// =============================================================================

/// OPC UA transport backed by a live server session.
pub struct RealOpcUaTransport {
    /// Configuration for the transport.
    config: OpcUaConfig,

    /// Current connection state.
    state: RwLock<TransportState>,

    /// The underlying OPC UA session.
    session: RwLock<Option<Arc<OpcUaRwLock<Session>>>>,
}

impl RealOpcUaTransport {
    /// Creates a new transport with the given configuration.
    pub fn new(config: OpcUaConfig) -> Self {
        Self {
            config,
            state: RwLock::new(TransportState::Disconnected),
            session: RwLock::new(None),
        }
    }

    /// Returns the transport configuration.
    pub fn config(&self) -> &OpcUaConfig {
        &self.config
    }

    fn build_client(&self) -> OpcUaResult<Client> {
        let mut builder = ClientBuilder::new()
            .application_name(&self.config.application_name)
            .application_uri(self.config.application_uri())
            .session_retry_limit(SESSION_RETRY_LIMIT)
            .session_timeout(self.config.session_timeout.as_millis() as u32);

        if let Some(ref pki_dir) = self.config.pki_dir {
            builder = builder.pki_dir(pki_dir);
        }

        if self.config.trust_all_certificates {
            builder = builder.trust_server_certs(true);
        }

        builder.client().ok_or_else(|| {
            OpcUaError::connection(ConnectionError::client_init(
                "invalid client configuration",
            ))
        })
    }

    fn security_policy(&self) -> opcua::crypto::SecurityPolicy {
        use opcua::crypto::SecurityPolicy as Ua;
        match self.config.security_policy {
            SecurityPolicy::None => Ua::None,
            SecurityPolicy::Basic128Rsa15 => Ua::Basic128Rsa15,
            SecurityPolicy::Basic256 => Ua::Basic256,
            SecurityPolicy::Basic256Sha256 => Ua::Basic256Sha256,
            SecurityPolicy::Aes128Sha256RsaOaep => Ua::Aes128Sha256RsaOaep,
            SecurityPolicy::Aes256Sha256RsaPss => Ua::Aes256Sha256RsaPss,
        }
    }

    fn message_security_mode(&self) -> opcua::types::MessageSecurityMode {
        match self.config.security_mode {
            SecurityMode::None => opcua::types::MessageSecurityMode::None,
            SecurityMode::Sign => opcua::types::MessageSecurityMode::Sign,
            SecurityMode::SignAndEncrypt => opcua::types::MessageSecurityMode::SignAndEncrypt,
        }
    }

    fn identity_token(&self) -> IdentityToken {
        match &self.config.user_token {
            UserTokenType::Anonymous => IdentityToken::Anonymous,
            UserTokenType::UserName { username, password } => {
                IdentityToken::UserName(username.clone(), password.clone())
            }
            UserTokenType::Certificate {
                certificate_path,
                private_key_path,
            } => IdentityToken::X509(
                std::path::PathBuf::from(certificate_path),
                std::path::PathBuf::from(private_key_path),
            ),
        }
    }

    async fn session(&self) -> OpcUaResult<Arc<OpcUaRwLock<Session>>> {
        self.session
            .read()
            .await
            .clone()
            .ok_or_else(OpcUaError::not_connected)
    }

    // =========================================================================
    // Conversions
    // =========================================================================

    fn to_opcua_node_id(node_id: &NodeId) -> opcua::types::NodeId {
        let ns = node_id.namespace_index;
        match &node_id.identifier {
            NodeIdentifier::Numeric(v) => opcua::types::NodeId::new(ns, *v),
            NodeIdentifier::String(v) => opcua::types::NodeId::new(ns, v.clone()),
            NodeIdentifier::Guid(v) => {
                opcua::types::NodeId::new(ns, opcua::types::Guid::from(*v))
            }
            NodeIdentifier::Opaque(v) => {
                opcua::types::NodeId::new(ns, opcua::types::ByteString::from(v.as_slice()))
            }
        }
    }

    fn from_opcua_node_id(node_id: &opcua::types::NodeId) -> NodeId {
        let ns = node_id.namespace;
        match &node_id.identifier {
            opcua::types::Identifier::Numeric(v) => NodeId::numeric(ns, *v),
            opcua::types::Identifier::String(v) => NodeId::string(ns, v.as_ref()),
            opcua::types::Identifier::Guid(v) => {
                NodeId::guid(ns, uuid::Uuid::from_bytes(*v.as_bytes()))
            }
            opcua::types::Identifier::ByteString(v) => {
                NodeId::opaque(ns, v.value.clone().unwrap_or_default())
            }
        }
    }

    fn from_opcua_text(text: &opcua::types::LocalizedText) -> LocalizedText {
        LocalizedText::new(text.locale.as_ref(), text.text.as_ref())
    }

    fn from_opcua_name(name: &opcua::types::QualifiedName) -> QualifiedName {
        QualifiedName::new(name.namespace_index, name.name.as_ref())
    }

    fn from_opcua_datetime(dt: &opcua::types::DateTime) -> chrono::DateTime<chrono::Utc> {
        let utc = dt.as_chrono();
        chrono::DateTime::from_timestamp(utc.timestamp(), utc.timestamp_subsec_nanos())
            .unwrap_or_else(chrono::Utc::now)
    }

    fn from_structure_definition(def: &opcua::types::StructureDefinition) -> StructureDefinition {
        StructureDefinition {
            default_encoding_id: Self::from_opcua_node_id(&def.default_encoding_id),
            base_data_type: Self::from_opcua_node_id(&def.base_data_type),
            structure_type: StructureType::from_value(def.structure_type as i32)
                .unwrap_or_default(),
            fields: def
                .fields
                .iter()
                .flatten()
                .map(|f| StructureField {
                    name: f.name.as_ref().to_string(),
                    description: Self::from_opcua_text(&f.description),
                    data_type: Self::from_opcua_node_id(&f.data_type),
                    value_rank: f.value_rank,
                    array_dimensions: f.array_dimensions.clone().unwrap_or_default(),
                    max_string_length: f.max_string_length,
                    is_optional: f.is_optional,
                })
                .collect(),
        }
    }

    fn from_enum_definition(def: &opcua::types::EnumDefinition) -> EnumDefinition {
        EnumDefinition {
            fields: def
                .fields
                .iter()
                .flatten()
                .map(|f| EnumField {
                    value: f.value,
                    display_name: Self::from_opcua_text(&f.display_name),
                    description: Self::from_opcua_text(&f.description),
                    name: f.name.as_ref().to_string(),
                })
                .collect(),
        }
    }

    /// Decodes the extension objects the validator understands.
    fn from_extension_object(object: &opcua::types::ExtensionObject) -> OpcUaValue {
        let type_id = Self::from_opcua_node_id(&object.node_id);
        let options = DecodingOptions::default();

        if type_id == ids::STRUCTURE_DEFINITION_ENCODING {
            if let Ok(def) = object.decode_inner::<opcua::types::StructureDefinition>(&options) {
                return OpcUaValue::StructureDefinition(Self::from_structure_definition(&def));
            }
        } else if type_id == ids::ENUM_DEFINITION_ENCODING {
            if let Ok(def) = object.decode_inner::<opcua::types::EnumDefinition>(&options) {
                return OpcUaValue::EnumDefinition(Self::from_enum_definition(&def));
            }
        }

        debug!(type_id = %type_id, "Extension object left undecoded");
        OpcUaValue::ExtensionObject(type_id)
    }

    fn from_opcua_variant(variant: &opcua::types::Variant) -> OpcUaValue {
        use opcua::types::Variant;

        match variant {
            Variant::Empty => OpcUaValue::Null,
            Variant::Boolean(v) => OpcUaValue::Boolean(*v),
            Variant::SByte(v) => OpcUaValue::SByte(*v),
            Variant::Byte(v) => OpcUaValue::Byte(*v),
            Variant::Int16(v) => OpcUaValue::Int16(*v),
            Variant::UInt16(v) => OpcUaValue::UInt16(*v),
            Variant::Int32(v) => OpcUaValue::Int32(*v),
            Variant::UInt32(v) => OpcUaValue::UInt32(*v),
            Variant::Int64(v) => OpcUaValue::Int64(*v),
            Variant::UInt64(v) => OpcUaValue::UInt64(*v),
            Variant::Float(v) => OpcUaValue::Float(*v),
            Variant::Double(v) => OpcUaValue::Double(*v),
            Variant::String(v) => OpcUaValue::String(v.as_ref().to_string()),
            Variant::DateTime(v) => OpcUaValue::DateTime(Self::from_opcua_datetime(v)),
            Variant::Guid(v) => OpcUaValue::Guid(uuid::Uuid::from_bytes(*v.as_bytes())),
            Variant::ByteString(v) => OpcUaValue::ByteString(v.value.clone().unwrap_or_default()),
            Variant::NodeId(v) => OpcUaValue::NodeId(Self::from_opcua_node_id(v)),
            Variant::QualifiedName(v) => OpcUaValue::QualifiedName(Self::from_opcua_name(v)),
            Variant::LocalizedText(v) => OpcUaValue::LocalizedText(Self::from_opcua_text(v)),
            Variant::ExtensionObject(v) => Self::from_extension_object(v),
            Variant::Array(arr) => {
                OpcUaValue::Array(arr.values.iter().map(Self::from_opcua_variant).collect())
            }
            other => OpcUaValue::String(format!("{:?}", other)),
        }
    }

    fn from_opcua_reference(r: &opcua::types::ReferenceDescription) -> ReferenceDescription {
        let type_definition = if r.type_definition.node_id.is_null() {
            None
        } else {
            Some(Self::from_opcua_node_id(&r.type_definition.node_id))
        };

        ReferenceDescription {
            reference_type_id: Self::from_opcua_node_id(&r.reference_type_id),
            is_forward: r.is_forward,
            target_id: Self::from_opcua_node_id(&r.node_id.node_id),
            browse_name: Self::from_opcua_name(&r.browse_name),
            display_name: Self::from_opcua_text(&r.display_name),
            node_class: NodeClass::from_value(r.node_class as u32),
            type_definition,
        }
    }

    /// Classifies a failed service call. Lost sessions, dropped channels
    /// and deadlines end the run; anything else stays local to the node.
    fn service_failure(&self, status: u32, local: impl FnOnce() -> OpcUaError) -> OpcUaError {
        match OperationError::status_code_name(status) {
            "BadTimeout" => OpcUaError::timeout(TimeoutError::request(self.config.request_timeout)),
            name @ ("BadSessionIdInvalid" | "BadSessionClosed" | "BadSessionNotActivated") => {
                OpcUaError::session(SessionError::closed(name))
            }
            "BadServerNotConnected" | "BadConnectionClosed" | "BadCommunicationError" => {
                OpcUaError::not_connected()
            }
            _ => local(),
        }
    }

    fn to_opcua_direction(direction: BrowseDirection) -> opcua::types::BrowseDirection {
        match direction {
            BrowseDirection::Forward => opcua::types::BrowseDirection::Forward,
            BrowseDirection::Inverse => opcua::types::BrowseDirection::Inverse,
            BrowseDirection::Both => opcua::types::BrowseDirection::Both,
        }
    }
}

#[async_trait]
impl OpcUaTransport for RealOpcUaTransport {
    async fn connect(&mut self) -> OpcUaResult<()> {
        *self.state.write().await = TransportState::Connecting;

        info!(endpoint = %self.config.endpoint, "Connecting to OPC UA server");

        let mut client = self.build_client()?;

        let endpoints = client
            .get_server_endpoints_from_url(self.config.endpoint.as_str())
            .map_err(|e| {
                OpcUaError::connection(ConnectionError::endpoint_not_found(format!(
                    "{}: {}",
                    self.config.endpoint, e
                )))
            })?;

        let security_policy = self.security_policy();
        let message_security_mode = self.message_security_mode();

        let endpoint = endpoints
            .iter()
            .find(|e| {
                e.security_policy_uri.as_ref() == security_policy.to_uri()
                    && e.security_mode == message_security_mode
            })
            .cloned()
            .ok_or_else(|| {
                OpcUaError::connection(ConnectionError::no_suitable_endpoint(format!(
                    "{}/{}",
                    self.config.security_policy, self.config.security_mode
                )))
            })?;

        debug!(
            security_policy = %endpoint.security_policy_uri,
            security_mode = ?endpoint.security_mode,
            "Found matching endpoint"
        );

        let session = match client.connect_to_endpoint(endpoint, self.identity_token()) {
            Ok(session) => session,
            Err(status) => {
                *self.state.write().await = TransportState::Failed;
                let message = status.to_string();
                return Err(match OperationError::status_code_name(status.bits()) {
                    "BadCommunicationError" | "BadServerNotConnected" | "BadConnectionClosed"
                    | "BadTimeout" => OpcUaError::connection(ConnectionError::refused(
                        &self.config.endpoint,
                        message,
                    )),
                    _ => OpcUaError::session(SessionError::creation_failed(message)),
                });
            }
        };

        *self.session.write().await = Some(session);
        *self.state.write().await = TransportState::Connected;

        info!(endpoint = %self.config.endpoint, "Connected to OPC UA server");
        Ok(())
    }

    async fn disconnect(&mut self) -> OpcUaResult<()> {
        if let Some(session) = self.session.write().await.take() {
            session.read().disconnect();
            info!(endpoint = %self.config.endpoint, "Disconnected from OPC UA server");
        }
        *self.state.write().await = TransportState::Disconnected;
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.state().is_connected()
    }

    fn state(&self) -> TransportState {
        self.state
            .try_read()
            .map(|state| *state)
            .unwrap_or(TransportState::Disconnected)
    }

    async fn read_attribute(
        &self,
        node_id: &NodeId,
        attribute: AttributeId,
    ) -> OpcUaResult<ReadResult> {
        let session = self.session().await?;

        trace!(node_id = %node_id, attribute = %attribute, "Reading attribute");

        let read_value_id = ReadValueId {
            node_id: Self::to_opcua_node_id(node_id),
            attribute_id: attribute.value(),
            index_range: opcua::types::UAString::null(),
            data_encoding: opcua::types::QualifiedName::null(),
        };

        let results = session
            .read()
            .read(&[read_value_id], TimestampsToReturn::Both, 0.0)
            .map_err(|status| {
                self.service_failure(status.bits(), || {
                    OpcUaError::read_failed(node_id.to_string(), status.to_string())
                })
            })?;

        let Some(data_value) = results.first() else {
            return Ok(ReadResult::failure(node_id.clone(), attribute, 0x8000_0000));
        };

        let status_code = data_value.status.as_ref().map(|s| s.bits()).unwrap_or(0);
        Ok(ReadResult {
            node_id: node_id.clone(),
            attribute,
            value: data_value.value.as_ref().map(Self::from_opcua_variant),
            status_code,
        })
    }

    async fn browse(
        &self,
        node_id: &NodeId,
        request: &BrowseRequest,
    ) -> OpcUaResult<Vec<ReferenceDescription>> {
        let session = self.session().await?;

        trace!(node_id = %node_id, direction = %request.direction, "Browsing node");

        let reference_type_id = request
            .reference_type_id
            .as_ref()
            .map(Self::to_opcua_node_id)
            .unwrap_or_else(opcua::types::NodeId::null);

        let description = BrowseDescription {
            node_id: Self::to_opcua_node_id(node_id),
            browse_direction: Self::to_opcua_direction(request.direction),
            reference_type_id,
            include_subtypes: request.include_subtypes,
            node_class_mask: request.node_class_mask,
            result_mask: BrowseDescriptionResultMask::all().bits(),
        };

        let browse_failed = |message: String| {
            OpcUaError::browse(BrowseError::browse_failed(node_id.to_string(), message))
        };

        let session = session.read();
        let mut result = session
            .browse(&[description])
            .map_err(|status| {
                self.service_failure(status.bits(), || browse_failed(status.to_string()))
            })?
            .and_then(|results| results.into_iter().next())
            .ok_or_else(|| browse_failed("no browse result returned".to_string()))?;

        let mut references = Vec::new();
        for _ in 0..MAX_BROWSE_NEXT {
            if result.status_code.is_bad() {
                return Err(browse_failed(result.status_code.to_string()));
            }

            references.extend(
                result
                    .references
                    .iter()
                    .flatten()
                    .map(Self::from_opcua_reference),
            );

            if result.continuation_point.is_null() {
                return Ok(references);
            }

            let continuation_point = result.continuation_point.clone();
            result = session
                .browse_next(false, &[continuation_point])
                .map_err(|status| {
                    self.service_failure(status.bits(), || browse_failed(status.to_string()))
                })?
                .and_then(|results| results.into_iter().next())
                .ok_or_else(|| {
                    OpcUaError::browse(BrowseError::bad_continuation_point(node_id.to_string()))
                })?;
        }

        Err(OpcUaError::browse(BrowseError::bad_continuation_point(
            node_id.to_string(),
        )))
    }

    fn endpoint(&self) -> &str {
        &self.config.endpoint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport() -> RealOpcUaTransport {
        RealOpcUaTransport::new(OpcUaConfig::default())
    }

    #[test]
    fn test_enum_definition_extension_object() {
        let definition = opcua::types::EnumDefinition {
            fields: Some(vec![opcua::types::EnumField {
                value: 1,
                display_name: opcua::types::LocalizedText::new("", "Bit0"),
                description: opcua::types::LocalizedText::null(),
                name: opcua::types::UAString::from("Bit0"),
            }]),
        };
        let object = opcua::types::ExtensionObject::from_encodable(
            RealOpcUaTransport::to_opcua_node_id(&ids::ENUM_DEFINITION_ENCODING),
            &definition,
        );

        match RealOpcUaTransport::from_extension_object(&object) {
            OpcUaValue::EnumDefinition(decoded) => {
                assert_eq!(decoded.fields.len(), 1);
                assert_eq!(decoded.fields[0].name, "Bit0");
                assert_eq!(decoded.fields[0].value, 1);
            }
            other => panic!("expected an EnumDefinition, got {}", other.type_name()),
        }
    }

    #[test]
    fn test_node_id_conversion() {
        for node_id in [
            NodeId::ns0(85),
            NodeId::string(2, "Pump"),
            NodeId::opaque(3, vec![1, 2, 3]),
        ] {
            let converted = RealOpcUaTransport::to_opcua_node_id(&node_id);
            assert_eq!(RealOpcUaTransport::from_opcua_node_id(&converted), node_id);
        }
    }

    #[test]
    fn test_service_failure_classification() {
        let transport = transport();
        let local = || OpcUaError::read_failed("i=85", "BadNodeIdUnknown");

        let error = transport.service_failure(0x800A_0000, local);
        assert!(matches!(error, OpcUaError::Timeout(_)));

        let error = transport.service_failure(0x8026_0000, local);
        assert!(matches!(error, OpcUaError::Session(_)));

        let error = transport.service_failure(0x8034_0000, local);
        assert!(matches!(error, OpcUaError::Operation(_)));
    }
}
