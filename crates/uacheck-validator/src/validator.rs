// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Node validator.
//!
//! [`NodeValidator::validate`] reads the NodeClass of a node, then the base
//! attributes, then dispatches on the class to one attribute reader and one
//! reference reader. Readers write the dump as they go and report every
//! problem as a [`Diagnostic`].
//!
//! | NodeClass      | Mandatory                                   | Optional |
//! |----------------|---------------------------------------------|----------|
//! | all            | NodeClass, BrowseName, DisplayName          | Description, WriteMask, UserWriteMask |
//! | ReferenceType  | IsAbstract, Symmetric                       | InverseName |
//! | View           | ContainsNoLoops, EventNotifier              | |
//! | Object         | EventNotifier                               | |
//! | ObjectType     | IsAbstract                                  | |
//! | Variable       | Value, DataType, ValueRank, AccessLevel, UserAccessLevel, Historizing | ArrayDimensions, MinimumSamplingInterval |
//! | VariableType   | DataType, ValueRank, IsAbstract             | Value, ArrayDimensions |
//! | Method         | Executable, UserExecutable                  | |
//! | DataType       | IsAbstract, DataTypeDefinition (derived types) | |

use std::fmt;
use std::io::Write;

use tracing::{debug, trace};
use uacheck_opcua::{
    ids, AttributeId, AttributeReads, BrowseRequest, ConversionError, DataTypeDefinition,
    NodeClass, NodeId, OpcUaError, OpcUaResult, OpcUaTransport, ReferenceDescription,
};

use crate::diagnostic::{Diagnostic, Rule};
use crate::dump::DumpWriter;
use crate::error::{is_fatal, ValidatorResult};
use crate::hierarchy::TypeHierarchy;
use crate::policy::RulePolicy;
use crate::report::ValidationReport;
use crate::sink::DiagnosticSink;

// =============================================================================
// NodeRun
// =============================================================================

/// State of one `validate` call.
struct NodeRun<'r> {
    node_id: &'r NodeId,
    dump: DumpWriter<'r, dyn Write + Send + 'r>,
    sink: &'r mut (dyn DiagnosticSink + 'r),
    report: ValidationReport,
}

/// What a DataType derives from, when that makes its definition mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DefinitionKind {
    Structure,
    Enumeration,
    OptionSet,
    UIntegerOptionSet,
}

impl DefinitionKind {
    fn expected(&self) -> &'static str {
        match self {
            Self::Structure => "StructureDefinition",
            _ => "EnumDefinition",
        }
    }
}

impl fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structure => write!(f, "Structure"),
            Self::Enumeration => write!(f, "Enumeration"),
            Self::OptionSet => write!(f, "OptionSet"),
            Self::UIntegerOptionSet => write!(f, "UInteger with OptionSetValues"),
        }
    }
}

fn reference_name(reference_type: &NodeId) -> String {
    ids::reference_type_name(reference_type)
        .map(str::to_string)
        .unwrap_or_else(|| reference_type.to_string())
}

/// Unwraps an optional attribute read; non-fatal failures become `None`.
fn optional<V>(node_id: &NodeId, attribute: AttributeId, result: OpcUaResult<V>) -> ValidatorResult<Option<V>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if is_fatal(&e) => Err(e.into()),
        Err(e) => {
            debug!(node_id = %node_id, attribute = %attribute, error = %e, "Optional attribute omitted");
            Ok(None)
        }
    }
}

// =============================================================================
// NodeValidator
// =============================================================================

/// Validates nodes of one server against the information-model rules.
///
/// The validator owns a [`TypeHierarchy`] cache, so reuse one instance for
/// every node of a run.
///
/// # Examples
///
/// ```rust,ignore
/// let mut validator = NodeValidator::new(&transport);
/// let mut dump = Vec::new();
/// let mut console = ConsoleSink::stderr();
/// let report = validator.validate(&node_id, &mut dump, &mut console).await?;
/// assert!(report.passed());
/// ```
pub struct NodeValidator<'a, T: OpcUaTransport + ?Sized> {
    client: &'a T,
    policy: RulePolicy,
    hierarchy: TypeHierarchy,
}

impl<'a, T: OpcUaTransport + ?Sized> NodeValidator<'a, T> {
    /// Creates a validator with the strict policy.
    pub fn new(client: &'a T) -> Self {
        Self {
            client,
            policy: RulePolicy::default(),
            hierarchy: TypeHierarchy::new(),
        }
    }

    /// Replaces the rule policy.
    pub fn with_policy(mut self, policy: RulePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Returns the active policy.
    pub fn policy(&self) -> &RulePolicy {
        &self.policy
    }

    /// Returns the type-hierarchy cache.
    pub fn hierarchy(&self) -> &TypeHierarchy {
        &self.hierarchy
    }

    /// Returns the client the validator reads through.
    pub fn client(&self) -> &'a T {
        self.client
    }

    /// Validates one node.
    ///
    /// The dump is written to `dump` and diagnostics go to `sink`. Errors
    /// are returned only when the run cannot go on (dump write failure,
    /// lost connection); everything else ends up in the report.
    pub async fn validate<W, S>(
        &mut self,
        node_id: &NodeId,
        dump: &mut W,
        sink: &mut S,
    ) -> ValidatorResult<ValidationReport>
    where
        W: Write + Send,
        S: DiagnosticSink,
    {
        let dump: &mut (dyn Write + Send) = dump;
        let mut run = NodeRun {
            node_id,
            dump: DumpWriter::new(dump),
            sink,
            report: ValidationReport::new(node_id.clone()),
        };

        let class = match self.client.read_node_class(node_id).await {
            Ok(class) => class,
            Err(e) if is_fatal(&e) => return Err(e.into()),
            Err(e) => {
                let rule = match &e {
                    OpcUaError::Conversion(ConversionError::InvalidValue { .. }) => {
                        Rule::NodeClassInvalid
                    }
                    _ => Rule::AttributeUnreadable,
                };
                run.dump.header(node_id, None)?;
                self.diagnose(&mut run, rule, "NodeClass", e.to_string());
                run.report.attributes_ok = false;
                run.dump.end()?;
                return Ok(run.report);
            }
        };

        debug!(node_id = %node_id, node_class = ?class, "Validating node");
        run.report.node_class = Some(class);
        run.dump.header(node_id, Some(class))?;

        self.base_attributes(&mut run).await?;

        match class {
            NodeClass::Unspecified => {
                self.diagnose(
                    &mut run,
                    Rule::NodeClassInvalid,
                    "NodeClass",
                    "node class is 'Unspecified'",
                );
                run.report.attributes_ok = false;
            }
            NodeClass::ReferenceType => {
                self.reference_type_attributes(&mut run).await?;
                self.reference_type_references(&mut run).await?;
            }
            NodeClass::View => {
                self.view_attributes(&mut run).await?;
                self.view_references(&mut run).await?;
            }
            NodeClass::Object => {
                self.object_attributes(&mut run).await?;
                self.instance_references(&mut run, "ObjectReferences", "object")
                    .await?;
            }
            NodeClass::ObjectType => {
                self.object_type_attributes(&mut run).await?;
                self.browse_references(&mut run, "ObjectTypeReferences").await?;
            }
            NodeClass::Variable => {
                self.variable_attributes(&mut run).await?;
                self.instance_references(&mut run, "VariableReferences", "variable")
                    .await?;
            }
            NodeClass::VariableType => {
                self.variable_type_attributes(&mut run).await?;
                self.browse_references(&mut run, "VariableTypeReferences").await?;
            }
            NodeClass::Method => {
                self.method_attributes(&mut run).await?;
                self.method_references(&mut run).await?;
            }
            NodeClass::DataType => {
                self.data_type_attributes(&mut run).await?;
                self.data_type_references(&mut run).await?;
            }
        }

        run.dump.end()?;

        let report = run.report;
        debug!(
            node_id = %node_id,
            passed = report.passed(),
            errors = report.error_count(),
            warnings = report.warning_count(),
            "Node validated"
        );
        Ok(report)
    }

    // =========================================================================
    // Reporting helpers
    // =========================================================================

    fn diagnose(&self, run: &mut NodeRun<'_>, rule: Rule, context: &str, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(
            run.node_id.clone(),
            rule,
            self.policy.severity_of(rule),
            context,
            message,
        );
        run.sink.emit(&diagnostic);
        run.report.diagnostics.push(diagnostic);
    }

    /// Unwraps a mandatory attribute read; a non-fatal failure is diagnosed
    /// and fails the attribute section.
    fn mandatory<V>(
        &self,
        run: &mut NodeRun<'_>,
        context: &str,
        attribute: AttributeId,
        result: OpcUaResult<V>,
    ) -> ValidatorResult<Option<V>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(e) if is_fatal(&e) => Err(e.into()),
            Err(e) => {
                self.diagnose(
                    run,
                    Rule::AttributeUnreadable,
                    context,
                    format!("reading mandatory attribute {} failed: {}", attribute, e),
                );
                run.report.attributes_ok = false;
                Ok(None)
            }
        }
    }

    // =========================================================================
    // Attribute readers
    // =========================================================================

    async fn base_attributes(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "BaseAttributes";
        let id = run.node_id;

        let result = self.client.read_browse_name(id).await;
        let Some(browse_name) = self.mandatory(run, CONTEXT, AttributeId::BrowseName, result)? else {
            return Ok(());
        };
        run.dump.attribute("BrowseName", &browse_name)?;
        run.report.browse_name = Some(browse_name);

        let result = self.client.read_display_name(id).await;
        let Some(display_name) = self.mandatory(run, CONTEXT, AttributeId::DisplayName, result)? else {
            return Ok(());
        };
        run.dump.attribute("DisplayName", display_name)?;

        let result = self.client.read_description(id).await;
        if let Some(description) = optional(id, AttributeId::Description, result)? {
            run.dump.attribute("Description", description)?;
        }
        let result = self.client.read_write_mask(id).await;
        if let Some(mask) = optional(id, AttributeId::WriteMask, result)? {
            run.dump.attribute("WriteMask", mask)?;
        }
        let result = self.client.read_user_write_mask(id).await;
        if let Some(mask) = optional(id, AttributeId::UserWriteMask, result)? {
            run.dump.attribute("UserWriteMask", mask)?;
        }
        Ok(())
    }

    async fn reference_type_attributes(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "ReferenceTypeAttributes";
        let id = run.node_id;

        let result = self.client.read_is_abstract(id).await;
        let Some(is_abstract) = self.mandatory(run, CONTEXT, AttributeId::IsAbstract, result)? else {
            return Ok(());
        };
        run.dump.attribute("IsAbstract", is_abstract)?;

        let result = self.client.read_symmetric(id).await;
        let Some(symmetric) = self.mandatory(run, CONTEXT, AttributeId::Symmetric, result)? else {
            return Ok(());
        };
        run.dump.attribute("Symmetric", symmetric)?;

        let result = self.client.read_inverse_name(id).await;
        if let Some(inverse_name) = optional(id, AttributeId::InverseName, result)? {
            run.dump.attribute("InverseName", inverse_name)?;
        }
        Ok(())
    }

    async fn view_attributes(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "ViewAttributes";
        let id = run.node_id;

        let result = self.client.read_contains_no_loops(id).await;
        let Some(no_loops) = self.mandatory(run, CONTEXT, AttributeId::ContainsNoLoops, result)? else {
            return Ok(());
        };
        run.dump.attribute("ContainsNoLoops", no_loops)?;

        let result = self.client.read_event_notifier(id).await;
        let Some(notifier) = self.mandatory(run, CONTEXT, AttributeId::EventNotifier, result)? else {
            return Ok(());
        };
        run.dump.attribute("EventNotifier", notifier)?;
        Ok(())
    }

    async fn object_attributes(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        let result = self.client.read_event_notifier(run.node_id).await;
        if let Some(notifier) =
            self.mandatory(run, "ObjectAttributes", AttributeId::EventNotifier, result)?
        {
            run.dump.attribute("EventNotifier", notifier)?;
        }
        Ok(())
    }

    async fn object_type_attributes(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        let result = self.client.read_is_abstract(run.node_id).await;
        if let Some(is_abstract) =
            self.mandatory(run, "ObjectTypeAttributes", AttributeId::IsAbstract, result)?
        {
            run.dump.attribute("IsAbstract", is_abstract)?;
        }
        Ok(())
    }

    async fn variable_attributes(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "VariableAttributes";
        let id = run.node_id;

        let result = self.client.read_value(id).await;
        let Some(value) = self.mandatory(run, CONTEXT, AttributeId::Value, result)? else {
            return Ok(());
        };
        run.dump.attribute("Value", value)?;

        let result = self.client.read_data_type(id).await;
        let Some(data_type) = self.mandatory(run, CONTEXT, AttributeId::DataType, result)? else {
            return Ok(());
        };
        run.dump.attribute("DataType", data_type)?;

        let result = self.client.read_value_rank(id).await;
        let Some(value_rank) = self.mandatory(run, CONTEXT, AttributeId::ValueRank, result)? else {
            return Ok(());
        };
        run.dump.attribute("ValueRank", value_rank)?;

        let result = self.client.read_array_dimensions(id).await;
        if let Some(dimensions) = optional(id, AttributeId::ArrayDimensions, result)? {
            run.dump.array_dimensions(&dimensions)?;
        }

        let result = self.client.read_access_level(id).await;
        let Some(access) = self.mandatory(run, CONTEXT, AttributeId::AccessLevel, result)? else {
            return Ok(());
        };
        run.dump.attribute("AccessLevel", access)?;

        let result = self.client.read_user_access_level(id).await;
        let Some(user_access) = self.mandatory(run, CONTEXT, AttributeId::UserAccessLevel, result)?
        else {
            return Ok(());
        };
        run.dump.attribute("UserAccessLevel", user_access)?;

        let result = self.client.read_minimum_sampling_interval(id).await;
        if let Some(interval) = optional(id, AttributeId::MinimumSamplingInterval, result)? {
            run.dump.attribute("MinimumSamplingInterval", interval)?;
        }

        let result = self.client.read_historizing(id).await;
        let Some(historizing) = self.mandatory(run, CONTEXT, AttributeId::Historizing, result)? else {
            return Ok(());
        };
        run.dump.attribute("Historizing", historizing)?;
        Ok(())
    }

    async fn variable_type_attributes(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "VariableTypeAttributes";
        let id = run.node_id;

        let result = self.client.read_value(id).await;
        if let Some(value) = optional(id, AttributeId::Value, result)? {
            run.dump.attribute("Value", value)?;
        }

        let result = self.client.read_data_type(id).await;
        let Some(data_type) = self.mandatory(run, CONTEXT, AttributeId::DataType, result)? else {
            return Ok(());
        };
        run.dump.attribute("DataType", data_type)?;

        let result = self.client.read_value_rank(id).await;
        let Some(value_rank) = self.mandatory(run, CONTEXT, AttributeId::ValueRank, result)? else {
            return Ok(());
        };
        run.dump.attribute("ValueRank", value_rank)?;

        let result = self.client.read_array_dimensions(id).await;
        if let Some(dimensions) = optional(id, AttributeId::ArrayDimensions, result)? {
            run.dump.array_dimensions(&dimensions)?;
        }

        let result = self.client.read_is_abstract(id).await;
        let Some(is_abstract) = self.mandatory(run, CONTEXT, AttributeId::IsAbstract, result)? else {
            return Ok(());
        };
        run.dump.attribute("IsAbstract", is_abstract)?;
        Ok(())
    }

    async fn method_attributes(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "MethodAttributes";
        let id = run.node_id;

        let result = self.client.read_executable(id).await;
        let Some(executable) = self.mandatory(run, CONTEXT, AttributeId::Executable, result)? else {
            return Ok(());
        };
        run.dump.attribute("Executable", executable)?;

        let result = self.client.read_user_executable(id).await;
        let Some(user_executable) =
            self.mandatory(run, CONTEXT, AttributeId::UserExecutable, result)?
        else {
            return Ok(());
        };
        run.dump.attribute("UserExecutable", user_executable)?;
        Ok(())
    }

    async fn data_type_attributes(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        let result = self.client.read_is_abstract(run.node_id).await;
        let Some(is_abstract) =
            self.mandatory(run, "DataTypeAttributes", AttributeId::IsAbstract, result)?
        else {
            return Ok(());
        };
        run.dump.attribute("IsAbstract", is_abstract)?;
        self.data_type_definition(run).await
    }

    // =========================================================================
    // DataTypeDefinition
    // =========================================================================

    async fn data_type_definition(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "DataTypeDefinition";
        let id = run.node_id;

        // i=97 is itself a Structure subtype but carries no definition.
        if *id == ids::DATA_TYPE_DEFINITION {
            return Ok(());
        }

        let kind = match self.definition_kind(id).await {
            Ok(Some(kind)) => kind,
            Ok(None) => return Ok(()),
            Err(e) if is_fatal(&e) => return Err(e.into()),
            Err(e) => {
                self.diagnose(
                    run,
                    Rule::BrowseFailed,
                    CONTEXT,
                    format!("type hierarchy lookup failed: {}", e),
                );
                run.report.attributes_ok = false;
                return Ok(());
            }
        };
        trace!(node_id = %id, kind = %kind, "DataTypeDefinition is mandatory");

        match self.client.read_data_type_definition(id).await {
            Ok(Some(DataTypeDefinition::Structure(def))) if kind == DefinitionKind::Structure => {
                run.dump.structure_definition(&def)?;
            }
            Ok(Some(DataTypeDefinition::Enum(def))) if kind != DefinitionKind::Structure => {
                run.dump.enum_definition(&def)?;
            }
            Ok(Some(def)) => {
                self.diagnose(
                    run,
                    Rule::DataTypeDefinitionMismatch,
                    CONTEXT,
                    format!(
                        "type derives from {} and needs a {}, got {}",
                        kind,
                        kind.expected(),
                        def.type_name()
                    ),
                );
            }
            Ok(None) => {
                self.diagnose(
                    run,
                    Rule::DataTypeDefinitionMissing,
                    CONTEXT,
                    format!(
                        "type derives from {} but has no DataTypeDefinition attribute",
                        kind
                    ),
                );
            }
            Err(e) if is_fatal(&e) => return Err(e.into()),
            Err(OpcUaError::Conversion(ConversionError::TypeMismatch { actual, .. })) => {
                self.diagnose(
                    run,
                    Rule::DataTypeDefinitionMismatch,
                    CONTEXT,
                    format!(
                        "type derives from {} and needs a {}, got {}",
                        kind,
                        kind.expected(),
                        actual
                    ),
                );
            }
            Err(e) => {
                self.diagnose(
                    run,
                    Rule::DataTypeDefinitionUnreadable,
                    CONTEXT,
                    format!("read service result is bad: {}", e),
                );
                run.report.attributes_ok = false;
            }
        }
        Ok(())
    }

    async fn definition_kind(&mut self, id: &NodeId) -> OpcUaResult<Option<DefinitionKind>> {
        let client = self.client;
        // OptionSet derives from Structure, so it must be checked first.
        if self.hierarchy.is_subtype(client, &ids::OPTION_SET, id).await? {
            return Ok(Some(DefinitionKind::OptionSet));
        }
        if self.hierarchy.is_subtype(client, &ids::ENUMERATION, id).await? {
            return Ok(Some(DefinitionKind::Enumeration));
        }
        if self.hierarchy.is_subtype(client, &ids::UINTEGER, id).await?
            && self.has_option_set_values(id).await?
        {
            return Ok(Some(DefinitionKind::UIntegerOptionSet));
        }
        if self.hierarchy.is_subtype(client, &ids::STRUCTURE, id).await? {
            return Ok(Some(DefinitionKind::Structure));
        }
        Ok(None)
    }

    async fn has_option_set_values(&self, id: &NodeId) -> OpcUaResult<bool> {
        let request = BrowseRequest::forward()
            .with_reference_type(ids::HAS_PROPERTY)
            .with_include_subtypes(false);
        let properties = self.client.browse(id, &request).await?;
        Ok(properties.iter().any(|r| {
            r.reference_type_id == ids::HAS_PROPERTY
                && (r.target_id == ids::OPTION_SET_VALUES
                    || r.browse_name.name == ids::OPTION_SET_VALUES_NAME)
        }))
    }

    // =========================================================================
    // Reference readers
    // =========================================================================

    /// Browses every forward reference and writes the reference list.
    ///
    /// Returns `None` after diagnosing a failed browse.
    async fn browse_references(
        &mut self,
        run: &mut NodeRun<'_>,
        context: &str,
    ) -> ValidatorResult<Option<Vec<ReferenceDescription>>> {
        run.dump.references_header()?;
        match self.client.browse_forward(run.node_id).await {
            Ok(references) => {
                for reference in &references {
                    run.dump.reference(reference)?;
                }
                run.report.reference_count = references.len();
                Ok(Some(references))
            }
            Err(e) if is_fatal(&e) => Err(e.into()),
            Err(e) => {
                self.diagnose(
                    run,
                    Rule::BrowseFailed,
                    context,
                    format!("browsing references failed: {}", e),
                );
                run.report.references_ok = false;
                Ok(None)
            }
        }
    }

    /// HasSubtype and HasProperty are the only references a ReferenceType
    /// may source; HasProperty must target a Variable.
    async fn reference_type_references(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "ReferenceTypeReferences";
        let Some(references) = self.browse_references(run, CONTEXT).await? else {
            return Ok(());
        };

        for reference in &references {
            if reference.reference_type_id == ids::HAS_PROPERTY {
                match self.client.read_node_class(&reference.target_id).await {
                    Ok(NodeClass::Variable) => {}
                    Ok(other) => self.diagnose(
                        run,
                        Rule::ReferenceTypePropertyNotVariable,
                        CONTEXT,
                        format!(
                            "HasProperty target {} must be of node class Variable, found {}",
                            reference.target_id, other
                        ),
                    ),
                    Err(e) if is_fatal(&e) => return Err(e.into()),
                    Err(e) => self.diagnose(
                        run,
                        Rule::ReferenceTargetUnreadable,
                        CONTEXT,
                        format!(
                            "reading node class of HasProperty target {} failed: {}",
                            reference.target_id, e
                        ),
                    ),
                }
            } else if reference.reference_type_id != ids::HAS_SUBTYPE {
                self.diagnose(
                    run,
                    Rule::ReferenceTypeInvalidReference,
                    CONTEXT,
                    format!(
                        "ReferenceType node has an invalid {} reference to {}",
                        reference_name(&reference.reference_type_id),
                        reference.target_id
                    ),
                );
            }
        }
        Ok(())
    }

    /// Views may source HasProperty and any hierarchical reference.
    async fn view_references(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "ViewReferences";
        let Some(references) = self.browse_references(run, CONTEXT).await? else {
            return Ok(());
        };

        let client = self.client;
        for reference in &references {
            if reference.reference_type_id == ids::HAS_PROPERTY {
                continue;
            }
            let hierarchical = self
                .hierarchy
                .is_subtype(client, &ids::HIERARCHICAL_REFERENCES, &reference.reference_type_id)
                .await;
            match hierarchical {
                Ok(true) => {}
                Ok(false) => self.diagnose(
                    run,
                    Rule::ViewInvalidReference,
                    CONTEXT,
                    format!(
                        "reference type {} is neither HasProperty nor hierarchical",
                        reference_name(&reference.reference_type_id)
                    ),
                ),
                Err(e) if is_fatal(&e) => return Err(e.into()),
                Err(e) => {
                    self.diagnose(
                        run,
                        Rule::BrowseFailed,
                        CONTEXT,
                        format!(
                            "type hierarchy lookup for {} failed: {}",
                            reference.reference_type_id, e
                        ),
                    );
                    run.report.references_ok = false;
                }
            }
        }
        Ok(())
    }

    /// Objects and Variables: exactly one HasTypeDefinition, at most one
    /// HasModellingRule.
    async fn instance_references(
        &mut self,
        run: &mut NodeRun<'_>,
        context: &str,
        noun: &str,
    ) -> ValidatorResult<()> {
        let Some(references) = self.browse_references(run, context).await? else {
            return Ok(());
        };

        let type_definitions = count_references(&references, &ids::HAS_TYPE_DEFINITION);
        if type_definitions != 1 {
            self.diagnose(
                run,
                Rule::TypeDefinitionCardinality,
                context,
                format!(
                    "{} must have exactly one HasTypeDefinition reference, found {}",
                    noun, type_definitions
                ),
            );
        }
        self.check_modelling_rules(run, context, noun, &references);
        Ok(())
    }

    async fn method_references(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "MethodReferences";
        if let Some(references) = self.browse_references(run, CONTEXT).await? {
            self.check_modelling_rules(run, CONTEXT, "method", &references);
        }
        Ok(())
    }

    /// DataTypes may only source HasProperty, HasSubtype and HasEncoding.
    async fn data_type_references(&mut self, run: &mut NodeRun<'_>) -> ValidatorResult<()> {
        const CONTEXT: &str = "DataTypeReferences";
        let Some(references) = self.browse_references(run, CONTEXT).await? else {
            return Ok(());
        };

        for reference in &references {
            let allowed = [ids::HAS_PROPERTY, ids::HAS_SUBTYPE, ids::HAS_ENCODING];
            if !allowed.contains(&reference.reference_type_id) {
                self.diagnose(
                    run,
                    Rule::DataTypeInvalidReference,
                    CONTEXT,
                    format!(
                        "invalid reference type {} to {}",
                        reference_name(&reference.reference_type_id),
                        reference.target_id
                    ),
                );
            }
        }
        Ok(())
    }

    fn check_modelling_rules(
        &self,
        run: &mut NodeRun<'_>,
        context: &str,
        noun: &str,
        references: &[ReferenceDescription],
    ) {
        let modelling_rules = count_references(references, &ids::HAS_MODELLING_RULE);
        if modelling_rules > 1 {
            self.diagnose(
                run,
                Rule::ModellingRuleCardinality,
                context,
                format!(
                    "{} has more than one HasModellingRule reference ({})",
                    noun, modelling_rules
                ),
            );
        }
    }
}

fn count_references(references: &[ReferenceDescription], reference_type: &NodeId) -> usize {
    references
        .iter()
        .filter(|r| r.reference_type_id == *reference_type)
        .count()
}
