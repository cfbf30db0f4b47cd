// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Text dump of validated nodes.
//!
//! ```text
//! Id = ns=2;i=1001 Variable
//! BrowseName = 2:Temperature
//! DisplayName = Temperature
//! DataType = i=11
//! ArrayDimensions = [2, 3]
//! References:
//! 	HasTypeDefinition -> i=63 (0:BaseDataVariableType)
//!
//! ```

use std::fmt::Display;
use std::io::{self, Write};

use uacheck_opcua::{ids, EnumDefinition, NodeClass, NodeId, ReferenceDescription, StructureDefinition};

/// Formats one node at a time into a writer.
pub struct DumpWriter<'w, W: Write + ?Sized> {
    out: &'w mut W,
}

impl<'w, W: Write + ?Sized> DumpWriter<'w, W> {
    /// Wraps a writer.
    pub fn new(out: &'w mut W) -> Self {
        Self { out }
    }

    /// `Id = <node id> <NodeClass>`; the class is omitted when unknown.
    pub fn header(&mut self, node_id: &NodeId, class: Option<NodeClass>) -> io::Result<()> {
        match class {
            Some(class) => writeln!(self.out, "Id = {} {}", node_id, class),
            None => writeln!(self.out, "Id = {}", node_id),
        }
    }

    /// `<name> = <value>`.
    pub fn attribute(&mut self, name: &str, value: impl Display) -> io::Result<()> {
        writeln!(self.out, "{} = {}", name, value)
    }

    /// `ArrayDimensions = [d1, d2]`.
    pub fn array_dimensions(&mut self, dimensions: &[u32]) -> io::Result<()> {
        writeln!(self.out, "ArrayDimensions = {}", format_dimensions(dimensions))
    }

    /// Starts the reference list.
    pub fn references_header(&mut self) -> io::Result<()> {
        writeln!(self.out, "References:")
    }

    /// `\t<ref type> -> <target> (<browse name>)`.
    pub fn reference(&mut self, reference: &ReferenceDescription) -> io::Result<()> {
        let direction = if reference.is_forward { "->" } else { "<-" };
        match ids::reference_type_name(&reference.reference_type_id) {
            Some(name) => writeln!(
                self.out,
                "\t{} {} {} ({})",
                name, direction, reference.target_id, reference.browse_name
            ),
            None => writeln!(
                self.out,
                "\t{} {} {} ({})",
                reference.reference_type_id, direction, reference.target_id, reference.browse_name
            ),
        }
    }

    /// `DataTypeDefinition = { Structure: ... }`.
    pub fn structure_definition(&mut self, definition: &StructureDefinition) -> io::Result<()> {
        writeln!(self.out, "DataTypeDefinition = {{ Structure:")?;
        writeln!(self.out, "\tBaseDataType = {}", definition.base_data_type)?;
        writeln!(self.out, "\tEncodingId = {}", definition.default_encoding_id)?;
        writeln!(self.out, "\tStructureType = {}", definition.structure_type)?;
        writeln!(self.out, "\tFieldsSize = {}", definition.fields.len())?;
        for field in &definition.fields {
            writeln!(self.out, "\t[")?;
            writeln!(self.out, "\t\tName = {}", field.name)?;
            writeln!(self.out, "\t\tDescription = {}", field.description)?;
            writeln!(self.out, "\t\tDataType = {}", field.data_type)?;
            writeln!(self.out, "\t\tValueRank = {}", field.value_rank)?;
            writeln!(
                self.out,
                "\t\tArrayDimensions = {}",
                format_dimensions(&field.array_dimensions)
            )?;
            writeln!(self.out, "\t\tMaxStringLength = {}", field.max_string_length)?;
            writeln!(self.out, "\t\tIsOptional = {}", field.is_optional)?;
            writeln!(self.out, "\t]")?;
        }
        writeln!(self.out, "}}")
    }

    /// `DataTypeDefinition = { Enum: ... }`.
    pub fn enum_definition(&mut self, definition: &EnumDefinition) -> io::Result<()> {
        writeln!(self.out, "DataTypeDefinition = {{ Enum:")?;
        writeln!(self.out, "\tFieldsSize = {}", definition.fields.len())?;
        for field in &definition.fields {
            writeln!(self.out, "\t[")?;
            writeln!(self.out, "\t\tName = {}", field.name)?;
            writeln!(self.out, "\t\tValue = {}", field.value)?;
            writeln!(self.out, "\t\tDisplayName = {}", field.display_name)?;
            writeln!(self.out, "\t\tDescription = {}", field.description)?;
            writeln!(self.out, "\t]")?;
        }
        writeln!(self.out, "}}")
    }

    /// Ends the node with a blank line.
    pub fn end(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }
}

fn format_dimensions(dimensions: &[u32]) -> String {
    let inner = dimensions
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{}]", inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uacheck_opcua::{
        EnumField, LocalizedText, QualifiedName, StructureField, StructureType,
    };

    fn render(f: impl FnOnce(&mut DumpWriter<'_, Vec<u8>>) -> io::Result<()>) -> String {
        let mut buf = Vec::new();
        f(&mut DumpWriter::new(&mut buf)).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_header_and_attributes() {
        let out = render(|w| {
            w.header(&NodeId::numeric(2, 1001), Some(NodeClass::Variable))?;
            w.attribute("Historizing", false)?;
            w.array_dimensions(&[2, 3])?;
            w.array_dimensions(&[])
        });
        assert_eq!(
            out,
            "Id = ns=2;i=1001 Variable\nHistorizing = false\nArrayDimensions = [2, 3]\nArrayDimensions = []\n"
        );
    }

    #[test]
    fn test_reference_line() {
        let reference = ReferenceDescription {
            reference_type_id: ids::HAS_TYPE_DEFINITION,
            is_forward: true,
            target_id: ids::BASE_DATA_VARIABLE_TYPE,
            browse_name: QualifiedName::new(0, "BaseDataVariableType"),
            display_name: LocalizedText::text("BaseDataVariableType"),
            node_class: Some(NodeClass::VariableType),
            type_definition: None,
        };
        let out = render(|w| w.reference(&reference));
        assert_eq!(out, "\tHasTypeDefinition -> i=63 (0:BaseDataVariableType)\n");

        let custom = ReferenceDescription {
            reference_type_id: NodeId::numeric(3, 4001),
            ..reference
        };
        let out = render(|w| w.reference(&custom));
        assert_eq!(out, "\tns=3;i=4001 -> i=63 (0:BaseDataVariableType)\n");
    }

    #[test]
    fn test_structure_definition_field_blocks() {
        let field = StructureField {
            name: "X".to_string(),
            description: LocalizedText::default(),
            data_type: NodeId::ns0(11),
            value_rank: -1,
            array_dimensions: vec![],
            max_string_length: 0,
            is_optional: false,
        };
        let definition = StructureDefinition {
            default_encoding_id: NodeId::numeric(2, 5001),
            base_data_type: ids::STRUCTURE,
            structure_type: StructureType::Structure,
            fields: vec![field.clone(), StructureField { name: "Y".to_string(), ..field }],
        };
        let out = render(|w| w.structure_definition(&definition));
        assert!(out.starts_with("DataTypeDefinition = { Structure:\n"));
        assert!(out.contains("\tFieldsSize = 2\n"));
        assert_eq!(out.matches("\t[\n").count(), 2);
        assert_eq!(out.matches("\t]\n").count(), 2);
        assert!(out.contains("\t\tName = Y\n"));
        assert!(out.ends_with("}\n"));
    }

    #[test]
    fn test_enum_definition_field_blocks() {
        let definition = EnumDefinition {
            fields: vec![EnumField {
                value: 0,
                display_name: LocalizedText::text("Off"),
                description: LocalizedText::default(),
                name: "Off".to_string(),
            }],
        };
        let out = render(|w| w.enum_definition(&definition));
        assert!(out.starts_with("DataTypeDefinition = { Enum:\n"));
        assert!(out.contains("\tFieldsSize = 1\n"));
        assert!(out.contains("\t\tValue = 0\n"));
        assert_eq!(out.matches("\t[\n").count(), 1);
    }
}
