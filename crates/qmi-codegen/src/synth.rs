//! Synthesizes the per-message records and codec routines.
//!
//! For each message this produces the Input/Output structs, the
//! `write_tlvs` encode path on the input and the `read_tlvs` decode path on
//! the output, plus the typed `Device` method. Encoding picks one of two
//! shapes per TLV: a fixed-size payload is written straight through behind
//! a constant length, while a variable payload is staged in a scratch
//! buffer, measured, and copied behind the measured length (the length
//! field precedes bytes whose total is not known a priori). Reusable
//! common-ref TLVs become standalone records with a read routine.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::error::CodegenError;
use crate::ident;
use crate::mapper::{self, FieldType, WireSize};
use crate::schema::{MessageDef, RefTable, Tlv};

/// Emitted signature lines wrap at the same width rustfmt uses.
const MAX_WIDTH: usize = 100;

/// The code synthesized for one message.
#[derive(Debug)]
pub struct SynthesizedMessage {
    /// Structs, trait impls and the `Device` method.
    pub code: String,
    /// The output type name, for the artifact's registry block.
    pub output_type: String,
    /// Whether any output TLV embeds the Operation Result struct.
    pub uses_op_result: bool,
    /// Whether the code calls into `crate::wire`.
    pub uses_wire: bool,
    /// Whether the code calls `find_tag`.
    pub uses_find_tag: bool,
}

/// The code synthesized for one reusable (or standalone) TLV struct.
pub struct SynthesizedStruct {
    /// Struct plus its read routine.
    pub code: String,
    /// Whether the code calls into `crate::wire`.
    pub uses_wire: bool,
}

/// Synthesizes everything for `message`, which belongs to the service named
/// `service` (its symbolic schema name, e.g. `"CTL"`).
///
/// # Errors
///
/// Schema invariant violations (duplicate tags, unnamed TLVs) and any
/// mapping failure from the field trees.
pub fn message(
    message: &MessageDef,
    service: &str,
    refs: &RefTable,
) -> Result<SynthesizedMessage, CodegenError> {
    let message_id = message.message_id()?;
    let base = format!("{}{}", ident::upper_camel(service), ident::upper_camel(&message.name));
    let input_type = format!("{base}Input");
    let output_type = format!("{base}Output");
    let service_const = format!("QMI_SERVICE_{service}");
    let method = format!("{}_{}", ident::snake(service), ident::snake(&message.name));
    let id_literal = format!("0x{message_id:04X}");

    check_unique_tags(message, "input", &message.input)?;
    check_unique_tags(message, "output", &message.output)?;

    let mut uses_wire = false;
    let mut uses_op_result = false;
    let uses_find_tag = !message.output.is_empty();
    let mut op_result_member = None;

    // Map every TLV up front so records and struct fields agree.
    let input_tlvs = map_tlvs(message, &message.input, &input_type, refs)?;
    let output_tlvs = map_tlvs(message, &message.output, &output_type, refs)?;

    for (tlv, member, _) in &output_tlvs {
        if tlv.field.common_ref.as_deref() == Some("Operation Result") {
            uses_op_result = true;
            op_result_member = Some(member.clone());
        }
    }

    let mut code = String::new();

    // Input struct and its nested records.
    code.push_str(&struct_def(
        &format!("Request for {service} \"{}\" (message {id_literal}).", message.name),
        &input_type,
        &input_tlvs,
    ));
    for (tlv, _, ty) in &input_tlvs {
        records(&mut code, ty, &input_type, &tlv.field.name, Direction::Input, &mut uses_wire)?;
    }

    // Output struct and its nested records.
    code.push('\n');
    code.push_str(&struct_def(
        &format!("Response for {service} \"{}\" (message {id_literal}).", message.name),
        &output_type,
        &output_tlvs,
    ));
    for (tlv, _, ty) in &output_tlvs {
        records(&mut code, ty, &output_type, &tlv.field.name, Direction::Output, &mut uses_wire)?;
    }

    // Identity impls.
    code.push('\n');
    code.push_str(&message_impl(&input_type, &service_const, &id_literal));
    code.push('\n');
    code.push_str(&request_impl(&input_type, &input_tlvs, &mut uses_wire)?);
    code.push('\n');
    code.push_str(&message_impl(&output_type, &service_const, &id_literal));
    code.push('\n');
    code.push_str(&response_impl(
        &output_type,
        &output_tlvs,
        op_result_member.as_deref(),
        &mut uses_wire,
    ));
    code.push('\n');
    code.push_str(&device_method(service, &message.name, &method, &input_type, &output_type));

    Ok(SynthesizedMessage {
        code,
        output_type,
        uses_op_result,
        uses_wire,
        uses_find_tag,
    })
}

/// Synthesizes the standalone record for a reusable TLV: the struct plus
/// its read routine.
///
/// # Errors
///
/// Mapping failures from the TLV's field tree.
pub fn reusable_struct(
    display_name: &str,
    rust_name: &str,
    tlv: &Tlv,
    ty: &FieldType,
) -> Result<SynthesizedStruct, CodegenError> {
    let mut uses_wire = false;
    let mut code = String::new();

    let tag = tlv.tag()?;
    let doc = format!("Reusable \"{display_name}\" record (tag 0x{tag:02X}).");
    match ty {
        FieldType::Record { fields, .. } => {
            let _ = writeln!(code, "/// {doc}");
            code.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
            let _ = writeln!(code, "pub struct {rust_name} {{");
            for field in fields {
                let _ = writeln!(code, "    /// \"{}\" field.", field.name);
                let _ = writeln!(code, "    pub {}: {},", field.member, field.ty.rust());
            }
            code.push_str("}\n");
            code.push('\n');
            code.push_str(&record_read_impl(rust_name, fields, &mut uses_wire));
            let mut nested = String::new();
            for field in fields {
                records(
                    &mut nested,
                    &field.ty,
                    rust_name,
                    &field.name,
                    Direction::Output,
                    &mut uses_wire,
                )?;
            }
            code.push_str(&nested);
        }
        other => {
            // A single-field TLV wraps its payload in a one-member record.
            let member = ident::snake(display_name);
            let _ = writeln!(code, "/// {doc}");
            code.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
            let _ = writeln!(code, "pub struct {rust_name} {{");
            let _ = writeln!(code, "    /// \"{display_name}\" field.");
            let _ = writeln!(code, "    pub {}: {},", member, other.rust());
            code.push_str("}\n");
            code.push('\n');
            let field = mapper::NamedField {
                name: display_name.to_owned(),
                member,
                ty: other.clone(),
            };
            code.push_str(&record_read_impl(rust_name, std::slice::from_ref(&field), &mut uses_wire));
        }
    }

    Ok(SynthesizedStruct { code, uses_wire })
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Direction {
    Input,
    Output,
}

type MappedTlv = (Tlv, String, FieldType);

fn map_tlvs(
    message: &MessageDef,
    tlvs: &[Tlv],
    owner: &str,
    refs: &RefTable,
) -> Result<Vec<MappedTlv>, CodegenError> {
    tlvs.iter()
        .map(|tlv| {
            let member = tlv.member_name().ok_or_else(|| CodegenError::UnnamedTlv {
                message: message.name.clone(),
            })?;
            let ty = mapper::map_field(&tlv.field, owner, refs)?;
            Ok((tlv.clone(), member, ty))
        })
        .collect()
}

fn check_unique_tags(
    message: &MessageDef,
    direction: &'static str,
    tlvs: &[Tlv],
) -> Result<(), CodegenError> {
    let mut seen = BTreeSet::new();
    for tlv in tlvs {
        let tag = tlv.tag()?;
        if !seen.insert(tag) {
            return Err(CodegenError::DuplicateTlvId {
                message: message.name.clone(),
                direction,
                id: tag,
            });
        }
    }
    Ok(())
}

fn tlv_doc_label(tlv: &Tlv) -> &str {
    if tlv.field.name.is_empty() {
        tlv.field.common_ref.as_deref().unwrap_or("")
    } else {
        &tlv.field.name
    }
}

fn struct_def(doc: &str, name: &str, tlvs: &[MappedTlv]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "/// {doc}");
    out.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
    if tlvs.is_empty() {
        let _ = writeln!(out, "pub struct {name} {{}}");
        return out;
    }
    let _ = writeln!(out, "pub struct {name} {{");
    for (tlv, member, ty) in tlvs {
        let tag = tlv.tag().unwrap_or(Tlv::OPERATION_RESULT_TAG);
        let _ = writeln!(out, "    /// \"{}\" TLV (tag 0x{tag:02X}).", tlv_doc_label(tlv));
        let _ = writeln!(out, "    pub {member}: {},", ty.rust());
    }
    out.push_str("}\n");
    out
}

/// Emits the named record definitions nested inside `ty` (pre-order), with
/// the direction's codec routine on each.
fn records(
    out: &mut String,
    ty: &FieldType,
    parent: &str,
    schema_name: &str,
    direction: Direction,
    uses_wire: &mut bool,
) -> Result<(), CodegenError> {
    match ty {
        FieldType::Record { name, fields, .. } => {
            out.push('\n');
            if schema_name.is_empty() {
                let _ = writeln!(out, "/// Element record of [`{parent}`].");
            } else {
                let _ = writeln!(out, "/// \"{schema_name}\" record of [`{parent}`].");
            }
            out.push_str("#[derive(Debug, Clone, Default, PartialEq)]\n");
            let _ = writeln!(out, "pub struct {name} {{");
            for field in fields {
                let _ = writeln!(out, "    /// \"{}\" field.", field.name);
                let _ = writeln!(out, "    pub {}: {},", field.member, field.ty.rust());
            }
            out.push_str("}\n");
            out.push('\n');
            match direction {
                Direction::Output => out.push_str(&record_read_impl(name, fields, uses_wire)),
                Direction::Input => out.push_str(&record_write_impl(name, fields, uses_wire)?),
            }
            for field in fields {
                records(out, &field.ty, name, &field.name, direction, uses_wire)?;
            }
        }
        FieldType::Array { element } => {
            records(out, element, parent, schema_name, direction, uses_wire)?;
        }
        _ => {}
    }
    Ok(())
}

fn record_read_impl(name: &str, fields: &[mapper::NamedField], uses_wire: &mut bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "impl {name} {{");
    out.push_str("    /// Reads the record's fields from `buf` in declaration order.\n");
    out.push_str("    ///\n");
    out.push_str("    /// # Errors\n");
    out.push_str("    ///\n");
    out.push_str("    /// [`QmiError::TruncatedTlv`] if `buf` ends early.\n");
    out.push_str("    pub fn read_from(buf: &mut &[u8]) -> Result<Self, QmiError> {\n");
    out.push_str("        Ok(Self {\n");
    for field in fields {
        match &field.ty {
            FieldType::Array { element } => {
                let elem = read_expr(element, uses_wire);
                let _ = writeln!(out, "            {}: {{", field.member);
                out.push_str("                let mut items = Vec::new();\n");
                out.push_str("                while !buf.is_empty() {\n");
                let _ = writeln!(out, "                    items.push({elem});");
                out.push_str("                }\n");
                out.push_str("                items\n");
                out.push_str("            },\n");
            }
            other => {
                let _ = writeln!(out, "            {}: {},", field.member, read_expr(other, uses_wire));
            }
        }
    }
    out.push_str("        })\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

fn record_write_impl(
    name: &str,
    fields: &[mapper::NamedField],
    uses_wire: &mut bool,
) -> Result<String, CodegenError> {
    let mut out = String::new();
    let _ = writeln!(out, "impl {name} {{");
    out.push_str("    /// Appends the record's fields to `out` in declaration order.\n");
    out.push_str("    pub fn write_to(&self, out: &mut Vec<u8>) {\n");
    for field in fields {
        out.push_str(&write_stmt(
            &format!("self.{}", field.member),
            &field.name,
            &field.ty,
            "out",
            "        ",
            uses_wire,
        )?);
    }
    out.push_str("    }\n");
    out.push_str("}\n");
    Ok(out)
}

/// Renders the expression decoding one non-array value from the cursor.
fn read_expr(ty: &FieldType, uses_wire: &mut bool) -> String {
    match ty {
        FieldType::Scalar(scalar) => {
            *uses_wire = true;
            format!("wire::{}(buf)?", scalar.reader())
        }
        FieldType::String => {
            *uses_wire = true;
            "wire::read_string(buf)".to_owned()
        }
        FieldType::FixedBytes(_) => {
            *uses_wire = true;
            "wire::read_array(buf)?".to_owned()
        }
        FieldType::Record { name, .. } | FieldType::CommonRef { name, .. } => {
            format!("{name}::read_from(buf)?")
        }
        FieldType::Array { .. } => unreachable!("arrays are decoded by their enclosing loop"),
    }
}

/// Renders the statement(s) encoding `path` into `writer`.
fn write_stmt(
    path: &str,
    schema_name: &str,
    ty: &FieldType,
    writer: &str,
    indent: &str,
    uses_wire: &mut bool,
) -> Result<String, CodegenError> {
    Ok(match ty {
        FieldType::Scalar(_) => format!("{indent}{writer}.extend_from_slice(&{path}.to_le_bytes());\n"),
        FieldType::String => format!("{indent}{writer}.extend_from_slice({path}.as_bytes());\n"),
        FieldType::FixedBytes(_) => format!("{indent}{writer}.extend_from_slice(&{path});\n"),
        FieldType::Record { .. } => format!("{indent}{path}.write_to({writer});\n"),
        FieldType::CommonRef { .. } => {
            return Err(CodegenError::CommonRefInRequest {
                field: schema_name.to_owned(),
            })
        }
        FieldType::Array { element } => {
            let inner_indent = format!("{indent}    ");
            let inner = write_stmt("element", schema_name, element, writer, &inner_indent, uses_wire)?;
            format!("{indent}for element in &{path} {{\n{inner}{indent}}}\n")
        }
    })
}

fn message_impl(ty: &str, service_const: &str, id_literal: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "impl Message for {ty} {{");
    out.push_str("    fn service_id(&self) -> Service {\n");
    let _ = writeln!(out, "        {service_const}");
    out.push_str("    }\n");
    out.push('\n');
    out.push_str("    fn message_id(&self) -> u16 {\n");
    let _ = writeln!(out, "        {id_literal}");
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

fn request_impl(
    input_type: &str,
    tlvs: &[MappedTlv],
    uses_wire: &mut bool,
) -> Result<String, CodegenError> {
    let mut out = String::new();
    let _ = writeln!(out, "impl Request for {input_type} {{");
    let param = if tlvs.is_empty() { "_out" } else { "out" };
    let _ = writeln!(out, "    fn write_tlvs(&self, {param}: &mut Vec<u8>) -> Result<(), QmiError> {{");
    for (tlv, member, ty) in tlvs {
        let tag = tlv.tag()?;
        match ty.size() {
            WireSize::Fixed(len) => {
                let _ = writeln!(out, "        out.push(0x{tag:02X});");
                let _ = writeln!(out, "        out.extend_from_slice(&{len}u16.to_le_bytes());");
                out.push_str(&write_stmt(
                    &format!("self.{member}"),
                    tlv_doc_label(tlv),
                    ty,
                    "out",
                    "        ",
                    uses_wire,
                )?);
            }
            WireSize::Variable => {
                *uses_wire = true;
                let buf = format!("buf_{member}");
                let _ = writeln!(out, "        let mut {buf} = Vec::new();");
                out.push_str(&write_stmt(
                    &format!("self.{member}"),
                    tlv_doc_label(tlv),
                    ty,
                    &buf,
                    "        ",
                    uses_wire,
                )?);
                let _ = writeln!(out, "        out.push(0x{tag:02X});");
                let _ = writeln!(out, "        out.extend_from_slice(&wire::tlv_len(&{buf})?.to_le_bytes());");
                let _ = writeln!(out, "        out.extend_from_slice(&{buf});");
            }
        }
    }
    out.push_str("        Ok(())\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    Ok(out)
}

fn response_impl(
    output_type: &str,
    tlvs: &[MappedTlv],
    op_result_member: Option<&str>,
    uses_wire: &mut bool,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "impl Response for {output_type} {{");
    let param = if tlvs.is_empty() { "_tlvs" } else { "tlvs" };
    let _ = writeln!(out, "    fn read_tlvs(&mut self, {param}: &[u8]) -> Result<(), QmiError> {{");
    for (tlv, member, ty) in tlvs {
        let tag = tlv.tag().unwrap_or(Tlv::OPERATION_RESULT_TAG);
        if tag == Tlv::OPERATION_RESULT_TAG {
            let _ = writeln!(out, "        match find_tag(tlvs, 0x{tag:02X}) {{");
            out.push_str("            Some(payload) => {\n");
            out.push_str("                let buf = &mut &payload[..];\n");
            out.push_str(&read_into(member, ty, "                ", uses_wire));
            out.push_str("            }\n");
            out.push_str("            None => return Err(QmiError::MissingOperationResult),\n");
            out.push_str("        }\n");
        } else {
            let _ = writeln!(out, "        if let Some(payload) = find_tag(tlvs, 0x{tag:02X}) {{");
            out.push_str("            let buf = &mut &payload[..];\n");
            out.push_str(&read_into(member, ty, "            ", uses_wire));
            out.push_str("        }\n");
        }
    }
    out.push_str("        Ok(())\n");
    out.push_str("    }\n");
    if let Some(member) = op_result_member {
        out.push('\n');
        out.push_str("    fn operation_result(&self) -> Option<OperationResult> {\n");
        let _ = writeln!(out, "        Some(self.{member}.clone())");
        out.push_str("    }\n");
    }
    out.push('\n');
    out.push_str("    fn into_any(self: Box<Self>) -> Box<dyn Any> {\n");
    out.push_str("        self\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

fn read_into(member: &str, ty: &FieldType, indent: &str, uses_wire: &mut bool) -> String {
    match ty {
        FieldType::Array { element } => {
            let elem = read_expr(element, uses_wire);
            let mut out = String::new();
            let _ = writeln!(out, "{indent}while !buf.is_empty() {{");
            let _ = writeln!(out, "{indent}    self.{member}.push({elem});");
            let _ = writeln!(out, "{indent}}}");
            out
        }
        other => format!("{indent}self.{member} = {};\n", read_expr(other, uses_wire)),
    }
}

fn device_method(
    service: &str,
    message_name: &str,
    method: &str,
    input_type: &str,
    output_type: &str,
) -> String {
    let mut out = String::new();
    out.push_str("impl Device {\n");
    let _ = writeln!(out, "    /// Sends a {service} \"{message_name}\" request and awaits its response.");
    out.push_str("    ///\n");
    out.push_str("    /// # Errors\n");
    out.push_str("    ///\n");
    out.push_str("    /// Transport failures, decode failures, and [`QmiError::Protocol`] when\n");
    out.push_str("    /// the modem reports a nonzero operation status.\n");

    let one_line =
        format!("    pub async fn {method}(&self, input: {input_type}) -> Result<{output_type}, QmiError> {{");
    if one_line.len() <= MAX_WIDTH {
        let _ = writeln!(out, "{one_line}");
    } else {
        let _ = writeln!(out, "    pub async fn {method}(");
        out.push_str("        &self,\n");
        let _ = writeln!(out, "        input: {input_type},");
        let _ = writeln!(out, "    ) -> Result<{output_type}, QmiError> {{");
    }
    out.push_str("        let response = self.send(&input).await?;\n");
    out.push_str("        Ok(*response\n");
    out.push_str("            .into_any()\n");
    let _ = writeln!(out, "            .downcast::<{output_type}>()");
    out.push_str("            .expect(\"registry constructed a mismatched response type\"))\n");
    out.push_str("    }\n");
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Schema;

    fn load(doc: &str) -> (Schema, RefTable) {
        let mut refs = RefTable::default();
        let common = r#"[{
            "common-ref": "Operation Result", "type": "TLV", "id": "0x02",
            "name": "Result", "format": "sequence",
            "contents": [
                { "name": "Error Status", "format": "guint16" },
                { "name": "Error Code", "format": "guint16" }
            ]
        }]"#;
        Schema::parse(common, &mut refs).unwrap();
        let schema = Schema::parse(doc, &mut refs).unwrap();
        (schema, refs)
    }

    #[test]
    fn fixed_tlvs_encode_behind_a_constant_length() {
        let (schema, refs) = load(
            r#"[{
                "name": "Allocate CID", "type": "Message", "service": "CTL", "id": "0x0022",
                "input": [ { "id": "0x01", "name": "Service", "format": "guint8" } ],
                "output": [ { "common-ref": "Operation Result" } ]
            }]"#,
        );
        let synthesized = message(schema.messages().next().unwrap(), "CTL", &refs).unwrap();

        assert!(synthesized.code.contains("pub struct CtlAllocateCidInput {"));
        assert!(synthesized.code.contains("out.push(0x01);"));
        assert!(synthesized.code.contains("out.extend_from_slice(&1u16.to_le_bytes());"));
        assert!(synthesized
            .code
            .contains("out.extend_from_slice(&self.service.to_le_bytes());"));
        assert!(!synthesized.code.contains("Vec::new()"));
        assert!(synthesized.uses_op_result);
        assert_eq!(synthesized.output_type, "CtlAllocateCidOutput");
    }

    #[test]
    fn variable_tlvs_stage_into_a_scratch_buffer() {
        let (schema, refs) = load(
            r#"[{
                "name": "Start Network", "type": "Message", "service": "WDS", "id": "0x0020",
                "input": [ { "id": "0x14", "name": "Apn", "format": "string" } ],
                "output": [ { "common-ref": "Operation Result" } ]
            }]"#,
        );
        let synthesized = message(schema.messages().next().unwrap(), "WDS", &refs).unwrap();

        assert!(synthesized.code.contains("let mut buf_apn = Vec::new();"));
        assert!(synthesized
            .code
            .contains("buf_apn.extend_from_slice(self.apn.as_bytes());"));
        assert!(synthesized
            .code
            .contains("out.extend_from_slice(&wire::tlv_len(&buf_apn)?.to_le_bytes());"));
        assert!(synthesized.uses_wire);
    }

    #[test]
    fn missing_result_tag_fails_decode_while_others_stay_optional() {
        let (schema, refs) = load(
            r#"[{
                "name": "Get IDs", "type": "Message", "service": "DMS", "id": "0x0025",
                "output": [
                    { "common-ref": "Operation Result" },
                    { "id": "0x10", "name": "Esn", "format": "string" }
                ]
            }]"#,
        );
        let synthesized = message(schema.messages().next().unwrap(), "DMS", &refs).unwrap();

        assert!(synthesized
            .code
            .contains("None => return Err(QmiError::MissingOperationResult),"));
        assert!(synthesized
            .code
            .contains("if let Some(payload) = find_tag(tlvs, 0x10) {"));
        assert!(synthesized.code.contains("self.esn = wire::read_string(buf);"));
        assert!(synthesized
            .code
            .contains("Some(self.operation_result.clone())"));
    }

    #[test]
    fn arrays_repeat_until_their_tlv_is_exhausted() {
        let (schema, refs) = load(
            r#"[{
                "name": "Get Capabilities", "type": "Message", "service": "DMS", "id": "0x0020",
                "output": [
                    { "common-ref": "Operation Result" },
                    { "id": "0x01", "name": "Info", "format": "sequence", "contents": [
                        { "name": "Sim Capability", "format": "guint8" },
                        { "name": "Radio Interface List", "format": "array",
                          "array-element": { "format": "guint8" } }
                    ] }
                ]
            }]"#,
        );
        let synthesized = message(schema.messages().next().unwrap(), "DMS", &refs).unwrap();

        assert!(synthesized
            .code
            .contains("pub struct DmsGetCapabilitiesOutputInfo {"));
        assert!(synthesized.code.contains("while !buf.is_empty() {"));
        assert!(synthesized.code.contains("items.push(wire::read_u8(buf)?);"));
    }

    #[test]
    fn duplicate_tags_in_one_direction_are_rejected() {
        let (schema, refs) = load(
            r#"[{
                "name": "Broken", "type": "Message", "service": "DMS", "id": "0x0099",
                "output": [
                    { "id": "0x01", "name": "A", "format": "guint8" },
                    { "id": "0x01", "name": "B", "format": "guint8" }
                ]
            }]"#,
        );
        let err = message(schema.messages().next().unwrap(), "DMS", &refs).unwrap_err();
        assert!(matches!(
            err,
            CodegenError::DuplicateTlvId {
                direction: "output",
                id: 1,
                ..
            }
        ));
    }

    #[test]
    fn common_refs_cannot_be_encoded_into_requests() {
        let (schema, refs) = load(
            r#"[{
                "name": "Backwards", "type": "Message", "service": "DMS", "id": "0x0098",
                "input": [ { "common-ref": "Operation Result" } ]
            }]"#,
        );
        let err = message(schema.messages().next().unwrap(), "DMS", &refs).unwrap_err();
        assert!(matches!(err, CodegenError::CommonRefInRequest { .. }));
    }

    #[test]
    fn long_device_signatures_wrap() {
        let (schema, refs) = load(
            r#"[{
                "name": "Get Packet Service Status", "type": "Message",
                "service": "WDS", "id": "0x0022",
                "output": [ { "common-ref": "Operation Result" } ]
            }]"#,
        );
        let synthesized = message(schema.messages().next().unwrap(), "WDS", &refs).unwrap();
        assert!(synthesized.code.contains("    pub async fn wds_get_packet_service_status(\n"));
        assert!(synthesized.code.contains("        input: WdsGetPacketServiceStatusInput,\n"));
    }
}
