//! Renders synthesized code as complete source artifacts.
//!
//! One artifact per schema document. Service artifacts carry the message
//! bindings and the registry block installing their output factories; the
//! common artifact carries the service catalog and the reusable records of
//! the common schema. Everything is rendered as plain source text.

use std::collections::BTreeSet;
use std::fmt::Write as _;

use crate::catalog;
use crate::error::CodegenError;
use crate::schema::{parse_number, Entity, RefTable, Schema};
use crate::synth;

fn header(source: &str, doc: &str) -> String {
    format!("// @generated by qmi-codegen from {source}. DO NOT EDIT.\n\n{doc}\n")
}

/// Renders the artifact for a service schema.
///
/// # Errors
///
/// Invariant violations (messages naming undeclared services, services
/// missing from the catalog, duplicate tags) and any synthesis failure.
pub fn service_artifact(
    schema: &Schema,
    refs: &RefTable,
    source: &str,
) -> Result<String, CodegenError> {
    // Every declared service must resolve to a catalog id; an explicit id
    // must agree with the catalog.
    let mut declared = BTreeSet::new();
    for service in schema.services() {
        let Some(id) = catalog::lookup(&service.name) else {
            return Err(CodegenError::UnknownService {
                context: "service declaration".to_owned(),
                service: service.name.clone(),
            });
        };
        if let Some(explicit) = service.id.as_deref() {
            if parse_number(explicit, "service id")? != u64::from(id) {
                return Err(CodegenError::BadNumber {
                    context: format!("id of service {:?}", service.name),
                    value: explicit.to_owned(),
                });
            }
        }
        declared.insert(service.name.as_str());
    }

    let mut uses_wire = false;
    let mut uses_op_result = false;
    let mut uses_find_tag = false;
    let mut service_consts = BTreeSet::new();
    let mut bodies = Vec::new();
    let mut output_types = Vec::new();

    for entity in &schema.entities {
        match entity {
            Entity::Message(message) => {
                if !declared.contains(message.service.as_str()) {
                    return Err(CodegenError::UnknownService {
                        context: format!("message {:?}", message.name),
                        service: message.service.clone(),
                    });
                }
                let synthesized = synth::message(message, &message.service, refs)?;
                uses_wire |= synthesized.uses_wire;
                uses_op_result |= synthesized.uses_op_result;
                uses_find_tag |= synthesized.uses_find_tag;
                service_consts.insert(format!("QMI_SERVICE_{}", message.service));
                output_types.push(synthesized.output_type);
                bodies.push(synthesized.code);
            }
            Entity::Tlv(tlv) => {
                // A standalone TLV yields a reusable record local to this
                // artifact.
                let rust_name = crate::ident::upper_camel(&tlv.field.name);
                let ty = crate::mapper::map_field(&tlv.field, "", refs)?;
                let synthesized = synth::reusable_struct(&tlv.field.name, &rust_name, tlv, &ty)?;
                uses_wire |= synthesized.uses_wire;
                bodies.push(synthesized.code);
            }
            _ => {}
        }
    }

    let service_label = schema
        .services()
        .next()
        .map_or_else(|| "?".to_owned(), |service| service.name.clone());
    let mut out = header(
        source,
        &format!("//! Generated bindings for the QMI {service_label} service."),
    );
    out.push('\n');
    out.push_str("use std::any::Any;\n");
    out.push('\n');
    out.push_str("use crate::error::QmiError;\n");
    if uses_find_tag {
        out.push_str("use crate::frame::find_tag;\n");
    }
    out.push_str("use crate::message::{Message, Request, Response};\n");
    out.push_str("use crate::registry::MessageRegistry;\n");
    out.push_str("use crate::service::Service;\n");
    let mut common_imports: Vec<&str> = Vec::new();
    if uses_op_result {
        common_imports.push("OperationResult");
    }
    common_imports.extend(service_consts.iter().map(String::as_str));
    match common_imports.as_slice() {
        [] => {}
        [only] => {
            let _ = writeln!(out, "use crate::services::common::{only};");
        }
        many => {
            let _ = writeln!(out, "use crate::services::common::{{{}}};", many.join(", "));
        }
    }
    out.push_str("use crate::transport::Device;\n");
    if uses_wire {
        out.push_str("use crate::wire;\n");
    }

    for body in &bodies {
        out.push('\n');
        out.push_str(body);
    }

    out.push('\n');
    out.push_str("/// Installs this module's response factories into `reg`.\n");
    out.push_str("pub(crate) fn register(reg: &mut MessageRegistry) {\n");
    for output_type in &output_types {
        let _ = writeln!(out, "    reg.register(|| Box::new({output_type}::default()));");
    }
    out.push_str("}\n");

    Ok(out)
}

/// Renders the common artifact: the service catalog plus the reusable
/// records declared by the common schema.
///
/// # Errors
///
/// Synthesis failures from the reusable structs.
pub fn common_artifact(
    schema: &Schema,
    refs: &RefTable,
    source: &str,
) -> Result<String, CodegenError> {
    let mut uses_wire = false;
    let mut structs = Vec::new();
    for name in &schema.common_refs {
        let entry = &refs[name.as_str()];
        let (Some(tlv), Some(ty)) = (&entry.tlv, &entry.ty) else {
            continue;
        };
        let synthesized = synth::reusable_struct(name, &entry.rust_name, tlv, ty)?;
        uses_wire |= synthesized.uses_wire;
        structs.push(synthesized.code);
    }

    let mut out = header(
        source,
        "//! Common definitions shared by every QMI service: the service catalog and\n\
         //! the reusable records embedded by service messages.",
    );
    out.push('\n');
    if !structs.is_empty() {
        out.push_str("use crate::error::QmiError;\n");
    }
    out.push_str("use crate::service::Service;\n");
    if uses_wire {
        out.push_str("use crate::wire;\n");
    }
    out.push('\n');

    for (id, name) in catalog::SERVICES {
        let _ = writeln!(out, "/// {name} service (service id {id}).");
        let _ = writeln!(out, "pub const QMI_SERVICE_{name}: Service = Service({id});");
    }
    out.push_str("/// Placeholder for a service the catalog does not know.\n");
    let _ = writeln!(
        out,
        "pub const QMI_SERVICE_UNKNOWN: Service = Service(0x{:02x});",
        catalog::UNKNOWN_ID
    );
    out.push('\n');

    out.push_str("/// Returns the catalog name of `service`, if it has one.\n");
    out.push_str("#[must_use]\n");
    out.push_str("pub fn service_name(service: Service) -> Option<&'static str> {\n");
    out.push_str("    Some(match service.0 {\n");
    for (id, name) in catalog::SERVICES {
        let _ = writeln!(out, "        {id} => \"{name}\",");
    }
    out.push_str("        _ => return None,\n");
    out.push_str("    })\n");
    out.push_str("}\n");

    for code in &structs {
        out.push('\n');
        out.push_str(code);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_with_common(doc: &str) -> (Schema, RefTable) {
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
    fn service_artifact_assembles_imports_and_registry() {
        let (schema, refs) = load_with_common(
            r#"[
                { "name": "CTL", "type": "Service" },
                {
                    "name": "Sync", "type": "Message", "service": "CTL", "id": "0x0027",
                    "output": [ { "common-ref": "Operation Result" } ]
                }
            ]"#,
        );
        let artifact = service_artifact(&schema, &refs, "qmi-service-ctl.json").unwrap();

        assert!(artifact.starts_with(
            "// @generated by qmi-codegen from qmi-service-ctl.json. DO NOT EDIT.\n"
        ));
        assert!(artifact.contains("//! Generated bindings for the QMI CTL service."));
        assert!(artifact.contains("use crate::services::common::{OperationResult, QMI_SERVICE_CTL};"));
        assert!(artifact.contains("pub struct CtlSyncInput {}"));
        assert!(artifact.contains("pub(crate) fn register(reg: &mut MessageRegistry) {"));
        assert!(artifact.contains("    reg.register(|| Box::new(CtlSyncOutput::default()));"));
    }

    #[test]
    fn messages_must_name_a_declared_service() {
        let (schema, refs) = load_with_common(
            r#"[
                { "name": "CTL", "type": "Service" },
                {
                    "name": "Stray", "type": "Message", "service": "DMS", "id": "0x0001",
                    "output": [ { "common-ref": "Operation Result" } ]
                }
            ]"#,
        );
        let err = service_artifact(&schema, &refs, "x.json").unwrap_err();
        assert!(matches!(err, CodegenError::UnknownService { .. }));
    }

    #[test]
    fn declared_services_must_be_in_the_catalog() {
        let (schema, refs) = load_with_common(r#"[ { "name": "ZZZ", "type": "Service" } ]"#);
        let err = service_artifact(&schema, &refs, "x.json").unwrap_err();
        assert!(matches!(err, CodegenError::UnknownService { .. }));
    }

    #[test]
    fn common_artifact_carries_catalog_and_reusable_records() {
        let mut refs = RefTable::default();
        let schema = Schema::parse(
            r#"[{
                "common-ref": "Operation Result", "type": "TLV", "id": "0x02",
                "name": "Result", "format": "sequence",
                "contents": [
                    { "name": "Error Status", "format": "guint16" },
                    { "name": "Error Code", "format": "guint16" }
                ]
            }]"#,
            &mut refs,
        )
        .unwrap();
        let artifact = common_artifact(&schema, &refs, "qmi-common.json").unwrap();

        assert!(artifact.contains("pub const QMI_SERVICE_CTL: Service = Service(0);"));
        assert!(artifact.contains("pub const QMI_SERVICE_GMS: Service = Service(231);"));
        assert!(artifact.contains("pub const QMI_SERVICE_UNKNOWN: Service = Service(0xff);"));
        assert!(artifact.contains("231 => \"GMS\","));
        assert!(artifact.contains("/// Reusable \"Operation Result\" record (tag 0x02)."));
        assert!(artifact.contains("pub struct OperationResult {"));
        assert!(artifact.contains("error_status: wire::read_u16(buf)?,"));
    }
}
