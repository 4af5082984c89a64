//! The schema model: entities parsed from the declarative documents.
//!
//! A schema document is an array of entity objects discriminated by their
//! `type` key. Entities carrying a `common-ref` key never enter the entity
//! stream: they are routed into the reusable-struct table under the ref
//! name, and TLVs among them yield a standalone record in the artifact.
//! Documents tolerate relaxed syntax (comments, trailing commas); the
//! loader parses them as JSON5.

use indexmap::IndexMap;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::CodegenError;
use crate::ident;
use crate::mapper::{self, FieldType, WireSize};

/// A field tree describing a TLV payload (or part of one).
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Field {
    /// Free-text field name.
    pub name: String,
    /// Wire format; empty for bare common-ref references.
    pub format: String,
    /// Members of a `struct`/`sequence` format.
    pub contents: Vec<Field>,
    /// Element description of an `array` format.
    pub array_element: Option<Box<Field>>,
    /// Byte count of a `guint-sized` format (a string-encoded integer).
    pub guint_size: Option<String>,
    /// Presentation hint; ignored by the codec.
    pub public_format: Option<String>,
    /// Name of a reusable struct this field embeds.
    pub common_ref: Option<String>,
}

/// One TLV of a message, or a standalone reusable TLV.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Tlv {
    /// Tag id as a numeric literal; absent means the Operation Result tag.
    pub id: Option<String>,
    /// First firmware version carrying the TLV; informational only.
    pub since: Option<String>,
    /// The payload description.
    #[serde(flatten)]
    pub field: Field,
}

impl Tlv {
    /// The canonical Operation Result tag a TLV defaults to when it
    /// declares no id.
    pub const OPERATION_RESULT_TAG: u8 = 2;

    /// The TLV's tag id.
    ///
    /// # Errors
    ///
    /// [`CodegenError::BadNumber`] on an unparsable or out-of-range id.
    pub fn tag(&self) -> Result<u8, CodegenError> {
        match &self.id {
            Some(id) => {
                let value = parse_number(id, "TLV id")?;
                u8::try_from(value).map_err(|_| CodegenError::BadNumber {
                    context: "TLV id".to_owned(),
                    value: id.clone(),
                })
            }
            None => Ok(Self::OPERATION_RESULT_TAG),
        }
    }

    /// The struct member this TLV becomes: its name, falling back to the
    /// common ref it embeds.
    #[must_use]
    pub fn member_name(&self) -> Option<String> {
        if !self.field.name.is_empty() {
            Some(ident::snake(&self.field.name))
        } else {
            self.field.common_ref.as_deref().map(ident::snake)
        }
    }
}

/// A service declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ServiceDef {
    /// Symbolic service name ("CTL", "DMS", …).
    pub name: String,
    /// Explicit numeric id, overriding the built-in catalog.
    pub id: Option<String>,
}

/// A request/response message declaration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MessageDef {
    /// Free-text message name.
    pub name: String,
    /// Owning service by symbolic name.
    pub service: String,
    /// 16-bit message id as a numeric literal.
    pub id: Option<String>,
    /// First firmware version carrying the message; informational only.
    pub since: Option<String>,
    /// Request TLVs.
    pub input: Vec<Tlv>,
    /// Response TLVs.
    pub output: Vec<Tlv>,
}

impl MessageDef {
    /// The message's numeric id.
    ///
    /// # Errors
    ///
    /// [`CodegenError::MissingMessageId`] when absent,
    /// [`CodegenError::BadNumber`] when unparsable.
    pub fn message_id(&self) -> Result<u16, CodegenError> {
        let id = self
            .id
            .as_deref()
            .ok_or_else(|| CodegenError::MissingMessageId {
                message: self.name.clone(),
            })?;
        let value = parse_number(id, "message id")?;
        u16::try_from(value).map_err(|_| CodegenError::BadNumber {
            context: "message id".to_owned(),
            value: id.to_owned(),
        })
    }
}

/// One entity of a schema document.
///
/// `Client`, `Indication`, the id enums and `prerequisite` are passive
/// markers: recognized, validated to exist, and influencing no code.
#[derive(Debug, Clone)]
pub enum Entity {
    /// A service declaration.
    Service(ServiceDef),
    /// A client marker (passive).
    Client,
    /// A message declaration.
    Message(MessageDef),
    /// An indication marker (passive; indications are only received).
    Indication,
    /// A standalone TLV, yielding a reusable record.
    Tlv(Tlv),
    /// A message-id enum marker (passive).
    MessageIdEnum,
    /// An indication-id enum marker (passive).
    IndicationIdEnum,
    /// A prerequisite marker (passive).
    Prerequisite,
}

/// A reusable struct registered under a `common-ref` name.
#[derive(Debug, Clone)]
pub struct CommonRef {
    /// The generated Rust type name.
    pub rust_name: String,
    /// The TLV that declared the struct; `None` for non-TLV refs, which
    /// resolve no type.
    pub tlv: Option<Tlv>,
    /// The mapped payload type, recording the struct's wire size.
    pub ty: Option<FieldType>,
}

/// Reusable structs by declaration name, in declaration order.
pub type RefTable = IndexMap<String, CommonRef>;

/// A loaded schema document.
#[derive(Debug, Default)]
pub struct Schema {
    /// Entities in document order.
    pub entities: Vec<Entity>,
    /// Names of the common refs this document declared, in order.
    pub common_refs: Vec<String>,
}

impl Schema {
    /// Parses a schema document, routing `common-ref` entities into `refs`.
    ///
    /// # Errors
    ///
    /// Any schema malformation per [`CodegenError`]; unknown field formats
    /// inside common-ref TLVs surface here because their wire size is
    /// computed at registration.
    pub fn parse(text: &str, refs: &mut RefTable) -> Result<Self, CodegenError> {
        let raw: Value = json5::from_str(text)?;
        let Value::Array(items) = raw else {
            return Err(CodegenError::NotAnArray);
        };

        let mut schema = Self::default();
        for (index, item) in items.into_iter().enumerate() {
            let Value::Object(mut map) = item else {
                return Err(CodegenError::EntityNotObject { index });
            };
            let Some(kind) = map.get("type").and_then(Value::as_str).map(str::to_owned) else {
                return Err(CodegenError::MissingType { index });
            };

            if let Some(reference) = map.get("common-ref").and_then(Value::as_str).map(str::to_owned)
            {
                map.remove("common-ref");
                map.insert("name".to_owned(), Value::String(reference.clone()));
                let entry = if kind == "TLV" {
                    let tlv: Tlv = decode_entity(&kind, Value::Object(map))?;
                    let ty = mapper::map_field(&tlv.field, "", refs)?;
                    if ty.size() == WireSize::Fixed(0) {
                        return Err(CodegenError::EmptyCommonRef { name: reference });
                    }
                    CommonRef {
                        rust_name: ident::upper_camel(&reference),
                        tlv: Some(tlv),
                        ty: Some(ty),
                    }
                } else {
                    CommonRef {
                        rust_name: ident::upper_camel(&reference),
                        tlv: None,
                        ty: None,
                    }
                };
                refs.insert(reference.clone(), entry);
                schema.common_refs.push(reference);
                continue;
            }

            let entity = match kind.as_str() {
                "Service" => Entity::Service(decode_entity(&kind, Value::Object(map))?),
                "Client" => Entity::Client,
                "Message" => Entity::Message(decode_entity(&kind, Value::Object(map))?),
                "Indication" => Entity::Indication,
                "TLV" => Entity::Tlv(decode_entity(&kind, Value::Object(map))?),
                "Message-ID-Enum" => Entity::MessageIdEnum,
                "Indication-ID-Enum" => Entity::IndicationIdEnum,
                "prerequisite" => Entity::Prerequisite,
                _ => return Err(CodegenError::UnknownEntityType { kind }),
            };
            schema.entities.push(entity);
        }
        Ok(schema)
    }

    /// Service declarations in document order.
    pub fn services(&self) -> impl Iterator<Item = &ServiceDef> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Service(service) => Some(service),
            _ => None,
        })
    }

    /// Message declarations in document order.
    pub fn messages(&self) -> impl Iterator<Item = &MessageDef> {
        self.entities.iter().filter_map(|entity| match entity {
            Entity::Message(message) => Some(message),
            _ => None,
        })
    }
}

fn decode_entity<T: DeserializeOwned>(kind: &str, value: Value) -> Result<T, CodegenError> {
    serde_json::from_value(value).map_err(|source| CodegenError::EntityDecode {
        kind: kind.to_owned(),
        source,
    })
}

/// Parses a schema numeric literal, accepting decimal and `0x` hex.
pub(crate) fn parse_number(value: &str, context: &str) -> Result<u64, CodegenError> {
    let digits = value.trim();
    let parsed = match digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => digits.parse(),
    };
    parsed.map_err(|_| CodegenError::BadNumber {
        context: context.to_owned(),
        value: value.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entities_and_routes_common_refs() {
        let doc = r#"
        // relaxed syntax: comments and trailing commas are fine
        [
            { "name": "CTL", "type": "Service" },
            { "name": "QMI CTL", "type": "Client", "since": "1.0" },
            {
                "common-ref": "Operation Result",
                "type": "TLV",
                "id": "0x02",
                "name": "Result",
                "format": "sequence",
                "contents": [
                    { "name": "Error Status", "format": "guint16" },
                    { "name": "Error Code", "format": "guint16" },
                ],
            },
            {
                "name": "Sync",
                "type": "Message",
                "service": "CTL",
                "id": "0x0027",
                "output": [ { "common-ref": "Operation Result" } ],
            },
        ]
        "#;

        let mut refs = RefTable::default();
        let schema = Schema::parse(doc, &mut refs).unwrap();

        assert_eq!(schema.entities.len(), 3); // the common ref left the stream
        assert_eq!(schema.common_refs, ["Operation Result"]);
        assert_eq!(schema.services().count(), 1);

        let message = schema.messages().next().unwrap();
        assert_eq!(message.message_id().unwrap(), 0x0027);
        assert_eq!(message.output[0].tag().unwrap(), 2);
        assert_eq!(
            message.output[0].member_name().as_deref(),
            Some("operation_result")
        );

        let entry = &refs["Operation Result"];
        assert_eq!(entry.rust_name, "OperationResult");
        assert_eq!(entry.ty.as_ref().unwrap().size(), WireSize::Fixed(4));
        // The router renames the TLV's field after the ref.
        assert_eq!(entry.tlv.as_ref().unwrap().field.name, "Operation Result");
    }

    #[test]
    fn rejects_malformed_documents() {
        let mut refs = RefTable::default();
        assert!(matches!(
            Schema::parse(r#"{"type": "Service"}"#, &mut refs),
            Err(CodegenError::NotAnArray)
        ));
        assert!(matches!(
            Schema::parse("[42]", &mut refs),
            Err(CodegenError::EntityNotObject { index: 0 })
        ));
        assert!(matches!(
            Schema::parse(r#"[{ "name": "X" }]"#, &mut refs),
            Err(CodegenError::MissingType { index: 0 })
        ));
        assert!(matches!(
            Schema::parse(r#"[{ "type": "Gadget" }]"#, &mut refs),
            Err(CodegenError::UnknownEntityType { .. })
        ));
    }

    #[test]
    fn numeric_literals_accept_hex_and_decimal() {
        assert_eq!(parse_number("0x22", "id").unwrap(), 0x22);
        assert_eq!(parse_number("34", "id").unwrap(), 34);
        assert!(matches!(
            parse_number("banana", "id"),
            Err(CodegenError::BadNumber { .. })
        ));
    }

    #[test]
    fn tlv_without_id_defaults_to_the_result_tag() {
        let tlv = Tlv::default();
        assert_eq!(tlv.tag().unwrap(), Tlv::OPERATION_RESULT_TAG);
    }
}
