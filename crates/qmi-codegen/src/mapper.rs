//! Maps schema field formats onto Rust types and wire sizes.
//!
//! The mapping is a pure function over the field tree (plus the reusable
//! struct table for `common-ref` fields). A field's wire size is fixed if
//! and only if every constituent is fixed; any string or array makes the
//! enclosing composite variable, which downstream selects the buffered
//! encode path.

use crate::error::CodegenError;
use crate::ident;
use crate::schema::{parse_number, Field, RefTable};

/// Fixed byte count of a field, or variable length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireSize {
    /// The field always occupies exactly this many bytes.
    Fixed(usize),
    /// The field's length is only known when a value is encoded.
    Variable,
}

impl WireSize {
    /// Concatenation: fixed plus fixed is fixed, anything else is variable.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        match (self, other) {
            (Self::Fixed(a), Self::Fixed(b)) => Self::Fixed(a + b),
            _ => Self::Variable,
        }
    }
}

/// Fixed-width little-endian integer formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Scalar {
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
}

impl Scalar {
    /// Maps a (g-stripped) scalar format name.
    #[must_use]
    pub fn from_format(format: &str) -> Option<Self> {
        Some(match format {
            "uint8" | "byte" => Self::U8,
            "int8" => Self::I8,
            "uint16" => Self::U16,
            "int16" => Self::I16,
            "uint32" => Self::U32,
            "int32" => Self::I32,
            "uint64" => Self::U64,
            "int64" => Self::I64,
            _ => return None,
        })
    }

    /// The Rust type the scalar maps to.
    #[must_use]
    pub const fn rust(self) -> &'static str {
        match self {
            Self::U8 => "u8",
            Self::I8 => "i8",
            Self::U16 => "u16",
            Self::I16 => "i16",
            Self::U32 => "u32",
            Self::I32 => "i32",
            Self::U64 => "u64",
            Self::I64 => "i64",
        }
    }

    /// The scalar's wire width in bytes.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 => 4,
            Self::U64 | Self::I64 => 8,
        }
    }

    /// The `wire` module reader the decoder calls.
    #[must_use]
    pub const fn reader(self) -> &'static str {
        match self {
            Self::U8 => "read_u8",
            Self::I8 => "read_i8",
            Self::U16 => "read_u16",
            Self::I16 => "read_i16",
            Self::U32 => "read_u32",
            Self::I32 => "read_i32",
            Self::U64 => "read_u64",
            Self::I64 => "read_i64",
        }
    }
}

/// A member of a generated record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedField {
    /// The schema name of the field.
    pub name: String,
    /// The snake_case member name.
    pub member: String,
    /// The member's mapped type.
    pub ty: FieldType,
}

/// The mapped type of a field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    /// A fixed-width integer.
    Scalar(Scalar),
    /// Length-prefixed text; consumes the remainder of its TLV.
    String,
    /// A raw byte run of fixed width (`guint-sized`).
    FixedBytes(usize),
    /// A heterogeneous record (`struct`/`sequence`; identical wire layout).
    Record {
        /// The generated type name.
        name: String,
        /// Members in declaration order.
        fields: Vec<NamedField>,
        /// Sum of the members' sizes.
        size: WireSize,
    },
    /// Homogeneous repetition filling the remainder of its TLV.
    Array {
        /// The element type.
        element: Box<FieldType>,
    },
    /// A reference to a previously generated reusable struct.
    CommonRef {
        /// The reusable struct's Rust name.
        name: String,
        /// The size recorded when the struct was generated.
        size: WireSize,
    },
}

impl FieldType {
    /// The field's wire size.
    #[must_use]
    pub fn size(&self) -> WireSize {
        match self {
            Self::Scalar(scalar) => WireSize::Fixed(scalar.width()),
            Self::String | Self::Array { .. } => WireSize::Variable,
            Self::FixedBytes(n) => WireSize::Fixed(*n),
            Self::Record { size, .. } | Self::CommonRef { size, .. } => *size,
        }
    }

    /// Renders the Rust type the field occupies in its record.
    #[must_use]
    pub fn rust(&self) -> String {
        match self {
            Self::Scalar(scalar) => scalar.rust().to_owned(),
            Self::String => "String".to_owned(),
            Self::FixedBytes(n) => format!("[u8; {n}]"),
            Self::Record { name, .. } | Self::CommonRef { name, .. } => name.clone(),
            Self::Array { element } => format!("Vec<{}>", element.rust()),
        }
    }
}

/// Maps `field` to its type. `owner` prefixes the names of nested records
/// (messages pass their record type name; reusable structs pass "").
///
/// # Errors
///
/// [`CodegenError::UnsupportedFormat`] for formats outside the closed set —
/// including the empty format without a `common-ref` to resolve it — and
/// [`CodegenError::DanglingCommonRef`] for references the table cannot
/// resolve to a struct.
pub fn map_field(field: &Field, owner: &str, refs: &RefTable) -> Result<FieldType, CodegenError> {
    if field.format.is_empty() {
        let Some(reference) = field.common_ref.as_deref() else {
            return Err(unsupported(field));
        };
        let entry = refs.get(reference);
        let Some(ty) = entry.and_then(|entry| entry.ty.as_ref()) else {
            return Err(CodegenError::DanglingCommonRef {
                field: display_name(field),
                reference: reference.to_owned(),
            });
        };
        return Ok(FieldType::CommonRef {
            name: refs[reference].rust_name.clone(),
            size: ty.size(),
        });
    }

    let trimmed = field.format.strip_prefix('g').unwrap_or(&field.format);
    if let Some(scalar) = Scalar::from_format(trimmed) {
        return Ok(FieldType::Scalar(scalar));
    }
    match trimmed {
        "string" => Ok(FieldType::String),
        "uint-sized" => {
            let size = field.guint_size.as_deref().ok_or_else(|| unsupported(field))?;
            let width = parse_number(size, "guint-size")?;
            Ok(FieldType::FixedBytes(usize::try_from(width).map_err(
                |_| CodegenError::BadNumber {
                    context: "guint-size".to_owned(),
                    value: size.to_owned(),
                },
            )?))
        }
        "struct" | "sequence" => {
            let name = format!("{owner}{}", ident::upper_camel(&field.name));
            let mut fields = Vec::new();
            let mut size = WireSize::Fixed(0);
            for sub in &field.contents {
                let ty = map_field(sub, &name, refs)?;
                size = size.and(ty.size());
                fields.push(NamedField {
                    name: sub.name.clone(),
                    member: ident::snake(&sub.name),
                    ty,
                });
            }
            Ok(FieldType::Record { name, fields, size })
        }
        "array" => {
            let element = field.array_element.as_deref().ok_or_else(|| unsupported(field))?;
            let element_owner = format!("{owner}{}", ident::upper_camel(&field.name));
            let element_ty = map_field(element, &element_owner, refs)?;
            Ok(FieldType::Array {
                element: Box::new(element_ty),
            })
        }
        _ => Err(unsupported(field)),
    }
}

fn unsupported(field: &Field) -> CodegenError {
    CodegenError::UnsupportedFormat {
        field: display_name(field),
        format: field.format.clone(),
    }
}

fn display_name(field: &Field) -> String {
    if field.name.is_empty() {
        "<unnamed>".to_owned()
    } else {
        field.name.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(name: &str, format: &str) -> Field {
        Field {
            name: name.to_owned(),
            format: format.to_owned(),
            ..Field::default()
        }
    }

    #[test]
    fn scalars_map_to_fixed_widths() {
        let refs = RefTable::default();
        let ty = map_field(&field("Cid", "guint8"), "X", &refs).unwrap();
        assert_eq!(ty.rust(), "u8");
        assert_eq!(ty.size(), WireSize::Fixed(1));

        // The bare format (no g prefix) is accepted too.
        let ty = map_field(&field("Handle", "uint32"), "X", &refs).unwrap();
        assert_eq!(ty.size(), WireSize::Fixed(4));

        let ty = map_field(&field("Count", "gint64"), "X", &refs).unwrap();
        assert_eq!(ty.rust(), "i64");
        assert_eq!(ty.size(), WireSize::Fixed(8));
    }

    #[test]
    fn strings_and_arrays_are_variable() {
        let refs = RefTable::default();
        assert_eq!(
            map_field(&field("Apn", "string"), "X", &refs).unwrap().size(),
            WireSize::Variable
        );

        let mut list = field("List", "array");
        list.array_element = Some(Box::new(field("", "guint8")));
        let ty = map_field(&list, "X", &refs).unwrap();
        assert_eq!(ty.rust(), "Vec<u8>");
        assert_eq!(ty.size(), WireSize::Variable);
    }

    #[test]
    fn sized_byte_runs_take_their_width_from_guint_size() {
        let refs = RefTable::default();
        let mut time = field("Time Count", "guint-sized");
        time.guint_size = Some("6".to_owned());
        let ty = map_field(&time, "X", &refs).unwrap();
        assert_eq!(ty.rust(), "[u8; 6]");
        assert_eq!(ty.size(), WireSize::Fixed(6));
    }

    #[test]
    fn composites_sum_fixed_members_and_poison_on_variable() {
        let refs = RefTable::default();
        let mut info = field("Info", "sequence");
        info.contents = vec![field("A", "guint32"), field("B", "guint8")];
        let ty = map_field(&info, "DmsFooOutput", &refs).unwrap();
        assert_eq!(ty.size(), WireSize::Fixed(5));
        assert_eq!(ty.rust(), "DmsFooOutputInfo");

        info.contents.push(field("C", "string"));
        let ty = map_field(&info, "DmsFooOutput", &refs).unwrap();
        assert_eq!(ty.size(), WireSize::Variable);
    }

    #[test]
    fn empty_format_needs_a_common_ref() {
        let refs = RefTable::default();
        let err = map_field(&field("Mystery", ""), "X", &refs).unwrap_err();
        assert!(matches!(err, CodegenError::UnsupportedFormat { .. }));

        let mut reference = field("", "");
        reference.common_ref = Some("No Such Ref".to_owned());
        let err = map_field(&reference, "X", &refs).unwrap_err();
        assert!(matches!(err, CodegenError::DanglingCommonRef { .. }));
    }

    #[test]
    fn unknown_formats_name_the_field() {
        let refs = RefTable::default();
        let err = map_field(&field("Blob", "gdouble"), "X", &refs).unwrap_err();
        match err {
            CodegenError::UnsupportedFormat { field, format } => {
                assert_eq!(field, "Blob");
                assert_eq!(format, "gdouble");
            }
            other => panic!("unexpected error {other}"),
        }
    }
}
