//! Generation failures.
//!
//! Schema errors and unsupported formats abort generation; the CLI prints
//! the chain and exits nonzero.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading a schema or rendering an artifact.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CodegenError {
    /// The schema document is not an array of entity objects.
    #[error("schema is not an array of entities")]
    NotAnArray,

    /// An entity in the document is not a JSON object.
    #[error("entity {index} is not an object")]
    EntityNotObject {
        /// Position of the entity in the document.
        index: usize,
    },

    /// An entity lacks the `type` discriminator.
    #[error("entity {index} has no \"type\" discriminator")]
    MissingType {
        /// Position of the entity in the document.
        index: usize,
    },

    /// The `type` discriminator names no known entity kind.
    #[error("unknown entity type {kind:?}")]
    UnknownEntityType {
        /// The offending discriminator.
        kind: String,
    },

    /// An entity did not deserialize into its declared kind.
    #[error("malformed {kind} entity")]
    EntityDecode {
        /// The entity kind being decoded.
        kind: String,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// The document is not valid (relaxed) JSON.
    #[error("failed to parse schema document")]
    Parse(#[from] json5::Error),

    /// A schema file could not be read.
    #[error("failed to read {path}")]
    Read {
        /// The schema path.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// A message names a service the schema does not declare, or a service
    /// declaration is missing from the catalog.
    #[error("{context} references undeclared service {service:?}")]
    UnknownService {
        /// What referenced the service.
        context: String,
        /// The unresolved service name.
        service: String,
    },

    /// A `common-ref` field points at a name with no reusable struct.
    #[error("field {field:?} references undeclared common ref {reference:?}")]
    DanglingCommonRef {
        /// The referencing field.
        field: String,
        /// The unresolved reference.
        reference: String,
    },

    /// A reusable struct decodes only; it cannot appear in a request.
    #[error("field {field:?}: common refs cannot be encoded into a request")]
    CommonRefInRequest {
        /// The offending field.
        field: String,
    },

    /// Two TLVs of one message direction share a tag id.
    #[error("duplicate TLV id {id:#04x} in the {direction} of message {message:?}")]
    DuplicateTlvId {
        /// The message holding the duplicates.
        message: String,
        /// `input` or `output`.
        direction: &'static str,
        /// The repeated tag.
        id: u8,
    },

    /// A field's format is outside the supported set.
    #[error("field {field:?} has unsupported format {format:?}")]
    UnsupportedFormat {
        /// The offending field.
        field: String,
        /// Its format string.
        format: String,
    },

    /// A TLV in a message carries neither a name nor a common ref to derive
    /// a member name from.
    #[error("message {message:?} has an unnamed TLV")]
    UnnamedTlv {
        /// The message holding the TLV.
        message: String,
    },

    /// A reusable struct would occupy zero bytes on the wire.
    #[error("common ref {name:?} describes an empty record")]
    EmptyCommonRef {
        /// The reusable struct's name.
        name: String,
    },

    /// A message has no id.
    #[error("message {message:?} has no id")]
    MissingMessageId {
        /// The message lacking an id.
        message: String,
    },

    /// A numeric literal in the schema did not parse or overflowed its field.
    #[error("invalid numeric literal {value:?} for {context}")]
    BadNumber {
        /// What the number was for.
        context: String,
        /// The literal as written.
        value: String,
    },

    /// An output file could not be written.
    #[error("failed to write {path}")]
    Write {
        /// The output path.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: io::Error,
    },
}
