//! Schema-to-code compiler for the QMI protocol.
//!
//! The input is a set of declarative schema documents (human-writable
//! relaxed JSON) describing QMI services, messages and their TLV fields;
//! the output is Rust source for the `qmi` crate: one typed request and
//! response per message, their encode/decode routines, and the registry
//! block wiring every response factory into the runtime dispatch table.
//!
//! # Pipeline
//!
//! ```text
//! schema document ─▶ Schema model ─▶ Type mapper ─▶ Codec synthesizer ─▶ Emitter ─▶ .rs artifact
//!     (schema)          (schema)       (mapper)         (synth)           (emit)
//! ```
//!
//! Generating code (rather than interpreting schemas at runtime) removes
//! per-call branching on format tags and makes the wire contract visible at
//! type-check time; the runtime keeps only a factory table keyed by
//! `(service, message id)`.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod catalog;
pub mod emit;
pub mod error;
pub mod ident;
pub mod mapper;
pub mod schema;
pub mod synth;

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use tracing::debug;

pub use error::CodegenError;
pub use schema::{Entity, RefTable, Schema};

/// Compiler state shared across the documents of one run: the reusable
/// struct table, which later schemas resolve `common-ref` fields against.
#[derive(Default)]
pub struct Generator {
    refs: RefTable,
}

impl Generator {
    /// Creates a generator with an empty reusable-struct table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads one schema document, registering its common refs.
    ///
    /// # Errors
    ///
    /// Read failures and schema malformations.
    pub fn load(&mut self, path: &Path) -> Result<Schema, CodegenError> {
        let text = fs::read_to_string(path).map_err(|source| CodegenError::Read {
            path: path.to_owned(),
            source,
        })?;
        debug!(path = %path.display(), "loading schema");
        Schema::parse(&text, &mut self.refs)
    }

    /// Loads `input` and renders its artifact. The file stem `qmi-common`
    /// selects the common artifact (service catalog plus reusable records);
    /// anything else renders a service artifact.
    ///
    /// # Errors
    ///
    /// Load failures plus any synthesis or emission failure.
    pub fn convert(&mut self, input: &Path) -> Result<String, CodegenError> {
        let schema = self.load(input)?;
        let source = input
            .file_name()
            .map_or_else(|| input.display().to_string(), |name| name.to_string_lossy().into_owned());
        if input.file_stem() == Some(OsStr::new("qmi-common")) {
            emit::common_artifact(&schema, &self.refs, &source)
        } else {
            emit::service_artifact(&schema, &self.refs, &source)
        }
    }

    /// The reusable structs registered so far.
    #[must_use]
    pub fn refs(&self) -> &RefTable {
        &self.refs
    }
}
