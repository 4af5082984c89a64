//! Generated service bindings.
//!
//! Every module in this directory except this file is an output of
//! `qmi-codegen` over the schema documents in `crates/qmi-codegen/data/`.
//! Regenerate with `cargo run -p qmi-codegen` from the workspace root; edit
//! the schemas, not the outputs.

pub mod common;
pub mod ctl;
pub mod dms;
pub mod wds;

use crate::registry::MessageRegistry;

/// Installs every generated response factory into `reg`.
pub(crate) fn register_all(reg: &mut MessageRegistry) {
    ctl::register(reg);
    dms::register(reg);
    wds::register(reg);
}
