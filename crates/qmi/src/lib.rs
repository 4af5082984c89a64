//! Typed QMI client runtime.
//!
//! QMI (Qualcomm MSM Interface) is the binary request/response protocol
//! spoken to cellular modems over a character device. This crate carries the
//! runtime half of the toolchain: the QMUX framer, the transaction
//! multiplexing transport, the per-service client-id lifecycle, and the
//! typed message bindings generated from the schema documents by
//! `qmi-codegen`.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        Generated service bindings        │  services::{ctl, dms, wds}
//! ├─────────────────────────────────────────┤
//! │     Clients (client id, transaction)     │  client
//! ├─────────────────────────────────────────┤
//! │   Transport (pending map, reader task)   │  transport
//! ├─────────────────────────────────────────┤
//! │          QMUX framing + TLVs             │  frame, wire
//! ├─────────────────────────────────────────┤
//! │          Character device                │  /dev/cdc-wdm0, …
//! └─────────────────────────────────────────┘
//! ```
//!
//! Each request is framed into a QMUX envelope and written to the device in
//! a single write; a dedicated reader task unframes inbound bytes and
//! delivers each response to the caller waiting on the matching
//! `(client id, transaction id)` correlation. Responses are matched by
//! correlation, never by arrival order, so out-of-order completion is
//! expected and correct.
//!
//! # Example
//!
//! ```ignore
//! use qmi::services::dms::DmsGetManufacturerInput;
//! use qmi::Device;
//!
//! let device = Device::open("/dev/cdc-wdm0").await?;
//! let output = device.dms_get_manufacturer(DmsGetManufacturerInput {}).await?;
//! println!("{}", output.manufacturer);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod error;
pub mod frame;
pub mod message;
pub mod registry;
pub mod service;
pub mod services;
pub mod transport;
mod wire;

pub use client::Client;
pub use error::{ProtocolError, QmiError};
pub use frame::{find_tag, Frame, QmuxCodec};
pub use message::{Message, Request, Response};
pub use registry::MessageRegistry;
pub use service::Service;
pub use transport::Device;
