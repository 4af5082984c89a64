//! The shared message capability implemented by every generated binding.
//!
//! Each schema message yields one `*Input` type (a [`Request`]) and one
//! `*Output` type (a [`Response`]). Requests only encode and responses only
//! decode, so the two directions are separate traits on top of the common
//! [`Message`] identity.

use std::any::Any;

use crate::error::QmiError;
use crate::service::Service;
use crate::services::common::OperationResult;

/// Identity shared by requests and responses: which service and message a
/// payload belongs to.
pub trait Message {
    /// The service this message belongs to.
    fn service_id(&self) -> Service;
    /// The 16-bit message id within the service.
    fn message_id(&self) -> u16;
}

/// A request payload: encodes itself as a TLV stream.
pub trait Request: Message + Send + Sync {
    /// Appends the request's TLV stream to `out`.
    ///
    /// # Errors
    ///
    /// Returns [`QmiError::TlvTooLong`] if a variable-length TLV payload does
    /// not fit the wire format's 16-bit length field.
    fn write_tlvs(&self, out: &mut Vec<u8>) -> Result<(), QmiError>;
}

/// A response payload: decodes itself from a TLV stream.
///
/// Responses are constructed zero-valued by the registry and filled in by
/// [`Response::read_tlvs`]; absent optional TLVs leave their fields at the
/// zero value.
pub trait Response: Message + Send {
    /// Decodes the response's fields from the inbound TLV stream.
    ///
    /// # Errors
    ///
    /// Returns [`QmiError::MissingOperationResult`] if the mandatory tag-2
    /// TLV is absent, or [`QmiError::TruncatedTlv`] if a present TLV is too
    /// short for its fields.
    fn read_tlvs(&mut self, tlvs: &[u8]) -> Result<(), QmiError>;

    /// The decoded Operation Result, for responses that carry one.
    fn operation_result(&self) -> Option<OperationResult> {
        None
    }

    /// Upcast for downcasting to the concrete output type.
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}
