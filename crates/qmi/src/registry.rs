//! The process-wide dispatch table mapping `(service, message id)` to
//! response constructors.
//!
//! The generated bindings carry no interpretive codec: each service module
//! contributes a `register` block installing one zero-value factory per
//! output type, and the reader resolves inbound frames through this table
//! before handing the decoded response to its waiter.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::QmiError;
use crate::frame::Frame;
use crate::message::Response;
use crate::service::Service;

type Factory = fn() -> Box<dyn Response>;

/// Dispatch table of response factories keyed by `(service, message id)`.
#[derive(Default)]
pub struct MessageRegistry {
    factories: HashMap<Service, HashMap<u16, Factory>>,
}

impl MessageRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a factory under the service and message id of the response
    /// it constructs.
    pub fn register(&mut self, factory: Factory) {
        let probe = factory();
        let previous = self
            .factories
            .entry(probe.service_id())
            .or_default()
            .insert(probe.message_id(), factory);
        debug_assert!(
            previous.is_none(),
            "duplicate factory for {} message {:#06x}",
            probe.service_id(),
            probe.message_id(),
        );
    }

    /// Constructs the zero-valued response registered for `(service, message_id)`.
    ///
    /// # Errors
    ///
    /// [`QmiError::UnknownService`] if no message of the service is
    /// registered, [`QmiError::UnknownMessage`] if the service is known but
    /// the message id is not.
    pub fn new_response(
        &self,
        service: Service,
        message_id: u16,
    ) -> Result<Box<dyn Response>, QmiError> {
        let messages = self
            .factories
            .get(&service)
            .ok_or(QmiError::UnknownService(service))?;
        let factory = messages
            .get(&message_id)
            .ok_or(QmiError::UnknownMessage(service, message_id))?;
        Ok(factory())
    }

    /// Decodes the frame's TLV stream into its registered response type.
    ///
    /// # Errors
    ///
    /// Lookup failures as for [`MessageRegistry::new_response`], plus any
    /// decode error from the response's `read_tlvs`.
    pub fn decode_response(&self, frame: &Frame) -> Result<Box<dyn Response>, QmiError> {
        let mut response = self.new_response(frame.service, frame.message_id)?;
        response.read_tlvs(&frame.tlvs)?;
        Ok(response)
    }
}

/// The global registry, populated once from every generated service module.
pub fn global() -> &'static MessageRegistry {
    static REGISTRY: OnceLock<MessageRegistry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let mut registry = MessageRegistry::new();
        crate::services::register_all(&mut registry);
        registry
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::common::{QMI_SERVICE_CTL, QMI_SERVICE_DMS};

    #[test]
    fn global_registry_knows_the_generated_outputs() {
        let registry = global();
        let response = registry.new_response(QMI_SERVICE_CTL, 0x0027).unwrap();
        assert_eq!(response.service_id(), QMI_SERVICE_CTL);
        assert_eq!(response.message_id(), 0x0027);
        assert!(registry.new_response(QMI_SERVICE_DMS, 0x0021).is_ok());
    }

    #[test]
    fn lookup_failures_name_the_culprit() {
        let registry = global();
        assert!(matches!(
            registry.new_response(Service(0x7F), 0x0001),
            Err(QmiError::UnknownService(Service(0x7F)))
        ));
        assert!(matches!(
            registry.new_response(QMI_SERVICE_CTL, 0x5555),
            Err(QmiError::UnknownMessage(_, 0x5555))
        ));
    }

    #[test]
    fn decode_response_runs_the_generated_codec() {
        let frame = Frame {
            service: QMI_SERVICE_CTL,
            client_id: 0,
            control_flags: 0x02,
            transaction_id: 1,
            message_id: 0x0027,
            tlvs: vec![0x02, 0x04, 0x00, 0x01, 0x00, 0x0E, 0x00],
        };
        let response = global().decode_response(&frame).unwrap();
        let result = response.operation_result().unwrap();
        assert_eq!(result.error_status, 1);
        assert_eq!(result.error_code, 14);
    }
}
