//! Per-service clients: the transaction counter and the send path.

use std::sync::{Arc, Mutex};

use crate::error::{ProtocolError, QmiError};
use crate::frame::Frame;
use crate::message::{Request, Response};
use crate::service::Service;
use crate::transport::Transport;

/// A caller's handle on one service of a device.
///
/// Clients are created by [`crate::Device::get_service`]; the CTL client
/// (client id 0) is seeded when the device opens. Each client owns a
/// monotonically increasing transaction counter used to correlate responses
/// with in-flight calls.
pub struct Client {
    transport: Arc<Transport>,
    service: Service,
    client_id: u8,
    transaction_id: Mutex<u16>,
}

impl Client {
    pub(crate) fn new(transport: Arc<Transport>, service: Service, client_id: u8) -> Self {
        Self {
            transport,
            service,
            client_id,
            transaction_id: Mutex::new(0),
        }
    }

    /// The service this client talks to.
    #[must_use]
    pub fn service(&self) -> Service {
        self.service
    }

    /// The client id the CTL service allocated (0 for CTL itself).
    #[must_use]
    pub fn client_id(&self) -> u8 {
        self.client_id
    }

    /// Claims the next transaction id and the correlation key derived from
    /// it. The lock is held only for the increment.
    fn next_transaction(&self) -> (u16, u32) {
        let mut txid = self
            .transaction_id
            .lock()
            .expect("transaction counter poisoned");
        *txid = txid.wrapping_add(1);
        (*txid, u32::from(self.client_id) | u32::from(*txid) << 8)
    }

    /// Sends `request` on this client and awaits the matching response.
    ///
    /// The TLV stream is serialized into a scratch buffer, wrapped in a QMUX
    /// envelope, and written to the device in one write. The call then
    /// suspends on its per-transaction delivery slot; responses are matched
    /// by correlation id, never by arrival order. Cancelling the returned
    /// future removes the slot, so a late response is dropped by the reader.
    ///
    /// # Errors
    ///
    /// [`QmiError::AlreadyClosed`] (or the transport's sticky I/O error) if
    /// the device is shut down, encode errors from the request, write
    /// failures, decode errors delivered by the reader, and
    /// [`QmiError::Protocol`] when the response reports a nonzero operation
    /// status — in which case the response body is discarded.
    pub async fn send(&self, request: &dyn Request) -> Result<Box<dyn Response>, QmiError> {
        self.transport.check_open()?;

        let (transaction_id, correlation_id) = self.next_transaction();
        let slot = self.transport.install(correlation_id);
        let _guard = PendingGuard {
            transport: &self.transport,
            correlation_id,
        };

        let mut tlvs = Vec::new();
        request.write_tlvs(&mut tlvs)?;
        let envelope = Frame::encode(
            self.service,
            self.client_id,
            transaction_id,
            request.message_id(),
            &tlvs,
        );
        self.transport.write_all(&envelope).await?;

        let response = match slot.await {
            Ok(delivery) => delivery?,
            Err(_) => return Err(self.transport.closed_error()),
        };

        if let Some(result) = response.operation_result() {
            if result.error_status != 0 {
                return Err(QmiError::Protocol(ProtocolError(result.error_code)));
            }
        }
        Ok(response)
    }
}

/// Sweeps the pending slot when the send path unwinds early — an encode or
/// write failure, or the caller cancelling the future. Normal delivery has
/// already removed the entry, making the sweep a no-op.
struct PendingGuard<'a> {
    transport: &'a Transport,
    correlation_id: u32,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.transport.forget(self.correlation_id);
    }
}
