//! The device transport: a single byte stream shared by many callers.
//!
//! One [`Device`] owns the character device exclusively. A dedicated reader
//! task unframes inbound bytes and delivers each decoded response to the
//! waiter registered under its correlation id; everything else is
//! caller-driven. Two fine-grained locks cover the shared state — the
//! pending map (held only across individual map operations, never across
//! I/O or awaits) and the writer (held for the single atomic write of a
//! pre-assembled envelope). The clients map has its own async lock so that
//! concurrent `get_service` calls for the same service issue exactly one
//! CID allocation.

use std::collections::HashMap;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use futures::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::sync::oneshot;
use tokio_util::codec::FramedRead;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::client::Client;
use crate::error::QmiError;
use crate::frame::{Frame, QmuxCodec, MAX_FRAME_LEN};
use crate::message::{Request, Response};
use crate::registry;
use crate::service::Service;
use crate::services::common::QMI_SERVICE_CTL;
use crate::services::ctl::{
    CtlAllocateCidInput, CtlReleaseCidInput, CtlReleaseCidInputReleaseInfo, CtlSyncInput,
};

type Delivery = Result<Box<dyn Response>, QmiError>;

/// Shared transport state: the writer half, the pending-waiter map, and the
/// shutdown machinery. Owned jointly by the [`Device`], its clients, and
/// the reader task.
pub(crate) struct Transport {
    writer: tokio::sync::Mutex<Box<dyn AsyncWrite + Send + Unpin>>,
    pending: Mutex<HashMap<u32, oneshot::Sender<Delivery>>>,
    cancel: CancellationToken,
    closed: AtomicBool,
    terminal: Mutex<Option<(io::ErrorKind, String)>>,
}

impl Transport {
    fn new(writer: Box<dyn AsyncWrite + Send + Unpin>) -> Arc<Self> {
        Arc::new(Self {
            writer: tokio::sync::Mutex::new(writer),
            pending: Mutex::new(HashMap::new()),
            cancel: CancellationToken::new(),
            closed: AtomicBool::new(false),
            terminal: Mutex::new(None),
        })
    }

    /// Fails fast when the device is shut down or has a terminal error.
    pub(crate) fn check_open(&self) -> Result<(), QmiError> {
        if self.closed.load(Ordering::Acquire) {
            Err(self.closed_error())
        } else {
            Ok(())
        }
    }

    /// The error subsequent calls observe: the sticky terminal I/O error if
    /// the device died, plain `AlreadyClosed` after an orderly shutdown.
    pub(crate) fn closed_error(&self) -> QmiError {
        let terminal = self.terminal.lock().expect("terminal state poisoned");
        match terminal.as_ref() {
            Some((kind, message)) => QmiError::Io(io::Error::new(*kind, message.clone())),
            None => QmiError::AlreadyClosed,
        }
    }

    /// Installs a fresh delivery slot under `correlation_id`.
    ///
    /// # Panics
    ///
    /// A duplicate install means the transaction counter wrapped around
    /// while the earlier call was still outstanding; that is a programming
    /// error and the transport aborts.
    pub(crate) fn install(&self, correlation_id: u32) -> oneshot::Receiver<Delivery> {
        let (tx, rx) = oneshot::channel();
        let previous = self
            .pending
            .lock()
            .expect("pending map poisoned")
            .insert(correlation_id, tx);
        assert!(
            previous.is_none(),
            "transaction id wrapped around while correlation id {correlation_id:#x} was in flight",
        );
        rx
    }

    /// Removes and returns the slot for `correlation_id`, if any.
    fn take(&self, correlation_id: u32) -> Option<oneshot::Sender<Delivery>> {
        self.pending
            .lock()
            .expect("pending map poisoned")
            .remove(&correlation_id)
    }

    /// Drops the slot for `correlation_id` if it is still installed.
    pub(crate) fn forget(&self, correlation_id: u32) {
        drop(self.take(correlation_id));
    }

    /// Writes one pre-assembled envelope. A write failure becomes the
    /// transport's terminal error.
    pub(crate) async fn write_all(&self, envelope: &[u8]) -> Result<(), QmiError> {
        let mut writer = self.writer.lock().await;
        let outcome = async {
            writer.write_all(envelope).await?;
            writer.flush().await
        }
        .await;
        drop(writer);
        outcome.map_err(|err| self.fail(err))
    }

    /// Records `err` as the terminal error and tears the transport down.
    /// Returns an equivalent error for the failing caller.
    fn fail(&self, err: io::Error) -> QmiError {
        {
            let mut terminal = self.terminal.lock().expect("terminal state poisoned");
            terminal.get_or_insert_with(|| (err.kind(), err.to_string()));
        }
        self.shutdown();
        QmiError::Io(err)
    }

    /// Cancels the reader and drops every pending slot; their waiters
    /// observe the channel closing and return [`QmiError::AlreadyClosed`]
    /// (or the terminal error).
    fn shutdown(&self) {
        self.closed.store(true, Ordering::Release);
        self.cancel.cancel();
        self.pending.lock().expect("pending map poisoned").clear();
    }

    #[cfg(test)]
    pub(crate) fn closed_for_tests() -> Arc<Self> {
        let transport = Self::new(Box::new(tokio::io::sink()));
        transport.shutdown();
        transport
    }
}

/// An open QMI device: the transport plus the per-service client registry.
pub struct Device {
    transport: Arc<Transport>,
    ctl: Arc<Client>,
    clients: tokio::sync::Mutex<HashMap<Service, Arc<Client>>>,
}

impl Device {
    /// Opens the character device at `path` (read-write, `O_NOCTTY` and
    /// `O_EXCL`), starts the reader task, seeds the CTL client with client
    /// id 0 and synchronizes with the modem via `CTL.Sync`.
    ///
    /// # Errors
    ///
    /// Open failures, and any transport or protocol error from the initial
    /// sync exchange.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, QmiError> {
        use std::os::unix::fs::OpenOptionsExt;

        let file = std::fs::OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY | libc::O_EXCL)
            .open(path)?;
        let reader = file.try_clone()?;

        let device = Self::from_stream(
            tokio::fs::File::from_std(reader),
            tokio::fs::File::from_std(file),
        );
        match device.ctl_sync(CtlSyncInput {}).await {
            Ok(_) => Ok(device),
            Err(err) => {
                let _ = device.close().await;
                Err(err)
            }
        }
    }

    /// Builds a device over an arbitrary byte stream, without the `CTL.Sync`
    /// handshake. This is the seam tests (and exotic transports) use; the
    /// reader task starts immediately, so a Tokio runtime must be current.
    #[must_use]
    pub fn from_stream(
        reader: impl AsyncRead + Send + Unpin + 'static,
        writer: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        let transport = Transport::new(Box::new(writer));
        spawn_reader(Arc::clone(&transport), reader);
        let ctl = Arc::new(Client::new(Arc::clone(&transport), QMI_SERVICE_CTL, 0));
        Self {
            transport,
            ctl,
            clients: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Returns the client for `service`, allocating a client id through CTL
    /// on first use.
    ///
    /// The clients lock is held across the allocation, so concurrent calls
    /// for the same service issue exactly one `CTL.AllocateCID`. The CTL
    /// client itself lives outside the map and is returned without locking.
    ///
    /// # Errors
    ///
    /// [`QmiError::AllocateCidFailed`] wrapping whatever made the CTL
    /// exchange fail, including the modem refusing the allocation.
    pub async fn get_service(&self, service: Service) -> Result<Arc<Client>, QmiError> {
        if service == QMI_SERVICE_CTL {
            return Ok(Arc::clone(&self.ctl));
        }

        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(&service) {
            return Ok(Arc::clone(client));
        }

        let output = Box::pin(self.ctl_allocate_cid(CtlAllocateCidInput { service: service.0 }))
            .await
            .map_err(|source| QmiError::AllocateCidFailed {
                service,
                source: Box::new(source),
            })?;
        let client = Arc::new(Client::new(
            Arc::clone(&self.transport),
            service,
            output.allocation_info.cid,
        ));
        clients.insert(service, Arc::clone(&client));
        Ok(client)
    }

    /// Releases the client id held for `service`, dropping the cached
    /// client. A service with no cached client is a no-op.
    ///
    /// # Errors
    ///
    /// Transport or protocol errors from the `CTL.ReleaseCID` exchange.
    pub async fn release_service(&self, service: Service) -> Result<(), QmiError> {
        let client = self.clients.lock().await.remove(&service);
        if let Some(client) = client {
            self.ctl_release_cid(CtlReleaseCidInput {
                release_info: CtlReleaseCidInputReleaseInfo {
                    service: service.0,
                    cid: client.client_id(),
                },
            })
            .await?;
        }
        Ok(())
    }

    /// Sends `request` through the client owning its service, allocating
    /// that client first if needed.
    ///
    /// # Errors
    ///
    /// As for [`Device::get_service`] and [`Client::send`].
    pub async fn send(&self, request: &dyn Request) -> Result<Box<dyn Response>, QmiError> {
        let client = self.get_service(request.service_id()).await?;
        client.send(request).await
    }

    /// Shuts the device down: cancels the reader, drops all pending slots
    /// (their waiters return [`QmiError::AlreadyClosed`]) and closes the
    /// stream. Subsequent calls fail immediately.
    ///
    /// # Errors
    ///
    /// [`QmiError::AlreadyClosed`] if the device was already shut down.
    pub async fn close(&self) -> Result<(), QmiError> {
        if self.transport.closed.swap(true, Ordering::AcqRel) {
            return Err(QmiError::AlreadyClosed);
        }
        self.transport.shutdown();
        let mut writer = self.transport.writer.lock().await;
        let _ = writer.shutdown().await;
        Ok(())
    }
}

impl Drop for Device {
    fn drop(&mut self) {
        // Best effort: stop the reader task if the caller never closed.
        self.transport.cancel.cancel();
    }
}

/// Spawns the sole reader of the device stream. The loop exits on
/// cancellation, or on EOF/read error, which becomes the transport's
/// terminal error.
fn spawn_reader(transport: Arc<Transport>, reader: impl AsyncRead + Send + Unpin + 'static) {
    tokio::spawn(async move {
        let mut frames = FramedRead::with_capacity(reader, QmuxCodec::new(), MAX_FRAME_LEN);
        loop {
            let next = tokio::select! {
                () = transport.cancel.cancelled() => break,
                next = frames.next() => next,
            };
            match next {
                None => {
                    let _ = transport.fail(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "device stream ended",
                    ));
                    break;
                }
                Some(Err(QmiError::Io(err))) => {
                    let _ = transport.fail(err);
                    break;
                }
                Some(Err(err)) => {
                    warn!(%err, "dropping undecodable frame");
                }
                Some(Ok(frame)) => deliver(&transport, &frame),
            }
        }
    });
}

/// Decodes `frame` through the registry and hands the outcome to the
/// waiter registered under the frame's correlation id. Frames with no
/// waiter — indications, cancelled calls, unregistered messages — are
/// logged and dropped; a decode failure with a live waiter is delivered so
/// the caller sees it.
fn deliver(transport: &Transport, frame: &Frame) {
    let delivery = registry::global().decode_response(frame);
    let Some(slot) = transport.take(frame.correlation_id()) else {
        match delivery {
            Ok(_) => debug!(
                service = %frame.service,
                message_id = frame.message_id,
                "dropping response with no waiter"
            ),
            Err(err) => warn!(%err, "dropping undecodable frame"),
        }
        return;
    };
    if slot.send(delivery).is_err() {
        debug!("waiter cancelled before delivery");
    }
}
