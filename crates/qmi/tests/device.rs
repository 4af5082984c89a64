//! End-to-end transport scenarios over an in-memory device stream.
//!
//! Each test plays the modem side of a `tokio::io::duplex` pair: it reads
//! the envelopes the device writes, asserts their bytes, and answers with
//! hand-built response frames.

use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt, DuplexStream};

use qmi::services::common::{QMI_SERVICE_CTL, QMI_SERVICE_DMS, QMI_SERVICE_WDS};
use qmi::services::ctl::CtlSyncInput;
use qmi::services::dms::DmsGetManufacturerInput;
use qmi::services::wds::WdsGetPacketServiceStatusInput;
use qmi::{Device, Frame, ProtocolError, QmiError, Service};

/// TLV stream of a successful Operation Result (S3).
const OP_RESULT_SUCCESS: [u8; 7] = [0x02, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00];

/// Exact CTL.Sync request envelope (S1).
const SYNC_REQUEST: [u8; 12] = [
    0x01, 0x0B, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0x27, 0x00, 0x00, 0x00,
];

fn harness() -> (Device, Modem) {
    let (device_side, modem_side) = tokio::io::duplex(4096);
    let (reader, writer) = tokio::io::split(device_side);
    (
        Device::from_stream(reader, writer),
        Modem {
            stream: modem_side,
            buf: Vec::new(),
        },
    )
}

/// The far side of the wire: a frame-at-a-time reader over the raw stream.
struct Modem {
    stream: DuplexStream,
    buf: Vec<u8>,
}

impl Modem {
    async fn read_frame(&mut self) -> Frame {
        loop {
            if !self.buf.is_empty() {
                match Frame::parse(&self.buf) {
                    Ok((frame, consumed)) => {
                        self.buf.drain(..consumed);
                        return frame;
                    }
                    Err(QmiError::ShortFrame) => {}
                    Err(err) => panic!("bad frame from device: {err}"),
                }
            }
            let mut chunk = [0u8; 512];
            let n = self.stream.read(&mut chunk).await.expect("device read");
            assert!(n > 0, "device closed while a frame was expected");
            self.buf.extend_from_slice(&chunk[..n]);
        }
    }

    async fn respond(
        &mut self,
        service: Service,
        client_id: u8,
        transaction_id: u16,
        message_id: u16,
        tlvs: &[u8],
    ) {
        let envelope = Frame::encode(service, client_id, transaction_id, message_id, tlvs);
        self.stream.write_all(&envelope).await.expect("modem write");
    }

    /// Asserts nothing further arrived from the device.
    async fn assert_idle(&mut self) {
        assert!(self.buf.is_empty(), "unconsumed bytes from the device");
        let mut probe = [0u8; 1];
        let extra = tokio::time::timeout(Duration::from_millis(50), self.stream.read(&mut probe));
        assert!(extra.await.is_err(), "unexpected bytes from the device");
    }
}

fn tlv(tag: u8, payload: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    out.extend_from_slice(&u16::try_from(payload.len()).unwrap().to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Handles the `CTL.AllocateCID` exchange for `service`, granting `cid`.
async fn grant_cid(modem: &mut Modem, service: Service, cid: u8) {
    let frame = modem.read_frame().await;
    assert_eq!(frame.service, QMI_SERVICE_CTL);
    assert_eq!(frame.message_id, 0x0022);
    assert_eq!(frame.tlvs, tlv(0x01, &[service.0]));

    let mut tlvs = OP_RESULT_SUCCESS.to_vec();
    tlvs.extend_from_slice(&tlv(0x01, &[service.0, cid]));
    modem
        .respond(QMI_SERVICE_CTL, 0, frame.transaction_id, 0x0022, &tlvs)
        .await;
}

#[tokio::test]
async fn sync_request_bytes_and_response() {
    let (device, mut modem) = harness();

    let modem_task = tokio::spawn(async move {
        let mut wire = [0u8; 12];
        modem.stream.read_exact(&mut wire).await.unwrap();
        assert_eq!(wire, SYNC_REQUEST);
        modem
            .respond(QMI_SERVICE_CTL, 0, 1, 0x0027, &OP_RESULT_SUCCESS)
            .await;
        modem
    });

    let output = device.ctl_sync(CtlSyncInput {}).await.unwrap();
    assert_eq!(output.operation_result.error_status, 0);
    assert_eq!(output.operation_result.error_code, 0);
    modem_task.await.unwrap();
}

#[tokio::test]
async fn get_service_allocates_a_client_id() {
    let (device, mut modem) = harness();

    let modem_task = tokio::spawn(async move {
        // Sync first, as Device::open would, so the allocation lands on txid 2.
        let sync = modem.read_frame().await;
        assert_eq!(sync.message_id, 0x0027);
        modem
            .respond(QMI_SERVICE_CTL, 0, 1, 0x0027, &OP_RESULT_SUCCESS)
            .await;

        // S2: the allocation request, byte for byte.
        let mut wire = [0u8; 16];
        modem.stream.read_exact(&mut wire).await.unwrap();
        assert_eq!(
            wire,
            [
                0x01, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02, 0x22, 0x00, 0x04, 0x00, 0x01,
                0x01, 0x00, 0x02
            ]
        );

        let mut tlvs = OP_RESULT_SUCCESS.to_vec();
        tlvs.extend_from_slice(&tlv(0x01, &[QMI_SERVICE_DMS.0, 5]));
        modem.respond(QMI_SERVICE_CTL, 0, 2, 0x0022, &tlvs).await;
        modem
    });

    device.ctl_sync(CtlSyncInput {}).await.unwrap();
    let client = device.get_service(QMI_SERVICE_DMS).await.unwrap();
    assert_eq!(client.service(), QMI_SERVICE_DMS);
    assert_eq!(client.client_id(), 5);
    modem_task.await.unwrap();
}

#[tokio::test]
async fn concurrent_get_service_allocates_once() {
    let (device, mut modem) = harness();

    let modem_task = tokio::spawn(async move {
        grant_cid(&mut modem, QMI_SERVICE_WDS, 7).await;
        modem
    });

    let (a, b) = tokio::join!(
        device.get_service(QMI_SERVICE_WDS),
        device.get_service(QMI_SERVICE_WDS),
    );
    assert_eq!(a.unwrap().client_id(), 7);
    assert_eq!(b.unwrap().client_id(), 7);

    let mut modem = modem_task.await.unwrap();
    modem.assert_idle().await;
}

#[tokio::test]
async fn nonzero_operation_status_surfaces_qmi_error() {
    let (device, mut modem) = harness();

    let modem_task = tokio::spawn(async move {
        grant_cid(&mut modem, QMI_SERVICE_WDS, 7).await;

        let frame = modem.read_frame().await;
        assert_eq!(frame.service, QMI_SERVICE_WDS);
        assert_eq!(frame.client_id, 7);
        assert_eq!(frame.message_id, 0x0022);

        // S4: status 1, error 14 (CALL_FAILED).
        let tlvs = [0x02, 0x04, 0x00, 0x01, 0x00, 0x0E, 0x00];
        modem
            .respond(QMI_SERVICE_WDS, 7, frame.transaction_id, 0x0022, &tlvs)
            .await;
    });

    let err = device
        .wds_get_packet_service_status(WdsGetPacketServiceStatusInput {})
        .await
        .unwrap_err();
    match err {
        QmiError::Protocol(code) => {
            assert_eq!(code, ProtocolError::CALL_FAILED);
            assert_eq!(code.description(), Some("Call failed"));
        }
        other => panic!("expected a protocol error, got {other}"),
    }
    modem_task.await.unwrap();
}

#[tokio::test]
async fn out_of_order_responses_reach_their_callers() {
    let (device, mut modem) = harness();

    let modem_task = tokio::spawn(async move {
        grant_cid(&mut modem, QMI_SERVICE_DMS, 9).await;

        let first = modem.read_frame().await;
        let second = modem.read_frame().await;
        assert_eq!(first.transaction_id, 1);
        assert_eq!(second.transaction_id, 2);

        // S5: complete the second transaction before the first.
        for (frame, name) in [(&second, "beta"), (&first, "alpha")] {
            let mut tlvs = OP_RESULT_SUCCESS.to_vec();
            tlvs.extend_from_slice(&tlv(0x01, name.as_bytes()));
            modem
                .respond(QMI_SERVICE_DMS, 9, frame.transaction_id, 0x0021, &tlvs)
                .await;
        }
    });

    let (a, b) = tokio::join!(
        device.dms_get_manufacturer(DmsGetManufacturerInput {}),
        device.dms_get_manufacturer(DmsGetManufacturerInput {}),
    );
    assert_eq!(a.unwrap().manufacturer, "alpha");
    assert_eq!(b.unwrap().manufacturer, "beta");
    modem_task.await.unwrap();
}

#[tokio::test]
async fn concurrent_sends_use_distinct_correlations() {
    let (device, mut modem) = harness();
    let device = Arc::new(device);

    let modem_task = tokio::spawn(async move {
        let mut frames = Vec::new();
        for _ in 0..8 {
            frames.push(modem.read_frame().await);
        }
        let mut txids: Vec<u16> = frames.iter().map(|f| f.transaction_id).collect();
        txids.sort_unstable();
        txids.dedup();
        assert_eq!(txids.len(), 8, "correlation ids collided");

        for frame in frames.iter().rev() {
            modem
                .respond(
                    QMI_SERVICE_CTL,
                    0,
                    frame.transaction_id,
                    0x0027,
                    &OP_RESULT_SUCCESS,
                )
                .await;
        }
    });

    let mut calls = Vec::new();
    for _ in 0..8 {
        let device = Arc::clone(&device);
        calls.push(tokio::spawn(async move {
            device.ctl_sync(CtlSyncInput {}).await
        }));
    }
    for call in calls {
        call.await.unwrap().unwrap();
    }
    modem_task.await.unwrap();
}

#[tokio::test]
async fn reader_resynchronizes_on_garbage() {
    let (device, mut modem) = harness();

    let modem_task = tokio::spawn(async move {
        let frame = modem.read_frame().await;
        assert_eq!(frame.message_id, 0x0027);

        // S6: two garbage bytes, then the valid response.
        modem.stream.write_all(&[0xFF, 0xFF]).await.unwrap();
        modem
            .respond(QMI_SERVICE_CTL, 0, frame.transaction_id, 0x0027, &OP_RESULT_SUCCESS)
            .await;
    });

    device.ctl_sync(CtlSyncInput {}).await.unwrap();
    modem_task.await.unwrap();
}

#[tokio::test]
async fn missing_operation_result_surfaces_to_the_caller() {
    let (device, mut modem) = harness();

    let modem_task = tokio::spawn(async move {
        let frame = modem.read_frame().await;
        modem
            .respond(QMI_SERVICE_CTL, 0, frame.transaction_id, 0x0027, &[])
            .await;
    });

    let err = device.ctl_sync(CtlSyncInput {}).await.unwrap_err();
    assert!(matches!(err, QmiError::MissingOperationResult));
    modem_task.await.unwrap();
}

#[tokio::test]
async fn close_fails_pending_and_subsequent_calls() {
    let (device, mut modem) = harness();
    let device = Arc::new(device);

    let pending = tokio::spawn({
        let device = Arc::clone(&device);
        async move { device.ctl_sync(CtlSyncInput {}).await }
    });

    // The request is on the wire, so the call is suspended on its slot.
    let mut wire = [0u8; 12];
    modem.stream.read_exact(&mut wire).await.unwrap();

    device.close().await.unwrap();
    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, QmiError::AlreadyClosed));

    assert!(matches!(
        device.ctl_sync(CtlSyncInput {}).await.unwrap_err(),
        QmiError::AlreadyClosed
    ));
    assert!(matches!(device.close().await.unwrap_err(), QmiError::AlreadyClosed));
}

#[tokio::test]
async fn device_eof_is_a_sticky_io_error() {
    let (device, mut modem) = harness();
    let device = Arc::new(device);

    let pending = tokio::spawn({
        let device = Arc::clone(&device);
        async move { device.ctl_sync(CtlSyncInput {}).await }
    });

    let mut wire = [0u8; 12];
    modem.stream.read_exact(&mut wire).await.unwrap();
    drop(modem);

    let err = pending.await.unwrap().unwrap_err();
    assert!(matches!(err, QmiError::Io(_)), "expected an i/o error, got {err}");
    assert!(matches!(
        device.ctl_sync(CtlSyncInput {}).await.unwrap_err(),
        QmiError::Io(_)
    ));
}

#[tokio::test]
async fn cancelled_send_drops_its_slot_and_the_late_response() {
    let (device, mut modem) = harness();

    let mut call = Box::pin(device.ctl_sync(CtlSyncInput {}));
    // Drive the call far enough to write the request, then cancel it.
    assert!(futures_poll_once(call.as_mut()).await.is_none());
    let mut wire = [0u8; 12];
    modem.stream.read_exact(&mut wire).await.unwrap();
    drop(call);

    // The late response finds no waiter and is dropped; the device stays usable.
    modem.respond(QMI_SERVICE_CTL, 0, 1, 0x0027, &OP_RESULT_SUCCESS).await;

    let modem_task = tokio::spawn(async move {
        let frame = modem.read_frame().await;
        assert_eq!(frame.transaction_id, 2);
        modem
            .respond(QMI_SERVICE_CTL, 0, 2, 0x0027, &OP_RESULT_SUCCESS)
            .await;
    });
    device.ctl_sync(CtlSyncInput {}).await.unwrap();
    modem_task.await.unwrap();
}

/// Polls a future exactly once, returning its output if it completed.
async fn futures_poll_once<F: std::future::Future + Unpin>(future: F) -> Option<F::Output> {
    use std::future::Future;
    use std::pin::Pin;
    use std::task::Poll;

    let mut future = future;
    std::future::poll_fn(|cx| {
        Poll::Ready(match Pin::new(&mut future).poll(cx) {
            Poll::Ready(output) => Some(output),
            Poll::Pending => None,
        })
    })
    .await
}
