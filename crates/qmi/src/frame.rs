//! QMUX framing: the envelope around every QMI payload.
//!
//! One frame on the wire:
//!
//! ```text
//! +--------+-------------+-------+---------+--------+---------+------+--------+----------+------+
//! | 0x01   | qmux-length | flags | service | client | control | txid | msg id | tlv len  | TLVs |
//! | 1 byte | u16 LE      | 1     | 1       | 1      | 1       | 1|2  | u16 LE | u16 LE   | ...  |
//! +--------+-------------+-------+---------+--------+---------+------+--------+----------+------+
//! ```
//!
//! `qmux-length` counts every byte after the marker. The transaction id is
//! one byte for the CTL service and two little-endian bytes for every other
//! service; that width difference cascades into the offsets of the message
//! id and TLV length, and is fully encapsulated here — no caller branches
//! on it.
//!
//! [`QmuxCodec`] adapts the framing to [`tokio_util::codec`] streams. The
//! declared length is validated against the frame bound before any
//! allocation, and the decoder resynchronizes on the marker byte when the
//! device emits garbage between frames.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};
use tracing::{trace, warn};

use crate::error::QmiError;
use crate::service::Service;
use crate::services::common::QMI_SERVICE_CTL;

/// Leading byte of every QMUX frame.
pub const MARKER: u8 = 0x01;

/// Smallest possible frame: a CTL envelope with no TLVs.
const MIN_FRAME_LEN: usize = 12;

/// Largest frame accepted from the device, matching the reader's buffer.
pub(crate) const MAX_FRAME_LEN: usize = 2048;

/// A decoded QMUX envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The service the payload belongs to.
    pub service: Service,
    /// The client id within the service.
    pub client_id: u8,
    /// Control flags byte (0 for requests; responses and indications set
    /// bits the runtime does not interpret).
    pub control_flags: u8,
    /// The per-client transaction id.
    pub transaction_id: u16,
    /// The message id within the service.
    pub message_id: u16,
    /// The raw TLV stream.
    pub tlvs: Vec<u8>,
}

impl Frame {
    /// The key responses are demultiplexed by: the client id in the low
    /// byte, the transaction id above it. A 16-bit transaction id cannot
    /// collide with the client byte, so the key needs (and gets) 24 bits.
    #[must_use]
    pub fn correlation_id(&self) -> u32 {
        u32::from(self.client_id) | u32::from(self.transaction_id) << 8
    }

    /// Assembles the envelope for one outbound request.
    ///
    /// # Panics
    ///
    /// Panics if the TLV stream pushes the envelope past the 16-bit
    /// `qmux-length` field; callers bound payloads far below that.
    #[must_use]
    pub fn encode(
        service: Service,
        client_id: u8,
        transaction_id: u16,
        message_id: u16,
        tlvs: &[u8],
    ) -> Vec<u8> {
        let ctl = service == QMI_SERVICE_CTL;
        let txid_len = if ctl { 1 } else { 2 };
        let qmux_len = 10 + txid_len + tlvs.len();
        assert!(qmux_len <= usize::from(u16::MAX), "frame exceeds qmux length field");

        let mut out = Vec::with_capacity(1 + qmux_len);
        out.push(MARKER);
        out.extend_from_slice(&(qmux_len as u16).to_le_bytes());
        out.push(0); // sender flags
        out.push(service.0);
        out.push(client_id);
        out.push(0); // control flags: request
        if ctl {
            out.push(transaction_id as u8);
        } else {
            out.extend_from_slice(&transaction_id.to_le_bytes());
        }
        out.extend_from_slice(&message_id.to_le_bytes());
        out.extend_from_slice(&(tlvs.len() as u16).to_le_bytes());
        out.extend_from_slice(tlvs);
        out
    }

    /// Parses one frame from the front of `buf`, returning it together with
    /// the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// [`QmiError::BadMarker`] if the first byte is not [`MARKER`];
    /// [`QmiError::ShortFrame`] if `buf` ends before the declared lengths.
    pub fn parse(buf: &[u8]) -> Result<(Self, usize), QmiError> {
        let marker = *buf.first().ok_or(QmiError::ShortFrame)?;
        if marker != MARKER {
            return Err(QmiError::BadMarker(marker));
        }
        if buf.len() < 3 {
            return Err(QmiError::ShortFrame);
        }
        let qmux_len = usize::from(u16::from_le_bytes([buf[1], buf[2]]));
        let total = qmux_len + 1;
        if buf.len() < total {
            return Err(QmiError::ShortFrame);
        }
        let frame = &buf[..total];

        let service = Service(*frame.get(4).ok_or(QmiError::ShortFrame)?);
        let ctl = service == QMI_SERVICE_CTL;
        let wide = usize::from(!ctl);
        if frame.len() < MIN_FRAME_LEN + wide {
            return Err(QmiError::ShortFrame);
        }

        let client_id = frame[5];
        let control_flags = frame[6];
        let transaction_id = if ctl {
            u16::from(frame[7])
        } else {
            u16::from_le_bytes([frame[7], frame[8]])
        };
        let message_id = u16::from_le_bytes([frame[8 + wide], frame[9 + wide]]);
        let tlv_len = usize::from(u16::from_le_bytes([frame[10 + wide], frame[11 + wide]]));
        let tlv_start = 12 + wide;
        if frame.len() < tlv_start + tlv_len {
            return Err(QmiError::ShortFrame);
        }

        Ok((
            Self {
                service,
                client_id,
                control_flags,
                transaction_id,
                message_id,
                tlvs: frame[tlv_start..tlv_start + tlv_len].to_vec(),
            },
            total,
        ))
    }
}

/// Scans a TLV stream for `tag` and returns a view of its payload.
///
/// The walk visits (tag, u16 LE length, payload) records front to back and
/// stops at the first truncated record; it never reads past `buf`.
#[must_use]
pub fn find_tag(buf: &[u8], tag: u8) -> Option<&[u8]> {
    let mut i = 0usize;
    while i + 3 <= buf.len() {
        let t = buf[i];
        let len = usize::from(u16::from_le_bytes([buf[i + 1], buf[i + 2]]));
        i += 3;
        if buf.len() - i < len {
            return None;
        }
        if t == tag {
            return Some(&buf[i..i + len]);
        }
        i += len;
    }
    None
}

/// [`tokio_util::codec`] adapter for QMUX frames.
///
/// Decoding resynchronizes on the marker byte: bytes before the next `0x01`
/// are discarded, an implausible declared length demotes the marker to
/// garbage, and an incomplete frame waits for more input.
#[derive(Debug, Clone, Copy, Default)]
pub struct QmuxCodec;

impl QmuxCodec {
    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl Decoder for QmuxCodec {
    type Item = Frame;
    type Error = QmiError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>, QmiError> {
        loop {
            let skip = src.iter().position(|&b| b == MARKER).unwrap_or(src.len());
            if skip > 0 {
                trace!(skipped = skip, "resynchronizing to frame marker");
                src.advance(skip);
            }
            if src.len() < 3 {
                return Ok(None);
            }

            let qmux_len = usize::from(u16::from_le_bytes([src[1], src[2]]));
            let total = qmux_len + 1;
            if !(MIN_FRAME_LEN..=MAX_FRAME_LEN).contains(&total) {
                // Not a plausible frame; the marker byte was payload garbage.
                trace!(declared = total, "discarding implausible frame length");
                src.advance(1);
                continue;
            }
            if src.len() < total {
                src.reserve(total - src.len());
                return Ok(None);
            }

            let bytes = src.split_to(total);
            match Frame::parse(&bytes) {
                Ok((frame, _)) => return Ok(Some(frame)),
                Err(err) => {
                    warn!(%err, "dropping malformed frame");
                }
            }
        }
    }
}

impl Encoder<Frame> for QmuxCodec {
    type Error = QmiError;

    fn encode(&mut self, item: Frame, dst: &mut BytesMut) -> Result<(), QmiError> {
        dst.extend_from_slice(&Frame::encode(
            item.service,
            item.client_id,
            item.transaction_id,
            item.message_id,
            &item.tlvs,
        ));
        Ok(())
    }
}
