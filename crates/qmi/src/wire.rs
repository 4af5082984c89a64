//! Bounds-checked little-endian cursor primitives for TLV payloads.
//!
//! Generated codecs read through a `&mut &[u8]` cursor; every read narrows
//! the slice. Underflow is a decode error, never a panic.

use crate::error::QmiError;

fn take<'a>(buf: &mut &'a [u8], n: usize) -> Result<&'a [u8], QmiError> {
    if buf.len() < n {
        return Err(QmiError::TruncatedTlv);
    }
    let (head, rest) = buf.split_at(n);
    *buf = rest;
    Ok(head)
}

/// Reads `N` raw bytes.
pub(crate) fn read_array<const N: usize>(buf: &mut &[u8]) -> Result<[u8; N], QmiError> {
    let head = take(buf, N)?;
    let mut out = [0u8; N];
    out.copy_from_slice(head);
    Ok(out)
}

pub(crate) fn read_u8(buf: &mut &[u8]) -> Result<u8, QmiError> {
    Ok(read_array::<1>(buf)?[0])
}

pub(crate) fn read_i8(buf: &mut &[u8]) -> Result<i8, QmiError> {
    Ok(i8::from_le_bytes(read_array(buf)?))
}

pub(crate) fn read_u16(buf: &mut &[u8]) -> Result<u16, QmiError> {
    Ok(u16::from_le_bytes(read_array(buf)?))
}

pub(crate) fn read_i16(buf: &mut &[u8]) -> Result<i16, QmiError> {
    Ok(i16::from_le_bytes(read_array(buf)?))
}

pub(crate) fn read_u32(buf: &mut &[u8]) -> Result<u32, QmiError> {
    Ok(u32::from_le_bytes(read_array(buf)?))
}

pub(crate) fn read_i32(buf: &mut &[u8]) -> Result<i32, QmiError> {
    Ok(i32::from_le_bytes(read_array(buf)?))
}

pub(crate) fn read_u64(buf: &mut &[u8]) -> Result<u64, QmiError> {
    Ok(u64::from_le_bytes(read_array(buf)?))
}

pub(crate) fn read_i64(buf: &mut &[u8]) -> Result<i64, QmiError> {
    Ok(i64::from_le_bytes(read_array(buf)?))
}

/// Consumes the remainder of the cursor as text.
///
/// The length of a QMI string is bounded by the enclosing TLV, not by an
/// inline prefix, so the string always runs to the end of the payload.
pub(crate) fn read_string(buf: &mut &[u8]) -> String {
    let rest = std::mem::take(buf);
    String::from_utf8_lossy(rest).into_owned()
}

/// Measures a scratch TLV payload for the 16-bit length field.
pub(crate) fn tlv_len(buf: &[u8]) -> Result<u16, QmiError> {
    u16::try_from(buf.len()).map_err(|_| QmiError::TlvTooLong(buf.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_narrow_the_cursor() {
        let payload = [0x01, 0x02, 0x03, 0x04, 0x05];
        let mut cur = &payload[..];
        assert_eq!(read_u8(&mut cur).unwrap(), 0x01);
        assert_eq!(read_u16(&mut cur).unwrap(), 0x0302);
        assert_eq!(cur, &[0x04, 0x05]);
        assert_eq!(read_array::<2>(&mut cur).unwrap(), [0x04, 0x05]);
        assert!(cur.is_empty());
    }

    #[test]
    fn underflow_is_an_error() {
        let mut cur = &[0x01u8][..];
        assert!(matches!(read_u16(&mut cur), Err(QmiError::TruncatedTlv)));
        // A failed read leaves the cursor untouched.
        assert_eq!(cur, &[0x01]);
    }

    #[test]
    fn string_consumes_the_remainder() {
        let mut cur = &b"Telit"[..];
        assert_eq!(read_string(&mut cur), "Telit");
        assert!(cur.is_empty());

        let mut invalid = &[0x66, 0xFF, 0x6F][..];
        assert_eq!(read_string(&mut invalid), "f\u{fffd}o");
    }

    #[test]
    fn tlv_len_rejects_oversized_payloads() {
        assert_eq!(tlv_len(&[0u8; 4]).unwrap(), 4);
        let big = vec![0u8; usize::from(u16::MAX) + 1];
        assert!(matches!(tlv_len(&big), Err(QmiError::TlvTooLong(_))));
    }
}
