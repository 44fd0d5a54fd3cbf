// Small composable field codecs used to build every mandatory and optional
// PDU parameter. Each function takes whatever context it needs (a max
// length, a valid range) as an explicit argument rather than storing it on
// a codec instance, so the same function works for every field that shares
// its shape no matter which command it appears in.

use crate::codec::CodecError;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// Decode a `COctetString`: a variable-length, NUL-terminated ASCII field
/// whose total size including the terminator must not exceed `max_len`.
/// Unlike a fixed-width field, no padding follows the terminator.
pub fn decode_cstring(
    buf: &mut Cursor<&[u8]>,
    max_len: usize,
    field: &'static str,
) -> Result<String, CodecError> {
    let mut bytes = Vec::new();
    loop {
        if !buf.has_remaining() {
            return Err(CodecError::Incomplete);
        }
        let b = buf.get_u8();
        if b == 0 {
            break;
        }
        bytes.push(b);
        if bytes.len() > max_len.saturating_sub(1) {
            return Err(CodecError::FieldTooLong {
                field,
                max: max_len - 1,
                actual: bytes.len(),
            });
        }
    }
    String::from_utf8(bytes).map_err(|source| CodecError::Utf8Error { field, source })
}

/// Encode a `COctetString`, rejecting content that would not fit within
/// `max_len` once the NUL terminator is added.
pub fn encode_cstring(
    buf: &mut BytesMut,
    value: &str,
    max_len: usize,
    field: &'static str,
) -> Result<(), CodecError> {
    if value.len() > max_len - 1 {
        return Err(CodecError::FieldTooLong {
            field,
            max: max_len - 1,
            actual: value.len(),
        });
    }
    buf.put_slice(value.as_bytes());
    buf.put_u8(0);
    Ok(())
}

/// Decode a raw `OctetString` of an exactly-known length (no terminator,
/// no padding). Used for message_payload-style TLV values and for the
/// length-prefixed short_message body.
pub fn decode_octets(buf: &mut Cursor<&[u8]>, len: usize) -> Result<Bytes, CodecError> {
    if buf.remaining() < len {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.copy_to_bytes(len))
}

/// Validate an unsigned integer field against an inclusive range. `0` is
/// always accepted as the field's "unset"/null representation regardless
/// of `min`, matching the nullable-integer contract used throughout the
/// mandatory parameter table (e.g. `sm_default_msg_id`).
pub fn bounded(value: u32, min: u32, max: u32, field: &'static str) -> Result<u32, CodecError> {
    if value == 0 || (value >= min && value <= max) {
        Ok(value)
    } else {
        Err(CodecError::FieldValidation {
            field,
            reason: format!("value {value} out of range {min}-{max}"),
        })
    }
}

/// Map a wire integer through a lookup table, falling back to a
/// caller-supplied "unknown" constructor rather than failing outright.
/// This is how the bit-packed and enum-wrapping codecs stay tolerant of
/// values a peer may send that aren't in this crate's lookup table.
pub fn mapped<T: Copy>(
    raw: u8,
    table: &[(u8, T)],
    on_unknown: impl FnOnce(u8) -> T,
) -> T {
    table
        .iter()
        .find(|(byte, _)| *byte == raw)
        .map(|(_, value)| *value)
        .unwrap_or_else(|| on_unknown(raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cstring_roundtrip() {
        let mut buf = BytesMut::new();
        encode_cstring(&mut buf, "hello", 16, "system_id").unwrap();
        assert_eq!(buf.as_ref(), b"hello\0");

        let mut cursor = Cursor::new(buf.as_ref());
        let decoded = decode_cstring(&mut cursor, 16, "system_id").unwrap();
        assert_eq!(decoded, "hello");
    }

    #[test]
    fn cstring_empty_is_just_terminator() {
        let mut buf = BytesMut::new();
        encode_cstring(&mut buf, "", 16, "system_id").unwrap();
        assert_eq!(buf.as_ref(), b"\0");
    }

    #[test]
    fn cstring_too_long_rejected_on_encode() {
        let mut buf = BytesMut::new();
        let result = encode_cstring(&mut buf, "0123456789ABCDEF", 16, "system_id");
        assert!(matches!(result, Err(CodecError::FieldTooLong { .. })));
    }

    #[test]
    fn cstring_missing_terminator_is_incomplete() {
        let data = b"hello";
        let mut cursor = Cursor::new(&data[..]);
        let result = decode_cstring(&mut cursor, 16, "system_id");
        assert!(matches!(result, Err(CodecError::Incomplete)));
    }

    #[test]
    fn cstring_rejects_oversized_unterminated_run() {
        let data = b"0123456789ABCDEF\0"; // 16 content bytes, max_len=16 leaves 15 usable
        let mut cursor = Cursor::new(&data[..]);
        let result = decode_cstring(&mut cursor, 16, "system_id");
        assert!(matches!(result, Err(CodecError::FieldTooLong { .. })));
    }

    #[test]
    fn bounded_accepts_null_regardless_of_min() {
        assert_eq!(bounded(0, 1, 254, "sm_default_msg_id").unwrap(), 0);
        assert_eq!(bounded(200, 1, 254, "sm_default_msg_id").unwrap(), 200);
        assert!(bounded(255, 1, 254, "sm_default_msg_id").is_err());
    }

    #[test]
    fn mapped_falls_back_on_unknown() {
        let table = [(0u8, "a"), (1u8, "b")];
        assert_eq!(mapped(1, &table, |_| "?"), "b");
        assert_eq!(mapped(9, &table, |_| "?"), "?");
    }
}
