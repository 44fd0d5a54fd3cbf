//! User Data Header codec (3GPP TS 23.040 Section 9.2.3.24).
//!
//! A UDH is a length-prefixed sequence of Information Elements: one octet
//! giving the total header length (not counting itself), followed by that
//! many octets of `IEI, IE-length, IE-data` triples. `short_message`'s first
//! byte carries this length only when `esm_class`'s UDHI flag is set; this
//! module decodes/encodes the header itself and leaves that flag check to
//! the caller.

use crate::codec::CodecError;
use bytes::{BufMut, Bytes, BytesMut};

/// A decoded concatenated short message reference (IEI 0x00 or 0x08).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConcatRef {
    pub reference: u16,
    pub total_parts: u8,
    pub sequence_number: u8,
    pub wide_reference: bool,
}

/// A single Information Element: either a recognized, structured variant or
/// an opaque `Other` carrying a raw IEI and payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InformationElement {
    ConcatenatedShortMessage(ConcatRef),
    ApplicationPort { dest: u16, source: u16 },
    Other { iei: u8, data: Bytes },
}

impl InformationElement {
    fn iei(&self) -> u8 {
        match self {
            InformationElement::ConcatenatedShortMessage(r) if r.wide_reference => 0x08,
            InformationElement::ConcatenatedShortMessage(_) => 0x00,
            InformationElement::ApplicationPort { dest, source }
                if *dest <= 0xff && *source <= 0xff =>
            {
                0x04
            }
            InformationElement::ApplicationPort { .. } => 0x05,
            InformationElement::Other { iei, .. } => *iei,
        }
    }
}

/// Registry entry for an Information Element Identifier this crate
/// interprets structurally: whether it may appear more than once in a
/// header, and which other identifiers its presence rules out.
struct IeiRule {
    repeatable: bool,
    excludes: &'static [u8],
}

/// The two structured IE families each have two width variants that carry
/// the same information and so exclude one another; neither repeats.
fn iei_rule(iei: u8) -> Option<IeiRule> {
    match iei {
        0x00 => Some(IeiRule { repeatable: false, excludes: &[0x08] }),
        0x08 => Some(IeiRule { repeatable: false, excludes: &[0x00] }),
        0x04 => Some(IeiRule { repeatable: false, excludes: &[0x05] }),
        0x05 => Some(IeiRule { repeatable: false, excludes: &[0x04] }),
        _ => None,
    }
}

/// A fully decoded User Data Header.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct UserDataHeader {
    pub elements: Vec<InformationElement>,
}

fn decode_structured(iei: u8, ie_data: &[u8]) -> Result<Option<InformationElement>, CodecError> {
    let ie_len = ie_data.len();
    match iei {
        0x00 => {
            if ie_len != 3 {
                return Err(CodecError::UdhError(format!(
                    "8-bit concatenated short message IE must be 3 bytes, got {ie_len}"
                )));
            }
            Ok(Some(InformationElement::ConcatenatedShortMessage(ConcatRef {
                reference: ie_data[0] as u16,
                total_parts: ie_data[1],
                sequence_number: ie_data[2],
                wide_reference: false,
            })))
        }
        0x08 => {
            if ie_len != 4 {
                return Err(CodecError::UdhError(format!(
                    "16-bit concatenated short message IE must be 4 bytes, got {ie_len}"
                )));
            }
            Ok(Some(InformationElement::ConcatenatedShortMessage(ConcatRef {
                reference: u16::from_be_bytes([ie_data[0], ie_data[1]]),
                total_parts: ie_data[2],
                sequence_number: ie_data[3],
                wide_reference: true,
            })))
        }
        0x04 => {
            if ie_len != 2 {
                return Err(CodecError::UdhError(format!(
                    "8-bit application port IE must be 2 bytes, got {ie_len}"
                )));
            }
            Ok(Some(InformationElement::ApplicationPort {
                dest: ie_data[0] as u16,
                source: ie_data[1] as u16,
            }))
        }
        0x05 => {
            if ie_len != 4 {
                return Err(CodecError::UdhError(format!(
                    "16-bit application port IE must be 4 bytes, got {ie_len}"
                )));
            }
            Ok(Some(InformationElement::ApplicationPort {
                dest: u16::from_be_bytes([ie_data[0], ie_data[1]]),
                source: u16::from_be_bytes([ie_data[2], ie_data[3]]),
            }))
        }
        other => {
            tracing::debug!(iei = format!("{other:#04x}"), len = ie_len, "dropping unrecognized UDH information element");
            Ok(None)
        }
    }
}

/// Drop every element whose IEI appears in `excludes` from both the
/// repeatable and non-repeatable accumulators.
fn apply_exclusions(
    repeatable: &mut Vec<InformationElement>,
    non_repeatable: &mut Vec<InformationElement>,
    excludes: &[u8],
) {
    repeatable.retain(|e| !excludes.contains(&e.iei()));
    non_repeatable.retain(|e| !excludes.contains(&e.iei()));
}

impl UserDataHeader {
    /// Decode a UDH from the start of `data`. Returns the header and the
    /// remaining bytes (the actual message text, minus the UDH and its
    /// length-prefix octet).
    ///
    /// Decoding is tolerant, per 3GPP TS 23.040: an IEI this crate doesn't
    /// interpret is structurally consumed and dropped; a non-repeatable IEI
    /// seen twice keeps only the last occurrence; an IEI that mutually
    /// excludes another already seen drops the excluded one. Only a
    /// structural mismatch (a declared IE length inconsistent with its
    /// sub-codec, or a UDH length that overruns the buffer) is fatal.
    pub fn decode(data: &[u8]) -> Result<(Self, &[u8]), CodecError> {
        if data.is_empty() {
            return Err(CodecError::UdhError("empty short_message with UDHI set".into()));
        }
        let udhl = data[0] as usize;
        if data.len() < 1 + udhl {
            return Err(CodecError::UdhError(format!(
                "UDH declares length {} but only {} bytes remain",
                udhl,
                data.len() - 1
            )));
        }
        let mut rest = &data[1..1 + udhl];
        let mut repeatable = Vec::new();
        let mut non_repeatable: Vec<InformationElement> = Vec::new();

        while !rest.is_empty() {
            if rest.len() < 2 {
                return Err(CodecError::UdhError(
                    "truncated information element header".into(),
                ));
            }
            let iei_byte = rest[0];
            let ie_len = rest[1] as usize;
            if rest.len() < 2 + ie_len {
                return Err(CodecError::UdhError(format!(
                    "information element {iei_byte:#04x} declares length {ie_len} but only {} bytes remain",
                    rest.len() - 2
                )));
            }
            let ie_data = &rest[2..2 + ie_len];
            rest = &rest[2 + ie_len..];

            let Some(element) = decode_structured(iei_byte, ie_data)? else {
                continue;
            };

            match iei_rule(iei_byte) {
                Some(rule) => {
                    if !rule.excludes.is_empty() {
                        apply_exclusions(&mut repeatable, &mut non_repeatable, rule.excludes);
                    }
                    if rule.repeatable {
                        repeatable.push(element);
                    } else {
                        non_repeatable.retain(|e| e.iei() != iei_byte);
                        non_repeatable.push(element);
                    }
                }
                None => repeatable.push(element),
            }
        }

        repeatable.extend(non_repeatable);
        Ok((UserDataHeader { elements: repeatable }, &data[1 + udhl..]))
    }

    /// Encode this header, including its own leading length octet.
    ///
    /// Unlike decode, encode is strict: a non-repeatable IEI appearing
    /// twice, or two mutually-exclusive IEIs together, is an error rather
    /// than silently resolved.
    pub fn encode(&self) -> Result<Bytes, CodecError> {
        let mut seen: Vec<u8> = Vec::new();
        for element in &self.elements {
            let iei = element.iei();
            if let Some(rule) = iei_rule(iei) {
                if !rule.repeatable && seen.contains(&iei) {
                    return Err(CodecError::UdhError(format!(
                        "information element {iei:#04x} is non-repeatable but appears twice"
                    )));
                }
                for &excluded in rule.excludes {
                    if seen.contains(&excluded) {
                        return Err(CodecError::UdhError(format!(
                            "information elements {iei:#04x} and {excluded:#04x} are mutually exclusive"
                        )));
                    }
                }
            }
            seen.push(iei);
        }

        let mut body = BytesMut::new();
        for element in &self.elements {
            match element {
                InformationElement::ConcatenatedShortMessage(r) if !r.wide_reference => {
                    body.put_u8(0x00);
                    body.put_u8(3);
                    body.put_u8(r.reference as u8);
                    body.put_u8(r.total_parts);
                    body.put_u8(r.sequence_number);
                }
                InformationElement::ConcatenatedShortMessage(r) => {
                    body.put_u8(0x08);
                    body.put_u8(4);
                    body.put_u16(r.reference);
                    body.put_u8(r.total_parts);
                    body.put_u8(r.sequence_number);
                }
                InformationElement::ApplicationPort { dest, source }
                    if *dest <= 0xff && *source <= 0xff =>
                {
                    body.put_u8(0x04);
                    body.put_u8(2);
                    body.put_u8(*dest as u8);
                    body.put_u8(*source as u8);
                }
                InformationElement::ApplicationPort { dest, source } => {
                    body.put_u8(0x05);
                    body.put_u8(4);
                    body.put_u16(*dest);
                    body.put_u16(*source);
                }
                InformationElement::Other { iei, data } => {
                    if data.len() > 255 {
                        return Err(CodecError::UdhError(format!(
                            "information element {iei:#04x} data too long: {} bytes",
                            data.len()
                        )));
                    }
                    body.put_u8(*iei);
                    body.put_u8(data.len() as u8);
                    body.put_slice(data);
                }
            }
        }
        if body.len() > 255 {
            return Err(CodecError::UdhError(format!(
                "encoded UDH body too long: {} bytes",
                body.len()
            )));
        }
        let mut out = BytesMut::with_capacity(1 + body.len());
        out.put_u8(body.len() as u8);
        out.extend_from_slice(&body);
        Ok(out.freeze())
    }

    pub fn concat_ref(&self) -> Option<ConcatRef> {
        self.elements.iter().find_map(|e| match e {
            InformationElement::ConcatenatedShortMessage(r) => Some(*r),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_8bit_concatenation_reference() {
        // UDHL=5, IEI=0x00, IEL=3, ref=7, total=3, seq=1, then message text
        let data: &[u8] = &[0x05, 0x00, 0x03, 0x07, 0x03, 0x01, b'h', b'i'];
        let (udh, rest) = UserDataHeader::decode(data).unwrap();
        let concat = udh.concat_ref().unwrap();
        assert_eq!(concat.reference, 7);
        assert_eq!(concat.total_parts, 3);
        assert_eq!(concat.sequence_number, 1);
        assert!(!concat.wide_reference);
        assert_eq!(rest, b"hi");
    }

    #[test]
    fn decodes_16bit_concatenation_reference() {
        let data: &[u8] = &[0x06, 0x08, 0x04, 0x01, 0x2c, 0x05, 0x02, b'x'];
        let (udh, rest) = UserDataHeader::decode(data).unwrap();
        let concat = udh.concat_ref().unwrap();
        assert_eq!(concat.reference, 0x012c);
        assert!(concat.wide_reference);
        assert_eq!(rest, b"x");
    }

    #[test]
    fn roundtrips_through_encode() {
        let udh = UserDataHeader {
            elements: vec![InformationElement::ConcatenatedShortMessage(ConcatRef {
                reference: 42,
                total_parts: 2,
                sequence_number: 1,
                wide_reference: false,
            })],
        };
        let encoded = udh.encode().unwrap();
        let (decoded, rest) = UserDataHeader::decode(&encoded).unwrap();
        assert_eq!(decoded, udh);
        assert!(rest.is_empty());
    }

    #[test]
    fn drops_unknown_information_elements() {
        let data: &[u8] = &[0x03, 0x70, 0x01, 0xAB];
        let (udh, rest) = UserDataHeader::decode(data).unwrap();
        assert!(udh.elements.is_empty());
        assert!(rest.is_empty());
    }

    #[test]
    fn mixed_width_concatenation_last_wins_on_decode() {
        // 8-bit concat ref=1/2/1, then 16-bit concat ref=0x0003/4/2: the
        // earlier 8-bit IE is excluded by the later 16-bit one.
        let data: &[u8] = &[
            0x0a, 0x00, 0x03, 0x01, 0x02, 0x01, 0x08, 0x04, 0x00, 0x03, 0x04, 0x02,
        ];
        let (udh, rest) = UserDataHeader::decode(data).unwrap();
        assert_eq!(udh.elements.len(), 1);
        let concat = udh.concat_ref().unwrap();
        assert!(concat.wide_reference);
        assert_eq!(concat.reference, 0x0003);
        assert!(rest.is_empty());
    }

    #[test]
    fn encode_rejects_mutually_exclusive_elements() {
        let udh = UserDataHeader {
            elements: vec![
                InformationElement::ConcatenatedShortMessage(ConcatRef {
                    reference: 1,
                    total_parts: 2,
                    sequence_number: 1,
                    wide_reference: false,
                }),
                InformationElement::ConcatenatedShortMessage(ConcatRef {
                    reference: 1,
                    total_parts: 2,
                    sequence_number: 1,
                    wide_reference: true,
                }),
            ],
        };
        assert!(udh.encode().is_err());
    }

    #[test]
    fn rejects_truncated_header() {
        let data: &[u8] = &[0x05, 0x00, 0x03, 0x07];
        assert!(UserDataHeader::decode(data).is_err());
    }

    #[test]
    fn empty_udh_is_valid() {
        let data: &[u8] = &[0x00, b'h', b'i'];
        let (udh, rest) = UserDataHeader::decode(data).unwrap();
        assert!(udh.elements.is_empty());
        assert_eq!(rest, b"hi");
    }
}
