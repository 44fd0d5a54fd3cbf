// Optional parameter (TLV) codec.
//
// A TLV is tag(u16) + length(u16) + value(length bytes). Decoding a TLV's
// value is a two-step process kept deliberately separate from reading the
// raw tag/length/value triple: `Tlv::decode` only ever reads bytes off the
// wire, and the length it read is threaded into the value decode as an
// explicit argument. Nothing about a TLV's length is ever stashed as
// mutable state on a codec instance.
//
// Tag rejection has three tiers, matching the reference PDU codec:
//   1. the 16-bit tag number isn't recognized at all -> `UnknownTlvTag`
//   2. the tag is recognized but this codec doesn't dispatch it -> `UndispatchedTlvTag`
//   3. the tag is dispatched but not in the current command's allow-list -> `TlvNotAllowedForCommand`

use crate::codec::CodecError;
use crate::datatypes::{CallbackNum, Subaddress};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;

/// Named SMPP v3.4 TLV tag numbers (Section 5.3.2). Every tag SMPP v3.4
/// defines is listed here even if [`dispatch`] doesn't decode its value,
/// so that tag-number recognition (tier 1) and dispatch support (tier 2)
/// stay distinguishable.
pub mod tags {
    pub const DEST_ADDR_SUBUNIT: u16 = 0x0005;
    pub const DEST_NETWORK_TYPE: u16 = 0x0006;
    pub const DEST_BEARER_TYPE: u16 = 0x0007;
    pub const DEST_TELEMATICS_ID: u16 = 0x0008;
    pub const SOURCE_ADDR_SUBUNIT: u16 = 0x000D;
    pub const SOURCE_NETWORK_TYPE: u16 = 0x000E;
    pub const SOURCE_BEARER_TYPE: u16 = 0x000F;
    pub const SOURCE_TELEMATICS_ID: u16 = 0x0010;
    pub const QOS_TIME_TO_LIVE: u16 = 0x0017;
    pub const PAYLOAD_TYPE: u16 = 0x0019;
    pub const ADDITIONAL_STATUS_INFO_TEXT: u16 = 0x001D;
    pub const RECEIPTED_MESSAGE_ID: u16 = 0x001E;
    pub const MS_MSG_WAIT_FACILITIES: u16 = 0x0030;
    pub const PRIVACY_INDICATOR: u16 = 0x0201;
    pub const SOURCE_SUBADDRESS: u16 = 0x0202;
    pub const DEST_SUBADDRESS: u16 = 0x0203;
    pub const USER_MESSAGE_REFERENCE: u16 = 0x0204;
    pub const USER_RESPONSE_CODE: u16 = 0x0205;
    pub const SOURCE_PORT: u16 = 0x020A;
    pub const DESTINATION_PORT: u16 = 0x020B;
    pub const SAR_MSG_REF_NUM: u16 = 0x020C;
    pub const LANGUAGE_INDICATOR: u16 = 0x020D;
    pub const SAR_TOTAL_SEGMENTS: u16 = 0x020E;
    pub const SAR_SEGMENT_SEQNUM: u16 = 0x020F;
    pub const SC_INTERFACE_VERSION: u16 = 0x0210;
    pub const CALLBACK_NUM_PRES_IND: u16 = 0x0302;
    pub const CALLBACK_NUM_ATAG: u16 = 0x0303;
    pub const NUMBER_OF_MESSAGES: u16 = 0x0304;
    pub const CALLBACK_NUM: u16 = 0x0381;
    pub const DPF_RESULT: u16 = 0x0420;
    pub const SET_DPF: u16 = 0x0421;
    pub const MS_AVAILABILITY_STATUS: u16 = 0x0422;
    pub const NETWORK_ERROR_CODE: u16 = 0x0423;
    pub const MESSAGE_PAYLOAD: u16 = 0x0424;
    pub const DELIVERY_FAILURE_REASON: u16 = 0x0425;
    pub const MORE_MESSAGES_TO_SEND: u16 = 0x0426;
    pub const MESSAGE_STATE: u16 = 0x0427;
    pub const USSD_SERVICE_OP: u16 = 0x0501;
    pub const DISPLAY_TIME: u16 = 0x1201;
    pub const SMS_SIGNAL: u16 = 0x1203;
    pub const MS_VALIDITY: u16 = 0x1204;
    pub const ALERT_ON_MESSAGE_DELIVERY: u16 = 0x130C;
    pub const ITS_REPLY_TYPE: u16 = 0x1380;
    pub const ITS_SESSION_INFO: u16 = 0x1383;

    /// Every tag number this crate recognizes, dispatched or not.
    pub const ALL: &[u16] = &[
        DEST_ADDR_SUBUNIT,
        DEST_NETWORK_TYPE,
        DEST_BEARER_TYPE,
        DEST_TELEMATICS_ID,
        SOURCE_ADDR_SUBUNIT,
        SOURCE_NETWORK_TYPE,
        SOURCE_BEARER_TYPE,
        SOURCE_TELEMATICS_ID,
        QOS_TIME_TO_LIVE,
        PAYLOAD_TYPE,
        ADDITIONAL_STATUS_INFO_TEXT,
        RECEIPTED_MESSAGE_ID,
        MS_MSG_WAIT_FACILITIES,
        PRIVACY_INDICATOR,
        SOURCE_SUBADDRESS,
        DEST_SUBADDRESS,
        USER_MESSAGE_REFERENCE,
        USER_RESPONSE_CODE,
        SOURCE_PORT,
        DESTINATION_PORT,
        SAR_MSG_REF_NUM,
        LANGUAGE_INDICATOR,
        SAR_TOTAL_SEGMENTS,
        SAR_SEGMENT_SEQNUM,
        SC_INTERFACE_VERSION,
        CALLBACK_NUM_PRES_IND,
        CALLBACK_NUM_ATAG,
        NUMBER_OF_MESSAGES,
        CALLBACK_NUM,
        DPF_RESULT,
        SET_DPF,
        MS_AVAILABILITY_STATUS,
        NETWORK_ERROR_CODE,
        MESSAGE_PAYLOAD,
        DELIVERY_FAILURE_REASON,
        MORE_MESSAGES_TO_SEND,
        MESSAGE_STATE,
        USSD_SERVICE_OP,
        DISPLAY_TIME,
        SMS_SIGNAL,
        MS_VALIDITY,
        ALERT_ON_MESSAGE_DELIVERY,
        ITS_REPLY_TYPE,
        ITS_SESSION_INFO,
    ];
}

/// A raw, undecoded TLV as it appears on the wire.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tlv {
    pub tag: u16,
    pub value: Bytes,
}

impl Tlv {
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < 4 {
            return Err(CodecError::Incomplete);
        }
        let tag = buf.get_u16();
        let length = buf.get_u16() as usize;
        if buf.remaining() < length {
            return Err(CodecError::Incomplete);
        }
        let value = buf.copy_to_bytes(length);
        Ok(Tlv { tag, value })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u16(self.tag);
        buf.put_u16(self.value.len() as u16);
        buf.put_slice(&self.value);
    }

    pub fn encoded_size(&self) -> usize {
        4 + self.value.len()
    }
}

/// A decoded optional parameter value. The shape is determined entirely by
/// the tag; see [`dispatch`].
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    U8(u8),
    U16(u16),
    U32(u32),
    CString(String),
    Bytes(Bytes),
    CallbackNum(CallbackNum),
    Subaddress(Subaddress),
    /// Zero-length value. Used for `alert_on_message_delivery`, whose
    /// presence (not content) is the signal.
    Empty,
}

/// Decode `raw`'s value according to its tag. Returns:
/// - `Ok(Some(value))` if the tag is dispatched by this codec
/// - `Err(UnknownTlvTag)` if the tag number isn't in [`tags::ALL`]
/// - `Err(UndispatchedTlvTag)` if the tag is known but has no decoder below
///   (this mirrors the set of TLVs the reference PDU codec leaves
///   unimplemented: ms_msg_wait_facilities, ms_validity, dpf_result,
///   set_dpf, network_error_code, callback_num_pres_ind, callback_num_atag,
///   its_reply_type, its_session_info, ussd_service_op)
pub fn dispatch(raw: &Tlv) -> Result<OptionValue, CodecError> {
    use tags::*;

    let name = |tag| tag_name(tag).unwrap_or("unknown");

    if !tags::ALL.contains(&raw.tag) {
        return Err(CodecError::UnknownTlvTag(raw.tag));
    }

    let decode_u8 = || {
        if raw.value.len() != 1 {
            return Err(CodecError::TlvLengthMismatch {
                tag: raw.tag,
                declared: raw.value.len(),
                actual: 1,
            });
        }
        Ok(OptionValue::U8(raw.value[0]))
    };
    let decode_u16 = || {
        if raw.value.len() != 2 {
            return Err(CodecError::TlvLengthMismatch {
                tag: raw.tag,
                declared: raw.value.len(),
                actual: 2,
            });
        }
        Ok(OptionValue::U16(u16::from_be_bytes([
            raw.value[0],
            raw.value[1],
        ])))
    };
    let decode_u32 = || {
        if raw.value.len() != 4 {
            return Err(CodecError::TlvLengthMismatch {
                tag: raw.tag,
                declared: raw.value.len(),
                actual: 4,
            });
        }
        Ok(OptionValue::U32(u32::from_be_bytes([
            raw.value[0],
            raw.value[1],
            raw.value[2],
            raw.value[3],
        ])))
    };
    let decode_cstring = || {
        if raw.value.last() != Some(&0) {
            return Err(CodecError::InvalidTlvValue {
                tag: raw.tag,
                reason: "missing null terminator".to_string(),
            });
        }
        let bytes = &raw.value[..raw.value.len() - 1];
        String::from_utf8(bytes.to_vec())
            .map(OptionValue::CString)
            .map_err(|_| CodecError::InvalidTlvValue {
                tag: raw.tag,
                reason: "not valid UTF-8".to_string(),
            })
    };
    let decode_number_of_messages = || {
        let value = decode_u8()?;
        let OptionValue::U8(n) = value else { unreachable!() };
        if !(1..=99).contains(&n) {
            return Err(CodecError::InvalidTlvValue {
                tag: raw.tag,
                reason: format!("number_of_messages must be 1-99, got {n}"),
            });
        }
        Ok(value)
    };
    let decode_empty = || {
        if !raw.value.is_empty() {
            return Err(CodecError::TlvLengthMismatch {
                tag: raw.tag,
                declared: raw.value.len(),
                actual: 0,
            });
        }
        Ok(OptionValue::Empty)
    };

    match raw.tag {
        DEST_ADDR_SUBUNIT | DEST_NETWORK_TYPE | DEST_BEARER_TYPE | SOURCE_ADDR_SUBUNIT
        | SOURCE_NETWORK_TYPE | SOURCE_BEARER_TYPE | PAYLOAD_TYPE | PRIVACY_INDICATOR
        | USER_RESPONSE_CODE | LANGUAGE_INDICATOR | SAR_TOTAL_SEGMENTS | SAR_SEGMENT_SEQNUM
        | SC_INTERFACE_VERSION | MS_AVAILABILITY_STATUS | DELIVERY_FAILURE_REASON
        | MORE_MESSAGES_TO_SEND | MESSAGE_STATE | DISPLAY_TIME => decode_u8(),

        ALERT_ON_MESSAGE_DELIVERY => decode_empty(),

        NUMBER_OF_MESSAGES => decode_number_of_messages(),

        DEST_TELEMATICS_ID | SOURCE_TELEMATICS_ID | USER_MESSAGE_REFERENCE | SOURCE_PORT
        | DESTINATION_PORT | SAR_MSG_REF_NUM | SMS_SIGNAL => decode_u16(),

        QOS_TIME_TO_LIVE => decode_u32(),

        ADDITIONAL_STATUS_INFO_TEXT | RECEIPTED_MESSAGE_ID => decode_cstring(),

        MESSAGE_PAYLOAD => Ok(OptionValue::Bytes(raw.value.clone())),

        CALLBACK_NUM => CallbackNum::decode(&raw.value)
            .map(OptionValue::CallbackNum)
            .map_err(|reason| CodecError::InvalidTlvValue {
                tag: raw.tag,
                reason: reason.to_string(),
            }),

        SOURCE_SUBADDRESS | DEST_SUBADDRESS => Subaddress::decode(&raw.value)
            .map(OptionValue::Subaddress)
            .map_err(|reason| CodecError::InvalidTlvValue {
                tag: raw.tag,
                reason: reason.to_string(),
            }),

        MS_MSG_WAIT_FACILITIES | MS_VALIDITY | DPF_RESULT | SET_DPF | NETWORK_ERROR_CODE
        | CALLBACK_NUM_PRES_IND | CALLBACK_NUM_ATAG | ITS_REPLY_TYPE | ITS_SESSION_INFO
        | USSD_SERVICE_OP => Err(CodecError::UndispatchedTlvTag {
            tag: raw.tag,
            name: name(raw.tag),
        }),

        _ => unreachable!("tag {:#06x} is in tags::ALL but not matched above", raw.tag),
    }
}

/// Encode a decoded [`OptionValue`] back into a raw TLV under `tag`.
pub fn encode(tag: u16, value: &OptionValue) -> Tlv {
    let bytes: Vec<u8> = match value {
        OptionValue::U8(v) => vec![*v],
        OptionValue::U16(v) => v.to_be_bytes().to_vec(),
        OptionValue::U32(v) => v.to_be_bytes().to_vec(),
        OptionValue::CString(s) => {
            let mut b = s.as_bytes().to_vec();
            b.push(0);
            b
        }
        OptionValue::Bytes(b) => b.to_vec(),
        OptionValue::CallbackNum(cn) => cn.encode(),
        OptionValue::Subaddress(sub) => sub.encode(),
        OptionValue::Empty => Vec::new(),
    };
    Tlv {
        tag,
        value: Bytes::from(bytes),
    }
}

pub fn tag_name(tag: u16) -> Option<&'static str> {
    use tags::*;
    Some(match tag {
        DEST_ADDR_SUBUNIT => "dest_addr_subunit",
        DEST_NETWORK_TYPE => "dest_network_type",
        DEST_BEARER_TYPE => "dest_bearer_type",
        DEST_TELEMATICS_ID => "dest_telematics_id",
        SOURCE_ADDR_SUBUNIT => "source_addr_subunit",
        SOURCE_NETWORK_TYPE => "source_network_type",
        SOURCE_BEARER_TYPE => "source_bearer_type",
        SOURCE_TELEMATICS_ID => "source_telematics_id",
        QOS_TIME_TO_LIVE => "qos_time_to_live",
        PAYLOAD_TYPE => "payload_type",
        ADDITIONAL_STATUS_INFO_TEXT => "additional_status_info_text",
        RECEIPTED_MESSAGE_ID => "receipted_message_id",
        MS_MSG_WAIT_FACILITIES => "ms_msg_wait_facilities",
        PRIVACY_INDICATOR => "privacy_indicator",
        SOURCE_SUBADDRESS => "source_subaddress",
        DEST_SUBADDRESS => "dest_subaddress",
        USER_MESSAGE_REFERENCE => "user_message_reference",
        USER_RESPONSE_CODE => "user_response_code",
        SOURCE_PORT => "source_port",
        DESTINATION_PORT => "destination_port",
        SAR_MSG_REF_NUM => "sar_msg_ref_num",
        LANGUAGE_INDICATOR => "language_indicator",
        SAR_TOTAL_SEGMENTS => "sar_total_segments",
        SAR_SEGMENT_SEQNUM => "sar_segment_seqnum",
        SC_INTERFACE_VERSION => "sc_interface_version",
        CALLBACK_NUM_PRES_IND => "callback_num_pres_ind",
        CALLBACK_NUM_ATAG => "callback_num_atag",
        NUMBER_OF_MESSAGES => "number_of_messages",
        CALLBACK_NUM => "callback_num",
        DPF_RESULT => "dpf_result",
        SET_DPF => "set_dpf",
        MS_AVAILABILITY_STATUS => "ms_availability_status",
        NETWORK_ERROR_CODE => "network_error_code",
        MESSAGE_PAYLOAD => "message_payload",
        DELIVERY_FAILURE_REASON => "delivery_failure_reason",
        MORE_MESSAGES_TO_SEND => "more_messages_to_send",
        MESSAGE_STATE => "message_state",
        USSD_SERVICE_OP => "ussd_service_op",
        DISPLAY_TIME => "display_time",
        SMS_SIGNAL => "sms_signal",
        MS_VALIDITY => "ms_validity",
        ALERT_ON_MESSAGE_DELIVERY => "alert_on_message_delivery",
        ITS_REPLY_TYPE => "its_reply_type",
        ITS_SESSION_INFO => "its_session_info",
        _ => return None,
    })
}
