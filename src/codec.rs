// SMPP v3.4 wire codec - header framing, the Encodable contract, and the
// error type shared by every component in this crate.

use crate::datatypes::{CommandId, CommandStatus};
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::io::Cursor;
use thiserror::Error;

/// Maximum allowed PDU size. Bounds both decode (a hostile `command_length`
/// cannot force an unbounded allocation) and encode (a caller-constructed PDU
/// with an oversized short_message/message_payload is rejected before it hits
/// the wire).
pub const MAX_PDU_SIZE: u32 = 1024 * 1024;

/// SMPP v3.4 PDU Header (16 bytes, common to all PDUs).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PduHeader {
    pub command_length: u32,
    pub command_id: CommandId,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
}

impl PduHeader {
    pub const SIZE: usize = 16;

    /// Decode and validate a PDU header. Does not consume the body.
    pub fn decode(buf: &mut Cursor<&[u8]>) -> Result<Self, CodecError> {
        if buf.remaining() < Self::SIZE {
            return Err(CodecError::Incomplete);
        }

        let command_length = buf.get_u32();
        let command_id_raw = buf.get_u32();
        let command_status_raw = buf.get_u32();
        let sequence_number = buf.get_u32();

        if command_length < Self::SIZE as u32 {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: Self::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }
        if command_length > MAX_PDU_SIZE {
            return Err(CodecError::InvalidPduLength {
                length: command_length,
                min: Self::SIZE as u32,
                max: MAX_PDU_SIZE,
            });
        }

        let command_id = CommandId::try_from(command_id_raw)
            .map_err(|_| CodecError::InvalidCommandId(command_id_raw))?;
        let command_status = CommandStatus::try_from(command_status_raw)
            .map_err(|_| CodecError::InvalidCommandStatus(command_status_raw))?;

        if !command_id.is_response() && command_status != CommandStatus::Ok {
            return Err(CodecError::InvalidRequestStatus {
                command_id,
                command_status,
            });
        }

        // Per the reference PDU codec, sequence_number must be >= 1. Unlike
        // some SMPP stacks, 0xFFFFFFFF is not additionally reserved.
        if sequence_number == 0 {
            return Err(CodecError::ReservedSequenceNumber(sequence_number));
        }

        Ok(PduHeader {
            command_length,
            command_id,
            command_status,
            sequence_number,
        })
    }

    pub fn encode(&self, buf: &mut BytesMut) {
        buf.put_u32(self.command_length);
        buf.put_u32(self.command_id as u32);
        buf.put_u32(self.command_status as u32);
        buf.put_u32(self.sequence_number);
    }
}

/// Types that can serialize themselves to the wire. Implemented directly by
/// [`crate::pdu::Pdu`] and by the standalone field codecs that make up a PDU
/// body.
pub trait Encodable {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError>;

    fn encoded_size(&self) -> usize {
        let mut buf = BytesMut::new();
        self.encode(&mut buf).map(|_| buf.len()).unwrap_or(0)
    }

    /// Encode to a frozen, length-corrected byte string. For PDU-shaped
    /// values whose first four bytes are `command_length`, that field is
    /// patched to the true encoded length after encoding.
    fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)
            .expect("encoding a validated in-memory value should not fail");
        if buf.len() >= PduHeader::SIZE {
            let length = buf.len() as u32;
            buf[0..4].copy_from_slice(&length.to_be_bytes());
        }
        buf.freeze()
    }
}

/// Errors produced anywhere in the codec: header framing, primitive field
/// decode, TLV dispatch, or UDH parsing. Every variant maps to an `ESME_*`
/// status via [`CodecError::to_command_status`].
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("incomplete PDU: need more data")]
    Incomplete,

    #[error("invalid command_id: {0:#x}")]
    InvalidCommandId(u32),

    #[error("invalid command_status: {0:#x}")]
    InvalidCommandStatus(u32),

    #[error("invalid PDU length: {length}, must be {min}-{max}")]
    InvalidPduLength { length: u32, min: u32, max: u32 },

    #[error("request PDU {command_id:?} has non-zero status: {command_status:?}")]
    InvalidRequestStatus {
        command_id: CommandId,
        command_status: CommandStatus,
    },

    #[error("reserved sequence number: {0}")]
    ReservedSequenceNumber(u32),

    #[error("unexpected command_id: expected {expected:?}, got {actual:?}")]
    UnexpectedCommandId {
        expected: CommandId,
        actual: CommandId,
    },

    #[error("field '{field}' validation failed: {reason}")]
    FieldValidation { field: &'static str, reason: String },

    #[error("field '{field}' exceeds maximum length: {actual} > {max}")]
    FieldTooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("UTF-8 decoding error in field '{field}': {source}")]
    Utf8Error {
        field: &'static str,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("unknown TLV tag number: {0:#06x}")]
    UnknownTlvTag(u16),

    #[error("TLV tag {tag:#06x} ({name}) is not dispatched by this codec")]
    UndispatchedTlvTag { tag: u16, name: &'static str },

    #[error("TLV tag {tag:#06x} ({name}) is not permitted on this command")]
    TlvNotAllowedForCommand { tag: u16, name: &'static str },

    #[error("TLV tag {tag:#06x} length {declared} does not match decoded length {actual}")]
    TlvLengthMismatch {
        tag: u16,
        declared: usize,
        actual: usize,
    },

    #[error("TLV tag {tag:#06x} value is invalid: {reason}")]
    InvalidTlvValue { tag: u16, reason: String },

    #[error("UDH error: {0}")]
    UdhError(String),

    #[error("PDU body length does not match command_length: expected {expected}, consumed {consumed}")]
    BodyLengthMismatch { expected: usize, consumed: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CommandId {
    /// A command_id's high bit (bit 31) marks it as a response PDU.
    pub fn is_response(&self) -> bool {
        (*self as u32) & 0x8000_0000 != 0
    }
}

impl CodecError {
    /// Map a decode/encode failure to the `ESME_*` status that should be
    /// reported back to the peer, per the PDU codec's error re-stamping
    /// policy.
    pub fn to_command_status(&self) -> CommandStatus {
        match self {
            CodecError::InvalidPduLength { .. } => CommandStatus::InvalidCommandLength,
            CodecError::BodyLengthMismatch { .. } => CommandStatus::InvalidCommandLength,
            CodecError::InvalidCommandId(_) => CommandStatus::InvalidCommandId,
            CodecError::InvalidCommandStatus(_) => CommandStatus::InvalidCommandId,
            CodecError::UnknownTlvTag(_) => CommandStatus::ErrorInOptionalPartofPduBody,
            CodecError::UndispatchedTlvTag { .. } => CommandStatus::OptionalParameterNotAllowed,
            CodecError::TlvNotAllowedForCommand { .. } => CommandStatus::OptionalParameterNotAllowed,
            CodecError::TlvLengthMismatch { .. } => CommandStatus::InvalidParameterLength,
            CodecError::InvalidTlvValue { .. } => CommandStatus::InvalidOptionalParameterValue,
            CodecError::FieldValidation { field, .. } => field_status(field),
            CodecError::FieldTooLong { field, .. } => field_status(field),
            CodecError::UdhError(_) => CommandStatus::InvalidMsgLength,
            _ => CommandStatus::SystemError,
        }
    }
}

/// Default field -> status mapping for mandatory-parameter validation
/// failures, mirroring the reference codec's per-field error table.
fn field_status(field: &str) -> CommandStatus {
    match field {
        "system_id" => CommandStatus::InvalidSystemId,
        "password" => CommandStatus::InvalidPassword,
        "service_type" => CommandStatus::InvalidServiceType,
        "source_addr_ton" => CommandStatus::InvalidSourceAddressTon,
        "source_addr_npi" => CommandStatus::InvalidSourceAddressNpi,
        "source_addr" => CommandStatus::InvalidSourceAddress,
        "dest_addr_ton" => CommandStatus::InvalidDestinationAddressTon,
        "dest_addr_npi" => CommandStatus::InvalidDestinationAddressNpi,
        "destination_addr" => CommandStatus::InvalidDestinationAddress,
        "schedule_delivery_time" => CommandStatus::InvalidScheduledDeliveryTime,
        "validity_period" => CommandStatus::InvalidExpiryTime,
        "sm_default_msg_id" => CommandStatus::InvalidPredefinedMessageId,
        "esm_class" => CommandStatus::InvalidEsmClassFieldData,
        "registered_delivery" => CommandStatus::InvalidRegisteredDeliveryFlag,
        "message_id" => CommandStatus::InvalidMessageId,
        "short_message" | "message_payload" => CommandStatus::InvalidMsgLength,
        _ => CommandStatus::SystemError,
    }
}

/// Decode a length-prefixed, NUL-terminated field (`COctetString`), failing
/// if the terminator is absent within `max_len` bytes.
pub fn decode_u8(buf: &mut Cursor<&[u8]>) -> Result<u8, CodecError> {
    if buf.remaining() < 1 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u8())
}

pub fn decode_u16(buf: &mut Cursor<&[u8]>) -> Result<u16, CodecError> {
    if buf.remaining() < 2 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u16())
}

pub fn decode_u32(buf: &mut Cursor<&[u8]>) -> Result<u32, CodecError> {
    if buf.remaining() < 4 {
        return Err(CodecError::Incomplete);
    }
    Ok(buf.get_u32())
}

pub fn encode_u8(buf: &mut BytesMut, value: u8) {
    buf.put_u8(value);
}

pub fn encode_u16(buf: &mut BytesMut, value: u16) {
    buf.put_u16(value);
}

pub fn encode_u32(buf: &mut BytesMut, value: u32) {
    buf.put_u32(value);
}
