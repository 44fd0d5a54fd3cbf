//! Generic PDU model.
//!
//! SMPP v3.4 defines roughly fifteen commands, each a header plus a fixed
//! sequence of mandatory parameters plus an unordered bag of optional TLV
//! parameters. Rather than one bespoke struct per command, this module
//! represents any PDU as a [`Pdu`]: `command_id` + `command_status` +
//! `sequence_number` + a `params` map keyed by [`ParamName`]. A static
//! [`registry::CommandMeta`] table per command drives a single generic
//! encode/decode engine (`Pdu::decode`/`Pdu::encode`).

mod registry;

use crate::codec::{CodecError, Encodable, PduHeader};
use crate::datatypes::{
    CallbackNum, CommandId, CommandStatus, DataCoding, EsmClass, InterfaceVersion,
    NumericPlanIndicator, PriorityFlag, RegisteredDelivery, Subaddress, Tlv, TypeOfNumber,
};
use crate::primitives;
use crate::udh::UserDataHeader;
use bytes::{Buf, BufMut, Bytes, BytesMut};
use std::collections::HashMap;
use std::io::Cursor;

pub use registry::command_meta;

/// Every mandatory or optional field name this crate knows how to decode or
/// encode, spanning all supported commands. A given [`Pdu`] only populates
/// the subset its command actually carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamName {
    SystemId,
    Password,
    SystemType,
    InterfaceVersion,
    AddrTon,
    AddrNpi,
    AddressRange,
    ServiceType,
    SourceAddrTon,
    SourceAddrNpi,
    SourceAddr,
    DestAddrTon,
    DestAddrNpi,
    DestinationAddr,
    EsmClass,
    ProtocolId,
    PriorityFlag,
    ScheduleDeliveryTime,
    ValidityPeriod,
    RegisteredDelivery,
    ReplaceIfPresentFlag,
    DataCoding,
    SmDefaultMsgId,
    ShortMessage,
    MessageId,
    FinalDate,
    MessageState,
    ErrorCode,
    EsmeAddrTon,
    EsmeAddrNpi,
    EsmeAddr,
    Destinations,
    UnsuccessSmes,

    // TLV-backed optional parameters.
    UserMessageReference,
    SourcePort,
    DestinationPort,
    SarMsgRefNum,
    SarTotalSegments,
    SarSegmentSeqnum,
    MoreMessagesToSend,
    PayloadType,
    MessagePayload,
    PrivacyIndicator,
    CallbackNum,
    SourceSubaddress,
    DestSubaddress,
    DisplayTime,
    SmsSignal,
    NumberOfMessages,
    AlertOnMessageDelivery,
    LanguageIndicator,
    ReceiptedMessageId,
    MsAvailabilityStatus,
    QosTimeToLive,
    ScInterfaceVersion,
    UserResponseCode,
}

/// One destination entry in a `submit_multi` request: either a plain SME
/// address or a reference into a pre-configured distribution list.
#[derive(Clone, Debug, PartialEq)]
pub enum DestinationAddress {
    Sme {
        addr_ton: TypeOfNumber,
        addr_npi: NumericPlanIndicator,
        destination_addr: String,
    },
    DistributionList(String),
}

/// One failed destination reported in a `submit_multi_resp`.
#[derive(Clone, Debug, PartialEq)]
pub struct UnsuccessSme {
    pub addr_ton: TypeOfNumber,
    pub addr_npi: NumericPlanIndicator,
    pub destination_addr: String,
    pub error_status_code: CommandStatus,
}

/// A decoded field or TLV value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    U8(u8),
    U16(u16),
    U32(u32),
    Str(String),
    Bytes(Bytes),
    TypeOfNumber(TypeOfNumber),
    NumericPlanIndicator(NumericPlanIndicator),
    EsmClass(EsmClass),
    RegisteredDelivery(RegisteredDelivery),
    DataCoding(DataCoding),
    PriorityFlag(PriorityFlag),
    InterfaceVersion(InterfaceVersion),
    CallbackNum(CallbackNum),
    Subaddress(Subaddress),
    Destinations(Vec<DestinationAddress>),
    UnsuccessSmes(Vec<UnsuccessSme>),
    /// A present-but-content-free optional parameter (`alert_on_message_delivery`).
    Empty,
}

/// A generic, fully-decoded SMPP PDU.
#[derive(Clone, Debug, PartialEq)]
pub struct Pdu {
    pub command_id: CommandId,
    pub command_status: CommandStatus,
    pub sequence_number: u32,
    pub params: HashMap<ParamName, Value>,
}

impl Pdu {
    pub fn new(command_id: CommandId, sequence_number: u32) -> Self {
        Pdu {
            command_id,
            command_status: CommandStatus::Ok,
            sequence_number,
            params: HashMap::new(),
        }
    }

    pub fn get(&self, name: ParamName) -> Option<&Value> {
        self.params.get(&name)
    }

    pub fn set(&mut self, name: ParamName, value: Value) -> &mut Self {
        self.params.insert(name, value);
        self
    }

    /// Decode a complete PDU (header + body) from `data`. Returns the PDU
    /// and the number of bytes consumed, so a caller framing a stream can
    /// advance past exactly one PDU.
    pub fn decode(data: &[u8]) -> Result<(Self, usize), CodecError> {
        let mut header_cursor = Cursor::new(data);
        let header = PduHeader::decode(&mut header_cursor)?;
        let meta = command_meta(header.command_id)?;

        let body_len = header.command_length as usize - PduHeader::SIZE;
        if data.len() < PduHeader::SIZE + body_len {
            return Err(CodecError::Incomplete);
        }

        let mut pdu = Pdu {
            command_id: header.command_id,
            command_status: header.command_status,
            sequence_number: header.sequence_number,
            params: HashMap::new(),
        };

        // A response carrying a non-Ok status is permitted to omit its body
        // entirely, per the `no_body_on_error` flag on the response command.
        if meta.no_body_on_error && header.command_status != CommandStatus::Ok && body_len == 0 {
            return Ok((pdu, PduHeader::SIZE));
        }

        // Bound the body cursor to exactly this PDU's declared length so a
        // trailing PDU in the same buffer can never be read into this one.
        let body = &data[PduHeader::SIZE..PduHeader::SIZE + body_len];
        let mut cursor = Cursor::new(body);

        for &field in meta.mandatory {
            registry::decode_field(field, &mut cursor, &mut pdu)?;
        }

        while cursor.has_remaining() {
            let tlv = Tlv::decode(&mut cursor)?;
            let (name, value) = registry::decode_optional(&tlv)?;
            if !meta.optional.contains(&name) {
                return Err(CodecError::TlvNotAllowedForCommand {
                    tag: tlv.tag,
                    name: crate::datatypes::tag_name(tlv.tag).unwrap_or("unknown"),
                });
            }
            pdu.params.insert(name, value);
        }

        let consumed = PduHeader::SIZE + body_len;
        Ok((pdu, consumed))
    }
}

impl Encodable for Pdu {
    fn encode(&self, buf: &mut BytesMut) -> Result<(), CodecError> {
        let meta = command_meta(self.command_id)?;

        // command_length is patched by `to_bytes`; write a placeholder here.
        buf.put_u32(0);
        buf.put_u32(self.command_id as u32);
        buf.put_u32(self.command_status as u32);
        buf.put_u32(self.sequence_number);

        if meta.no_body_on_error && self.command_status != CommandStatus::Ok {
            return Ok(());
        }

        for &field in meta.mandatory {
            registry::encode_field(field, self, buf)?;
        }

        for &field in meta.optional {
            if let Some(value) = self.params.get(&field) {
                registry::encode_optional(field, value, buf)?;
            }
        }

        Ok(())
    }
}

/// Split a `short_message` payload into its User Data Header and text body
/// when `esm_class` indicates one is present. Returns `(None, data)`
/// unchanged when `has_udhi` is false.
pub fn split_user_data(has_udhi: bool, data: &[u8]) -> Result<(Option<UserDataHeader>, &[u8]), CodecError> {
    if !has_udhi {
        return Ok((None, data));
    }
    let (udh, rest) = UserDataHeader::decode(data)?;
    Ok((Some(udh), rest))
}

/// Prefix `body` with an encoded UDH, producing the combined `short_message`
/// payload to write to the wire.
pub fn join_user_data(udh: Option<&UserDataHeader>, body: &[u8]) -> Result<Bytes, CodecError> {
    match udh {
        None => Ok(Bytes::copy_from_slice(body)),
        Some(udh) => {
            let header = udh.encode()?;
            let mut out = BytesMut::with_capacity(header.len() + body.len());
            out.extend_from_slice(&header);
            out.extend_from_slice(body);
            Ok(out.freeze())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::Encodable;

    #[test]
    fn enquire_link_roundtrips_with_no_body() {
        let pdu = Pdu::new(CommandId::EnquireLink, 7);
        let bytes = pdu.to_bytes();
        let (decoded, consumed) = Pdu::decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded.command_id, CommandId::EnquireLink);
        assert_eq!(decoded.sequence_number, 7);
    }

    #[test]
    fn submit_sm_roundtrips_mandatory_fields() {
        let mut pdu = Pdu::new(CommandId::SubmitSm, 1);
        pdu.set(ParamName::ServiceType, Value::Str(String::new()))
            .set(ParamName::SourceAddrTon, Value::TypeOfNumber(TypeOfNumber::International))
            .set(ParamName::SourceAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Isdn))
            .set(ParamName::SourceAddr, Value::Str("12025550123".to_string()))
            .set(ParamName::DestAddrTon, Value::TypeOfNumber(TypeOfNumber::International))
            .set(ParamName::DestAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Isdn))
            .set(ParamName::DestinationAddr, Value::Str("12025550199".to_string()))
            .set(ParamName::EsmClass, Value::EsmClass(EsmClass::default()))
            .set(ParamName::ProtocolId, Value::U8(0))
            .set(ParamName::PriorityFlag, Value::PriorityFlag(PriorityFlag::Level0))
            .set(ParamName::ScheduleDeliveryTime, Value::Str(String::new()))
            .set(ParamName::ValidityPeriod, Value::Str(String::new()))
            .set(ParamName::RegisteredDelivery, Value::RegisteredDelivery(RegisteredDelivery::default()))
            .set(ParamName::ReplaceIfPresentFlag, Value::U8(0))
            .set(ParamName::DataCoding, Value::DataCoding(DataCoding::default()))
            .set(ParamName::SmDefaultMsgId, Value::U8(0))
            .set(ParamName::ShortMessage, Value::Bytes(Bytes::from_static(b"Hello")));

        let bytes = pdu.to_bytes();
        let (decoded, consumed) = Pdu::decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(
            decoded.get(ParamName::ShortMessage),
            Some(&Value::Bytes(Bytes::from_static(b"Hello")))
        );
        assert_eq!(
            decoded.get(ParamName::DestinationAddr),
            Some(&Value::Str("12025550199".to_string()))
        );
    }

    #[test]
    fn submit_sm_with_optional_source_port() {
        let mut pdu = Pdu::new(CommandId::SubmitSm, 1);
        for (name, value) in [
            (ParamName::ServiceType, Value::Str(String::new())),
            (ParamName::SourceAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::SourceAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::SourceAddr, Value::Str(String::new())),
            (ParamName::DestAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::DestAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::DestinationAddr, Value::Str(String::new())),
            (ParamName::EsmClass, Value::EsmClass(EsmClass::default())),
            (ParamName::ProtocolId, Value::U8(0)),
            (ParamName::PriorityFlag, Value::PriorityFlag(PriorityFlag::Level0)),
            (ParamName::ScheduleDeliveryTime, Value::Str(String::new())),
            (ParamName::ValidityPeriod, Value::Str(String::new())),
            (ParamName::RegisteredDelivery, Value::RegisteredDelivery(RegisteredDelivery::default())),
            (ParamName::ReplaceIfPresentFlag, Value::U8(0)),
            (ParamName::DataCoding, Value::DataCoding(DataCoding::default())),
            (ParamName::SmDefaultMsgId, Value::U8(0)),
            (ParamName::ShortMessage, Value::Bytes(Bytes::new())),
        ] {
            pdu.set(name, value);
        }
        pdu.set(ParamName::SourcePort, Value::U16(5000));

        let bytes = pdu.to_bytes();
        let (decoded, _) = Pdu::decode(&bytes).unwrap();
        assert_eq!(decoded.get(ParamName::SourcePort), Some(&Value::U16(5000)));
    }

    #[test]
    fn submit_sm_round_trips_zero_length_alert_on_message_delivery() {
        let mut pdu = Pdu::new(CommandId::SubmitSm, 1);
        for (name, value) in [
            (ParamName::ServiceType, Value::Str(String::new())),
            (ParamName::SourceAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::SourceAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::SourceAddr, Value::Str(String::new())),
            (ParamName::DestAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::DestAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::DestinationAddr, Value::Str(String::new())),
            (ParamName::EsmClass, Value::EsmClass(EsmClass::default())),
            (ParamName::ProtocolId, Value::U8(0)),
            (ParamName::PriorityFlag, Value::PriorityFlag(PriorityFlag::Level0)),
            (ParamName::ScheduleDeliveryTime, Value::Str(String::new())),
            (ParamName::ValidityPeriod, Value::Str(String::new())),
            (ParamName::RegisteredDelivery, Value::RegisteredDelivery(RegisteredDelivery::default())),
            (ParamName::ReplaceIfPresentFlag, Value::U8(0)),
            (ParamName::DataCoding, Value::DataCoding(DataCoding::default())),
            (ParamName::SmDefaultMsgId, Value::U8(0)),
            (ParamName::ShortMessage, Value::Bytes(Bytes::new())),
        ] {
            pdu.set(name, value);
        }
        pdu.set(ParamName::AlertOnMessageDelivery, Value::Empty);

        let bytes = pdu.to_bytes();
        let (decoded, _) = Pdu::decode(&bytes).unwrap();
        assert_eq!(
            decoded.get(ParamName::AlertOnMessageDelivery),
            Some(&Value::Empty)
        );
    }

    #[test]
    fn data_sm_accepts_extended_addresses() {
        let long_addr = "1".repeat(64);
        let mut pdu = Pdu::new(CommandId::DataSm, 1);
        for (name, value) in [
            (ParamName::ServiceType, Value::Str(String::new())),
            (ParamName::SourceAddrTon, Value::TypeOfNumber(TypeOfNumber::International)),
            (ParamName::SourceAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Isdn)),
            (ParamName::SourceAddr, Value::Str(long_addr.clone())),
            (ParamName::DestAddrTon, Value::TypeOfNumber(TypeOfNumber::International)),
            (ParamName::DestAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Isdn)),
            (ParamName::DestinationAddr, Value::Str(long_addr.clone())),
            (ParamName::EsmClass, Value::EsmClass(EsmClass::default())),
            (ParamName::RegisteredDelivery, Value::RegisteredDelivery(RegisteredDelivery::default())),
            (ParamName::DataCoding, Value::DataCoding(DataCoding::default())),
        ] {
            pdu.set(name, value);
        }

        let bytes = pdu.to_bytes();
        let (decoded, consumed) = Pdu::decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        assert_eq!(decoded.get(ParamName::SourceAddr), Some(&Value::Str(long_addr.clone())));
        assert_eq!(decoded.get(ParamName::DestinationAddr), Some(&Value::Str(long_addr)));
    }

    #[test]
    fn submit_sm_rejects_source_addr_longer_than_21_bytes() {
        let mut pdu = Pdu::new(CommandId::SubmitSm, 1);
        for (name, value) in [
            (ParamName::ServiceType, Value::Str(String::new())),
            (ParamName::SourceAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::SourceAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::SourceAddr, Value::Str("1".repeat(64))),
            (ParamName::DestAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::DestAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::DestinationAddr, Value::Str(String::new())),
            (ParamName::EsmClass, Value::EsmClass(EsmClass::default())),
            (ParamName::ProtocolId, Value::U8(0)),
            (ParamName::PriorityFlag, Value::PriorityFlag(PriorityFlag::Level0)),
            (ParamName::ScheduleDeliveryTime, Value::Str(String::new())),
            (ParamName::ValidityPeriod, Value::Str(String::new())),
            (ParamName::RegisteredDelivery, Value::RegisteredDelivery(RegisteredDelivery::default())),
            (ParamName::ReplaceIfPresentFlag, Value::U8(0)),
            (ParamName::DataCoding, Value::DataCoding(DataCoding::default())),
            (ParamName::SmDefaultMsgId, Value::U8(0)),
            (ParamName::ShortMessage, Value::Bytes(Bytes::new())),
        ] {
            pdu.set(name, value);
        }
        assert!(matches!(pdu.encode(&mut BytesMut::new()), Err(CodecError::FieldTooLong { .. })));
    }

    #[test]
    fn deliver_sm_rejects_non_null_schedule_delivery_time() {
        let mut pdu = Pdu::new(CommandId::DeliverSm, 1);
        for (name, value) in [
            (ParamName::ServiceType, Value::Str(String::new())),
            (ParamName::SourceAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::SourceAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::SourceAddr, Value::Str(String::new())),
            (ParamName::DestAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::DestAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::DestinationAddr, Value::Str(String::new())),
            (ParamName::EsmClass, Value::EsmClass(EsmClass::default())),
            (ParamName::ProtocolId, Value::U8(0)),
            (ParamName::PriorityFlag, Value::PriorityFlag(PriorityFlag::Level0)),
            (ParamName::ScheduleDeliveryTime, Value::Str("070122191234400+".to_string())),
            (ParamName::ValidityPeriod, Value::Str(String::new())),
            (ParamName::RegisteredDelivery, Value::RegisteredDelivery(RegisteredDelivery::default())),
            (ParamName::ReplaceIfPresentFlag, Value::U8(0)),
            (ParamName::DataCoding, Value::DataCoding(DataCoding::default())),
            (ParamName::SmDefaultMsgId, Value::U8(0)),
            (ParamName::ShortMessage, Value::Bytes(Bytes::new())),
        ] {
            pdu.set(name, value);
        }
        assert!(matches!(
            pdu.encode(&mut BytesMut::new()),
            Err(CodecError::FieldValidation { field: "schedule_delivery_time", .. })
        ));
    }

    #[test]
    fn submit_sm_rejects_reserved_esm_class_message_type_on_decode() {
        let mut pdu = Pdu::new(CommandId::SubmitSm, 1);
        for (name, value) in [
            (ParamName::ServiceType, Value::Str(String::new())),
            (ParamName::SourceAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::SourceAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::SourceAddr, Value::Str(String::new())),
            (ParamName::DestAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::DestAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::DestinationAddr, Value::Str(String::new())),
            (ParamName::EsmClass, Value::EsmClass(EsmClass::default())),
            (ParamName::ProtocolId, Value::U8(0)),
            (ParamName::PriorityFlag, Value::PriorityFlag(PriorityFlag::Level0)),
            (ParamName::ScheduleDeliveryTime, Value::Str(String::new())),
            (ParamName::ValidityPeriod, Value::Str(String::new())),
            (ParamName::RegisteredDelivery, Value::RegisteredDelivery(RegisteredDelivery::default())),
            (ParamName::ReplaceIfPresentFlag, Value::U8(0)),
            (ParamName::DataCoding, Value::DataCoding(DataCoding::default())),
            (ParamName::SmDefaultMsgId, Value::U8(0)),
            (ParamName::ShortMessage, Value::Bytes(Bytes::new())),
        ] {
            pdu.set(name, value);
        }

        let mut bytes = BytesMut::from(&pdu.to_bytes()[..]);
        // Mandatory fields up to and including esm_class: header(16) +
        // service_type/source_addr_ton/npi/addr/dest_addr_ton/npi/addr all
        // empty COctetStrings (1 byte each) = 16 + 7 = 23; esm_class is the
        // next byte.
        let esm_class_offset = 23;
        assert_eq!(bytes[esm_class_offset], 0);
        bytes[esm_class_offset] = 0b0011_0000; // reserved message_type nibble
        let result = Pdu::decode(&bytes);
        assert!(matches!(
            result,
            Err(CodecError::FieldValidation { field: "esm_class", .. })
        ));
    }

    #[test]
    fn deliver_sm_resp_rejects_non_null_message_id() {
        let mut pdu = Pdu::new(CommandId::DeliverSmResp, 1);
        pdu.set(ParamName::MessageId, Value::Str("abc123".to_string()));
        assert!(matches!(
            pdu.encode(&mut BytesMut::new()),
            Err(CodecError::FieldValidation { field: "message_id", .. })
        ));
    }

    #[test]
    fn deliver_sm_carries_udh_bearing_short_message() {
        use crate::udh::{ConcatRef, InformationElement, UserDataHeader};

        let udh = UserDataHeader {
            elements: vec![InformationElement::ConcatenatedShortMessage(ConcatRef {
                reference: 9,
                total_parts: 2,
                sequence_number: 1,
                wide_reference: false,
            })],
        };
        let payload = join_user_data(Some(&udh), b"part one").unwrap();

        let mut pdu = Pdu::new(CommandId::DeliverSm, 1);
        for (name, value) in [
            (ParamName::ServiceType, Value::Str(String::new())),
            (ParamName::SourceAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::SourceAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::SourceAddr, Value::Str(String::new())),
            (ParamName::DestAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::DestAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::DestinationAddr, Value::Str(String::new())),
            (ParamName::EsmClass, Value::EsmClass(EsmClass::default())),
            (ParamName::ProtocolId, Value::U8(0)),
            (ParamName::PriorityFlag, Value::PriorityFlag(PriorityFlag::Level0)),
            (ParamName::ScheduleDeliveryTime, Value::Str(String::new())),
            (ParamName::ValidityPeriod, Value::Str(String::new())),
            (ParamName::RegisteredDelivery, Value::RegisteredDelivery(RegisteredDelivery::default())),
            (ParamName::ReplaceIfPresentFlag, Value::U8(0)),
            (ParamName::DataCoding, Value::DataCoding(DataCoding::default())),
            (ParamName::SmDefaultMsgId, Value::U8(0)),
            (ParamName::ShortMessage, Value::Bytes(payload)),
        ] {
            pdu.set(name, value);
        }

        let bytes = pdu.to_bytes();
        let (decoded, consumed) = Pdu::decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        let Some(Value::Bytes(short_message)) = decoded.get(ParamName::ShortMessage) else {
            panic!("expected short_message");
        };
        let (split_udh, text) = split_user_data(true, short_message).unwrap();
        assert_eq!(split_udh.unwrap().concat_ref().unwrap().reference, 9);
        assert_eq!(text, b"part one");
    }

    #[test]
    fn submit_multi_mixes_sme_and_distribution_list_destinations() {
        let mut pdu = Pdu::new(CommandId::SubmitMulti, 1);
        for (name, value) in [
            (ParamName::ServiceType, Value::Str(String::new())),
            (ParamName::SourceAddrTon, Value::TypeOfNumber(TypeOfNumber::Unknown)),
            (ParamName::SourceAddrNpi, Value::NumericPlanIndicator(NumericPlanIndicator::Unknown)),
            (ParamName::SourceAddr, Value::Str(String::new())),
            (
                ParamName::Destinations,
                Value::Destinations(vec![
                    DestinationAddress::Sme {
                        addr_ton: TypeOfNumber::International,
                        addr_npi: NumericPlanIndicator::Isdn,
                        destination_addr: "12025550123".to_string(),
                    },
                    DestinationAddress::DistributionList("sales_team".to_string()),
                ]),
            ),
            (ParamName::EsmClass, Value::EsmClass(EsmClass::default())),
            (ParamName::ProtocolId, Value::U8(0)),
            (ParamName::PriorityFlag, Value::PriorityFlag(PriorityFlag::Level0)),
            (ParamName::ScheduleDeliveryTime, Value::Str(String::new())),
            (ParamName::ValidityPeriod, Value::Str(String::new())),
            (ParamName::RegisteredDelivery, Value::RegisteredDelivery(RegisteredDelivery::default())),
            (ParamName::ReplaceIfPresentFlag, Value::U8(0)),
            (ParamName::DataCoding, Value::DataCoding(DataCoding::default())),
            (ParamName::SmDefaultMsgId, Value::U8(0)),
            (ParamName::ShortMessage, Value::Bytes(Bytes::from_static(b"hi all"))),
        ] {
            pdu.set(name, value);
        }

        let bytes = pdu.to_bytes();
        let (decoded, consumed) = Pdu::decode(&bytes).unwrap();
        assert_eq!(consumed, bytes.len());
        let Some(Value::Destinations(destinations)) = decoded.get(ParamName::Destinations) else {
            panic!("expected destinations");
        };
        assert_eq!(destinations.len(), 2);
        assert!(matches!(destinations[0], DestinationAddress::Sme { .. }));
        assert!(matches!(destinations[1], DestinationAddress::DistributionList(_)));
    }

    #[test]
    fn decode_stops_at_declared_length_ignoring_trailing_pdu() {
        let first = Pdu::new(CommandId::EnquireLink, 1).to_bytes();
        let second = Pdu::new(CommandId::EnquireLink, 2).to_bytes();
        let mut buf = BytesMut::new();
        buf.extend_from_slice(&first);
        buf.extend_from_slice(&second);

        let (decoded, consumed) = Pdu::decode(&buf).unwrap();
        assert_eq!(consumed, first.len());
        assert_eq!(decoded.sequence_number, 1);
    }

    #[test]
    fn three_tier_tlv_rejection() {
        let mut pdu = Pdu::new(CommandId::EnquireLink, 1);
        // enquire_link has no optional parameters at all; attach one by hand.
        let bytes = pdu.to_bytes();
        let mut with_tlv = BytesMut::from(&bytes[..]);
        // source_port TLV appended: recognized tag, but not allowed on enquire_link.
        with_tlv.put_u16(0x020A);
        with_tlv.put_u16(2);
        with_tlv.put_u16(1234);
        let length = with_tlv.len() as u32;
        with_tlv[0..4].copy_from_slice(&length.to_be_bytes());

        let result = Pdu::decode(&with_tlv);
        assert!(matches!(
            result,
            Err(CodecError::TlvNotAllowedForCommand { .. })
        ));
        pdu.command_status = CommandStatus::Ok;
    }
}
