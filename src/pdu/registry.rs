//! Per-command field tables and the field-level codec dispatch that
//! `Pdu::decode`/`Pdu::encode` drive off them.

use super::{DestinationAddress, ParamName, Pdu, UnsuccessSme, Value};
use crate::codec::CodecError;
use crate::datatypes::{
    tag_name, tags, CallbackNum, CommandId, CommandStatus, DataCoding, EsmClass, InterfaceVersion,
    NumericPlanIndicator, PriorityFlag, RegisteredDelivery, SmppTime, Subaddress, Tlv, TypeOfNumber,
};
use crate::datatypes::{dispatch_tlv, encode_tlv, OptionValue};
use crate::primitives;
use bytes::{BufMut, BytesMut};
use std::io::Cursor;

/// Static per-command shape: the mandatory parameters (in wire order) and
/// the set of optional TLV-backed parameters this command permits.
pub struct CommandMeta {
    pub mandatory: &'static [ParamName],
    pub optional: &'static [ParamName],
    /// A response PDU carrying a non-`Ok` status may omit its body
    /// entirely, per SMPP v3.4 Section 4 per-command response notes.
    pub no_body_on_error: bool,
}

const EMPTY: &[ParamName] = &[];

const BIND_MANDATORY: &[ParamName] = &[
    ParamName::SystemId,
    ParamName::Password,
    ParamName::SystemType,
    ParamName::InterfaceVersion,
    ParamName::AddrTon,
    ParamName::AddrNpi,
    ParamName::AddressRange,
];
const BIND_RESP_MANDATORY: &[ParamName] = &[ParamName::SystemId];
const BIND_RESP_OPTIONAL: &[ParamName] = &[ParamName::ScInterfaceVersion];

const OUTBIND_MANDATORY: &[ParamName] = &[ParamName::SystemId, ParamName::Password];

const SUBMIT_DELIVER_MANDATORY: &[ParamName] = &[
    ParamName::ServiceType,
    ParamName::SourceAddrTon,
    ParamName::SourceAddrNpi,
    ParamName::SourceAddr,
    ParamName::DestAddrTon,
    ParamName::DestAddrNpi,
    ParamName::DestinationAddr,
    ParamName::EsmClass,
    ParamName::ProtocolId,
    ParamName::PriorityFlag,
    ParamName::ScheduleDeliveryTime,
    ParamName::ValidityPeriod,
    ParamName::RegisteredDelivery,
    ParamName::ReplaceIfPresentFlag,
    ParamName::DataCoding,
    ParamName::SmDefaultMsgId,
    ParamName::ShortMessage,
];

const SUBMIT_SM_OPTIONAL: &[ParamName] = &[
    ParamName::UserMessageReference,
    ParamName::SourcePort,
    ParamName::DestinationPort,
    ParamName::SarMsgRefNum,
    ParamName::SarTotalSegments,
    ParamName::SarSegmentSeqnum,
    ParamName::MoreMessagesToSend,
    ParamName::PayloadType,
    ParamName::MessagePayload,
    ParamName::PrivacyIndicator,
    ParamName::CallbackNum,
    ParamName::SourceSubaddress,
    ParamName::DestSubaddress,
    ParamName::DisplayTime,
    ParamName::SmsSignal,
    ParamName::NumberOfMessages,
    ParamName::AlertOnMessageDelivery,
    ParamName::LanguageIndicator,
    ParamName::QosTimeToLive,
];

const DELIVER_SM_OPTIONAL: &[ParamName] = &[
    ParamName::UserMessageReference,
    ParamName::SourcePort,
    ParamName::DestinationPort,
    ParamName::SarMsgRefNum,
    ParamName::SarTotalSegments,
    ParamName::SarSegmentSeqnum,
    ParamName::PrivacyIndicator,
    ParamName::SourceSubaddress,
    ParamName::DestSubaddress,
    ParamName::LanguageIndicator,
    ParamName::MessagePayload,
    ParamName::ReceiptedMessageId,
];

const MESSAGE_ID_ONLY: &[ParamName] = &[ParamName::MessageId];

const QUERY_SM_MANDATORY: &[ParamName] = &[
    ParamName::MessageId,
    ParamName::SourceAddrTon,
    ParamName::SourceAddrNpi,
    ParamName::SourceAddr,
];

const QUERY_SM_RESP_MANDATORY: &[ParamName] = &[
    ParamName::MessageId,
    ParamName::FinalDate,
    ParamName::MessageState,
    ParamName::ErrorCode,
];

const CANCEL_SM_MANDATORY: &[ParamName] = &[
    ParamName::ServiceType,
    ParamName::MessageId,
    ParamName::SourceAddrTon,
    ParamName::SourceAddrNpi,
    ParamName::SourceAddr,
    ParamName::DestAddrTon,
    ParamName::DestAddrNpi,
    ParamName::DestinationAddr,
];

const REPLACE_SM_MANDATORY: &[ParamName] = &[
    ParamName::MessageId,
    ParamName::SourceAddrTon,
    ParamName::SourceAddrNpi,
    ParamName::SourceAddr,
    ParamName::ScheduleDeliveryTime,
    ParamName::ValidityPeriod,
    ParamName::RegisteredDelivery,
    ParamName::SmDefaultMsgId,
    ParamName::ShortMessage,
];

const DATA_SM_MANDATORY: &[ParamName] = &[
    ParamName::ServiceType,
    ParamName::SourceAddrTon,
    ParamName::SourceAddrNpi,
    ParamName::SourceAddr,
    ParamName::DestAddrTon,
    ParamName::DestAddrNpi,
    ParamName::DestinationAddr,
    ParamName::EsmClass,
    ParamName::RegisteredDelivery,
    ParamName::DataCoding,
];

const DATA_SM_OPTIONAL: &[ParamName] = SUBMIT_SM_OPTIONAL;

const DATA_SM_RESP_OPTIONAL: &[ParamName] = &[ParamName::NumberOfMessages];

const ALERT_NOTIFICATION_MANDATORY: &[ParamName] = &[
    ParamName::SourceAddrTon,
    ParamName::SourceAddrNpi,
    ParamName::SourceAddr,
    ParamName::EsmeAddrTon,
    ParamName::EsmeAddrNpi,
    ParamName::EsmeAddr,
];
const ALERT_NOTIFICATION_OPTIONAL: &[ParamName] = &[ParamName::MsAvailabilityStatus];

const SUBMIT_MULTI_MANDATORY: &[ParamName] = &[
    ParamName::ServiceType,
    ParamName::SourceAddrTon,
    ParamName::SourceAddrNpi,
    ParamName::SourceAddr,
    ParamName::Destinations,
    ParamName::EsmClass,
    ParamName::ProtocolId,
    ParamName::PriorityFlag,
    ParamName::ScheduleDeliveryTime,
    ParamName::ValidityPeriod,
    ParamName::RegisteredDelivery,
    ParamName::ReplaceIfPresentFlag,
    ParamName::DataCoding,
    ParamName::SmDefaultMsgId,
    ParamName::ShortMessage,
];

const SUBMIT_MULTI_RESP_MANDATORY: &[ParamName] =
    &[ParamName::MessageId, ParamName::UnsuccessSmes];

pub fn command_meta(command_id: CommandId) -> Result<CommandMeta, CodecError> {
    use CommandId::*;
    Ok(match command_id {
        GenericNack => CommandMeta { mandatory: EMPTY, optional: EMPTY, no_body_on_error: false },

        BindReceiver | BindTransmitter | BindTransceiver => CommandMeta {
            mandatory: BIND_MANDATORY,
            optional: EMPTY,
            no_body_on_error: true,
        },
        BindReceiverResp | BindTransmitterResp | BindTransceiverResp => CommandMeta {
            mandatory: BIND_RESP_MANDATORY,
            optional: BIND_RESP_OPTIONAL,
            no_body_on_error: true,
        },
        Outbind => CommandMeta {
            mandatory: OUTBIND_MANDATORY,
            optional: EMPTY,
            no_body_on_error: false,
        },
        Unbind | UnbindResp | EnquireLink | EnquireLinkResp => CommandMeta {
            mandatory: EMPTY,
            optional: EMPTY,
            no_body_on_error: true,
        },

        SubmitSm => CommandMeta {
            mandatory: SUBMIT_DELIVER_MANDATORY,
            optional: SUBMIT_SM_OPTIONAL,
            no_body_on_error: true,
        },
        SubmitSmResp => CommandMeta {
            mandatory: MESSAGE_ID_ONLY,
            optional: EMPTY,
            no_body_on_error: true,
        },
        DeliverSm => CommandMeta {
            mandatory: SUBMIT_DELIVER_MANDATORY,
            optional: DELIVER_SM_OPTIONAL,
            no_body_on_error: true,
        },
        DeliverSmResp => CommandMeta {
            mandatory: MESSAGE_ID_ONLY,
            optional: EMPTY,
            no_body_on_error: true,
        },

        QuerySm => CommandMeta {
            mandatory: QUERY_SM_MANDATORY,
            optional: EMPTY,
            no_body_on_error: true,
        },
        QuerySmResp => CommandMeta {
            mandatory: QUERY_SM_RESP_MANDATORY,
            optional: EMPTY,
            no_body_on_error: true,
        },

        CancelSm => CommandMeta {
            mandatory: CANCEL_SM_MANDATORY,
            optional: EMPTY,
            no_body_on_error: true,
        },
        CancelSmResp => CommandMeta { mandatory: EMPTY, optional: EMPTY, no_body_on_error: true },

        ReplaceSm => CommandMeta {
            mandatory: REPLACE_SM_MANDATORY,
            optional: EMPTY,
            no_body_on_error: true,
        },
        ReplaceSmResp => CommandMeta { mandatory: EMPTY, optional: EMPTY, no_body_on_error: true },

        DataSm => CommandMeta {
            mandatory: DATA_SM_MANDATORY,
            optional: DATA_SM_OPTIONAL,
            no_body_on_error: true,
        },
        DataSmResp => CommandMeta {
            mandatory: MESSAGE_ID_ONLY,
            optional: DATA_SM_RESP_OPTIONAL,
            no_body_on_error: true,
        },

        AlertNotification => CommandMeta {
            mandatory: ALERT_NOTIFICATION_MANDATORY,
            optional: ALERT_NOTIFICATION_OPTIONAL,
            no_body_on_error: false,
        },

        SubmitMulti => CommandMeta {
            mandatory: SUBMIT_MULTI_MANDATORY,
            optional: SUBMIT_SM_OPTIONAL,
            no_body_on_error: true,
        },
        SubmitMultiResp => CommandMeta {
            mandatory: SUBMIT_MULTI_RESP_MANDATORY,
            optional: EMPTY,
            no_body_on_error: true,
        },

        BroadcastSm | BroadcastSmResp | QueryBroadcastSm | QueryBroadcastSmResp
        | CancelBroadcastSm | CancelBroadcastSmResp => {
            return Err(CodecError::InvalidCommandId(command_id as u32))
        }
    })
}

const MAX_ADDR_LEN: usize = 21;
const MAX_EXTENDED_ADDR_LEN: usize = 65;
const MAX_SERVICE_TYPE_LEN: usize = 6;
const MAX_SYSTEM_ID_LEN: usize = 16;
const MAX_PASSWORD_LEN: usize = 9;
const MAX_SYSTEM_TYPE_LEN: usize = 13;
const MAX_ADDRESS_RANGE_LEN: usize = 41;
const MAX_SCHEDULE_LEN: usize = 17;
const MAX_MESSAGE_ID_LEN: usize = 65;

/// `alert_notification` and `data_sm` widen `source_addr` to a 65-byte
/// COctetString (Section 4.12); every other command uses the 21-byte
/// default shared by the rest of the address fields.
fn source_addr_max_len(command_id: CommandId) -> usize {
    match command_id {
        CommandId::AlertNotification | CommandId::DataSm => MAX_EXTENDED_ADDR_LEN,
        _ => MAX_ADDR_LEN,
    }
}

/// `data_sm` widens `destination_addr` the same way; `alert_notification`
/// has no `destination_addr` field at all.
fn dest_addr_max_len(command_id: CommandId) -> usize {
    match command_id {
        CommandId::DataSm => MAX_EXTENDED_ADDR_LEN,
        _ => MAX_ADDR_LEN,
    }
}

/// `deliver_sm`'s `schedule_delivery_time`/`validity_period` must always be
/// null (Section 4.6): the SMSC never schedules or expires a delivery to an
/// ESME, so the field is reserved and both encode and decode reject a
/// non-empty value.
fn requires_null(command_id: CommandId, field: ParamName) -> bool {
    matches!(
        (command_id, field),
        (CommandId::DeliverSm, ParamName::ScheduleDeliveryTime)
            | (CommandId::DeliverSm, ParamName::ValidityPeriod)
    )
}

/// Decode a `COctetString`-backed SMPP time field, validating it against the
/// absolute/relative time grammar (empty string is always accepted as null).
/// `must_be_null` additionally rejects a non-empty decoded value.
fn decode_time(
    buf: &mut Cursor<&[u8]>,
    field: &'static str,
    must_be_null: bool,
) -> Result<String, CodecError> {
    let raw = primitives::decode_cstring(buf, MAX_SCHEDULE_LEN, field)?;
    crate::datatypes::SmppTime::parse(&raw).map_err(|reason| CodecError::FieldValidation {
        field,
        reason: reason.to_string(),
    })?;
    if must_be_null && !raw.is_empty() {
        return Err(CodecError::FieldValidation {
            field,
            reason: format!("{field} must be null for this command"),
        });
    }
    Ok(raw)
}

/// Encode a previously-validated SMPP time string, re-checking the
/// null-required constraint on the way out so a caller-constructed `Pdu`
/// can't violate it either.
fn encode_time(
    buf: &mut BytesMut,
    value: &str,
    field: &'static str,
    must_be_null: bool,
) -> Result<(), CodecError> {
    if must_be_null && !value.is_empty() {
        return Err(CodecError::FieldValidation {
            field,
            reason: format!("{field} must be null for this command"),
        });
    }
    crate::datatypes::SmppTime::parse(value).map_err(|reason| CodecError::FieldValidation {
        field,
        reason: reason.to_string(),
    })?;
    primitives::encode_cstring(buf, value, MAX_SCHEDULE_LEN, field)
}

pub fn decode_field(
    field: ParamName,
    buf: &mut Cursor<&[u8]>,
    pdu: &mut Pdu,
) -> Result<(), CodecError> {
    let value = match field {
        ParamName::SystemId => Value::Str(primitives::decode_cstring(buf, MAX_SYSTEM_ID_LEN, "system_id")?),
        ParamName::Password => Value::Str(primitives::decode_cstring(buf, MAX_PASSWORD_LEN, "password")?),
        ParamName::SystemType => {
            Value::Str(primitives::decode_cstring(buf, MAX_SYSTEM_TYPE_LEN, "system_type")?)
        }
        ParamName::InterfaceVersion => {
            let raw = crate::codec::decode_u8(buf)?;
            Value::InterfaceVersion(InterfaceVersion::try_from(raw).unwrap_or(InterfaceVersion::SmppV34))
        }
        ParamName::AddrTon => Value::TypeOfNumber(decode_ton(buf, "source_addr_ton")?),
        ParamName::AddrNpi => Value::NumericPlanIndicator(decode_npi(buf, "source_addr_npi")?),
        ParamName::AddressRange => Value::Str(primitives::decode_cstring(
            buf,
            MAX_ADDRESS_RANGE_LEN,
            "address_range",
        )?),
        ParamName::ServiceType => {
            Value::Str(primitives::decode_cstring(buf, MAX_SERVICE_TYPE_LEN, "service_type")?)
        }
        ParamName::SourceAddrTon => Value::TypeOfNumber(decode_ton(buf, "source_addr_ton")?),
        ParamName::SourceAddrNpi => Value::NumericPlanIndicator(decode_npi(buf, "source_addr_npi")?),
        ParamName::SourceAddr => Value::Str(primitives::decode_cstring(
            buf,
            source_addr_max_len(pdu.command_id),
            "source_addr",
        )?),
        ParamName::DestAddrTon => Value::TypeOfNumber(decode_ton(buf, "dest_addr_ton")?),
        ParamName::DestAddrNpi => Value::NumericPlanIndicator(decode_npi(buf, "dest_addr_npi")?),
        ParamName::DestinationAddr => Value::Str(primitives::decode_cstring(
            buf,
            dest_addr_max_len(pdu.command_id),
            "destination_addr",
        )?),
        ParamName::EsmClass => {
            let raw = crate::codec::decode_u8(buf)?;
            Value::EsmClass(EsmClass::decode(raw).map_err(|nibble| CodecError::FieldValidation {
                field: "esm_class",
                reason: format!("reserved message_type nibble: {nibble:#06b}"),
            })?)
        }
        ParamName::ProtocolId => Value::U8(crate::codec::decode_u8(buf)?),
        ParamName::PriorityFlag => {
            let raw = crate::codec::decode_u8(buf)?;
            Value::PriorityFlag(
                PriorityFlag::try_from(raw).map_err(|_| CodecError::FieldValidation {
                    field: "priority_flag",
                    reason: format!("invalid priority_flag: {raw}"),
                })?,
            )
        }
        ParamName::ScheduleDeliveryTime => Value::Str(decode_time(
            buf,
            "schedule_delivery_time",
            requires_null(pdu.command_id, ParamName::ScheduleDeliveryTime),
        )?),
        ParamName::ValidityPeriod => Value::Str(decode_time(
            buf,
            "validity_period",
            requires_null(pdu.command_id, ParamName::ValidityPeriod),
        )?),
        ParamName::RegisteredDelivery => {
            let raw = crate::codec::decode_u8(buf)?;
            Value::RegisteredDelivery(RegisteredDelivery::decode(raw).map_err(|bits| {
                CodecError::FieldValidation {
                    field: "registered_delivery",
                    reason: format!("reserved receipt value: {bits:#04b}"),
                }
            })?)
        }
        ParamName::ReplaceIfPresentFlag => Value::U8(crate::codec::decode_u8(buf)?),
        ParamName::DataCoding => Value::DataCoding(DataCoding::from(crate::codec::decode_u8(buf)?)),
        ParamName::SmDefaultMsgId => Value::U8(crate::codec::decode_u8(buf)?),
        ParamName::ShortMessage => {
            let len = crate::codec::decode_u8(buf)? as usize;
            Value::Bytes(primitives::decode_octets(buf, len)?)
        }
        ParamName::MessageId => {
            let id = primitives::decode_cstring(buf, MAX_MESSAGE_ID_LEN, "message_id")?;
            if pdu.command_id == CommandId::DeliverSmResp && !id.is_empty() {
                return Err(CodecError::FieldValidation {
                    field: "message_id",
                    reason: "deliver_sm_resp requires a null message_id".to_string(),
                });
            }
            Value::Str(id)
        }
        ParamName::FinalDate => Value::Str(decode_time(buf, "final_date", false)?),
        ParamName::MessageState => Value::U8(crate::codec::decode_u8(buf)?),
        ParamName::ErrorCode => Value::U8(crate::codec::decode_u8(buf)?),
        ParamName::EsmeAddrTon => Value::TypeOfNumber(decode_ton(buf, "esme_addr_ton")?),
        ParamName::EsmeAddrNpi => Value::NumericPlanIndicator(decode_npi(buf, "esme_addr_npi")?),
        ParamName::EsmeAddr => Value::Str(primitives::decode_cstring(buf, MAX_ADDR_LEN, "esme_addr")?),
        ParamName::Destinations => Value::Destinations(decode_destinations(buf)?),
        ParamName::UnsuccessSmes => Value::UnsuccessSmes(decode_unsuccess_smes(buf)?),
        _ => unreachable!("{field:?} is TLV-backed and never decoded as a mandatory field"),
    };
    pdu.params.insert(field, value);
    Ok(())
}

pub fn encode_field(field: ParamName, pdu: &Pdu, buf: &mut BytesMut) -> Result<(), CodecError> {
    let value = pdu.get(field).ok_or(CodecError::FieldValidation {
        field: "mandatory",
        reason: format!("{field:?} is required but was not set"),
    })?;
    match (field, value) {
        (ParamName::SystemId, Value::Str(s)) => {
            primitives::encode_cstring(buf, s, MAX_SYSTEM_ID_LEN, "system_id")
        }
        (ParamName::Password, Value::Str(s)) => {
            primitives::encode_cstring(buf, s, MAX_PASSWORD_LEN, "password")
        }
        (ParamName::SystemType, Value::Str(s)) => {
            primitives::encode_cstring(buf, s, MAX_SYSTEM_TYPE_LEN, "system_type")
        }
        (ParamName::InterfaceVersion, Value::InterfaceVersion(v)) => {
            buf.put_u8(*v as u8);
            Ok(())
        }
        (ParamName::AddrTon | ParamName::SourceAddrTon | ParamName::DestAddrTon | ParamName::EsmeAddrTon, Value::TypeOfNumber(v)) => {
            buf.put_u8(*v as u8);
            Ok(())
        }
        (ParamName::AddrNpi | ParamName::SourceAddrNpi | ParamName::DestAddrNpi | ParamName::EsmeAddrNpi, Value::NumericPlanIndicator(v)) => {
            buf.put_u8(*v as u8);
            Ok(())
        }
        (ParamName::AddressRange, Value::Str(s)) => {
            primitives::encode_cstring(buf, s, MAX_ADDRESS_RANGE_LEN, "address_range")
        }
        (ParamName::ServiceType, Value::Str(s)) => {
            primitives::encode_cstring(buf, s, MAX_SERVICE_TYPE_LEN, "service_type")
        }
        (ParamName::SourceAddr, Value::Str(s)) => {
            primitives::encode_cstring(buf, s, source_addr_max_len(pdu.command_id), "source_addr")
        }
        (ParamName::DestinationAddr, Value::Str(s)) => primitives::encode_cstring(
            buf,
            s,
            dest_addr_max_len(pdu.command_id),
            "destination_addr",
        ),
        (ParamName::EsmeAddr, Value::Str(s)) => {
            primitives::encode_cstring(buf, s, MAX_ADDR_LEN, "esme_addr")
        }
        (ParamName::EsmClass, Value::EsmClass(v)) => {
            buf.put_u8((*v).into());
            Ok(())
        }
        (ParamName::ProtocolId | ParamName::ReplaceIfPresentFlag | ParamName::SmDefaultMsgId
         | ParamName::MessageState | ParamName::ErrorCode, Value::U8(v)) => {
            buf.put_u8(*v);
            Ok(())
        }
        (ParamName::PriorityFlag, Value::PriorityFlag(v)) => {
            buf.put_u8(*v as u8);
            Ok(())
        }
        (ParamName::ScheduleDeliveryTime, Value::Str(s)) => encode_time(
            buf,
            s,
            "schedule_delivery_time",
            requires_null(pdu.command_id, ParamName::ScheduleDeliveryTime),
        ),
        (ParamName::ValidityPeriod, Value::Str(s)) => encode_time(
            buf,
            s,
            "validity_period",
            requires_null(pdu.command_id, ParamName::ValidityPeriod),
        ),
        (ParamName::FinalDate, Value::Str(s)) => encode_time(buf, s, "final_date", false),
        (ParamName::RegisteredDelivery, Value::RegisteredDelivery(v)) => {
            buf.put_u8((*v).into());
            Ok(())
        }
        (ParamName::DataCoding, Value::DataCoding(v)) => {
            buf.put_u8((*v).into());
            Ok(())
        }
        (ParamName::ShortMessage, Value::Bytes(b)) => {
            if b.len() > 254 {
                return Err(CodecError::FieldTooLong {
                    field: "short_message",
                    max: 254,
                    actual: b.len(),
                });
            }
            buf.put_u8(b.len() as u8);
            buf.put_slice(b);
            Ok(())
        }
        (ParamName::MessageId, Value::Str(s)) => {
            if pdu.command_id == CommandId::DeliverSmResp && !s.is_empty() {
                return Err(CodecError::FieldValidation {
                    field: "message_id",
                    reason: "deliver_sm_resp requires a null message_id".to_string(),
                });
            }
            primitives::encode_cstring(buf, s, MAX_MESSAGE_ID_LEN, "message_id")
        }
        (ParamName::Destinations, Value::Destinations(list)) => encode_destinations(buf, list),
        (ParamName::UnsuccessSmes, Value::UnsuccessSmes(list)) => encode_unsuccess_smes(buf, list),
        (other, _) => Err(CodecError::FieldValidation {
            field: "mandatory",
            reason: format!("value type does not match field {other:?}"),
        }),
    }
}

fn decode_ton(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<TypeOfNumber, CodecError> {
    let raw = crate::codec::decode_u8(buf)?;
    TypeOfNumber::try_from(raw).map_err(|_| CodecError::FieldValidation {
        field,
        reason: format!("invalid type_of_number: {raw}"),
    })
}

fn decode_npi(buf: &mut Cursor<&[u8]>, field: &'static str) -> Result<NumericPlanIndicator, CodecError> {
    let raw = crate::codec::decode_u8(buf)?;
    NumericPlanIndicator::try_from(raw).map_err(|_| CodecError::FieldValidation {
        field,
        reason: format!("invalid numeric_plan_indicator: {raw}"),
    })
}

const DEST_FLAG_SME: u8 = 1;
const DEST_FLAG_DISTRIBUTION_LIST: u8 = 2;

fn decode_destinations(buf: &mut Cursor<&[u8]>) -> Result<Vec<DestinationAddress>, CodecError> {
    let count = crate::codec::decode_u8(buf)? as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let flag = crate::codec::decode_u8(buf)?;
        match flag {
            DEST_FLAG_SME => {
                let addr_ton = decode_ton(buf, "dest_addr_ton")?;
                let addr_npi = decode_npi(buf, "dest_addr_npi")?;
                let destination_addr = primitives::decode_cstring(buf, MAX_ADDR_LEN, "destination_addr")?;
                out.push(DestinationAddress::Sme {
                    addr_ton,
                    addr_npi,
                    destination_addr,
                });
            }
            DEST_FLAG_DISTRIBUTION_LIST => {
                let name = primitives::decode_cstring(buf, MAX_ADDRESS_RANGE_LEN, "dl_name")?;
                out.push(DestinationAddress::DistributionList(name));
            }
            other => {
                return Err(CodecError::FieldValidation {
                    field: "dest_flag",
                    reason: format!("invalid dest_flag: {other}"),
                })
            }
        }
    }
    Ok(out)
}

fn encode_destinations(buf: &mut BytesMut, list: &[DestinationAddress]) -> Result<(), CodecError> {
    if list.len() > u8::MAX as usize {
        return Err(CodecError::FieldValidation {
            field: "number_of_dests",
            reason: format!("too many destinations: {}", list.len()),
        });
    }
    buf.put_u8(list.len() as u8);
    for dest in list {
        match dest {
            DestinationAddress::Sme {
                addr_ton,
                addr_npi,
                destination_addr,
            } => {
                buf.put_u8(DEST_FLAG_SME);
                buf.put_u8(*addr_ton as u8);
                buf.put_u8(*addr_npi as u8);
                primitives::encode_cstring(buf, destination_addr, MAX_ADDR_LEN, "destination_addr")?;
            }
            DestinationAddress::DistributionList(name) => {
                buf.put_u8(DEST_FLAG_DISTRIBUTION_LIST);
                primitives::encode_cstring(buf, name, MAX_ADDRESS_RANGE_LEN, "dl_name")?;
            }
        }
    }
    Ok(())
}

fn decode_unsuccess_smes(buf: &mut Cursor<&[u8]>) -> Result<Vec<UnsuccessSme>, CodecError> {
    let count = crate::codec::decode_u8(buf)? as usize;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        let addr_ton = decode_ton(buf, "dest_addr_ton")?;
        let addr_npi = decode_npi(buf, "dest_addr_npi")?;
        let destination_addr = primitives::decode_cstring(buf, MAX_ADDR_LEN, "destination_addr")?;
        let raw_status = crate::codec::decode_u32(buf)?;
        let error_status_code = CommandStatus::try_from(raw_status)
            .map_err(|_| CodecError::InvalidCommandStatus(raw_status))?;
        out.push(UnsuccessSme {
            addr_ton,
            addr_npi,
            destination_addr,
            error_status_code,
        });
    }
    Ok(out)
}

fn encode_unsuccess_smes(buf: &mut BytesMut, list: &[UnsuccessSme]) -> Result<(), CodecError> {
    if list.len() > u8::MAX as usize {
        return Err(CodecError::FieldValidation {
            field: "no_unsuccess",
            reason: format!("too many entries: {}", list.len()),
        });
    }
    buf.put_u8(list.len() as u8);
    for sme in list {
        buf.put_u8(sme.addr_ton as u8);
        buf.put_u8(sme.addr_npi as u8);
        primitives::encode_cstring(buf, &sme.destination_addr, MAX_ADDR_LEN, "destination_addr")?;
        buf.put_u32(sme.error_status_code as u32);
    }
    Ok(())
}

/// Map a raw TLV to its `(ParamName, Value)` via the shared dispatch table,
/// then narrow the resulting [`OptionValue`] to the shape each tag expects.
pub fn decode_optional(tlv: &Tlv) -> Result<(ParamName, Value), CodecError> {
    let decoded = dispatch_tlv(tlv)?;
    let name = match tlv.tag {
        tags::USER_MESSAGE_REFERENCE => ParamName::UserMessageReference,
        tags::SOURCE_PORT => ParamName::SourcePort,
        tags::DESTINATION_PORT => ParamName::DestinationPort,
        tags::SAR_MSG_REF_NUM => ParamName::SarMsgRefNum,
        tags::SAR_TOTAL_SEGMENTS => ParamName::SarTotalSegments,
        tags::SAR_SEGMENT_SEQNUM => ParamName::SarSegmentSeqnum,
        tags::MORE_MESSAGES_TO_SEND => ParamName::MoreMessagesToSend,
        tags::PAYLOAD_TYPE => ParamName::PayloadType,
        tags::MESSAGE_PAYLOAD => ParamName::MessagePayload,
        tags::PRIVACY_INDICATOR => ParamName::PrivacyIndicator,
        tags::CALLBACK_NUM => ParamName::CallbackNum,
        tags::SOURCE_SUBADDRESS => ParamName::SourceSubaddress,
        tags::DEST_SUBADDRESS => ParamName::DestSubaddress,
        tags::DISPLAY_TIME => ParamName::DisplayTime,
        tags::SMS_SIGNAL => ParamName::SmsSignal,
        tags::NUMBER_OF_MESSAGES => ParamName::NumberOfMessages,
        tags::ALERT_ON_MESSAGE_DELIVERY => ParamName::AlertOnMessageDelivery,
        tags::LANGUAGE_INDICATOR => ParamName::LanguageIndicator,
        tags::RECEIPTED_MESSAGE_ID => ParamName::ReceiptedMessageId,
        tags::MS_AVAILABILITY_STATUS => ParamName::MsAvailabilityStatus,
        tags::QOS_TIME_TO_LIVE => ParamName::QosTimeToLive,
        tags::SC_INTERFACE_VERSION => ParamName::ScInterfaceVersion,
        tags::USER_RESPONSE_CODE => ParamName::UserResponseCode,
        other => {
            return Err(CodecError::UndispatchedTlvTag {
                tag: other,
                name: tag_name(other).unwrap_or("unknown"),
            })
        }
    };
    let value = match decoded {
        OptionValue::U8(v) => Value::U8(v),
        OptionValue::U16(v) => Value::U16(v),
        OptionValue::U32(v) => Value::U32(v),
        OptionValue::CString(s) => Value::Str(s),
        OptionValue::Bytes(b) => Value::Bytes(b),
        OptionValue::CallbackNum(cn) => Value::CallbackNum(cn),
        OptionValue::Subaddress(sub) => Value::Subaddress(sub),
        OptionValue::Empty => Value::Empty,
    };
    Ok((name, value))
}

pub fn encode_optional(field: ParamName, value: &Value, buf: &mut BytesMut) -> Result<(), CodecError> {
    let tag = match field {
        ParamName::UserMessageReference => tags::USER_MESSAGE_REFERENCE,
        ParamName::SourcePort => tags::SOURCE_PORT,
        ParamName::DestinationPort => tags::DESTINATION_PORT,
        ParamName::SarMsgRefNum => tags::SAR_MSG_REF_NUM,
        ParamName::SarTotalSegments => tags::SAR_TOTAL_SEGMENTS,
        ParamName::SarSegmentSeqnum => tags::SAR_SEGMENT_SEQNUM,
        ParamName::MoreMessagesToSend => tags::MORE_MESSAGES_TO_SEND,
        ParamName::PayloadType => tags::PAYLOAD_TYPE,
        ParamName::MessagePayload => tags::MESSAGE_PAYLOAD,
        ParamName::PrivacyIndicator => tags::PRIVACY_INDICATOR,
        ParamName::CallbackNum => tags::CALLBACK_NUM,
        ParamName::SourceSubaddress => tags::SOURCE_SUBADDRESS,
        ParamName::DestSubaddress => tags::DEST_SUBADDRESS,
        ParamName::DisplayTime => tags::DISPLAY_TIME,
        ParamName::SmsSignal => tags::SMS_SIGNAL,
        ParamName::NumberOfMessages => tags::NUMBER_OF_MESSAGES,
        ParamName::AlertOnMessageDelivery => tags::ALERT_ON_MESSAGE_DELIVERY,
        ParamName::LanguageIndicator => tags::LANGUAGE_INDICATOR,
        ParamName::ReceiptedMessageId => tags::RECEIPTED_MESSAGE_ID,
        ParamName::MsAvailabilityStatus => tags::MS_AVAILABILITY_STATUS,
        ParamName::QosTimeToLive => tags::QOS_TIME_TO_LIVE,
        ParamName::ScInterfaceVersion => tags::SC_INTERFACE_VERSION,
        ParamName::UserResponseCode => tags::USER_RESPONSE_CODE,
        other => {
            return Err(CodecError::FieldValidation {
                field: "optional",
                reason: format!("{other:?} is not TLV-backed"),
            })
        }
    };
    let option_value = match value {
        Value::U8(v) => OptionValue::U8(*v),
        Value::U16(v) => OptionValue::U16(*v),
        Value::U32(v) => OptionValue::U32(*v),
        Value::Str(s) => OptionValue::CString(s.clone()),
        Value::Bytes(b) => OptionValue::Bytes(b.clone()),
        Value::CallbackNum(cn) => OptionValue::CallbackNum(cn.clone()),
        Value::Subaddress(sub) => OptionValue::Subaddress(sub.clone()),
        Value::Empty => OptionValue::Empty,
        other => {
            return Err(CodecError::FieldValidation {
                field: "optional",
                reason: format!("value {other:?} cannot be encoded as a TLV"),
            })
        }
    };
    encode_tlv(tag, &option_value).encode(buf);
    Ok(())
}
