// registered_delivery: a bit-packed octet requesting delivery/acknowledgement
// receipts. Layout (SMPP v3.4 Section 5.2.17):
//   bits 0-1 (mask 0x03): SMSC delivery receipt
//   bits 2-3 (mask 0x0c): SME originated acknowledgements (independent flags)
//   bit 4    (mask 0x10): intermediate notification requested
//   bits 5-7: reserved, must be zero but are not rejected if set
//
// The receipt sub-field is a closed three-value enumeration (Section 4.4);
// the fourth 2-bit pattern is reserved and fails decode with
// `ESME_RINVREGDLVFLG`. The acknowledgement flags and intermediate
// notification bit decode tolerantly, since any combination is wire-valid.

/// SMSC delivery receipt sub-field (bits 0-1).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum SmscDeliveryReceipt {
    #[default]
    None = 0b00,
    OnSuccessOrFailure = 0b01,
    OnFailureOnly = 0b10,
}

impl SmscDeliveryReceipt {
    fn from_bits(bits: u8) -> Option<Self> {
        Some(match bits & 0x03 {
            0b00 => SmscDeliveryReceipt::None,
            0b01 => SmscDeliveryReceipt::OnSuccessOrFailure,
            0b10 => SmscDeliveryReceipt::OnFailureOnly,
            _ => return None,
        })
    }
}

/// SME-originated acknowledgement sub-field (bits 2-3): two independent
/// flags, both settable at once.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct SmeAcknowledgements {
    pub delivery_acknowledgement: bool,
    pub manual_user_acknowledgement: bool,
}

impl SmeAcknowledgements {
    fn from_bits(bits: u8) -> Self {
        SmeAcknowledgements {
            delivery_acknowledgement: bits & 0x04 != 0,
            manual_user_acknowledgement: bits & 0x08 != 0,
        }
    }

    fn to_bits(self) -> u8 {
        let mut bits = 0u8;
        if self.delivery_acknowledgement {
            bits |= 0x04;
        }
        if self.manual_user_acknowledgement {
            bits |= 0x08;
        }
        bits
    }
}

/// The full `registered_delivery` field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub struct RegisteredDelivery {
    pub receipt: SmscDeliveryReceipt,
    pub sme_acks: SmeAcknowledgements,
    pub intermediate_notification: bool,
}

impl RegisteredDelivery {
    /// Decode a wire byte, failing if the receipt sub-field (bits 0-1) is
    /// the reserved pattern `0b11`.
    pub fn decode(byte: u8) -> Result<Self, u8> {
        let receipt = SmscDeliveryReceipt::from_bits(byte).ok_or(byte & 0x03)?;
        Ok(RegisteredDelivery {
            receipt,
            sme_acks: SmeAcknowledgements::from_bits(byte),
            intermediate_notification: byte & 0x10 != 0,
        })
    }

    pub fn to_byte(self) -> u8 {
        let mut bits = self.receipt as u8 & 0x03;
        bits |= self.sme_acks.to_bits();
        if self.intermediate_notification {
            bits |= 0x10;
        }
        bits
    }
}

impl From<RegisteredDelivery> for u8 {
    fn from(value: RegisteredDelivery) -> Self {
        value.to_byte()
    }
}
