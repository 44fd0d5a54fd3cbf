// source_subaddress / dest_subaddress (TLV tags 0x0202 / 0x0203): a
// one-byte type tag followed by type-specific address data. At least the
// type tag byte must be present.

use bytes::Bytes;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubaddressType {
    NsapEven,
    NsapOdd,
    UserSpecified,
    Other(u8),
}

impl SubaddressType {
    fn from_byte(byte: u8) -> Self {
        match byte {
            0x80 => SubaddressType::NsapEven,
            0x88 => SubaddressType::NsapOdd,
            0xA0 => SubaddressType::UserSpecified,
            other => SubaddressType::Other(other),
        }
    }

    fn to_byte(self) -> u8 {
        match self {
            SubaddressType::NsapEven => 0x80,
            SubaddressType::NsapOdd => 0x88,
            SubaddressType::UserSpecified => 0xA0,
            SubaddressType::Other(byte) => byte,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Subaddress {
    pub subaddress_type: SubaddressType,
    pub data: Bytes,
}

impl Subaddress {
    pub fn decode(value: &[u8]) -> Result<Self, &'static str> {
        if value.len() < 2 {
            return Err("subaddress value must be at least 2 bytes");
        }
        Ok(Subaddress {
            subaddress_type: SubaddressType::from_byte(value[0]),
            data: Bytes::copy_from_slice(&value[1..]),
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.data.len());
        out.push(self.subaddress_type.to_byte());
        out.extend_from_slice(&self.data);
        out
    }
}
