// callback_num (TLV tag 0x0381): a digit-mode indicator, TON, NPI, and a
// variable-length digit string. At least the three leading bytes must be
// present; the digit string may be empty.

use bytes::Bytes;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CallbackNum {
    pub digit_mode: u8,
    pub ton: u8,
    pub npi: u8,
    pub digits: Bytes,
}

impl CallbackNum {
    pub fn decode(value: &[u8]) -> Result<Self, &'static str> {
        if value.len() < 3 {
            return Err("callback_num value must be at least 3 bytes");
        }
        Ok(CallbackNum {
            digit_mode: value[0],
            ton: value[1],
            npi: value[2],
            digits: Bytes::copy_from_slice(&value[3..]),
        })
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(3 + self.digits.len());
        out.push(self.digit_mode);
        out.push(self.ton);
        out.push(self.npi);
        out.extend_from_slice(&self.digits);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrips_with_digits() {
        let cn = CallbackNum {
            digit_mode: 1,
            ton: 1,
            npi: 1,
            digits: Bytes::from_static(b"5551234"),
        };
        let encoded = cn.encode();
        assert_eq!(CallbackNum::decode(&encoded).unwrap(), cn);
    }

    #[test]
    fn rejects_short_value() {
        assert!(CallbackNum::decode(&[1, 1]).is_err());
    }

    #[test]
    fn allows_empty_digit_string() {
        let decoded = CallbackNum::decode(&[0, 1, 1]).unwrap();
        assert!(decoded.digits.is_empty());
    }
}
