// schedule_delivery_time / validity_period / final_date: a COctetString that
// is either empty (null, meaning "immediate"/"none"), an absolute timestamp
// `YYMMDDhhmmsstnnp`, or a relative offset in the same shape with a
// trailing `R`. SMPP v3.4 Section 7.1.1.

use std::fmt;

/// A parsed `schedule_delivery_time`/`validity_period`/`final_date` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SmppTime {
    /// The field was empty: "immediate" for schedule_delivery_time, "none"
    /// for validity_period.
    Null,
    /// `YYMMDDhhmmsstnnp` with `p` one of `+`/`-`: an absolute timestamp at
    /// `nn` quarter-hours offset from UTC.
    Absolute(AbsoluteTime),
    /// `YYMMDDhhmmsstnnR`: `nn` quarter-hours relative to now.
    Relative(RelativeTime),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AbsoluteTime {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub tenths: u8,
    pub utc_offset_quarter_hours: u8,
    pub utc_offset_negative: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RelativeTime {
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub tenths: u8,
    pub utc_offset_quarter_hours: u8,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DateTimeError {
    #[error("time string must be 16 characters, got {0}")]
    WrongLength(usize),
    #[error("non-digit character at position {0}")]
    NotADigit(usize),
    #[error("final character must be '+', '-', or 'R', got {0:?}")]
    BadSign(char),
}

fn digit_pair(bytes: &[u8], pos: usize) -> Result<u8, DateTimeError> {
    let hi = (bytes[pos] as char).to_digit(10).ok_or(DateTimeError::NotADigit(pos))?;
    let lo = (bytes[pos + 1] as char)
        .to_digit(10)
        .ok_or(DateTimeError::NotADigit(pos + 1))?;
    Ok((hi * 10 + lo) as u8)
}

impl SmppTime {
    /// Parse the SMPP time grammar. An empty string is `Null`; anything else
    /// must be exactly 16 bytes, the first 15 digits, the 16th one of
    /// `+`/`-`/`R`.
    pub fn parse(s: &str) -> Result<Self, DateTimeError> {
        if s.is_empty() {
            return Ok(SmppTime::Null);
        }
        let bytes = s.as_bytes();
        if bytes.len() != 16 {
            return Err(DateTimeError::WrongLength(bytes.len()));
        }
        for (i, &b) in bytes.iter().enumerate().take(15) {
            if !b.is_ascii_digit() {
                return Err(DateTimeError::NotADigit(i));
            }
        }
        let year = digit_pair(bytes, 0)?;
        let month = digit_pair(bytes, 2)?;
        let day = digit_pair(bytes, 4)?;
        let hour = digit_pair(bytes, 6)?;
        let minute = digit_pair(bytes, 8)?;
        let second = digit_pair(bytes, 10)?;
        let tenths = (bytes[12] as char).to_digit(10).ok_or(DateTimeError::NotADigit(12))? as u8;
        let utc_offset_quarter_hours = digit_pair(bytes, 13)?;
        match bytes[15] {
            b'+' => Ok(SmppTime::Absolute(AbsoluteTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
                tenths,
                utc_offset_quarter_hours,
                utc_offset_negative: false,
            })),
            b'-' => Ok(SmppTime::Absolute(AbsoluteTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
                tenths,
                utc_offset_quarter_hours,
                utc_offset_negative: true,
            })),
            b'R' => Ok(SmppTime::Relative(RelativeTime {
                year,
                month,
                day,
                hour,
                minute,
                second,
                tenths,
                utc_offset_quarter_hours,
            })),
            other => Err(DateTimeError::BadSign(other as char)),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SmppTime::Null)
    }
}

impl fmt::Display for SmppTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SmppTime::Null => Ok(()),
            SmppTime::Absolute(t) => write!(
                f,
                "{:02}{:02}{:02}{:02}{:02}{:02}{}{:02}{}",
                t.year,
                t.month,
                t.day,
                t.hour,
                t.minute,
                t.second,
                t.tenths,
                t.utc_offset_quarter_hours,
                if t.utc_offset_negative { '-' } else { '+' }
            ),
            SmppTime::Relative(t) => write!(
                f,
                "{:02}{:02}{:02}{:02}{:02}{:02}{}{:02}R",
                t.year, t.month, t.day, t.hour, t.minute, t.second, t.tenths, t.utc_offset_quarter_hours
            ),
        }
    }
}
