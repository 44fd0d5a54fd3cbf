// data_coding: selects the character set (and, for the GSM message-class
// bucket, the flash/ME/SIM/TE message class) used to interpret
// short_message/message_payload. Decode tries the GSM message-class bucket
// first, then a full-byte match against the named default schemes, and
// only falls back to a raw passthrough if neither matches.

/// A named data coding scheme matched by an exact byte value (SMPP v3.4
/// Section 5.2.19).
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DefaultScheme {
    SmscDefault,
    Ia5Ascii,
    Octet8Bit,
    Latin1,
    Octet8BitAlt,
    Jis,
    Cyrillic,
    LatinHebrew,
    Ucs2,
    PictogramEncoding,
    Iso2022JpMusicCodes,
    ExtendedKanjiJis,
    KsC5601,
}

const DEFAULT_TABLE: &[(u8, DefaultScheme)] = &[
    (0x00, DefaultScheme::SmscDefault),
    (0x01, DefaultScheme::Ia5Ascii),
    (0x02, DefaultScheme::Octet8Bit),
    (0x03, DefaultScheme::Latin1),
    (0x04, DefaultScheme::Octet8BitAlt),
    (0x05, DefaultScheme::Jis),
    (0x06, DefaultScheme::Cyrillic),
    (0x07, DefaultScheme::LatinHebrew),
    (0x08, DefaultScheme::Ucs2),
    (0x09, DefaultScheme::PictogramEncoding),
    (0x0A, DefaultScheme::Iso2022JpMusicCodes),
    (0x0D, DefaultScheme::ExtendedKanjiJis),
    (0x0E, DefaultScheme::KsC5601),
];

impl DefaultScheme {
    fn to_byte(self) -> u8 {
        DEFAULT_TABLE
            .iter()
            .find(|(_, s)| *s == self)
            .map(|(b, _)| *b)
            .expect("every DefaultScheme variant has a table entry")
    }
}

/// The GSM message-class bucket (high nibble 0xF): selects 7-bit or 8-bit
/// GSM alphabet and tags the message with a class (flash, ME-specific,
/// SIM-specific, or TE-specific). Bit 3 of the low nibble is unused by this
/// bucket and ignored on decode, so low nibbles 0x8-0xF alias 0x0-0x7.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GsmMessageClass {
    pub eight_bit: bool,
    pub class: u8,
}

/// `data_coding` field value.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DataCoding {
    Default(DefaultScheme),
    GsmMessageClass(GsmMessageClass),
    /// A byte that matches neither the GSM message-class bucket nor a
    /// named default scheme. Preserved verbatim rather than rejected.
    Raw(u8),
}

impl Default for DataCoding {
    fn default() -> Self {
        DataCoding::Default(DefaultScheme::SmscDefault)
    }
}

impl DataCoding {
    pub fn from_byte(byte: u8) -> Self {
        if byte & 0xf0 == 0xf0 {
            let low = byte & 0x0f;
            return DataCoding::GsmMessageClass(GsmMessageClass {
                eight_bit: low & 0x04 != 0,
                class: low & 0x03,
            });
        }
        if let Some((_, scheme)) = DEFAULT_TABLE.iter().find(|(b, _)| *b == byte) {
            return DataCoding::Default(*scheme);
        }
        DataCoding::Raw(byte)
    }

    pub fn to_byte(self) -> u8 {
        match self {
            DataCoding::Default(scheme) => scheme.to_byte(),
            DataCoding::GsmMessageClass(GsmMessageClass { eight_bit, class }) => {
                0xf0 | if eight_bit { 0x04 } else { 0 } | (class & 0x03)
            }
            DataCoding::Raw(byte) => byte,
        }
    }

    pub fn is_unicode(&self) -> bool {
        matches!(self, DataCoding::Default(DefaultScheme::Ucs2))
    }

    pub fn is_gsm_8bit(&self) -> bool {
        matches!(
            self,
            DataCoding::GsmMessageClass(GsmMessageClass {
                eight_bit: true,
                ..
            })
        ) || matches!(
            self,
            DataCoding::Default(DefaultScheme::Octet8Bit | DefaultScheme::Octet8BitAlt)
        )
    }
}

impl From<u8> for DataCoding {
    fn from(byte: u8) -> Self {
        DataCoding::from_byte(byte)
    }
}

impl From<DataCoding> for u8 {
    fn from(dc: DataCoding) -> Self {
        dc.to_byte()
    }
}
