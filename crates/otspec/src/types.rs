use crate::DeserializationError;
use crate::Deserialize;
use crate::Deserializer;
use crate::ReaderContext;
use crate::SerializationError;
use crate::Serialize;
use chrono::{DateTime, NaiveDateTime};

pub type uint16 = u16;
pub type uint32 = u32;
pub type int16 = i16;
pub type FWORD = i16;
pub type UFWORD = u16;

pub type Tag = [u8; 4];

/// Build a tag from a four-character string.
pub const fn tag(s: &str) -> Tag {
    let b = s.as_bytes();
    [b[0], b[1], b[2], b[3]]
}

#[macro_export]
macro_rules! tag {
    ($e: expr) => {
        $crate::types::tag($e)
    };
}

/// Printable form of a tag, for messages.
pub fn tag_to_string(t: &Tag) -> String {
    t.iter()
        .map(|&b| {
            if (0x20..=0x7e).contains(&b) {
                b as char
            } else {
                '?'
            }
        })
        .collect()
}

/// A 16.16 fixed-point number.
///
/// The raw bits are kept so that a value read from a font is written back
/// bit-for-bit; use `to_f32`/`From<f32>` for arithmetic.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Fixed(pub i32);

fn ot_round(value: f32) -> i32 {
    (value + 0.5).floor() as i32
}

impl Fixed {
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 65536.0
    }
}

impl Serialize for Fixed {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        self.0.to_bytes(data)
    }
}
impl Deserialize for Fixed {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let packed: i32 = c.de()?;
        Ok(Fixed(packed))
    }
}

impl From<f32> for Fixed {
    fn from(num: f32) -> Self {
        Self(ot_round(num * 65536.0))
    }
}
impl From<Fixed> for f32 {
    fn from(num: Fixed) -> Self {
        num.to_f32()
    }
}

/// Seconds since 1904-01-01 00:00:00.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct LONGDATETIME(pub i64);

/// Seconds from 1904-01-01 to the Unix epoch.
const UNIX_EPOCH_OFFSET: i64 = 2_082_844_800;

impl LONGDATETIME {
    /// The timestamp as a date, if it is representable.
    pub fn to_datetime(self) -> Option<NaiveDateTime> {
        let unix = self.0.checked_sub(UNIX_EPOCH_OFFSET)?;
        DateTime::from_timestamp(unix, 0).map(|d| d.naive_utc())
    }
}

impl Serialize for LONGDATETIME {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        self.0.to_bytes(data)
    }
}
impl Deserialize for LONGDATETIME {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let diff: i64 = c.de()?;
        Ok(LONGDATETIME(diff))
    }
}

impl From<NaiveDateTime> for LONGDATETIME {
    fn from(dt: NaiveDateTime) -> Self {
        Self(dt.and_utc().timestamp() + UNIX_EPOCH_OFFSET)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{de, ser};
    use chrono::NaiveDate;

    #[test]
    fn fixed_keeps_bits() {
        let f: Fixed = de::from_bytes(&[0x00, 0x01, 0x80, 0x01]).unwrap();
        assert_eq!(f, Fixed(0x00018001));
        assert_eq!(ser::to_bytes(&f).unwrap(), vec![0x00, 0x01, 0x80, 0x01]);
        assert!((f.to_f32() - 1.5).abs() < 0.001);
    }

    #[test]
    fn fixed_from_float() {
        assert_eq!(Fixed::from(1.0), Fixed(0x10000));
        assert_eq!(Fixed::from(-0.5), Fixed(-0x8000));
    }

    #[test]
    fn longdatetime() {
        let created = NaiveDate::from_ymd_opt(2020, 1, 28)
            .unwrap()
            .and_hms_opt(21, 31, 22)
            .unwrap();
        let ldt = LONGDATETIME::from(created);
        assert_eq!(
            ser::to_bytes(&ldt).unwrap(),
            vec![0x00, 0x00, 0x00, 0x00, 0xda, 0x56, 0x58, 0xaa]
        );
        assert_eq!(ldt.to_datetime(), Some(created));
    }

    #[test]
    fn absurd_longdatetime_has_no_date() {
        assert_eq!(LONGDATETIME(i64::MAX).to_datetime(), None);
    }

    #[test]
    fn tag_strings() {
        assert_eq!(tag("OS/2"), *b"OS/2");
        assert_eq!(tag_to_string(&[b'h', b'e', 0x01, b'd']), "he?d");
    }
}
