//! This library is used by the fontpatch crate. No user-serviceable parts inside.
#![allow(non_snake_case, non_camel_case_types, clippy::upper_case_acronyms)]
use crate::types::Tag;
use std::convert::TryInto;
use std::mem;
pub mod types;

#[derive(Debug, Clone, PartialEq)]
pub struct SerializationError(pub String);
#[derive(Debug, Clone, PartialEq)]
pub struct DeserializationError(pub String);

/// A cursor over a buffer of big-endian OpenType data.
pub struct ReaderContext {
    pub input: Vec<u8>,
    pub ptr: usize,
}

impl ReaderContext {
    pub fn new(input: Vec<u8>) -> Self {
        ReaderContext { input, ptr: 0 }
    }

    /// Take the next `bytes` bytes, advancing the cursor.
    pub fn consume(&mut self, bytes: usize) -> Result<&[u8], DeserializationError> {
        let end = self
            .ptr
            .checked_add(bytes)
            .filter(|&end| end <= self.input.len())
            .ok_or_else(|| {
                DeserializationError(format!(
                    "End of file: wanted {} bytes at offset {}, have {}",
                    bytes,
                    self.ptr,
                    self.input.len()
                ))
            })?;
        let start = self.ptr;
        self.ptr = end;
        Ok(&self.input[start..end])
    }

    /// Move the cursor to an absolute position in the buffer.
    pub fn seek(&mut self, pos: usize) -> Result<(), DeserializationError> {
        if pos > self.input.len() {
            return Err(DeserializationError(format!(
                "Seek to {} beyond end of data ({} bytes)",
                pos,
                self.input.len()
            )));
        }
        self.ptr = pos;
        Ok(())
    }

    pub fn remaining(&self) -> usize {
        self.input.len().saturating_sub(self.ptr)
    }

    /// Consume everything left in the buffer.
    pub fn rest(&mut self) -> Vec<u8> {
        let rest = self.input[self.ptr.min(self.input.len())..].to_vec();
        self.ptr = self.input.len();
        rest
    }
}

pub trait Serializer<T>
where
    T: Serialize,
{
    fn put(&mut self, data: T) -> Result<(), SerializationError>;
}

impl<T> Serializer<T> for Vec<u8>
where
    T: Serialize,
{
    fn put(&mut self, data: T) -> Result<(), SerializationError> {
        data.to_bytes(self)
    }
}

pub trait Deserializer<T>
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError>;
    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError>;
}

impl<T> Deserializer<T> for ReaderContext
where
    T: Deserialize,
{
    fn de(&mut self) -> Result<T, DeserializationError> {
        T::from_bytes(self)
    }
    fn de_counted(&mut self, s: usize) -> Result<Vec<T>, DeserializationError> {
        (0..s).map(|_| self.de()).collect()
    }
}

impl std::fmt::Display for SerializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Serialization error {:}", self.0)
    }
}

impl std::fmt::Display for DeserializationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Deserialization error {:}", self.0)
    }
}

impl std::error::Error for SerializationError {}
impl std::error::Error for DeserializationError {}

pub trait Serialize {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError>;
}

pub trait Deserialize {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError>
    where
        Self: std::marker::Sized;
}

macro_rules! serde_primitive {
    ($t: ty) => {
        impl Serialize for $t {
            fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
                data.extend_from_slice(&self.to_be_bytes());
                Ok(())
            }
        }

        impl Deserialize for $t {
            fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
                let bytes: &[u8] = c.consume(mem::size_of::<$t>())?;
                let bytes_array: [u8; mem::size_of::<$t>()] = bytes
                    .try_into()
                    .map_err(|_| DeserializationError("Slice with incorrect length".to_string()))?;
                Ok(<$t>::from_be_bytes(bytes_array))
            }
        }
    };
}

serde_primitive!(i8);
serde_primitive!(u8);
serde_primitive!(u16);
serde_primitive!(u32);
serde_primitive!(i16);
serde_primitive!(i32);
serde_primitive!(i64);

impl<T> Serialize for Vec<T>
where
    T: Serialize,
{
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        for el in self {
            el.to_bytes(data)?
        }
        Ok(())
    }
}

/// Reads elements until the data runs out.
impl<T> Deserialize for Vec<T>
where
    T: Deserialize,
{
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let mut res: Vec<T> = vec![];
        while c.remaining() > 0 {
            let start = c.ptr;
            match c.de() {
                Ok(x) => res.push(x),
                Err(_) => {
                    c.ptr = start;
                    break;
                }
            }
        }
        Ok(res)
    }
}

impl<T> Serialize for &T
where
    T: Serialize,
{
    fn to_bytes(
        &self,
        data: &mut std::vec::Vec<u8>,
    ) -> std::result::Result<(), SerializationError> {
        (*self).to_bytes(data)
    }
}

impl Serialize for Tag {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        data.extend_from_slice(self);
        Ok(())
    }
}

impl Deserialize for Tag {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        c.consume(4)?
            .try_into()
            .map_err(|_| DeserializationError("Slice with incorrect length".to_string()))
    }
}

/// Declares OpenType structures as a list of `type field` pairs.
///
/// Each structure becomes a plain struct with public fields, serialized and
/// deserialized field by field in declaration order:
///
/// ```
/// use otspec::types::*;
/// otspec::tables!(
///     Version {
///         uint16 majorVersion
///         uint16 minorVersion
///     }
/// );
/// let v: Version = otspec::de::from_bytes(&[0, 1, 0, 0]).unwrap();
/// assert_eq!(v.majorVersion, 1);
/// ```
#[macro_export]
macro_rules! tables {
    ($($name:ident { $($t:ident $field:ident)* })*) => {
        $(
            /// Low-level structure used for serializing/deserializing table
            #[allow(missing_docs, non_snake_case, non_camel_case_types)]
            #[derive(Debug, PartialEq, Clone, Default)]
            pub struct $name {
                $(pub $field: $t,)*
            }

            impl $crate::Serialize for $name {
                fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), $crate::SerializationError> {
                    $($crate::Serialize::to_bytes(&self.$field, data)?;)*
                    Ok(())
                }
            }

            impl $crate::Deserialize for $name {
                fn from_bytes(
                    c: &mut $crate::ReaderContext,
                ) -> Result<Self, $crate::DeserializationError> {
                    Ok($name {
                        $($field: <$t as $crate::Deserialize>::from_bytes(c)?,)*
                    })
                }
            }
        )*
    };
}

/* Provide a serde-style interface */
pub mod ser {
    use crate::SerializationError;
    use crate::Serialize;
    use crate::Serializer;

    pub fn to_bytes<T: Serialize>(data: &T) -> Result<Vec<u8>, SerializationError> {
        let mut out = vec![];
        out.put(data)?;
        Ok(out)
    }
}
pub mod de {
    pub use crate::{DeserializationError, Deserialize, Deserializer, ReaderContext};
    pub fn from_bytes<T: Deserialize>(data: &[u8]) -> Result<T, DeserializationError> {
        let mut rc = ReaderContext::new(data.to_vec());
        rc.de()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;
    use crate::types::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn ser_primitive() {
        let mut out = vec![];
        out.put(1_u16).unwrap();
        out.put(2_u16).unwrap();
        out.put(4_u32).unwrap();
        out.put(-2_i16).unwrap();
        assert_eq!(
            out,
            [0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x04, 0xff, 0xfe]
        );
    }

    #[test]
    fn de_primitive() {
        let mut rc = ReaderContext::new(vec![0x00, 0x01, 0x00, 0x02, 0x00, 0x00, 0x00, 0x04]);
        let first: u16 = rc.de().unwrap();
        let second: u16 = rc.de().unwrap();
        let third: u32 = rc.de().unwrap();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(third, 4);
        assert_eq!(rc.remaining(), 0);
    }

    #[test]
    fn de_past_end() {
        let mut rc = ReaderContext::new(vec![0x00]);
        let res: Result<u16, _> = rc.de();
        assert!(res.is_err());
        // A failed read leaves the cursor alone
        assert_eq!(rc.ptr, 0);
    }

    #[test]
    fn vec_reads_to_end() {
        let mut rc = ReaderContext::new(vec![0x00, 0x01, 0x00, 0x02, 0x03]);
        let v: Vec<u16> = rc.de().unwrap();
        assert_eq!(v, vec![1, 2]);
        assert_eq!(rc.remaining(), 1);
    }

    #[test]
    fn ser_vec() {
        let mut out = vec![];
        let t: Vec<u16> = vec![1, 2, 3];
        out.put(t).unwrap();
        assert_eq!(out, [0x00, 0x01, 0x00, 0x02, 0x00, 0x03]);
    }

    #[test]
    fn ser_tag() {
        let t = tag!("GSUB");
        let mut out = vec![];
        out.put(t).unwrap();
        assert_eq!(out, [0x47, 0x53, 0x55, 0x42]);
    }

    #[test]
    fn de_tag() {
        let mut rc = ReaderContext::new(vec![0x4f, 0x53, 0x2f, 0x32]);
        let t: Tag = rc.de().unwrap();
        assert_eq!(t, tag!("OS/2"));
    }

    tables!(
        Pair {
            uint16 first
            int16 second
        }
        Nested {
            uint32 header
            Pair pair
        }
    );

    #[test]
    fn tables_macro_roundtrip() {
        let n = Nested {
            header: 0x01020304,
            pair: Pair {
                first: 10,
                second: -1,
            },
        };
        let binary = vec![0x01, 0x02, 0x03, 0x04, 0x00, 0x0a, 0xff, 0xff];
        assert_eq!(ser::to_bytes(&n).unwrap(), binary);
        assert_eq!(de::from_bytes::<Nested>(&binary).unwrap(), n);
    }

    #[test]
    fn tables_macro_short_input() {
        let res = de::from_bytes::<Nested>(&[0x01, 0x02, 0x03, 0x04, 0x00]);
        assert!(res.is_err());
    }
}
