#![allow(non_camel_case_types, non_snake_case)]

use encoding::all::{MAC_CYRILLIC, MAC_ROMAN, UTF_16BE};
use encoding::{DecoderTrap, EncoderTrap, Encoding, EncodingRef};
use itertools::Itertools;
use otspec::tables;
use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serialize,
};
use std::collections::HashMap;
use std::convert::TryInto;

/// The 'name' OpenType tag.
pub const TAG: Tag = crate::tag!("name");

/// Windows platform ID
pub const PLATFORM_WINDOWS: uint16 = 3;
/// Windows Unicode BMP encoding ID
pub const ENCODING_WINDOWS_BMP: uint16 = 1;
/// Windows language ID for English (United States)
pub const LANGUAGE_ENGLISH_US: uint16 = 0x409;

/// Returns the codec for a platform/encoding pair, or `None` if the strings
/// are kept as raw bytes.
fn get_encoding(platform_id: u16, encoding_id: u16) -> Option<EncodingRef> {
    match (platform_id, encoding_id) {
        (0, _) => Some(UTF_16BE),
        (1, 0) => Some(MAC_ROMAN),
        (1, 7) => Some(MAC_CYRILLIC),
        (3, 0) | (3, 1) | (3, 10) => Some(UTF_16BE),
        _ => None,
    }
}

/// Descriptive names of the name table nameID entries
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NameRecordID {
    /// Copyright notice
    Copyright,
    /// Font Family name
    FontFamilyName,
    /// Font Subfamily name
    FontSubfamilyName,
    /// Unique font identifier
    UniqueID,
    /// Full font name that reflects all family and relevant subfamily descriptors
    FullFontName,
    /// Version string
    Version,
    /// PostScript name for the font
    PostscriptName,
    /// Trademark
    Trademark,
    /// Manufacturer Name
    Manufacturer,
    /// Designer
    Designer,
    /// Description
    Description,
    /// URL Vendor
    ManufacturerURL,
    /// URL Designer
    DesignerURL,
    /// License Description
    License,
    /// License Info URL
    LicenseURL,
    /// Reserved
    Reserved,
    /// Typographic Family name
    PreferredFamilyName,
    /// Typographic Subfamily name
    PreferredSubfamilyName,
}

impl From<NameRecordID> for u16 {
    fn from(namerecord: NameRecordID) -> u16 {
        namerecord as u16
    }
}

tables!(
    NameRecordInternal {
        uint16 platformID
        uint16 encodingID
        uint16 languageID
        uint16 nameID
        uint16 length
        uint16 stringOffset
    }
    LangTagRecord {
        uint16 length
        uint16 langTagOffset
    }
);

/// A single name record to be placed inside the name table
#[derive(Debug, PartialEq, Clone)]
pub struct NameRecord {
    /// Platform ID (0=Unicode, 1=Macintosh, 3=Windows)
    pub platformID: uint16,
    /// Identifier for encoding of string content. Platform-specific.
    pub encodingID: uint16,
    /// Identifier for language of string content. Platform-specific.
    pub languageID: uint16,
    /// The numeric identifier representing the type of data. See NameRecordID.
    pub nameID: uint16,
    /// The actual content
    pub string: String,
}

impl NameRecord {
    /// Create a new name record for the Windows platform in Unicode encoding
    /// (3,1,0x409)
    pub fn windows_unicode<T, U>(n: T, s: U) -> NameRecord
    where
        T: Into<u16>,
        U: Into<String>,
    {
        NameRecord {
            platformID: PLATFORM_WINDOWS,
            encodingID: ENCODING_WINDOWS_BMP,
            languageID: LANGUAGE_ENGLISH_US,
            nameID: n.into(),
            string: s.into(),
        }
    }

    fn sort_key(&self) -> (u16, u16, u16, u16) {
        (self.platformID, self.encodingID, self.languageID, self.nameID)
    }
}

/// A name record in an encoding we do not decode. Its bytes are written
/// back untouched.
#[derive(Debug, PartialEq, Clone)]
pub struct OpaqueNameRecord {
    pub platformID: uint16,
    pub encodingID: uint16,
    pub languageID: uint16,
    pub nameID: uint16,
    pub data: Vec<u8>,
}

/// Represents a font's name (Naming) table
#[derive(Debug, PartialEq, Clone, Default)]
pub struct name {
    pub records: Vec<NameRecord>,
    pub opaque: Vec<OpaqueNameRecord>,
    /// Language tags of a version 1 table; language IDs from 0x8000 index into these.
    pub langTags: Vec<String>,
}

impl name {
    /// Records with the given name ID, in table order.
    pub fn records_for<T: Into<u16>>(&self, n: T) -> impl Iterator<Item = &NameRecord> {
        let n = n.into();
        self.records.iter().filter(move |r| r.nameID == n)
    }
}

fn storage_slice<'a>(
    storage: &'a [u8],
    offset: u16,
    length: u16,
) -> Result<&'a [u8], DeserializationError> {
    let start = offset as usize;
    let end = start + length as usize;
    storage.get(start..end).ok_or_else(|| {
        DeserializationError(format!(
            "name string at {}..{} outside of {} byte storage area",
            start,
            end,
            storage.len()
        ))
    })
}

impl Deserialize for name {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let version: uint16 = c.de()?;
        let count: uint16 = c.de()?;
        let storage_offset: uint16 = c.de()?;
        let internal_records: Vec<NameRecordInternal> = c.de_counted(count.into())?;
        let lang_tag_records: Vec<LangTagRecord> = if version > 0 {
            let lang_tag_count: uint16 = c.de()?;
            c.de_counted(lang_tag_count.into())?
        } else {
            vec![]
        };
        c.seek(storage_offset as usize)?;
        let storage = c.rest();

        let mut table = name::default();
        for lt in lang_tag_records {
            let bytes = storage_slice(&storage, lt.langTagOffset, lt.length)?;
            let tag = UTF_16BE
                .decode(bytes, DecoderTrap::Replace)
                .map_err(|e| DeserializationError(e.into_owned()))?;
            table.langTags.push(tag);
        }
        for ir in internal_records {
            let string_as_bytes = storage_slice(&storage, ir.stringOffset, ir.length)?;
            match get_encoding(ir.platformID, ir.encodingID) {
                Some(encoding) => {
                    let string = encoding
                        .decode(string_as_bytes, DecoderTrap::Replace)
                        .map_err(|e| DeserializationError(e.into_owned()))?;
                    table.records.push(NameRecord {
                        string,
                        platformID: ir.platformID,
                        encodingID: ir.encodingID,
                        languageID: ir.languageID,
                        nameID: ir.nameID,
                    })
                }
                None => {
                    log::debug!(
                        "Keeping name ID {} ({},{},{:#x}) as raw bytes",
                        ir.nameID,
                        ir.platformID,
                        ir.encodingID,
                        ir.languageID
                    );
                    table.opaque.push(OpaqueNameRecord {
                        platformID: ir.platformID,
                        encodingID: ir.encodingID,
                        languageID: ir.languageID,
                        nameID: ir.nameID,
                        data: string_as_bytes.to_vec(),
                    })
                }
            }
        }
        Ok(table)
    }
}

/// Collects strings into the storage area, sharing identical byte runs.
#[derive(Default)]
struct StringPool {
    data: Vec<u8>,
    seen: HashMap<Vec<u8>, uint16>,
}

impl StringPool {
    fn add(&mut self, bytes: Vec<u8>) -> Result<(uint16, uint16), SerializationError> {
        let length: uint16 = bytes
            .len()
            .try_into()
            .map_err(|_| SerializationError("name string longer than 65535 bytes".to_string()))?;
        if let Some(&offset) = self.seen.get(&bytes) {
            return Ok((offset, length));
        }
        let offset: uint16 = self
            .data
            .len()
            .try_into()
            .map_err(|_| SerializationError("name table storage overflow".to_string()))?;
        self.data.extend(&bytes);
        self.seen.insert(bytes, offset);
        Ok((offset, length))
    }
}

fn encode(record: &NameRecord) -> Vec<u8> {
    let encoder = get_encoding(record.platformID, record.encodingID).unwrap_or(UTF_16BE);
    match encoder.encode(&record.string, EncoderTrap::Strict) {
        Ok(bytes) => bytes,
        Err(_) => {
            log::warn!(
                "Name ID {} {:?} cannot be fully represented in platform {} encoding {}",
                record.nameID,
                record.string,
                record.platformID,
                record.encodingID
            );
            encoder
                .encode(&record.string, EncoderTrap::Replace)
                .unwrap_or_default()
        }
    }
}

impl Serialize for name {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        let encoded = self
            .records
            .iter()
            .map(|r| (r.sort_key(), encode(r)))
            .chain(self.opaque.iter().map(|r| {
                (
                    (r.platformID, r.encodingID, r.languageID, r.nameID),
                    r.data.clone(),
                )
            }))
            .sorted_by_key(|(key, _)| *key)
            .collect::<Vec<_>>();

        let version: uint16 = if self.langTags.is_empty() { 0 } else { 1 };
        let mut header_len = 6 + 12 * encoded.len();
        if version > 0 {
            header_len += 2 + 4 * self.langTags.len();
        }
        let storage_offset: uint16 = header_len
            .try_into()
            .map_err(|_| SerializationError("too many name records".to_string()))?;

        let mut pool = StringPool::default();
        let mut internal = Vec::with_capacity(encoded.len());
        for ((platformID, encodingID, languageID, nameID), bytes) in encoded {
            let (stringOffset, length) = pool.add(bytes)?;
            internal.push(NameRecordInternal {
                platformID,
                encodingID,
                languageID,
                nameID,
                length,
                stringOffset,
            });
        }
        let mut lang_tag_records = Vec::with_capacity(self.langTags.len());
        for tag in &self.langTags {
            let bytes = UTF_16BE
                .encode(tag, EncoderTrap::Replace)
                .map_err(|e| SerializationError(e.into_owned()))?;
            let (langTagOffset, length) = pool.add(bytes)?;
            lang_tag_records.push(LangTagRecord {
                length,
                langTagOffset,
            });
        }

        version.to_bytes(data)?;
        (internal.len() as uint16).to_bytes(data)?;
        storage_offset.to_bytes(data)?;
        internal.to_bytes(data)?;
        if version > 0 {
            (lang_tag_records.len() as uint16).to_bytes(data)?;
            lang_tag_records.to_bytes(data)?;
        }
        pool.data.to_bytes(data)
    }
}
