use crate::error::*;
use crate::table_store::{Table, TableSet};
use crate::tables::head;
use otspec::tables;
use otspec::types::*;
use otspec::{Deserializer, ReaderContext};
use snafu::{ensure, ResultExt};
use std::fs::File;
use std::io::{Read, Write};
use std::num::Wrapping;
use std::path::Path;

/// The flavour of outlines a font carries, as recorded in its header.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SfntVersion {
    TrueType = 0x00010000,
    OpenType = 0x4F54544F,
    /// Apple's older tag for TrueType outlines
    AppleTrueType = 0x74727565,
}

const TTC_TAG: u32 = 0x74746366;

impl SfntVersion {
    fn from_u32(version: u32) -> Option<SfntVersion> {
        match version {
            0x00010000 => Some(SfntVersion::TrueType),
            0x4F54544F => Some(SfntVersion::OpenType),
            0x74727565 => Some(SfntVersion::AppleTrueType),
            _ => None,
        }
    }
}

tables!(
    OffsetTable {
        uint32 sfntVersion
        uint16 numTables
        uint16 searchRange
        uint16 entrySelector
        uint16 rangeShift
    }
    TableRecord {
        Tag tag
        uint32 checksum
        uint32 offset
        uint32 length
    }
);

/// An OpenType font: its outline flavour and its tables.
#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    pub sfntVersion: SfntVersion,
    pub tables: TableSet,
}

#[allow(non_snake_case)]
impl Font {
    pub fn new(sfntVersion: SfntVersion) -> Self {
        Self {
            sfntVersion,
            tables: TableSet::default(),
        }
    }

    /// Load a font from a file on disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Font, FontError> {
        let path = path.as_ref();
        let file = File::open(path).context(IOSnafu { path })?;
        log::debug!("Loading font from {}", path.display());
        load(file)
    }

    /// Parse a font from its binary representation.
    pub fn from_bytes(data: &[u8]) -> Result<Font, FontError> {
        let mut rc = ReaderContext::new(data.to_vec());
        let header: OffsetTable = rc.de().context(HeaderSnafu)?;
        ensure!(header.sfntVersion != TTC_TAG, CollectionSnafu);
        let sfntVersion =
            SfntVersion::from_u32(header.sfntVersion).ok_or(FontError::UnknownSfntVersion {
                version: header.sfntVersion,
            })?;
        let records: Vec<TableRecord> = rc
            .de_counted(header.numTables.into())
            .context(HeaderSnafu)?;

        let mut font = Font::new(sfntVersion);
        for record in records {
            let tag = tag_to_string(&record.tag);
            let start = record.offset as usize;
            let end = start
                .checked_add(record.length as usize)
                .filter(|&end| end <= data.len());
            let end = match end {
                Some(end) => end,
                None => {
                    return TableBoundsSnafu {
                        tag,
                        offset: record.offset,
                        length: record.length,
                        file_length: data.len(),
                    }
                    .fail()
                }
            };
            let table_data = &data[start..end];
            if record.tag != head::TAG && checksum(table_data) != record.checksum {
                log::debug!("Checksum mismatch in {} table", tag);
            }
            let table = Table::from_bytes(record.tag, table_data).context(TableParseSnafu {
                tag: tag.clone(),
            })?;
            font.tables.insert(record.tag, table);
        }
        Ok(font)
    }

    /// Serialize the font, computing table checksums and the `head`
    /// checksum adjustment.
    pub fn to_bytes(&self) -> Result<Vec<u8>, FontError> {
        let count = self.tables.len();
        // searchRange must fit in a uint16
        ensure!(count < 4096, TooManyTablesSnafu { count });
        let numTables = count as u16;
        let (searchRange, entrySelector, rangeShift) = search_params(numTables);

        let mut directory: Vec<u8> = vec![];
        let mut output: Vec<u8> = vec![];
        let header = OffsetTable {
            sfntVersion: self.sfntVersion as u32,
            numTables,
            searchRange,
            entrySelector,
            rangeShift,
        };
        otspec::Serialize::to_bytes(&header, &mut directory).context(TableSerializeSnafu {
            tag: "table directory",
        })?;

        let data_start = 12 + 16 * count;
        let mut head_offset = None;
        for (tag, table) in self.tables.iter() {
            let mut bytes = table.to_bytes().context(TableSerializeSnafu {
                tag: tag_to_string(tag),
            })?;
            let offset = data_start + output.len();
            if *tag == head::TAG {
                // Checksums are computed with the adjustment zeroed
                let at = head::CHECKSUM_ADJUSTMENT_OFFSET;
                if let Some(adjustment) = bytes.get_mut(at..at + 4) {
                    adjustment.copy_from_slice(&[0, 0, 0, 0]);
                    head_offset = Some(offset + at);
                }
            }
            let record = TableRecord {
                tag: *tag,
                checksum: checksum(&bytes),
                offset: offset as u32,
                length: bytes.len() as u32,
            };
            otspec::Serialize::to_bytes(&record, &mut directory).context(
                TableSerializeSnafu {
                    tag: tag_to_string(tag),
                },
            )?;
            while (bytes.len() % 4) != 0 {
                bytes.push(0);
            }
            output.extend(bytes);
        }
        directory.extend(output);

        if let Some(at) = head_offset {
            let adjustment = head::CHECKSUM_MAGIC.wrapping_sub(checksum(&directory));
            directory[at..at + 4].copy_from_slice(&adjustment.to_be_bytes());
        }
        Ok(directory)
    }

    /// Write the font out, stamping `head.modified` with the current time.
    pub fn save<W: Write>(&mut self, writer: &mut W) -> Result<(), FontError> {
        if let Some(head) = self.tables.head_mut() {
            if let Some(previous) = head.modified.to_datetime() {
                log::debug!("Font was last modified {}", previous);
            }
            head.modified = chrono::Utc::now().naive_utc().into();
        }
        let bytes = self.to_bytes()?;
        log::debug!("Writing {} bytes of font data", bytes.len());
        writer.write_all(&bytes).context(WriteSnafu)
    }
}

/// Read a font from anything readable.
pub fn load<R: Read>(mut reader: R) -> Result<Font, FontError> {
    let mut data = vec![];
    reader.read_to_end(&mut data).context(ReadSnafu)?;
    Font::from_bytes(&data)
}

fn log_2(x: u16) -> u16 {
    if x == 0 {
        return 0;
    }
    (15 - x.leading_zeros()) as u16
}

/// `searchRange`, `entrySelector` and `rangeShift` for the table directory.
fn search_params(num_tables: u16) -> (u16, u16, u16) {
    if num_tables == 0 {
        return (0, 0, 0);
    }
    let entry_selector = log_2(num_tables);
    let search_range = (1u16 << entry_selector) * 16;
    (
        search_range,
        entry_selector,
        num_tables * 16 - search_range,
    )
}

/// The OpenType checksum: the wrapping sum of big-endian u32 words,
/// zero-padding the final word.
pub fn checksum(x: &[u8]) -> u32 {
    let mut sum = Wrapping(0u32);
    for slice in x.chunks(4) {
        let mut word = [0u8; 4];
        word[..slice.len()].copy_from_slice(slice);
        sum += Wrapping(u32::from_be_bytes(word));
    }
    sum.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::{hhea, name, os2};
    use crate::tag;
    use pretty_assertions::assert_eq;

    fn test_font() -> Font {
        let mut font = Font::new(SfntVersion::TrueType);
        font.tables.insert(head::TAG, Table::Head(head::new(1.0, 1000)));
        font.tables.insert(
            hhea::TAG,
            Table::Hhea(hhea::hhea {
                majorVersion: 1,
                ascender: 800,
                descender: -200,
                ..Default::default()
            }),
        );
        font.tables.insert(
            os2::TAG,
            Table::Os2(os2::os2 {
                core: os2::os2core {
                    version: 0,
                    usWinAscent: 900,
                    usWinDescent: 250,
                    ..Default::default()
                },
                ..Default::default()
            }),
        );
        font.tables.insert(
            name::TAG,
            Table::Name(name::name {
                records: vec![name::NameRecord::windows_unicode(
                    name::NameRecordID::FontFamilyName,
                    "Foo Sans",
                )],
                ..Default::default()
            }),
        );
        font.tables.insert_raw(tag!("DSIG"), vec![0, 0, 0, 1, 0, 0, 0, 0]);
        font
    }

    #[test]
    fn test_checksum() {
        let binary_hhea = vec![
            0x00, 0x01, 0x00, 0x00, 0x02, 0xc1, 0xff, 0x4c, 0x00, 0x00, 0x05, 0x1f, 0xfe, 0x82,
            0xfe, 0x82, 0x04, 0xdd, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x04, 0x5d,
        ];
        assert_eq!(checksum(&binary_hhea), 0x0623074B)
    }

    #[test]
    fn checksum_pads_final_word() {
        assert_eq!(checksum(&[0x01, 0x02, 0x03, 0x04, 0x05]), 0x06020304);
    }

    #[test]
    fn directory_search_params() {
        assert_eq!(search_params(1), (16, 0, 0));
        assert_eq!(search_params(3), (32, 1, 16));
        assert_eq!(search_params(9), (128, 3, 16));
        assert_eq!(search_params(16), (256, 4, 0));
    }

    #[test]
    fn roundtrip() {
        let font = test_font();
        let bytes = font.to_bytes().unwrap();
        let mut back = Font::from_bytes(&bytes).unwrap();
        assert_eq!(back.sfntVersion, SfntVersion::TrueType);
        assert_eq!(back.tables.hhea(), font.tables.hhea());
        assert_eq!(back.tables.os2(), font.tables.os2());
        assert_eq!(back.tables.name(), font.tables.name());
        assert_eq!(
            back.tables.get(&tag!("DSIG")),
            Some(&Table::Unknown(vec![0, 0, 0, 1, 0, 0, 0, 0]))
        );
        // The stored adjustment is whatever made the file sum come out right
        back.tables.head_mut().unwrap().checksumAdjustment = 0;
        let mut expected_head = font.tables.head().unwrap().clone();
        expected_head.checksumAdjustment = 0;
        assert_eq!(back.tables.head(), Some(&expected_head));
    }

    #[test]
    fn whole_font_checksum() {
        let bytes = test_font().to_bytes().unwrap();
        assert_eq!(checksum(&bytes), head::CHECKSUM_MAGIC);
        // Tables are 4-byte aligned
        assert_eq!(bytes.len() % 4, 0);
    }

    #[test]
    fn save_stamps_modified() {
        let mut font = test_font();
        font.tables.head_mut().unwrap().modified = otspec::types::LONGDATETIME(0);
        let mut out: Vec<u8> = vec![];
        font.save(&mut out).unwrap();
        let back = load(&out[..]).unwrap();
        assert!(back.tables.head().unwrap().modified.0 > 0);
    }

    #[test]
    fn rejects_collections() {
        let ttc = vec![0x74, 0x74, 0x63, 0x66, 0, 1, 0, 0, 0, 0, 0, 0];
        assert!(matches!(
            Font::from_bytes(&ttc),
            Err(FontError::Collection)
        ));
    }

    #[test]
    fn rejects_other_formats() {
        let woff = b"wOFF\x00\x01\x00\x00\x00\x00\x00\x00".to_vec();
        assert!(matches!(
            Font::from_bytes(&woff),
            Err(FontError::UnknownSfntVersion {
                version: 0x774f4646
            })
        ));
    }

    #[test]
    fn rejects_truncated_tables() {
        let mut bytes = test_font().to_bytes().unwrap();
        bytes.truncate(bytes.len() - 8);
        assert!(matches!(
            Font::from_bytes(&bytes),
            Err(FontError::TableBounds { .. })
        ));
    }
}
