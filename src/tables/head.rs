#![allow(non_snake_case)]
use otspec::tables;
use otspec::types::*;

/// The 'head' OpenType tag.
pub const TAG: Tag = crate::tag!("head");

/// Byte offset of `checksumAdjustment` inside the table.
pub const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// The font-wide checksum target, `0xB1B0AFBA` minus the sum of the file.
pub const CHECKSUM_MAGIC: u32 = 0xB1B0AFBA;

tables!(head {
    uint16 majorVersion
    uint16 minorVersion
    Fixed fontRevision
    uint32 checksumAdjustment
    uint32 magicNumber
    uint16 flags
    uint16 unitsPerEm
    LONGDATETIME created
    LONGDATETIME modified
    int16 xMin
    int16 yMin
    int16 xMax
    int16 yMax
    uint16 macStyle
    uint16 lowestRecPPEM
    int16 fontDirectionHint
    int16 indexToLocFormat
    int16 glyphDataFormat
});

/// Create a new `head` table, given a float font revision and units-per-em
/// value. Bounding box fields are left at zero.
pub fn new(fontRevision: f32, upm: uint16) -> head {
    let now: LONGDATETIME = chrono::Utc::now().naive_utc().into();
    head {
        majorVersion: 1,
        minorVersion: 0,
        fontRevision: fontRevision.into(),
        checksumAdjustment: 0x0,
        magicNumber: 0x5F0F3CF5,
        flags: 3,
        unitsPerEm: upm,
        created: now,
        modified: now,
        xMin: 0,
        yMin: 0,
        xMax: 0,
        yMax: 0,
        macStyle: 0,
        lowestRecPPEM: 6,
        fontDirectionHint: 2,
        indexToLocFormat: 0,
        glyphDataFormat: 0,
    }
}
