#![allow(non_camel_case_types, non_snake_case)]

use otspec::tables;
use otspec::types::*;
use otspec::{
    DeserializationError, Deserialize, Deserializer, ReaderContext, SerializationError, Serialize,
};

/// The 'OS/2' OpenType tag.
pub const TAG: Tag = crate::tag!("OS/2");

tables!(
    Panose {
        u8 panose0
        u8 panose1
        u8 panose2
        u8 panose3
        u8 panose4
        u8 panose5
        u8 panose6
        u8 panose7
        u8 panose8
        u8 panose9
    }
    os2core {
        uint16	version
        int16	xAvgCharWidth
        uint16	usWeightClass
        uint16	usWidthClass
        uint16	fsType
        int16	ySubscriptXSize
        int16	ySubscriptYSize
        int16	ySubscriptXOffset
        int16	ySubscriptYOffset
        int16	ySuperscriptXSize
        int16	ySuperscriptYSize
        int16	ySuperscriptXOffset
        int16	ySuperscriptYOffset
        int16	yStrikeoutSize
        int16	yStrikeoutPosition
        int16	sFamilyClass
        Panose	panose
        uint32	ulUnicodeRange1
        uint32	ulUnicodeRange2
        uint32	ulUnicodeRange3
        uint32	ulUnicodeRange4
        Tag	achVendID
        uint16	fsSelection
        uint16	usFirstCharIndex
        uint16	usLastCharIndex
        int16	sTypoAscender
        int16	sTypoDescender
        int16	sTypoLineGap
        uint16	usWinAscent
        uint16	usWinDescent
    }
    os2v1 {
        uint32   ulCodePageRange1
        uint32   ulCodePageRange2
    }
    os2v2 {
        int16	sxHeight
        int16	sCapHeight
        uint16	usDefaultChar
        uint16	usBreakChar
        uint16	usMaxContext
    }
    os2v5 {
        uint16	usLowerOpticalPointSize
        uint16	usUpperOpticalPointSize
    }
);

/// Represents a font's OS/2 (OS/2 and Windows Metrics) table
///
/// The fields shared by every version live in `core`; the later additions
/// are present according to `core.version`.
#[derive(Debug, PartialEq, Clone, Default)]
pub struct os2 {
    pub core: os2core,
    /// Code page ranges (version 1 and later)
    pub codePages: Option<os2v1>,
    /// x-height, cap height and friends (version 2 and later)
    pub extended: Option<os2v2>,
    /// Optical size range (version 5)
    pub opticalSize: Option<os2v5>,
}

impl Serialize for os2 {
    fn to_bytes(&self, data: &mut Vec<u8>) -> Result<(), SerializationError> {
        self.core.to_bytes(data)?;
        let version = self.core.version;
        if version > 0 {
            self.codePages.clone().unwrap_or_default().to_bytes(data)?;
        }
        if version > 1 {
            self.extended.clone().unwrap_or_default().to_bytes(data)?;
        }
        if version > 4 {
            self.opticalSize.clone().unwrap_or_default().to_bytes(data)?;
        }
        Ok(())
    }
}

impl Deserialize for os2 {
    fn from_bytes(c: &mut ReaderContext) -> Result<Self, DeserializationError> {
        let core: os2core = c.de()?;
        let version = core.version;
        let mut res = os2 {
            core,
            ..Default::default()
        };
        if version > 0 {
            res.codePages = Some(c.de()?);
        }
        if version > 1 {
            res.extended = Some(c.de()?);
        }
        if version > 4 {
            res.opticalSize = Some(c.de()?);
        }
        if c.remaining() > 0 {
            log::debug!(
                "Ignoring {} trailing bytes in OS/2 version {} table",
                c.remaining(),
                version
            );
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otspec::{de, ser};
    use pretty_assertions::assert_eq;

    fn core(version: uint16) -> os2core {
        os2core {
            version,
            xAvgCharWidth: 520,
            usWeightClass: 400,
            usWidthClass: 5,
            achVendID: *b"NONE",
            sTypoAscender: 800,
            sTypoDescender: -200,
            sTypoLineGap: 0,
            usWinAscent: 950,
            usWinDescent: 250,
            ..Default::default()
        }
    }

    #[test]
    fn version0_is_78_bytes() {
        let table = os2 {
            core: core(0),
            ..Default::default()
        };
        let bytes = ser::to_bytes(&table).unwrap();
        assert_eq!(bytes.len(), 78);
        let back: os2 = de::from_bytes(&bytes).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn version4_roundtrip() {
        let table = os2 {
            core: core(4),
            codePages: Some(os2v1 {
                ulCodePageRange1: 1,
                ulCodePageRange2: 0x80000000,
            }),
            extended: Some(os2v2 {
                sxHeight: 500,
                sCapHeight: 700,
                usDefaultChar: 0,
                usBreakChar: 32,
                usMaxContext: 2,
            }),
            opticalSize: None,
        };
        let bytes = ser::to_bytes(&table).unwrap();
        assert_eq!(bytes.len(), 96);
        // Second code page range is written from its own field
        assert_eq!(&bytes[82..86], &[0x80, 0x00, 0x00, 0x00]);
        let back: os2 = de::from_bytes(&bytes).unwrap();
        assert_eq!(back, table);
    }

    #[test]
    fn version5_fills_missing_parts() {
        let table = os2 {
            core: core(5),
            ..Default::default()
        };
        let bytes = ser::to_bytes(&table).unwrap();
        assert_eq!(bytes.len(), 100);
        let back: os2 = de::from_bytes(&bytes).unwrap();
        assert_eq!(back.opticalSize, Some(os2v5::default()));
        assert_eq!(back.core.usWinDescent, 250);
    }

    #[test]
    fn metrics_positions() {
        let bytes = ser::to_bytes(&os2 {
            core: core(0),
            ..Default::default()
        })
        .unwrap();
        // sTypoAscender at 68, usWinDescent at 76
        assert_eq!(&bytes[68..70], &800i16.to_be_bytes());
        assert_eq!(&bytes[70..72], &(-200i16).to_be_bytes());
        assert_eq!(&bytes[76..78], &250u16.to_be_bytes());
    }

    #[test]
    fn truncated_table_fails() {
        let mut bytes = ser::to_bytes(&os2 {
            core: core(1),
            ..Default::default()
        })
        .unwrap();
        bytes.truncate(80);
        assert!(de::from_bytes::<os2>(&bytes).is_err());
    }
}
