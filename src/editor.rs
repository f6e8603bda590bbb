//! A narrow editing interface over a font: the vertical metrics, the three
//! naming fields and the Windows name table entries.
//!
//! Tools written against [`FontEditor`] rather than [`Font`] can be
//! exercised without a font file.

use crate::error::*;
use crate::font::Font;
use crate::tables::name::{self, NameRecord, NameRecordID};
use crate::tables::{hhea, os2};
use otspec::types::{tag_to_string, Tag};
use snafu::{OptionExt, ResultExt};
use std::fmt;
use std::fs::File;
use std::path::Path;

/// A vertical metric field.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Metric {
    /// OS/2 `usWinAscent`
    WinAscent,
    /// OS/2 `sTypoAscender`
    TypoAscender,
    /// hhea `ascender`
    HheaAscender,
    /// OS/2 `usWinDescent` (positive below the baseline)
    WinDescent,
    /// OS/2 `sTypoDescender` (negative below the baseline)
    TypoDescender,
    /// hhea `descender` (negative below the baseline)
    HheaDescender,
}

impl Metric {
    pub const ASCENTS: [Metric; 3] = [
        Metric::WinAscent,
        Metric::TypoAscender,
        Metric::HheaAscender,
    ];
    pub const DESCENTS: [Metric; 3] = [
        Metric::WinDescent,
        Metric::TypoDescender,
        Metric::HheaDescender,
    ];

    /// The table the field lives in.
    pub fn table(self) -> Tag {
        match self {
            Metric::HheaAscender | Metric::HheaDescender => hhea::TAG,
            _ => os2::TAG,
        }
    }

    /// Smallest and largest value the field can store.
    pub fn range(self) -> (i64, i64) {
        match self {
            Metric::WinAscent | Metric::WinDescent => (0, u16::MAX as i64),
            _ => (i16::MIN as i64, i16::MAX as i64),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Metric::WinAscent => "OS/2.usWinAscent",
            Metric::TypoAscender => "OS/2.sTypoAscender",
            Metric::HheaAscender => "hhea.ascender",
            Metric::WinDescent => "OS/2.usWinDescent",
            Metric::TypoDescender => "OS/2.sTypoDescender",
            Metric::HheaDescender => "hhea.descender",
        };
        f.write_str(s)
    }
}

/// One of the names a font is known by.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum NameField {
    /// The PostScript name
    FontName,
    FamilyName,
    FullName,
}

impl NameField {
    pub fn name_id(self) -> NameRecordID {
        match self {
            NameField::FontName => NameRecordID::PostscriptName,
            NameField::FamilyName => NameRecordID::FontFamilyName,
            NameField::FullName => NameRecordID::FullFontName,
        }
    }
}

impl fmt::Display for NameField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NameField::FontName => "font name",
            NameField::FamilyName => "family name",
            NameField::FullName => "full name",
        };
        f.write_str(s)
    }
}

/// A (language, name ID, string) triple from the Windows name records.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SfntName {
    pub language: u16,
    pub name_id: u16,
    pub string: String,
}

impl SfntName {
    /// A name in English (US).
    pub fn english<T, U>(name_id: T, string: U) -> SfntName
    where
        T: Into<u16>,
        U: Into<String>,
    {
        SfntName {
            language: name::LANGUAGE_ENGLISH_US,
            name_id: name_id.into(),
            string: string.into(),
        }
    }
}

/// The font operations a metrics patcher needs.
pub trait FontEditor {
    /// Current value of a vertical metric.
    fn metric(&self, metric: Metric) -> Result<i64, FontError>;
    /// Store a vertical metric; fails if the field cannot hold the value.
    fn set_metric(&mut self, metric: Metric, value: i64) -> Result<(), FontError>;
    fn name(&self, field: NameField) -> Result<String, FontError>;
    fn set_name(&mut self, field: NameField, value: &str) -> Result<(), FontError>;
    /// Replace the string of every decodable record with this name ID, on
    /// every platform. Returns how many records changed.
    fn set_name_records(&mut self, name_id: u16, value: &str) -> Result<usize, FontError>;
    /// The Windows name entries, in table order.
    fn sfnt_names(&self) -> Result<Vec<SfntName>, FontError>;
    /// Replace all Windows name entries.
    fn set_sfnt_names(&mut self, names: Vec<SfntName>) -> Result<(), FontError>;
    /// Write the font to `path`, replacing any existing file.
    fn save(&mut self, path: &Path) -> Result<(), FontError>;
}

fn missing(tag: Tag) -> MissingTableSnafu<String> {
    MissingTableSnafu {
        tag: tag_to_string(&tag),
    }
}

impl Font {
    fn os2_core(&self) -> Result<&os2::os2core, FontError> {
        Ok(&self.tables.os2().context(missing(os2::TAG))?.core)
    }

    fn name_table(&self) -> Result<&name::name, FontError> {
        self.tables.name().context(missing(name::TAG))
    }

    fn name_table_mut(&mut self) -> Result<&mut name::name, FontError> {
        self.tables.name_mut().context(missing(name::TAG))
    }
}

/// Preference order when several records carry the same name ID.
fn record_rank(r: &NameRecord) -> u8 {
    match (r.platformID, r.languageID) {
        (name::PLATFORM_WINDOWS, name::LANGUAGE_ENGLISH_US) => 0,
        (name::PLATFORM_WINDOWS, _) => 1,
        (0, _) => 2,
        _ => 3,
    }
}

impl FontEditor for Font {
    fn metric(&self, metric: Metric) -> Result<i64, FontError> {
        let value = match metric {
            Metric::WinAscent => self.os2_core()?.usWinAscent as i64,
            Metric::TypoAscender => self.os2_core()?.sTypoAscender as i64,
            Metric::WinDescent => self.os2_core()?.usWinDescent as i64,
            Metric::TypoDescender => self.os2_core()?.sTypoDescender as i64,
            Metric::HheaAscender => self.tables.hhea().context(missing(hhea::TAG))?.ascender as i64,
            Metric::HheaDescender => {
                self.tables.hhea().context(missing(hhea::TAG))?.descender as i64
            }
        };
        Ok(value)
    }

    fn set_metric(&mut self, metric: Metric, value: i64) -> Result<(), FontError> {
        let (min, max) = metric.range();
        snafu::ensure!(
            (min..=max).contains(&value),
            MetricOutOfRangeSnafu { metric, value }
        );
        match metric {
            Metric::HheaAscender | Metric::HheaDescender => {
                let hhea = self.tables.hhea_mut().context(missing(hhea::TAG))?;
                if metric == Metric::HheaAscender {
                    hhea.ascender = value as i16;
                } else {
                    hhea.descender = value as i16;
                }
            }
            _ => {
                let core = &mut self.tables.os2_mut().context(missing(os2::TAG))?.core;
                match metric {
                    Metric::WinAscent => core.usWinAscent = value as u16,
                    Metric::TypoAscender => core.sTypoAscender = value as i16,
                    Metric::WinDescent => core.usWinDescent = value as u16,
                    _ => core.sTypoDescender = value as i16,
                }
            }
        }
        log::debug!("Set {} to {}", metric, value);
        Ok(())
    }

    fn name(&self, field: NameField) -> Result<String, FontError> {
        self.name_table()?
            .records_for(field.name_id())
            .min_by_key(|r| record_rank(r))
            .map(|r| r.string.clone())
            .context(MissingNameSnafu { field })
    }

    fn set_name(&mut self, field: NameField, value: &str) -> Result<(), FontError> {
        let id: u16 = field.name_id().into();
        if self.set_name_records(id, value)? == 0 {
            log::info!("Adding {} record (name ID {})", field, id);
            self.name_table_mut()?
                .records
                .push(NameRecord::windows_unicode(id, value));
        }
        Ok(())
    }

    fn set_name_records(&mut self, name_id: u16, value: &str) -> Result<usize, FontError> {
        let mut count = 0;
        for record in self
            .name_table_mut()?
            .records
            .iter_mut()
            .filter(|r| r.nameID == name_id)
        {
            record.string = value.to_string();
            count += 1;
        }
        Ok(count)
    }

    fn sfnt_names(&self) -> Result<Vec<SfntName>, FontError> {
        Ok(self
            .name_table()?
            .records
            .iter()
            .filter(|r| r.platformID == name::PLATFORM_WINDOWS)
            .map(|r| SfntName {
                language: r.languageID,
                name_id: r.nameID,
                string: r.string.clone(),
            })
            .collect())
    }

    fn set_sfnt_names(&mut self, names: Vec<SfntName>) -> Result<(), FontError> {
        let table = self.name_table_mut()?;
        // Symbol fonts keep their (3,0) encoding
        let encoding = table
            .records
            .iter()
            .find(|r| r.platformID == name::PLATFORM_WINDOWS)
            .map(|r| r.encodingID)
            .unwrap_or(name::ENCODING_WINDOWS_BMP);
        table
            .records
            .retain(|r| r.platformID != name::PLATFORM_WINDOWS);
        table
            .records
            .extend(names.into_iter().map(|n| NameRecord {
                platformID: name::PLATFORM_WINDOWS,
                encodingID: encoding,
                languageID: n.language,
                nameID: n.name_id,
                string: n.string,
            }));
        Ok(())
    }

    fn save(&mut self, path: &Path) -> Result<(), FontError> {
        let mut file = File::create(path).context(IOSnafu { path })?;
        Font::save(self, &mut file)
    }
}
