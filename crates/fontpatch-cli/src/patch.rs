//! The patching pipeline: scale the vertical metrics, rename the font,
//! bring the name table in line and save under a derived file name.
use crate::{report, Args, Factor, NotANumberSnafu, PatchError};
use fontpatch::tables::name::NameRecordID;
use fontpatch::{FontEditor, Metric, NameField, SfntName};
use snafu::OptionExt;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Everything the pipeline needs besides the font itself.
#[derive(Debug, Clone, PartialEq)]
pub struct PatchOptions {
    pub factor: Factor,
    pub output_dir: PathBuf,
    pub fontname: Option<String>,
    pub familyname: Option<String>,
    pub fullname: Option<String>,
}

impl PatchOptions {
    pub fn new(factor: Factor) -> Self {
        PatchOptions {
            factor,
            output_dir: PathBuf::from("."),
            fontname: None,
            familyname: None,
            fullname: None,
        }
    }

    /// The replacement requested for a name, if any. Empty strings count
    /// as no replacement.
    pub fn name_override(&self, field: NameField) -> Option<&str> {
        let value = match field {
            NameField::FontName => &self.fontname,
            NameField::FamilyName => &self.familyname,
            NameField::FullName => &self.fullname,
        };
        value.as_deref().filter(|s| !s.is_empty())
    }
}

impl From<&Args> for PatchOptions {
    fn from(args: &Args) -> Self {
        PatchOptions {
            factor: args.factor,
            output_dir: args.output_dir.clone(),
            fontname: args.fontname.clone(),
            familyname: args.familyname.clone(),
            fullname: args.fullname.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub metric: Metric,
    pub old: i64,
    pub new: i64,
}

/// The names a patched font ends up with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    pub fontname: String,
    pub familyname: String,
    pub fullname: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PatchReport {
    pub adjustments: Vec<Adjustment>,
    pub names: Names,
    pub path: PathBuf,
}

/// `value * multiplier`, truncated toward zero. `None` if the product is
/// not a finite number.
pub fn scale(value: i64, multiplier: f64) -> Option<i64> {
    let product = value as f64 * multiplier;
    if product.is_finite() {
        Some(product.trunc() as i64)
    } else {
        None
    }
}

/// Scale a single metric in place.
pub fn adjust<F: FontEditor>(
    font: &mut F,
    metric: Metric,
    multiplier: f64,
) -> Result<Adjustment, PatchError> {
    let old = font.metric(metric)?;
    let new = scale(old, multiplier).context(NotANumberSnafu {
        metric,
        value: old,
        multiplier,
    })?;
    report::adjustment(metric, old, new);
    font.set_metric(metric, new)?;
    Ok(Adjustment { metric, old, new })
}

/// Scale the ascents by `factor` and the descents by twice `factor`.
pub fn adjust_metrics<F: FontEditor>(
    font: &mut F,
    factor: Factor,
) -> Result<Vec<Adjustment>, PatchError> {
    let ascents = Metric::ASCENTS.iter().map(|&m| (m, factor.0));
    let descents = Metric::DESCENTS.iter().map(|&m| (m, factor.0 * 2.0));
    ascents
        .chain(descents)
        .map(|(metric, multiplier)| adjust(font, metric, multiplier))
        .collect()
}

/// Give the font its new names: the override where there is one, otherwise
/// the old name with the factor appended.
pub fn rename<F: FontEditor>(font: &mut F, options: &PatchOptions) -> Result<Names, PatchError> {
    let mut new_name = |field: NameField| -> Result<String, PatchError> {
        let value = match options.name_override(field) {
            Some(value) => value.to_string(),
            None => format!("{} {}", font.name(field)?, options.factor),
        };
        log::info!("Setting {} to {:?}", field, value);
        font.set_name(field, &value)?;
        Ok(value)
    };
    Ok(Names {
        fontname: new_name(NameField::FontName)?,
        familyname: new_name(NameField::FamilyName)?,
        fullname: new_name(NameField::FullName)?,
    })
}

/// `<stem>Patched <factor><extension>` for the given input file.
///
/// A trailing dot is not an extension: `Foo.` gives `Foo.Patched 1.3`.
pub fn output_filename(input: &Path, factor: Factor) -> OsString {
    let (stem, extension) = match (input.file_stem(), input.extension()) {
        (Some(stem), Some(ext)) if !ext.is_empty() => (stem, Some(ext)),
        _ => (input.file_name().unwrap_or_default(), None),
    };
    let mut filename = stem.to_os_string();
    filename.push(format!("Patched {}", factor));
    if let Some(ext) = extension {
        filename.push(".");
        filename.push(ext);
    }
    filename
}

/// Point the unique ID and typographic family entries at the new names.
///
/// Entries are keyed by name ID, so of several entries sharing an ID only
/// the last survives; the result is written back in name ID order. Records
/// for the two IDs on other platforms get the same strings.
pub fn sync_sfnt_names<F: FontEditor>(font: &mut F, names: &Names) -> Result<(), PatchError> {
    let synced = [
        (NameRecordID::UniqueID, &names.fontname),
        (NameRecordID::PreferredFamilyName, &names.familyname),
    ];
    let mut by_id: BTreeMap<u16, SfntName> = BTreeMap::new();
    for entry in font.sfnt_names()? {
        by_id.insert(entry.name_id, entry);
    }
    for (id, value) in synced.iter() {
        by_id.insert((*id).into(), SfntName::english(*id, value.as_str()));
    }
    font.set_sfnt_names(by_id.into_values().collect())?;
    for (id, value) in synced.iter() {
        font.set_name_records((*id).into(), value)?;
    }
    Ok(())
}

/// Run the whole pipeline on an already loaded font.
pub fn patch<F: FontEditor>(
    font: &mut F,
    input: &Path,
    options: &PatchOptions,
) -> Result<PatchReport, PatchError> {
    report::blank();
    let adjustments = adjust_metrics(font, options.factor)?;
    let names = rename(font, options)?;
    let filename = output_filename(input, options.factor);
    report::summary(&names);
    sync_sfnt_names(font, &names)?;

    let path = options.output_dir.join(&filename);
    log::info!("Saving to {}", path.display());
    font.save(&path)?;
    report::saved(Path::new(&filename));
    Ok(PatchReport {
        adjustments,
        names,
        path,
    })
}
