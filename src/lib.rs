//! Reading, editing and writing OpenType font files.
//!
//! `fontpatch` understands the tables that carry a font's vertical metrics
//! and names (`head`, `hhea`, `OS/2`, `name`) and carries every other table
//! through unchanged:
//!
//! ```no_run
//! use fontpatch::{Font, FontEditor, Metric};
//!
//! let mut font = Font::load("Foo.ttf").unwrap();
//! let ascent = font.metric(Metric::HheaAscender).unwrap();
//! font.set_metric(Metric::HheaAscender, ascent + 100).unwrap();
//! FontEditor::save(&mut font, std::path::Path::new("Foo-tall.ttf")).unwrap();
//! ```
pub mod editor;
mod error;
pub mod font;
pub mod table_store;
pub mod tables;

pub use crate::editor::{FontEditor, Metric, NameField, SfntName};
pub use crate::error::FontError;
pub use crate::font::{load, Font, SfntVersion};
pub use crate::table_store::{Table, TableSet};
pub use otspec::tag;
pub use otspec::types::Tag;
