use crate::editor::{Metric, NameField};
use otspec::{DeserializationError, SerializationError};
use snafu::Snafu;
use std::{io, path::PathBuf};

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FontError {
    #[snafu(display("IO Error for file {}: {}", path.display(), source))]
    IO { source: io::Error, path: PathBuf },

    #[snafu(display("Could not read font: {}", source))]
    Read { source: io::Error },

    #[snafu(display("Could not write font: {}", source))]
    Write { source: io::Error },

    #[snafu(display("Malformed font header: {}", source))]
    Header { source: DeserializationError },

    #[snafu(display("Font collections are not supported"))]
    Collection,

    #[snafu(display("Not an OpenType font (sfnt version {:#010x})", version))]
    UnknownSfntVersion { version: u32 },

    #[snafu(display(
        "Table {} lies outside the file ({} + {} > {})",
        tag,
        offset,
        length,
        file_length
    ))]
    TableBounds {
        tag: String,
        offset: u32,
        length: u32,
        file_length: usize,
    },

    #[snafu(display("Could not parse {} table: {}", tag, source))]
    TableParse {
        tag: String,
        source: DeserializationError,
    },

    #[snafu(display("Could not serialize {} table: {}", tag, source))]
    TableSerialize {
        tag: String,
        source: SerializationError,
    },

    #[snafu(display("Too many tables to write: {}", count))]
    TooManyTables { count: usize },

    #[snafu(display("Font has no {} table", tag))]
    MissingTable { tag: String },

    #[snafu(display("{} cannot hold the value {}", metric, value))]
    MetricOutOfRange { metric: Metric, value: i64 },

    #[snafu(display("Font has no {}", field))]
    MissingName { field: NameField },
}
