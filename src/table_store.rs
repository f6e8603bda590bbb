use std::collections::BTreeMap;

use otspec::types::{tag_to_string, Tag};
use otspec::{DeserializationError, SerializationError};

use crate::tables::{head, hhea, name, os2};

/// An OpenType table, either understood or carried along as raw bytes.
#[derive(Debug, Clone, PartialEq)]
pub enum Table {
    Head(head::head),
    Hhea(hhea::hhea),
    Os2(os2::os2),
    Name(name::name),
    Unknown(Vec<u8>),
}

impl Table {
    /// Deserialize the binary data for the table with the given tag.
    pub fn from_bytes(tag: Tag, data: &[u8]) -> Result<Table, DeserializationError> {
        let table = match &tag {
            b"head" => Table::Head(otspec::de::from_bytes(data)?),
            b"hhea" => Table::Hhea(otspec::de::from_bytes(data)?),
            b"OS/2" => Table::Os2(otspec::de::from_bytes(data)?),
            b"name" => Table::Name(otspec::de::from_bytes(data)?),
            _ => Table::Unknown(data.to_vec()),
        };
        log::debug!("Loaded {} table ({} bytes)", tag_to_string(&tag), data.len());
        Ok(table)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, SerializationError> {
        match self {
            Table::Head(t) => otspec::ser::to_bytes(t),
            Table::Hhea(t) => otspec::ser::to_bytes(t),
            Table::Os2(t) => otspec::ser::to_bytes(t),
            Table::Name(t) => otspec::ser::to_bytes(t),
            Table::Unknown(data) => Ok(data.clone()),
        }
    }
}

/// The set of OpenType tables in a font, ordered by tag.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TableSet {
    tables: BTreeMap<Tag, Table>,
}

macro_rules! typed_accessors {
    ($($getter:ident, $getter_mut:ident, $tag:expr, $variant:ident, $ty:ty;)*) => {
        $(
            pub fn $getter(&self) -> Option<&$ty> {
                match self.tables.get(&$tag) {
                    Some(Table::$variant(t)) => Some(t),
                    _ => None,
                }
            }

            pub fn $getter_mut(&mut self) -> Option<&mut $ty> {
                match self.tables.get_mut(&$tag) {
                    Some(Table::$variant(t)) => Some(t),
                    _ => None,
                }
            }
        )*
    };
}

impl TableSet {
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Returns `true` if the provided tag is a table in this `TableSet`.
    pub fn contains(&self, tag: &Tag) -> bool {
        self.tables.contains_key(tag)
    }

    pub fn get(&self, tag: &Tag) -> Option<&Table> {
        self.tables.get(tag)
    }

    pub fn get_mut(&mut self, tag: &Tag) -> Option<&mut Table> {
        self.tables.get_mut(tag)
    }

    pub fn insert(&mut self, tag: Tag, table: Table) -> Option<Table> {
        self.tables.insert(tag, table)
    }

    /// Insert a table as raw binary data, without interpreting it.
    pub fn insert_raw(&mut self, tag: Tag, data: Vec<u8>) -> Option<Table> {
        self.tables.insert(tag, Table::Unknown(data))
    }

    pub fn remove(&mut self, tag: &Tag) -> Option<Table> {
        self.tables.remove(tag)
    }

    /// Tables in tag order.
    pub fn iter(&self) -> impl Iterator<Item = (&Tag, &Table)> {
        self.tables.iter()
    }

    typed_accessors! {
        head, head_mut, head::TAG, Head, head::head;
        hhea, hhea_mut, hhea::TAG, Hhea, hhea::hhea;
        os2, os2_mut, os2::TAG, Os2, os2::os2;
        name, name_mut, name::TAG, Name, name::name;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag;

    #[test]
    fn unknown_tables_are_raw() {
        let t = Table::from_bytes(tag!("DSIG"), &[0, 0, 0, 1, 0, 0, 0, 0]).unwrap();
        assert_eq!(t, Table::Unknown(vec![0, 0, 0, 1, 0, 0, 0, 0]));
        assert_eq!(t.to_bytes().unwrap(), vec![0, 0, 0, 1, 0, 0, 0, 0]);
    }

    #[test]
    fn typed_access() {
        let mut set = TableSet::default();
        set.insert(
            hhea::TAG,
            Table::Hhea(hhea::hhea {
                ascender: 800,
                ..Default::default()
            }),
        );
        set.insert_raw(tag!("OS/2"), vec![0, 0]);
        assert_eq!(set.hhea().map(|h| h.ascender), Some(800));
        // A raw table is not handed out as a typed one
        assert!(set.os2().is_none());
        assert!(set.contains(&tag!("OS/2")));
        set.hhea_mut().unwrap().ascender = 900;
        assert_eq!(set.hhea().unwrap().ascender, 900);
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn iterates_in_tag_order() {
        let mut set = TableSet::default();
        set.insert_raw(tag!("post"), vec![]);
        set.insert_raw(tag!("OS/2"), vec![]);
        set.insert_raw(tag!("cmap"), vec![]);
        let tags: Vec<Tag> = set.iter().map(|(t, _)| *t).collect();
        assert_eq!(tags, vec![tag!("OS/2"), tag!("cmap"), tag!("post")]);
    }
}
