//! Name override table
//!
//! Maps the full first ESF field (the dotted address path) to a display name
//! that replaces the one derived from the label.

use super::read_two_column_table;
use crate::error::{Result, TranslatorError};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::info;

/// Header of the names table
pub const NAME_TABLE_HEADER: [&str; 2] = ["ID", "Name"];

/// Result of looking up a key in the names table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameLookup<'a> {
    /// Exactly one row matches
    Unique(&'a str),
    /// No row matches
    Missing,
    /// More than one row matches; carries the number of matches
    Ambiguous(usize),
}

/// A single override row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameOverride {
    pub id: String,
    pub name: String,
}

/// Name override table in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameTable {
    entries: Vec<NameOverride>,
}

impl NameTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an `ID,Name` CSV file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            TranslatorError::invalid_name_table(format!(
                "Failed to open '{}': {}",
                path.display(),
                e
            ))
        })?;
        let table = Self::from_reader(file)?;
        info!(
            "Loaded {} name overrides from {}",
            table.len(),
            path.display()
        );
        Ok(table)
    }

    /// Load an `ID,Name` table from any CSV source
    ///
    /// A table without any override row is rejected.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let rows = read_two_column_table(reader, NAME_TABLE_HEADER, |msg| {
            TranslatorError::invalid_name_table(msg)
        })?;
        if rows.is_empty() {
            return Err(TranslatorError::invalid_name_table(
                "File contains no name overrides",
            ));
        }
        Ok(Self {
            entries: rows
                .into_iter()
                .map(|(id, name)| NameOverride { id, name })
                .collect(),
        })
    }

    /// Add an override row
    pub fn push<I: Into<String>, N: Into<String>>(&mut self, id: I, name: N) {
        self.entries.push(NameOverride {
            id: id.into(),
            name: name.into(),
        });
    }

    /// Look up the override for an exact first-field key
    pub fn lookup(&self, key: &str) -> NameLookup<'_> {
        let mut matches = self.entries.iter().filter(|entry| entry.id == key);
        match (matches.next(), matches.count()) {
            (None, _) => NameLookup::Missing,
            (Some(entry), 0) => NameLookup::Unique(&entry.name),
            (Some(_), rest) => NameLookup::Ambiguous(rest + 1),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<I: Into<String>, N: Into<String>> FromIterator<(I, N)> for NameTable {
    fn from_iter<T: IntoIterator<Item = (I, N)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (id, name) in iter {
            table.push(id, name);
        }
        table
    }
}
