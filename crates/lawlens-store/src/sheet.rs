//! CSV sheet I/O.
//!
//! Three sheet shapes: the structure sheet (one row per provision), the
//! translation sheet (one row per article), and the match sheet (one row
//! per foreign article). Writing replaces the whole file; sheets are
//! stage outputs, not databases.

use std::path::Path;

use lawlens_core::{Country, MatchedRecord, ProvisionTree, TranslationRecord};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::info;

use crate::error::StoreError;
use crate::table::{StructureRow, flatten, rebuild};

/// Write the structure sheet for an extracted tree.
pub fn write_structure(path: &Path, tree: &ProvisionTree) -> Result<(), StoreError> {
    let rows = flatten(tree);
    write_rows(path, &rows, "structure")
}

/// Read a structure sheet back into a tree.
pub fn read_structure(path: &Path, country: Country) -> Result<ProvisionTree, StoreError> {
    let rows: Vec<StructureRow> = read_rows(path)?;
    rebuild(country, &rows)
}

pub fn write_translations(path: &Path, records: &[TranslationRecord]) -> Result<(), StoreError> {
    write_rows(path, records, "translation")
}

pub fn read_translations(path: &Path) -> Result<Vec<TranslationRecord>, StoreError> {
    read_rows(path)
}

/// Write the final sheet: translation rows with match columns appended.
pub fn write_matches(path: &Path, records: &[MatchedRecord]) -> Result<(), StoreError> {
    write_rows(path, records, "match")
}

pub fn read_matches(path: &Path) -> Result<Vec<MatchedRecord>, StoreError> {
    read_rows(path)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T], sheet: &str) -> Result<(), StoreError> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), rows = rows.len(), sheet, "wrote sheet");
    Ok(())
}

fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}
