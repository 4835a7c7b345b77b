//! CSV-backed dataset sources.

use std::fs;
use std::path::{Path, PathBuf};

use crate::common::error::{HccError, HccResult};
use crate::common::ids::Fnv64;

use super::domain::{DataRepo, Table};

/// Dataset file on the local filesystem.
pub struct FsDataRepo {
    path: PathBuf,
}

impl FsDataRepo {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl DataRepo for FsDataRepo {
    fn read_table(&self) -> HccResult<Table> {
        let bytes = fs::read(&self.path).map_err(|err| {
            HccError::dataset_format(format!("cannot read {}: {err}", self.path.display()))
        })?;
        parse_csv(&bytes)
    }
}

/// Dataset contents already held in memory.
pub struct MemDataRepo {
    bytes: Vec<u8>,
}

impl MemDataRepo {
    pub fn new(contents: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: contents.into(),
        }
    }
}

impl DataRepo for MemDataRepo {
    fn read_table(&self) -> HccResult<Table> {
        parse_csv(&self.bytes)
    }
}

fn parse_csv(bytes: &[u8]) -> HccResult<Table> {
    let mut hasher = Fnv64::new();
    hasher.update(bytes);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(bytes);

    let header: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if header.is_empty() || header.iter().all(String::is_empty) {
        return Err(HccError::dataset_format("dataset has no header row"));
    }

    let mut records = Vec::new();
    for record in reader.records() {
        let record = record?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(Table {
        header,
        records,
        fingerprint: hasher.finish(),
    })
}
