use std::fs;
use std::path::{Path, PathBuf};

use fair_core::MetadataRecord;

use crate::error::RegistryError;

/// Write-only store of the last fetched record per identifier, kept for
/// inspection. Each store overwrites the previous file.
#[derive(Debug, Clone)]
pub struct MetadataCache {
    dir: PathBuf,
}

impl MetadataCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(identifier)))
    }

    pub fn store(&self, identifier: &str, record: &MetadataRecord) -> Result<PathBuf, RegistryError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(identifier);
        let bytes = serde_json::to_vec_pretty(record.as_map())?;
        fs::write(&path, bytes)?;
        Ok(path)
    }
}

/// Filesystem-safe form of an identifier: anything outside
/// `[A-Za-z0-9._-]` becomes `_`, and dot-only names collapse to `_`.
pub fn file_stem(identifier: &str) -> String {
    let stem: String = identifier
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        stem
    }
}
