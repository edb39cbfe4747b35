//! khata-storage-json
//!
//! Filesystem implementation of the on-device key-value cache: one JSON
//! blob file per cache key, rewritten wholesale through a tmp-file rename
//! so a crash mid-write never leaves a torn value behind.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use khata_config::Config;
use khata_core::{CacheError, LocalCache};

const VALUE_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// File-per-key cache rooted at a single directory.
#[derive(Debug, Clone)]
pub struct JsonCache {
    root: PathBuf,
}

impl JsonCache {
    pub fn new(root: PathBuf) -> Result<Self, CacheError> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Roots the cache at the directory the configuration resolves to.
    pub fn from_config(config: &Config) -> Result<Self, CacheError> {
        Self::new(config.resolve_cache_root())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the blob file backing `key`.
    pub fn value_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", sanitize_key(key), VALUE_EXTENSION))
    }
}

impl LocalCache for JsonCache {
    fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
        let path = self.value_path(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), CacheError> {
        let path = self.value_path(key);
        let tmp = tmp_path(&path);
        write_file(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), CacheError> {
        let path = self.value_path(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Keys map to file stems; anything outside the portable character set is
/// replaced so a key can never escape the cache root.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), CacheError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
