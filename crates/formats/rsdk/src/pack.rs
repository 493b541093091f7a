use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::CodecConfig;
use crate::error::{Error, Result};
use crate::format::Format;
use crate::stage::Stage;
use crate::stage_config::StageConfig;

/// A source of named files: a data pack, a loose folder, or memory.
///
/// Names use `/` separators, e.g. `Data/Stages/Zone01/Act1.bin`.
pub trait DataPack {
    fn file_exists(&self, name: &str) -> bool;

    /// Fetch a file's bytes, failing with [`Error::FileNotFound`] if absent.
    fn file_data(&self, name: &str) -> Result<Vec<u8>>;

    /// Fetch a file's bytes, or `None` if absent.
    fn try_file_data(&self, name: &str) -> Option<Vec<u8>> {
        if !self.file_exists(name) {
            return None;
        }
        self.file_data(name).ok()
    }
}

/// In-memory pack keyed by file name.
#[derive(Debug, Default, Clone)]
pub struct MemoryPack {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryPack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, data: Vec<u8>) {
        self.files.insert(name.into(), data);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl DataPack for MemoryPack {
    fn file_exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    fn file_data(&self, name: &str) -> Result<Vec<u8>> {
        self.files.get(name).cloned().ok_or_else(|| Error::FileNotFound {
            name: name.to_string(),
        })
    }
}

/// Loose files under a root directory (an extracted data folder).
#[derive(Debug, Clone)]
pub struct DirectoryPack {
    root: PathBuf,
}

impl DirectoryPack {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of `name` under the root, or `None` if a `..` segment would
    /// step outside it.
    fn path_of(&self, name: &str) -> Option<PathBuf> {
        let mut path = self.root.clone();
        for part in name.split('/').filter(|part| !part.is_empty() && *part != ".") {
            if part == ".." {
                return None;
            }
            path.push(part);
        }
        Some(path)
    }
}

impl DataPack for DirectoryPack {
    fn file_exists(&self, name: &str) -> bool {
        self.path_of(name).is_some_and(|path| path.is_file())
    }

    fn file_data(&self, name: &str) -> Result<Vec<u8>> {
        let Some(path) = self.path_of(name) else {
            tracing::debug!(name, "rejecting path outside pack root");
            return Err(Error::FileNotFound {
                name: name.to_string(),
            });
        };
        match std::fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::FileNotFound {
                name: name.to_string(),
            }),
            Err(e) => Err(Error::Io(e)),
        }
    }
}

/// Fetch and decode a stage from a pack.
pub fn load_stage(pack: &dyn DataPack, name: &str, format: Format) -> Result<Stage> {
    load_stage_with(pack, name, format, &CodecConfig::default())
}

pub fn load_stage_with(pack: &dyn DataPack, name: &str, format: Format, config: &CodecConfig) -> Result<Stage> {
    let data = pack.file_data(name)?;
    tracing::debug!(name, size = data.len(), "loading stage");
    Stage::decode_with(&data, format, config)
}

/// Fetch and decode a stage config from a pack.
pub fn load_stage_config(pack: &dyn DataPack, name: &str, format: Format) -> Result<StageConfig> {
    load_stage_config_with(pack, name, format, &CodecConfig::default())
}

pub fn load_stage_config_with(
    pack: &dyn DataPack,
    name: &str,
    format: Format,
    config: &CodecConfig,
) -> Result<StageConfig> {
    let data = pack.file_data(name)?;
    tracing::debug!(name, size = data.len(), "loading stage config");
    StageConfig::decode_with(&data, format, config)
}
