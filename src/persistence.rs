//! Saved maps
//!
//! A saved map is only its [`WorldParams`]: generation is deterministic, so
//! the same parameters rebuild the same tiles. Each map lives at
//! `<root>/<name>/<name>.worldmap` as pretty-printed JSON.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::config::WorldParams;
use crate::error::WorldError;

pub const SAVE_EXTENSION: &str = "worldmap";
const SAVE_VERSION: u32 = 1;

/// On-disk wrapper around the parameter record.
#[derive(Serialize, Deserialize)]
struct MapSaveFile {
    /// Format version for forward compatibility
    version: u32,
    params: WorldParams,
}

/// Directory of saved maps.
#[derive(Clone, Debug)]
pub struct MapStore {
    root: PathBuf,
}

impl MapStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name).join(format!("{}.{}", name, SAVE_EXTENSION))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Write `params` under its own name, creating directories as needed.
    pub fn save(&self, params: &WorldParams) -> Result<PathBuf, WorldError> {
        let path = self.path_for(&params.name);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|source| WorldError::Storage {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let save = MapSaveFile {
            version: SAVE_VERSION,
            params: params.clone(),
        };
        let json = serde_json::to_string_pretty(&save)?;
        fs::write(&path, json).map_err(|source| WorldError::Storage {
            path: path.clone(),
            source,
        })?;

        tracing::info!(target: "persistence", map = %params.name, path = %path.display(), "map saved");
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<WorldParams, WorldError> {
        let path = self.path_for(name);
        let contents = fs::read_to_string(&path).map_err(|source| WorldError::Storage {
            path: path.clone(),
            source,
        })?;

        let save: MapSaveFile = serde_json::from_str(&contents)?;
        if save.version > SAVE_VERSION {
            return Err(WorldError::UnsupportedVersion {
                found: save.version,
                supported: SAVE_VERSION,
            });
        }
        save.params.validate()?;

        tracing::info!(target: "persistence", map = name, seed = save.params.seed, "map loaded");
        Ok(save.params)
    }

    /// Load `name` if it was saved before, otherwise start from `defaults`
    /// renamed to `name` with a fresh random seed.
    pub fn load_or_create(&self, name: &str, defaults: &WorldParams) -> Result<WorldParams, WorldError> {
        if self.exists(name) {
            return self.load(name);
        }
        let params = WorldParams {
            name: name.to_string(),
            seed: rand::random(),
            ..defaults.clone()
        };
        tracing::info!(target: "persistence", map = name, seed = params.seed, "no saved map, created new parameters");
        Ok(params)
    }

    /// Names of all saved maps, sorted.
    pub fn list(&self) -> Result<Vec<String>, WorldError> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(WorldError::Storage {
                    path: self.root.clone(),
                    source,
                })
            }
        };

        let mut names: Vec<String> = entries
            .filter_map(Result::ok)
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|name| self.exists(name))
            .collect();
        names.sort();
        Ok(names)
    }
}
