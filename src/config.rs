//! Persisted session state: the workbook path chosen last time.
//!
//! The record is advisory. A missing or corrupt file behaves like a first run.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub filepath: Option<PathBuf>,
}

impl SessionConfig {
    /// The stored path, only if it still points at a regular file.
    pub fn existing_file(&self) -> Option<&Path> {
        self.filepath.as_deref().filter(|p| p.is_file())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no se pudo serializar la configuración: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `config.json` in the directory of the running executable.
    pub fn beside_executable() -> io::Result<Self> {
        let exe = env::current_exe()?;
        let dir = exe
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self::new(dir.join(CONFIG_FILE_NAME)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> SessionConfig {
        if !self.path.is_file() {
            log::debug!("sin configuración previa en {}", self.path.display());
            return SessionConfig::default();
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) => {
                log::warn!("no se pudo leer {}: {err}", self.path.display());
                return SessionConfig::default();
            }
        };

        serde_json::from_str(&content).unwrap_or_else(|err| {
            log::warn!("configuración inválida en {}: {err}", self.path.display());
            SessionConfig::default()
        })
    }

    pub fn save(&self, config: &SessionConfig) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(config)?;
        fs::write(&self.path, content).map_err(|source| ConfigError::Io {
            path: self.path.clone(),
            source,
        })
    }
}
