//! Legacy progress files
//!
//! The original deployments persisted a tiny per-user progress file named
//! `<nome>_progresso.json` next to the app. We keep reading and writing the
//! same format, Portuguese field names included, so existing files survive
//! an upgrade.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Filename suffix shared by every progress file
pub const PROGRESS_SUFFIX: &str = "_progresso.json";

/// Persisted progress counters, in the legacy on-disk shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProgress {
    /// User's display name
    pub nome_usuario: String,
    /// How many advice consultations the user has made
    pub contador_consultas: u32,
}

impl UserProgress {
    pub fn new(nome_usuario: &str) -> Self {
        Self {
            nome_usuario: nome_usuario.to_string(),
            contador_consultas: 0,
        }
    }

    /// Path of this user's progress file under `dir`
    pub fn file_path(&self, dir: &Path) -> PathBuf {
        dir.join(format!("{}{}", self.nome_usuario, PROGRESS_SUFFIX))
    }

    /// Write the progress file, creating `dir` if needed
    pub fn save(&self, dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(dir)?;
        let path = self.file_path(dir);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        tracing::debug!(path = %path.display(), "saved progress file");
        Ok(path)
    }

    /// Load a specific user's progress file, if it exists
    pub fn load(dir: &Path, nome_usuario: &str) -> Result<Option<Self>> {
        let path = dir.join(format!("{}{}", nome_usuario, PROGRESS_SUFFIX));
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path)?;
        let progress = serde_json::from_str(&content)
            .map_err(|e| Error::InvalidData(format!("arquivo de progresso inválido: {}", e)))?;
        Ok(Some(progress))
    }

    /// Load the first progress file found in `dir`
    ///
    /// Mirrors the legacy startup behavior: whichever `*_progresso.json`
    /// the directory scan yields first wins. Returns `None` when the
    /// directory is missing or holds no progress files.
    pub fn load_any(dir: &Path) -> Result<Option<Self>> {
        if !dir.is_dir() {
            return Ok(None);
        }
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                continue;
            };
            if name.ends_with(PROGRESS_SUFFIX) {
                let content = fs::read_to_string(entry.path())?;
                let progress = serde_json::from_str(&content).map_err(|e| {
                    Error::InvalidData(format!("arquivo de progresso inválido: {}", e))
                })?;
                return Ok(Some(progress));
            }
        }
        Ok(None)
    }
}
