//! Persisted player progress
//!
//! Scores, control modes and the score-derived max health/fuel carry over
//! between sessions, along with the selected landscape. Stored as a small
//! versioned JSON document: a file on native, LocalStorage on the web.

use std::fmt;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::sim::{ControlMode, LandscapeKind};

/// Current document version
pub const PROGRESS_VERSION: u32 = 1;

/// Failure to read or write progress
#[derive(Debug)]
pub enum ProgressError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    /// Document from a newer build
    UnsupportedVersion { found: u32 },
    /// Browser storage unavailable or rejected the write
    Storage(String),
}

impl fmt::Display for ProgressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(err) => write!(f, "progress I/O failed: {err}"),
            Self::Parse(err) => write!(f, "progress document is malformed: {err}"),
            Self::UnsupportedVersion { found } => {
                write!(f, "progress version {found} is newer than {PROGRESS_VERSION}")
            }
            Self::Storage(msg) => write!(f, "progress storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for ProgressError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Parse(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ProgressError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ProgressError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err)
    }
}

/// Per-tank progress plus the selected landscape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    #[serde(default = "default_version")]
    pub version: u32,
    pub scores: Vec<u32>,
    pub control_modes: Vec<ControlMode>,
    pub max_health: Vec<f32>,
    pub max_fuel: Vec<f32>,
    #[serde(default)]
    pub landscape: LandscapeKind,
}

fn default_version() -> u32 {
    PROGRESS_VERSION
}

impl Default for Progress {
    fn default() -> Self {
        Self {
            version: PROGRESS_VERSION,
            scores: Vec::new(),
            control_modes: Vec::new(),
            max_health: Vec::new(),
            max_fuel: Vec::new(),
            landscape: LandscapeKind::Earth,
        }
    }
}

impl Progress {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "artillery_duel_progress";

    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ProgressError> {
        let progress: Progress = serde_json::from_str(json)?;
        if progress.version > PROGRESS_VERSION {
            return Err(ProgressError::UnsupportedVersion {
                found: progress.version,
            });
        }
        Ok(progress)
    }

    /// Write to a file, replacing it atomically via a temp file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: &Path) -> Result<(), ProgressError> {
        let json = self.to_json()?;
        let tmp = path.with_extension("tmp");
        std::fs::write(&tmp, json)?;
        std::fs::rename(&tmp, path)?;
        log::info!("Progress saved to {}", path.display());
        Ok(())
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: &Path) -> Result<Self, ProgressError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load, falling back to empty progress on any failure
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(progress) => {
                log::info!("Loaded progress for {} tanks", progress.scores.len());
                progress
            }
            Err(ProgressError::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No saved progress, starting fresh");
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring saved progress: {err}");
                Self::default()
            }
        }
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), ProgressError> {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| ProgressError::Storage("no LocalStorage".to_string()))?;
        let json = self.to_json()?;
        storage
            .set_item(Self::STORAGE_KEY, &json)
            .map_err(|_| ProgressError::Storage("write rejected".to_string()))?;
        log::info!("Progress saved");
        Ok(())
    }

    /// Load from LocalStorage (WASM only), falling back to empty progress
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(progress) => {
                        log::info!("Loaded progress from LocalStorage");
                        return progress;
                    }
                    Err(err) => log::warn!("Ignoring saved progress: {err}"),
                }
            }
        }

        log::info!("No saved progress, starting fresh");
        Self::default()
    }
}
