//! Save-data persistence
//!
//! A single RON file holding the high score. Reads and writes happen only
//! at scene-transition boundaries (title screen start, score comparison at
//! the end of a run), never inside the per-tick loop. A missing file reads
//! as defaults; write failures are reported to the caller and logged, never
//! fatal.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SaveData {
    pub high_score: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveError {
    /// Filesystem failure other than not-found.
    Io(String),
    /// Save file exists but does not parse.
    Corrupt(String),
}

impl fmt::Display for SaveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaveError::Io(msg) => write!(f, "save i/o error: {}", msg),
            SaveError::Corrupt(msg) => write!(f, "save file corrupt: {}", msg),
        }
    }
}

impl std::error::Error for SaveError {}

/// Handle to the on-disk save file.
#[derive(Debug, Clone)]
pub struct SaveSlot {
    path: PathBuf,
}

impl SaveSlot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Default location next to the executable's working directory.
    pub fn default_path() -> Self {
        Self::new("save/starblitz.ron")
    }

    /// Read the save file. A missing file is not an error: it reads as
    /// default data (fresh install, nothing saved yet).
    pub fn load(&self) -> Result<SaveData, SaveError> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SaveData::default());
            }
            Err(e) => return Err(SaveError::Io(e.to_string())),
        };
        ron::from_str(&text).map_err(|e| SaveError::Corrupt(e.to_string()))
    }

    /// Write the save file, creating parent directories as needed.
    pub fn save(&self, data: &SaveData) -> Result<(), SaveError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| SaveError::Io(e.to_string()))?;
        }
        let text = ron::ser::to_string_pretty(data, ron::ser::PrettyConfig::default())
            .map_err(|e| SaveError::Io(e.to_string()))?;
        std::fs::write(&self.path, text).map_err(|e| SaveError::Io(e.to_string()))
    }
}
