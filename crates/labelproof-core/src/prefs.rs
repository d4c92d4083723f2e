//! Persisted panel preferences and template discovery.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const PREFS_FILE_NAME: &str = "LabelProofPrefs.json";

/// File extensions accepted as uploadable proof templates.
pub const TEMPLATE_EXTENSIONS: [&str; 2] = ["ai", "pdf"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_upload_dir: Option<PathBuf>,
}

impl Preferences {
    /// Reads preferences from `path`. A missing file yields defaults; an unreadable or malformed
    /// file is reported and also yields defaults.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "cannot read preferences; using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str::<Preferences>(&text) {
            Ok(prefs) => prefs,
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "malformed preferences ignored; using defaults");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text).map_err(|e| Error::io(path, e))
    }
}

/// The most recently modified `.ai`/`.pdf` file directly inside `dir`, if any.
pub fn most_recent_template(dir: &Path) -> Result<Option<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
    let mut latest: Option<(SystemTime, PathBuf)> = None;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();
        let is_template = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                TEMPLATE_EXTENSIONS
                    .iter()
                    .any(|known| ext.eq_ignore_ascii_case(known))
            });
        if !is_template {
            continue;
        }
        let meta = entry.metadata().map_err(|e| Error::io(&path, e))?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
        let newer = match &latest {
            None => true,
            Some((t, _)) => modified > *t,
        };
        if newer {
            latest = Some((modified, path));
        }
    }
    Ok(latest.map(|(_, path)| path))
}
