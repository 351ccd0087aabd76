use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

use crate::composer::ComposerFormData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preset {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub form: ComposerFormData,
}

#[derive(Debug, Error)]
pub enum PresetStoreError {
    #[error("preset name must not be empty")]
    EmptyName,
    #[error("preset store io failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize presets: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("preset blob at {path} is corrupt: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Ordered, append-only list of presets. The backing blob (a JSON array) is
/// read once on open and rewritten whenever the list changes.
#[derive(Debug)]
pub struct PresetStore {
    path: Option<PathBuf>,
    presets: RwLock<Vec<Preset>>,
}

impl PresetStore {
    pub fn in_memory() -> Self {
        Self {
            path: None,
            presets: RwLock::new(Vec::new()),
        }
    }

    pub async fn open(path: Option<PathBuf>) -> Result<Self, PresetStoreError> {
        let Some(path) = path else {
            return Ok(Self::in_memory());
        };

        let presets = match tokio::fs::read(&path).await {
            Ok(raw) if raw.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(raw) => {
                serde_json::from_slice::<Vec<Preset>>(&raw).map_err(|source| {
                    PresetStoreError::Corrupt {
                        path: path.clone(),
                        source,
                    }
                })?
            }
            Err(err) if err.kind() == ErrorKind::NotFound => Vec::new(),
            Err(source) => return Err(PresetStoreError::Io { path, source }),
        };

        info!(
            path = %path.display(),
            preset_count = presets.len(),
            "loaded preset store"
        );

        Ok(Self {
            path: Some(path),
            presets: RwLock::new(presets),
        })
    }

    pub async fn list(&self) -> Vec<Preset> {
        self.presets.read().await.clone()
    }

    pub async fn get(&self, id: &str) -> Option<Preset> {
        self.presets
            .read()
            .await
            .iter()
            .find(|preset| preset.id == id)
            .cloned()
    }

    pub async fn save(
        &self,
        name: &str,
        form: ComposerFormData,
    ) -> Result<Preset, PresetStoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PresetStoreError::EmptyName);
        }

        let mut presets = self.presets.write().await;
        let preset = Preset {
            id: next_preset_id(&presets, Utc::now().timestamp_millis()),
            name: name.to_string(),
            form,
        };

        let mut updated = presets.clone();
        updated.push(preset.clone());
        if let Some(path) = self.path.as_deref() {
            write_blob(path, &updated).await?;
        }
        *presets = updated;

        Ok(preset)
    }
}

/// Millisecond timestamp id, bumped past any id already taken.
fn next_preset_id(existing: &[Preset], now_millis: i64) -> String {
    let highest = existing
        .iter()
        .filter_map(|preset| preset.id.parse::<i64>().ok())
        .max();

    let id = match highest {
        Some(highest) if highest >= now_millis => highest.saturating_add(1),
        _ => now_millis,
    };
    id.to_string()
}

async fn write_blob(path: &Path, presets: &[Preset]) -> Result<(), PresetStoreError> {
    let raw = serde_json::to_vec_pretty(presets).map_err(PresetStoreError::Serialize)?;
    let io_err = |source| PresetStoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }

    let mut tmp_path = path.as_os_str().to_owned();
    tmp_path.push(".tmp");
    let tmp_path = PathBuf::from(tmp_path);

    tokio::fs::write(&tmp_path, raw).await.map_err(io_err)?;
    tokio::fs::rename(&tmp_path, path).await.map_err(io_err)
}
