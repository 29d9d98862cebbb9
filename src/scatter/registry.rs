// src/scatter/registry.rs
//! Named scatter presets + loader for `.scatter.ron` files.

use bevy::asset::{io::Reader, AssetLoader, LoadContext};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::config::ScatterConfig;
use super::core::ScatterError;

// ---------- Public plugin to register asset+loader ----------

pub struct ScatterPresetsAssetPlugin;

impl Plugin for ScatterPresetsAssetPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<ScatterPresets>()
            .register_asset_loader(ScatterPresetsLoader);
    }
}

// ---------- Preset definition (data form) ----------

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScatterPreset {
    /// Unique human-readable name (used for lookup).
    pub name: String,
    #[serde(default)]
    pub config: ScatterConfig,
}

// ---------- Runtime preset asset ----------

#[derive(Asset, TypePath, Clone, Debug)]
pub struct ScatterPresets {
    /// Ordered as in the file.
    pub presets: Vec<ScatterPreset>,
    /// Name → index for quick lookups.
    pub name_to_index: HashMap<String, usize>,
}

impl ScatterPresets {
    /// Parse and validate a RON list of presets.
    pub fn from_ron_bytes(bytes: &[u8]) -> Result<Self, ScatterPresetsLoadError> {
        let presets: Vec<ScatterPreset> =
            ron::de::from_bytes(bytes).map_err(|e| ScatterPresetsLoadError::Ron(e.to_string()))?;

        let mut name_to_index = HashMap::with_capacity(presets.len());
        for (i, preset) in presets.iter().enumerate() {
            preset.config.validate().map_err(|source| ScatterPresetsLoadError::Invalid {
                name: preset.name.clone(),
                source,
            })?;
            if let Some(prev) = name_to_index.insert(preset.name.clone(), i) {
                return Err(ScatterPresetsLoadError::DuplicateName {
                    name: preset.name.clone(),
                    first: prev,
                    second: i,
                });
            }
        }

        Ok(Self { presets, name_to_index })
    }

    pub fn get(&self, name: &str) -> Option<&ScatterConfig> {
        self.name_to_index.get(name).map(|&i| &self.presets[i].config)
    }
}

// ---------- Asset loader for `.scatter.ron` ----------

#[derive(Default)]
pub struct ScatterPresetsLoader;

impl AssetLoader for ScatterPresetsLoader {
    type Asset = ScatterPresets;
    type Settings = ();
    type Error = ScatterPresetsLoadError;

    fn extensions(&self) -> &[&str] {
        &["scatter.ron"]
    }

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        ScatterPresets::from_ron_bytes(&bytes)
    }
}

// ---------- Loader errors ----------

#[derive(thiserror::Error, Debug)]
pub enum ScatterPresetsLoadError {
    #[error("I/O while reading presets: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(String),
    #[error("Duplicate preset name '{name}' (first idx {first}, second idx {second})")]
    DuplicateName { name: String, first: usize, second: usize },
    #[error("Preset '{name}' is invalid: {source}")]
    Invalid { name: String, source: ScatterError },
}
