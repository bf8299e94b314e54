use std::collections::HashSet;

use anyhow::Result;

use crate::curriculum::grammar::UnitKey;
use crate::engine::progress::ProgressState;
use crate::store::json_store::JsonStore;

pub const COMPLETED_UNITS_KEY: &str = "completed_units";
pub const CURRENT_FOCUS_KEY: &str = "current_focus";

/// Typed surface over the two stored keys. Loading never fails: an absent
/// or unparsable value falls back to the empty default, and a focus that
/// does not parse is recomputed from the completed set.
pub struct ProgressStore {
    store: JsonStore,
}

impl ProgressStore {
    pub fn new() -> Result<Self> {
        Ok(Self { store: JsonStore::new()? })
    }

    pub fn with_base_dir(base_dir: std::path::PathBuf) -> Result<Self> {
        Ok(Self {
            store: JsonStore::with_base_dir(base_dir)?,
        })
    }

    pub fn load(&self) -> ProgressState {
        let completed: HashSet<UnitKey> = self
            .store
            .get(COMPLETED_UNITS_KEY)
            .and_then(|raw| serde_json::from_str::<Vec<String>>(&raw).ok())
            .map(|keys| keys.iter().filter_map(|k| k.parse().ok()).collect())
            .unwrap_or_default();

        let focus = self
            .store
            .get(CURRENT_FOCUS_KEY)
            .and_then(|raw| serde_json::from_str::<String>(&raw).ok())
            .and_then(|key| key.parse::<UnitKey>().ok());

        match focus {
            Some(focus) => ProgressState::with_focus(completed, focus),
            None => ProgressState::new(completed),
        }
    }

    pub fn save(&self, state: &ProgressState) -> Result<()> {
        // Sorted so the stored file is stable across runs.
        let mut keys: Vec<String> = state.completed().iter().map(UnitKey::to_string).collect();
        keys.sort();
        self.store
            .set(COMPLETED_UNITS_KEY, &serde_json::to_string(&keys)?)?;
        self.store
            .set(CURRENT_FOCUS_KEY, &serde_json::to_string(&state.focus().to_string())?)?;
        Ok(())
    }
}
