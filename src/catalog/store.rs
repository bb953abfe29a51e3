use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use log::warn;
use serde::{Deserialize, Serialize};

use super::entry::Entry;
use super::seed::seed_entries;

const ENTRIES_FILE: &str = "entries.json";
const SETTINGS_FILE: &str = "sync.json";

/// Sync settings persisted next to the catalog.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct SyncSettings {
    pub sync_key: Option<String>,
}

/// Whole-file JSON persistence for the entry collection. Constructed once
/// and handed to the sync manager; nothing else touches the files.
pub struct CatalogStore {
    dir: PathBuf,
}

impl CatalogStore {
    pub fn open(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(CatalogStore { dir })
    }

    pub fn open_default() -> Result<Self> {
        let proj = directories::ProjectDirs::from("com", "launchdock", "launchdock")
            .ok_or_else(|| anyhow!("cannot resolve the user data directory"))?;
        Self::open(proj.data_local_dir().to_path_buf())
    }

    fn entries_path(&self) -> PathBuf {
        self.dir.join(ENTRIES_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.dir.join(SETTINGS_FILE)
    }

    /// Read the persisted collection. An absent record means first run;
    /// an unreadable one is discarded. Either way the seed set comes back
    /// and the next save overwrites whatever was on disk.
    pub fn load(&self) -> Vec<Entry> {
        let path = self.entries_path();
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(_) => return seed_entries(),
        };
        match serde_json::from_str::<Vec<Entry>>(&content) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("discarding unreadable catalog at {}: {e}", path.display());
                seed_entries()
            }
        }
    }

    /// Overwrite the persisted collection with the given one.
    pub fn save(&self, entries: &[Entry]) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.entries_path(), serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }

    pub fn load_settings(&self) -> SyncSettings {
        let content = match fs::read_to_string(self.settings_path()) {
            Ok(content) => content,
            Err(_) => return SyncSettings::default(),
        };
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("discarding unreadable sync settings: {e}");
                SyncSettings::default()
            }
        }
    }

    pub fn save_settings(&self, settings: &SyncSettings) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(
            self.settings_path(),
            serde_json::to_string_pretty(settings)?,
        )?;
        Ok(())
    }
}
