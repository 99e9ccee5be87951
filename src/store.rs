use crate::error::Result;
use chrono::{DateTime, Local};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(test)]
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Key-value collaborator holding persisted integers such as the best score.
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<u32>;

    /// Fire-and-forget write. Implementations log failures instead of returning them.
    fn set(&mut self, key: &str, value: u32);
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
struct StoredScore {
    value: u32,
    updated_at: DateTime<Local>,
}

/// Scores kept in a pretty-printed JSON file next to the executable.
pub struct JsonFileStore {
    path: PathBuf,
    entries: BTreeMap<String, StoredScore>,
}

impl JsonFileStore {
    /// Opens the store. A missing or corrupt file starts out empty.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match Self::read_entries(&path) {
            Ok(entries) => entries,
            Err(e) => {
                warn!("Could not load scores from {}: {}", path.display(), e);
                BTreeMap::new()
            }
        };
        for (key, entry) in &entries {
            info!(
                "Loaded {} = {} (set {})",
                key,
                entry.value,
                entry.updated_at.format("%Y-%m-%d %H:%M")
            );
        }
        JsonFileStore { path, entries }
    }

    fn read_entries(path: &Path) -> Result<BTreeMap<String, StoredScore>> {
        match fs::read_to_string(path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

impl ScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<u32> {
        self.entries.get(key).map(|entry| entry.value)
    }

    fn set(&mut self, key: &str, value: u32) {
        self.entries.insert(
            key.to_string(),
            StoredScore {
                value,
                updated_at: Local::now(),
            },
        );
        self.save()
            .unwrap_or_else(|e| warn!("Failed to save scores to {}: {}", self.path.display(), e));
    }
}

#[cfg(test)]
#[derive(Default, Debug, Clone)]
pub struct MemoryStore {
    values: HashMap<String, u32>,
}

#[cfg(test)]
impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<u32> {
        self.values.get(key).copied()
    }

    fn set(&mut self, key: &str, value: u32) {
        self.values.insert(key.to_string(), value);
    }
}
