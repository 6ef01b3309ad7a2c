use std::{
    collections::{BTreeMap, VecDeque},
    sync::Mutex,
};

use crate::{
    log,
    settings::{Settings, SettingsRepository},
};

const KEY_SETTINGS: &str = "settings";
const KEY_LOG: &str = "log";

/// Key-value store holding JSON values in memory, for hosts without local storage.
pub struct Memory {
    values: Mutex<BTreeMap<&'static str, String>>,
    log_capacity: usize,
}

impl Memory {
    #[must_use]
    pub fn new(log_capacity: usize) -> Self {
        Self {
            values: Mutex::new(BTreeMap::new()),
            log_capacity,
        }
    }

    /// Store whose log keeps as many entries as configured.
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.log_capacity)
    }

    fn get(&self, key: &str) -> Result<Option<String>, String> {
        self.values
            .lock()
            .map(|values| values.get(key).cloned())
            .map_err(|err| err.to_string())
    }

    fn set(&self, key: &'static str, value: String) -> Result<(), String> {
        self.values
            .lock()
            .map(|mut values| {
                values.insert(key, value);
            })
            .map_err(|err| err.to_string())
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new(log::DEFAULT_CAPACITY)
    }
}

impl SettingsRepository for Memory {
    async fn read_settings(&self) -> Result<Settings, String> {
        match self.get(KEY_SETTINGS)? {
            Some(json) => Settings::from_json(&json).map_err(|err| err.to_string()),
            None => Ok(Settings::default()),
        }
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        let json = serde_json::to_string(&settings).map_err(|err| err.to_string())?;
        self.set(KEY_SETTINGS, json)
    }
}

impl log::Repository for Memory {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match self.get(KEY_LOG).map_err(log::Error::Unknown)? {
            Some(json) => {
                serde_json::from_str(&json).map_err(|err| log::Error::Unknown(err.to_string()))
            }
            None => Ok(VecDeque::new()),
        }
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::push_entry(&mut entries, entry, self.log_capacity);
        let json =
            serde_json::to_string(&entries).map_err(|err| log::Error::Unknown(err.to_string()))?;
        self.set(KEY_LOG, json).map_err(log::Error::Unknown)
    }
}
