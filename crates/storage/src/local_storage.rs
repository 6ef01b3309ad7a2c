use std::collections::VecDeque;

use gloo_storage::Storage as GlooStorage;

use crate::{
    log,
    settings::{Settings, SettingsRepository},
};

const KEY_SETTINGS: &str = "settings";
const KEY_LOG: &str = "log";

pub struct LocalStorage {
    pub log_capacity: usize,
}

impl Default for LocalStorage {
    fn default() -> Self {
        Self {
            log_capacity: log::DEFAULT_CAPACITY,
        }
    }
}

impl LocalStorage {
    #[must_use]
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            log_capacity: settings.log_capacity,
        }
    }
}

impl SettingsRepository for LocalStorage {
    async fn read_settings(&self) -> Result<Settings, String> {
        match gloo_storage::LocalStorage::get(KEY_SETTINGS) {
            Ok(settings) => Ok(settings),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(Settings::default()),
                err => Err(err),
            },
        }
        .map_err(|err| err.to_string())
    }

    async fn write_settings(&self, settings: Settings) -> Result<(), String> {
        gloo_storage::LocalStorage::set(KEY_SETTINGS, settings).map_err(|err| err.to_string())
    }
}

impl log::Repository for LocalStorage {
    fn read_entries(&self) -> Result<VecDeque<log::Entry>, log::Error> {
        match gloo_storage::LocalStorage::get(KEY_LOG) {
            Ok(entries) => Ok(entries),
            Err(err) => match err {
                gloo_storage::errors::StorageError::KeyNotFound(_) => Ok(VecDeque::new()),
                err => Err(err),
            },
        }
        .map_err(|err| log::Error::Unknown(err.to_string()))
    }

    fn write_entry(&self, entry: log::Entry) -> Result<(), log::Error> {
        let mut entries = self.read_entries()?;
        log::push_entry(&mut entries, entry, self.log_capacity);
        gloo_storage::LocalStorage::set(KEY_LOG, entries)
            .map_err(|err| log::Error::Unknown(err.to_string()))
    }
}
