use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

use chrono::Local;
use log::{Level, LevelFilter, Metadata, Record, SetLoggerError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_CAPACITY: usize = 100;

pub static LOG: Mutex<Option<Arc<Mutex<dyn Repository>>>> = Mutex::new(None);

#[allow(clippy::missing_errors_doc)]
pub trait Repository: Send + Sync + 'static {
    fn read_entries(&self) -> Result<VecDeque<Entry>, Error>;
    fn write_entry(&self, entry: Entry) -> Result<(), Error>;
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("{0}")]
    Unknown(String),
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub time: String,
    #[serde(with = "LevelDef")]
    pub level: Level,
    pub message: String,
}

#[derive(Serialize, Deserialize)]
#[serde(remote = "Level")]
pub enum LevelDef {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Add an entry in front of the newest entries, keeping at most `capacity` entries.
pub fn push_entry(entries: &mut VecDeque<Entry>, entry: Entry, capacity: usize) {
    entries.push_front(entry);
    entries.truncate(capacity);
}

static LOGGER: Logger = Logger;

/// # Errors
///
/// Returns an error if the logger has already been initialized.
pub fn init(storage: Arc<Mutex<dyn Repository>>) -> Result<(), SetLoggerError> {
    if let Ok(mut log) = LOG.lock() {
        *log = Some(storage);
    }
    log::set_logger(&LOGGER).map(|()| log::set_max_level(LevelFilter::Trace))
}

struct Logger;

fn write(repository: &Mutex<dyn Repository>, record: &Record) {
    let message = record.args().to_string();

    #[cfg(target_arch = "wasm32")]
    match record.level() {
        Level::Error => gloo_console::error!(message.clone()),
        Level::Warn => gloo_console::warn!(message.clone()),
        Level::Info => gloo_console::info!(message.clone()),
        Level::Debug | Level::Trace => gloo_console::debug!(message.clone()),
    }

    if let Ok(repository) = repository.lock() {
        let _ = repository.write_entry(Entry {
            time: Local::now().format("%b %d %H:%M:%S").to_string(),
            level: record.level(),
            message,
        });
    }
}

impl log::Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= Level::Trace
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let Ok(log) = LOG.lock() else {
            return;
        };
        if let Some(ref log) = *log {
            write(log, record);
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::memory::Memory;

    fn entry(message: &str) -> Entry {
        Entry {
            time: "Mar 01 12:00:00".to_string(),
            level: Level::Info,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_push_entry() {
        let mut entries = VecDeque::new();
        for i in 0..5 {
            push_entry(&mut entries, entry(&i.to_string()), 3);
        }
        assert_eq!(
            entries.iter().map(|e| e.message.as_str()).collect::<Vec<_>>(),
            vec!["4", "3", "2"]
        );
    }

    #[test]
    fn test_entry_serialization() {
        let entry = Entry {
            level: Level::Warn,
            ..entry("failed to get workouts: no connection")
        };
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(
            value,
            json!({
                "time": "Mar 01 12:00:00",
                "level": "Warn",
                "message": "failed to get workouts: no connection",
            })
        );
        assert_eq!(serde_json::from_value::<Entry>(value).unwrap(), entry);
    }

    fn levels_and_messages(repository: &Mutex<dyn Repository>) -> Vec<(Level, String)> {
        repository
            .lock()
            .unwrap()
            .read_entries()
            .unwrap()
            .into_iter()
            .map(|e| (e.level, e.message))
            .collect()
    }

    #[test]
    fn test_write_keeps_newest_entries() {
        let memory: Mutex<Memory> = Mutex::new(Memory::new(2));

        write(&memory, &Record::builder().level(Level::Error).args(format_args!("one")).build());
        write(&memory, &Record::builder().level(Level::Warn).args(format_args!("two")).build());
        write(&memory, &Record::builder().level(Level::Info).args(format_args!("three")).build());

        assert_eq!(
            levels_and_messages(&memory),
            vec![
                (Level::Info, "three".to_string()),
                (Level::Warn, "two".to_string())
            ]
        );
    }

    #[test]
    fn test_init() {
        let memory: Arc<Mutex<dyn Repository>> = Arc::new(Mutex::new(Memory::default()));

        init(memory.clone()).unwrap();

        log::error!("logger test: one");
        log::warn!("logger test: two");
        log::info!("logger test: three");

        // Other tests may log concurrently once the logger is installed.
        let entries = levels_and_messages(&memory)
            .into_iter()
            .filter(|(_, message)| message.starts_with("logger test"))
            .collect::<Vec<_>>();
        assert_eq!(
            entries,
            vec![
                (Level::Info, "logger test: three".to_string()),
                (Level::Warn, "logger test: two".to_string()),
                (Level::Error, "logger test: one".to_string())
            ]
        );
        assert!(init(memory).is_err());
    }
}
