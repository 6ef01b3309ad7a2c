use chrono::NaiveDate;
use stride_domain as domain;

use crate::log;

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, String>;
    async fn write_settings(&self, settings: Settings) -> Result<(), String>;
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Base URL of the CMS. Requests are relative to the current origin if empty.
    pub api_base_url: String,
    pub progress_window_days: u64,
    /// Maximum number of log entries kept by `Memory::from_settings` and
    /// `LocalStorage::from_settings`.
    pub log_capacity: usize,
}

impl Settings {
    /// Parse settings from JSON, using defaults for missing keys.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Period covered by the exercise progress charts.
    #[must_use]
    pub fn progress_interval(&self, today: NaiveDate) -> domain::Interval {
        domain::Interval::trailing(today, self.progress_window_days)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: String::new(),
            progress_window_days: domain::DefaultInterval::_1Y as u64,
            log_capacity: log::DEFAULT_CAPACITY,
        }
    }
}
