#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

pub mod cms;
#[cfg(target_arch = "wasm32")]
pub mod local_storage;
pub mod log;
pub mod memory;
pub mod rest;
pub mod settings;

pub use settings::{Settings, SettingsRepository};
