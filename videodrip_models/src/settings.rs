use std::{path::PathBuf, time::Duration};

use serde::Deserialize;

use crate::catalog::{DEFAULT_VIDEOS, VideoCatalog};

#[derive(Deserialize, Debug)]
pub struct TelegramSettings {
    pub token: String,
}

#[derive(Deserialize, Debug)]
pub struct DeliverySettings {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    #[serde(default)]
    pub first_delay_secs: u64,
    #[serde(default = "default_cleanup_interval_secs")]
    pub cleanup_interval_secs: u64,
    #[serde(default = "default_restore_on_startup")]
    pub restore_on_startup: bool,
}

impl DeliverySettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }

    pub fn first_delay(&self) -> Duration {
        Duration::from_secs(self.first_delay_secs)
    }

    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs.max(1))
    }
}

impl Default for DeliverySettings {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            first_delay_secs: 0,
            cleanup_interval_secs: default_cleanup_interval_secs(),
            restore_on_startup: default_restore_on_startup(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct StorageSettings {
    #[serde(default = "default_storage_path")]
    pub path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            path: default_storage_path(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct CatalogSettings {
    #[serde(default = "default_videos")]
    pub videos: Vec<String>,
}

impl CatalogSettings {
    pub fn catalog(&self) -> VideoCatalog {
        VideoCatalog::new(self.videos.iter().cloned())
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            videos: default_videos(),
        }
    }
}

#[derive(Deserialize, Debug)]
pub struct Settings {
    pub telegram: TelegramSettings,
    #[serde(default)]
    pub delivery: DeliverySettings,
    #[serde(default)]
    pub storage: StorageSettings,
    #[serde(default)]
    pub catalog: CatalogSettings,
}

fn default_interval_secs() -> u64 {
    10
}

fn default_cleanup_interval_secs() -> u64 {
    300
}

fn default_restore_on_startup() -> bool {
    true
}

fn default_storage_path() -> PathBuf {
    PathBuf::from("user_data.json")
}

fn default_videos() -> Vec<String> {
    DEFAULT_VIDEOS.iter().map(|url| url.to_string()).collect()
}
