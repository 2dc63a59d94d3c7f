use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{car::types::CarType, Error, InternalResult};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,

    #[serde(default)]
    pub car_configs: CarConfigs,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarConfigs {
    #[serde(default = "default_cars")]
    pub cars: Vec<CarConfig>,
}

impl Default for CarConfigs {
    fn default() -> Self {
        Self {
            cars: default_cars(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarConfig {
    pub car_type: CarType,

    #[serde(default = "default_true")]
    pub enabled: bool,
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)
        .map_err(|e| Error::Internal(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| Error::Internal(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Internal(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

// デフォルト値の定義
fn default_event_buffer_size() -> usize {
    1000
}

fn default_true() -> bool {
    true
}

fn default_cars() -> Vec<CarConfig> {
    vec![
        CarConfig {
            car_type: CarType::Suv,
            enabled: true,
        },
        CarConfig {
            car_type: CarType::Racing,
            enabled: true,
        },
    ]
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            event_buffer_size: default_event_buffer_size(),
            car_configs: CarConfigs::default(),
        }
    }
}

impl SystemConfig {
    // JSONファイルから設定を読み込む
    pub fn from_file(path: &str) -> InternalResult<Self> {
        from_file(path)
    }
}
