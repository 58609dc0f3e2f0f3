//! Platform directory resolution.

use std::path::PathBuf;

const APP_DIR: &str = "concert-connect";

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
}

pub fn temp_dir() -> PathBuf {
    std::env::temp_dir().join(APP_DIR)
}
