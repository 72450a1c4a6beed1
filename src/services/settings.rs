use crate::domain::models::Settings;
use std::path::{Path, PathBuf};

pub const DEFAULT_SETTINGS_FILE: &str = "clos-verify.toml";

#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

fn read_settings(path: &Path) -> Result<Settings, SettingsError> {
    let raw = std::fs::read_to_string(path).map_err(|source| SettingsError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| SettingsError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// An explicit path must exist; otherwise `./clos-verify.toml` is used when
/// present and built-in defaults when not.
pub fn load_settings(explicit: Option<&Path>) -> Result<Settings, SettingsError> {
    if let Some(path) = explicit {
        return read_settings(path);
    }
    let fallback = PathBuf::from(DEFAULT_SETTINGS_FILE);
    if !fallback.exists() {
        return Ok(Settings::default());
    }
    read_settings(&fallback)
}
