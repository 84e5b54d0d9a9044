use std::env;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Environment variable that relocates all application data.
pub const HOME_ENV_VAR: &str = "AMAZONIA_VIVA_HOME";
/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".amazonia-viva";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "amazonia-viva.sqlite";
const LOG_FILE_NAME: &str = "amazonia-viva.log";
const EXPORT_DIR_NAME: &str = "exports";

/// Where the application keeps its database, log and exports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    /// Resolve the data directory from the environment, falling back to a
    /// dot-folder in the user's home.
    pub fn from_env() -> Result<Self> {
        if let Some(custom) = env::var_os(HOME_ENV_VAR).filter(|value| !value.is_empty()) {
            return Ok(Self::with_data_dir(custom));
        }

        let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::with_data_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(LOG_FILE_NAME)
    }

    pub fn export_dir(&self) -> PathBuf {
        self.data_dir.join(EXPORT_DIR_NAME)
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_paths_live_under_the_data_dir() {
        let config = AppConfig::with_data_dir("/tmp/av");
        assert_eq!(config.db_path(), Path::new("/tmp/av/amazonia-viva.sqlite"));
        assert_eq!(config.log_path(), Path::new("/tmp/av/amazonia-viva.log"));
        assert_eq!(config.export_dir(), Path::new("/tmp/av/exports"));
    }
}
