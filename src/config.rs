use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app_dirs::AppDirs;
use crate::session::{Rules, BONUS_SECS, INITIAL_SECS};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub initial_secs: u32,
    pub bonus_secs: u32,
    pub dictionary: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            initial_secs: INITIAL_SECS,
            bonus_secs: BONUS_SECS,
            dictionary: None,
        }
    }
}

/// Values given on the command line, each replacing the stored one when set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub initial_secs: Option<u32>,
    pub bonus_secs: Option<u32>,
    pub dictionary: Option<PathBuf>,
}

impl Config {
    pub fn with_overrides(self, overrides: &Overrides) -> Self {
        Self {
            initial_secs: overrides.initial_secs.unwrap_or(self.initial_secs),
            bonus_secs: overrides.bonus_secs.unwrap_or(self.bonus_secs),
            dictionary: overrides.dictionary.clone().or(self.dictionary),
        }
    }

    pub fn rules(&self) -> Rules {
        Rules {
            initial_secs: self.initial_secs,
            bonus_secs: self.bonus_secs,
            ..Rules::default()
        }
    }
}

pub trait ConfigStore {
    fn load(&self) -> Config;
    fn save(&self, cfg: &Config) -> std::io::Result<()>;
}

#[derive(Debug, Clone)]
pub struct FileConfigStore {
    path: PathBuf,
}

impl FileConfigStore {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            path: AppDirs::config_path(),
        }
    }

    pub fn with_path<P: AsRef<Path>>(p: P) -> Self {
        Self {
            path: p.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Default for FileConfigStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigStore for FileConfigStore {
    fn load(&self) -> Config {
        let Ok(bytes) = fs::read(&self.path) else {
            return Config::default();
        };
        match serde_json::from_slice::<Config>(&bytes) {
            Ok(cfg) => cfg,
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring unreadable config");
                Config::default()
            }
        }
    }

    fn save(&self, cfg: &Config) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(cfg)?;
        fs::write(&self.path, data)
    }
}
