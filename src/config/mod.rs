use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Which storage adapter backs the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Sqlite,
    File,
    Memory,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Backend::Sqlite => "sqlite",
            Backend::File => "file",
            Backend::Memory => "memory",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_database")]
    pub database: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_database() -> String {
    Config::database_file().to_string_lossy().to_string()
}

fn default_data_dir() -> String {
    Config::config_dir().join("data").to_string_lossy().to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            database: default_database(),
            data_dir: default_data_dir(),
            log_level: default_log_level(),
        }
    }
}

impl Config {
    /// `<home>/.rhometasks`
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".rhometasks")
    }

    pub fn config_file() -> PathBuf {
        Self::config_dir().join("rhometasks.conf")
    }

    pub fn database_file() -> PathBuf {
        Self::config_dir().join("rhometasks.sqlite")
    }

    /// Load the configuration file, or defaults when there is none.
    pub fn load() -> AppResult<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(&content)?)
    }

    pub fn to_yaml(&self) -> AppResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Write the configuration file (unless `is_test`) and prepare the
    /// directory the selected backend lives in.
    pub fn init_all(&self, is_test: bool) -> AppResult<()> {
        if !is_test {
            let dir = Self::config_dir();
            fs::create_dir_all(&dir)?;
            let mut file = fs::File::create(Self::config_file())?;
            file.write_all(self.to_yaml()?.as_bytes())?;
            log::info!("wrote configuration to {}", Self::config_file().display());
        }

        match self.backend {
            Backend::Sqlite => {
                if let Some(parent) = Path::new(&self.database).parent() {
                    if !parent.as_os_str().is_empty() {
                        fs::create_dir_all(parent)?;
                    }
                }
            }
            Backend::File => fs::create_dir_all(&self.data_dir)?,
            Backend::Memory => {}
        }
        Ok(())
    }

    /// Apply per-invocation overrides. A `--db` path targets the file
    /// backend's directory when that backend is selected.
    pub fn with_overrides(mut self, db: Option<&str>, backend: Option<Backend>) -> AppResult<Self> {
        if let Some(b) = backend {
            self.backend = b;
        }
        if let Some(path) = db {
            if path.trim().is_empty() {
                return Err(AppError::Config("--db path must not be empty".into()));
            }
            match self.backend {
                Backend::File => self.data_dir = path.to_string(),
                _ => self.database = path.to_string(),
            }
        }
        Ok(self)
    }
}
