//! Demo configuration, read from `config.json` in the config directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use simplelog::LevelFilter;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown log level: {0}")]
    LogLevel(String),
    #[error("logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error(transparent)]
    Menu(#[from] dropdown_menu::Error),
    #[error(transparent)]
    Dom(#[from] tuidom::DomError),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct DemoConfig {
    /// Initial `button-text`. None leaves the attribute unset.
    pub button_text: Option<String>,
    /// Start with the menu disabled.
    pub disabled: bool,
    /// Labels of the items shown in the panel.
    pub items: Vec<String>,
    /// Labels cycled through with `t`.
    pub labels: Vec<String>,
    pub log_level: String,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            button_text: None,
            disabled: false,
            items: ["New", "Open", "Save", "Quit"]
                .into_iter()
                .map(String::from)
                .collect(),
            labels: ["File", "Edit", "View"]
                .into_iter()
                .map(String::from)
                .collect(),
            log_level: "debug".into(),
        }
    }
}

impl DemoConfig {
    /// Load from the platform config file. A missing file yields defaults.
    pub fn load() -> Result<Self, DemoError> {
        match crate::paths::config_file() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self, DemoError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text).map_err(|source| DemoError::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn level(&self) -> Result<LevelFilter, DemoError> {
        LevelFilter::from_str(&self.log_level)
            .map_err(|_| DemoError::LogLevel(self.log_level.clone()))
    }
}
