use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{HelixisError, Result};

pub const PROJECT_CONFIG_FILE: &str = ".helixis.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub password: PasswordConfig,
    pub color: ColorConfig,
    pub portscan: PortScanConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordConfig {
    pub length: usize,
    pub uppercase: usize,
    pub digits: usize,
    pub special: usize,
    pub special_chars: String,
    pub separator: char,
    pub separator_frequency: usize,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            length: 18,
            uppercase: 1,
            digits: 1,
            special: 0,
            special_chars: crate::domain::password::DEFAULT_SPECIAL_CHARS.to_string(),
            separator: '-',
            separator_frequency: 6,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub sigma: f64,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self { sigma: 30.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PortScanConfig {
    pub timeout_ms: u64,
    pub workers: usize,
    pub deadline_secs: u64,
}

impl Default for PortScanConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 200,
            workers: 100,
            deadline_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: Option<String>,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Partial config as written on disk. Every field is optional so a project
/// file can override a single key without resetting the global one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    password: PasswordFile,
    color: ColorFile,
    portscan: PortScanFile,
    log: LogFile,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PasswordFile {
    length: Option<usize>,
    uppercase: Option<usize>,
    digits: Option<usize>,
    special: Option<usize>,
    special_chars: Option<String>,
    separator: Option<char>,
    separator_frequency: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ColorFile {
    sigma: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct PortScanFile {
    timeout_ms: Option<u64>,
    workers: Option<usize>,
    deadline_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct LogFile {
    level: Option<String>,
    format: Option<LogFormat>,
}

impl Config {
    /// Global config, then `.helixis.toml` in the working directory, then env.
    pub fn load() -> Result<Self> {
        let global = Self::read_file(&Self::global_path())?;
        let project = Self::read_file(Path::new(PROJECT_CONFIG_FILE))?;
        let merged = Self::default().apply(global).apply(project);
        Ok(merged.with_env_overrides())
    }

    /// Loads a single explicit file; a missing file is an error here.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(HelixisError::Config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let file = Self::read_file(path)?;
        Ok(Self::default().apply(file).with_env_overrides())
    }

    pub fn global_path() -> PathBuf {
        let config_dir = directories::ProjectDirs::from("", "", "helixis").map_or_else(
            || PathBuf::from("~/.config/helixis"),
            |d| d.config_dir().to_path_buf(),
        );
        config_dir.join("config.toml")
    }

    fn read_file(path: &Path) -> Result<ConfigFile> {
        if !path.exists() {
            return Ok(ConfigFile::default());
        }

        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| HelixisError::Config(format!("{}: {e}", path.display())))
    }

    fn apply(mut self, file: ConfigFile) -> Self {
        let p = file.password;
        if let Some(v) = p.length {
            self.password.length = v;
        }
        if let Some(v) = p.uppercase {
            self.password.uppercase = v;
        }
        if let Some(v) = p.digits {
            self.password.digits = v;
        }
        if let Some(v) = p.special {
            self.password.special = v;
        }
        if let Some(v) = p.special_chars {
            self.password.special_chars = v;
        }
        if let Some(v) = p.separator {
            self.password.separator = v;
        }
        if let Some(v) = p.separator_frequency {
            self.password.separator_frequency = v;
        }

        if let Some(v) = file.color.sigma {
            self.color.sigma = v;
        }

        let s = file.portscan;
        if let Some(v) = s.timeout_ms {
            self.portscan.timeout_ms = v;
        }
        if let Some(v) = s.workers {
            self.portscan.workers = v;
        }
        if let Some(v) = s.deadline_secs {
            self.portscan.deadline_secs = v;
        }

        if file.log.level.is_some() {
            self.log.level = file.log.level;
        }
        if let Some(v) = file.log.format {
            self.log.format = v;
        }
        self
    }

    fn with_env_overrides(mut self) -> Self {
        if let Ok(level) = std::env::var("HELIXIS_LOG") {
            self.log.level = Some(level);
        }
        if let Ok(format) = std::env::var("HELIXIS_LOG_FORMAT") {
            if format.eq_ignore_ascii_case("json") {
                self.log.format = LogFormat::Json;
            } else if format.eq_ignore_ascii_case("text") {
                self.log.format = LogFormat::Text;
            }
        }
        self
    }
}
