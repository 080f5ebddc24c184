use crate::error::ConfigError;
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const MONSTERS_ENABLED_KEY: &str = "monstersEnabled";

/// Whether hostile creatures may exist in the hosted worlds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MonsterPolicy {
    pub enabled: bool,
}

impl MonsterPolicy {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

/// The plugin's `config.yaml`.
///
/// The whole document is kept between load and save so keys this plugin
/// does not know about survive a rewrite in their original order.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
    document: Mapping,
}

impl ConfigStore {
    pub fn from_data_dir(data_dir: &Path) -> Self {
        Self::new(data_dir.join(CONFIG_FILE_NAME))
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: Mapping::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the policy, filling in and persisting defaults.
    ///
    /// A missing file or a missing/non-boolean `monstersEnabled` both fall
    /// back to `false`. A file that exists but cannot be read or parsed is
    /// an error, as is failing to write the defaulted document back.
    pub fn load(&mut self) -> Result<MonsterPolicy, ConfigError> {
        self.document = match fs::read_to_string(&self.path) {
            Ok(data) => parse_document(&self.path, &data)?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Mapping::new(),
            Err(err) => {
                return Err(ConfigError::Read {
                    path: self.path.clone(),
                    source: err,
                })
            }
        };

        let key = Value::String(MONSTERS_ENABLED_KEY.to_string());
        let enabled = match self.document.get(&key) {
            Some(Value::Bool(enabled)) => *enabled,
            Some(Value::String(text)) => yaml11_bool(text).unwrap_or(false),
            _ => false,
        };
        let policy = MonsterPolicy::new(enabled);
        self.save(policy)?;
        Ok(policy)
    }

    /// Writes the policy into the document and the document to disk,
    /// creating the data directory if needed.
    pub fn save(&mut self, policy: MonsterPolicy) -> Result<(), ConfigError> {
        self.document.insert(
            Value::String(MONSTERS_ENABLED_KEY.to_string()),
            Value::Bool(policy.enabled),
        );
        let data = serde_yaml::to_string(&self.document).map_err(ConfigError::Serialize)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|err| ConfigError::Write {
                    path: parent.to_path_buf(),
                    source: err,
                })?;
            }
        }
        fs::write(&self.path, data).map_err(|err| ConfigError::Write {
            path: self.path.clone(),
            source: err,
        })
    }
}

// Hand-edited files may use YAML 1.1 spellings that YAML 1.2 reads as text.
fn yaml11_bool(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "yes" | "on" | "y" => Some(true),
        "no" | "off" | "n" => Some(false),
        _ => None,
    }
}

fn parse_document(path: &Path, data: &str) -> Result<Mapping, ConfigError> {
    if data.trim().is_empty() {
        return Ok(Mapping::new());
    }
    let value: Value = serde_yaml::from_str(data).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        source: err,
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(ConfigError::NotAMapping {
            path: path.to_path_buf(),
        }),
    }
}
