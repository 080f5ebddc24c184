use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config read failed for {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config parse failed for {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("config root in {} is not a mapping", .path.display())]
    NotAMapping { path: PathBuf },
    #[error("config serialize failed: {0}")]
    Serialize(#[source] serde_yaml::Error),
    #[error("config write failed for {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Faults reported by the hosting server runtime.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HostError {
    #[error("world '{world}' does not allow spawn flag changes")]
    SpawnFlagsLocked { world: String },
    #[error("command '{0}' is already registered")]
    CommandTaken(String),
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("unable to load plugin configuration: {0}")]
    Load(#[source] ConfigError),
    #[error(transparent)]
    Host(#[from] HostError),
}
