use crate::telemetry::logging::LogConfig;
use std::path::{Path, PathBuf};

pub const WORLDS_FILE_NAME: &str = "worlds.yaml";

#[derive(Debug)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub worlds_file: PathBuf,
    pub log: LogConfig,
}

impl AppConfig {
    pub fn from_args(args: &[String]) -> Result<Self, String> {
        Self::from_parts(args, std::env::var("XMONSTERS_LOG").ok().as_deref())
    }

    fn from_parts(args: &[String], log_level: Option<&str>) -> Result<Self, String> {
        if args.len() < 2 {
            return Err("usage: xmonsters <data-dir> [worlds-file]".to_string());
        }

        let data_dir = Path::new(&args[1]).to_path_buf();
        let worlds_file = if args.len() > 2 {
            PathBuf::from(&args[2])
        } else {
            data_dir.join(WORLDS_FILE_NAME)
        };
        let log = match log_level.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => LogConfig {
                level: LogConfig::parse_level(value)?,
            },
            None => LogConfig::default(),
        };
        Ok(Self {
            data_dir,
            worlds_file,
            log,
        })
    }
}
