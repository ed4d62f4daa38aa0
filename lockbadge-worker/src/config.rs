use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::AppError;

pub const ENV_CONFIG: &str = "LOCKBADGE_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Initial remaining seconds for the countdown badge. Absent means the
    /// page has no badge and the tick loop stays idle.
    #[serde(default)]
    pub remaining_secs: Option<i64>,
    /// Tick period in seconds.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    /// Optional override for opening windows. Example: ["xdg-open"]
    #[serde(default)]
    pub open_cmd: Option<Vec<String>>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            remaining_secs: None,
            interval_secs: default_interval(),
            open_cmd: None,
        }
    }
}

fn default_interval() -> u64 {
    1
}

impl WorkerConfig {
    /// Resolves and loads the config. Every field has a default, so a missing
    /// file at the default location is not an error; an explicitly named file
    /// that fails to load is.
    pub fn find_and_load(cli_value: Option<PathBuf>) -> Result<(Option<PathBuf>, Self), AppError> {
        if let Some(p) = cli_value {
            let cfg = load_config(&p)?;
            return Ok((Some(p), cfg));
        }
        if let Ok(p) = std::env::var(ENV_CONFIG) {
            let p = PathBuf::from(p);
            let cfg = load_config(&p)?;
            return Ok((Some(p), cfg));
        }
        match default_config_path() {
            Some(p) if p.exists() => {
                let cfg = load_config(&p)?;
                Ok((Some(p), cfg))
            }
            _ => Ok((None, Self::default())),
        }
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let pd = ProjectDirs::from("dev", "lockbadge", "lockbadge")?;
    Some(pd.config_dir().join("worker.yaml"))
}

pub fn load_config(path: &PathBuf) -> Result<WorkerConfig, AppError> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("read {} failed: {e}", path.display())))?;
    serde_yaml::from_str(&data)
        .map_err(|e| AppError::Config(format!("parse {} failed: {e}", path.display())))
}
