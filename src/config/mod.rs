use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::errors::LedgerError;
use crate::utils::paths;

const TMP_SUFFIX: &str = "tmp";

pub const DEFAULT_HISTORY_LIMIT: usize = 50;
pub const DEFAULT_LOCK_DEBOUNCE_MS: u64 = 100;
pub const DEFAULT_BUDGET_TOLERANCE: f64 = 0.01;

/// Tunables for the planner. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default = "PlannerConfig::default_history_limit")]
    pub history_limit: usize,
    #[serde(default = "PlannerConfig::default_lock_debounce_ms")]
    pub lock_debounce_ms: u64,
    #[serde(default = "PlannerConfig::default_budget_tolerance")]
    pub budget_tolerance: f64,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            history_limit: DEFAULT_HISTORY_LIMIT,
            lock_debounce_ms: DEFAULT_LOCK_DEBOUNCE_MS,
            budget_tolerance: DEFAULT_BUDGET_TOLERANCE,
        }
    }
}

impl PlannerConfig {
    fn default_history_limit() -> usize {
        DEFAULT_HISTORY_LIMIT
    }

    fn default_lock_debounce_ms() -> u64 {
        DEFAULT_LOCK_DEBOUNCE_MS
    }

    fn default_budget_tolerance() -> f64 {
        DEFAULT_BUDGET_TOLERANCE
    }

    /// Rejects values the planner cannot operate with.
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.history_limit == 0 {
            return Err(LedgerError::InvalidConfig(
                "history_limit must be at least 1".into(),
            ));
        }
        if !self.budget_tolerance.is_finite() || self.budget_tolerance < 0.0 {
            return Err(LedgerError::InvalidConfig(format!(
                "budget_tolerance must be a non-negative number, got {}",
                self.budget_tolerance
            )));
        }
        Ok(())
    }
}

/// Loads and stores [`PlannerConfig`] as JSON inside the application data directory.
pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(paths::app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        fs::create_dir_all(paths::config_dir_in(&base))?;
        Ok(Self {
            path: paths::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<PlannerConfig, LedgerError> {
        if !self.path.exists() {
            return Ok(PlannerConfig::default());
        }
        let data = fs::read_to_string(&self.path)?;
        let config: PlannerConfig = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save(&self, config: &PlannerConfig) -> Result<(), LedgerError> {
        config.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "planner config saved");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
