use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::{ExpenseError, Result},
    ledger::{InstallmentBoundary, SeriesOrder},
    storage::json_backend::{tmp_path, write_atomic},
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Display label only; amounts are never converted.
    pub currency: String,
    #[serde(default)]
    pub series_order: SeriesOrder,
    #[serde(default)]
    pub boundary: InstallmentBoundary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_opened_ledger: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency: "USD".into(),
            series_order: SeriesOrder::default(),
            boundary: InstallmentBoundary::default(),
            last_opened_ledger: None,
        }
    }
}

impl Config {
    pub fn format_amount(&self, amount: f64) -> String {
        format!("{} {:.2}", self.currency, amount)
    }

    /// Applies a `key=value` override as used by the CLI `config set` command.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "currency" => {
                let code = value.trim().to_uppercase();
                if code.is_empty() {
                    return Err(ExpenseError::ConfigError("currency must not be empty".into()));
                }
                self.currency = code;
            }
            "series_order" => {
                self.series_order = match value {
                    "first-seen" => SeriesOrder::FirstSeen,
                    "chronological" => SeriesOrder::Chronological,
                    other => {
                        return Err(ExpenseError::ConfigError(format!(
                            "unknown series order `{}` (expected first-seen or chronological)",
                            other
                        )))
                    }
                };
            }
            "boundary" => {
                self.boundary = match value {
                    "installments" => InstallmentBoundary::Installments,
                    "through-end-date" => InstallmentBoundary::ThroughEndDate,
                    other => {
                        return Err(ExpenseError::ConfigError(format!(
                            "unknown boundary `{}` (expected installments or through-end-date)",
                            other
                        )))
                    }
                };
            }
            other => {
                return Err(ExpenseError::ConfigError(format!(
                    "unknown configuration key `{}`",
                    other
                )))
            }
        }
        Ok(())
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    /// Reads the stored configuration, or the defaults when none was saved.
    pub fn load(&self) -> Result<Config> {
        if !self.path.exists() {
            return Ok(Config::default());
        }
        let data = fs::read_to_string(&self.path)?;
        serde_json::from_str(&data).map_err(|err| {
            ExpenseError::ConfigError(format!("{}: {}", self.path.display(), err))
        })
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
