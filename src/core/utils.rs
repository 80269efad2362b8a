use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::errors::Result;

const DEFAULT_DIR_NAME: &str = ".expense_core";
const HOME_ENV: &str = "EXPENSE_CORE_HOME";
const LEDGER_DIR: &str = "ledgers";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";

/// Resolves the on-disk layout under the application data directory.
pub struct PathResolver;

impl PathResolver {
    /// `$EXPENSE_CORE_HOME`, falling back to `~/.expense_core`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn ledger_dir_in(base: &Path) -> PathBuf {
        base.join(LEDGER_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_is_rooted_at_base() {
        let base = PathBuf::from("/tmp/expense-home");
        assert_eq!(PathResolver::ledger_dir_in(&base), base.join("ledgers"));
        assert_eq!(
            PathResolver::config_file_in(&base),
            base.join("config").join("config.json")
        );
        assert_eq!(PathResolver::resolve_base(Some(base.clone())), base);
    }
}
