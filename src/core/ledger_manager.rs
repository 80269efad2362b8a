use std::path::PathBuf;

use crate::errors::{ExpenseError, Result};
use crate::ledger::ledger::CURRENT_SCHEMA_VERSION;
use crate::ledger::Ledger;
use crate::storage::StorageBackend;

/// Facade that coordinates the open ledger and its persistence.
pub struct LedgerManager {
    current: Option<Ledger>,
    current_name: Option<String>,
    storage: Box<dyn StorageBackend>,
}

impl LedgerManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            storage,
        }
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Starts a fresh ledger; refuses to shadow one already on disk.
    pub fn create(&mut self, name: &str) -> Result<&mut Ledger> {
        if self.storage.exists(name) {
            return Err(ExpenseError::InvalidInput(format!(
                "ledger `{}` already exists",
                name
            )));
        }
        tracing::info!(ledger = name, "ledger created");
        Ok(self.replace(Ledger::new(name), name))
    }

    /// Loads a stored ledger and re-derives its cached monthly amounts.
    pub fn load(&mut self, name: &str) -> Result<&mut Ledger> {
        let mut ledger = self.storage.load(name)?;
        ensure_schema_support(ledger.schema_version)?;
        ledger.refresh_all();
        tracing::info!(ledger = name, expenses = ledger.expense_count(), "ledger loaded");
        Ok(self.replace(ledger, name))
    }

    pub fn save(&mut self) -> Result<PathBuf> {
        let name = self
            .current_name
            .as_deref()
            .ok_or(ExpenseError::LedgerNotLoaded)?;
        let ledger = self.current.as_ref().ok_or(ExpenseError::LedgerNotLoaded)?;
        self.storage.save(ledger, name)
    }

    pub fn current(&self) -> Result<&Ledger> {
        self.current.as_ref().ok_or(ExpenseError::LedgerNotLoaded)
    }

    pub fn current_mut(&mut self) -> Result<&mut Ledger> {
        self.current.as_mut().ok_or(ExpenseError::LedgerNotLoaded)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.storage.list()
    }

    fn replace(&mut self, ledger: Ledger, name: &str) -> &mut Ledger {
        self.current_name = Some(name.to_string());
        self.current.insert(ledger)
    }
}

fn ensure_schema_support(version: u8) -> Result<()> {
    if version > CURRENT_SCHEMA_VERSION {
        return Err(ExpenseError::StorageError(format!(
            "ledger schema version {} is newer than supported version {}",
            version, CURRENT_SCHEMA_VERSION
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpenseRecord;
    use crate::storage::JsonStorage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn manager() -> (LedgerManager, TempDir) {
        let temp = TempDir::new().unwrap();
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
        (LedgerManager::new(Box::new(storage)), temp)
    }

    #[test]
    fn save_requires_a_loaded_ledger() {
        let (mut manager, _guard) = manager();
        assert!(matches!(manager.save(), Err(ExpenseError::LedgerNotLoaded)));
        assert!(matches!(manager.current(), Err(ExpenseError::LedgerNotLoaded)));
    }

    #[test]
    fn create_save_and_reload() {
        let (mut manager, temp) = manager();
        let ledger = manager.create("home").unwrap();
        ledger.add_expense(ExpenseRecord::one_time(
            "Groceries",
            64.0,
            NaiveDate::from_ymd_opt(2024, 8, 3).unwrap(),
        ));
        manager.save().unwrap();
        assert!(manager.create("home").is_err());

        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).unwrap();
        let mut reopened = LedgerManager::new(Box::new(storage));
        let loaded = reopened.load("home").unwrap();
        assert_eq!(loaded.expense_count(), 1);
        assert_eq!(reopened.current_name(), Some("home"));
        assert_eq!(reopened.list().unwrap(), vec!["home"]);
    }

    #[test]
    fn newer_schema_is_rejected() {
        let (mut manager, _guard) = manager();
        let mut ledger = Ledger::new("future");
        ledger.schema_version = CURRENT_SCHEMA_VERSION + 1;
        manager.storage().save(&ledger, "future").unwrap();
        assert!(matches!(
            manager.load("future"),
            Err(ExpenseError::StorageError(_))
        ));
    }
}
