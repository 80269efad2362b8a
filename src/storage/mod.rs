pub mod json_backend;

use std::path::PathBuf;

use crate::{errors::ExpenseError, ledger::Ledger};

pub type Result<T> = std::result::Result<T, ExpenseError>;

/// Abstraction over persistence backends capable of storing named ledgers.
pub trait StorageBackend: Send + Sync {
    fn save(&self, ledger: &Ledger, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<Ledger>;
    fn exists(&self, name: &str) -> bool;
    fn list(&self) -> Result<Vec<String>>;
    fn remove(&self, name: &str) -> Result<()>;
    fn ledger_path(&self, name: &str) -> PathBuf;
}

pub use json_backend::JsonStorage;
