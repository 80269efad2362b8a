use thiserror::Error;
use uuid::Uuid;

/// Unified error type for the ledger, storage, and configuration layers.
#[derive(Debug, Error)]
pub enum ExpenseError {
    #[error("Ledger not loaded")]
    LedgerNotLoaded,
    #[error("Expense not found: {0}")]
    ExpenseNotFound(Uuid),
    #[error("Persistence error: {0}")]
    StorageError(String),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, ExpenseError>;

impl From<std::io::Error> for ExpenseError {
    fn from(err: std::io::Error) -> Self {
        ExpenseError::StorageError(err.to_string())
    }
}

impl From<serde_json::Error> for ExpenseError {
    fn from(err: serde_json::Error) -> Self {
        ExpenseError::StorageError(err.to_string())
    }
}

/// User-facing CLI error wrapper.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ExpenseError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}
