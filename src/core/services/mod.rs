pub mod expense_service;
pub mod summary_service;

pub use expense_service::{ExpenseDraft, ExpenseService};
pub use summary_service::{SummaryOptions, SummaryService};

use uuid::Uuid;

use crate::errors::{CliError, ExpenseError};

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),
    #[error("Expense not found: {0}")]
    NotFound(Uuid),
}

impl From<ServiceError> for ExpenseError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Validation(message) => ExpenseError::InvalidInput(message),
            ServiceError::NotFound(id) => ExpenseError::ExpenseNotFound(id),
        }
    }
}

impl From<ServiceError> for CliError {
    fn from(err: ServiceError) -> Self {
        CliError::Core(err.into())
    }
}
