//! Plain data types shared by the ledger, services, and CLI.

pub mod expense;
pub mod month;

pub use expense::ExpenseRecord;
pub use month::{months_between, MonthParseError, YearMonth};

/// One-line summary used by listings and removal confirmations.
pub trait Displayable {
    fn display_label(&self) -> String;
}
