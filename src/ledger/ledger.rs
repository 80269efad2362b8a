use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ExpenseRecord;

use super::aggregation::{InstallmentBoundary, MonthlyAggregator, MonthlyBreakdown};
use super::amortization::PaymentQuote;

pub(crate) const CURRENT_SCHEMA_VERSION: u8 = 1;

/// One user's expenses. Every write goes through here so the cached
/// monthly amounts never drift from their inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ledger {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub expenses: Vec<ExpenseRecord>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "Ledger::schema_version_default")]
    pub schema_version: u8,
}

impl Ledger {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            expenses: Vec::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    /// Stores `expense` after re-deriving its monthly amount.
    pub fn add_expense(&mut self, mut expense: ExpenseRecord) -> Uuid {
        let quote = expense.refresh_monthly_amount();
        log_quote(&expense, quote);
        let id = expense.id;
        self.expenses.push(expense);
        self.touch();
        id
    }

    /// Applies `mutator` to the expense and re-derives its monthly amount.
    /// Returns `None` when no expense has that id.
    pub fn update_expense<F>(&mut self, id: Uuid, mutator: F) -> Option<&ExpenseRecord>
    where
        F: FnOnce(&mut ExpenseRecord),
    {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        {
            let expense = &mut self.expenses[index];
            mutator(expense);
            expense.id = id;
            let quote = expense.refresh_monthly_amount();
            log_quote(expense, quote);
            expense.touch();
        }
        self.touch();
        self.expenses.get(index)
    }

    pub fn remove_expense(&mut self, id: Uuid) -> Option<ExpenseRecord> {
        let index = self.expenses.iter().position(|e| e.id == id)?;
        let removed = self.expenses.remove(index);
        self.touch();
        Some(removed)
    }

    pub fn expense(&self, id: Uuid) -> Option<&ExpenseRecord> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn expense_count(&self) -> usize {
        self.expenses.len()
    }

    /// Re-derives every cached monthly amount, e.g. after loading old data.
    pub fn refresh_all(&mut self) {
        for expense in &mut self.expenses {
            let quote = expense.refresh_monthly_amount();
            log_quote(expense, quote);
        }
    }

    /// Sum of everything the ledger's expenses will cost over their terms.
    pub fn scheduled_total(&self) -> f64 {
        self.expenses.iter().map(ExpenseRecord::scheduled_total).sum()
    }

    pub fn monthly_breakdown(&self, boundary: InstallmentBoundary) -> MonthlyBreakdown {
        MonthlyAggregator::new(boundary).aggregate(&self.expenses)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }
}

fn log_quote(expense: &ExpenseRecord, quote: Option<PaymentQuote>) {
    match quote {
        Some(PaymentQuote::Degenerate) => tracing::warn!(
            expense = %expense.id,
            name = %expense.name,
            "end date is not in a later month than the start date; monthly amount set to zero"
        ),
        Some(PaymentQuote::Amortized { months, payment }) => tracing::debug!(
            expense = %expense.id,
            months,
            payment,
            "derived monthly amount"
        ),
        None => {}
    }
}
