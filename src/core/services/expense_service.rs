//! Validated create/update/remove helpers for ledger expenses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::ExpenseRecord;
use crate::ledger::Ledger;

/// Raw expense input as collected from a form or the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseDraft {
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub long_term: bool,
    #[serde(default)]
    pub interest_rate: Option<f64>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl ExpenseDraft {
    pub fn one_time(name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            amount,
            date,
            long_term: false,
            interest_rate: None,
            end_date: None,
        }
    }

    pub fn long_term(
        name: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        interest_rate: f64,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            long_term: true,
            interest_rate: Some(interest_rate),
            end_date: Some(end_date),
            ..Self::one_time(name, amount, date)
        }
    }

    /// Checks the draft and normalizes it: one-time drafts lose any term
    /// fields, long-term drafts must carry both a rate and an end date.
    pub fn validate(mut self) -> ServiceResult<Self> {
        self.name = self.name.trim().to_string();
        if self.name.is_empty() {
            return Err(ServiceError::Validation("Name must not be empty.".into()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(ServiceError::Validation(
                "Amount must be a non-negative number.".into(),
            ));
        }
        if !self.long_term {
            self.interest_rate = None;
            self.end_date = None;
            return Ok(self);
        }
        match (self.interest_rate, self.end_date) {
            (Some(rate), Some(_)) if rate.is_finite() && rate >= 0.0 => Ok(self),
            (Some(_), Some(_)) => Err(ServiceError::Validation(
                "Interest rate must be a non-negative number.".into(),
            )),
            _ => Err(ServiceError::Validation(
                "Interest rate and end date must be provided for long-term expenses.".into(),
            )),
        }
    }

    fn apply_to(self, record: &mut ExpenseRecord) {
        record.name = self.name;
        record.amount = self.amount;
        record.date = self.date;
        record.long_term = self.long_term;
        record.interest_rate = self.interest_rate;
        record.end_date = self.end_date;
    }

    fn into_record(self) -> ExpenseRecord {
        let mut record = ExpenseRecord::one_time(self.name.clone(), self.amount, self.date);
        self.apply_to(&mut record);
        record
    }
}

pub struct ExpenseService;

impl ExpenseService {
    /// Validates the draft, stores it, and returns the new identifier.
    pub fn add(ledger: &mut Ledger, draft: ExpenseDraft) -> ServiceResult<Uuid> {
        let record = draft.validate()?.into_record();
        let id = ledger.add_expense(record);
        tracing::info!(expense = %id, ledger = %ledger.name, "expense added");
        Ok(id)
    }

    /// Replaces the editable fields of an existing expense.
    pub fn update(ledger: &mut Ledger, id: Uuid, draft: ExpenseDraft) -> ServiceResult<()> {
        let draft = draft.validate()?;
        ledger
            .update_expense(id, |record| draft.apply_to(record))
            .ok_or(ServiceError::NotFound(id))?;
        tracing::info!(expense = %id, ledger = %ledger.name, "expense updated");
        Ok(())
    }

    pub fn remove(ledger: &mut Ledger, id: Uuid) -> ServiceResult<ExpenseRecord> {
        let removed = ledger
            .remove_expense(id)
            .ok_or(ServiceError::NotFound(id))?;
        tracing::info!(expense = %id, ledger = %ledger.name, "expense removed");
        Ok(removed)
    }

    pub fn list(ledger: &Ledger) -> Vec<&ExpenseRecord> {
        ledger.expenses.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn long_term_without_end_date_is_rejected() {
        let mut draft = ExpenseDraft::one_time("Loan", 1000.0, date(2024, 1, 1));
        draft.long_term = true;
        draft.interest_rate = Some(5.0);
        let err = draft.validate().expect_err("missing end date");
        assert!(
            matches!(err, ServiceError::Validation(ref message) if message.contains("end date")),
            "unexpected error: {err:?}"
        );
    }

    #[test]
    fn zero_interest_rate_is_accepted() {
        let draft = ExpenseDraft::long_term("Fridge", 800.0, date(2024, 1, 1), 0.0, date(2024, 9, 1));
        assert!(draft.validate().is_ok());
    }

    #[test]
    fn one_time_draft_drops_term_fields() {
        let mut draft = ExpenseDraft::one_time("Shoes", 90.0, date(2024, 4, 4));
        draft.interest_rate = Some(3.0);
        draft.end_date = Some(date(2025, 4, 4));
        let cleaned = draft.validate().unwrap();
        assert_eq!(cleaned.interest_rate, None);
        assert_eq!(cleaned.end_date, None);
    }

    #[test]
    fn negative_amount_is_rejected() {
        let draft = ExpenseDraft::one_time("Refund", -5.0, date(2024, 4, 4));
        assert!(draft.validate().is_err());
        let blank = ExpenseDraft::one_time("   ", 5.0, date(2024, 4, 4));
        assert!(blank.validate().is_err());
    }

    #[test]
    fn update_recomputes_monthly_amount() {
        let mut ledger = Ledger::new("bob");
        let id = ExpenseService::add(
            &mut ledger,
            ExpenseDraft::long_term("Fridge", 800.0, date(2024, 1, 1), 0.0, date(2024, 9, 1)),
        )
        .unwrap();
        assert_eq!(ledger.expense(id).unwrap().monthly_amount, Some(100.0));

        ExpenseService::update(
            &mut ledger,
            id,
            ExpenseDraft::long_term("Fridge", 800.0, date(2024, 1, 1), 0.0, date(2024, 5, 1)),
        )
        .unwrap();
        let record = ledger.expense(id).unwrap();
        assert_eq!(record.monthly_amount, Some(200.0));
        assert_eq!(record.id, id);
    }

    #[test]
    fn update_and_remove_fail_for_unknown_id() {
        let mut ledger = Ledger::new("bob");
        let missing = Uuid::new_v4();
        let draft = ExpenseDraft::one_time("Tea", 2.0, date(2024, 1, 1));
        assert!(matches!(
            ExpenseService::update(&mut ledger, missing, draft),
            Err(ServiceError::NotFound(id)) if id == missing
        ));
        assert!(matches!(
            ExpenseService::remove(&mut ledger, missing),
            Err(ServiceError::NotFound(_))
        ));
    }
}
