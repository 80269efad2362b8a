use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Displayable;
use crate::domain::month::{months_between, YearMonth};
use crate::ledger::amortization::{quote_monthly_payment, PaymentQuote};

/// A single expense, either paid once or repaid monthly over a term.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ExpenseRecord {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub long_term: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interest_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monthly_amount: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExpenseRecord {
    pub fn one_time(name: impl Into<String>, amount: f64, date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            amount,
            date,
            long_term: false,
            interest_rate: None,
            end_date: None,
            monthly_amount: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Builds a long-term expense with its monthly amount already derived.
    pub fn long_term(
        name: impl Into<String>,
        amount: f64,
        date: NaiveDate,
        interest_rate: f64,
        end_date: NaiveDate,
    ) -> Self {
        let mut record = Self::one_time(name, amount, date);
        record.long_term = true;
        record.interest_rate = Some(interest_rate);
        record.end_date = Some(end_date);
        record.refresh_monthly_amount();
        record
    }

    /// Re-derives `monthly_amount` from the amortization inputs.
    ///
    /// One-time records drop any long-term fields. Returns the quote used for
    /// long-term records so callers can surface degenerate terms.
    pub fn refresh_monthly_amount(&mut self) -> Option<PaymentQuote> {
        if !self.long_term {
            self.interest_rate = None;
            self.end_date = None;
            self.monthly_amount = None;
            return None;
        }
        let Some(end_date) = self.end_date else {
            self.monthly_amount = None;
            return None;
        };
        let rate = self.interest_rate.unwrap_or(0.0);
        let quote = quote_monthly_payment(self.amount, rate, self.date, end_date);
        self.monthly_amount = Some(quote.amount());
        Some(quote)
    }

    /// Number of monthly installments covered by a long-term record.
    pub fn installments(&self) -> u32 {
        match (self.long_term, self.end_date) {
            (true, Some(end)) => u32::try_from(months_between(self.date, end).max(0))
                .unwrap_or(u32::MAX),
            _ => 0,
        }
    }

    /// Total this record contributes across all months.
    pub fn scheduled_total(&self) -> f64 {
        if self.long_term {
            self.monthly_amount.unwrap_or(0.0) * self.installments() as f64
        } else {
            self.amount
        }
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::of(self.date)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Displayable for ExpenseRecord {
    fn display_label(&self) -> String {
        match (self.long_term, self.end_date, self.monthly_amount) {
            (true, Some(end), Some(monthly)) => format!(
                "{} ({:.2} from {} to {}, {:.2}/month)",
                self.name, self.amount, self.date, end, monthly
            ),
            _ => format!("{} ({:.2} on {})", self.name, self.amount, self.date),
        }
    }
}
