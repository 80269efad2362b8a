//! Fixed monthly payment for a principal repaid between two dates.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::months_between;

/// Outcome of pricing a long-term expense.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PaymentQuote {
    /// A usable term of `months` installments of `payment` each.
    Amortized { months: u32, payment: f64 },
    /// The end date does not fall in a later month than the start date.
    Degenerate,
}

impl PaymentQuote {
    /// Payment per month, zero for a degenerate term.
    pub fn amount(&self) -> f64 {
        match self {
            PaymentQuote::Amortized { payment, .. } => *payment,
            PaymentQuote::Degenerate => 0.0,
        }
    }

    pub fn months(&self) -> u32 {
        match self {
            PaymentQuote::Amortized { months, .. } => *months,
            PaymentQuote::Degenerate => 0,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        matches!(self, PaymentQuote::Degenerate)
    }

    /// Sum of all installments.
    pub fn total_paid(&self) -> f64 {
        self.amount() * self.months() as f64
    }
}

/// Prices `amount` repaid monthly from `start` to `end` at an annual
/// percentage `interest_rate`.
pub fn quote_monthly_payment(
    amount: f64,
    interest_rate: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> PaymentQuote {
    let months = months_between(start, end);
    if months <= 0 {
        return PaymentQuote::Degenerate;
    }
    let months = u32::try_from(months).unwrap_or(u32::MAX);
    PaymentQuote::Amortized {
        months,
        payment: installment(amount, interest_rate, months),
    }
}

/// Monthly payment as a bare number; degenerate terms yield `0.0`.
pub fn compute_monthly_payment(
    amount: f64,
    interest_rate: f64,
    start: NaiveDate,
    end: NaiveDate,
) -> f64 {
    quote_monthly_payment(amount, interest_rate, start, end).amount()
}

fn installment(amount: f64, interest_rate: f64, months: u32) -> f64 {
    if interest_rate == 0.0 {
        return amount / months as f64;
    }
    let monthly_rate = interest_rate / 12.0 / 100.0;
    // 1 - (1 + r)^-n, kept accurate for tiny r and large n.
    let discount = -(-(months as f64) * monthly_rate.ln_1p()).exp_m1();
    amount * (monthly_rate / discount)
}
