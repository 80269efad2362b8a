//! Spreads expenses over calendar months and sums them per month.

use std::collections::HashMap;
use std::iter::successors;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::month::add_months;
use crate::domain::{ExpenseRecord, YearMonth};

/// Decides which months a long-term expense is charged to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstallmentBoundary {
    /// One charge per installment: the start month and the following
    /// `installments - 1` months. Totals match the amortized schedule.
    #[default]
    Installments,
    /// Steps one month at a time from the previous charge date and charges
    /// every step that does not pass the end date. A day clamped at a short
    /// month stays clamped, so Jan 31 walks to Feb 29 and then Mar 29.
    ThroughEndDate,
}

/// Order in which months appear in the aggregated series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeriesOrder {
    /// Months in the order records first touched them.
    #[default]
    FirstSeen,
    Chronological,
}

/// One record's share of a single month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub expense_id: Uuid,
    pub name: String,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthBucket {
    pub month: YearMonth,
    pub contributions: Vec<Contribution>,
}

impl MonthBucket {
    fn new(month: YearMonth) -> Self {
        Self {
            month,
            contributions: Vec::new(),
        }
    }

    pub fn total(&self) -> f64 {
        self.contributions.iter().map(|c| c.amount).sum()
    }
}

/// Per-month detail of every contribution, plus the records left out.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MonthlyBreakdown {
    buckets: Vec<MonthBucket>,
    #[serde(skip)]
    index: HashMap<YearMonth, usize>,
    /// Long-term records missing a monthly amount or an end date.
    pub skipped: Vec<Uuid>,
}

impl MonthlyBreakdown {
    fn push(&mut self, month: YearMonth, contribution: Contribution) {
        let slot = match self.index.get(&month) {
            Some(slot) => *slot,
            None => {
                self.buckets.push(MonthBucket::new(month));
                let slot = self.buckets.len() - 1;
                self.index.insert(month, slot);
                slot
            }
        };
        self.buckets[slot].contributions.push(contribution);
    }

    pub fn buckets(&self) -> &[MonthBucket] {
        &self.buckets
    }

    pub fn get(&self, month: YearMonth) -> Option<&MonthBucket> {
        self.index.get(&month).map(|slot| &self.buckets[*slot])
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Summed amount per month, in bucket order.
    pub fn series(&self) -> Vec<(YearMonth, f64)> {
        self.buckets
            .iter()
            .map(|bucket| (bucket.month, bucket.total()))
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.buckets.iter().map(MonthBucket::total).sum()
    }

    /// Reorders buckets chronologically.
    pub fn sorted(mut self) -> Self {
        self.buckets.sort_by_key(|bucket| bucket.month);
        self.reindex();
        self
    }

    pub fn ordered(self, order: SeriesOrder) -> Self {
        match order {
            SeriesOrder::FirstSeen => self,
            SeriesOrder::Chronological => self.sorted(),
        }
    }

    fn reindex(&mut self) {
        self.index = self
            .buckets
            .iter()
            .enumerate()
            .map(|(slot, bucket)| (bucket.month, slot))
            .collect();
    }
}

/// Buckets expense records by calendar month.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyAggregator {
    boundary: InstallmentBoundary,
}

impl MonthlyAggregator {
    pub fn new(boundary: InstallmentBoundary) -> Self {
        Self { boundary }
    }

    pub fn aggregate<'a, I>(&self, records: I) -> MonthlyBreakdown
    where
        I: IntoIterator<Item = &'a ExpenseRecord>,
    {
        let mut breakdown = MonthlyBreakdown::default();
        let mut seen = 0usize;

        for record in records {
            seen += 1;
            if !record.long_term {
                breakdown.push(record.month(), contribution(record, record.amount));
                continue;
            }
            let (Some(monthly), Some(end)) = (record.monthly_amount, record.end_date) else {
                tracing::warn!(expense = %record.id, name = %record.name, "long-term expense has no monthly amount or end date; skipped");
                breakdown.skipped.push(record.id);
                continue;
            };
            for date in self.charge_dates(record, end) {
                breakdown.push(YearMonth::of(date), contribution(record, monthly));
            }
        }

        tracing::debug!(
            records = seen,
            months = breakdown.len(),
            skipped = breakdown.skipped.len(),
            "aggregated expenses"
        );
        breakdown
    }

    fn charge_dates(&self, record: &ExpenseRecord, end: NaiveDate) -> Vec<NaiveDate> {
        match self.boundary {
            InstallmentBoundary::Installments => (0..record.installments())
                .map_while(|step| add_months(record.date, step))
                .collect(),
            InstallmentBoundary::ThroughEndDate => {
                successors(Some(record.date), |date| add_months(*date, 1))
                    .take_while(|date| *date <= end)
                    .collect()
            }
        }
    }
}

fn contribution(record: &ExpenseRecord, amount: f64) -> Contribution {
    Contribution {
        expense_id: record.id,
        name: record.name.clone(),
        amount,
        date: record.date,
        end_date: record.end_date,
    }
}

/// Aggregates with the default installment boundary.
pub fn aggregate<'a, I>(records: I) -> MonthlyBreakdown
where
    I: IntoIterator<Item = &'a ExpenseRecord>,
{
    MonthlyAggregator::default().aggregate(records)
}
