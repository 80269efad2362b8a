//! Expense ledger, amortization, and monthly aggregation.

pub mod aggregation;
pub mod amortization;
pub mod chart;
#[allow(clippy::module_inception)]
pub mod ledger;

pub use aggregation::{
    aggregate, Contribution, InstallmentBoundary, MonthBucket, MonthlyAggregator,
    MonthlyBreakdown, SeriesOrder,
};
pub use amortization::{compute_monthly_payment, quote_monthly_payment, PaymentQuote};
pub use chart::{BarChart, ChartLayout, ChartSeries};
pub use ledger::Ledger;
