use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::domain::YearMonth;
use crate::ledger::{BarChart, ChartSeries, InstallmentBoundary, Ledger, MonthlyBreakdown, SeriesOrder};

/// How a ledger is turned into a monthly series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryOptions {
    pub boundary: InstallmentBoundary,
    pub order: SeriesOrder,
}

impl From<&Config> for SummaryOptions {
    fn from(config: &Config) -> Self {
        Self {
            boundary: config.boundary,
            order: config.series_order,
        }
    }
}

pub struct SummaryService;

impl SummaryService {
    /// Per-month contributions; recomputed on every call.
    pub fn breakdown(ledger: &Ledger, options: SummaryOptions) -> MonthlyBreakdown {
        ledger
            .monthly_breakdown(options.boundary)
            .ordered(options.order)
    }

    pub fn monthly_totals(ledger: &Ledger, options: SummaryOptions) -> Vec<(YearMonth, f64)> {
        Self::breakdown(ledger, options).series()
    }

    pub fn chart_series(ledger: &Ledger, options: SummaryOptions) -> ChartSeries {
        ChartSeries::from_breakdown(&Self::breakdown(ledger, options))
    }

    pub fn bar_chart(ledger: &Ledger, options: SummaryOptions) -> BarChart {
        BarChart::new(Self::chart_series(ledger, options))
    }
}
