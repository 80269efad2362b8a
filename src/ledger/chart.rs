//! Chart-ready payloads. Rendering happens in the consumer; this module only
//! shapes the data and the layout hints for a categorical bar chart.

use serde::{Deserialize, Serialize};

use super::aggregation::MonthlyBreakdown;

/// Month labels and totals aligned by index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub month: Vec<String>,
    pub expenses: Vec<f64>,
}

impl ChartSeries {
    pub fn from_breakdown(breakdown: &MonthlyBreakdown) -> Self {
        let (month, expenses) = breakdown
            .series()
            .into_iter()
            .map(|(key, total)| (key.to_string(), total))
            .unzip();
        Self { month, expenses }
    }

    pub fn len(&self) -> usize {
        self.month.len()
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartLayout {
    pub range_slider: bool,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub font_color: String,
    pub marker_color: String,
}

impl Default for ChartLayout {
    fn default() -> Self {
        Self {
            range_slider: true,
            paper_bgcolor: "rgba(0,0,0,0)".into(),
            plot_bgcolor: "rgba(0,0,0,0)".into(),
            font_color: "rgba(0,0,0,1)".into(),
            marker_color: "#000c41".into(),
        }
    }
}

/// Series plus layout, x = `month`, y = `expenses`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub data: ChartSeries,
    pub layout: ChartLayout,
}

impl BarChart {
    pub fn new(data: ChartSeries) -> Self {
        Self {
            data,
            layout: ChartLayout::default(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
