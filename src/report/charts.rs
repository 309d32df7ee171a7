//! ECharts options for the report page.
//!
//! - **Income vs. expenses**: daily income and expense totals as two lines
//! - **Expenses by category**: a pie chart of the category breakdown
//!
//! The options are plain JSON so clients can pass them straight to
//! `chart.setOption`.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisLabel, AxisPointer, AxisPointerType, AxisType, Tooltip, Trigger},
    series::{Line, Pie},
};
use serde::Serialize;
use serde_json::Value;

use crate::{
    Error,
    currency::Currency,
    report::{CategoryBreakdown, DailyTotals},
};

/// The chart options returned by the charts endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportCharts {
    /// Line chart of daily income and expenses.
    pub income_expense: Value,
    /// Pie chart of expenses per category.
    pub category: Value,
}

impl ReportCharts {
    /// Build both charts.
    ///
    /// # Errors
    /// Returns [Error::JSONSerializationError] if a chart's options are not valid JSON.
    pub fn new(
        series: &[DailyTotals],
        breakdown: &CategoryBreakdown,
        currency: Currency,
    ) -> Result<Self, Error> {
        Ok(Self {
            income_expense: chart_to_json(&income_expense_chart(series, currency))?,
            category: chart_to_json(&category_chart(breakdown))?,
        })
    }
}

pub(super) fn income_expense_chart(series: &[DailyTotals], currency: Currency) -> Chart {
    let labels: Vec<String> = series.iter().map(|totals| totals.date.to_string()).collect();
    let income: Vec<f64> = series.iter().map(|totals| totals.income).collect();
    let expenses: Vec<f64> = series.iter().map(|totals| totals.expense).collect();

    Chart::new()
        .title(Title::new().text("Income vs. Expenses"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().top("bottom"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("10%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new().type_(AxisType::Value).axis_label(
                AxisLabel::new().formatter(format!("{}{{value}}", currency.symbol()).as_str()),
            ),
        )
        .series(Line::new().name("Income").data(income))
        .series(Line::new().name("Expenses").data(expenses))
}

pub(super) fn category_chart(breakdown: &CategoryBreakdown) -> Chart {
    let data: Vec<(f64, &str)> = breakdown
        .iter()
        .map(|(category, total)| (total, category))
        .collect();

    Chart::new()
        .title(Title::new().text("Expenses by Category"))
        .tooltip(Tooltip::new().trigger(Trigger::Item))
        .legend(Legend::new().top("bottom"))
        .series(Pie::new().name("Expenses").radius("60%").data(data))
}

fn chart_to_json(chart: &Chart) -> Result<Value, Error> {
    serde_json::from_str(&chart.to_string()).map_err(|error| {
        tracing::error!("could not convert chart options to JSON: {error}");
        Error::JSONSerializationError(error.to_string())
    })
}
