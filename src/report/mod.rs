//! Financial reports.
//!
//! The aggregation engine turns a snapshot of transactions and budgets into
//! time series, category breakdowns and summaries. The handlers serve those
//! results as JSON, as chart options, or as PDF and CSV downloads.

mod aggregation;
mod charts;
mod export;
mod handlers;

pub use aggregation::{
    BudgetUtilization, CategoryBreakdown, DailyTotals, Report, Summary, Timeframe, Totals,
    build_report, compute_category_breakdown, compute_summary, compute_time_series,
    compute_totals, select_window_start,
};
pub(crate) use handlers::get_window_transactions;
pub use handlers::{
    TimeframeQuery, export_csv_endpoint, export_pdf_endpoint, get_report_charts_endpoint,
    get_report_endpoint,
};
