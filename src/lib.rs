pub mod api;
pub mod bill;
pub mod config;
pub mod engine;
pub mod error;

pub use api::BillsClient;
pub use bill::{Bill, BillDraft, BillStatus, RawAmount};
pub use engine::{
    aggregate, filter_bills, group_by_month, scan_issues, sort_bills_by_date, sort_month_labels,
    summarize, summarize_by_status, unique_years, Aggregation, DataIssue, FilterSelection,
    MonthBucket, SortOrder, StatusBreakdown, Summary,
};
pub use error::{BilldashError, Result};
