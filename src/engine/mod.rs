//! Bill aggregation engine.
//!
//! Pure, synchronous functions over an in-memory bill list: unique years,
//! month/year filtering, grouping into "Month Year" buckets, chronological
//! label sorting, and exact-decimal totals split by status and by month.
//! Nothing here mutates its input or touches the network; per-record data
//! problems are collected as [`DataIssue`]s instead of aborting the pass.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::bill::{Bill, BillStatus};

/// Full month names, in calendar order. Index with `month0()`.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Intra-bucket date ordering. The dashboard view reads oldest-first within
/// a month, the flat list view newest-first, so the direction is a caller
/// choice rather than a baked-in default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

/// Optional month-name / year narrowing. Both absent matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub month: Option<String>,
    pub year: Option<String>,
}

impl FilterSelection {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.month.is_none() && self.year.is_none()
    }
}

/// A per-record data-quality problem found while aggregating. One bad
/// record never prevents the rest of the list from aggregating.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIssue {
    #[error("bill {id}: malformed date '{raw}', excluded from grouping and totals")]
    MalformedDate { id: u64, raw: String },

    #[error("bill {id}: unknown status '{raw}', excluded from status summaries")]
    UnknownStatus { id: u64, raw: String },

    #[error("bill {id}: non-numeric or negative amount '{raw}', excluded from totals")]
    BadAmount { id: u64, raw: String },
}

/// Count plus exact decimal total for a set of bills.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Summary {
    pub total: Decimal,
    pub count: usize,
}

/// Per-status summaries. Bills whose status is outside the three valid
/// values land in `unknown`, never in one of the valid partitions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBreakdown {
    pub paid: Summary,
    pub unpaid: Summary,
    pub pending: Summary,
    pub unknown: usize,
}

impl StatusBreakdown {
    pub fn get(&self, status: BillStatus) -> &Summary {
        match status {
            BillStatus::Paid => &self.paid,
            BillStatus::Unpaid => &self.unpaid,
            BillStatus::Pending => &self.pending,
        }
    }

    /// Everything not yet paid: unpaid + pending combined. This is the
    /// dashboard's "Total Due" card.
    pub fn due(&self) -> Summary {
        Summary {
            total: self.unpaid.total + self.pending.total,
            count: self.unpaid.count + self.pending.count,
        }
    }
}

/// The bills of one calendar month, with their exact total.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    pub label: String,
    pub bills: Vec<Bill>,
    pub total: Decimal,
}

/// One full derivation pass: buckets most-recent-month first, overall and
/// per-status summaries over the filtered bills, and the data issues found
/// in the input list.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub buckets: Vec<MonthBucket>,
    pub overall: Summary,
    pub by_status: StatusBreakdown,
    pub issues: Vec<DataIssue>,
}

/// Distinct calendar years present in the list, most recent first.
/// Bills whose date does not parse contribute no year.
pub fn unique_years(bills: &[Bill]) -> Vec<String> {
    let mut years: Vec<i32> = bills
        .iter()
        .filter_map(|b| b.parsed_date())
        .map(|d| d.year())
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    years.into_iter().map(|y| y.to_string()).collect()
}

/// Stable month/year filter. Absent filters match everything, so
/// `filter_bills(bills, &FilterSelection::none())` is the identity filter
/// even for bills with malformed dates. With an active filter, a bill whose
/// date does not parse can never match.
pub fn filter_bills(bills: &[Bill], filter: &FilterSelection) -> Vec<Bill> {
    bills
        .iter()
        .filter(|bill| {
            if filter.is_empty() {
                return true;
            }
            let Some(date) = bill.parsed_date() else {
                return false;
            };
            let month_ok = filter
                .month
                .as_deref()
                .map_or(true, |m| MONTH_NAMES[date.month0() as usize] == m);
            let year_ok = filter
                .year
                .as_deref()
                .map_or(true, |y| date.year().to_string() == y);
            month_ok && year_ok
        })
        .cloned()
        .collect()
}

/// Group bills by "Month Year" label. Same calendar month and year means
/// same bucket regardless of day; within a bucket, input order is kept.
/// Bills with malformed dates are excluded (see [`scan_issues`]).
pub fn group_by_month(bills: &[Bill]) -> HashMap<String, Vec<Bill>> {
    let mut groups: HashMap<String, Vec<Bill>> = HashMap::new();
    for bill in bills {
        if let Some(label) = bill.month_label() {
            groups.entry(label).or_default().push(bill.clone());
        }
    }
    groups
}

/// Sort bills in place by calendar date. Stable, so same-day bills keep
/// their relative input order. Unparseable dates sort first.
pub fn sort_bills_by_date(bills: &mut [Bill], order: SortOrder) {
    bills.sort_by(|a, b| {
        let cmp = a.parsed_date().cmp(&b.parsed_date());
        match order {
            SortOrder::Ascending => cmp,
            SortOrder::Descending => cmp.reverse(),
        }
    });
}

/// Parse a "Month Year" label back to its first-of-month date.
fn label_date(label: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(&format!("1 {label}"), "%d %B %Y").ok()
}

/// Order month labels most recent first. Every label produced by
/// [`group_by_month`] round-trips through its first-of-month date, so the
/// order is calendar-chronological across year boundaries. Labels that do
/// not parse (never produced here) sort last.
pub fn sort_month_labels(labels: &[String]) -> Vec<String> {
    let mut keyed: Vec<(Option<NaiveDate>, String)> = labels
        .iter()
        .map(|label| (label_date(label), label.clone()))
        .collect();
    keyed.sort_by(|a, b| b.0.cmp(&a.0));
    keyed.into_iter().map(|(_, label)| label).collect()
}

/// Count and exact decimal total. The count covers every bill given; the
/// total covers only those with a valid non-negative amount.
pub fn summarize(bills: &[Bill]) -> Summary {
    Summary {
        total: bills.iter().filter_map(|b| b.parsed_amount()).sum(),
        count: bills.len(),
    }
}

/// Partition by the three valid statuses; anything else is counted as
/// unknown rather than silently merged into a partition.
pub fn summarize_by_status(bills: &[Bill]) -> StatusBreakdown {
    let mut breakdown = StatusBreakdown::default();
    for bill in bills {
        let Some(status) = bill.parsed_status() else {
            breakdown.unknown += 1;
            continue;
        };
        let summary = match status {
            BillStatus::Paid => &mut breakdown.paid,
            BillStatus::Unpaid => &mut breakdown.unpaid,
            BillStatus::Pending => &mut breakdown.pending,
        };
        summary.count += 1;
        if let Some(amount) = bill.parsed_amount() {
            summary.total += amount;
        }
    }
    breakdown
}

/// Audit the list for per-record problems, in input order. A bill can
/// carry more than one issue.
pub fn scan_issues(bills: &[Bill]) -> Vec<DataIssue> {
    let mut issues = Vec::new();
    for bill in bills {
        if bill.parsed_date().is_none() {
            issues.push(DataIssue::MalformedDate {
                id: bill.id,
                raw: bill.date.clone(),
            });
        }
        if bill.parsed_status().is_none() {
            issues.push(DataIssue::UnknownStatus {
                id: bill.id,
                raw: bill.status.clone(),
            });
        }
        if bill.parsed_amount().is_none() {
            issues.push(DataIssue::BadAmount {
                id: bill.id,
                raw: bill.amount.to_string(),
            });
        }
    }
    issues
}

/// One full derivation pass: filter, group, order buckets most recent
/// first, order bills within each bucket by `order`, and total everything.
/// Bills whose date does not parse are excluded from the summaries as well
/// as the buckets, so the overall total always equals the sum of the
/// bucket totals. Issues are scanned over the unfiltered input so a
/// malformed-date bill still surfaces while a month filter is active.
pub fn aggregate(bills: &[Bill], filter: &FilterSelection, order: SortOrder) -> Aggregation {
    let issues = scan_issues(bills);
    let filtered = filter_bills(bills, filter);
    let dated: Vec<Bill> = filtered
        .iter()
        .filter(|b| b.parsed_date().is_some())
        .cloned()
        .collect();
    let mut groups = group_by_month(&dated);

    let labels: Vec<String> = groups.keys().cloned().collect();
    let buckets = sort_month_labels(&labels)
        .into_iter()
        .map(|label| {
            let mut bucket_bills = groups.remove(&label).unwrap_or_default();
            sort_bills_by_date(&mut bucket_bills, order);
            let total = summarize(&bucket_bills).total;
            MonthBucket {
                label,
                bills: bucket_bills,
                total,
            }
        })
        .collect();

    Aggregation {
        buckets,
        overall: summarize(&dated),
        by_status: summarize_by_status(&dated),
        issues,
    }
}
