use billdash::{
    aggregate, filter_bills, group_by_month, scan_issues, sort_month_labels, summarize,
    summarize_by_status, unique_years, Bill, BillStatus, DataIssue, FilterSelection, RawAmount,
    SortOrder,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn bill(id: u64, date: &str, status: &str, kind: &str, amount: RawAmount) -> Bill {
    Bill {
        id,
        date: date.to_string(),
        kind: kind.to_string(),
        amount,
        status: status.to_string(),
    }
}

fn text(amount: &str) -> RawAmount {
    RawAmount::Text(amount.to_string())
}

/// Two October bills and one September bill, mixed statuses.
fn scenario_bills() -> Vec<Bill> {
    vec![
        bill(1, "2025-10-02", "pending", "Gold Loan Interest", text("180557.00")),
        bill(2, "2025-10-02", "paid", "SIP Payment", text("7057.00")),
        bill(3, "2025-09-03", "paid", "Amazon Credit Card", text("3919.00")),
    ]
}

/// Larger fixture spanning two months and all three statuses. Bill 4
/// carries a JSON-number amount; both wire forms must aggregate
/// identically.
fn mock_bills() -> Vec<Bill> {
    vec![
        bill(1, "2025-10-02", "pending", "Gold Loan Interest", text("180557.00")),
        bill(2, "2025-10-02", "paid", "SIP Payment", text("7057.00")),
        bill(3, "2025-09-03", "paid", "Amazon Credit Card", text("3919.00")),
        bill(4, "2025-09-01", "paid", "ICICI Credit Card", RawAmount::Number(31627.85)),
        bill(5, "2025-10-15", "unpaid", "LIC Premium", text("37055.82")),
        bill(6, "2025-10-25", "pending", "Electricity Bill", text("1200.00")),
        bill(7, "2025-09-20", "paid", "Water Bill", text("550.00")),
    ]
}

#[test]
fn scenario_groups_into_two_buckets() {
    let groups = group_by_month(&scenario_bills());
    assert_eq!(groups.len(), 2);
    assert_eq!(groups["October 2025"].len(), 2);
    assert_eq!(groups["September 2025"].len(), 1);
}

#[test]
fn scenario_status_breakdown() {
    let breakdown = summarize_by_status(&scenario_bills());
    assert_eq!(breakdown.paid.count, 2);
    assert_eq!(breakdown.paid.total, dec!(10976.00));
    assert_eq!(breakdown.pending.count, 1);
    assert_eq!(breakdown.pending.total, dec!(180557.00));
    assert_eq!(breakdown.unpaid.count, 0);
    assert_eq!(breakdown.unknown, 0);
    assert_eq!(breakdown.get(BillStatus::Paid).count, 2);
}

#[test]
fn scenario_label_order() {
    let labels = vec!["September 2025".to_string(), "October 2025".to_string()];
    assert_eq!(
        sort_month_labels(&labels),
        vec!["October 2025".to_string(), "September 2025".to_string()]
    );
}

#[test]
fn scenario_month_year_filter_preserves_order() {
    let bills = scenario_bills();
    let filter = FilterSelection {
        month: Some("October".to_string()),
        year: Some("2025".to_string()),
    };
    let filtered = filter_bills(&bills, &filter);
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0].id, 1);
    assert_eq!(filtered[1].id, 2);
}

#[test]
fn identity_filter_returns_everything_in_order() {
    let bills = mock_bills();
    let filtered = filter_bills(&bills, &FilterSelection::none());
    assert_eq!(filtered, bills);
}

#[test]
fn unique_years_empty_and_descending() {
    assert!(unique_years(&[]).is_empty());

    let bills = vec![
        bill(1, "2024-12-31", "paid", "A", text("1.00")),
        bill(2, "2026-01-01", "paid", "B", text("1.00")),
        bill(3, "2024-06-15", "paid", "C", text("1.00")),
        bill(4, "2025-03-10", "paid", "D", text("1.00")),
    ];
    assert_eq!(unique_years(&bills), vec!["2026", "2025", "2024"]);
}

#[test]
fn labels_sort_chronologically_across_year_boundary() {
    let labels = vec!["January 2025".to_string(), "December 2024".to_string()];
    assert_eq!(
        sort_month_labels(&labels),
        vec!["January 2025".to_string(), "December 2024".to_string()]
    );
}

#[test]
fn sums_are_preserved_across_grouping() {
    let bills = mock_bills();
    let whole = summarize(&bills).total;

    let bucket_sum: Decimal = group_by_month(&bills)
        .values()
        .map(|bucket| summarize(bucket).total)
        .sum();

    assert_eq!(whole, bucket_sum);
    assert_eq!(whole, dec!(261966.67));
}

#[test]
fn grouping_then_flattening_is_lossless() {
    let bills = mock_bills();
    let mut flattened: Vec<Bill> = group_by_month(&bills).into_values().flatten().collect();

    let mut expected = bills;
    flattened.sort_by_key(|b| b.id);
    expected.sort_by_key(|b| b.id);
    assert_eq!(flattened, expected);
}

#[test]
fn empty_input_yields_empty_results_everywhere() {
    let agg = aggregate(&[], &FilterSelection::none(), SortOrder::Ascending);
    assert!(agg.buckets.is_empty());
    assert!(agg.issues.is_empty());
    assert_eq!(agg.overall.count, 0);
    assert_eq!(agg.overall.total, Decimal::ZERO);
    assert_eq!(agg.by_status.due().count, 0);
}

#[test]
fn malformed_date_is_flagged_and_the_rest_aggregates() {
    let mut bills = scenario_bills();
    bills.push(bill(9, "not-a-date", "paid", "Ghost", text("99.00")));

    let agg = aggregate(&bills, &FilterSelection::none(), SortOrder::Ascending);

    // Excluded from every bucket, present in the issue list
    let bucketed: usize = agg.buckets.iter().map(|b| b.bills.len()).sum();
    assert_eq!(bucketed, 3);
    assert_eq!(
        agg.issues,
        vec![DataIssue::MalformedDate {
            id: 9,
            raw: "not-a-date".to_string()
        }]
    );

    let bucket_total: Decimal = agg.buckets.iter().map(|b| b.total).sum();
    assert_eq!(bucket_total, dec!(191533.00));

    // Excluded from the summaries too, not just the buckets
    assert_eq!(agg.overall.total, bucket_total);
    assert_eq!(agg.overall.count, 3);
    assert_eq!(agg.by_status.paid.total, dec!(10976.00));
    assert_eq!(agg.by_status.paid.count, 2);
}

#[test]
fn overall_total_matches_bucket_totals_with_malformed_date_present() {
    let bills = vec![
        bill(1, "2025-10-02", "paid", "Good", text("100.00")),
        bill(2, "not-a-date", "paid", "Ghost", text("99.00")),
    ];

    let agg = aggregate(&bills, &FilterSelection::none(), SortOrder::Ascending);

    let bucket_total: Decimal = agg.buckets.iter().map(|b| b.total).sum();
    assert_eq!(bucket_total, dec!(100.00));
    assert_eq!(agg.overall.total, bucket_total);
    assert_eq!(agg.by_status.paid.total, dec!(100.00));
    assert_eq!(agg.by_status.paid.count, 1);
    assert_eq!(
        agg.issues,
        vec![DataIssue::MalformedDate {
            id: 2,
            raw: "not-a-date".to_string()
        }]
    );
}

#[test]
fn unknown_status_is_counted_separately() {
    let mut bills = scenario_bills();
    bills.push(bill(8, "2025-10-09", "overdue", "Mystery", text("10.00")));

    let breakdown = summarize_by_status(&bills);
    assert_eq!(breakdown.unknown, 1);
    assert_eq!(breakdown.paid.count + breakdown.unpaid.count + breakdown.pending.count, 3);

    let issues = scan_issues(&bills);
    assert_eq!(
        issues,
        vec![DataIssue::UnknownStatus {
            id: 8,
            raw: "overdue".to_string()
        }]
    );
}

#[test]
fn bad_amount_is_excluded_from_sums_but_not_counts() {
    let bills = vec![
        bill(1, "2025-10-02", "paid", "Good", text("25.00")),
        bill(2, "2025-10-03", "paid", "Bad", text("twelve")),
    ];
    let summary = summarize(&bills);
    assert_eq!(summary.count, 2);
    assert_eq!(summary.total, dec!(25.00));
    assert_eq!(
        scan_issues(&bills),
        vec![DataIssue::BadAmount {
            id: 2,
            raw: "twelve".to_string()
        }]
    );
}

#[test]
fn decimal_sums_do_not_drift() {
    // 0.1 + 0.2, one hundred times over, is exactly 30.00
    let mut bills = Vec::new();
    for i in 0..100 {
        bills.push(bill(i * 2, "2025-01-01", "paid", "A", text("0.1")));
        bills.push(bill(i * 2 + 1, "2025-01-01", "paid", "B", text("0.2")));
    }
    assert_eq!(summarize(&bills).total, dec!(30.00));
}

#[test]
fn number_and_text_amounts_aggregate_identically() {
    let as_text = vec![bill(1, "2025-09-01", "paid", "A", text("31627.85"))];
    let as_number = vec![bill(1, "2025-09-01", "paid", "A", RawAmount::Number(31627.85))];
    assert_eq!(summarize(&as_text).total, summarize(&as_number).total);
}

#[test]
fn aggregate_orders_buckets_and_bills() {
    let bills = mock_bills();

    let asc = aggregate(&bills, &FilterSelection::none(), SortOrder::Ascending);
    let labels: Vec<&str> = asc.buckets.iter().map(|b| b.label.as_str()).collect();
    assert_eq!(labels, vec!["October 2025", "September 2025"]);

    let october = &asc.buckets[0];
    let dates: Vec<&str> = october.bills.iter().map(|b| b.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-10-02", "2025-10-02", "2025-10-15", "2025-10-25"]);
    // Same-day bills keep input order under a stable sort
    assert_eq!(october.bills[0].id, 1);
    assert_eq!(october.bills[1].id, 2);

    let desc = aggregate(&bills, &FilterSelection::none(), SortOrder::Descending);
    let dates: Vec<&str> = desc.buckets[0].bills.iter().map(|b| b.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-10-25", "2025-10-15", "2025-10-02", "2025-10-02"]);
}

#[test]
fn duplicate_ids_are_not_merged() {
    let bills = vec![
        bill(5, "2025-10-02", "paid", "Twin", text("10.00")),
        bill(5, "2025-10-02", "paid", "Twin", text("10.00")),
    ];
    let agg = aggregate(&bills, &FilterSelection::none(), SortOrder::Ascending);
    assert_eq!(agg.overall.count, 2);
    assert_eq!(agg.overall.total, dec!(20.00));
    assert_eq!(agg.buckets[0].bills.len(), 2);
}

#[test]
fn issues_survive_an_active_filter() {
    let mut bills = scenario_bills();
    bills.push(bill(9, "garbage", "paid", "Ghost", text("1.00")));

    let filter = FilterSelection {
        month: Some("September".to_string()),
        year: None,
    };
    let agg = aggregate(&bills, &filter, SortOrder::Ascending);
    assert_eq!(agg.buckets.len(), 1);
    assert_eq!(agg.issues.len(), 1);
}
