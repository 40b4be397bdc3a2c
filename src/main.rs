mod api;
mod bill;
mod config;
mod engine;
mod error;

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use tabled::{settings::Style, Table, Tabled};

use crate::api::BillsClient;
use crate::bill::{Bill, BillDraft, BillStatus};
use crate::config::{config_dir, load_config, Config, CONFIG_TEMPLATE};
use crate::engine::{FilterSelection, SortOrder, MONTH_NAMES};
use crate::error::{BilldashError, Result};

#[derive(Parser)]
#[command(name = "billdash")]
#[command(version, about = "CLI bill-tracking dashboard backed by a remote REST API", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.billdash or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config file
    Init,

    /// Show bills grouped by month with totals and status summary
    Dashboard {
        /// Filter by full month name (e.g., October)
        #[arg(short, long)]
        month: Option<String>,

        /// Filter by four-digit year (e.g., 2025)
        #[arg(short, long)]
        year: Option<String>,

        /// Date order within each month (asc or desc)
        #[arg(long, value_parser = ["asc", "desc"], default_value = "asc")]
        order: String,
    },

    /// List all bills, newest first
    List {
        /// Number of bills to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Add a new bill
    Add {
        /// Bill date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Bill type (e.g., Electricity)
        #[arg(long = "type")]
        kind: String,

        /// Amount as a non-negative decimal (e.g., 100.00)
        #[arg(long, allow_hyphen_values = true)]
        amount: String,

        /// Status: paid, unpaid, or pending
        #[arg(long)]
        status: String,
    },

    /// Edit an existing bill's fields
    Edit {
        /// Bill id from 'list'
        id: u64,

        /// New bill date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<String>,

        /// New bill type
        #[arg(long = "type")]
        kind: Option<String>,

        /// New amount as a non-negative decimal
        #[arg(long, allow_hyphen_values = true)]
        amount: Option<String>,

        /// New status: paid, unpaid, or pending
        #[arg(long)]
        status: Option<String>,
    },

    /// Delete a bill
    Delete {
        /// Bill id from 'list'
        id: u64,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },

    /// Show the years bills exist for, most recent first
    Years,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Dashboard { month, year, order } => {
            let order = if order == "desc" {
                SortOrder::Descending
            } else {
                SortOrder::Ascending
            };
            cmd_dashboard(&cfg_dir, month, year, order)
        }
        Commands::List { limit } => cmd_list(&cfg_dir, limit),
        Commands::Add {
            date,
            kind,
            amount,
            status,
        } => cmd_add(&cfg_dir, &date, kind, &amount, &status),
        Commands::Edit {
            id,
            date,
            kind,
            amount,
            status,
        } => cmd_edit(&cfg_dir, id, date, kind, amount, status),
        Commands::Delete { id, yes } => cmd_delete(&cfg_dir, id, yes),
        Commands::Years => cmd_years(&cfg_dir),
    }
}

/// Initialize config directory with a template config file
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(BilldashError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    fs::create_dir_all(cfg_dir)?;
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized billdash config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Point api.base_url at your bill API:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. See your dashboard:                   billdash dashboard");

    Ok(())
}

/// Load config and build the API client; every network command starts here.
fn client_for(cfg_dir: &Path) -> Result<(Config, BillsClient)> {
    if !cfg_dir.exists() {
        return Err(BilldashError::ConfigNotFound(cfg_dir.to_path_buf()));
    }
    let config = load_config(cfg_dir)?;
    let client = BillsClient::from_config(&config);
    Ok((config, client))
}

// Table row structs for tabled
#[derive(Tabled)]
struct BillRow {
    #[tabled(rename = "#")]
    index: usize,
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

#[derive(Tabled)]
struct MonthRow {
    #[tabled(rename = "DATE")]
    date: String,
    #[tabled(rename = "TYPE")]
    kind: String,
    #[tabled(rename = "AMOUNT")]
    amount: String,
    #[tabled(rename = "STATUS")]
    status: String,
}

/// Render an amount, falling back to the raw wire value when it does not
/// parse as a valid decimal.
fn display_amount(bill: &Bill, currency_symbol: &str) -> String {
    match bill.parsed_amount() {
        Some(amount) => format_money(amount, currency_symbol),
        None => bill.amount.to_string(),
    }
}

fn format_grouped_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out.chars().rev().collect()
}

/// Format a money amount with two decimal places and thousands separators
fn format_money(value: Decimal, currency_symbol: &str) -> String {
    let rounded = value.round_dp(2).to_string();
    let (whole, frac) = match rounded.split_once('.') {
        Some((w, f)) => (w.to_string(), format!("{f:0<2}")),
        None => (rounded, "00".to_string()),
    };

    let negative = whole.starts_with('-');
    let grouped = format_grouped_digits(whole.trim_start_matches('-'));

    if negative {
        format!("{currency_symbol}-{grouped}.{frac}")
    } else {
        format!("{currency_symbol}{grouped}.{frac}")
    }
}

/// Extend a rendered bill table with TOTAL / (-) PAID / (=) DUE rows that
/// share the table frame: the four leftmost columns merge into one label
/// cell, AMOUNT keeps its column, STATUS is closed off.
fn add_financial_footer(table: &str, total: &str, paid: &str, due: &str) -> String {
    let lines: Vec<&str> = table.lines().collect();
    if lines.len() < 4 {
        return table.to_string();
    }

    // Parse the top border to discover column widths
    let top = lines[0];
    let Some(inner) = top.strip_prefix('╭').and_then(|s| s.strip_suffix('╮')) else {
        return table.to_string();
    };

    let widths: Vec<usize> = inner.split('┬').map(|p| p.chars().count()).collect();
    if widths.len() < 6 {
        return table.to_string();
    }

    // Merge #, ID, DATE, TYPE into one label cell; keep AMOUNT; drop STATUS
    let left_width = widths[0] + widths[1] + widths[2] + widths[3] + 3; // +3 for the three ┴ replaced by spaces
    let amount_width = widths[4];
    let status_width = widths[5];

    let rows = [("TOTAL", total), ("(-) PAID", paid), ("(=) DUE", due)];

    // Strip the original bottom border and start building
    let mut out = lines[..lines.len() - 1].join("\n");
    out.push('\n');

    // First separator: merge left 4 columns, keep AMOUNT, close off STATUS
    out.push_str(&format!(
        "├{}┴{}┴{}┴{}┼{}┼{}╯\n",
        "─".repeat(widths[0]),
        "─".repeat(widths[1]),
        "─".repeat(widths[2]),
        "─".repeat(widths[3]),
        "─".repeat(amount_width),
        "─".repeat(status_width),
    ));

    // Summary rows with separators between them
    for (idx, (label, value)) in rows.iter().enumerate() {
        out.push_str(&format!(
            "│ {:>left$} │ {:>amount$} │\n",
            label,
            value,
            left = left_width - 2,
            amount = amount_width - 2
        ));
        if idx < rows.len() - 1 {
            out.push_str(&format!(
                "├{}┼{}┤\n",
                "─".repeat(left_width),
                "─".repeat(amount_width)
            ));
        }
    }

    // Bottom border
    out.push_str(&format!(
        "╰{}┴{}╯",
        "─".repeat(left_width),
        "─".repeat(amount_width)
    ));

    out
}

fn report_issues(issues: &[engine::DataIssue]) {
    for issue in issues {
        eprintln!("warning: {issue}");
    }
}

/// Canonicalize a month-name argument (case-insensitive full name).
fn parse_month(input: &str) -> Result<String> {
    MONTH_NAMES
        .iter()
        .find(|m| m.eq_ignore_ascii_case(input.trim()))
        .map(|m| m.to_string())
        .ok_or_else(|| BilldashError::InvalidMonth(input.to_string()))
}

fn parse_year(input: &str) -> Result<String> {
    let trimmed = input.trim();
    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        Ok(trimmed.to_string())
    } else {
        Err(BilldashError::InvalidYear(input.to_string()))
    }
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|_| BilldashError::InvalidDate(input.to_string()))
}

fn parse_amount(input: &str) -> Result<Decimal> {
    let amount = Decimal::from_str_exact(input.trim())
        .map_err(|_| BilldashError::InvalidAmount(input.to_string()))?;
    if amount.is_sign_negative() {
        return Err(BilldashError::InvalidAmount(input.to_string()));
    }
    Ok(amount)
}

/// Show bills grouped by month with totals and the paid/due split
fn cmd_dashboard(
    cfg_dir: &Path,
    month: Option<String>,
    year: Option<String>,
    order: SortOrder,
) -> Result<()> {
    let filter = FilterSelection {
        month: month.as_deref().map(parse_month).transpose()?,
        year: year.as_deref().map(parse_year).transpose()?,
    };

    let (config, client) = client_for(cfg_dir)?;
    let bills = client.list()?;
    let agg = engine::aggregate(&bills, &filter, order);
    report_issues(&agg.issues);

    let symbol = &config.display.currency_symbol;
    let due = agg.by_status.due();

    println!("Bills Dashboard");
    println!("{}", "-".repeat(50));
    println!(
        "Total Due:   {}  ({} pending bills)",
        format_money(due.total, symbol),
        due.count
    );
    println!(
        "Total Paid:  {}  ({} bills paid)",
        format_money(agg.by_status.paid.total, symbol),
        agg.by_status.paid.count
    );
    if agg.by_status.unknown > 0 {
        println!(
            "Unknown:     {} bill(s) excluded from the paid/due split",
            agg.by_status.unknown
        );
    }

    if agg.buckets.is_empty() {
        println!();
        println!("No bills found for the selected filter(s).");
    }

    for bucket in &agg.buckets {
        println!();
        println!(
            "{} Bills  (Month Total: {})",
            bucket.label,
            format_money(bucket.total, symbol)
        );

        let rows: Vec<MonthRow> = bucket
            .bills
            .iter()
            .map(|bill| MonthRow {
                date: bill.date.clone(),
                kind: bill.kind.clone(),
                amount: display_amount(bill, symbol),
                status: bill.status.to_uppercase(),
            })
            .collect();

        let table = Table::new(rows).with(Style::rounded()).to_string();
        println!("{table}");
    }

    println!();
    println!(
        "Overall Total Spent/Due ({} {}): {}",
        filter.month.as_deref().unwrap_or("All"),
        filter.year.as_deref().unwrap_or("Years"),
        format_money(agg.overall.total, symbol)
    );

    Ok(())
}

/// List all bills, newest first, with a financial footer
fn cmd_list(cfg_dir: &Path, limit: Option<usize>) -> Result<()> {
    let (config, client) = client_for(cfg_dir)?;
    let mut bills = client.list()?;
    report_issues(&engine::scan_issues(&bills));

    if bills.is_empty() {
        println!("No bills found. Add one with 'billdash add'.");
        return Ok(());
    }

    engine::sort_bills_by_date(&mut bills, SortOrder::Descending);
    let shown = match limit {
        Some(n) => &bills[..n.min(bills.len())],
        None => &bills[..],
    };

    let symbol = &config.display.currency_symbol;
    let rows: Vec<BillRow> = shown
        .iter()
        .enumerate()
        .map(|(idx, bill)| BillRow {
            index: idx + 1,
            id: bill.id,
            date: bill.date.clone(),
            kind: bill.kind.clone(),
            amount: display_amount(bill, symbol),
            status: bill.status.to_uppercase(),
        })
        .collect();

    // Financial summary over the shown bills only
    let overall = engine::summarize(shown);
    let paid = engine::summarize_by_status(shown).paid;
    let due_total = overall.total - paid.total;

    let table = Table::new(rows).with(Style::rounded()).to_string();
    let table = add_financial_footer(
        &table,
        &format_money(overall.total, symbol),
        &format_money(paid.total, symbol),
        &format_money(due_total, symbol),
    );

    println!("{table}");
    println!();
    println!("Total: {} bills", bills.len());
    println!("Use the ID with edit/delete (e.g., 'billdash delete 3')");

    Ok(())
}

/// Add a new bill
fn cmd_add(cfg_dir: &Path, date: &str, kind: String, amount: &str, status: &str) -> Result<()> {
    let draft = BillDraft {
        date: parse_date(date)?,
        kind,
        amount: parse_amount(amount)?,
        status: BillStatus::from_str(status)?,
    };

    let (config, client) = client_for(cfg_dir)?;
    let created = client.create(&draft)?;

    println!("Added bill {}", created.id);
    println!("  Type:    {}", draft.kind);
    println!("  Date:    {}", draft.date);
    println!(
        "  Amount:  {}",
        format_money(draft.amount, &config.display.currency_symbol)
    );
    println!("  Status:  {}", draft.status);

    Ok(())
}

/// Find a bill in the fetched list by id
fn find_bill(bills: &[Bill], id: u64) -> Result<&Bill> {
    bills
        .iter()
        .find(|b| b.id == id)
        .ok_or(BilldashError::BillNotFound(id))
}

/// Edit an existing bill; unspecified fields keep their current value
fn cmd_edit(
    cfg_dir: &Path,
    id: u64,
    date: Option<String>,
    kind: Option<String>,
    amount: Option<String>,
    status: Option<String>,
) -> Result<()> {
    // Validate the provided fields before any request is made
    let new_date = date.as_deref().map(parse_date).transpose()?;
    let new_amount = amount.as_deref().map(parse_amount).transpose()?;
    let new_status = status.as_deref().map(BillStatus::from_str).transpose()?;

    let (config, client) = client_for(cfg_dir)?;
    let bills = client.list()?;
    let existing = find_bill(&bills, id)?;

    // A kept field must itself be valid; a malformed stored value has to be
    // replaced explicitly in the same command.
    let draft = BillDraft {
        date: match new_date {
            Some(d) => d,
            None => existing
                .parsed_date()
                .ok_or_else(|| BilldashError::InvalidDate(existing.date.clone()))?,
        },
        kind: kind.unwrap_or_else(|| existing.kind.clone()),
        amount: match new_amount {
            Some(a) => a,
            None => existing
                .parsed_amount()
                .ok_or_else(|| BilldashError::InvalidAmount(existing.amount.to_string()))?,
        },
        status: match new_status {
            Some(s) => s,
            None => existing
                .parsed_status()
                .ok_or_else(|| BilldashError::InvalidStatus(existing.status.clone()))?,
        },
    };

    client.update(id, &draft)?;

    println!("Updated bill {id}");
    println!("  Type:    {}", draft.kind);
    println!("  Date:    {}", draft.date);
    println!(
        "  Amount:  {}",
        format_money(draft.amount, &config.display.currency_symbol)
    );
    println!("  Status:  {}", draft.status);

    Ok(())
}

/// Delete a bill, with a confirmation prompt unless --yes
fn cmd_delete(cfg_dir: &Path, id: u64, yes: bool) -> Result<()> {
    let (_, client) = client_for(cfg_dir)?;
    let bills = client.list()?;
    let bill = find_bill(&bills, id)?;

    if !yes {
        print!(
            "Delete bill {} ({}, {})? [y/N] ",
            bill.id, bill.kind, bill.date
        );
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().read_line(&mut answer)?;
        let answer = answer.trim();
        if !answer.eq_ignore_ascii_case("y") && !answer.eq_ignore_ascii_case("yes") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    client.delete(id)?;
    println!("Deleted bill {id}");

    Ok(())
}

/// Show the years bills exist for, most recent first
fn cmd_years(cfg_dir: &Path) -> Result<()> {
    let (_, client) = client_for(cfg_dir)?;
    let bills = client.list()?;
    report_issues(&engine::scan_issues(&bills));

    let years = engine::unique_years(&bills);
    if years.is_empty() {
        println!("No bills found.");
        return Ok(());
    }

    for year in years {
        println!("{year}");
    }

    Ok(())
}
