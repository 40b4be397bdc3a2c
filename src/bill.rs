use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::BilldashError;

/// The three statuses the API considers valid. Anything else on the wire is
/// an "unknown status" data issue, never coerced into one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillStatus {
    Paid,
    Unpaid,
    Pending,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Paid => "paid",
            BillStatus::Unpaid => "unpaid",
            BillStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for BillStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BillStatus {
    type Err = BilldashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "paid" => Ok(BillStatus::Paid),
            "unpaid" => Ok(BillStatus::Unpaid),
            "pending" => Ok(BillStatus::Pending),
            other => Err(BilldashError::InvalidStatus(other.to_string())),
        }
    }
}

/// Amount exactly as the API transmitted it. The backend is inconsistent:
/// some records carry a decimal-string ("180557.00"), others a JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawAmount {
    Text(String),
    Number(f64),
}

impl RawAmount {
    /// Exact decimal value, or None when the field is non-numeric or
    /// negative (both are data errors, see the engine's issue scan).
    pub fn parse(&self) -> Option<Decimal> {
        let value = match self {
            RawAmount::Text(s) => Decimal::from_str_exact(s.trim()).ok()?,
            RawAmount::Number(n) => Decimal::from_f64(*n)?,
        };
        if value.is_sign_negative() {
            return None;
        }
        Some(value)
    }
}

impl fmt::Display for RawAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawAmount::Text(s) => f.write_str(s),
            RawAmount::Number(n) => write!(f, "{n}"),
        }
    }
}

/// A bill record as held in memory between fetch and render.
///
/// `date` and `status` stay in wire form so that one malformed record is a
/// per-record issue instead of a deserialization failure for the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: u64,
    pub date: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub amount: RawAmount,
    pub status: String,
}

impl Bill {
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d").ok()
    }

    pub fn parsed_amount(&self) -> Option<Decimal> {
        self.amount.parse()
    }

    pub fn parsed_status(&self) -> Option<BillStatus> {
        self.status.parse().ok()
    }

    /// Human-readable "Month Year" grouping label, e.g. "October 2025".
    pub fn month_label(&self) -> Option<String> {
        self.parsed_date().map(|d| d.format("%B %Y").to_string())
    }
}

/// Outgoing payload for create/update. Unlike `Bill`, every field is
/// validated up front; the amount goes over the wire as a decimal string.
#[derive(Debug, Clone, Serialize)]
pub struct BillDraft {
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    pub status: BillStatus,
}
