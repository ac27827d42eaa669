//! Statement CSV ingestion: raw rows and tolerant normalization.
//!
//! Normalization never rejects a row. Bad numerics fall back to zero, a
//! missing description becomes the `"N/A"` sentinel, and an unparsable date
//! yields a dateless transaction that joins no bucket.

use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::transaction::{Transaction, MISSING_DESCRIPTION};
use crate::errors::{EngineError, Result};

const COL_POST_DATE: &str = "Post Date";
const COL_DEBIT: &str = "Debit";
const COL_CREDIT: &str = "Credit";
const COL_BALANCE: &str = "Balance";
const COL_DESCRIPTION: &str = "Description";

/// One untyped statement row, keyed by the export's column names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStatementRow {
    pub post_date: String,
    pub debit: String,
    pub credit: String,
    pub balance: String,
    pub description: String,
}

/// Parses a currency amount, tolerating commas, `$`, quotes, and
/// parenthesized negatives. Empty or garbled input becomes zero.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return -inner.trim().parse::<f64>().unwrap_or(0.0);
    }
    s.parse().unwrap_or(0.0)
}

/// Parses `M/D/YYYY` or ISO `YYYY-MM-DD`. Returns `None` for anything else.
pub fn parse_post_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    let parts: Vec<&str> = raw.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let m: u32 = parts[0].parse().ok()?;
    let d: u32 = parts[1].parse().ok()?;
    let y: i32 = parts[2].parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Normalizes one raw row into a transaction.
pub fn normalize_row(row: &RawStatementRow) -> Transaction {
    let date = parse_post_date(&row.post_date);
    if date.is_none() && !row.post_date.trim().is_empty() {
        tracing::debug!(raw = %row.post_date, "unparsable post date; transaction joins no bucket");
    }
    let description = if row.description.trim().is_empty() {
        MISSING_DESCRIPTION.to_string()
    } else {
        row.description.clone()
    };
    Transaction::new(
        date,
        parse_amount(&row.debit),
        parse_amount(&row.credit),
        parse_amount(&row.balance),
        description,
    )
}

/// Normalizes a batch of raw rows. Recovery is per-row; a batch never aborts.
pub fn normalize_rows(rows: &[RawStatementRow]) -> Vec<Transaction> {
    rows.iter().map(normalize_row).collect()
}

/// Reads raw rows from a statement CSV export. Column order is taken from the
/// header line; rows missing columns are padded with empty fields rather than
/// dropped.
pub fn read_rows_csv(path: impl AsRef<Path>) -> Result<Vec<RawStatementRow>> {
    let path = path.as_ref();
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|err| EngineError::Storage(format!("opening {}: {err}", path.display())))?;

    let headers = rdr
        .headers()
        .map_err(|err| EngineError::Storage(format!("reading headers of {}: {err}", path.display())))?
        .clone();
    let column = |name: &str| {
        headers
            .iter()
            .position(|header| header.eq_ignore_ascii_case(name))
    };
    let post_date = column(COL_POST_DATE);
    let debit = column(COL_DEBIT);
    let credit = column(COL_CREDIT);
    let balance = column(COL_BALANCE);
    let description = column(COL_DESCRIPTION);

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = match record {
            Ok(record) => record,
            Err(err) => {
                tracing::debug!(%err, "skipping unreadable csv record");
                continue;
            }
        };
        let field = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };
        rows.push(RawStatementRow {
            post_date: field(post_date),
            debit: field(debit),
            credit: field(credit),
            balance: field(balance),
            description: field(description),
        });
    }
    Ok(rows)
}
