//! Normalized statement transactions and their derived value identity.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Description used when a statement row carries none.
pub const MISSING_DESCRIPTION: &str = "N/A";

/// A normalized bank-statement line. Immutable once ingested.
///
/// `date` is `None` when the source row carried an unparsable date; such
/// transactions belong to no time bucket but are kept so row counts and
/// category assignments stay faithful to the statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub date: Option<NaiveDate>,
    pub debit: f64,
    pub credit: f64,
    pub balance: f64,
    pub description: String,
}

impl Transaction {
    pub fn new(
        date: Option<NaiveDate>,
        debit: f64,
        credit: f64,
        balance: f64,
        description: impl Into<String>,
    ) -> Self {
        Self {
            date,
            debit,
            credit,
            balance,
            description: description.into(),
        }
    }

    /// The non-zero side of the record. Real statement rows carry exactly one
    /// of debit/credit; the debit column wins when both are zero.
    pub fn amount(&self) -> f64 {
        if self.credit > 0.0 {
            self.credit
        } else {
            self.debit
        }
    }

    pub fn is_income(&self) -> bool {
        self.credit > 0.0
    }

    pub fn is_expense(&self) -> bool {
        self.debit > 0.0
    }

    /// Derived value identity; see [`TransactionId`].
    pub fn id(&self) -> TransactionId {
        TransactionId {
            date: self.date,
            description: self.description.clone(),
            amount_cents: to_cents(self.amount()),
        }
    }

    /// Identity comparison without building a [`TransactionId`].
    pub fn matches(&self, id: &TransactionId) -> bool {
        self.date == id.date
            && self.description == id.description
            && to_cents(self.amount()) == id.amount_cents
    }
}

/// Value identity of a transaction: date + description + the non-zero amount
/// in integer cents. Statements carry no row ids, so identity is derived and
/// stays stable across reloads of the same export.
///
/// Two rows with identical fields collapse to the same identity and are
/// indistinguishable to categorization. Known limitation of the format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionId {
    pub date: Option<NaiveDate>,
    pub description: String,
    pub amount_cents: i64,
}

fn to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}
