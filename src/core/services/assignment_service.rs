//! The mutable link between transactions and categories, plus per-category
//! statistics.

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::domain::{CategoryAssignment, CategoryKind, TransactionId, Workbook};

use super::{MonthKey, TransactionService};

/// Monthly totals and average for one category over the current monthly view.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryStats {
    /// Un-padded month label paired with the categorized total for that month,
    /// chronological. Every month of the view appears, zeros included.
    pub monthly_totals: Vec<(String, f64)>,
    pub total: f64,
    /// Average over months with strictly positive categorized totals only;
    /// zero contributing months yields zero.
    pub monthly_average: f64,
}

pub struct AssignmentService;

impl AssignmentService {
    /// Assigns a transaction to a category. Returns `false` without touching
    /// state when the transaction is unknown, the category is unknown, or the
    /// kind does not match: Income entries require a credit, Expense entries
    /// a debit, and the category's own kind must agree.
    pub fn assign(
        workbook: &mut Workbook,
        transaction_id: &TransactionId,
        kind: CategoryKind,
        category_id: Uuid,
    ) -> bool {
        let Some(transaction) = workbook.transaction(transaction_id) else {
            return false;
        };
        let sign_matches = match kind {
            CategoryKind::Income => transaction.is_income(),
            CategoryKind::Expense => transaction.is_expense(),
        };
        if !sign_matches {
            return false;
        }
        match workbook.category(category_id) {
            Some(category) if category.kind == kind => {}
            _ => return false,
        }
        workbook.assignments.insert(
            transaction_id.clone(),
            CategoryAssignment { kind, category_id },
        );
        workbook.touch();
        true
    }

    /// Removes the entry; the transaction becomes uncategorized.
    pub fn unassign(workbook: &mut Workbook, transaction_id: &TransactionId) -> bool {
        let removed = workbook.assignments.remove(transaction_id).is_some();
        if removed {
            workbook.touch();
        }
        removed
    }

    /// Uncategorized means exactly: no entry in the map.
    pub fn is_categorized(workbook: &Workbook, transaction_id: &TransactionId) -> bool {
        workbook.assignments.contains_key(transaction_id)
    }

    /// Sums the categorized amount for `category_id` per month of the current
    /// monthly view. Months with zero categorized activity appear in the
    /// totals but do not dilute the average.
    pub fn category_stats(
        workbook: &Workbook,
        category_id: Uuid,
        kind: CategoryKind,
    ) -> CategoryStats {
        let mut months: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for transaction in TransactionService::visible(workbook) {
            let Some(date) = transaction.date else { continue };
            let slot = months.entry(MonthKey::of(date)).or_insert(0.0);
            if let Some(entry) = workbook.assignments.get(&transaction.id()) {
                if entry.category_id == category_id && entry.kind == kind {
                    *slot += match kind {
                        CategoryKind::Income => transaction.credit,
                        CategoryKind::Expense => transaction.debit,
                    };
                }
            }
        }
        let total: f64 = months.values().sum();
        let contributing = months.values().filter(|value| **value > 0.0).count();
        let monthly_average = if contributing == 0 {
            0.0
        } else {
            total / contributing as f64
        };
        CategoryStats {
            monthly_totals: months
                .into_iter()
                .map(|(key, value)| (key.label(), value))
                .collect(),
            total,
            monthly_average,
        }
    }
}
