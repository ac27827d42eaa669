//! Ingestion and range filtering over the immutable transaction set.

use chrono::NaiveDate;

use crate::domain::{DateFilter, Transaction, Workbook};
use crate::ingest::{normalize_rows, RawStatementRow};

pub struct TransactionService;

impl TransactionService {
    /// Normalizes raw statement rows and replaces the whole transaction set.
    /// Returns the new count.
    pub fn ingest(workbook: &mut Workbook, rows: &[RawStatementRow]) -> usize {
        Self::replace(workbook, normalize_rows(rows))
    }

    /// Replaces the set with already-normalized transactions.
    ///
    /// Ingestion is a full replace, never a merge. The assignment map is left
    /// alone: identities are value-derived, so entries for rows that recur in
    /// the new statement keep their categories, and entries whose rows
    /// vanished stay inert. The revision bump invalidates every cached view.
    pub fn replace(workbook: &mut Workbook, transactions: Vec<Transaction>) -> usize {
        workbook.transactions = transactions;
        workbook.touch();
        workbook.transaction_count()
    }

    /// Destroys all statement and categorization state.
    pub fn reset(workbook: &mut Workbook) {
        workbook.reset();
    }

    /// The transactions whose dates fall in the inclusive `[start, end]`
    /// window. Either bound absent means no active filter: the full set,
    /// unchanged, dateless rows included.
    pub fn filter_by_range<'a>(
        workbook: &'a Workbook,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Vec<&'a Transaction> {
        match (start, end) {
            (Some(start), Some(end)) => workbook
                .transactions
                .iter()
                .filter(|txn| txn.date.is_some_and(|date| date >= start && date <= end))
                .collect(),
            _ => workbook.transactions.iter().collect(),
        }
    }

    /// Applies the filter window used by the derived views.
    pub fn set_filter(workbook: &mut Workbook, filter: DateFilter) {
        workbook.filter = filter;
        workbook.touch();
    }

    /// The transactions visible under the workbook's active filter.
    pub fn visible(workbook: &Workbook) -> Vec<&Transaction> {
        Self::filter_by_range(workbook, workbook.filter.start, workbook.filter.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CategoryAssignment, CategoryKind};
    use uuid::Uuid;

    fn txn(y: i32, m: u32, d: u32, credit: f64, debit: f64) -> Transaction {
        Transaction::new(
            chrono::NaiveDate::from_ymd_opt(y, m, d),
            debit,
            credit,
            0.0,
            "SAMPLE",
        )
    }

    #[test]
    fn unfiltered_range_returns_the_full_set() {
        let mut workbook = Workbook::new();
        TransactionService::replace(
            &mut workbook,
            vec![txn(2024, 1, 5, 100.0, 0.0), txn(2024, 2, 5, 0.0, 50.0)],
        );
        assert_eq!(TransactionService::filter_by_range(&workbook, None, None).len(), 2);
        let start = chrono::NaiveDate::from_ymd_opt(2024, 2, 1);
        assert_eq!(
            TransactionService::filter_by_range(&workbook, start, None).len(),
            2,
            "one missing bound means no filter"
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let mut workbook = Workbook::new();
        TransactionService::replace(
            &mut workbook,
            vec![txn(2024, 1, 5, 100.0, 0.0), txn(2024, 1, 20, 0.0, 50.0)],
        );
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 5);
        let end = chrono::NaiveDate::from_ymd_opt(2024, 1, 20);
        assert_eq!(TransactionService::filter_by_range(&workbook, start, end).len(), 2);
    }

    #[test]
    fn replace_keeps_assignments_for_recurring_identities() {
        let mut workbook = Workbook::new();
        let keeper = txn(2024, 1, 5, 100.0, 0.0);
        let id = keeper.id();
        TransactionService::replace(&mut workbook, vec![keeper.clone()]);
        workbook.assignments.insert(
            id.clone(),
            CategoryAssignment {
                kind: CategoryKind::Income,
                category_id: Uuid::new_v4(),
            },
        );
        TransactionService::replace(&mut workbook, vec![keeper]);
        assert!(workbook.assignments.contains_key(&id));
    }
}
