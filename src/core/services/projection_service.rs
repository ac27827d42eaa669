//! Hypothetical adjustment overlays on the monthly series.

use crate::domain::{AdditionalItem, Workbook};

use super::{MonthlyBucket, SummaryService};

/// One month of the projected series: bank totals plus every flat adjustment.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectedMonth {
    pub label: String,
    pub income: f64,
    pub expense: f64,
}

impl ProjectedMonth {
    pub fn leftover(&self) -> f64 {
        self.income - self.expense
    }
}

pub struct ProjectionService;

impl ProjectionService {
    /// Monthly totals with every additional item's flat amount applied to
    /// every month in view. Items are not date-scoped: an item added today is
    /// projected uniformly across all historical and future months.
    pub fn projected_series(
        monthly: &[MonthlyBucket],
        incomes: &[AdditionalItem],
        expenses: &[AdditionalItem],
    ) -> Vec<ProjectedMonth> {
        let added_income: f64 = incomes.iter().map(|item| item.monthly_amount).sum();
        let added_expense: f64 = expenses.iter().map(|item| item.monthly_amount).sum();
        monthly
            .iter()
            .map(|bucket| ProjectedMonth {
                label: bucket.label.clone(),
                income: bucket.totals.income + added_income,
                expense: bucket.totals.expense + added_expense,
            })
            .collect()
    }

    /// Mean monthly leftover after projecting adjustments; zero months in
    /// view yields zero.
    pub fn average_leftover(
        monthly: &[MonthlyBucket],
        incomes: &[AdditionalItem],
        expenses: &[AdditionalItem],
    ) -> f64 {
        if monthly.is_empty() {
            return 0.0;
        }
        let projected = Self::projected_series(monthly, incomes, expenses);
        let total: f64 = projected.iter().map(ProjectedMonth::leftover).sum();
        total / projected.len() as f64
    }

    /// Projected series over the workbook's visible months and items.
    pub fn projected(workbook: &Workbook) -> Vec<ProjectedMonth> {
        Self::projected_series(
            &SummaryService::monthly_ratios(workbook),
            &workbook.additional_incomes,
            &workbook.additional_expenses,
        )
    }

    /// Average leftover over the workbook's visible months and items.
    pub fn average_leftover_for(workbook: &Workbook) -> f64 {
        Self::average_leftover(
            &SummaryService::monthly_ratios(workbook),
            &workbook.additional_incomes,
            &workbook.additional_expenses,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{AdjustmentService, SummaryService, TransactionService};
    use crate::domain::{CategoryKind, Transaction};

    fn txn(m: u32, credit: f64, debit: f64) -> Transaction {
        Transaction::new(
            chrono::NaiveDate::from_ymd_opt(2024, m, 15),
            debit,
            credit,
            0.0,
            "SAMPLE",
        )
    }

    #[test]
    fn flat_amounts_apply_to_every_month() {
        let mut workbook = Workbook::new();
        TransactionService::replace(
            &mut workbook,
            vec![txn(1, 3000.0, 500.0), txn(2, 3000.0, 700.0)],
        );
        AdjustmentService::add(&mut workbook, CategoryKind::Expense, "Rent", 1200.0).unwrap();
        AdjustmentService::add(&mut workbook, CategoryKind::Income, "Side gig", 400.0).unwrap();

        let projected = ProjectionService::projected(&workbook);
        assert_eq!(projected.len(), 2);
        assert_eq!(projected[0].income, 3400.0);
        assert_eq!(projected[0].expense, 1700.0);
        assert_eq!(projected[1].income, 3400.0);
        assert_eq!(projected[1].expense, 1900.0);
    }

    #[test]
    fn average_leftover_reduces_to_mean_difference() {
        let mut workbook = Workbook::new();
        TransactionService::replace(
            &mut workbook,
            vec![txn(1, 3000.0, 500.0), txn(2, 3000.0, 700.0)],
        );
        AdjustmentService::add(&mut workbook, CategoryKind::Expense, "Rent", 1200.0).unwrap();
        // mean(3000) - mean(600) - 1200 = 1200
        let leftover = ProjectionService::average_leftover_for(&workbook);
        assert!((leftover - 1200.0).abs() < 1e-9);
    }

    #[test]
    fn empty_view_averages_zero() {
        let workbook = Workbook::new();
        assert_eq!(ProjectionService::average_leftover_for(&workbook), 0.0);
        let monthly = SummaryService::monthly_ratios(&workbook);
        assert!(ProjectionService::projected_series(&monthly, &[], &[]).is_empty());
    }
}
