//! Chart-ready series for the presentation collaborator.
//!
//! The exact rendering is owned by the dashboard; this module only shapes
//! ordered labels, numeric series, and per-dataset color/stack metadata.

use serde::Serialize;

use crate::core::services::{DailyBucket, MonthlyBucket};
use crate::domain::Workbook;
use crate::palette::Palette;

/// One dataset of a stacked bar or line chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartDataset {
    pub label: String,
    pub data: Vec<f64>,
    pub background_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

/// Balance-over-time line chart: one label and one balance per day bucket.
pub fn balance_series(daily: &[DailyBucket]) -> (Vec<String>, Vec<f64>) {
    daily
        .iter()
        .map(|bucket| (bucket.day.clone(), bucket.balance))
        .unzip()
}

/// Monthly income/expense bar chart: bank income, bank expenses, and one flat
/// dataset per additional item, stacked with its side.
pub fn monthly_overview(workbook: &Workbook, monthly: &[MonthlyBucket]) -> (Vec<String>, Vec<ChartDataset>) {
    let palette = Palette::active(workbook);
    let labels: Vec<String> = monthly.iter().map(|bucket| bucket.label.clone()).collect();
    let months = monthly.len();

    let mut datasets = vec![
        ChartDataset {
            label: "Income".into(),
            data: monthly.iter().map(|bucket| bucket.totals.income).collect(),
            background_color: palette.bank_income_color().to_string(),
            stack: Some("income".into()),
        },
        ChartDataset {
            label: "Base Expenses".into(),
            data: monthly.iter().map(|bucket| bucket.totals.expense).collect(),
            background_color: palette.bank_expense_color().to_string(),
            stack: Some("expenses".into()),
        },
    ];
    for item in &workbook.additional_incomes {
        datasets.push(ChartDataset {
            label: item.name.clone(),
            data: vec![item.monthly_amount; months],
            background_color: item.color.clone(),
            stack: Some("income".into()),
        });
    }
    for item in &workbook.additional_expenses {
        datasets.push(ChartDataset {
            label: item.name.clone(),
            data: vec![item.monthly_amount; months],
            background_color: item.color.clone(),
            stack: Some("expenses".into()),
        });
    }
    (labels, datasets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{AdjustmentService, SummaryService, TransactionService};
    use crate::domain::{CategoryKind, Transaction};
    use crate::palette::{BANK_EXPENSE_COLOR, BANK_INCOME_COLOR};

    #[test]
    fn overview_carries_flat_item_series_and_base_colors() {
        let mut workbook = Workbook::new();
        TransactionService::replace(
            &mut workbook,
            vec![
                Transaction::new(chrono::NaiveDate::from_ymd_opt(2024, 1, 5), 0.0, 3000.0, 0.0, "PAYROLL"),
                Transaction::new(chrono::NaiveDate::from_ymd_opt(2024, 2, 5), 200.0, 0.0, 0.0, "GROCERY"),
            ],
        );
        AdjustmentService::add(&mut workbook, CategoryKind::Expense, "Rent", 1200.0).unwrap();

        let monthly = SummaryService::monthly_ratios(&workbook);
        let (labels, datasets) = monthly_overview(&workbook, &monthly);
        assert_eq!(labels, vec!["2024-1", "2024-2"]);
        assert_eq!(datasets.len(), 3);
        assert_eq!(datasets[0].background_color, BANK_INCOME_COLOR);
        assert_eq!(datasets[1].background_color, BANK_EXPENSE_COLOR);
        assert_eq!(datasets[2].label, "Rent");
        assert_eq!(datasets[2].data, vec![1200.0, 1200.0]);
    }

    #[test]
    fn balance_series_pairs_labels_with_balances() {
        let daily = vec![DailyBucket {
            day: "2024-01-05".into(),
            balance: 912.5,
            transactions: Vec::new(),
        }];
        let (labels, balances) = balance_series(&daily);
        assert_eq!(labels, vec!["2024-01-05"]);
        assert_eq!(balances, vec![912.5]);
    }
}
