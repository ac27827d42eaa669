//! Time-bucketed views over the visible transaction set.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};

use crate::domain::{Transaction, Workbook};

use super::TransactionService;

/// Chronologically ordered year/month key. The display label keeps the
/// dashboard's un-padded form (`"2024-3"`), so ordering goes through this key
/// rather than the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    pub month: u32,
}

impl MonthKey {
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn label(&self) -> String {
        format!("{}-{}", self.year, self.month)
    }
}

/// One calendar day's bucket: the day's transactions and the balance the
/// statement carried out of the day.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyBucket {
    pub day: String,
    pub balance: f64,
    pub transactions: Vec<Transaction>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MonthlyTotals {
    pub income: f64,
    pub expense: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyBucket {
    pub key: MonthKey,
    pub label: String,
    pub totals: MonthlyTotals,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub balance: f64,
    pub transactions: Vec<Transaction>,
}

pub struct SummaryService;

impl SummaryService {
    /// Daily buckets of the workbook's visible transactions, ascending.
    pub fn daily_buckets(workbook: &Workbook) -> Vec<DailyBucket> {
        Self::daily_buckets_of(&TransactionService::visible(workbook))
    }

    /// Groups by calendar day (`YYYY-MM-DD`). Within a day the last statement
    /// line in input order wins the balance. Dateless transactions join no
    /// bucket. The zero-padded key makes lexicographic order chronological.
    pub fn daily_buckets_of(transactions: &[&Transaction]) -> Vec<DailyBucket> {
        let mut buckets: BTreeMap<String, DailyBucket> = BTreeMap::new();
        for transaction in transactions {
            let Some(date) = transaction.date else { continue };
            let day = date.format("%Y-%m-%d").to_string();
            let bucket = buckets.entry(day.clone()).or_insert_with(|| DailyBucket {
                day,
                balance: 0.0,
                transactions: Vec::new(),
            });
            bucket.balance = transaction.balance;
            bucket.transactions.push((*transaction).clone());
        }
        buckets.into_values().collect()
    }

    /// Monthly income/expense totals of the visible transactions.
    pub fn monthly_ratios(workbook: &Workbook) -> Vec<MonthlyBucket> {
        Self::monthly_ratios_of(&TransactionService::visible(workbook))
    }

    /// Accumulates `income += credit` and `expense += debit` per month,
    /// chronological. Labels are un-padded (`"2024-3"`).
    pub fn monthly_ratios_of(transactions: &[&Transaction]) -> Vec<MonthlyBucket> {
        let mut buckets: BTreeMap<MonthKey, MonthlyTotals> = BTreeMap::new();
        for transaction in transactions {
            let Some(date) = transaction.date else { continue };
            let totals = buckets.entry(MonthKey::of(date)).or_default();
            totals.income += transaction.credit;
            totals.expense += transaction.debit;
        }
        buckets
            .into_iter()
            .map(|(key, totals)| MonthlyBucket {
                key,
                label: key.label(),
                totals,
            })
            .collect()
    }

    /// Weekly balance buckets of the visible transactions.
    pub fn weekly_buckets(workbook: &Workbook) -> Vec<WeeklyBucket> {
        Self::weekly_buckets_of(&TransactionService::visible(workbook))
    }

    /// Groups by start of week (Sunday), last statement line winning the
    /// balance. Weeks with no activity between the first and last observed
    /// week inherit the previous week's balance: carried forward, never
    /// interpolated, never null.
    pub fn weekly_buckets_of(transactions: &[&Transaction]) -> Vec<WeeklyBucket> {
        let mut buckets: BTreeMap<NaiveDate, WeeklyBucket> = BTreeMap::new();
        for transaction in transactions {
            let Some(date) = transaction.date else { continue };
            let week_start = start_of_week(date);
            let bucket = buckets.entry(week_start).or_insert_with(|| WeeklyBucket {
                week_start,
                balance: 0.0,
                transactions: Vec::new(),
            });
            bucket.balance = transaction.balance;
            bucket.transactions.push((*transaction).clone());
        }

        let mut filled = Vec::new();
        let mut observed = buckets.into_values();
        let Some(first) = observed.next() else {
            return filled;
        };
        let mut carried_balance = first.balance;
        let mut cursor = first.week_start + Duration::weeks(1);
        filled.push(first);
        for bucket in observed {
            while cursor < bucket.week_start {
                filled.push(WeeklyBucket {
                    week_start: cursor,
                    balance: carried_balance,
                    transactions: Vec::new(),
                });
                cursor = cursor + Duration::weeks(1);
            }
            carried_balance = bucket.balance;
            cursor = bucket.week_start + Duration::weeks(1);
            filled.push(bucket);
        }
        filled
    }
}

fn start_of_week(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}
