//! Memoized derived views keyed by the workbook revision and filter.

use crate::core::services::{DailyBucket, MonthlyBucket, SummaryService, WeeklyBucket};
use crate::domain::{DateFilter, Workbook};

/// Caches the bucketed series. Every workbook mutation bumps the revision, so
/// a stale cache can never be observed; caching is an optimization, not part
/// of the contract.
#[derive(Debug, Default)]
pub struct ViewCache {
    key: Option<(u64, DateFilter)>,
    daily: Vec<DailyBucket>,
    monthly: Vec<MonthlyBucket>,
    weekly: Vec<WeeklyBucket>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn refresh(&mut self, workbook: &Workbook) {
        let key = (workbook.revision(), workbook.filter);
        if self.key == Some(key) {
            return;
        }
        self.daily = SummaryService::daily_buckets(workbook);
        self.monthly = SummaryService::monthly_ratios(workbook);
        self.weekly = SummaryService::weekly_buckets(workbook);
        self.key = Some(key);
    }

    pub fn daily(&mut self, workbook: &Workbook) -> &[DailyBucket] {
        self.refresh(workbook);
        &self.daily
    }

    pub fn monthly(&mut self, workbook: &Workbook) -> &[MonthlyBucket] {
        self.refresh(workbook);
        &self.monthly
    }

    pub fn weekly(&mut self, workbook: &Workbook) -> &[WeeklyBucket] {
        self.refresh(workbook);
        &self.weekly
    }
}
