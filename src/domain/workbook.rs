//! The aggregate state container for a statement-analysis session.

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    AdditionalItem, Category, CategoryAssignment, CategoryKind, Transaction, TransactionId,
};

/// Inclusive date window restricting the derived views. Either bound absent
/// means "no active filter": the full set is visible.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateFilter {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateFilter {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    pub fn is_active(&self) -> bool {
        self.start.is_some() && self.end.is_some()
    }
}

/// Single mutable aggregate owning every piece of engine state.
///
/// All mutation goes through the service layer, which calls
/// [`Workbook::touch`] so the revision counter invalidates any memoized
/// derived view. There is exactly one mutator at a time; writes are
/// last-writer-wins.
#[derive(Debug, Clone)]
pub struct Workbook {
    pub transactions: Vec<Transaction>,
    pub categories: Vec<Category>,
    pub additional_incomes: Vec<AdditionalItem>,
    pub additional_expenses: Vec<AdditionalItem>,
    pub assignments: HashMap<TransactionId, CategoryAssignment>,
    pub custom_colors: Vec<String>,
    pub color_palette_url: Option<String>,
    pub filter: DateFilter,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    revision: u64,
}

impl Workbook {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            transactions: Vec::new(),
            categories: Vec::new(),
            additional_incomes: Vec::new(),
            additional_expenses: Vec::new(),
            assignments: HashMap::new(),
            custom_colors: Vec::new(),
            color_palette_url: None,
            filter: DateFilter::default(),
            created_at: now,
            updated_at: now,
            revision: 0,
        }
    }

    /// Records a mutation for derived-view invalidation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.revision += 1;
    }

    /// Monotonic mutation counter; the invalidation key for cached views.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn transaction_count(&self) -> usize {
        self.transactions.len()
    }

    pub fn transaction(&self, id: &TransactionId) -> Option<&Transaction> {
        self.transactions.iter().find(|txn| txn.matches(id))
    }

    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|category| category.id == id)
    }

    pub fn category_mut(&mut self, id: Uuid) -> Option<&mut Category> {
        self.categories.iter_mut().find(|category| category.id == id)
    }

    /// Categories of one kind in creation order.
    pub fn categories_of(&self, kind: CategoryKind) -> impl Iterator<Item = &Category> {
        self.categories
            .iter()
            .filter(move |category| category.kind == kind)
    }

    /// Additional items of one kind in creation order.
    pub fn additional_items(&self, kind: CategoryKind) -> &[AdditionalItem] {
        match kind {
            CategoryKind::Income => &self.additional_incomes,
            CategoryKind::Expense => &self.additional_expenses,
        }
    }

    pub fn additional_items_mut(&mut self, kind: CategoryKind) -> &mut Vec<AdditionalItem> {
        match kind {
            CategoryKind::Income => &mut self.additional_incomes,
            CategoryKind::Expense => &mut self.additional_expenses,
        }
    }

    /// Destroys all statement-derived and user state. The revision keeps
    /// counting so stale cached views cannot survive a reset.
    pub fn reset(&mut self) {
        let created_at = self.created_at;
        let revision = self.revision;
        *self = Workbook::new();
        self.created_at = created_at;
        self.revision = revision;
        self.touch();
    }
}

impl Default for Workbook {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn touch_bumps_revision() {
        let mut workbook = Workbook::new();
        let before = workbook.revision();
        workbook.touch();
        assert_eq!(workbook.revision(), before + 1);
    }

    #[test]
    fn reset_clears_state_but_keeps_revision_monotonic() {
        let mut workbook = Workbook::new();
        workbook
            .categories
            .push(Category::new(CategoryKind::Expense, "Rent", "#ff6b6b"));
        workbook.touch();
        let revision = workbook.revision();
        workbook.reset();
        assert!(workbook.categories.is_empty());
        assert!(workbook.revision() > revision);
    }
}
