//! Description-similarity matching and the bulk categorization workflow.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use strsim::levenshtein;
use uuid::Uuid;

use crate::domain::{CategoryKind, Transaction, TransactionId, Workbook};

use super::AssignmentService;

/// Generic leading words that would bulk-match unrelated transactions.
static STOP_WORDS: Lazy<HashSet<&'static str>> =
    Lazy::new(|| ["the", "and", "for", "with", "from", "to"].into_iter().collect());

const MIN_TOKEN_LEN: usize = 3;

fn first_token(description: &str) -> Option<String> {
    description
        .split_whitespace()
        .next()
        .map(|token| token.to_lowercase())
}

/// Narrows similar transactions relative to the target's date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DateRangeFilter {
    #[default]
    All,
    /// Strictly before the target's date.
    Before,
    /// Strictly after the target's date.
    After,
}

/// Narrows similar transactions by assignment-map presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryStatusFilter {
    #[default]
    All,
    Uncategorized,
    Categorized,
}

pub struct SimilarityService;

impl SimilarityService {
    /// All other transactions sharing the target's first description word,
    /// closest full descriptions first. Empty when the word is shorter than
    /// three characters or too generic to be a useful match key.
    pub fn find_similar(workbook: &Workbook, target: &TransactionId) -> Vec<Transaction> {
        let Some(token) = first_token(&target.description) else {
            return Vec::new();
        };
        if token.len() < MIN_TOKEN_LEN || STOP_WORDS.contains(token.as_str()) {
            return Vec::new();
        }
        let target_description = target.description.to_lowercase();
        let mut matches: Vec<Transaction> = workbook
            .transactions
            .iter()
            .filter(|txn| !txn.matches(target))
            .filter(|txn| first_token(&txn.description).as_deref() == Some(token.as_str()))
            .cloned()
            .collect();
        matches.sort_by_key(|txn| levenshtein(&txn.description.to_lowercase(), &target_description));
        matches
    }

    /// Narrows the full similar set. Non-destructive: recomputed from
    /// `candidates` on every call, so changing filters never loses matches.
    pub fn filter_similar<'a>(
        workbook: &Workbook,
        candidates: &'a [Transaction],
        target: &TransactionId,
        date_range: DateRangeFilter,
        category_status: CategoryStatusFilter,
    ) -> Vec<&'a Transaction> {
        candidates
            .iter()
            .filter(|txn| match date_range {
                DateRangeFilter::All => true,
                DateRangeFilter::Before => match (txn.date, target.date) {
                    (Some(date), Some(target_date)) => date < target_date,
                    _ => false,
                },
                DateRangeFilter::After => match (txn.date, target.date) {
                    (Some(date), Some(target_date)) => date > target_date,
                    _ => false,
                },
            })
            .filter(|txn| match category_status {
                CategoryStatusFilter::All => true,
                CategoryStatusFilter::Uncategorized => {
                    !AssignmentService::is_categorized(workbook, &txn.id())
                }
                CategoryStatusFilter::Categorized => {
                    AssignmentService::is_categorized(workbook, &txn.id())
                }
            })
            .collect()
    }
}

/// What a workflow step did, for the caller driving the review dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowOutcome {
    /// Only the target was assigned; no similar transactions existed.
    AppliedTarget,
    /// Similar transactions await review; nothing assigned yet.
    AwaitingReview { candidate_count: usize },
    /// Target plus `peers` selected transactions were assigned.
    Applied { peers: usize },
    /// Nothing assigned.
    Cancelled,
}

#[derive(Debug, Default)]
enum FlowState {
    #[default]
    Idle,
    SimilarFound {
        target: TransactionId,
        kind: CategoryKind,
        category_id: Uuid,
        candidates: Vec<Transaction>,
        selected: Vec<TransactionId>,
    },
}

/// Bulk-categorization workflow:
/// `Idle → SimilarFound → (skip | apply | cancel) → Idle`.
///
/// `begin` short-circuits to a direct assignment when nothing similar exists,
/// so the review state is only ever entered with candidates in hand. Every
/// candidate that survives the active filters is selected by default.
#[derive(Debug, Default)]
pub struct CategorizationFlow {
    state: FlowState,
}

impl CategorizationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, FlowState::Idle)
    }

    /// The candidates found for review, empty when idle.
    pub fn candidates(&self) -> &[Transaction] {
        match &self.state {
            FlowState::SimilarFound { candidates, .. } => candidates,
            FlowState::Idle => &[],
        }
    }

    /// The currently selected identities, empty when idle.
    pub fn selected(&self) -> &[TransactionId] {
        match &self.state {
            FlowState::SimilarFound { selected, .. } => selected,
            FlowState::Idle => &[],
        }
    }

    /// Starts categorizing `target` into `category_id`.
    pub fn begin(
        &mut self,
        workbook: &mut Workbook,
        target: TransactionId,
        kind: CategoryKind,
        category_id: Uuid,
    ) -> FlowOutcome {
        let candidates = SimilarityService::find_similar(workbook, &target);
        if candidates.is_empty() {
            AssignmentService::assign(workbook, &target, kind, category_id);
            return FlowOutcome::AppliedTarget;
        }
        let selected = candidates.iter().map(Transaction::id).collect();
        let candidate_count = candidates.len();
        self.state = FlowState::SimilarFound {
            target,
            kind,
            category_id,
            candidates,
            selected,
        };
        FlowOutcome::AwaitingReview { candidate_count }
    }

    /// Re-applies the review filters against the full candidate set and
    /// default-selects every survivor. Returns the surviving count.
    pub fn refine(
        &mut self,
        workbook: &Workbook,
        date_range: DateRangeFilter,
        category_status: CategoryStatusFilter,
    ) -> usize {
        let FlowState::SimilarFound {
            target,
            candidates,
            selected,
            ..
        } = &mut self.state
        else {
            return 0;
        };
        let surviving =
            SimilarityService::filter_similar(workbook, candidates, target, date_range, category_status);
        *selected = surviving.iter().map(|txn| txn.id()).collect();
        selected.len()
    }

    /// Narrows the selection to a subset chosen in the review dialog.
    pub fn select(&mut self, ids: Vec<TransactionId>) {
        if let FlowState::SimilarFound { selected, .. } = &mut self.state {
            *selected = ids;
        }
    }

    /// Assigns only the target, leaving the similar transactions untouched.
    pub fn skip(&mut self, workbook: &mut Workbook) -> FlowOutcome {
        match std::mem::take(&mut self.state) {
            FlowState::SimilarFound {
                target,
                kind,
                category_id,
                ..
            } => {
                AssignmentService::assign(workbook, &target, kind, category_id);
                FlowOutcome::AppliedTarget
            }
            FlowState::Idle => FlowOutcome::Cancelled,
        }
    }

    /// Assigns the target and every selected similar transaction to the same
    /// category.
    pub fn apply(&mut self, workbook: &mut Workbook) -> FlowOutcome {
        match std::mem::take(&mut self.state) {
            FlowState::SimilarFound {
                target,
                kind,
                category_id,
                selected,
                ..
            } => {
                AssignmentService::assign(workbook, &target, kind, category_id);
                let mut peers = 0;
                for id in &selected {
                    if AssignmentService::assign(workbook, id, kind, category_id) {
                        peers += 1;
                    }
                }
                FlowOutcome::Applied { peers }
            }
            FlowState::Idle => FlowOutcome::Cancelled,
        }
    }

    /// Abandons the workflow without assigning anything.
    pub fn cancel(&mut self) -> FlowOutcome {
        self.state = FlowState::Idle;
        FlowOutcome::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::CategoryService;
    use crate::domain::Transaction;
    use chrono::NaiveDate;

    fn debit(day: u32, description: &str) -> Transaction {
        Transaction::new(
            NaiveDate::from_ymd_opt(2024, 1, day),
            25.0,
            0.0,
            0.0,
            description,
        )
    }

    #[test]
    fn stop_words_and_short_tokens_match_nothing() {
        let mut workbook = Workbook::new();
        workbook.transactions = vec![
            debit(1, "to store"),
            debit(2, "to market"),
            debit(3, "ab cd"),
            debit(4, "ab ef"),
        ];
        let stopped = workbook.transactions[0].id();
        assert!(SimilarityService::find_similar(&workbook, &stopped).is_empty());
        let short = workbook.transactions[2].id();
        assert!(SimilarityService::find_similar(&workbook, &short).is_empty());
    }

    #[test]
    fn find_similar_matches_first_token_case_insensitively() {
        let mut workbook = Workbook::new();
        workbook.transactions = vec![
            debit(1, "STARBUCKS #1234"),
            debit(2, "starbucks #9"),
            debit(3, "STARBUCKS #1230"),
            debit(4, "SHELL OIL"),
        ];
        let target = workbook.transactions[0].id();
        let similar = SimilarityService::find_similar(&workbook, &target);
        assert_eq!(similar.len(), 2);
        assert_eq!(
            similar[0].description, "STARBUCKS #1230",
            "closest description first"
        );
    }

    #[test]
    fn filters_are_strict_and_non_destructive() {
        let mut workbook = Workbook::new();
        workbook.transactions = vec![
            debit(10, "STARBUCKS #1"),
            debit(5, "STARBUCKS #2"),
            debit(15, "STARBUCKS #3"),
        ];
        let target = workbook.transactions[0].id();
        let candidates = SimilarityService::find_similar(&workbook, &target);
        assert_eq!(candidates.len(), 2);

        let before = SimilarityService::filter_similar(
            &workbook,
            &candidates,
            &target,
            DateRangeFilter::Before,
            CategoryStatusFilter::All,
        );
        assert_eq!(before.len(), 1);
        assert_eq!(before[0].description, "STARBUCKS #2");

        // Recomputing from the full set restores everything.
        let all = SimilarityService::filter_similar(
            &workbook,
            &candidates,
            &target,
            DateRangeFilter::All,
            CategoryStatusFilter::All,
        );
        assert_eq!(all.len(), 2);
    }

    #[test]
    fn begin_short_circuits_without_candidates() {
        let mut workbook = Workbook::new();
        workbook.transactions = vec![debit(1, "UNIQUE VENDOR")];
        let target = workbook.transactions[0].id();
        let category =
            CategoryService::create(&mut workbook, CategoryKind::Expense, "Misc").unwrap();
        let mut flow = CategorizationFlow::new();
        let outcome = flow.begin(&mut workbook, target.clone(), CategoryKind::Expense, category);
        assert_eq!(outcome, FlowOutcome::AppliedTarget);
        assert!(flow.is_idle());
        assert!(workbook.assignments.contains_key(&target));
    }

    #[test]
    fn apply_assigns_target_and_selection_cancel_assigns_nothing() {
        let mut workbook = Workbook::new();
        workbook.transactions = vec![
            debit(1, "STARBUCKS #1"),
            debit(2, "STARBUCKS #2"),
            debit(3, "STARBUCKS #3"),
        ];
        let target = workbook.transactions[0].id();
        let category =
            CategoryService::create(&mut workbook, CategoryKind::Expense, "Coffee").unwrap();

        let mut flow = CategorizationFlow::new();
        let outcome = flow.begin(&mut workbook, target.clone(), CategoryKind::Expense, category);
        assert_eq!(outcome, FlowOutcome::AwaitingReview { candidate_count: 2 });
        assert_eq!(flow.selected().len(), 2, "everything selected by default");

        let outcome = flow.apply(&mut workbook);
        assert_eq!(outcome, FlowOutcome::Applied { peers: 2 });
        assert_eq!(workbook.assignments.len(), 3);
        assert!(flow.is_idle());

        // Cancel leaves the map alone.
        let other = workbook.transactions[1].id();
        let mut flow = CategorizationFlow::new();
        flow.begin(&mut workbook, other, CategoryKind::Expense, category);
        let len_before = workbook.assignments.len();
        assert_eq!(flow.cancel(), FlowOutcome::Cancelled);
        assert_eq!(workbook.assignments.len(), len_before);
    }

    #[test]
    fn skip_assigns_only_the_target() {
        let mut workbook = Workbook::new();
        workbook.transactions = vec![debit(1, "STARBUCKS #1"), debit(2, "STARBUCKS #2")];
        let target = workbook.transactions[0].id();
        let category =
            CategoryService::create(&mut workbook, CategoryKind::Expense, "Coffee").unwrap();
        let mut flow = CategorizationFlow::new();
        flow.begin(&mut workbook, target.clone(), CategoryKind::Expense, category);
        assert_eq!(flow.skip(&mut workbook), FlowOutcome::AppliedTarget);
        assert_eq!(workbook.assignments.len(), 1);
        assert!(workbook.assignments.contains_key(&target));
    }
}
