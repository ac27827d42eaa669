use std::fs;

use statement_core::core::services::{
    AdjustmentService, AssignmentService, CategoryService, TransactionService,
};
use statement_core::domain::{CategoryKind, Workbook};
use statement_core::errors::EngineError;
use statement_core::storage::{import_from_str, Snapshot, SnapshotStore};

mod common;

fn populated_workbook() -> Workbook {
    let mut workbook = common::sample_workbook();
    let coffee = CategoryService::create(&mut workbook, CategoryKind::Expense, "Coffee").unwrap();
    let salary = CategoryService::create(&mut workbook, CategoryKind::Income, "Salary").unwrap();
    let starbucks = workbook.transactions[1].id();
    let payroll = workbook.transactions[0].id();
    assert!(AssignmentService::assign(&mut workbook, &starbucks, CategoryKind::Expense, coffee));
    assert!(AssignmentService::assign(&mut workbook, &payroll, CategoryKind::Income, salary));
    AdjustmentService::add(&mut workbook, CategoryKind::Expense, "Rent", 1200.0).unwrap();
    workbook
}

#[test]
fn export_import_roundtrip_reproduces_the_dataset() {
    let workbook = populated_workbook();
    let json = serde_json::to_string(&Snapshot::from_workbook(&workbook)).unwrap();
    let restored = import_from_str(&json).expect("import");

    assert_eq!(restored.transactions, workbook.transactions);
    assert_eq!(restored.assignments, workbook.assignments);
    assert_eq!(restored.categories.len(), workbook.categories.len());
    assert_eq!(restored.additional_expenses, workbook.additional_expenses);
}

#[test]
fn snapshot_splits_categories_by_kind() {
    let workbook = populated_workbook();
    let snapshot = Snapshot::from_workbook(&workbook);
    assert_eq!(snapshot.income_categories.len(), 1);
    assert_eq!(snapshot.expense_categories.len(), 1);
    assert_eq!(snapshot.version, Some(statement_core::storage::SNAPSHOT_VERSION));
}

#[test]
fn snapshot_uses_the_dashboard_field_names() {
    let workbook = populated_workbook();
    let json = serde_json::to_string(&Snapshot::from_workbook(&workbook)).unwrap();
    for field in [
        "\"version\"",
        "\"savedAt\"",
        "\"transactions\"",
        "\"additionalIncomes\"",
        "\"additionalExpenses\"",
        "\"incomeCategories\"",
        "\"expenseCategories\"",
        "\"customColors\"",
        "\"transactionCategories\"",
    ] {
        assert!(json.contains(field), "missing {field} in {json}");
    }
}

#[test]
fn legacy_exported_at_field_is_accepted() {
    let payload = r#"{"version": 1, "exportedAt": "2024-06-01T12:00:00Z"}"#;
    let restored = import_from_str(payload).expect("import");
    assert!(restored.transactions.is_empty());
}

#[test]
fn unversioned_import_fails_and_state_stays_untouched() {
    let mut workbook = populated_workbook();
    let assignments_before = workbook.assignments.clone();
    let err = import_from_str(r#"{"transactions": []}"#).expect_err("must reject");
    assert!(matches!(err, EngineError::ImportFormat(_)));
    // Import builds a fresh workbook; a failure hands nothing back to swap in.
    TransactionService::set_filter(&mut workbook, Default::default());
    assert_eq!(workbook.assignments, assignments_before);
}

#[test]
fn storage_roundtrip_via_named_snapshots() {
    let storage = common::setup_storage();
    let workbook = populated_workbook();
    let path = storage.save(&workbook, "My Checking").expect("save");
    assert!(path.file_name().unwrap().to_str().unwrap().starts_with("my_checking"));
    let restored = storage.load("My Checking").expect("load");
    assert_eq!(restored.transactions, workbook.transactions);
    assert_eq!(restored.assignments, workbook.assignments);
}

#[test]
fn failed_save_preserves_the_previous_snapshot() {
    let storage = common::setup_storage();
    let workbook = populated_workbook();
    let path = storage.save(&workbook, "reliable").expect("first save");
    let original = fs::read_to_string(&path).expect("read original");

    // A directory squatting on the temp path forces the write to fail.
    let mut tmp = path.as_os_str().to_os_string();
    tmp.push(".tmp");
    let tmp = std::path::PathBuf::from(tmp);
    fs::create_dir_all(&tmp).unwrap();

    let result = storage.save(&workbook, "reliable");
    assert!(result.is_err(), "expected save to fail when the temp path is a directory");
    let current = fs::read_to_string(&path).expect("read after failure");
    assert_eq!(current, original, "atomic save failure must not corrupt the snapshot");

    let _ = fs::remove_dir_all(&tmp);
}
