use std::sync::Mutex;

use once_cell::sync::Lazy;
use statement_core::domain::Workbook;
use statement_core::ingest::RawStatementRow;
use statement_core::storage::JsonStorage;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the
/// test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates an isolated snapshot store backed by a unique directory.
pub fn setup_storage() -> JsonStorage {
    let temp = TempDir::new().expect("create temp dir");
    let storage =
        JsonStorage::new(Some(temp.path().to_path_buf())).expect("create json storage backend");
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    storage
}

fn row(post_date: &str, debit: &str, credit: &str, balance: &str, description: &str) -> RawStatementRow {
    RawStatementRow {
        post_date: post_date.into(),
        debit: debit.into(),
        credit: credit.into(),
        balance: balance.into(),
        description: description.into(),
    }
}

/// A small statement export: one payday, two coffee runs, one groceries stop,
/// and a garbled row that normalization must survive.
pub fn sample_rows() -> Vec<RawStatementRow> {
    vec![
        row("1/5/2024", "", "1000.00", "1500.00", "ACME PAYROLL"),
        row("1/8/2024", "4.50", "", "1495.50", "STARBUCKS #1001"),
        row("1/20/2024", "195.50", "", "1300.00", "WHOLE FOODS MARKET"),
        row("2/3/2024", "5.25", "", "1294.75", "STARBUCKS #2207"),
        row("not-a-date", "oops", "", "", ""),
    ]
}

/// Workbook with the sample statement ingested.
pub fn sample_workbook() -> Workbook {
    let mut workbook = Workbook::new();
    statement_core::core::services::TransactionService::ingest(&mut workbook, &sample_rows());
    workbook
}
