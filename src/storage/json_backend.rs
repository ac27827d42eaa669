//! JSON snapshot persistence with schema versioning and atomic writes.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    AdditionalItem, Category, CategoryAssignment, CategoryKind, Transaction, TransactionId,
    Workbook,
};
use crate::errors::EngineError;
use crate::utils::ensure_dir;

use super::{Result, SnapshotStore};

pub const SNAPSHOT_VERSION: u32 = 1;
const SNAPSHOT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// One assignment entry flattened for JSON. The in-memory map is keyed by a
/// structured identity, which JSON objects cannot express.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentRecord {
    pub transaction: TransactionId,
    pub kind: CategoryKind,
    pub category_id: Uuid,
}

/// The serialized shape crossing the persistence boundary. Field names match
/// the dashboard's export format; dates travel as ISO strings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default, alias = "exportedAt")]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub additional_incomes: Vec<AdditionalItem>,
    #[serde(default)]
    pub additional_expenses: Vec<AdditionalItem>,
    #[serde(default)]
    pub income_categories: Vec<Category>,
    #[serde(default)]
    pub expense_categories: Vec<Category>,
    #[serde(default)]
    pub custom_colors: Vec<String>,
    #[serde(default)]
    pub color_palette_url: Option<String>,
    #[serde(default)]
    pub transaction_categories: Vec<AssignmentRecord>,
}

impl Snapshot {
    pub fn from_workbook(workbook: &Workbook) -> Self {
        let mut transaction_categories: Vec<AssignmentRecord> = workbook
            .assignments
            .iter()
            .map(|(id, entry)| AssignmentRecord {
                transaction: id.clone(),
                kind: entry.kind,
                category_id: entry.category_id,
            })
            .collect();
        // Deterministic export order regardless of map iteration.
        transaction_categories.sort_by(|a, b| {
            (a.transaction.date, &a.transaction.description, a.transaction.amount_cents).cmp(&(
                b.transaction.date,
                &b.transaction.description,
                b.transaction.amount_cents,
            ))
        });
        Self {
            version: Some(SNAPSHOT_VERSION),
            saved_at: Some(Utc::now()),
            transactions: workbook.transactions.clone(),
            additional_incomes: workbook.additional_incomes.clone(),
            additional_expenses: workbook.additional_expenses.clone(),
            income_categories: workbook.categories_of(CategoryKind::Income).cloned().collect(),
            expense_categories: workbook
                .categories_of(CategoryKind::Expense)
                .cloned()
                .collect(),
            custom_colors: workbook.custom_colors.clone(),
            color_palette_url: workbook.color_palette_url.clone(),
            transaction_categories,
        }
    }

    /// Validates the payload and builds a complete workbook. All-or-nothing:
    /// the caller's current state is never touched on failure.
    pub fn into_workbook(self) -> Result<Workbook> {
        let version = self
            .version
            .ok_or_else(|| EngineError::ImportFormat("snapshot has no version".into()))?;
        if version > SNAPSHOT_VERSION {
            return Err(EngineError::ImportFormat(format!(
                "snapshot version {version} is newer than supported {SNAPSHOT_VERSION}"
            )));
        }
        let mut workbook = Workbook::new();
        workbook.transactions = self.transactions;
        workbook.categories = self
            .income_categories
            .into_iter()
            .chain(self.expense_categories)
            .collect();
        workbook.additional_incomes = self.additional_incomes;
        workbook.additional_expenses = self.additional_expenses;
        workbook.custom_colors = self.custom_colors;
        workbook.color_palette_url = self.color_palette_url;
        workbook.assignments = self
            .transaction_categories
            .into_iter()
            .map(|record| {
                (
                    record.transaction,
                    CategoryAssignment {
                        kind: record.kind,
                        category_id: record.category_id,
                    },
                )
            })
            .collect();
        workbook.touch();
        Ok(workbook)
    }
}

/// Stores named snapshots under a root directory, backing up the previous
/// file before every overwrite.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let root = root.unwrap_or_else(crate::utils::default_data_dir);
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn snapshot_path(&self, name: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(name), SNAPSHOT_EXTENSION))
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    fn backup_existing(&self, path: &Path) -> Result<()> {
        if path.exists() {
            let mut backup = path.as_os_str().to_os_string();
            backup.push(".bak");
            fs::copy(path, PathBuf::from(backup))?;
        }
        Ok(())
    }
}

impl SnapshotStore for JsonStorage {
    fn save(&self, workbook: &Workbook, name: &str) -> Result<PathBuf> {
        let path = self.snapshot_path(name);
        self.backup_existing(&path)?;
        let snapshot = Snapshot::from_workbook(workbook);
        match export_to_path(&snapshot, &path) {
            Ok(()) => Ok(path),
            Err(err) => {
                // In-memory state is not rolled back; the session continues
                // unsaved.
                tracing::error!(error = %err, path = %path.display(), "snapshot save failed");
                Err(err)
            }
        }
    }

    fn load(&self, name: &str) -> Result<Workbook> {
        import_from_path(&self.snapshot_path(name))
    }
}

/// Writes a snapshot atomically: temp file first, then rename over the target.
pub fn export_to_path(snapshot: &Snapshot, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(snapshot)?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Reads, version-checks, and reconstitutes a snapshot.
pub fn import_from_path(path: &Path) -> Result<Workbook> {
    let data = fs::read_to_string(path)?;
    import_from_str(&data)
}

/// Parses a snapshot payload. Unparsable JSON and unversioned payloads are
/// both import-format failures, surfaced without touching any state.
pub fn import_from_str(data: &str) -> Result<Workbook> {
    let snapshot: Snapshot = serde_json::from_str(data)
        .map_err(|err| EngineError::ImportFormat(format!("unparsable snapshot: {err}")))?;
    snapshot.into_workbook()
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "snapshot".into()
    } else {
        sanitized
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
