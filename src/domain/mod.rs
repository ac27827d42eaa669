//! Domain models for statement transactions, categories, and adjustments.

pub mod adjustment;
pub mod category;
pub mod common;
pub mod transaction;
pub mod workbook;

pub use adjustment::AdditionalItem;
pub use category::{Category, CategoryAssignment, CategoryKind};
pub use common::{Identifiable, NamedEntity};
pub use transaction::{Transaction, TransactionId, MISSING_DESCRIPTION};
pub use workbook::{DateFilter, Workbook};
