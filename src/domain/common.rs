//! Shared traits for entities stored in the workbook.

use uuid::Uuid;

/// Exposes a stable identifier for entities stored in the workbook.
pub trait Identifiable {
    fn id(&self) -> Uuid;
}

/// Provides read-only access to an entity's display name.
pub trait NamedEntity {
    fn name(&self) -> &str;
}
