//! Hypothetical recurring adjustments layered over the real statement.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::CategoryKind;
use crate::domain::common::{Identifiable, NamedEntity};

/// A flat monthly income or expense the user wants projected onto every
/// bucketed month. Not backed by any statement row, not prorated, not
/// date-bounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdditionalItem {
    pub id: Uuid,
    pub kind: CategoryKind,
    pub name: String,
    pub monthly_amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_id: Option<Uuid>,
    pub color: String,
}

impl AdditionalItem {
    pub fn new(
        kind: CategoryKind,
        name: impl Into<String>,
        monthly_amount: f64,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            monthly_amount,
            category_id: None,
            color: color.into(),
        }
    }
}

impl Identifiable for AdditionalItem {
    fn id(&self) -> Uuid {
        self.id
    }
}

impl NamedEntity for AdditionalItem {
    fn name(&self) -> &str {
        &self.name
    }
}
