//! Additional income/expense items: creation, removal, category links.

use uuid::Uuid;

use crate::domain::{AdditionalItem, CategoryKind, Workbook};
use crate::palette::Palette;

use super::{ServiceError, ServiceResult};

pub struct AdjustmentService;

impl AdjustmentService {
    /// Adds a flat monthly item of `kind`, colored from the active palette at
    /// the position after the existing items of that kind.
    pub fn add(
        workbook: &mut Workbook,
        kind: CategoryKind,
        name: &str,
        monthly_amount: f64,
    ) -> ServiceResult<Uuid> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Invalid("Item name is empty".into()));
        }
        if !monthly_amount.is_finite() || monthly_amount <= 0.0 {
            return Err(ServiceError::Invalid("Monthly amount must be positive".into()));
        }
        let palette = Palette::active(workbook);
        let position = workbook.additional_items(kind).len();
        let item = AdditionalItem::new(kind, trimmed, monthly_amount, palette.allocate(position));
        let id = item.id;
        workbook.additional_items_mut(kind).push(item);
        workbook.touch();
        Ok(id)
    }

    /// Removes the item with `id` from either list.
    pub fn remove(workbook: &mut Workbook, id: Uuid) -> ServiceResult<()> {
        let before = workbook.additional_incomes.len() + workbook.additional_expenses.len();
        workbook.additional_incomes.retain(|item| item.id != id);
        workbook.additional_expenses.retain(|item| item.id != id);
        let after = workbook.additional_incomes.len() + workbook.additional_expenses.len();
        if after == before {
            return Err(ServiceError::Invalid("Item not found".into()));
        }
        workbook.touch();
        Ok(())
    }

    /// Links the item to a category of the same kind, or clears the link.
    pub fn link_category(
        workbook: &mut Workbook,
        item_id: Uuid,
        category_id: Option<Uuid>,
    ) -> ServiceResult<()> {
        if let Some(category_id) = category_id {
            let item_kind = workbook
                .additional_incomes
                .iter()
                .chain(workbook.additional_expenses.iter())
                .find(|item| item.id == item_id)
                .map(|item| item.kind)
                .ok_or_else(|| ServiceError::Invalid("Item not found".into()))?;
            match workbook.category(category_id) {
                Some(category) if category.kind == item_kind => {}
                Some(_) => {
                    return Err(ServiceError::Invalid(
                        "Category kind does not match item kind".into(),
                    ))
                }
                None => return Err(ServiceError::Invalid("Category not found".into())),
            }
        }
        let item = workbook
            .additional_incomes
            .iter_mut()
            .chain(workbook.additional_expenses.iter_mut())
            .find(|item| item.id == item_id)
            .ok_or_else(|| ServiceError::Invalid("Item not found".into()))?;
        item.category_id = category_id;
        workbook.touch();
        Ok(())
    }
}
