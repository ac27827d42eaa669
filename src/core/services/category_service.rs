//! Category registry operations: creation, renaming, color cycling, and
//! cascading deletion.

use uuid::Uuid;

use crate::domain::{Category, CategoryKind, Workbook};
use crate::palette::Palette;

use super::{ServiceError, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    /// Creates a category of `kind`, colored from the active palette at the
    /// position after the existing categories of that kind. Returns the new
    /// id; ids are never reused.
    pub fn create(workbook: &mut Workbook, kind: CategoryKind, name: &str) -> ServiceResult<Uuid> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(ServiceError::Invalid("Category name is empty".into()));
        }
        let palette = Palette::active(workbook);
        let position = workbook.categories_of(kind).count();
        let category = Category::new(kind, trimmed, palette.allocate(position));
        let id = category.id;
        workbook.categories.push(category);
        workbook.touch();
        Ok(id)
    }

    /// Renames a category. An empty or whitespace-only name leaves it
    /// untouched.
    pub fn rename(workbook: &mut Workbook, id: Uuid, new_name: &str) -> ServiceResult<()> {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let category = workbook
            .category_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Category not found".into()))?;
        category.name = trimmed.to_string();
        workbook.touch();
        Ok(())
    }

    /// Deletes a category and cascades: every assignment entry pointing at it
    /// is removed and additional items referencing it are unlinked.
    pub fn delete(workbook: &mut Workbook, id: Uuid) -> ServiceResult<()> {
        let before = workbook.categories.len();
        workbook.categories.retain(|category| category.id != id);
        if workbook.categories.len() == before {
            return Err(ServiceError::Invalid("Category not found".into()));
        }
        workbook.assignments.retain(|_, entry| entry.category_id != id);
        for item in workbook
            .additional_incomes
            .iter_mut()
            .chain(workbook.additional_expenses.iter_mut())
        {
            if item.category_id == Some(id) {
                item.category_id = None;
            }
        }
        workbook.touch();
        Ok(())
    }

    /// Advances the category's color to the next palette entry, wrapping
    /// after the last. A color no longer present in the active palette (left
    /// over from a palette swap) restarts the cycle at entry 0.
    pub fn cycle_color(workbook: &mut Workbook, id: Uuid) -> ServiceResult<()> {
        let palette = Palette::active(workbook);
        let category = workbook
            .category_mut(id)
            .ok_or_else(|| ServiceError::Invalid("Category not found".into()))?;
        category.color = palette.next_after(&category.color).to_string();
        workbook.touch();
        Ok(())
    }
}
