//! Deterministic, cyclic color allocation from a default or imported palette.

use crate::domain::{CategoryKind, Workbook};

/// Color of the bank income base series when no custom palette is active.
pub const BANK_INCOME_COLOR: &str = "#34c759";
/// Color of the bank expense base series when no custom palette is active.
pub const BANK_EXPENSE_COLOR: &str = "#ff3b30";

/// Built-in palette used when no custom color list is loaded.
pub const DEFAULT_PALETTE: [&str; 20] = [
    "#ff6b6b", "#4ecdc4", "#45b7d1", "#96ceb4", "#feca57", "#ff9ff3", "#54a0ff", "#5f27cd",
    "#00d2d3", "#ff9f43", "#c8d6e5", "#576574", "#10ac84", "#ee5253", "#f368e0", "#0abde3",
    "#3867d6", "#8854d0", "#fa8231", "#20bf6b",
];

/// Head entries of a custom palette reserved for the bank income and expense
/// base series.
const CUSTOM_RESERVED: usize = 2;

/// The palette currently in effect: the imported custom list when non-empty,
/// otherwise the built-in default. Allocation is purely positional; nothing
/// binds a color to an entity beyond what the entity itself stores.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    colors: Vec<String>,
    reserved: usize,
}

impl Palette {
    pub fn active(workbook: &Workbook) -> Self {
        if workbook.custom_colors.is_empty() {
            Self {
                colors: DEFAULT_PALETTE.iter().map(|color| color.to_string()).collect(),
                reserved: 0,
            }
        } else {
            Self {
                colors: workbook.custom_colors.clone(),
                reserved: CUSTOM_RESERVED.min(workbook.custom_colors.len()),
            }
        }
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color for the nth user-created entity, cycling past the end.
    pub fn allocate(&self, position: usize) -> &str {
        &self.colors[(self.reserved + position) % self.colors.len()]
    }

    /// The entry after `current`, wrapping to the first. A color that is not
    /// in the palette (left over from a palette swap) restarts at entry 0.
    pub fn next_after(&self, current: &str) -> &str {
        let index = self
            .colors
            .iter()
            .position(|color| color.eq_ignore_ascii_case(current));
        let next = match index {
            Some(found) => (found + 1) % self.colors.len(),
            None => 0,
        };
        &self.colors[next]
    }

    pub fn bank_income_color(&self) -> &str {
        if self.reserved >= 1 {
            &self.colors[0]
        } else {
            BANK_INCOME_COLOR
        }
    }

    pub fn bank_expense_color(&self) -> &str {
        if self.reserved >= 2 {
            &self.colors[1]
        } else {
            BANK_EXPENSE_COLOR
        }
    }
}

/// Extracts colors from a shareable palette URL. The last path segment is a
/// dash-separated list of 6-hex-digit codes; query and fragment are stripped
/// and segments that are not exactly six hex digits are dropped.
pub fn parse_palette_url(url: &str) -> Vec<String> {
    let without_suffix = url
        .split(|c| c == '?' || c == '#')
        .next()
        .unwrap_or_default();
    let segment = without_suffix
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    segment
        .split('-')
        .filter(|code| code.len() == 6 && code.chars().all(|c| c.is_ascii_hexdigit()))
        .map(|code| format!("#{}", code.to_ascii_lowercase()))
        .collect()
}

/// Installs a custom palette and redistributes colors across existing items
/// and categories. Redistribution walks one shared cursor over additional
/// incomes, income categories, additional expenses, and expense categories in
/// creation order, so repeated application yields identical colors per
/// position.
pub fn apply_custom_colors(workbook: &mut Workbook, colors: Vec<String>, source_url: Option<String>) {
    workbook.custom_colors = colors;
    workbook.color_palette_url = source_url;
    redistribute(workbook);
    workbook.touch();
}

/// Reassigns every entity's color from the active palette by position.
pub fn redistribute(workbook: &mut Workbook) {
    let palette = Palette::active(workbook);
    if palette.is_empty() {
        return;
    }
    let mut cursor = 0usize;
    for item in &mut workbook.additional_incomes {
        item.color = palette.allocate(cursor).to_string();
        cursor += 1;
    }
    for category in workbook
        .categories
        .iter_mut()
        .filter(|category| category.kind == CategoryKind::Income)
    {
        category.color = palette.allocate(cursor).to_string();
        cursor += 1;
    }
    for item in &mut workbook.additional_expenses {
        item.color = palette.allocate(cursor).to_string();
        cursor += 1;
    }
    for category in workbook
        .categories
        .iter_mut()
        .filter(|category| category.kind == CategoryKind::Expense)
    {
        category.color = palette.allocate(cursor).to_string();
        cursor += 1;
    }
}
