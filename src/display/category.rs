//! Category display formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::short_id;
use crate::models::Category;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "")]
    emoji: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    kind: String,
}

/// Format categories as a table
pub fn format_category_table(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'fintrack init' to create default categories.\n"
            .to_string();
    }

    let rows = categories.iter().map(|c| CategoryRow {
        id: short_id(&c.id),
        emoji: c.emoji.clone(),
        name: c.name.clone(),
        kind: c.kind.to_string(),
    });
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n", table)
}
