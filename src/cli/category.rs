//! Category CLI commands

use clap::Subcommand;

use crate::display::format_category_table;
use crate::error::FinanceResult;
use crate::models::{CategoryType, TransactionType};
use crate::services::{CategoryService, CategoryUpdate};
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Add {
        /// Category name
        name: String,
        /// Emoji shown next to the name
        #[arg(short, long)]
        emoji: Option<String>,
        /// income, expense or both
        #[arg(short = 't', long = "type", default_value = "expense")]
        kind: CategoryType,
    },

    /// List categories
    List {
        /// Only categories usable for income or for expenses
        #[arg(short = 't', long = "for")]
        for_kind: Option<TransactionType>,
    },

    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New emoji
        #[arg(short, long)]
        emoji: Option<String>,
        /// New type
        #[arg(short = 't', long = "type")]
        kind: Option<CategoryType>,
    },

    /// Delete a category (transactions keep their category name)
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> FinanceResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Add { name, emoji, kind } => {
            let category = service.create(&name, emoji.as_deref(), kind)?;
            println!("Created category: {}", category);
            println!("  Type: {}", category.kind);
            println!("  ID: {}", category.id);
        }

        CategoryCommands::List { for_kind } => {
            let categories = match for_kind {
                Some(kind) => service.list_for(kind)?,
                None => service.list()?,
            };
            print!("{}", format_category_table(&categories));
        }

        CategoryCommands::Edit {
            category,
            name,
            emoji,
            kind,
        } => {
            if name.is_none() && emoji.is_none() && kind.is_none() {
                println!("No changes specified. Use --name, --emoji, or --type.");
                return Ok(());
            }

            let updated = service.update(&category, CategoryUpdate { name, emoji, kind })?;
            println!("Updated category: {}", updated);
        }

        CategoryCommands::Delete { category } => {
            let deleted = service.delete(&category)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
