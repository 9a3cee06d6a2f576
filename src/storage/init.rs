//! Storage initialization
//!
//! Handles first-run setup and default data creation

use tracing::info;

use crate::config::paths::FinancePaths;
use crate::config::settings::Settings;
use crate::error::FinanceError;
use crate::models::Category;

use super::{keys, Storage};

/// Initialize storage for a fresh installation.
///
/// Writes default settings if none exist and seeds the default categories
/// when the category collection has never been stored. Safe to run again.
pub fn initialize_storage(paths: &FinancePaths) -> Result<Storage, FinanceError> {
    paths.ensure_directories()?;

    let settings = Settings::load_or_create(paths)?;
    if !paths.settings_file().exists() {
        settings.save(paths)?;
    }

    let storage = Storage::open(paths, settings.storage.chunk_size)?;
    seed_default_categories(&storage)?;
    Ok(storage)
}

/// Add the default categories if none have ever been persisted.
///
/// Returns whether anything was seeded.
pub fn seed_default_categories(storage: &Storage) -> Result<bool, FinanceError> {
    let stored = storage.categories.records().read_raw()?;
    if stored.is_some() || storage.categories.count()? > 0 {
        return Ok(false);
    }

    let defaults = Category::defaults();
    let count = defaults.len();
    storage.categories.replace_all(defaults)?;
    storage.persist(keys::CATEGORIES);
    info!(count, "Seeded default categories");
    Ok(true)
}
