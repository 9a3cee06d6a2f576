//! User settings for fintrack
//!
//! Manages user preferences: currency and locale display formatting,
//! appearance, budget-goal matching and recurring-transaction processing.

use serde::{Deserialize, Serialize};

use super::paths::FinancePaths;
use crate::error::FinanceError;
use crate::models::{GoalMatching, MoneyFormat, SymbolPosition};
use crate::storage::file_io::{read_json, write_json_atomic};
use crate::storage::DEFAULT_CHUNK_SIZE;

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the host preference
    #[default]
    System,
}

/// Appearance settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Appearance {
    #[serde(default)]
    pub theme: Theme,

    /// Accent color as a `#rrggbb` hex string
    #[serde(default = "default_accent_color")]
    pub accent_color: String,
}

impl Default for Appearance {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            accent_color: default_accent_color(),
        }
    }
}

/// Currency settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencySettings {
    /// ISO 4217 code, upper-case
    pub code: String,
    /// Display symbol
    pub symbol: String,
}

impl Default for CurrencySettings {
    fn default() -> Self {
        Self::for_code("USD")
    }
}

impl CurrencySettings {
    /// Build currency settings for an ISO code, picking a known symbol when possible
    pub fn for_code(code: &str) -> Self {
        let code = code.trim().to_uppercase();
        let symbol = match code.as_str() {
            "USD" | "CAD" | "AUD" | "NZD" | "MXN" => "$",
            "EUR" => "€",
            "GBP" => "£",
            "JPY" | "CNY" => "¥",
            "INR" => "₹",
            "KRW" => "₩",
            "BRL" => "R$",
            "CHF" => "CHF ",
            _ => "",
        };
        let symbol = if symbol.is_empty() {
            format!("{} ", code)
        } else {
            symbol.to_string()
        };
        Self { code, symbol }
    }
}

/// Locale-dependent number formatting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocaleSettings {
    pub language_tag: String,
    pub decimal_separator: char,
    pub grouping_separator: char,
    #[serde(default)]
    pub symbol_position: SymbolPosition,
}

impl Default for LocaleSettings {
    fn default() -> Self {
        Self::for_tag("en-US")
    }
}

impl LocaleSettings {
    /// Formatting conventions for a BCP 47 language tag.
    ///
    /// Unknown tags fall back to en-US separators but keep the requested tag.
    pub fn for_tag(tag: &str) -> Self {
        let tag = tag.trim().to_string();
        let (decimal, grouping, position) = match tag.as_str() {
            "de-DE" | "es-ES" | "it-IT" | "nl-NL" | "pt-BR" | "id-ID" => {
                (',', '.', SymbolPosition::After)
            }
            "fr-FR" | "pl-PL" | "sv-SE" | "nb-NO" => (',', ' ', SymbolPosition::After),
            "de-CH" => ('.', '\'', SymbolPosition::Before),
            _ => ('.', ',', SymbolPosition::Before),
        };
        Self {
            language_tag: tag,
            decimal_separator: decimal,
            grouping_separator: grouping,
            symbol_position: position,
        }
    }
}

/// Persistence tuning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageSettings {
    /// Values longer than this many bytes are split into chunks
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
        }
    }
}

/// User settings for fintrack
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    #[serde(default)]
    pub currency: CurrencySettings,

    #[serde(default)]
    pub locale: LocaleSettings,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    #[serde(default)]
    pub appearance: Appearance,

    /// How expense categories are matched against budget goals
    #[serde(default)]
    pub goal_matching: GoalMatching,

    /// Process due recurring transactions whenever the CLI starts
    #[serde(default)]
    pub auto_process_recurring: bool,

    #[serde(default)]
    pub storage: StorageSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_date_format() -> String {
    "%Y-%m-%d".to_string()
}

fn default_accent_color() -> String {
    "#4f46e5".to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency: CurrencySettings::default(),
            locale: LocaleSettings::default(),
            date_format: default_date_format(),
            appearance: Appearance::default(),
            goal_matching: GoalMatching::default(),
            auto_process_recurring: false,
            storage: StorageSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    ///
    /// Defaults are not written back; the caller decides when to persist.
    pub fn load_or_create(paths: &FinancePaths) -> Result<Self, FinanceError> {
        read_json(paths.settings_file()).map_err(|e| match e {
            FinanceError::Storage(msg) => FinanceError::Config(msg),
            other => other,
        })
    }

    /// Save settings to disk
    pub fn save(&self, paths: &FinancePaths) -> Result<(), FinanceError> {
        paths.ensure_directories()?;
        write_json_atomic(paths.settings_file(), self)
    }

    /// Money formatting derived from the currency and locale settings
    pub fn money_format(&self) -> MoneyFormat {
        MoneyFormat {
            symbol: self.currency.symbol.clone(),
            decimal_separator: self.locale.decimal_separator,
            grouping_separator: Some(self.locale.grouping_separator),
            symbol_position: self.locale.symbol_position,
        }
    }

    /// Apply a `key=value` style update coming from the command line
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), FinanceError> {
        match key {
            "currency" => self.currency = CurrencySettings::for_code(value),
            "currency.symbol" => self.currency.symbol = value.to_string(),
            "locale" => self.locale = LocaleSettings::for_tag(value),
            "date-format" => {
                if value.trim().is_empty() {
                    return Err(FinanceError::Validation("Date format cannot be empty".into()));
                }
                self.date_format = value.to_string();
            }
            "theme" => {
                self.appearance.theme = match value.to_lowercase().as_str() {
                    "light" => Theme::Light,
                    "dark" => Theme::Dark,
                    "system" => Theme::System,
                    other => {
                        return Err(FinanceError::Validation(format!(
                            "Unknown theme '{}'. Use light, dark or system",
                            other
                        )))
                    }
                }
            }
            "accent-color" => {
                let valid = value.len() == 7
                    && value.starts_with('#')
                    && value[1..].chars().all(|c| c.is_ascii_hexdigit());
                if !valid {
                    return Err(FinanceError::Validation(format!(
                        "Accent color must look like #rrggbb, got '{}'",
                        value
                    )));
                }
                self.appearance.accent_color = value.to_lowercase();
            }
            "goal-matching" => self.goal_matching = value.parse()?,
            "auto-process-recurring" => {
                self.auto_process_recurring = value.parse().map_err(|_| {
                    FinanceError::Validation(format!("Expected true or false, got '{}'", value))
                })?;
            }
            "chunk-size" => {
                let size: usize = value.parse().map_err(|_| {
                    FinanceError::Validation(format!("Invalid chunk size '{}'", value))
                })?;
                if size < 16 {
                    return Err(FinanceError::Validation(
                        "Chunk size must be at least 16 bytes".into(),
                    ));
                }
                self.storage.chunk_size = size;
            }
            other => {
                return Err(FinanceError::Config(format!("Unknown setting '{}'", other)));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.currency.code, "USD");
        assert_eq!(settings.currency.symbol, "$");
        assert_eq!(settings.locale.language_tag, "en-US");
        assert_eq!(settings.appearance.theme, Theme::System);
        assert_eq!(settings.goal_matching, GoalMatching::Convention);
        assert!(!settings.auto_process_recurring);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.set_value("currency", "eur").unwrap();
        settings.set_value("theme", "dark").unwrap();
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency.code, "EUR");
        assert_eq!(loaded.currency.symbol, "€");
        assert_eq!(loaded.appearance.theme, Theme::Dark);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FinancePaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"autoProcessRecurring": true}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert!(loaded.auto_process_recurring);
        assert_eq!(loaded.storage.chunk_size, DEFAULT_CHUNK_SIZE);
    }

    #[test]
    fn test_locale_money_format() {
        let mut settings = Settings::default();
        settings.set_value("currency", "EUR").unwrap();
        settings.set_value("locale", "de-DE").unwrap();

        let formatted = Money::from_cents(123_456).format(&settings.money_format());
        assert_eq!(formatted, "1.234,56 €");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut settings = Settings::default();
        assert!(settings.set_value("theme", "neon").is_err());
        assert!(settings.set_value("accent-color", "blue").is_err());
        assert!(settings.set_value("chunk-size", "4").is_err());
        assert!(settings.set_value("nonsense", "1").is_err());
        assert!(settings.set_value("accent-color", "#AABBCC").is_ok());
        assert_eq!(settings.appearance.accent_color, "#aabbcc");
    }
}
