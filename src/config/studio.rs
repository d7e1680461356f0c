//! Studio configuration loading from studio.toml
//!
//! The configuration seeds recurring blueprints on first run and carries the
//! tunables of the revenue cache and the optional add-ons. Blueprint fields are
//! kept loosely typed here so that one malformed entry can be skipped with a
//! warning instead of rejecting the whole file.

use crate::{
    core::recurring::NewBlueprint,
    entities::{AmountKind, EntryCategory, EntryKind},
    errors::{Error, Result},
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::Path;

/// Default quiet period before a burst of changes triggers a recalculation
pub const DEFAULT_RECALC_DEBOUNCE_MS: u64 = 500;

/// Configuration structure representing the entire studio.toml file
#[derive(Debug, Default, Deserialize)]
pub struct StudioConfig {
    /// Recurring blueprints to seed
    #[serde(default)]
    pub blueprints: Vec<BlueprintConfig>,
    /// Revenue cache settings
    #[serde(default)]
    pub revenue: RevenueConfig,
    /// Optional feature add-ons
    #[serde(default)]
    pub addons: AddonsConfig,
}

/// Configuration for a single recurring blueprint
#[derive(Debug, Deserialize, Clone)]
pub struct BlueprintConfig {
    /// Item reference shown on generated entries
    pub description: String,
    /// `"income"` or `"expense"`
    #[serde(default = "default_kind")]
    pub kind: String,
    /// Ledger category label (e.g., `"software"`)
    pub category: String,
    /// Amount per occurrence, required for fixed blueprints
    pub amount: Option<f64>,
    /// `"fixed"` or `"variable"`
    #[serde(default = "default_amount_kind")]
    pub amount_kind: String,
    /// First occurrence as `YYYY-MM-DD`
    pub first_date: String,
    /// Optional last occurrence as `YYYY-MM-DD`
    pub end_date: Option<String>,
    /// Optional note copied onto generated entries
    pub note: Option<String>,
}

/// Revenue cache settings
#[derive(Debug, Deserialize, Clone)]
pub struct RevenueConfig {
    /// Quiet period in milliseconds before a recalculation runs
    #[serde(default = "default_debounce_ms")]
    pub recalc_debounce_ms: u64,
}

impl Default for RevenueConfig {
    fn default() -> Self {
        Self {
            recalc_debounce_ms: DEFAULT_RECALC_DEBOUNCE_MS,
        }
    }
}

/// Feature add-ons that provision extra workflow stages
#[derive(Debug, Default, Deserialize, Clone)]
pub struct AddonsConfig {
    /// Gallery proofing add-on ("Proofs sent" / "Awaiting selection")
    #[serde(default)]
    pub gallery_proofing: bool,
}

fn default_kind() -> String {
    "expense".to_string()
}

fn default_amount_kind() -> String {
    "fixed".to_string()
}

const fn default_debounce_ms() -> u64 {
    DEFAULT_RECALC_DEBOUNCE_MS
}

fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| Error::invalid_input(field, format!("'{raw}' is not a YYYY-MM-DD date: {e}")))
}

impl BlueprintConfig {
    /// Validates the loosely typed fields and builds a [`NewBlueprint`].
    ///
    /// # Errors
    /// Returns `Error::InvalidInput` for unknown labels or unparseable dates.
    pub fn to_new_blueprint(&self) -> Result<NewBlueprint> {
        Ok(NewBlueprint {
            description: self.description.clone(),
            kind: self.kind.parse::<EntryKind>()?,
            category: self.category.parse::<EntryCategory>()?,
            amount: self.amount,
            amount_kind: self.amount_kind.parse::<AmountKind>()?,
            first_date: parse_date("first_date", &self.first_date)?,
            end_date: self
                .end_date
                .as_deref()
                .map(|raw| parse_date("end_date", raw))
                .transpose()?,
            note: self.note.clone(),
        })
    }
}

/// Loads studio configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read (`Error::Io`)
/// - The TOML syntax is invalid
/// - Required fields are missing
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<StudioConfig> {
    let contents = std::fs::read_to_string(path.as_ref())?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse studio config: {e}"),
    })
}

/// Loads the file named by `STUDIO_CONFIG`, or `./studio.toml`.
///
/// A missing file is not an error: the studio simply starts with defaults.
pub fn load_default_config() -> Result<StudioConfig> {
    let path = std::env::var("STUDIO_CONFIG").unwrap_or_else(|_| "studio.toml".to_string());
    if !Path::new(&path).exists() {
        tracing::info!("No studio config at {path}, using defaults.");
        return Ok(StudioConfig::default());
    }
    load_config(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_studio_config() {
        let toml_str = r#"
            [[blueprints]]
            description = "Lightroom subscription"
            category = "software"
            amount = 52.0
            first_date = "2025-07-15"

            [[blueprints]]
            description = "Studio electricity"
            category = "studio"
            amount_kind = "variable"
            first_date = "2025-01-10"
            note = "read the meter"

            [revenue]
            recalc_debounce_ms = 250

            [addons]
            gallery_proofing = true
        "#;

        let config: StudioConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.blueprints.len(), 2);
        assert_eq!(config.revenue.recalc_debounce_ms, 250);
        assert!(config.addons.gallery_proofing);

        let first = config.blueprints[0].to_new_blueprint().unwrap();
        assert_eq!(first.kind, EntryKind::Expense);
        assert_eq!(first.amount_kind, AmountKind::Fixed);
        assert_eq!(first.amount, Some(52.0));
        assert_eq!(first.first_date, NaiveDate::from_ymd_opt(2025, 7, 15).unwrap());

        let second = config.blueprints[1].to_new_blueprint().unwrap();
        assert_eq!(second.amount_kind, AmountKind::Variable);
        assert_eq!(second.amount, None);
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: StudioConfig = toml::from_str("").unwrap();
        assert!(config.blueprints.is_empty());
        assert_eq!(config.revenue.recalc_debounce_ms, DEFAULT_RECALC_DEBOUNCE_MS);
        assert!(!config.addons.gallery_proofing);
    }

    #[test]
    fn test_invalid_date_is_reported() {
        let blueprint = BlueprintConfig {
            description: "Broken".to_string(),
            kind: "expense".to_string(),
            category: "other".to_string(),
            amount: Some(10.0),
            amount_kind: "fixed".to_string(),
            first_date: "2025-02-30".to_string(),
            end_date: None,
            note: None,
        };
        let err = blueprint.to_new_blueprint().unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "first_date"));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let result = load_config("no/such/dir/studio.toml");
        assert!(matches!(result, Err(Error::Io(_))));
    }

    #[test]
    fn test_bad_toml_is_a_config_error() {
        let path = std::env::temp_dir()
            .join(format!("studio-ledger-bad-{}.toml", std::process::id()));
        std::fs::write(&path, "[[blueprints]\ndescription = ").unwrap();
        let result = load_config(&path);
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
