use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::error::ScanError;
use crate::models::Category;

/// Root configuration structure, deserialized from `.shelf-scan/config.toml`.
///
/// Every section is optional; a missing section or field takes its default.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub columns: ColumnConfig,
    pub scoring: ScoringConfig,
    pub quality: QualityConfig,
    pub output: OutputConfig,
    /// Extra keywords appended to the built-in set of each category.
    /// Priority order between categories is not configurable.
    /// Keys are category labels as displayed, e.g. `"Health & Beauty"`.
    pub keywords: HashMap<String, Vec<String>>,
}

impl Config {
    /// Resolve the `[keywords]` table into categories, rejecting unknown labels.
    pub fn extra_keywords(&self) -> std::result::Result<Vec<(Category, Vec<String>)>, ScanError> {
        let mut extra = Vec::with_capacity(self.keywords.len());
        for (label, words) in &self.keywords {
            let category = Category::from_label(label)
                .ok_or_else(|| ScanError::UnknownCategory(label.clone()))?;
            extra.push((category, words.clone()));
        }
        Ok(extra)
    }
}

/// How the raw bytes are decoded and split into fields.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// WHATWG encoding label, e.g. `windows-1252`, `latin1`, `utf-8`.
    pub encoding: String,
    pub delimiter: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            encoding: "windows-1252".to_string(),
            delimiter: ",".to_string(),
        }
    }
}

impl InputConfig {
    pub fn delimiter_byte(&self) -> std::result::Result<u8, ScanError> {
        match self.delimiter.as_bytes() {
            [b] if b.is_ascii() => Ok(*b),
            _ => Err(ScanError::InvalidDelimiter(self.delimiter.clone())),
        }
    }
}

/// Header names of the five required columns.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ColumnConfig {
    pub id: String,
    pub name: String,
    pub price: String,
    pub reviews: String,
    pub rating: String,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        ColumnConfig {
            id: "id".to_string(),
            name: "product_name".to_string(),
            price: "price".to_string(),
            reviews: "reviews_count".to_string(),
            rating: "avg_rate".to_string(),
        }
    }
}

/// Weights of the engagement score.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct ScoringConfig {
    pub reviews_weight: f64,
    pub rating_weight: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringConfig {
            reviews_weight: 0.6,
            rating_weight: 0.4,
        }
    }
}

/// Thresholds for the price data-quality signal.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct QualityConfig {
    /// Tukey fence multiplier: outliers lie beyond `q1 - k*IQR` / `q3 + k*IQR`.
    pub iqr_factor: f64,
    /// A category whose outlier share exceeds this gets a data-quality notice.
    pub outlier_share_warn: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        QualityConfig {
            iqr_factor: 1.5,
            outlier_share_warn: 0.10,
        }
    }
}

/// Which artifacts are written to the output directory besides the
/// category table, which is always written.
#[derive(Debug, Deserialize, Clone, Copy)]
#[serde(default)]
pub struct OutputConfig {
    pub charts: bool,
    /// Requires `charts`; the PDF embeds the rendered PNGs.
    pub pdf: bool,
    pub cleaned_csv: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            charts: true,
            pdf: true,
            cleaned_csv: true,
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override`, the path passed via `--config`
/// 2. `<input_dir>/.shelf-scan/config.toml`
/// 3. `~/.config/shelf-scan/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(input_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = input_dir.join(".shelf-scan").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("shelf-scan").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = toml::from_str(&content)
        .with_context(|| format!("Invalid config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}
