//! drillbook configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::statistics::DEFAULT_BAR_WIDTH;

/// Top-level drillbook configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrillbookConfig {
    /// Catalog text file.
    #[serde(default = "default_catalog")]
    pub catalog: PathBuf,
    /// Progress save file.
    #[serde(default = "default_save_file")]
    pub save_file: PathBuf,
    /// Directory holding question pictures (`q<identifier>.png`).
    #[serde(default = "default_assets_dir")]
    pub assets_dir: PathBuf,
    /// Command used to display pictures; the picture path is appended.
    #[serde(default)]
    pub image_viewer: Option<String>,

    /// Write the XML questionnaire.
    #[serde(default)]
    pub export_markup: bool,
    #[serde(default = "default_markup_path")]
    pub markup_path: PathBuf,
    /// Write the XLSX workbook.
    #[serde(default)]
    pub export_table: bool,
    #[serde(default = "default_table_path")]
    pub table_path: PathBuf,
    /// Write randomized plain-text practice sheets.
    #[serde(default)]
    pub export_randomized: bool,
    #[serde(default = "default_randomized_dir")]
    pub randomized_dir: PathBuf,
    #[serde(default = "default_randomized_sheets")]
    pub randomized_sheets: usize,

    /// Run the interactive quiz.
    #[serde(default = "default_true")]
    pub run_quiz: bool,
    /// Leave out every topic whose name contains "Regional".
    #[serde(default = "default_true")]
    pub filter_regional_topics: bool,
    /// Topics to leave out by exact name.
    #[serde(default)]
    pub excluded_topics: Vec<String>,

    /// Width of the level histogram bars.
    #[serde(default = "default_statistic_width")]
    pub statistic_width: usize,
}

fn default_catalog() -> PathBuf {
    PathBuf::from("data/catalog.txt")
}
fn default_save_file() -> PathBuf {
    PathBuf::from("quiz_save.cfg")
}
fn default_assets_dir() -> PathBuf {
    PathBuf::from("assets")
}
fn default_markup_path() -> PathBuf {
    PathBuf::from("export/questionnaire.xml")
}
fn default_table_path() -> PathBuf {
    PathBuf::from("export/questions.xlsx")
}
fn default_randomized_dir() -> PathBuf {
    PathBuf::from("export")
}
fn default_randomized_sheets() -> usize {
    5
}
fn default_true() -> bool {
    true
}
fn default_statistic_width() -> usize {
    DEFAULT_BAR_WIDTH
}

impl Default for DrillbookConfig {
    fn default() -> Self {
        Self {
            catalog: default_catalog(),
            save_file: default_save_file(),
            assets_dir: default_assets_dir(),
            image_viewer: None,
            export_markup: false,
            markup_path: default_markup_path(),
            export_table: false,
            table_path: default_table_path(),
            export_randomized: false,
            randomized_dir: default_randomized_dir(),
            randomized_sheets: default_randomized_sheets(),
            run_quiz: true,
            filter_regional_topics: true,
            excluded_topics: Vec::new(),
            statistic_width: default_statistic_width(),
        }
    }
}

impl DrillbookConfig {
    /// Parse a TOML document.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config")
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `drillbook.toml` in the current directory
/// 2. `~/.config/drillbook/config.toml`
///
/// Environment variable overrides: `DRILLBOOK_CATALOG`, `DRILLBOOK_SAVE_FILE`.
pub fn load_config() -> Result<DrillbookConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<DrillbookConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("drillbook.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            tracing::debug!("reading config from {}", path.display());
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<DrillbookConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => DrillbookConfig::default(),
    };

    if let Ok(catalog) = std::env::var("DRILLBOOK_CATALOG") {
        config.catalog = PathBuf::from(catalog);
    }
    if let Ok(save_file) = std::env::var("DRILLBOOK_SAVE_FILE") {
        config.save_file = PathBuf::from(save_file);
    }

    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("drillbook"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = DrillbookConfig::default();
        assert_eq!(config.save_file, PathBuf::from("quiz_save.cfg"));
        assert!(config.run_quiz);
        assert!(config.filter_regional_topics);
        assert!(!config.export_markup);
        assert_eq!(config.randomized_sheets, 5);
        assert_eq!(config.statistic_width, 50);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config = DrillbookConfig::from_toml("").unwrap();
        assert_eq!(config, DrillbookConfig::default());
    }

    #[test]
    fn parse_toggles() {
        let toml_str = r#"
catalog = "data/fragen.txt"
export_markup = true
export_table = true
run_quiz = false
filter_regional_topics = false
excluded_topics = ["Besonderheiten See", "Besonderheiten Binnen"]
image_viewer = "feh --scale-down"
"#;
        let config = DrillbookConfig::from_toml(toml_str).unwrap();
        assert_eq!(config.catalog, PathBuf::from("data/fragen.txt"));
        assert!(config.export_markup);
        assert!(config.export_table);
        assert!(!config.run_quiz);
        assert!(!config.filter_regional_topics);
        assert_eq!(config.excluded_topics.len(), 2);
        assert_eq!(config.image_viewer.as_deref(), Some("feh --scale-down"));
    }

    #[test]
    fn unknown_value_type_fails() {
        assert!(DrillbookConfig::from_toml("run_quiz = \"maybe\"").is_err());
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("no-such-drillbook.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "statistic_width = 20\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.statistic_width, 20);
    }
}
