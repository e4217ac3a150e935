//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.demodash.toml` files.

use crate::cli::{OutputFormat, MAX_TOP_CASTES, MIN_TOP_CASTES};
use crate::locale;
use crate::models::GenderChartStyle;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".demodash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input settings.
    #[serde(default)]
    pub input: InputConfig,

    /// Spreadsheet column names.
    #[serde(default)]
    pub columns: ColumnsConfig,

    /// Chart settings.
    #[serde(default)]
    pub charts: ChartsConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path. Defaults to `dashboard.<ext>` for the chosen format.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,

    /// Default output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Log at debug level unless `--quiet` is given.
    #[serde(default)]
    pub verbose: bool,
}

/// Input settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InputConfig {
    /// Worksheet name or 0-based index. First sheet when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
}

/// Names of the spreadsheet columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnsConfig {
    #[serde(default = "default_age_column")]
    pub age: String,

    #[serde(default = "default_gender_column")]
    pub gender: String,

    #[serde(default = "default_caste_column")]
    pub caste: String,
}

impl Default for ColumnsConfig {
    fn default() -> Self {
        Self {
            age: default_age_column(),
            gender: default_gender_column(),
            caste: default_caste_column(),
        }
    }
}

fn default_age_column() -> String {
    locale::AGE_COLUMN.to_string()
}

fn default_gender_column() -> String {
    locale::GENDER_COLUMN.to_string()
}

fn default_caste_column() -> String {
    locale::CASTE_COLUMN.to_string()
}

/// Chart toggles and parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartsConfig {
    /// Show the age group pie chart.
    #[serde(default = "default_true")]
    pub show_age: bool,

    /// Show the gender chart.
    #[serde(default = "default_true")]
    pub show_gender: bool,

    /// Show the castes-by-gender chart.
    #[serde(default = "default_true")]
    pub show_caste: bool,

    /// Gender chart style.
    #[serde(default)]
    pub gender_style: GenderChartStyle,

    /// Number of most frequent castes in the caste chart (5-50).
    #[serde(default = "default_top_castes")]
    pub top_castes: usize,
}

impl Default for ChartsConfig {
    fn default() -> Self {
        Self {
            show_age: true,
            show_gender: true,
            show_caste: true,
            gender_style: GenderChartStyle::default(),
            top_castes: default_top_castes(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_top_castes() -> usize {
    10
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        Self::load_from_dir(Path::new("."))
    }

    /// Try to load `.demodash.toml` from a directory.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = Some(output.display().to_string());
        }
        if let Some(format) = args.format {
            self.general.format = format;
        }
        if args.verbose {
            self.general.verbose = true;
        }

        if let Some(ref sheet) = args.sheet {
            self.input.sheet = Some(sheet.clone());
        }

        if let Some(ref age) = args.age_column {
            self.columns.age = age.clone();
        }
        if let Some(ref gender) = args.gender_column {
            self.columns.gender = gender.clone();
        }
        if let Some(ref caste) = args.caste_column {
            self.columns.caste = caste.clone();
        }

        // An explicit chart list replaces all three toggles
        if let Some(ref charts) = args.charts {
            self.charts.show_age = charts.contains(&crate::models::ChartKind::Age);
            self.charts.show_gender = charts.contains(&crate::models::ChartKind::Gender);
            self.charts.show_caste = charts.contains(&crate::models::ChartKind::Caste);
        }
        if let Some(style) = args.gender_chart {
            self.charts.gender_style = style;
        }
        if let Some(top) = args.top_castes {
            self.charts.top_castes = top;
        }
    }

    /// Check values that the file may set out of range.
    pub fn validate(&self) -> Result<()> {
        let top = self.charts.top_castes;
        if !(MIN_TOP_CASTES..=MAX_TOP_CASTES).contains(&top) {
            bail!(
                "charts.top_castes must be between {} and {} (got {})",
                MIN_TOP_CASTES,
                MAX_TOP_CASTES,
                top
            );
        }

        for (key, value) in [
            ("columns.age", &self.columns.age),
            ("columns.gender", &self.columns.gender),
            ("columns.caste", &self.columns.caste),
        ] {
            if value.trim().is_empty() {
                bail!("{} must not be empty", key);
            }
        }

        Ok(())
    }

    /// Log level: `--quiet` wins over `verbose` from the file or `--verbose`.
    pub fn log_level(&self, quiet: bool) -> tracing::Level {
        if quiet {
            tracing::Level::ERROR
        } else if self.general.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Output path: the configured one, or `dashboard.<ext>` for the format.
    pub fn output_path(&self) -> PathBuf {
        match self.general.output {
            Some(ref output) => PathBuf::from(output),
            None => PathBuf::from(format!("dashboard.{}", self.general.format.extension())),
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
