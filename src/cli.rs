//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{ChartKind, GenderChartStyle};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest selectable number of top castes.
pub const MIN_TOP_CASTES: usize = 5;

/// Largest selectable number of top castes.
pub const MAX_TOP_CASTES: usize = 50;

/// Demodash - demographic dashboards from spreadsheets
///
/// Upload an Excel (or CSV) file extracted from OCR data and get an age group
/// pie chart, a gender breakdown and the composition of the most frequent
/// castes by gender.
///
/// Examples:
///   demodash --input rupandehi-3.xlsx
///   demodash --input ward.xlsx --charts gender,caste --gender-chart bar
///   demodash --input ward.csv --top-castes 20 --format json -o ward.json
///   demodash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Spreadsheet to visualize (xlsx, xlsm, xls, xlsb, ods or csv)
    ///
    /// Must contain age, gender and caste columns.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Worksheet to read, by name or 0-based index
    ///
    /// If not specified, the first worksheet is used
    #[arg(long, value_name = "SHEET")]
    pub sheet: Option<String>,

    /// Output file path for the dashboard
    ///
    /// Defaults to dashboard.html, dashboard.json or dashboard.md
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (html, json, markdown)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Charts to show (comma-separated)
    ///
    /// Example: --charts age,caste
    #[arg(long, value_name = "CHARTS", value_delimiter = ',')]
    pub charts: Option<Vec<ChartKind>>,

    /// Gender chart type (pie, bar)
    #[arg(long, value_name = "STYLE")]
    pub gender_chart: Option<GenderChartStyle>,

    /// Number of top castes in the caste chart (5-50)
    #[arg(long, value_name = "COUNT")]
    pub top_castes: Option<usize>,

    /// Name of the age column
    #[arg(long, value_name = "NAME")]
    pub age_column: Option<String>,

    /// Name of the gender column
    #[arg(long, value_name = "NAME")]
    pub gender_column: Option<String>,

    /// Name of the caste column
    #[arg(long, value_name = "NAME")]
    pub caste_column: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .demodash.toml in the current directory
    #[arg(short, long, value_name = "FILE", env = "DEMODASH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .demodash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Self-contained HTML page (default)
    #[default]
    Html,
    /// JSON chart specifications
    Json,
    /// Markdown tables
    Markdown,
}

impl OutputFormat {
    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Html => "html",
            OutputFormat::Json => "json",
            OutputFormat::Markdown => "md",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(top) = self.top_castes {
            if !(MIN_TOP_CASTES..=MAX_TOP_CASTES).contains(&top) {
                return Err(format!(
                    "Top castes must be between {} and {}",
                    MIN_TOP_CASTES, MAX_TOP_CASTES
                ));
            }
        }

        if let Some(ref charts) = self.charts {
            if charts.is_empty() {
                return Err("At least one chart must be selected".to_string());
            }
        }

        for (flag, value) in [
            ("--age-column", &self.age_column),
            ("--gender-column", &self.gender_column),
            ("--caste-column", &self.caste_column),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(format!("{} must not be empty", flag));
            }
        }

        // Validate input file if provided
        if let Some(ref input) = self.input {
            if !input.exists() {
                return Err(format!("Input file does not exist: {}", input.display()));
            }
            if !input.is_file() {
                return Err(format!("Input path is not a file: {}", input.display()));
            }
        }

        Ok(())
    }
}
