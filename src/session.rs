//! Per-session dashboard state.
//!
//! A [`Session`] owns the records loaded from one spreadsheet. Every change of
//! [`Controls`] is a fresh [`Session::render`] pass over the same records.

use crate::analysis;
use crate::config::ChartsConfig;
use crate::ingest::{self, IngestOptions};
use crate::models::{
    CategoryCounts, ChartKind, CrossTab, DashboardMetadata, GenderChartStyle, Record, Share,
};
use crate::report::charts::{self, ChartSpec};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// User-facing chart controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Controls {
    pub show_age: bool,
    pub show_gender: bool,
    pub show_caste: bool,
    pub gender_style: GenderChartStyle,
    pub top_castes: usize,
}

impl Default for Controls {
    fn default() -> Self {
        Self::from(&ChartsConfig::default())
    }
}

impl From<&ChartsConfig> for Controls {
    fn from(config: &ChartsConfig) -> Self {
        Self {
            show_age: config.show_age,
            show_gender: config.show_gender,
            show_caste: config.show_caste,
            gender_style: config.gender_style,
            top_castes: config.top_castes,
        }
    }
}

impl Controls {
    /// Charts switched on, in dashboard order.
    pub fn enabled(&self) -> Vec<ChartKind> {
        [
            (ChartKind::Age, self.show_age),
            (ChartKind::Gender, self.show_gender),
            (ChartKind::Caste, self.show_caste),
        ]
        .into_iter()
        .filter_map(|(kind, on)| on.then_some(kind))
        .collect()
    }
}

/// Gender counts with their percentage shares.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenderBreakdown {
    pub style: GenderChartStyle,
    pub counts: CategoryCounts,
    /// `None` when no record has a gender.
    pub shares: Option<Vec<Share>>,
}

/// Castes by gender for the most frequent castes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CasteBreakdown {
    pub top_n: usize,
    pub table: CrossTab,
}

/// Everything one render pass produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<CategoryCounts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gender: Option<GenderBreakdown>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caste: Option<CasteBreakdown>,
    /// Chart specifications in dashboard order.
    pub charts: Vec<ChartSpec>,
}

/// Records loaded from one spreadsheet.
#[derive(Debug, Clone)]
pub struct Session {
    source: PathBuf,
    sheet: Option<String>,
    records: Vec<Record>,
}

impl Session {
    /// Load a spreadsheet into a new session.
    pub fn load(path: &Path, options: &IngestOptions) -> Result<Self> {
        let (records, sheet) = ingest::load_records(path, options)
            .with_context(|| format!("Failed to load {}", path.display()))?;
        info!("Loaded {} records from {}", records.len(), path.display());

        Ok(Self {
            source: path.to_path_buf(),
            sheet,
            records,
        })
    }

    /// Session over records that are already in memory.
    pub fn from_records(source: impl Into<PathBuf>, records: Vec<Record>) -> Self {
        Self {
            source: source.into(),
            sheet: None,
            records,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Run the aggregation pipeline for the given controls.
    pub fn render(&self, controls: &Controls) -> Dashboard {
        debug!("Rendering dashboard with {:?}", controls);

        let mut specs = Vec::new();

        let age = controls.show_age.then(|| {
            let counts = analysis::age_distribution(&self.records);
            specs.push(charts::age_chart(&counts));
            counts
        });

        let gender = controls.show_gender.then(|| {
            let counts = analysis::gender_distribution(&self.records);
            let shares = analysis::percentages(&counts);
            specs.push(charts::gender_chart(shares.as_deref(), controls.gender_style));
            GenderBreakdown {
                style: controls.gender_style,
                counts,
                shares,
            }
        });

        let caste = controls.show_caste.then(|| {
            let table = analysis::cross_tabulate(&self.records, controls.top_castes);
            specs.push(charts::caste_chart(&table, controls.top_castes));
            CasteBreakdown {
                top_n: controls.top_castes,
                table,
            }
        });

        for chart in specs.iter().filter(|c| c.empty) {
            info!("No data for the {} chart", chart.kind);
        }

        Dashboard {
            metadata: DashboardMetadata {
                source: self.source.clone(),
                sheet: self.sheet.clone(),
                records: self.records.len(),
                generated_at: Utc::now(),
            },
            age,
            gender,
            caste,
            charts: specs,
        }
    }
}
