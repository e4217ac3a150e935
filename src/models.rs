//! Data models for the demographic dashboard.
//!
//! This module contains the records loaded from a spreadsheet and the
//! aggregates derived from them for each chart.

use crate::locale;
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// One spreadsheet row.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Age in years. NaN when the cell was empty or not numeric.
    pub age: f64,
    /// Gender as written in the sheet, trimmed. None when the cell was empty.
    pub gender: Option<String>,
    /// Normalized caste. [`locale::UNKNOWN_CASTE`] when the cell was empty.
    pub caste: String,
}

impl Record {
    /// Creates a record, normalizing the caste spelling.
    pub fn new(age: f64, gender: Option<&str>, caste: &str) -> Self {
        let caste = crate::analysis::normalize_caste(caste);
        Self {
            age,
            gender: gender.map(str::trim).filter(|g| !g.is_empty()).map(String::from),
            caste: if caste.is_empty() {
                locale::UNKNOWN_CASTE.to_string()
            } else {
                caste
            },
        }
    }

    /// Age bucket this record falls in.
    pub fn age_bucket(&self) -> AgeBucket {
        AgeBucket::from_age(self.age)
    }
}

/// Fixed age range used by the age distribution chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum AgeBucket {
    /// Younger than 20
    Under20,
    /// Over 20 up to and including 35
    From21To35,
    /// Over 35 up to and including 50
    From36To50,
    /// Everything else, including unknown ages
    Over50,
}

impl AgeBucket {
    /// All buckets in display order.
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::Under20,
        AgeBucket::From21To35,
        AgeBucket::From36To50,
        AgeBucket::Over50,
    ];

    /// Bucket for an age. NaN compares false everywhere and lands in `Over50`.
    pub fn from_age(age: f64) -> Self {
        if age < 20.0 {
            AgeBucket::Under20
        } else if age <= 35.0 {
            AgeBucket::From21To35
        } else if age <= 50.0 {
            AgeBucket::From36To50
        } else {
            AgeBucket::Over50
        }
    }

    /// Stable category key.
    pub fn key(&self) -> &'static str {
        match self {
            AgeBucket::Under20 => "<20",
            AgeBucket::From21To35 => "21–35",
            AgeBucket::From36To50 => "36–50",
            AgeBucket::Over50 => "51+",
        }
    }

    /// Nepali display label.
    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::Under20 => "२० वर्ष मुनि",
            AgeBucket::From21To35 => "२१ देखि ३५ वर्ष",
            AgeBucket::From36To50 => "३६ देखि ५० वर्ष",
            AgeBucket::Over50 => "५१ वर्ष माथि",
        }
    }

    /// Category keys in display order.
    pub fn keys() -> Vec<&'static str> {
        Self::ALL.iter().map(|b| b.key()).collect()
    }
}

impl fmt::Display for AgeBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Ordered category counts.
///
/// Entry order is meaningful: it is the order the chart shows, and two
/// counts are only equal when their order matches too.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryCounts {
    entries: IndexMap<String, usize>,
}

impl PartialEq for CategoryCounts {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for CategoryCounts {}

impl CategoryCounts {
    /// Count keys in first-encounter order.
    pub fn from_keys<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        let mut entries: IndexMap<String, usize> = IndexMap::new();
        for key in keys {
            *entries.entry(key.into()).or_insert(0) += 1;
        }
        Self { entries }
    }

    /// Sort by descending count. The sort is stable, so equal counts keep
    /// their first-encounter order.
    pub fn sorted_desc(mut self) -> Self {
        self.entries.sort_by(|_, a, _, b| b.cmp(a));
        self
    }

    /// Reorder against a fixed category list, zero-filling absent categories
    /// and dropping categories not in the list.
    pub fn reindex(&self, order: &[&str]) -> Self {
        let entries = order
            .iter()
            .map(|key| (key.to_string(), self.get(key)))
            .collect();
        Self { entries }
    }

    /// Keep only the first `n` entries.
    pub fn head(mut self, n: usize) -> Self {
        self.entries.truncate(n);
        self
    }

    /// Count for a category, zero if absent.
    pub fn get(&self, key: &str) -> usize {
        self.entries.get(key).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    pub fn total(&self) -> usize {
        self.entries.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries.iter().map(|(k, count)| (k.as_str(), *count))
    }

    pub fn labels(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn values(&self) -> Vec<usize> {
        self.entries.values().copied().collect()
    }
}

/// A category's share of a total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Share {
    pub label: String,
    pub count: usize,
    /// Percentage of the total, rounded to one decimal place.
    pub percent: f64,
}

impl Share {
    /// Display text used on gender charts: label, localized count and percent.
    pub fn display_text(&self) -> String {
        format!(
            "{}<br>{} ({:.1}%)",
            self.label,
            locale::to_nepali_numerals(self.count),
            self.percent
        )
    }
}

/// Counts per (caste, gender) for the most frequent castes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrossTab {
    /// Selected castes in lexical order.
    pub castes: Vec<String>,
    /// Genders seen among the selected castes, sorted.
    pub genders: Vec<String>,
    /// `counts[caste_idx][gender_idx]`.
    pub counts: Vec<Vec<usize>>,
}

impl CrossTab {
    /// Count for a pair, zero if either side is unknown.
    pub fn get(&self, caste: &str, gender: &str) -> usize {
        let row = self.castes.iter().position(|c| c == caste);
        let col = self.genders.iter().position(|g| g == gender);
        match (row, col) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }

    /// Counts of one gender across all selected castes, in caste order.
    pub fn column(&self, gender: &str) -> Vec<usize> {
        match self.genders.iter().position(|g| g == gender) {
            Some(c) => self.counts.iter().map(|row| row[c]).collect(),
            None => vec![0; self.castes.len()],
        }
    }

    /// Total across genders for one caste.
    pub fn row_total(&self, caste: &str) -> usize {
        self.castes
            .iter()
            .position(|c| c == caste)
            .map(|r| self.counts[r].iter().sum())
            .unwrap_or(0)
    }

    /// Total of the whole table.
    pub fn total(&self) -> usize {
        self.counts.iter().flatten().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.castes.is_empty()
    }
}

/// Gender chart presentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum GenderChartStyle {
    /// Pie chart (default)
    #[default]
    Pie,
    /// Bar chart
    Bar,
}

impl fmt::Display for GenderChartStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenderChartStyle::Pie => write!(f, "pie"),
            GenderChartStyle::Bar => write!(f, "bar"),
        }
    }
}

/// The three dashboard charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    /// Age group pie chart
    Age,
    /// Gender pie or bar chart
    Gender,
    /// Castes by gender stacked bar chart
    Caste,
}

impl ChartKind {
    /// Returns an emoji marker used in summaries and section headings.
    pub fn emoji(&self) -> &'static str {
        match self {
            ChartKind::Age => "📈",
            ChartKind::Gender => "🧭",
            ChartKind::Caste => "🏷️",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Age => write!(f, "age"),
            ChartKind::Gender => write!(f, "gender"),
            ChartKind::Caste => write!(f, "caste"),
        }
    }
}

/// Metadata about a rendered dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetadata {
    /// Spreadsheet the records were loaded from.
    pub source: PathBuf,
    /// Sheet name, for workbook inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Number of records loaded.
    pub records: usize,
    /// When the dashboard was rendered.
    pub generated_at: DateTime<Utc>,
}
