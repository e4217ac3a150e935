//! Record aggregation for the dashboard charts.
//!
//! Every function here is pure: it reads the records of the current render
//! pass and returns a freshly built aggregate.

use crate::locale::CASTE_SYNONYMS;
use crate::models::{AgeBucket, CategoryCounts, CrossTab, Record, Share};
use std::collections::{BTreeSet, HashMap};

/// Trim a caste and replace known misspellings with the canonical spelling.
pub fn normalize_caste(raw: &str) -> String {
    let trimmed = raw.trim();
    CASTE_SYNONYMS
        .iter()
        .find(|(variant, _)| *variant == trimmed)
        .map(|(_, canonical)| (*canonical).to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Count records by an extracted key, in first-encounter order.
/// Records whose key is `None` are not counted.
pub fn count_by<F>(records: &[Record], key: F) -> CategoryCounts
where
    F: Fn(&Record) -> Option<String>,
{
    CategoryCounts::from_keys(records.iter().filter_map(key))
}

/// Records per age bucket. All four buckets are present, in display order.
pub fn age_distribution(records: &[Record]) -> CategoryCounts {
    count_by(records, |r| Some(r.age_bucket().key().to_string())).reindex(&AgeBucket::keys())
}

/// Records per gender, most frequent first. Missing genders are skipped and
/// only genders present in the data appear.
pub fn gender_distribution(records: &[Record]) -> CategoryCounts {
    count_by(records, |r| r.gender.clone()).sorted_desc()
}

/// Records per caste, most frequent first.
pub fn caste_distribution(records: &[Record]) -> CategoryCounts {
    count_by(records, |r| Some(r.caste.clone())).sorted_desc()
}

/// Round to one decimal place, halves to even.
fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Share of the total for every category.
///
/// Returns `None` when the total is zero, since no percentage is defined.
pub fn percentages(counts: &CategoryCounts) -> Option<Vec<Share>> {
    let total = counts.total();
    if total == 0 {
        return None;
    }

    let shares = counts
        .iter()
        .map(|(label, count)| Share {
            label: label.to_string(),
            count,
            percent: round1(count as f64 / total as f64 * 100.0),
        })
        .collect();

    Some(shares)
}

/// The `n` most frequent castes. Castes with equal frequency keep the order
/// in which they first appear in the records.
pub fn top_castes(records: &[Record], n: usize) -> Vec<String> {
    caste_distribution(records).head(n).labels()
}

/// Count (caste, gender) pairs for the `n` most frequent castes.
///
/// Castes are picked by frequency but laid out in lexical order, as are the
/// genders. Every selected caste gets a row and every gender seen among those
/// castes gets a column, zero-filled. Records without a gender still count
/// towards caste frequency but not towards the table.
pub fn cross_tabulate(records: &[Record], n: usize) -> CrossTab {
    let mut castes = top_castes(records, n);
    castes.sort();
    let rows: HashMap<String, usize> = castes
        .iter()
        .enumerate()
        .map(|(idx, caste)| (caste.clone(), idx))
        .collect();

    let selected: Vec<(usize, &str)> = records
        .iter()
        .filter_map(|r| {
            let row = *rows.get(r.caste.as_str())?;
            let gender = r.gender.as_deref()?;
            Some((row, gender))
        })
        .collect();

    let genders: Vec<String> = selected
        .iter()
        .map(|(_, gender)| *gender)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(String::from)
        .collect();
    let cols: HashMap<String, usize> = genders
        .iter()
        .enumerate()
        .map(|(idx, gender)| (gender.clone(), idx))
        .collect();

    let mut counts = vec![vec![0usize; genders.len()]; castes.len()];
    for (row, gender) in selected {
        if let Some(&col) = cols.get(gender) {
            counts[row][col] += 1;
        }
    }

    CrossTab {
        castes,
        genders,
        counts,
    }
}
