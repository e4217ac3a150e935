//! Plotly chart specifications.
//!
//! Each builder turns one aggregate into the traces and layout Plotly.js
//! expects. Labels and hover text are localized here.

use crate::locale::{self, to_nepali_numerals};
use crate::models::{AgeBucket, CategoryCounts, ChartKind, CrossTab, GenderChartStyle, Share};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Pie slice colors for the gender chart.
const GENDER_PIE_COLORS: [&str; 2] = ["#66B3FF", "#FF9999"];

/// Bar colors for the gender chart.
const GENDER_BAR_COLORS: [&str; 2] = ["#FF9999", "#66B3FF"];

/// A renderable chart: Plotly traces plus layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartSpec {
    /// Which dashboard chart this is.
    pub kind: ChartKind,
    /// Localized chart title.
    pub title: String,
    /// Plotly traces.
    pub data: Vec<Value>,
    /// Plotly layout.
    pub layout: Value,
    /// True when there was nothing to plot.
    pub empty: bool,
}

impl ChartSpec {
    /// DOM id used for the chart container.
    pub fn element_id(&self) -> String {
        format!("chart-{}", self.kind)
    }
}

fn font() -> Value {
    json!({ "family": locale::FONT_FAMILY, "size": locale::FONT_SIZE })
}

/// Hover text for one age bucket.
fn age_hover_text(bucket: AgeBucket, count: usize) -> String {
    format!(
        "{}<br>({} {})",
        bucket.label(),
        to_nepali_numerals(count),
        locale::POPULATION_AXIS_TITLE
    )
}

/// Age group pie chart. `counts` is keyed by [`AgeBucket::key`].
pub fn age_chart(counts: &CategoryCounts) -> ChartSpec {
    let labels: Vec<&str> = AgeBucket::ALL.iter().map(|b| b.label()).collect();
    let values = counts.reindex(&AgeBucket::keys()).values();
    let hover: Vec<String> = AgeBucket::ALL
        .iter()
        .zip(&values)
        .map(|(bucket, count)| age_hover_text(*bucket, *count))
        .collect();

    let empty = values.iter().all(|v| *v == 0);
    let data = if empty {
        Vec::new()
    } else {
        vec![json!({
            "type": "pie",
            "labels": labels,
            "values": values,
            "hovertext": hover,
            "hoverinfo": "text",
            "textinfo": "percent+label",
            "textfont": font(),
        })]
    };

    ChartSpec {
        kind: ChartKind::Age,
        title: locale::AGE_CHART_TITLE.to_string(),
        data,
        layout: json!({ "title": { "text": locale::AGE_CHART_TITLE } }),
        empty,
    }
}

/// Gender chart as a pie or bar. `shares` is `None` when no record has a
/// gender.
pub fn gender_chart(shares: Option<&[Share]>, style: GenderChartStyle) -> ChartSpec {
    let title = locale::GENDER_CHART_TITLE.to_string();
    let shares = match shares {
        Some(shares) if !shares.is_empty() => shares,
        _ => {
            return ChartSpec {
                kind: ChartKind::Gender,
                layout: json!({ "title": { "text": title } }),
                title,
                data: Vec::new(),
                empty: true,
            }
        }
    };

    let labels: Vec<&str> = shares.iter().map(|s| s.label.as_str()).collect();
    let values: Vec<usize> = shares.iter().map(|s| s.count).collect();
    let text: Vec<String> = shares.iter().map(Share::display_text).collect();

    let (trace, layout) = match style {
        GenderChartStyle::Pie => (
            json!({
                "type": "pie",
                "labels": labels,
                "values": values,
                "text": text,
                "hoverinfo": "text",
                "textinfo": "text",
                "marker": { "colors": GENDER_PIE_COLORS },
                "textfont": font(),
            }),
            json!({ "title": { "text": title } }),
        ),
        GenderChartStyle::Bar => (
            json!({
                "type": "bar",
                "x": labels,
                "y": values,
                "text": text,
                "textposition": "auto",
                "marker": { "color": GENDER_BAR_COLORS },
            }),
            json!({
                "title": { "text": title },
                "xaxis": { "title": { "text": locale::GENDER_AXIS_TITLE } },
                "yaxis": { "title": { "text": locale::POPULATION_AXIS_TITLE } },
                "font": font(),
            }),
        ),
    };

    ChartSpec {
        kind: ChartKind::Gender,
        title,
        data: vec![trace],
        layout,
        empty: false,
    }
}

/// Hover template for one gender's trace in the caste chart.
fn caste_hover_template(gender: &str) -> String {
    format!(
        "{}: %{{x}}<br>{}: {}<br>{}: %{{y}}<extra></extra>",
        locale::CASTE_AXIS_TITLE,
        locale::GENDER_AXIS_TITLE,
        gender,
        locale::POPULATION_AXIS_TITLE
    )
}

/// Stacked bar chart of the selected castes, one trace per gender.
pub fn caste_chart(table: &CrossTab, top_n: usize) -> ChartSpec {
    let title = locale::caste_chart_title(top_n);

    let data: Vec<Value> = table
        .genders
        .iter()
        .map(|gender| {
            let column = table.column(gender);
            json!({
                "type": "bar",
                "name": gender,
                "x": table.castes,
                "y": column,
                "text": column,
                "hovertemplate": caste_hover_template(gender),
            })
        })
        .collect();

    let layout = json!({
        "barmode": "stack",
        "title": { "text": title },
        "xaxis": { "title": { "text": locale::CASTE_AXIS_TITLE } },
        "yaxis": { "title": { "text": locale::POPULATION_AXIS_TITLE } },
        "font": font(),
        "legend": { "title": { "text": locale::GENDER_AXIS_TITLE } },
    });

    ChartSpec {
        kind: ChartKind::Caste,
        empty: data.is_empty(),
        title,
        data,
        layout,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shares() -> Vec<Share> {
        vec![
            Share {
                label: "महिला".to_string(),
                count: 2,
                percent: 66.7,
            },
            Share {
                label: "पुरुष".to_string(),
                count: 1,
                percent: 33.3,
            },
        ]
    }

    #[test]
    fn test_age_chart() {
        let counts = CategoryCounts::from_keys(["<20", "51+", "51+", "21–35"]);
        let chart = age_chart(&counts);

        assert!(!chart.empty);
        assert_eq!(chart.title, "उमेर समूह वितरण");
        let trace = &chart.data[0];
        assert_eq!(trace["type"], "pie");
        assert_eq!(trace["labels"][0], "२० वर्ष मुनि");
        assert_eq!(trace["labels"][3], "५१ वर्ष माथि");
        assert_eq!(trace["values"], json!([1, 1, 0, 2]));
        assert_eq!(trace["hovertext"][3], "५१ वर्ष माथि<br>(२ जनसंख्या)");
        assert_eq!(trace["textinfo"], "percent+label");
    }

    #[test]
    fn test_age_chart_empty() {
        let chart = age_chart(&CategoryCounts::default());
        assert!(chart.empty);
        assert!(chart.data.is_empty());
    }

    #[test]
    fn test_gender_pie_chart() {
        let shares = shares();
        let chart = gender_chart(Some(shares.as_slice()), GenderChartStyle::Pie);

        let trace = &chart.data[0];
        assert_eq!(trace["type"], "pie");
        assert_eq!(trace["labels"], json!(["महिला", "पुरुष"]));
        assert_eq!(trace["text"][0], "महिला<br>२ (66.7%)");
        assert_eq!(trace["marker"]["colors"][0], "#66B3FF");
    }

    #[test]
    fn test_gender_bar_chart() {
        let shares = shares();
        let chart = gender_chart(Some(shares.as_slice()), GenderChartStyle::Bar);

        let trace = &chart.data[0];
        assert_eq!(trace["type"], "bar");
        assert_eq!(trace["y"], json!([2, 1]));
        assert_eq!(trace["marker"]["color"][0], "#FF9999");
        assert_eq!(chart.layout["xaxis"]["title"]["text"], "लिङ्ग");
        assert_eq!(chart.layout["yaxis"]["title"]["text"], "जनसंख्या");
    }

    #[test]
    fn test_gender_chart_without_data() {
        let chart = gender_chart(None, GenderChartStyle::Bar);
        assert!(chart.empty);
        assert!(chart.data.is_empty());
    }

    #[test]
    fn test_caste_chart() {
        let table = CrossTab {
            castes: vec!["मगर".to_string(), "गुरुङ".to_string()],
            genders: vec!["पुरुष".to_string(), "महिला".to_string()],
            counts: vec![vec![3, 1], vec![0, 2]],
        };

        let chart = caste_chart(&table, 10);

        assert_eq!(chart.data.len(), 2);
        assert_eq!(chart.data[0]["name"], "पुरुष");
        assert_eq!(chart.data[0]["y"], json!([3, 0]));
        assert_eq!(chart.data[1]["y"], json!([1, 2]));
        assert_eq!(
            chart.data[1]["hovertemplate"],
            "जाति: %{x}<br>लिङ्ग: महिला<br>जनसंख्या: %{y}<extra></extra>"
        );
        assert_eq!(chart.layout["barmode"], "stack");
        assert_eq!(chart.title, "शीर्ष 10 जातिहरुमा लिङ्ग अनुसार स्तरीकृत बार चार्ट");
        assert_eq!(chart.element_id(), "chart-caste");
    }
}
