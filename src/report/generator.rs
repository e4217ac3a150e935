//! Dashboard report generation.
//!
//! This module renders a [`Dashboard`] as a self-contained HTML page, as
//! Markdown tables or as JSON.

use crate::locale::{self, to_nepali_numerals};
use crate::models::{AgeBucket, CategoryCounts, DashboardMetadata};
use crate::report::charts::ChartSpec;
use crate::session::{CasteBreakdown, Dashboard, GenderBreakdown};
use anyhow::{Context, Result};
use std::path::Path;

/// Plotly.js bundle loaded by the HTML dashboard.
const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Escape text for HTML element content and attribute values.
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize a value for embedding inside a `<script>` element.
fn script_json(value: &impl serde::Serialize) -> Result<String> {
    let json = serde_json::to_string(value)?;
    Ok(json.replace("</", "<\\/"))
}

/// Escape a Markdown table cell.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Generate a complete HTML dashboard.
pub fn generate_html_dashboard(dashboard: &Dashboard) -> Result<String> {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"ne\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str(
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
    );
    html.push_str(&format!(
        "<title>{}</title>\n",
        escape_html(locale::PAGE_TITLE)
    ));
    html.push_str(&format!("<script src=\"{}\"></script>\n", PLOTLY_CDN));
    html.push_str(&format!(
        "<style>body {{ font-family: {}; max-width: 960px; margin: 2rem auto; padding: 0 1rem; }} \
         .chart {{ min-height: 420px; margin-bottom: 2rem; }} \
         .notice {{ padding: 1rem; background: #fff4e5; border-radius: 4px; }} \
         .meta {{ color: #555; font-size: 0.9rem; }}</style>\n",
        locale::FONT_FAMILY
    ));
    html.push_str("</head>\n<body>\n");

    html.push_str(&format!("<h1>{}</h1>\n", escape_html(locale::PAGE_TITLE)));
    html.push_str(&generate_html_metadata(&dashboard.metadata));

    if dashboard.charts.is_empty() {
        html.push_str("<p class=\"notice\">No charts selected.</p>\n");
    }

    for chart in &dashboard.charts {
        html.push_str(&generate_html_chart(chart)?);
    }

    html.push_str("</body>\n</html>\n");

    Ok(html)
}

/// Source details shown under the page title.
fn generate_html_metadata(metadata: &DashboardMetadata) -> String {
    let mut section = String::from("<p class=\"meta\">");

    section.push_str(&escape_html(&metadata.source.display().to_string()));
    if let Some(ref sheet) = metadata.sheet {
        section.push_str(&format!(" &middot; {}", escape_html(sheet)));
    }
    section.push_str(&format!(
        " &middot; {} {} &middot; {}",
        to_nepali_numerals(metadata.records),
        locale::POPULATION_AXIS_TITLE,
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str("</p>\n");

    section
}

/// One chart container plus the script that draws it.
fn generate_html_chart(chart: &ChartSpec) -> Result<String> {
    let mut block = String::new();
    let id = chart.element_id();

    block.push_str(&format!(
        "<section>\n<h2>{} {}</h2>\n",
        chart.kind.emoji(),
        escape_html(&chart.title)
    ));

    if chart.empty {
        block.push_str(&format!(
            "<p class=\"notice\" id=\"{}\">{}</p>\n</section>\n",
            id,
            locale::NO_DATA_NOTICE
        ));
        return Ok(block);
    }

    block.push_str(&format!("<div class=\"chart\" id=\"{}\"></div>\n", id));
    block.push_str(&format!(
        "<script>Plotly.newPlot({}, {}, {}, {{\"responsive\": true}});</script>\n",
        script_json(&id)?,
        script_json(&chart.data)?,
        script_json(&chart.layout)?
    ));
    block.push_str("</section>\n");

    Ok(block)
}

/// Generate a Markdown report of the dashboard aggregates.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    // Title
    output.push_str(&format!("# {}\n\n", locale::PAGE_TITLE));

    // Metadata section
    output.push_str(&generate_metadata_section(&dashboard.metadata));

    if let Some(ref age) = dashboard.age {
        output.push_str(&generate_age_section(age));
    }
    if let Some(ref gender) = dashboard.gender {
        output.push_str(&generate_gender_section(gender));
    }
    if let Some(ref caste) = dashboard.caste {
        output.push_str(&generate_caste_section(caste));
    }

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source.display()));
    if let Some(ref sheet) = metadata.sheet {
        section.push_str(&format!("- **Sheet:** {}\n", sheet));
    }
    section.push_str(&format!(
        "- **Records:** {}\n",
        to_nepali_numerals(metadata.records)
    ));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push('\n');

    section
}

/// Generate the age group section.
fn generate_age_section(age: &CategoryCounts) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", locale::AGE_CHART_TITLE));

    if age.total() == 0 {
        section.push_str(&format!("{}\n\n", locale::NO_DATA_NOTICE));
        return section;
    }

    section.push_str(&format!("| उमेर समूह | {} |\n", locale::POPULATION_AXIS_TITLE));
    section.push_str("|:---|---:|\n");
    for bucket in AgeBucket::ALL {
        section.push_str(&format!(
            "| {} | {} |\n",
            bucket.label(),
            to_nepali_numerals(age.get(bucket.key()))
        ));
    }
    section.push('\n');

    section
}

/// Generate the gender section.
fn generate_gender_section(gender: &GenderBreakdown) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", locale::GENDER_CHART_TITLE));

    let shares = match gender.shares {
        Some(ref shares) => shares,
        None => {
            section.push_str(&format!("{}\n\n", locale::NO_DATA_NOTICE));
            return section;
        }
    };

    section.push_str(&format!(
        "| {} | {} | % |\n",
        locale::GENDER_AXIS_TITLE,
        locale::POPULATION_AXIS_TITLE
    ));
    section.push_str("|:---|---:|---:|\n");
    for share in shares {
        section.push_str(&format!(
            "| {} | {} | {:.1} |\n",
            escape_cell(&share.label),
            to_nepali_numerals(share.count),
            share.percent
        ));
    }
    section.push('\n');

    section
}

/// Generate the castes by gender section.
fn generate_caste_section(caste: &CasteBreakdown) -> String {
    let mut section = String::new();
    let table = &caste.table;

    section.push_str(&format!("## {}\n\n", locale::caste_chart_title(caste.top_n)));

    if table.is_empty() {
        section.push_str(&format!("{}\n\n", locale::NO_DATA_NOTICE));
        return section;
    }

    section.push_str(&format!("| {} |", locale::CASTE_AXIS_TITLE));
    for gender in &table.genders {
        section.push_str(&format!(" {} |", escape_cell(gender)));
    }
    section.push_str(" **कुल** |\n|:---|");
    section.push_str(&"---:|".repeat(table.genders.len() + 1));
    section.push('\n');

    for caste_name in &table.castes {
        section.push_str(&format!("| {} |", escape_cell(caste_name)));
        for gender in &table.genders {
            section.push_str(&format!(
                " {} |",
                to_nepali_numerals(table.get(caste_name, gender))
            ));
        }
        section.push_str(&format!(
            " **{}** |\n",
            to_nepali_numerals(table.row_total(caste_name))
        ));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Report generated by demodash*\n");

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

/// Write rendered output to a file.
pub fn write_output(content: &str, path: &Path) -> Result<()> {
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write dashboard to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{GenderChartStyle, Record};
    use crate::session::{Controls, Session};

    fn create_test_dashboard() -> Dashboard {
        let records = vec![
            Record::new(19.0, Some("पुरुष"), "गुरुङ्ग"),
            Record::new(30.0, Some("महिला"), "मगर"),
            Record::new(45.0, Some("महिला"), "गुरुङ"),
            Record::new(60.0, Some("पुरुष"), "ब्राह्मण"),
        ];
        Session::from_records("ward-3.xlsx", records).render(&Controls::default())
    }

    #[test]
    fn test_generate_html_dashboard() {
        let html = generate_html_dashboard(&create_test_dashboard()).unwrap();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains(PLOTLY_CDN));
        assert!(html.contains("id=\"chart-age\""));
        assert!(html.contains("id=\"chart-gender\""));
        assert!(html.contains("id=\"chart-caste\""));
        assert!(html.contains("Plotly.newPlot(\"chart-age\""));
        assert!(html.contains("उमेर समूह वितरण"));
        assert!(html.contains("ward-3.xlsx"));
        assert!(html.contains("<extra><\\/extra>"));
    }

    #[test]
    fn test_generate_html_dashboard_no_data() {
        let dashboard = Session::from_records("empty.csv", Vec::new()).render(&Controls::default());
        let html = generate_html_dashboard(&dashboard).unwrap();

        assert!(html.contains(locale::NO_DATA_NOTICE));
        assert!(!html.contains("Plotly.newPlot"));
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_dashboard());

        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## उमेर समूह वितरण"));
        assert!(markdown.contains("| २० वर्ष मुनि | १ |"));
        assert!(markdown.contains("| ३६ देखि ५० वर्ष | १ |"));
        assert!(markdown.contains("| पुरुष | २ | 50.0 |"));
        assert!(markdown.contains("| गुरुङ | १ | १ | **२** |"));
        assert!(markdown.contains("*Report generated by demodash*"));
    }

    #[test]
    fn test_generate_markdown_report_only_gender() {
        let records = vec![Record::new(30.0, None, "मगर")];
        let controls = Controls {
            show_age: false,
            show_gender: true,
            show_caste: false,
            gender_style: GenderChartStyle::Pie,
            top_castes: 10,
        };
        let dashboard = Session::from_records("ward.csv", records).render(&controls);

        let markdown = generate_markdown_report(&dashboard);

        assert!(!markdown.contains("## उमेर समूह वितरण"));
        assert!(markdown.contains("## लिङ्ग वितरण"));
        assert!(markdown.contains(locale::NO_DATA_NOTICE));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_dashboard()).unwrap();

        assert!(json.contains("\"metadata\""));
        assert!(json.contains("\"charts\""));
        assert!(json.contains("\"barmode\": \"stack\""));

        let parsed: Dashboard = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.metadata.records, 4);
        assert_eq!(parsed.charts.len(), 3);
    }

    #[test]
    fn test_write_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dashboard.md");

        write_output("# test\n", &path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# test\n");

        assert!(write_output("x", &dir.path().join("missing/dashboard.md")).is_err());
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<a & 'b'>"), "&lt;a &amp; &#39;b&#39;&gt;");
    }
}
