//! Demodash - demographic dashboards from spreadsheets
//!
//! Reads a spreadsheet of age, gender and caste records and renders an
//! age group pie chart, a gender pie/bar chart and a stacked bar chart of the
//! most frequent castes by gender.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime or input error (missing file, missing column, bad config, etc.)

mod analysis;
mod cli;
mod config;
mod ingest;
mod locale;
mod models;
mod report;
mod session;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::Config;
use ingest::{ColumnNames, IngestOptions};
use session::{Controls, Dashboard, Session};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Load configuration before logging so `verbose` in the file applies
    let (mut config, config_source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.log_level(args.quiet));

    info!("Demodash v{}", env!("CARGO_PKG_VERSION"));
    match config_source {
        Some(ref path) => info!("Loaded config from {}", path.display()),
        None => debug!("No config file found, using defaults"),
    }
    debug!("Arguments: {:?}", args);

    match run_dashboard(args, config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Dashboard failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .demodash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!("⚠️  .demodash.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .demodash.toml")?;

    println!("✅ Created .demodash.toml with default settings.");
    println!("   Edit it to customize column names, charts and output.");
    Ok(())
}

/// Initialize logging at the given level.
fn init_logging(level: tracing::Level) {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the spreadsheet, render the dashboard and write it. Returns the exit code.
fn run_dashboard(args: Args, config: Config) -> Result<i32> {
    let start_time = Instant::now();

    config.validate()?;

    let input = match args.input {
        Some(ref input) => input.clone(),
        None => {
            warn!("No input spreadsheet given");
            eprintln!("{}", locale::MISSING_INPUT_WARNING);
            return Ok(1);
        }
    };

    // Step 1: Load the spreadsheet into a session
    println!("📤 Loading spreadsheet: {}", input.display());
    let options = IngestOptions {
        columns: ColumnNames::from(&config.columns),
        sheet: config.input.sheet.clone(),
    };
    let session = Session::load(&input, &options)?;
    if session.records().is_empty() {
        warn!("{} has no data rows", session.source().display());
    }

    // Step 2: Aggregate and build the charts
    let controls = Controls::from(&config.charts);
    let enabled = controls.enabled();
    if enabled.is_empty() {
        warn!("All charts are switched off");
    }
    println!(
        "📊 Building charts: {}",
        enabled
            .iter()
            .map(|kind| kind.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let dashboard = session.render(&controls);

    // Step 3: Render and save
    let output_path = config.output_path();
    let output = render_output(&dashboard, config.general.format)?;
    report::write_output(&output, &output_path)?;

    print_summary(&dashboard);
    println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
    println!(
        "\n✅ Dashboard complete! Saved to: {}",
        output_path.display()
    );

    Ok(0)
}

/// Render the dashboard in the requested format.
fn render_output(dashboard: &Dashboard, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Html => report::generate_html_dashboard(dashboard),
        OutputFormat::Json => report::generate_json_report(dashboard),
        OutputFormat::Markdown => Ok(report::generate_markdown_report(dashboard)),
    }
}

/// Print a short console summary of the rendered aggregates.
fn print_summary(dashboard: &Dashboard) {
    println!("\n📋 Summary:");
    println!("   Records: {}", dashboard.metadata.records);

    if let Some(ref age) = dashboard.age {
        let parts: Vec<String> = age
            .iter()
            .map(|(bucket, count)| format!("{}: {}", bucket, count))
            .collect();
        println!("   {} Age groups: {}", models::ChartKind::Age.emoji(), parts.join(" | "));
    }

    if let Some(ref gender) = dashboard.gender {
        match gender.shares {
            Some(ref shares) => {
                let parts: Vec<String> = shares
                    .iter()
                    .map(|s| format!("{}: {} ({:.1}%)", s.label, s.count, s.percent))
                    .collect();
                println!(
                    "   {} Gender ({}): {}",
                    models::ChartKind::Gender.emoji(),
                    gender.style,
                    parts.join(" | ")
                );
            }
            None => println!("   {} Gender: no data", models::ChartKind::Gender.emoji()),
        }
    }

    if let Some(ref caste) = dashboard.caste {
        println!(
            "   {} Top castes ({} requested, {} records): {}",
            models::ChartKind::Caste.emoji(),
            caste.top_n,
            caste.table.total(),
            caste.table.castes.join(", ")
        );
    }
}

/// Load configuration from file or use defaults, with the path it came from.
///
/// Runs before logging is set up, so problems go to stderr.
fn load_config(args: &Args) -> Result<(Config, Option<PathBuf>)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, Some(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, Some(PathBuf::from(config::CONFIG_FILE_NAME)))),
        Ok(None) => Ok((Config::default(), None)),
        Err(e) => {
            eprintln!("⚠️  Failed to load config: {:#}", e);
            Ok((Config::default(), None))
        }
    }
}
