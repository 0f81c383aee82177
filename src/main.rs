//! NeuroScan Review - brain MRI analysis history review
//!
//! A CLI tool that loads analysis records, filters, sorts and pages them
//! the way the history table does, and renders the visible page as a
//! Markdown or JSON report with optional CSV/JSON export.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad arguments, unreadable archive or config, write failure)

mod analysis;
mod archive;
mod cli;
mod config;
mod error;
mod models;
mod report;
mod review;
mod seed;

use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE};
use models::AnalysisRecord;
use report::{ExportOptions, ReviewReport};
use review::{Clock, FixedClock, ReviewSession, SystemClock};
use std::path::Path;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

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

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("NeuroScan Review v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Config: {:?}", config);

    if let Err(e) = run_review(&args, config) {
        error!("Review failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .neuroscan.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).with_context(|| format!("Failed to write {}", CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE);
    println!("   Edit it to customize page size, default sort and export options.");
    Ok(())
}

/// Initialize logging. `RUST_LOG` wins over -v/-q when set.
fn init_logging(args: &Args, config: &Config) {
    let level = if config.general.verbose && !args.quiet {
        tracing::Level::DEBUG
    } else {
        args.log_level()
    };

    let builder = FmtSubscriber::builder()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact();

    let result = if std::env::var_os("RUST_LOG").is_some() {
        tracing::subscriber::set_global_default(
            builder.with_env_filter(EnvFilter::from_default_env()).finish(),
        )
    } else {
        tracing::subscriber::set_global_default(builder.with_max_level(level).finish())
    };

    if let Err(e) = result {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref config_path) => Config::load(config_path)?,
        None => Config::load_default()?.unwrap_or_default(),
    };

    config.merge_with_args(args);
    Ok(config)
}

/// Load the archive named by --records, or the built-in history.
fn load_records(args: &Args) -> Result<(Vec<AnalysisRecord>, String)> {
    match args.records {
        Some(ref path) => {
            let records = archive::load_records(path)
                .with_context(|| format!("Failed to load records from {}", path.display()))?;
            Ok((records, path.display().to_string()))
        }
        None => {
            debug!("No archive given, using built-in history");
            Ok((seed::history_records(), "built-in history".to_string()))
        }
    }
}

/// Run the review workflow.
fn run_review(args: &Args, config: Config) -> Result<()> {
    let (records, source) = load_records(args)?;

    let clock: Box<dyn Clock> = match args.now {
        Some(now) => {
            info!("Clock fixed at {}", now.to_rfc3339());
            Box::new(FixedClock(now))
        }
        None => Box::new(SystemClock),
    };

    let mut session = ReviewSession::new(records, config.review.items_per_page, clock);
    session.set_criteria(args.criteria()?);
    session.sort_by(config.review.sort_state());

    let shown = session.go_to_page(args.page);
    if shown != args.page {
        warn!("Page {} is out of range, showing page {}", args.page, shown);
    }

    if args.select_all {
        session.select_all(true);
    } else {
        for id in &args.select {
            if !session.select(*id) {
                warn!("Record {} is not visible under the current filters", id);
            }
        }
    }

    // Render the report
    let report = ReviewReport::from_session(&session, &source, session.now());
    let output = match config.general.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            info!("Report saved to {}", path.display());
        }
        None => print!("{}", output),
    }

    if let Some(format) = args.export {
        let options = ExportOptions {
            format,
            ..ExportOptions::from(&config.export)
        };
        let dir = config.export.directory();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create export directory {}", dir.display()))?;

        let scope = session.export_scope();
        let path = report::write_export(&scope, &options, &dir, session.now().date_naive())
            .context("Export failed")?;
        eprintln!("📦 Exported {} records to {}", scope.len(), path.display());
    }

    if !args.quiet {
        eprintln!("\n📊 Review Summary:");
        for line in analysis::generate_summary_text(&report.summary).lines() {
            eprintln!("   {}", line);
        }
        eprintln!("   {}", report.range_label);
        if !session.selection().is_empty() {
            eprintln!("   {} selected", session.selection().len());
        }
    }

    Ok(())
}
