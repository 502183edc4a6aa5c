//! `shelf-scan`: clean an e-commerce product export, infer categories, and
//! rank them by engagement.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]) and install logging ([`logging`]).
//! 2. Load config ([`config::load_config`]).
//! 3. Decode, normalize, classify, and aggregate the input ([`pipeline::run`]).
//!    Fatal errors stop here, before anything is written.
//! 4. Write tables, charts, and the PDF into `--out` ([`report`]).
//! 5. Print the terminal report.

mod category;
mod cli;
mod config;
mod error;
mod logging;
mod models;
mod pipeline;
mod report;
mod stats;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use cli::Cli;
use config::load_config;
use report::{charts, export, pdf, terminal};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    let input_dir = cli
        .input
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let config = load_config(input_dir, cli.config.as_deref())?;

    let spinner = if !cli.quiet {
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
        pb.set_message(format!("Analyzing {}", cli.input.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let result = pipeline::run(&cli.input, &config, cli.encoding.as_deref());

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let analysis =
        result.with_context(|| format!("Failed to analyze {}", cli.input.display()))?;

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("Failed to create {}", cli.out.display()))?;

    let mut written: Vec<PathBuf> = export::write_tables(&analysis, &cli.out, config.output.cleaned_csv)?;

    if config.output.charts {
        if let Some(chart_set) = charts::render_all(&analysis, &cli.out)? {
            written.extend(chart_set.paths().iter().map(|p| p.to_path_buf()));

            if config.output.pdf {
                let pdf_path = cli.out.join(pdf::REPORT_PDF);
                pdf::render(&analysis, &cli.input, &chart_set, &pdf_path)?;
                written.push(pdf_path);
            }
        }
    } else if config.output.pdf {
        tracing::warn!("pdf output needs charts; set [output] charts = true");
    }

    terminal::render(&analysis, &cli.input, &config.quality, cli.verbose, cli.quiet)?;

    if !cli.quiet {
        for path in &written {
            eprintln!("  {} {}", "→".cyan(), path.display());
        }
    }

    Ok(())
}
