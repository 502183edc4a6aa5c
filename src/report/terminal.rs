use std::path::Path;

use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::config::QualityConfig;
use crate::models::{Analysis, CategoryStat, DroppedRow, PriceSpread};

/// Render the colored terminal report.
pub fn render(
    analysis: &Analysis,
    input: &Path,
    quality: &QualityConfig,
    verbose: bool,
    quiet: bool,
) -> Result<()> {
    let kept = analysis.products.len();
    let dropped = analysis.dropped.len();

    if quiet {
        println!(
            "Rows: {}  Kept: {}  Dropped: {}  Categories: {}  Top: {}",
            analysis.rows_read,
            kept.to_string().green(),
            dropped.to_string().yellow(),
            analysis.stats.len(),
            analysis
                .stats
                .first()
                .map(|s| s.category.to_string())
                .unwrap_or_else(|| "—".to_string()),
        );
        return Ok(());
    }

    println!("\n {} v{}", "shelf-scan".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Input: {}\n", input.display());

    // Summary box
    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", "SUMMARY".bold());
    println!(" │  {:<48} │", format!("Rows read          : {}", analysis.rows_read));
    println!(
        " │  {:<48} │",
        format!("{}  Kept            : {:>6}", "✓".green(), kept)
    );
    println!(
        " │  {:<48} │",
        format!("{}  Dropped (price) : {:>6}", "✗".red(), dropped)
    );
    println!(
        " │  {:<48} │",
        format!("Categories         : {}", analysis.stats.len())
    );
    println!(
        " │  {:<48} │",
        format!(
            "Price ↔ reviews r  : {}",
            fmt_opt(analysis.price_reviews_correlation, 3)
        )
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    if !analysis.stats.is_empty() {
        println!(" {} Categories by engagement:\n", "[RANK]".cyan().bold());
        render_stats_table(&analysis.stats);
        println!();
    }

    let flagged: Vec<&PriceSpread> = analysis
        .price_spreads
        .iter()
        .filter(|s| s.outlier_share() > quality.outlier_share_warn)
        .collect();
    if !flagged.is_empty() {
        println!(
            " {} Price outliers beyond {}×IQR (totals mixed with unit prices?):\n",
            "[DATA]".yellow().bold(),
            quality.iqr_factor
        );
        render_spread_table(&flagged);
        println!();
    }

    if verbose && dropped > 0 {
        println!(" {} Rows dropped for lack of a price:\n", "[DROP]".red().bold());
        render_dropped_table(&analysis.dropped);
        println!();
    }

    Ok(())
}

fn header(labels: &[&str]) -> Vec<Cell> {
    labels
        .iter()
        .map(|l| Cell::new(l).add_attribute(Attribute::Bold))
        .collect()
}

fn render_stats_table(stats: &[CategoryStat]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&[
            "#", "Category", "Products", "Mean reviews", "Mean rating", "Mean price",
            "Norm reviews", "Norm rating", "Engagement",
        ]));

    for (rank, stat) in stats.iter().enumerate() {
        let score_color = if stat.engagement_score >= 0.66 {
            Color::Green
        } else if stat.engagement_score >= 0.33 {
            Color::Yellow
        } else {
            Color::Red
        };

        table.add_row(vec![
            Cell::new(rank + 1).set_alignment(CellAlignment::Right),
            Cell::new(stat.category.to_string()),
            Cell::new(stat.products).set_alignment(CellAlignment::Right),
            Cell::new(fmt_opt(stat.mean_reviews, 1)).set_alignment(CellAlignment::Right),
            Cell::new(fmt_opt(stat.mean_rating, 2)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", stat.mean_price)).set_alignment(CellAlignment::Right),
            Cell::new(fmt_opt(stat.norm_reviews, 3)).set_alignment(CellAlignment::Right),
            Cell::new(fmt_opt(stat.norm_rating, 3)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.3}", stat.engagement_score))
                .fg(score_color)
                .set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

fn render_spread_table(spreads: &[&PriceSpread]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Category", "Median", "Q3", "Upper fence", "Max", "Outliers"]));

    for spread in spreads {
        table.add_row(vec![
            Cell::new(spread.category.to_string()),
            Cell::new(format!("{:.2}", spread.median)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", spread.q3)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", spread.upper_fence)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", spread.max)).set_alignment(CellAlignment::Right),
            Cell::new(format!(
                "{} / {} ({:.0}%)",
                spread.outliers,
                spread.count,
                spread.outlier_share() * 100.0
            ))
            .fg(Color::Yellow),
        ]);
    }

    println!("{}", table);
}

fn render_dropped_table(dropped: &[DroppedRow]) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header(&["Row", "Id", "Price text"]));

    for row in dropped {
        // +2: one for the header line, one for 1-based numbering
        table.add_row(vec![
            Cell::new(row.row + 2).set_alignment(CellAlignment::Right),
            Cell::new(&row.id),
            Cell::new(if row.price_raw.is_empty() {
                "(empty)"
            } else {
                row.price_raw.as_str()
            })
            .fg(Color::DarkGrey),
        ]);
    }

    println!("{}", table);
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "—".to_string(),
    }
}
