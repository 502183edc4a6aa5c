//! Renderers for a finished [`crate::models::Analysis`].
//!
//! - [`terminal`]: colored summary box and ranked table; respects `--verbose` / `--quiet`.
//! - [`export`]: ranked CSV, JSON summary, and the cleaned product CSV.
//! - [`charts`]: engagement bars, normalized heatmap, and price boxplot PNGs.
//! - [`pdf`]: cover page, ranked table, and the chart images in one document.

pub mod charts;
pub mod export;
pub mod pdf;
pub mod terminal;
