//! Keyword-based category inference from product names.
//!
//! - [`keywords`]: the built-in ordered `(category, keywords)` table.
//! - [`classifier`]: the generic first-match routine over that table, with
//!   optional extra keywords from config.

pub mod classifier;
pub mod keywords;
