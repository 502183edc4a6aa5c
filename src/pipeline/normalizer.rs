use regex::Regex;

use crate::error::Result;
use crate::models::{DroppedRow, Product, RawRecord};
use crate::stats::median;

pub const RATING_MAX: f64 = 5.0;

/// Output of the normalizer: surviving products in source order, plus the
/// rows dropped for having no parseable price.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedTable {
    pub products: Vec<Product>,
    pub dropped: Vec<DroppedRow>,
}

/// Converts the text-encoded price, review count and rating fields to numbers.
///
/// Never fails on a malformed field: prices without a number drop the record,
/// unusable review counts and ratings become `None`, and ratings outside
/// `[0, 5]` are clamped.
pub struct FieldNormalizer {
    number: Regex,
    rating: Regex,
}

impl FieldNormalizer {
    pub fn new() -> Result<Self> {
        Ok(FieldNormalizer {
            // thousands separators belong to the token ("1,299.00"), and so
            // does a trailing decimal comma ("1,29")
            number: Regex::new(r"\d+(?:,\d{3})*(?:[.,]\d+)?")?,
            rating: Regex::new(r"(-?\d+(?:[.,]\d+)?)\s*/\s*5\b")?,
        })
    }

    pub fn normalize(&self, records: &[RawRecord]) -> NormalizedTable {
        let mut products = Vec::with_capacity(records.len());
        let mut dropped = Vec::new();

        for (row, record) in records.iter().enumerate() {
            match self.parse_price(&record.price_raw) {
                Some(price) => products.push(Product {
                    id: record.id.clone(),
                    name: record.name.clone(),
                    price,
                    reviews: parse_reviews(&record.reviews_raw),
                    rating: self.parse_rating(&record.rating_raw),
                }),
                None => {
                    tracing::debug!(row, id = %record.id, price = %record.price_raw, "dropping row without a price");
                    dropped.push(DroppedRow {
                        row,
                        id: record.id.clone(),
                        price_raw: record.price_raw.clone(),
                    });
                }
            }
        }

        NormalizedTable { products, dropped }
    }

    /// Price of a listing. A single number is taken as-is; a range such as
    /// `"EGP 329.99 - EGP 399.99"` yields the median of its numbers, which for
    /// two endpoints is their mean.
    pub fn parse_price(&self, raw: &str) -> Option<f64> {
        let values: Vec<f64> = self
            .number
            .find_iter(raw)
            .filter_map(|m| parse_number(m.as_str()))
            .collect();

        match values.len() {
            0 => None,
            1 => Some(values[0]),
            _ => median(&values),
        }
    }

    /// Rating out of five: the number before `/5`, else the first number.
    pub fn parse_rating(&self, raw: &str) -> Option<f64> {
        let value = self
            .rating
            .captures(raw)
            .and_then(|c| c.get(1))
            .or_else(|| self.number.find(raw))
            .and_then(|m| parse_number(m.as_str()))?;

        let clamped = value.clamp(0.0, RATING_MAX);
        if clamped != value {
            tracing::debug!(raw, value, clamped, "rating out of range, clamped");
        }
        Some(clamped)
    }
}

/// Parse one numeric token. A comma followed by exactly three digits groups
/// thousands; any other last comma is a decimal comma (`"4,5"` → `4.5`).
fn parse_number(token: &str) -> Option<f64> {
    let text = match token.rfind(',') {
        Some(i) if !token.contains('.') && token.len() - i - 1 != 3 => {
            format!("{}.{}", token[..i].replace(',', ""), &token[i + 1..])
        }
        _ => token.replace(',', ""),
    };
    text.parse().ok()
}

/// Review count: every digit in the string, concatenated. No digits → `None`.
pub fn parse_reviews(raw: &str) -> Option<u64> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}
