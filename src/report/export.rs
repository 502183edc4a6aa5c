use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{Analysis, CategoryStat, ClassifiedProduct};

pub const STATS_CSV: &str = "category_stats.csv";
pub const SUMMARY_JSON: &str = "category_stats.json";
pub const PRODUCTS_CSV: &str = "cleaned_products.csv";

/// Flat CSV row for a [`CategoryStat`]; absent values are written as empty cells.
#[derive(Debug, Serialize)]
struct StatRow<'a> {
    rank: usize,
    category: &'a str,
    products: usize,
    mean_reviews: Option<f64>,
    mean_rating: Option<f64>,
    mean_price: f64,
    norm_reviews: Option<f64>,
    norm_rating: Option<f64>,
    engagement_score: f64,
}

#[derive(Debug, Serialize)]
struct ProductRow<'a> {
    id: &'a str,
    product_name: &'a str,
    category: &'a str,
    price: f64,
    reviews_count: Option<u64>,
    avg_rate: Option<f64>,
}

/// Write the ranked category table as CSV.
pub fn write_stats_csv(stats: &[CategoryStat], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for (i, stat) in stats.iter().enumerate() {
        writer.serialize(StatRow {
            rank: i + 1,
            category: stat.category.label(),
            products: stat.products,
            mean_reviews: stat.mean_reviews,
            mean_rating: stat.mean_rating,
            mean_price: stat.mean_price,
            norm_reviews: stat.norm_reviews,
            norm_rating: stat.norm_rating,
            engagement_score: stat.engagement_score,
        })?;
    }
    writer.flush()?;
    Ok(())
}

/// Write every surviving record with its normalized fields and category.
pub fn write_products_csv(products: &[ClassifiedProduct], path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    for item in products {
        writer.serialize(ProductRow {
            id: &item.product.id,
            product_name: &item.product.name,
            category: item.category.label(),
            price: item.product.price,
            reviews_count: item.product.reviews,
            avg_rate: item.product.rating,
        })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_summary_json(analysis: &Analysis, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&analysis.summary())?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}

/// Write the tabular exports into `out_dir`, returning the paths written.
pub fn write_tables(analysis: &Analysis, out_dir: &Path, cleaned_csv: bool) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let stats_path = out_dir.join(STATS_CSV);
    write_stats_csv(&analysis.stats, &stats_path)?;
    written.push(stats_path);

    let json_path = out_dir.join(SUMMARY_JSON);
    write_summary_json(analysis, &json_path)?;
    written.push(json_path);

    if cleaned_csv {
        let products_path = out_dir.join(PRODUCTS_CSV);
        write_products_csv(&analysis.products, &products_path)?;
        written.push(products_path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, Product};

    fn analysis() -> Analysis {
        Analysis {
            rows_read: 3,
            dropped: Vec::new(),
            products: vec![
                ClassifiedProduct {
                    product: Product {
                        id: "1".to_string(),
                        name: "Kettle, 1.7L".to_string(),
                        price: 450.0,
                        reviews: Some(12),
                        rating: None,
                    },
                    category: Category::Appliances,
                },
            ],
            stats: vec![CategoryStat {
                category: Category::Appliances,
                products: 1,
                mean_reviews: Some(12.0),
                mean_rating: None,
                mean_price: 450.0,
                norm_reviews: Some(1.0),
                norm_rating: None,
                engagement_score: 0.6,
            }],
            price_spreads: Vec::new(),
            price_reviews_correlation: None,
        }
    }

    #[test]
    fn test_stats_csv_layout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(STATS_CSV);
        write_stats_csv(&analysis().stats, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let mut lines = content.lines();
        assert_eq!(
            lines.next().unwrap(),
            "rank,category,products,mean_reviews,mean_rating,mean_price,norm_reviews,norm_rating,engagement_score"
        );
        assert_eq!(lines.next().unwrap(), "1,Appliances,1,12.0,,450.0,1.0,,0.6");
    }

    #[test]
    fn test_write_tables() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_tables(&analysis(), dir.path(), true).unwrap();
        assert_eq!(written.len(), 3);

        let products = std::fs::read_to_string(dir.path().join(PRODUCTS_CSV)).unwrap();
        assert!(products.contains("\"Kettle, 1.7L\",Appliances,450.0,12,"));

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.path().join(SUMMARY_JSON)).unwrap())
                .unwrap();
        assert_eq!(json["rows_read"], 3);
        assert_eq!(json["rows_kept"], 1);
        assert_eq!(json["categories"][0]["category"], "Appliances");
        assert!(json["price_reviews_correlation"].is_null());
    }

    #[test]
    fn test_cleaned_csv_is_optional() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_tables(&analysis(), dir.path(), false).unwrap();
        assert_eq!(written.len(), 2);
        assert!(!dir.path().join(PRODUCTS_CSV).exists());
    }
}
