//! The four-stage batch pipeline. Each stage takes an immutable snapshot from
//! the previous one and returns a new one:
//!
//! - [`loader`]: bytes → `Vec<RawRecord>` (decoding + schema check, fatal on failure)
//! - [`normalizer`]: `&[RawRecord]` → [`normalizer::NormalizedTable`]
//! - [`crate::category::classifier`]: `Vec<Product>` → `Vec<ClassifiedProduct>`
//! - [`aggregator`]: `&[ClassifiedProduct]` → ranked `Vec<CategoryStat>`

pub mod aggregator;
pub mod loader;
pub mod normalizer;

use std::path::Path;

use crate::category::classifier::Classifier;
use crate::config::Config;
use crate::error::Result;
use crate::models::{Analysis, RawRecord};
use crate::stats;

/// Load `input` and run every stage. Fatal errors surface before anything is
/// returned, so callers never see a partial analysis.
pub fn run(input: &Path, config: &Config, encoding_override: Option<&str>) -> Result<Analysis> {
    let label = encoding_override.unwrap_or(config.input.encoding.as_str());
    let encoding = loader::resolve_encoding(label)?;
    let delimiter = config.input.delimiter_byte()?;

    let records = loader::load_file(input, encoding, delimiter, &config.columns)?;
    tracing::info!(rows = records.len(), encoding = encoding.name(), "loaded input");

    analyze(&records, config)
}

/// Run normalizer, classifier and aggregator over already-loaded records.
pub fn analyze(records: &[RawRecord], config: &Config) -> Result<Analysis> {
    let classifier = Classifier::default().with_extra_keywords(&config.extra_keywords()?);

    let table = normalizer::FieldNormalizer::new()?.normalize(records);
    tracing::info!(
        kept = table.products.len(),
        dropped = table.dropped.len(),
        "normalized fields"
    );

    let products = classifier.classify_all(table.products);
    let ranked = aggregator::aggregate(&products, &config.scoring);
    tracing::info!(categories = ranked.len(), "aggregated categories");

    let order: Vec<_> = ranked.iter().map(|s| s.category).collect();
    let price_spreads = stats::price_spreads(&products, &order, config.quality.iqr_factor);
    for spread in &price_spreads {
        if spread.outlier_share() > config.quality.outlier_share_warn {
            tracing::warn!(
                category = %spread.category,
                outliers = spread.outliers,
                count = spread.count,
                upper_fence = spread.upper_fence,
                "price outliers exceed threshold; prices may mix totals and unit prices"
            );
        }
    }

    Ok(Analysis {
        rows_read: records.len(),
        dropped: table.dropped,
        price_reviews_correlation: stats::price_reviews_correlation(&products),
        products,
        stats: ranked,
        price_spreads,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScanError;
    use crate::models::Category;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    const FIXTURE: &str = "\
id,product_name,price,reviews_count,avg_rate
1,NIVEA Antiperspirant Spray for Women,EGP 100.00,10 verified ratings,4/5
2,Garnier Micellar Water,EGP 200.00 - EGP 300.00,30 verified ratings,5/5
3,Xiaomi Redmi 12 Smartphone,\"EGP 5,000.00\",100 verified ratings,3.5/5
4,Samsung Galaxy Tablet,EGP 7000,no reviews,4.5/5
";

    fn fixture_path(dir: &tempfile::TempDir, content: &[u8]) -> std::path::PathBuf {
        let path = dir.path().join("products.csv");
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_canonical_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture_path(&dir, FIXTURE.as_bytes());
        let analysis = run(&path, &Config::default(), None).unwrap();

        assert_eq!(analysis.rows_read, 4);
        assert!(analysis.dropped.is_empty());
        assert_eq!(analysis.stats.len(), 2);

        // Phones & Tablets: reviews [100] (one absent), ratings [3.5, 4.5], prices [5000, 7000]
        let phones = &analysis.stats[0];
        assert_eq!(phones.category, Category::PhonesTablets);
        assert_eq!(phones.products, 2);
        assert_eq!(phones.mean_reviews, Some(100.0));
        assert_eq!(phones.mean_rating, Some(4.0));
        assert_eq!(phones.mean_price, 6000.0);
        assert_eq!(phones.norm_reviews, Some(1.0));
        assert_eq!(phones.norm_rating, Some(0.0));
        assert!(approx(phones.engagement_score, 0.6));

        // Health & Beauty: reviews [10, 30], ratings [4, 5], prices [100, 250]
        let beauty = &analysis.stats[1];
        assert_eq!(beauty.category, Category::HealthBeauty);
        assert_eq!(beauty.products, 2);
        assert_eq!(beauty.mean_reviews, Some(20.0));
        assert_eq!(beauty.mean_rating, Some(4.5));
        assert_eq!(beauty.mean_price, 175.0);
        assert_eq!(beauty.norm_reviews, Some(0.0));
        assert_eq!(beauty.norm_rating, Some(1.0));
        assert!(approx(beauty.engagement_score, 0.4));
    }

    #[test]
    fn test_unpriced_rows_never_reach_aggregation() {
        let content = format!("{}5,Sony PlayStation 5,Out of stock,99 ratings,5/5\n", FIXTURE);
        let records = loader::parse_records(&content, b',', &Config::default().columns).unwrap();
        let analysis = analyze(&records, &Config::default()).unwrap();

        assert_eq!(analysis.rows_read, 5);
        assert_eq!(analysis.dropped.len(), 1);
        assert_eq!(analysis.dropped[0].id, "5");
        assert!(analysis.products.iter().all(|p| p.product.id != "5"));
        assert!(analysis.stats.iter().all(|s| s.category != Category::Gaming));
    }

    #[test]
    fn test_schema_error_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture_path(&dir, b"id,product_name,price\n1,Mug,EGP 5\n");
        assert!(matches!(
            run(&path, &Config::default(), None),
            Err(ScanError::Schema { .. })
        ));
    }

    #[test]
    fn test_decoding_error_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = FIXTURE.as_bytes().to_vec();
        bytes.extend_from_slice(b"5,Caf\xe9 Mug,EGP 5,1,4/5\n");
        let path = fixture_path(&dir, &bytes);

        assert!(matches!(
            run(&path, &Config::default(), Some("utf-8")),
            Err(ScanError::Decoding { .. })
        ));
        // the same bytes are valid under the legacy default
        assert!(run(&path, &Config::default(), None).is_ok());
    }

    #[test]
    fn test_unknown_encoding_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = fixture_path(&dir, FIXTURE.as_bytes());
        assert!(matches!(
            run(&path, &Config::default(), Some("nope")),
            Err(ScanError::UnknownEncoding(_))
        ));
    }

    #[test]
    fn test_correlation_and_spreads_are_reported() {
        let records = loader::parse_records(FIXTURE, b',', &Config::default().columns).unwrap();
        let analysis = analyze(&records, &Config::default()).unwrap();

        // prices [100, 250, 5000] vs reviews [10, 30, 100]
        let r = analysis.price_reviews_correlation.unwrap();
        assert!(r > 0.9 && r <= 1.0, "{}", r);

        let order: Vec<Category> = analysis.price_spreads.iter().map(|s| s.category).collect();
        assert_eq!(order, vec![Category::PhonesTablets, Category::HealthBeauty]);
    }
}
