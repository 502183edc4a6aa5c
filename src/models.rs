use serde::{Deserialize, Serialize};

/// One row of the source export, with every field kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub id: String,
    pub name: String,
    pub price_raw: String,
    pub reviews_raw: String,
    pub rating_raw: String,
}

/// A record that survived field normalization. Price is always present;
/// reviews and rating are `None` when their raw text held no usable number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub reviews: Option<u64>,
    pub rating: Option<f64>,
}

/// A record the normalizer rejected because its price could not be parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedRow {
    /// Zero-based position in the source file (header excluded).
    pub row: usize,
    pub id: String,
    pub price_raw: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedProduct {
    #[serde(flatten)]
    pub product: Product,
    pub category: Category,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Health & Beauty")]
    HealthBeauty,
    #[serde(rename = "Fashion")]
    Fashion,
    #[serde(rename = "Phones & Tablets")]
    PhonesTablets,
    #[serde(rename = "Appliances")]
    Appliances,
    #[serde(rename = "Baby Products")]
    BabyProducts,
    #[serde(rename = "Computing")]
    Computing,
    #[serde(rename = "Gaming")]
    Gaming,
    #[serde(rename = "Home & Furniture")]
    HomeFurniture,
    #[serde(rename = "Supermarket")]
    Supermarket,
    #[serde(rename = "Television & Audio")]
    TelevisionAudio,
    #[serde(rename = "Other Category")]
    Other,
}

impl Category {
    /// Every label, in classifier priority order with the fallback last.
    pub const ALL: [Category; 11] = [
        Category::HealthBeauty,
        Category::Fashion,
        Category::PhonesTablets,
        Category::Appliances,
        Category::BabyProducts,
        Category::Computing,
        Category::Gaming,
        Category::HomeFurniture,
        Category::Supermarket,
        Category::TelevisionAudio,
        Category::Other,
    ];

    pub fn from_label(label: &str) -> Option<Category> {
        let label = label.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::HealthBeauty => "Health & Beauty",
            Category::Fashion => "Fashion",
            Category::PhonesTablets => "Phones & Tablets",
            Category::Appliances => "Appliances",
            Category::BabyProducts => "Baby Products",
            Category::Computing => "Computing",
            Category::Gaming => "Gaming",
            Category::HomeFurniture => "Home & Furniture",
            Category::Supermarket => "Supermarket",
            Category::TelevisionAudio => "Television & Audio",
            Category::Other => "Other Category",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Per-category demand summary produced by the aggregator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryStat {
    pub category: Category,
    pub products: usize,
    pub mean_reviews: Option<f64>,
    pub mean_rating: Option<f64>,
    pub mean_price: f64,
    pub norm_reviews: Option<f64>,
    pub norm_rating: Option<f64>,
    pub engagement_score: f64,
}

/// Quartile summary of one category's prices, plus the Tukey fence outliers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSpread {
    pub category: Category,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub lower_fence: f64,
    pub upper_fence: f64,
    pub outliers: usize,
    pub count: usize,
}

impl PriceSpread {
    pub fn outlier_share(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.outliers as f64 / self.count as f64
        }
    }
}

/// Everything a single run produces, handed to the report renderers.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub rows_read: usize,
    pub dropped: Vec<DroppedRow>,
    pub products: Vec<ClassifiedProduct>,
    pub stats: Vec<CategoryStat>,
    pub price_spreads: Vec<PriceSpread>,
    pub price_reviews_correlation: Option<f64>,
}

/// Serialized form of [`Analysis`] for `category_stats.json`; omits the
/// per-product table, which goes to `cleaned_products.csv` instead.
#[derive(Debug, Serialize)]
pub struct AnalysisSummary<'a> {
    pub rows_read: usize,
    pub rows_kept: usize,
    pub rows_dropped: usize,
    pub price_reviews_correlation: Option<f64>,
    pub categories: &'a [CategoryStat],
    pub price_spreads: &'a [PriceSpread],
    pub dropped: &'a [DroppedRow],
}

impl Analysis {
    pub fn summary(&self) -> AnalysisSummary<'_> {
        AnalysisSummary {
            rows_read: self.rows_read,
            rows_kept: self.products.len(),
            rows_dropped: self.dropped.len(),
            price_reviews_correlation: self.price_reviews_correlation,
            categories: &self.stats,
            price_spreads: &self.price_spreads,
            dropped: &self.dropped,
        }
    }
}
