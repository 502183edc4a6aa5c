use std::cmp::Ordering;

use crate::config::ScoringConfig;
use crate::models::{Category, CategoryStat, ClassifiedProduct};
use crate::stats::mean;

/// Build one [`CategoryStat`] per category present in `products`, ranked by
/// engagement score (descending, ties by label ascending).
pub fn aggregate(products: &[ClassifiedProduct], scoring: &ScoringConfig) -> Vec<CategoryStat> {
    let mut stats: Vec<CategoryStat> = present_categories(products)
        .into_iter()
        .filter_map(|category| {
            let members: Vec<&ClassifiedProduct> =
                products.iter().filter(|p| p.category == category).collect();
            Some(CategoryStat {
                category,
                products: members.len(),
                mean_reviews: mean(members.iter().filter_map(|p| p.product.reviews.map(|r| r as f64))),
                mean_rating: mean(members.iter().filter_map(|p| p.product.rating)),
                mean_price: mean(members.iter().map(|p| p.product.price))?,
                norm_reviews: None,
                norm_rating: None,
                engagement_score: 0.0,
            })
        })
        .collect();

    let reviews: Vec<Option<f64>> = stats.iter().map(|s| s.mean_reviews).collect();
    let ratings: Vec<Option<f64>> = stats.iter().map(|s| s.mean_rating).collect();
    let norm_reviews = min_max_normalize(&reviews);
    let norm_ratings = min_max_normalize(&ratings);

    for ((stat, nr), nt) in stats.iter_mut().zip(norm_reviews).zip(norm_ratings) {
        stat.norm_reviews = nr;
        stat.norm_rating = nt;
        // an absent normalized mean contributes nothing to the score
        stat.engagement_score = scoring.reviews_weight * nr.unwrap_or(0.0)
            + scoring.rating_weight * nt.unwrap_or(0.0);
    }

    stats.sort_by(rank_order);
    stats
}

/// Categories that have at least one product, in priority order.
fn present_categories(products: &[ClassifiedProduct]) -> Vec<Category> {
    Category::ALL
        .into_iter()
        .filter(|c| products.iter().any(|p| p.category == *c))
        .collect()
}

/// Rescale present values into `[0, 1]` using the min and max among them.
/// When every present value is equal, each maps to `1.0`. Absent stays absent.
pub fn min_max_normalize(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let present = values.iter().flatten().copied();
    let min = present.clone().reduce(f64::min);
    let max = present.reduce(f64::max);

    let (min, max) = match (min, max) {
        (Some(min), Some(max)) => (min, max),
        _ => return values.to_vec(),
    };

    values
        .iter()
        .map(|v| {
            v.map(|v| {
                if max == min {
                    1.0
                } else {
                    (v - min) / (max - min)
                }
            })
        })
        .collect()
}

/// Engagement score descending, then label ascending.
pub fn rank_order(a: &CategoryStat, b: &CategoryStat) -> Ordering {
    b.engagement_score
        .total_cmp(&a.engagement_score)
        .then_with(|| a.category.label().cmp(b.category.label()))
}
