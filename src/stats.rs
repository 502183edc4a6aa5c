//! Small descriptive-statistics helpers shared by the normalizer, the
//! aggregator and the price-quality checks.

use crate::models::{Category, ClassifiedProduct, PriceSpread};

/// Arithmetic mean, `None` for an empty iterator.
pub fn mean<I>(values: I) -> Option<f64>
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

pub fn median(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    quantile_sorted(&sorted, 0.5)
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Quantile of already-sorted data, linearly interpolated between closest ranks.
fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quartiles {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl Quartiles {
    pub fn new(values: &[f64]) -> Option<Self> {
        let sorted = sorted(values);
        Some(Quartiles {
            min: *sorted.first()?,
            q1: quantile_sorted(&sorted, 0.25)?,
            median: quantile_sorted(&sorted, 0.5)?,
            q3: quantile_sorted(&sorted, 0.75)?,
            max: *sorted.last()?,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Pearson correlation coefficient. `None` for fewer than two pairs or when
/// either side has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    let n = xs.len().min(ys.len());
    if n < 2 {
        return None;
    }
    let mx = mean(xs[..n].iter().copied())?;
    let my = mean(ys[..n].iter().copied())?;

    let (mut cov, mut vx, mut vy) = (0.0, 0.0, 0.0);
    for (x, y) in xs[..n].iter().zip(&ys[..n]) {
        let (dx, dy) = (x - mx, y - my);
        cov += dx * dy;
        vx += dx * dx;
        vy += dy * dy;
    }

    if vx == 0.0 || vy == 0.0 {
        return None;
    }
    Some(cov / (vx.sqrt() * vy.sqrt()))
}

/// Correlation between price and review count over products that have one.
pub fn price_reviews_correlation(products: &[ClassifiedProduct]) -> Option<f64> {
    let (prices, reviews): (Vec<f64>, Vec<f64>) = products
        .iter()
        .filter_map(|p| p.product.reviews.map(|r| (p.product.price, r as f64)))
        .unzip();
    pearson(&prices, &reviews)
}

/// Per-category price quartiles and Tukey-fence outlier counts, in the order
/// categories first appear in `order`. The prices themselves are left as-is.
pub fn price_spreads(
    products: &[ClassifiedProduct],
    order: &[Category],
    iqr_factor: f64,
) -> Vec<PriceSpread> {
    order
        .iter()
        .filter_map(|category| {
            let prices: Vec<f64> = products
                .iter()
                .filter(|p| p.category == *category)
                .map(|p| p.product.price)
                .collect();
            let quartiles = Quartiles::new(&prices)?;
            let lower_fence = quartiles.q1 - iqr_factor * quartiles.iqr();
            let upper_fence = quartiles.q3 + iqr_factor * quartiles.iqr();
            let outliers = prices
                .iter()
                .filter(|p| **p < lower_fence || **p > upper_fence)
                .count();

            Some(PriceSpread {
                category: *category,
                min: quartiles.min,
                q1: quartiles.q1,
                median: quartiles.median,
                q3: quartiles.q3,
                max: quartiles.max,
                lower_fence,
                upper_fence,
                outliers,
                count: prices.len(),
            })
        })
        .collect()
}
