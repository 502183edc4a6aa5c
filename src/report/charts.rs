use std::path::{Path, PathBuf};

use anyhow::Result;
use plotters::prelude::*;

use crate::models::{Analysis, CategoryStat, ClassifiedProduct, PriceSpread};

pub const ENGAGEMENT_PNG: &str = "engagement_by_category.png";
pub const HEATMAP_PNG: &str = "norm_heatmap.png";
pub const BOXPLOT_PNG: &str = "price_boxplot.png";

const SIZE: (u32, u32) = (1000, 600);
const FONT: &str = "sans-serif";

const ACCENT: RGBColor = RGBColor(51, 117, 242);
const ACCENT_PUR: RGBColor = RGBColor(133, 77, 242);
const PALE: RGBColor = RGBColor(236, 241, 252);
const MISSING: RGBColor = RGBColor(214, 218, 226);
const OUTLIER: RGBColor = RGBColor(194, 23, 33);

/// Paths of the rendered chart images.
#[derive(Debug, Clone)]
pub struct ChartSet {
    pub engagement: PathBuf,
    pub heatmap: PathBuf,
    pub boxplot: PathBuf,
}

impl ChartSet {
    pub fn paths(&self) -> [&Path; 3] {
        [&self.engagement, &self.heatmap, &self.boxplot]
    }
}

/// Render every chart into `out_dir`. Returns `None` when there is nothing to
/// plot (no categories survived).
pub fn render_all(analysis: &Analysis, out_dir: &Path) -> Result<Option<ChartSet>> {
    if analysis.stats.is_empty() {
        tracing::warn!("no categories to chart");
        return Ok(None);
    }

    let charts = ChartSet {
        engagement: out_dir.join(ENGAGEMENT_PNG),
        heatmap: out_dir.join(HEATMAP_PNG),
        boxplot: out_dir.join(BOXPLOT_PNG),
    };

    engagement_bars(&analysis.stats, &charts.engagement)?;
    norm_heatmap(&analysis.stats, &charts.heatmap)?;
    price_boxplot(
        &analysis.price_spreads,
        &analysis.products,
        analysis.price_reviews_correlation,
        &charts.boxplot,
    )?;

    tracing::debug!(dir = %out_dir.display(), "charts rendered");
    Ok(Some(charts))
}

/// Axis range with `n` segments; integer ranges are inclusive once segmented.
fn slots(n: usize) -> std::ops::Range<usize> {
    0..n.saturating_sub(1)
}

/// Category labels for a segmented axis, listed bottom-to-top so that the
/// first entry of `labels` ends up at the top.
fn flipped<'a>(labels: &'a [String]) -> impl Fn(&SegmentValue<usize>) -> String + 'a {
    move |v| match v {
        SegmentValue::CenterOf(i) if *i < labels.len() => labels[labels.len() - 1 - *i].clone(),
        _ => String::new(),
    }
}

/// Horizontal bar chart of engagement score, best category on top.
pub fn engagement_bars(stats: &[CategoryStat], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = stats.len();
    let labels: Vec<String> = stats.iter().map(|s| s.category.to_string()).collect();
    let label_fmt = flipped(&labels);

    let mut chart = ChartBuilder::on(&root)
        .caption("Engagement score by category", (FONT, 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(170)
        .build_cartesian_2d(0f64..1.1f64, slots(n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .y_labels(n)
        .y_label_formatter(&label_fmt)
        .x_desc("0.6 × norm reviews + 0.4 × norm rating")
        .draw()?;

    chart.draw_series(stats.iter().enumerate().map(|(i, s)| {
        let row = n - 1 - i;
        let mut bar = Rectangle::new(
            [
                (0.0, SegmentValue::Exact(row)),
                (s.engagement_score, SegmentValue::Exact(row + 1)),
            ],
            ACCENT.mix(0.85).filled(),
        );
        bar.set_margin(6, 6, 0, 0);
        bar
    }))?;

    chart.draw_series(stats.iter().enumerate().map(|(i, s)| {
        Text::new(
            format!("{:.3}", s.engagement_score),
            (s.engagement_score + 0.01, SegmentValue::CenterOf(n - 1 - i)),
            (FONT, 15).into_font(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Linear blend from `PALE` (0.0) through `ACCENT` to `ACCENT_PUR` (1.0).
fn heat_color(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8, t: f64| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    let (from, to, t) = if t < 0.5 {
        (PALE, ACCENT, t * 2.0)
    } else {
        (ACCENT, ACCENT_PUR, (t - 0.5) * 2.0)
    };
    RGBColor(lerp(from.0, to.0, t), lerp(from.1, to.1, t), lerp(from.2, to.2, t))
}

/// Category × {norm reviews, norm rating} heatmap; absent values are grey.
pub fn norm_heatmap(stats: &[CategoryStat], path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = stats.len();
    let labels: Vec<String> = stats.iter().map(|s| s.category.to_string()).collect();
    let label_fmt = flipped(&labels);
    let columns = ["norm reviews", "norm rating"];

    let mut chart = ChartBuilder::on(&root)
        .caption("Normalized reviews vs rating", (FONT, 28))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(170)
        .build_cartesian_2d(slots(2).into_segmented(), slots(n).into_segmented())?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_labels(2)
        .y_labels(n)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) if *i < columns.len() => columns[*i].to_string(),
            _ => String::new(),
        })
        .y_label_formatter(&label_fmt)
        .draw()?;

    let cells: Vec<(usize, usize, Option<f64>)> = stats
        .iter()
        .enumerate()
        .flat_map(|(i, s)| {
            let row = n - 1 - i;
            [(0, row, s.norm_reviews), (1, row, s.norm_rating)]
        })
        .collect();

    chart.draw_series(cells.iter().map(|(col, row, value)| {
        let color = value.map(heat_color).unwrap_or(MISSING);
        let mut cell = Rectangle::new(
            [
                (SegmentValue::Exact(*col), SegmentValue::Exact(*row)),
                (SegmentValue::Exact(col + 1), SegmentValue::Exact(row + 1)),
            ],
            color.filled(),
        );
        cell.set_margin(2, 2, 2, 2);
        cell
    }))?;

    chart.draw_series(cells.iter().map(|(col, row, value)| {
        let text = value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "n/a".to_string());
        let color = if value.unwrap_or(0.0) > 0.4 { &WHITE } else { &BLACK };
        Text::new(
            text,
            (SegmentValue::CenterOf(*col), SegmentValue::CenterOf(*row)),
            (FONT, 16).into_font().color(color),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Price boxplot per category on a log axis. Whiskers stop at the Tukey
/// fences; prices beyond them are drawn as points.
pub fn price_boxplot(
    spreads: &[PriceSpread],
    products: &[ClassifiedProduct],
    correlation: Option<f64>,
    path: &Path,
) -> Result<()> {
    let root = BitMapBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = spreads.len().max(1);
    let labels: Vec<String> = spreads.iter().map(|s| s.category.to_string()).collect();

    // log axis needs a strictly positive floor
    let floor = spreads
        .iter()
        .map(|s| s.min)
        .filter(|v| *v > 0.0)
        .fold(f64::INFINITY, f64::min);
    let floor = if floor.is_finite() { floor / 1.5 } else { 1.0 };
    let ceil = spreads.iter().map(|s| s.max).fold(floor * 10.0, f64::max) * 1.5;
    let clamp = |v: f64| v.max(floor);

    let caption = match correlation {
        Some(r) => format!("Price by category (price/reviews r = {:.3})", r),
        None => "Price by category".to_string(),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, (FONT, 28))
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(slots(n).into_segmented(), (floor..ceil).log_scale())?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(n)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) if *i < labels.len() => labels[*i].clone(),
            _ => String::new(),
        })
        .x_label_style((FONT, 12))
        .y_desc("price (log scale)")
        .draw()?;

    for (i, spread) in spreads.iter().enumerate() {
        let low = clamp(spread.min.max(spread.lower_fence));
        let high = clamp(spread.max.min(spread.upper_fence));

        chart.draw_series(std::iter::once(PathElement::new(
            vec![
                (SegmentValue::CenterOf(i), low),
                (SegmentValue::CenterOf(i), high),
            ],
            BLACK.stroke_width(1),
        )))?;

        let mut body = Rectangle::new(
            [
                (SegmentValue::Exact(i), clamp(spread.q1)),
                (SegmentValue::Exact(i + 1), clamp(spread.q3)),
            ],
            ACCENT.mix(0.6).filled(),
        );
        body.set_margin(0, 0, 18, 18);
        chart.draw_series(std::iter::once(body))?;

        let mut median = Rectangle::new(
            [
                (SegmentValue::Exact(i), clamp(spread.median)),
                (SegmentValue::Exact(i + 1), clamp(spread.median)),
            ],
            BLACK.stroke_width(2),
        );
        median.set_margin(0, 0, 18, 18);
        chart.draw_series(std::iter::once(median))?;

        chart.draw_series(
            products
                .iter()
                .filter(|p| p.category == spread.category)
                .map(|p| p.product.price)
                .filter(|price| *price < spread.lower_fence || *price > spread.upper_fence)
                .map(|price| Circle::new((SegmentValue::CenterOf(i), clamp(price)), 3, OUTLIER.filled())),
        )?;
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pipeline::{self, loader};

    fn analysis(csv: &str) -> Analysis {
        let config = Config::default();
        let records = loader::parse_records(csv, b',', &config.columns).unwrap();
        pipeline::analyze(&records, &config).unwrap()
    }

    fn assert_rendered(charts: &ChartSet) {
        for path in charts.paths() {
            let size = std::fs::metadata(path).unwrap().len();
            assert!(size > 0, "{} is empty", path.display());
        }
    }

    #[test]
    fn test_render_all_two_categories() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = analysis(
            "id,product_name,price,reviews_count,avg_rate\n\
             1,NIVEA Antiperspirant Spray,EGP 100.00,10 verified ratings,4/5\n\
             2,Garnier Micellar Water,EGP 200.00 - EGP 300.00,30 verified ratings,5/5\n\
             3,Xiaomi Redmi 12 Smartphone,EGP 5000,100 verified ratings,3.5/5\n\
             4,Samsung Galaxy Tablet,EGP 7000,no reviews,4.5/5\n",
        );
        let charts = render_all(&analysis, dir.path()).unwrap().unwrap();

        assert_eq!(charts.engagement, dir.path().join(ENGAGEMENT_PNG));
        assert_eq!(charts.heatmap, dir.path().join(HEATMAP_PNG));
        assert_eq!(charts.boxplot, dir.path().join(BOXPLOT_PNG));
        assert_rendered(&charts);
    }

    #[test]
    fn test_render_all_single_category() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = analysis(
            "id,product_name,price,reviews_count,avg_rate\n\
             1,Tornado Air Fryer,EGP 2500,12 ratings,4/5\n",
        );
        assert_eq!(analysis.stats.len(), 1);

        let charts = render_all(&analysis, dir.path()).unwrap().unwrap();
        assert_rendered(&charts);
    }

    #[test]
    fn test_render_all_without_categories() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = analysis("id,product_name,price,reviews_count,avg_rate\n1,Mug,,,\n");
        assert!(render_all(&analysis, dir.path()).unwrap().is_none());
        assert!(!dir.path().join(ENGAGEMENT_PNG).exists());
    }

    #[test]
    fn test_heat_color_endpoints() {
        assert_eq!(heat_color(0.0), PALE);
        assert_eq!(heat_color(0.5), ACCENT);
        assert_eq!(heat_color(1.0), ACCENT_PUR);
        assert_eq!(heat_color(7.0), ACCENT_PUR);
    }

    #[test]
    fn test_flipped_labels_put_first_on_top() {
        let labels = vec!["Top".to_string(), "Middle".to_string(), "Bottom".to_string()];
        let fmt = flipped(&labels);
        assert_eq!(fmt(&SegmentValue::CenterOf(2)), "Top");
        assert_eq!(fmt(&SegmentValue::CenterOf(0)), "Bottom");
        assert_eq!(fmt(&SegmentValue::Exact(1)), "");
        assert_eq!(fmt(&SegmentValue::CenterOf(9)), "");
    }
}
