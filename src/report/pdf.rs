use std::path::Path;

use anyhow::{Context, Result};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage};
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, ColorBits, ColorSpace, Image, ImageFilter, ImageTransform, ImageXObject,
    IndirectFontRef, Line, Mm, PdfDocument, PdfDocumentReference, PdfLayerIndex,
    PdfLayerReference, PdfPageIndex, Point, Polygon, Px, Rgb,
};

use crate::models::{Analysis, CategoryStat};
use crate::report::charts::ChartSet;

pub const REPORT_PDF: &str = "shelf-scan-report.pdf";

const PAGE_W: f32 = 210.0;
const PAGE_H: f32 = 297.0;
const MARGIN: f32 = 18.0;
const COVER_HDR_H: f32 = 72.0;
const T_END: f32 = PAGE_W - MARGIN;

// ── Palette ───────────────────────────────────────────────────────────────────
const BG:           (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const PANEL_ALT:    (f32, f32, f32) = (0.95, 0.96, 0.99);
const PANEL_BORDER: (f32, f32, f32) = (0.85, 0.87, 0.92);
const ACCENT_BLU:   (f32, f32, f32) = (0.20, 0.46, 0.95);
const ACCENT_PUR:   (f32, f32, f32) = (0.52, 0.30, 0.95);
const TEXT_PRI:     (f32, f32, f32) = (0.07, 0.08, 0.14);
const TEXT_SEC:     (f32, f32, f32) = (0.36, 0.40, 0.52);
const TEXT_MUT:     (f32, f32, f32) = (0.58, 0.63, 0.72);
const WHITE:        (f32, f32, f32) = (1.00, 1.00, 1.00);
const WHITE_DIM:    (f32, f32, f32) = (0.82, 0.89, 1.00);

const HIGH_BG: (f32, f32, f32) = (0.90, 0.98, 0.92);
const HIGH_FG: (f32, f32, f32) = (0.07, 0.52, 0.22);
const MID_BG:  (f32, f32, f32) = (1.00, 0.95, 0.87);
const MID_FG:  (f32, f32, f32) = (0.70, 0.40, 0.02);
const LOW_BG:  (f32, f32, f32) = (1.00, 0.91, 0.91);
const LOW_FG:  (f32, f32, f32) = (0.76, 0.09, 0.13);

const R_BADGE: f32 = 1.5;
const JPEG_QUALITY: u8 = 90;

/// Render the PDF report: cover → ranked category table → chart pages.
pub fn render(analysis: &Analysis, input: &Path, charts: &ChartSet, output_path: &Path) -> Result<()> {
    let input_name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("products.csv");

    let doc = PdfDocument::empty("Category Engagement Report");

    add_cover_page(&doc, analysis, input_name)?;
    add_ranking_pages(&doc, &analysis.stats)?;
    add_chart_page(
        &doc,
        "Engagement",
        &[
            (charts.engagement.as_path(), "Engagement score per category"),
            (charts.heatmap.as_path(), "Normalized mean reviews and rating"),
        ],
    )?;
    add_chart_page(
        &doc,
        "Prices",
        &[(charts.boxplot.as_path(), "Price distribution with Tukey outliers")],
    )?;

    let bytes = doc.save_to_bytes()?;
    std::fs::write(output_path, &bytes)
        .with_context(|| format!("Failed to write PDF to {}", output_path.display()))?;

    tracing::debug!(path = %output_path.display(), bytes = bytes.len(), "pdf written");
    Ok(())
}

// ── Cover page ────────────────────────────────────────────────────────────────

fn add_cover_page(doc: &PdfDocumentReference, analysis: &Analysis, input_name: &str) -> Result<()> {
    let (page_idx, layer_idx) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Cover");
    let layer = doc.get_page(page_idx).get_layer(layer_idx);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    let hdr_bot = PAGE_H - COVER_HDR_H;
    fill_gradient_h(&layer, 0.0, hdr_bot, PAGE_W, COVER_HDR_H, ACCENT_BLU, ACCENT_PUR, 28);

    set_color(&layer, WHITE_DIM);
    layer.use_text(
        format!("shelf-scan v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(PAGE_W - MARGIN - 30.0), Mm(PAGE_H - 10.5), &font_r,
    );

    set_color(&layer, WHITE);
    layer.use_text("Category Engagement", 28.0, Mm(MARGIN), Mm(PAGE_H - 26.0), &font_b);
    set_color(&layer, WHITE_DIM);
    layer.use_text("Report", 28.0, Mm(MARGIN), Mm(PAGE_H - 41.0), &font_b);

    // Input chip
    let chip_y = hdr_bot - 18.0;
    let chip_h = 12.0f32;
    let chip_w = 106.0f32;
    fill_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL);
    stroke_rounded_rect(&layer, MARGIN, chip_y, chip_w, chip_h, R_BADGE, PANEL_BORDER);
    fill_rect(&layer, MARGIN, chip_y, 2.5, chip_h, ACCENT_BLU);

    set_color(&layer, TEXT_MUT);
    layer.use_text("INPUT", 6.0, Mm(MARGIN + 5.0), Mm(chip_y + chip_h - 3.8), &font_b);
    set_color(&layer, TEXT_PRI);
    layer.use_text(truncate(input_name, 34), 9.5, Mm(MARGIN + 5.0), Mm(chip_y + 2.8), &font_b);

    let rule_y = chip_y - 16.5;
    draw_hline(&layer, MARGIN, T_END, rule_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("OVERVIEW", 6.5, Mm(MARGIN), Mm(rule_y - 7.0), &font_b);

    // Stat cards
    let card_y = rule_y - 42.0;
    let card_h = 26.0f32;
    let gap = 4.0f32;
    let card_w = (T_END - MARGIN - gap * 3.0) / 4.0;

    let cards: [(&str, String, (f32, f32, f32)); 4] = [
        ("ROWS READ",  analysis.rows_read.to_string(),      ACCENT_BLU),
        ("KEPT",       analysis.products.len().to_string(), HIGH_FG),
        ("DROPPED",    analysis.dropped.len().to_string(),  LOW_FG),
        ("CATEGORIES", analysis.stats.len().to_string(),    ACCENT_PUR),
    ];

    for (i, (label, value, accent)) in cards.iter().enumerate() {
        let cx = MARGIN + (card_w + gap) * i as f32;
        draw_stat_card(&layer, cx, card_y, card_w, card_h, label, value, *accent, &font_r, &font_b);
    }

    // Highlights
    let section_y = card_y - 13.0;
    draw_hline(&layer, MARGIN, T_END, section_y, PANEL_BORDER);
    set_color(&layer, TEXT_MUT);
    layer.use_text("HIGHLIGHTS", 6.5, Mm(MARGIN), Mm(section_y - 7.5), &font_b);

    let mut items: Vec<(String, String)> = Vec::new();
    if let Some(top) = analysis.stats.first() {
        items.push((
            "Most engaged category".to_string(),
            format!("{} (score {:.3})", top.category, top.engagement_score),
        ));
    }
    items.push((
        "Price vs review count".to_string(),
        match analysis.price_reviews_correlation {
            Some(r) => format!("Pearson r = {:.3} across {} products", r, analysis.products.len()),
            None => "Not enough data for a correlation".to_string(),
        },
    ));
    for spread in analysis.price_spreads.iter().filter(|s| s.outliers > 0) {
        items.push((
            format!("{} prices", spread.category),
            format!(
                "{} of {} above/below the fences ({:.2} to {:.2})",
                spread.outliers, spread.count, spread.lower_fence, spread.upper_fence
            ),
        ));
    }

    const MAX_ITEMS: usize = 8;
    for (j, (title, desc)) in items.iter().take(MAX_ITEMS).enumerate() {
        let iy = section_y - 15.0 - j as f32 * 10.0;
        fill_rounded_rect(&layer, MARGIN, iy + 2.0, 2.0, 2.0, 1.0, ACCENT_BLU);
        set_color(&layer, TEXT_PRI);
        layer.use_text(title.as_str(), 8.5, Mm(MARGIN + 5.0), Mm(iy + 2.0), &font_b);
        set_color(&layer, TEXT_SEC);
        layer.use_text(truncate(desc, 90), 8.0, Mm(MARGIN + 5.0), Mm(iy - 3.5), &font_r);
    }

    draw_footer(&layer, &font_r);
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn draw_stat_card(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    label: &str,
    value: &str,
    accent: (f32, f32, f32),
    font_r: &IndirectFontRef,
    font_b: &IndirectFontRef,
) {
    fill_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL);
    stroke_rounded_rect(layer, x, y, w, h, R_BADGE, PANEL_BORDER);
    fill_rect(layer, x, y + h - 2.0, w, 2.0, accent);

    set_color(layer, accent);
    layer.use_text(value, 20.0, Mm(x + 5.0), Mm(y + h * 0.38), font_b);

    set_color(layer, TEXT_MUT);
    layer.use_text(label, 6.5, Mm(x + 5.0), Mm(y + 3.5), font_r);
}

fn draw_footer(layer: &PdfLayerReference, font_r: &IndirectFontRef) {
    draw_hline(layer, MARGIN, T_END, 22.0, PANEL_BORDER);
    set_color(layer, TEXT_MUT);
    layer.use_text(
        format!("Generated by shelf-scan v{}", env!("CARGO_PKG_VERSION")),
        7.5, Mm(MARGIN), Mm(15.0), font_r,
    );
}

// ── Ranked category table ─────────────────────────────────────────────────────

/// Badge colors for an engagement score, same tiers as the terminal table.
fn score_tier(score: f64) -> ((f32, f32, f32), (f32, f32, f32)) {
    if score >= 0.66 {
        (HIGH_FG, HIGH_BG)
    } else if score >= 0.33 {
        (MID_FG, MID_BG)
    } else {
        (LOW_FG, LOW_BG)
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    match value {
        Some(v) => format!("{:.*}", precision, v),
        None => "n/a".to_string(),
    }
}

fn add_ranking_pages(doc: &PdfDocumentReference, stats: &[CategoryStat]) -> Result<()> {
    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    const ROW_H: f32 = 8.0;
    const HDR_Y: f32 = 268.5;
    const FIRST_Y: f32 = 259.5;
    const BOT_MARGIN: f32 = 25.0;

    //  #   CATEGORY   PRODUCTS  REVIEWS  RATING  PRICE   NORM R  NORM ★  SCORE
    let col_x = [
        MARGIN,
        MARGIN + 8.0,
        MARGIN + 52.0,
        MARGIN + 70.0,
        MARGIN + 88.0,
        MARGIN + 104.0,
        MARGIN + 126.0,
        MARGIN + 140.0,
        MARGIN + 154.0,
    ];
    let headers = [
        "#", "CATEGORY", "PRODUCTS", "REVIEWS", "RATING", "MEAN PRICE", "N.REV", "N.RATE", "SCORE",
    ];

    let mut cur_y = FIRST_Y;
    let mut page_state: Option<(PdfPageIndex, PdfLayerIndex)> = None;
    let mut page_num: u32 = 0;

    for (row_idx, stat) in stats.iter().enumerate() {
        let (pi, li) = match page_state.filter(|_| cur_y - ROW_H >= BOT_MARGIN) {
            Some(state) => state,
            None => {
                page_num += 1;
                let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Ranking");
                let layer = doc.get_page(pi).get_layer(li);

                fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
                fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_BLU, ACCENT_PUR, 21);

                set_color(&layer, TEXT_PRI);
                layer.use_text("Categories by Engagement", 14.0, Mm(MARGIN), Mm(282.5), &font_b);
                set_color(&layer, TEXT_MUT);
                layer.use_text(
                    format!("Page {}", page_num),
                    8.0, Mm(T_END - 14.0), Mm(283.0), &font_r,
                );
                draw_hline(&layer, MARGIN, T_END, 277.5, PANEL_BORDER);

                fill_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL);
                stroke_rounded_rect(&layer, MARGIN, HDR_Y - 7.5, T_END - MARGIN, 9.5, R_BADGE, PANEL_BORDER);
                set_color(&layer, TEXT_MUT);
                for (x, h) in col_x.iter().zip(headers) {
                    layer.use_text(h, 6.5, Mm(x + 1.5), Mm(HDR_Y - 4.0), &font_b);
                }

                draw_footer(&layer, &font_r);

                cur_y = FIRST_Y;
                page_state = Some((pi, li));
                (pi, li)
            }
        };
        let layer = doc.get_page(pi).get_layer(li);

        if row_idx % 2 == 0 {
            fill_rect(&layer, MARGIN, cur_y - ROW_H + 1.5, T_END - MARGIN, ROW_H, PANEL_ALT);
        }

        let text_y = cur_y - 4.5;
        let cells = [
            stat.products.to_string(),
            fmt_opt(stat.mean_reviews, 1),
            fmt_opt(stat.mean_rating, 2),
            format!("{:.2}", stat.mean_price),
            fmt_opt(stat.norm_reviews, 3),
            fmt_opt(stat.norm_rating, 3),
        ];

        set_color(&layer, TEXT_MUT);
        layer.use_text((row_idx + 1).to_string(), 8.0, Mm(col_x[0] + 1.5), Mm(text_y), &font_b);
        set_color(&layer, TEXT_PRI);
        layer.use_text(
            truncate(stat.category.label(), 24),
            8.0, Mm(col_x[1] + 1.5), Mm(text_y), &font_r,
        );
        set_color(&layer, TEXT_SEC);
        for (x, text) in col_x[2..8].iter().zip(cells) {
            layer.use_text(text, 8.0, Mm(x + 1.5), Mm(text_y), &font_r);
        }

        let (fg, bg) = score_tier(stat.engagement_score);
        let badge_x = col_x[8] + 1.0;
        let badge_y = cur_y - ROW_H + 2.4;
        fill_rounded_rect(&layer, badge_x, badge_y, 16.0, 5.0, R_BADGE, bg);
        set_color(&layer, fg);
        layer.use_text(
            format!("{:.3}", stat.engagement_score),
            7.5, Mm(badge_x + 2.5), Mm(badge_y + 1.3), &font_b,
        );

        draw_hline(&layer, MARGIN, T_END, cur_y - ROW_H + 1.5, PANEL_BORDER);
        cur_y -= ROW_H;
    }

    Ok(())
}

// ── Chart pages ───────────────────────────────────────────────────────────────

/// One page holding up to two stacked chart images scaled to the text width.
fn add_chart_page(doc: &PdfDocumentReference, title: &str, charts: &[(&Path, &str)]) -> Result<()> {
    let (pi, li) = doc.add_page(Mm(PAGE_W), Mm(PAGE_H), title);
    let layer = doc.get_page(pi).get_layer(li);

    let font_b = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
    let font_r = doc.add_builtin_font(BuiltinFont::Helvetica)?;

    fill_rect(&layer, 0.0, 0.0, PAGE_W, PAGE_H, BG);
    fill_gradient_h(&layer, 0.0, PAGE_H - 2.5, PAGE_W, 2.5, ACCENT_BLU, ACCENT_PUR, 21);

    set_color(&layer, TEXT_PRI);
    layer.use_text(title, 14.0, Mm(MARGIN), Mm(282.5), &font_b);
    draw_hline(&layer, MARGIN, T_END, 277.5, PANEL_BORDER);

    let width_mm = T_END - MARGIN;
    let mut top = 270.0f32;

    for (path, caption) in charts {
        let dynamic = image::open(path)
            .with_context(|| format!("Failed to read chart {}", path.display()))?;
        let chart = jpeg_xobject(&dynamic)
            .with_context(|| format!("Failed to encode chart {}", path.display()))?;
        let dpi = chart.width.0 as f32 * 25.4 / width_mm;
        let height_mm = chart.height.0 as f32 * 25.4 / dpi;

        set_color(&layer, TEXT_SEC);
        layer.use_text(*caption, 8.5, Mm(MARGIN), Mm(top - 4.0), &font_b);

        let bottom = top - 7.0 - height_mm;
        Image::from(chart).add_to_layer(
            layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(MARGIN)),
                translate_y: Some(Mm(bottom)),
                dpi: Some(dpi),
                ..Default::default()
            },
        );
        stroke_rounded_rect(&layer, MARGIN, bottom, width_mm, height_mm, R_BADGE, PANEL_BORDER);

        top = bottom - 8.0;
    }

    draw_footer(&layer, &font_r);
    Ok(())
}

/// Re-encode a chart as a baseline JPEG stream. printpdf only deflates raw
/// pixel streams in release builds, so raw RGB would bloat debug-built reports.
fn jpeg_xobject(image: &DynamicImage) -> Result<ImageXObject> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut data = Vec::new();
    JpegEncoder::new_with_quality(&mut data, JPEG_QUALITY)
        .encode(rgb.as_raw(), width, height, ColorType::Rgb8)?;

    Ok(ImageXObject {
        width: Px(width as usize),
        height: Px(height as usize),
        color_space: ColorSpace::Rgb,
        bits_per_component: ColorBits::Bit8,
        interpolate: true,
        image_data: data,
        image_filter: Some(ImageFilter::DCT),
        smask: None,
        clipping_bbox: None,
    })
}

// ── Drawing helpers ───────────────────────────────────────────────────────────

fn rgb((r, g, b): (f32, f32, f32)) -> Color {
    Color::Rgb(Rgb { r, g, b, icc_profile: None })
}

fn set_color(layer: &PdfLayerReference, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
}

fn fill_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![vec![
            (Point::new(Mm(x),     Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y)),     false),
            (Point::new(Mm(x + w), Mm(y + h)), false),
            (Point::new(Mm(x),     Mm(y + h)), false),
        ]],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

/// Clockwise ring approximating a rounded rectangle, 8 segments per corner.
fn rounded_rect_ring(x: f32, y: f32, w: f32, h: f32, r: f32) -> Vec<(Point, bool)> {
    let r = r.min(w / 2.0).min(h / 2.0);
    const SEGS: usize = 8;
    let mut pts = Vec::with_capacity(4 * (SEGS + 1));

    let corners = [
        (x + w - r, y + r,     270.0f32, 360.0f32),
        (x + w - r, y + h - r, 0.0f32,   90.0f32),
        (x + r,     y + h - r, 90.0f32,  180.0f32),
        (x + r,     y + r,     180.0f32, 270.0f32),
    ];

    for (cx, cy, start, end) in &corners {
        for i in 0..=SEGS {
            let t = i as f32 / SEGS as f32;
            let angle = (start + (end - start) * t).to_radians();
            pts.push((Point::new(Mm(cx + r * angle.cos()), Mm(cy + r * angle.sin())), false));
        }
    }
    pts
}

fn fill_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                     r: f32, color: (f32, f32, f32)) {
    layer.set_fill_color(rgb(color));
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Fill,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_fill_color(rgb((0.0, 0.0, 0.0)));
}

fn stroke_rounded_rect(layer: &PdfLayerReference, x: f32, y: f32, w: f32, h: f32,
                       r: f32, color: (f32, f32, f32)) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.4);
    layer.add_polygon(Polygon {
        rings: vec![rounded_rect_ring(x, y, w, h, r)],
        mode: PaintMode::Stroke,
        winding_order: WindingOrder::NonZero,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

fn draw_hline(layer: &PdfLayerReference, x1: f32, x2: f32, y: f32, color: (f32, f32, f32)) {
    layer.set_outline_color(rgb(color));
    layer.set_outline_thickness(0.3);
    layer.add_line(Line {
        points: vec![
            (Point::new(Mm(x1), Mm(y)), false),
            (Point::new(Mm(x2), Mm(y)), false),
        ],
        is_closed: false,
    });
    layer.set_outline_color(rgb((0.0, 0.0, 0.0)));
    layer.set_outline_thickness(1.0);
}

/// Left-to-right gradient made of `steps` vertical strips.
#[allow(clippy::too_many_arguments)]
fn fill_gradient_h(
    layer: &PdfLayerReference,
    x: f32, y: f32, w: f32, h: f32,
    from: (f32, f32, f32),
    to: (f32, f32, f32),
    steps: usize,
) {
    let step_w = w / steps as f32;
    for i in 0..steps {
        let t = i as f32 / (steps - 1).max(1) as f32;
        let color = (
            from.0 + (to.0 - from.0) * t,
            from.1 + (to.1 - from.1) * t,
            from.2 + (to.2 - from.2) * t,
        );
        // strips overlap to hide rounding gaps
        fill_rect(layer, x + i as f32 * step_w, y, step_w + 0.6, h, color);
    }
}

fn truncate(s: &str, max: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() > max {
        format!("{}…", chars[..max - 1].iter().collect::<String>())
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::pipeline::{self, loader};
    use crate::report::charts;

    const PRODUCTS: &str = "\
id,product_name,price,reviews_count,avg_rate
1,NIVEA Antiperspirant Spray for Women,EGP 100.00,10 verified ratings,4/5
2,Garnier Micellar Water,EGP 200.00 - EGP 300.00,30 verified ratings,5/5
3,Xiaomi Redmi 12 Smartphone,\"EGP 5,000.00\",100 verified ratings,3.5/5
4,Samsung Galaxy Tablet,EGP 7000,no reviews,4.5/5
";

    fn analysis() -> Analysis {
        let config = Config::default();
        let records = loader::parse_records(PRODUCTS, b',', &config.columns).unwrap();
        pipeline::analyze(&records, &config).unwrap()
    }

    #[test]
    fn test_render_report() {
        let dir = tempfile::tempdir().unwrap();
        let analysis = analysis();
        let chart_set = charts::render_all(&analysis, dir.path()).unwrap().unwrap();

        let path = dir.path().join(REPORT_PDF);
        render(&analysis, Path::new("products.csv"), &chart_set, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        // three 1000x600 charts as raw RGB would be over 5 MB
        assert!(bytes.len() < 2_000_000, "report is {} bytes", bytes.len());
    }

    #[test]
    fn test_charts_are_embedded_as_jpeg() {
        let image = DynamicImage::new_rgb8(40, 20);
        let chart = jpeg_xobject(&image).unwrap();
        assert_eq!(chart.width.0, 40);
        assert_eq!(chart.height.0, 20);
        assert!(matches!(chart.image_filter, Some(ImageFilter::DCT)));
        assert!(chart.image_data.starts_with(&[0xFF, 0xD8]));
        assert!(chart.image_data.len() < 40 * 20 * 3);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Phones & Tablets", 24), "Phones & Tablets");
        assert_eq!(truncate("Television & Audio", 10), "Televisio…");
    }

    #[test]
    fn test_score_tiers() {
        assert_eq!(score_tier(0.9), (HIGH_FG, HIGH_BG));
        assert_eq!(score_tier(0.4), (MID_FG, MID_BG));
        assert_eq!(score_tier(0.0), (LOW_FG, LOW_BG));
    }

    #[test]
    fn test_fmt_opt() {
        assert_eq!(fmt_opt(Some(4.26), 1), "4.3");
        assert_eq!(fmt_opt(None, 1), "n/a");
    }
}
