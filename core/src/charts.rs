//! Chart side artifacts, rendered as self-contained SVG.
//!
//! A scoring run writes three figures — the probability histogram, the
//! top-10 probability bar chart, and the income-vs-probability scatter —
//! and a training run writes the confusion heatmap. Nothing downstream
//! consumes these files; they exist for human review next to the report.

use crate::error::PipelineResult;
use crate::types::ScoredRecord;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const HISTOGRAM_FILE: &str = "probability_histogram.svg";
pub const TOP_FILE: &str = "top_fraud_probabilities.svg";
pub const SCATTER_FILE: &str = "income_vs_probability.svg";
pub const CONFUSION_FILE: &str = "confusion_matrix.svg";

const WIDTH: f64 = 640.0;
const HEIGHT: f64 = 400.0;
const MARGIN: f64 = 48.0;

const FRAUD_COLOR: &str = "#d62728";
const LEGIT_COLOR: &str = "#1f77b4";

fn svg_open(title: &str) -> String {
    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{HEIGHT}" viewBox="0 0 {WIDTH} {HEIGHT}">"#
    );
    let _ = write!(
        svg,
        r#"<rect width="{WIDTH}" height="{HEIGHT}" fill="white"/><text x="{x}" y="24" text-anchor="middle" font-family="sans-serif" font-size="16">{title}</text>"#,
        x = WIDTH / 2.0
    );
    // Axis lines.
    let _ = write!(
        svg,
        r#"<line x1="{MARGIN}" y1="{y}" x2="{x2}" y2="{y}" stroke="black"/><line x1="{MARGIN}" y1="{MARGIN}" x2="{MARGIN}" y2="{y}" stroke="black"/>"#,
        y = HEIGHT - MARGIN,
        x2 = WIDTH - MARGIN
    );
    svg
}

/// Distribution of fraud probabilities across the batch, 20 bins over [0, 1].
pub fn probability_histogram(records: &[ScoredRecord]) -> String {
    const BINS: usize = 20;
    let mut counts = [0usize; BINS];
    for record in records {
        let bin = ((record.fraud_probability * BINS as f64) as usize).min(BINS - 1);
        counts[bin] += 1;
    }
    let max_count = counts.iter().copied().max().unwrap_or(0).max(1);

    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;
    let bar_w = plot_w / BINS as f64;

    let mut svg = svg_open("Fraud Probability Distribution");
    for (bin, &count) in counts.iter().enumerate() {
        let bar_h = plot_h * count as f64 / max_count as f64;
        let x = MARGIN + bin as f64 * bar_w;
        let y = HEIGHT - MARGIN - bar_h;
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{bar_h:.1}" fill="{LEGIT_COLOR}" stroke="white"/>"#,
            w = bar_w
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Horizontal bars for the ten records with the highest fraud probability.
pub fn top_probabilities(records: &[ScoredRecord]) -> String {
    let mut ranked: Vec<(usize, f64)> = records
        .iter()
        .enumerate()
        .map(|(index, record)| (index, record.fraud_probability))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked.truncate(10);

    let plot_w = WIDTH - 2.0 * MARGIN - 40.0;
    let plot_h = HEIGHT - 2.0 * MARGIN;
    let row_h = if ranked.is_empty() { plot_h } else { plot_h / ranked.len() as f64 };

    let mut svg = svg_open("Top 10 Records by Fraud Probability");
    for (row, (index, probability)) in ranked.iter().enumerate() {
        let bar_w = plot_w * probability;
        let y = MARGIN + row as f64 * row_h;
        let _ = write!(
            svg,
            r#"<rect x="{x:.1}" y="{y:.1}" width="{bar_w:.1}" height="{h:.1}" fill="{FRAUD_COLOR}" stroke="white"/><text x="{tx:.1}" y="{ty:.1}" font-family="sans-serif" font-size="11">#{index} ({probability:.2})</text>"#,
            x = MARGIN + 40.0,
            h = (row_h - 4.0).max(1.0),
            tx = MARGIN + 44.0 + bar_w,
            ty = y + row_h / 2.0 + 4.0
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Income against fraud probability, colored by the predicted class.
pub fn income_scatter(records: &[ScoredRecord]) -> String {
    const INCOME_LO: f64 = 20_000.0;
    const INCOME_HI: f64 = 120_000.0;

    let plot_w = WIDTH - 2.0 * MARGIN;
    let plot_h = HEIGHT - 2.0 * MARGIN;

    let mut svg = svg_open("Income vs Fraud Probability");
    for record in records {
        let income_frac =
            ((record.income as f64 - INCOME_LO) / (INCOME_HI - INCOME_LO)).clamp(0.0, 1.0);
        let x = MARGIN + plot_w * income_frac;
        let y = HEIGHT - MARGIN - plot_h * record.fraud_probability.clamp(0.0, 1.0);
        let color = if record.is_predicted_fraud == 1 { FRAUD_COLOR } else { LEGIT_COLOR };
        let _ = write!(
            svg,
            r#"<circle cx="{x:.1}" cy="{y:.1}" r="3" fill="{color}" fill-opacity="0.7"/>"#
        );
    }
    svg.push_str("</svg>");
    svg
}

/// 2x2 confusion heatmap: rows are the actual class, columns the predicted
/// class, each cell shaded by its share of the largest count.
pub fn confusion_heatmap(confusion: &[[u64; 2]; 2]) -> String {
    let max_count = confusion.iter().flatten().copied().max().unwrap_or(0).max(1);
    let cell_w = (WIDTH - 2.0 * MARGIN) / 2.0;
    let cell_h = (HEIGHT - 2.0 * MARGIN) / 2.0;
    let labels = ["legit", "fraud"];

    let mut svg = svg_open("Confusion Matrix (rows actual, cols predicted)");
    for (row, counts) in confusion.iter().enumerate() {
        for (col, &count) in counts.iter().enumerate() {
            let x = MARGIN + col as f64 * cell_w;
            let y = MARGIN + row as f64 * cell_h;
            let _ = write!(
                svg,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{cell_w:.1}" height="{cell_h:.1}" fill="{FRAUD_COLOR}" fill-opacity="{opacity:.3}" stroke="black"/><text x="{tx:.1}" y="{ty:.1}" text-anchor="middle" font-family="sans-serif" font-size="14">{actual}/{predicted}: {count}</text>"#,
                opacity = count as f64 / max_count as f64,
                tx = x + cell_w / 2.0,
                ty = y + cell_h / 2.0 + 5.0,
                actual = labels[row],
                predicted = labels[col]
            );
        }
    }
    svg.push_str("</svg>");
    svg
}

/// Render the training-run figure into `dir`, overwriting previous runs.
pub fn render_confusion(dir: &Path, confusion: &[[u64; 2]; 2]) -> PipelineResult<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(CONFUSION_FILE), confusion_heatmap(confusion))?;
    log::info!("wrote confusion heatmap to {}", dir.display());
    Ok(())
}

/// Render all three scoring figures into `dir`, overwriting previous runs.
pub fn render_all(dir: &Path, records: &[ScoredRecord]) -> PipelineResult<()> {
    fs::create_dir_all(dir)?;
    fs::write(dir.join(HISTOGRAM_FILE), probability_histogram(records))?;
    fs::write(dir.join(TOP_FILE), top_probabilities(records))?;
    fs::write(dir.join(SCATTER_FILE), income_scatter(records))?;
    log::info!("wrote figures to {}", dir.display());
    Ok(())
}
