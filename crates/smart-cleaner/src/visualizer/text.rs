//! Terminal rendering of charts.

use super::charts::{BoxChart, Chart, CountChart, DistributionChart, MissingHeatmap};
use std::fmt::Write as _;

/// Rows of the heatmap grid shown before eliding the rest.
const MAX_HEATMAP_ROWS: usize = 40;

const BAR: char = '#';

/// Render a chart as plain text, with bars at most `width` characters long.
pub fn render(chart: &Chart, width: usize) -> String {
    let width = width.max(10);
    let mut out = String::new();
    if let Some(title) = &chart.decoration().title {
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    }

    match chart {
        Chart::Heatmap(chart) => render_heatmap(&mut out, chart, width),
        Chart::Distribution(chart) => render_distribution(&mut out, chart, width),
        Chart::Box(chart) => render_box(&mut out, chart, width),
        Chart::Count(chart) => render_counts(&mut out, chart, width),
    }
    out
}

fn bar(count: usize, max: usize, width: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let len = ((count as f64 / max as f64) * width as f64).round() as usize;
    BAR.to_string().repeat(len.max(usize::from(count > 0)))
}

fn render_heatmap(out: &mut String, chart: &MissingHeatmap, width: usize) {
    let label_width = chart
        .missing_counts
        .iter()
        .map(|entry| entry.column.chars().count())
        .max()
        .unwrap_or(0);
    let max = chart
        .missing_counts
        .iter()
        .map(|entry| entry.count)
        .max()
        .unwrap_or(0);

    let _ = writeln!(out, "Missing values per column:");
    for entry in &chart.missing_counts {
        let _ = writeln!(
            out,
            "  {:<label_width$} | {} {}",
            entry.column,
            bar(entry.count, max, width),
            entry.count
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Missing map ('X' missing, '.' present):");
    let _ = writeln!(out, "  columns: {}", chart.columns.join(", "));
    for (idx, row) in chart.cells.iter().take(MAX_HEATMAP_ROWS).enumerate() {
        let cells: String = row.iter().map(|&m| if m { 'X' } else { '.' }).collect();
        let _ = writeln!(out, "  {idx:>5} {cells}");
    }
    if chart.cells.len() > MAX_HEATMAP_ROWS {
        let _ = writeln!(
            out,
            "  ... {} more rows",
            chart.cells.len() - MAX_HEATMAP_ROWS
        );
    }
}

fn render_distribution(out: &mut String, chart: &DistributionChart, width: usize) {
    let max = chart.bins.iter().map(|b| b.count).max().unwrap_or(0);
    for bin in &chart.bins {
        let _ = writeln!(
            out,
            "  [{:>12.4}, {:>12.4}) | {} {}",
            bin.start,
            bin.end,
            bar(bin.count, max, width),
            bin.count
        );
    }

    if let Some(curve) = &chart.density
        && let Some(peak) = curve
            .iter()
            .max_by(|a, b| a.density.total_cmp(&b.density))
    {
        let _ = writeln!(
            out,
            "  density peak at {:.4} ({} points)",
            peak.x,
            curve.len()
        );
    }
    let _ = writeln!(out, "  n = {}", chart.count);
}

fn render_box(out: &mut String, chart: &BoxChart, width: usize) {
    let s = &chart.summary;
    let _ = writeln!(
        out,
        "  min={} q1={} median={} q3={} max={}",
        s.min, s.q1, s.median, s.q3, s.max
    );
    let _ = writeln!(
        out,
        "  whiskers=[{}, {}] outliers={}",
        s.lower_whisker,
        s.upper_whisker,
        chart.outliers.len()
    );

    let span = s.max - s.min;
    if span <= 0.0 {
        let _ = writeln!(out, "  |");
        return;
    }
    let pos = |v: f64| (((v - s.min) / span) * (width - 1) as f64).round() as usize;

    let mut line = vec![' '; width];
    for i in pos(s.lower_whisker)..=pos(s.upper_whisker) {
        line[i] = '-';
    }
    for i in pos(s.q1)..=pos(s.q3) {
        line[i] = '=';
    }
    line[pos(s.lower_whisker)] = '|';
    line[pos(s.upper_whisker)] = '|';
    line[pos(s.median)] = 'M';
    for &v in &chart.outliers {
        line[pos(v)] = 'o';
    }
    let _ = writeln!(out, "  {}", line.into_iter().collect::<String>());
}

fn render_counts(out: &mut String, chart: &CountChart, width: usize) {
    let shown = chart.entries.iter().filter(|entry| !entry.is_other).count();
    let labels: Vec<String> = chart
        .entries
        .iter()
        .map(|entry| {
            if entry.is_other {
                format!("{} ({} more)", entry.value, chart.distinct.saturating_sub(shown))
            } else {
                entry.value.clone()
            }
        })
        .collect();
    let label_width = labels
        .iter()
        .map(|label| label.chars().count())
        .max()
        .unwrap_or(0);
    let max = chart.entries.iter().map(|e| e.count).max().unwrap_or(0);

    for (entry, label) in chart.entries.iter().zip(&labels) {
        let _ = writeln!(
            out,
            "  {:<label_width$} | {} {}",
            label,
            bar(entry.count, max, width),
            entry.count
        );
    }
    let _ = writeln!(out, "  distinct values: {}", chart.distinct);
}
