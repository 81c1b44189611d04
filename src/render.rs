//! Chart rendering on top of the [`plotters`] bitmap backend.
//!
//! Every chart takes a [`Pivot`] plus display options and writes a
//! 1200x800 PNG. The pivot's column order is the stacking/series order;
//! nothing here re-sorts it. Font rendering sticks to the backend's
//! default fonts so charts also work in headless environments.

use crate::aggregate::Pivot;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const CHART_SIZE: (u32, u32) = (1200, 800);

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("chart '{0}' has no data to draw")]
    EmptyChart(String),

    #[error("failed to draw chart: {0}")]
    Draw(String),
}

type Result<T> = std::result::Result<T, RenderError>;

fn draw_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Draw(e.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ChartKind {
    Line,
    Bar,
    Area,
    Heatmap,
}

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
}

pub fn render_chart(
    pivot: &Pivot,
    kind: ChartKind,
    opts: &ChartOptions,
    path: &Path,
) -> Result<()> {
    if pivot.is_empty() || pivot.columns.is_empty() {
        return Err(RenderError::EmptyChart(opts.title.clone()));
    }
    match kind {
        ChartKind::Line => draw_line(pivot, opts, path),
        ChartKind::Bar => draw_stacked_bars(pivot, opts, path),
        ChartKind::Area => draw_stacked_area(pivot, opts, path),
        ChartKind::Heatmap => draw_heatmap(pivot, opts, path),
    }
}

// Ticks land on the integer row positions; everything else stays blank so
// fractional tick positions do not repeat a neighboring label.
fn row_label(rows: &[String], x: f64) -> String {
    let i = x.round();
    if i < 0.0 || (i - x).abs() > 0.3 {
        return String::new();
    }
    rows.get(i as usize).cloned().unwrap_or_default()
}

fn value_bounds(pivot: &Pivot) -> Option<(f64, f64)> {
    let mut min = f64::MAX;
    let mut max = f64::MIN;
    for row in &pivot.values {
        for v in row.iter().flatten() {
            min = min.min(*v);
            max = max.max(*v);
        }
    }
    if min > max {
        None
    } else {
        Some((min, max))
    }
}

fn stacked_max(pivot: &Pivot) -> f64 {
    (0..pivot.rows.len())
        .map(|ri| pivot.row_sum(ri))
        .fold(0.0, f64::max)
}

fn draw_line(pivot: &Pivot, opts: &ChartOptions, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let n = pivot.rows.len();
    let (min, max) =
        value_bounds(pivot).ok_or_else(|| RenderError::EmptyChart(opts.title.clone()))?;
    let min = min.min(0.0);
    let pad = ((max - min).abs()).max(1.0) * 0.05;

    let mut chart = ChartBuilder::on(&root)
        .caption(&opts.title, ("sans-serif", 32))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), (min - pad)..(max + pad))
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc(opts.x_desc.as_str())
        .y_desc(opts.y_desc.as_str())
        .x_labels(n)
        .x_label_formatter(&|x| row_label(&pivot.rows, *x))
        .draw()
        .map_err(draw_err)?;

    for (ci, name) in pivot.columns.iter().enumerate() {
        let color = Palette99::pick(ci);
        let legend_color = Palette99::pick(ci);
        let points: Vec<(f64, f64)> = pivot
            .values
            .iter()
            .enumerate()
            .filter_map(|(ri, row)| row[ci].map(|v| (ri as f64, v)))
            .collect();
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(3)))
            .map_err(draw_err)?
            .label(name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 16, y)], legend_color.stroke_width(3))
            });
        chart
            .draw_series(points.iter().map(|p| Circle::new(*p, 4, color.filled())))
            .map_err(draw_err)?;
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;
    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_stacked_bars(pivot: &Pivot, opts: &ChartOptions, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let n = pivot.rows.len();
    let top = stacked_max(pivot).max(1.0) * 1.05;

    let mut chart = ChartBuilder::on(&root)
        .caption(&opts.title, ("sans-serif", 32))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0.0..top)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(opts.x_desc.as_str())
        .y_desc(opts.y_desc.as_str())
        .x_labels(n)
        .x_label_formatter(&|x| row_label(&pivot.rows, *x))
        .draw()
        .map_err(draw_err)?;

    // Bars stack bottom-up in column order; `base` carries the running top
    // of each row's stack.
    let mut base = vec![0.0f64; n];
    for (ci, name) in pivot.columns.iter().enumerate() {
        let color = Palette99::pick(ci);
        let mut rects = Vec::with_capacity(n);
        for (ri, b) in base.iter_mut().enumerate() {
            let v = pivot.cell(ri, ci).unwrap_or(0.0);
            if v > 0.0 {
                rects.push(Rectangle::new(
                    [(ri as f64 - 0.35, *b), (ri as f64 + 0.35, *b + v)],
                    color.filled(),
                ));
            }
            *b += v;
        }
        chart
            .draw_series(rects)
            .map_err(draw_err)?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;
    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_stacked_area(pivot: &Pivot, opts: &ChartOptions, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let n = pivot.rows.len();
    let m = pivot.columns.len();
    let top = stacked_max(pivot).max(1.0) * 1.05;

    // Cumulative top of the stack after each column, per row.
    let mut tops = vec![vec![0.0f64; n]; m];
    for ri in 0..n {
        let mut cum = 0.0;
        for (ci, tops_ci) in tops.iter_mut().enumerate() {
            cum += pivot.cell(ri, ci).unwrap_or(0.0);
            tops_ci[ri] = cum;
        }
    }

    let mut chart = ChartBuilder::on(&root)
        .caption(&opts.title, ("sans-serif", 32))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(80)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), 0.0..top)
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .x_desc(opts.x_desc.as_str())
        .y_desc(opts.y_desc.as_str())
        .x_labels(n)
        .x_label_formatter(&|x| row_label(&pivot.rows, *x))
        .draw()
        .map_err(draw_err)?;

    for (ci, name) in pivot.columns.iter().enumerate() {
        let color = Palette99::pick(ci);
        // One closed band per series: upper boundary left to right, then
        // the previous series' boundary right to left.
        let mut band: Vec<(f64, f64)> = (0..n).map(|ri| (ri as f64, tops[ci][ri])).collect();
        band.extend((0..n).rev().map(|ri| {
            let lower = if ci == 0 { 0.0 } else { tops[ci - 1][ri] };
            (ri as f64, lower)
        }));
        chart
            .draw_series(std::iter::once(Polygon::new(band, color.mix(0.8).filled())))
            .map_err(draw_err)?
            .label(name.as_str())
            .legend(move |(x, y)| Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(draw_err)?;
    root.present().map_err(draw_err)?;
    Ok(())
}

fn draw_heatmap(pivot: &Pivot, opts: &ChartOptions, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let n = pivot.rows.len();
    let m = pivot.columns.len();
    let (min, max) =
        value_bounds(pivot).ok_or_else(|| RenderError::EmptyChart(opts.title.clone()))?;
    let span = (max - min).max(f64::EPSILON);

    let mut chart = ChartBuilder::on(&root)
        .caption(&opts.title, ("sans-serif", 32))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(120)
        .build_cartesian_2d(-0.5f64..(n as f64 - 0.5), -0.5f64..(m as f64 - 0.5))
        .map_err(draw_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(opts.x_desc.as_str())
        .y_desc(opts.y_desc.as_str())
        .x_labels(n)
        .y_labels(m)
        .x_label_formatter(&|x| row_label(&pivot.rows, *x))
        .y_label_formatter(&|y| row_label(&pivot.columns, *y))
        .draw()
        .map_err(draw_err)?;

    let mut cells = Vec::with_capacity(n * m);
    for ri in 0..n {
        for ci in 0..m {
            let Some(v) = pivot.cell(ri, ci) else {
                continue;
            };
            let frac = (v - min) / span;
            cells.push(Rectangle::new(
                [
                    (ri as f64 - 0.5, ci as f64 - 0.5),
                    (ri as f64 + 0.5, ci as f64 + 0.5),
                ],
                BLUE.mix(0.1 + 0.85 * frac).filled(),
            ));
        }
    }
    chart.draw_series(cells).map_err(draw_err)?;
    root.present().map_err(draw_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pivot() -> Pivot {
        Pivot {
            rows: vec!["1990".into(), "2000".into()],
            columns: vec!["Indie".into(), "Blockbuster".into()],
            values: vec![
                vec![Some(60.0), Some(40.0)],
                vec![Some(55.0), Some(45.0)],
            ],
        }
    }

    #[test]
    fn empty_pivot_is_rejected_before_touching_the_backend() {
        let empty = Pivot {
            rows: vec![],
            columns: vec!["Indie".into()],
            values: vec![],
        };
        let opts = ChartOptions {
            title: "t".into(),
            x_desc: "x".into(),
            y_desc: "y".into(),
        };
        let err = render_chart(&empty, ChartKind::Bar, &opts, Path::new("unused.png"));
        assert!(matches!(err, Err(RenderError::EmptyChart(_))));
    }

    #[test]
    fn renders_every_chart_kind_to_png() {
        let dir = std::env::temp_dir().join("film_trends_render_test");
        std::fs::create_dir_all(&dir).unwrap();
        let opts = ChartOptions {
            title: "Percent of Films by Size and Decade".into(),
            x_desc: "Decade".into(),
            y_desc: "% of films".into(),
        };
        for (kind, name) in [
            (ChartKind::Line, "line.png"),
            (ChartKind::Bar, "bar.png"),
            (ChartKind::Area, "area.png"),
            (ChartKind::Heatmap, "heatmap.png"),
        ] {
            let path = dir.join(name);
            render_chart(&pivot(), kind, &opts, &path).unwrap();
            let meta = std::fs::metadata(&path).unwrap();
            assert!(meta.len() > 0, "{} is empty", name);
        }
    }

    #[test]
    fn tick_labels_only_appear_on_row_positions() {
        let rows = vec!["1990".to_string(), "2000".to_string()];
        assert_eq!(row_label(&rows, 0.0), "1990");
        assert_eq!(row_label(&rows, 1.02), "2000");
        assert_eq!(row_label(&rows, 0.5), "");
        assert_eq!(row_label(&rows, -1.0), "");
    }
}
