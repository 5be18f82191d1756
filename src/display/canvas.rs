//! Chart canvas backed by plotters

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use plotters::prelude::*;

use crate::error::{DashboardError, Result};
use crate::models::chart::Rgba;
use crate::models::LineChart;
use crate::utils::format_usd;

const BACKGROUND: RGBColor = RGBColor(0x0b, 0x12, 0x20);
const GRID: RGBColor = RGBColor(0x1f, 0x29, 0x37);
const AXIS_TEXT: RGBColor = RGBColor(0x00, 0xff, 0xff);

/// The charting collaborator: takes the current chart state and draws it
pub trait ChartCanvas {
    /// Redraw immediately, without animation
    fn redraw(&mut self, chart: &LineChart) -> Result<()>;
}

struct Versioned<C> {
    canvas: C,
    drawn: u64,
}

/// A canvas handle that can be moved onto a blocking thread.
///
/// Each draw carries the chart version it was taken from; a draw older than
/// the last one completed is skipped so a slow redraw never overwrites a newer
/// image.
pub struct SharedCanvas<C> {
    inner: Arc<Mutex<Versioned<C>>>,
}

impl<C> Clone for SharedCanvas<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ChartCanvas> SharedCanvas<C> {
    pub fn new(canvas: C) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Versioned { canvas, drawn: 0 })),
        }
    }

    /// Draw `chart` as `version`. Returns `Ok(false)` if a newer version was
    /// already drawn.
    pub fn draw(&self, chart: &LineChart, version: u64) -> Result<bool> {
        let mut slot = self
            .inner
            .lock()
            .map_err(|_| DashboardError::Chart("Canvas lock poisoned".into()))?;
        if slot.drawn > version {
            return Ok(false);
        }
        slot.canvas.redraw(chart)?;
        slot.drawn = version;
        Ok(true)
    }

    #[cfg(test)]
    pub fn inspect<R>(&self, f: impl FnOnce(&C) -> R) -> R {
        f(&self.inner.lock().unwrap().canvas)
    }
}

/// Draws the chart to a PNG file, overwriting it on every redraw
pub struct PngCanvas {
    path: PathBuf,
    width: u32,
    height: u32,
}

impl PngCanvas {
    pub fn new(path: PathBuf, width: u32, height: u32) -> Self {
        Self { path, width, height }
    }
}

fn to_color(c: Rgba) -> RGBAColor {
    RGBAColor(c.0, c.1, c.2, c.3)
}

impl ChartCanvas for PngCanvas {
    fn redraw(&mut self, chart: &LineChart) -> Result<()> {
        let root = BitMapBackend::new(&self.path, (self.width, self.height)).into_drawing_area();
        root.fill(&BACKGROUND)
            .map_err(|e| DashboardError::Chart(format!("Failed to fill canvas: {}", e)))?;

        // Pad the value range so lines don't touch the frame
        let (min_value, max_value) = chart.value_range().unwrap_or((0.0, 1.0));
        let range = (max_value - min_value).max(1e-8);
        let padding = range * 0.1;
        let y_min = min_value - padding;
        let y_max = max_value + padding;

        let x_max = chart.labels.len().saturating_sub(1).max(1);
        let labels = &chart.labels;

        let mut ctx = ChartBuilder::on(&root)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(90)
            .build_cartesian_2d(0usize..x_max, y_min..y_max)
            .map_err(|e| DashboardError::Chart(format!("Failed to build chart: {}", e)))?;

        ctx.configure_mesh()
            .x_labels(8)
            .x_label_formatter(&|idx: &usize| labels.get(*idx).cloned().unwrap_or_default())
            .y_label_formatter(&|value: &f64| format_usd(*value))
            .label_style(("sans-serif", 14).into_font().color(&AXIS_TEXT))
            .axis_style(&GRID)
            .bold_line_style(&GRID)
            .light_line_style(&BACKGROUND)
            .draw()
            .map_err(|e| DashboardError::Chart(format!("Failed to draw mesh: {}", e)))?;

        for dataset in &chart.datasets {
            let color = to_color(dataset.color);
            let stroke = dataset.line_width.round().max(1.0) as u32;
            let points: Vec<(usize, f64)> = dataset
                .values
                .iter()
                .enumerate()
                .filter(|(_, v)| v.is_finite())
                .map(|(i, v)| (i, *v))
                .collect();

            if let Some(fill) = dataset.fill {
                ctx.draw_series(AreaSeries::new(points.iter().copied(), y_min, to_color(fill)))
                    .map_err(|e| DashboardError::Chart(format!("Failed to draw area: {}", e)))?;
            }

            ctx.draw_series(LineSeries::new(points, color.stroke_width(stroke)))
                .map_err(|e| DashboardError::Chart(format!("Failed to draw line: {}", e)))?
                .label(dataset.label)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        ctx.configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&BACKGROUND.mix(0.8))
            .border_style(&GRID)
            .label_font(("sans-serif", 14).into_font().color(&AXIS_TEXT))
            .draw()
            .map_err(|e| DashboardError::Chart(format!("Failed to draw legend: {}", e)))?;

        root.present()
            .map_err(|e| DashboardError::Chart(format!("Failed to render chart: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Dataset;

    #[test]
    fn test_redraw_writes_png_or_reports_chart_error() {
        let path = std::env::temp_dir().join(format!("signal_watch_chart_{}.png", std::process::id()));
        let mut chart = LineChart::new(
            vec!["10:00".into(), "10:01".into(), "10:02".into()],
            vec![65000.0, 65100.0, 65050.0],
        );
        chart.datasets.push(Dataset::ema_short(vec![64900.0, 64950.0, 64990.0]));
        chart.datasets.push(Dataset::ema_long(vec![64700.0, 64800.0, 64850.0]));

        let mut canvas = PngCanvas::new(path.clone(), 320, 200);
        match canvas.redraw(&chart) {
            Ok(()) => {
                let bytes = std::fs::read(&path).unwrap();
                assert!(bytes.starts_with(b"\x89PNG"));
                let _ = std::fs::remove_file(&path);
            }
            // Hosts without system fonts can't render axis text
            Err(e) => assert!(matches!(e, DashboardError::Chart(_))),
        }
    }

    #[derive(Default)]
    struct CountingCanvas {
        drawn: Vec<f64>,
    }

    impl ChartCanvas for CountingCanvas {
        fn redraw(&mut self, chart: &LineChart) -> Result<()> {
            self.drawn.push(chart.datasets[0].values[0]);
            Ok(())
        }
    }

    #[test]
    fn test_shared_canvas_skips_older_versions() {
        let canvas = SharedCanvas::new(CountingCanvas::default());
        let newer = LineChart::new(vec!["10:01".into()], vec![2.0]);
        let older = LineChart::new(vec!["10:00".into()], vec![1.0]);

        assert!(canvas.draw(&newer, 2).unwrap());
        assert!(!canvas.draw(&older, 1).unwrap());
        assert!(canvas.clone().draw(&newer, 2).unwrap());
        assert_eq!(canvas.inspect(|c| c.drawn.clone()), vec![2.0, 2.0]);
    }

    #[test]
    fn test_color_conversion_keeps_alpha() {
        let color = to_color(Rgba(0, 255, 255, 0.1));
        assert_eq!(color, RGBAColor(0, 255, 255, 0.1));
    }
}
