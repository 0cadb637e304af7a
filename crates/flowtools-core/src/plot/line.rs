use super::error::{PlotError, drawing_error};
use super::figure::{FigureOptions, Render, cartesian, padded};
use plotters::coord::Shift;
use plotters::prelude::*;

const RANGE_PADDING: f64 = 0.05;

/// A polyline through data points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub points: Vec<(f64, f64)>,
    pub colour: RGBColor,
    pub label: Option<String>,
    pub dashed: bool,
}

impl Line {
    pub fn new(points: Vec<(f64, f64)>, colour: RGBColor) -> Self {
        Self {
            points,
            colour,
            label: None,
            dashed: false,
        }
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    pub fn dashed(mut self) -> Self {
        self.dashed = true;
        self
    }
}

/// Plain lines on linear axes, e.g. velocities against time.
pub struct LinePlot {
    lines: Vec<Line>,
    axis_labels: (&'static str, &'static str),
}

impl LinePlot {
    pub fn new(lines: Vec<Line>, axis_labels: (&'static str, &'static str)) -> Self {
        Self { lines, axis_labels }
    }

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Smallest and largest coordinates along x and y of all lines.
    pub fn bounds(&self) -> ((f64, f64), (f64, f64)) {
        let empty = (f64::INFINITY, f64::NEG_INFINITY);
        self.lines
            .iter()
            .flat_map(|line| line.points.iter())
            .fold((empty, empty), |((x0, x1), (y0, y1)), &(x, y)| {
                ((x0.min(x), x1.max(x)), (y0.min(y), y1.max(y)))
            })
    }
}

impl Render for LinePlot {
    fn render<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        options: &FigureOptions,
    ) -> Result<(), PlotError> {
        if self.lines.iter().all(|line| line.points.is_empty()) {
            return Err(PlotError::NoData("no line points"));
        }

        let ((x_min, x_max), (y_min, y_max)) = self.bounds();
        let range = (
            padded(x_min, x_max, RANGE_PADDING),
            padded(y_min, y_max, RANGE_PADDING),
        );
        let mut chart = cartesian(area, options, range, self.axis_labels)?;

        for line in &self.lines {
            let style = line.colour.stroke_width(2);
            let points = line.points.iter().copied();
            let anno = if line.dashed {
                chart.draw_series(DashedLineSeries::new(points, 8, 4, style))
            } else {
                chart.draw_series(LineSeries::new(points, style))
            }
            .map_err(drawing_error)?;

            if let Some(label) = &line.label {
                anno.label(label.as_str()).legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], style)
                });
            }
        }

        if self.lines.iter().any(|line| line.label.is_some()) {
            chart
                .configure_series_labels()
                .background_style(WHITE.mix(0.8))
                .border_style(BLACK)
                .draw()
                .map_err(drawing_error)?;
        }

        Ok(())
    }
}
