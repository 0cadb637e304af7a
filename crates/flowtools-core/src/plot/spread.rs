use super::colour::colour_cycle;
use super::error::{PlotError, drawing_error};
use super::figure::{FigureOptions, Render, cartesian, padded};
use crate::core::models::spread::{SpreadRecord, SpreadSeries};
use plotters::coord::Shift;
use plotters::prelude::*;

const RANGE_PADDING: f64 = 0.05;
const ERROR_BAR_WIDTH: u32 = 4;

/// Which quantity of a spread series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpreadKind {
    /// Left and right edges as two lines of one colour.
    #[default]
    Edges,
    Radius,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpreadOptions {
    pub kind: SpreadKind,
    /// Error bars span this many standard errors. No bars are drawn if unset
    /// or if a series carries no errors.
    pub sigma: Option<f64>,
    /// Colours of the series in order. The default cycle continues after them.
    pub colours: Vec<RGBColor>,
    /// Legend labels of the series in order. No legend is drawn if empty.
    pub labels: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurvePoint {
    pub time: f64,
    pub value: f64,
    /// Half height of the error bar.
    pub error: Option<f64>,
}

/// A line of one series.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub series: usize,
    pub points: Vec<CurvePoint>,
}

/// Spreading curves of one or more series against time.
pub struct SpreadPlot<'a> {
    series: &'a [SpreadSeries],
    options: SpreadOptions,
}

impl<'a> SpreadPlot<'a> {
    pub fn new(series: &'a [SpreadSeries], options: SpreadOptions) -> Self {
        Self { series, options }
    }

    pub fn curves(&self) -> Vec<Curve> {
        let sigma = self.options.sigma;
        let curve = |series: usize,
                     records: &[SpreadRecord],
                     value: fn(&SpreadRecord) -> f64,
                     error: fn(&SpreadRecord) -> Option<f64>| Curve {
            series,
            points: records
                .iter()
                .map(|r| CurvePoint {
                    time: r.time,
                    value: value(r),
                    error: sigma.and_then(|s| error(r).map(|e| s * e)),
                })
                .collect(),
        };

        self.series
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_empty())
            .flat_map(|(i, s)| match self.options.kind {
                SpreadKind::Edges => vec![
                    curve(i, s.records(), |r| r.left, |r| r.error.map(|e| e.left)),
                    curve(i, s.records(), |r| r.right, |r| r.error.map(|e| e.right)),
                ],
                SpreadKind::Radius => {
                    vec![curve(i, s.records(), SpreadRecord::radius, SpreadRecord::radius_error)]
                }
            })
            .collect()
    }
}

/// Smallest and largest time and value of the curves, error bars included.
pub fn data_bounds(curves: &[Curve]) -> ((f64, f64), (f64, f64)) {
    let points = curves.iter().flat_map(|c| c.points.iter());
    points.fold(
        (
            (f64::INFINITY, f64::NEG_INFINITY),
            (f64::INFINITY, f64::NEG_INFINITY),
        ),
        |((t_min, t_max), (v_min, v_max)), p| {
            let e = p.error.unwrap_or(0.0).abs();
            (
                (t_min.min(p.time), t_max.max(p.time)),
                (v_min.min(p.value - e), v_max.max(p.value + e)),
            )
        },
    )
}

impl Render for SpreadPlot<'_> {
    fn render<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        options: &FigureOptions,
    ) -> Result<(), PlotError> {
        let curves = self.curves();
        if curves.is_empty() {
            return Err(PlotError::NoData("no spread records"));
        }

        let ((t_min, t_max), (v_min, v_max)) = data_bounds(&curves);
        let range = (
            padded(t_min, t_max, RANGE_PADDING),
            padded(v_min, v_max, RANGE_PADDING),
        );
        let y_label = match self.options.kind {
            SpreadKind::Edges => "Spreading (nm)",
            SpreadKind::Radius => "Radius (nm)",
        };
        let mut chart = cartesian(area, options, range, ("Time (ps)", y_label))?;

        let colours = colour_cycle(&self.options.colours, self.series.len());
        let mut labelled = vec![false; self.series.len()];

        for curve in &curves {
            let colour = colours[curve.series];
            let line = chart
                .draw_series(LineSeries::new(
                    curve.points.iter().map(|p| (p.time, p.value)),
                    colour.stroke_width(2),
                ))
                .map_err(drawing_error)?;

            match self.options.labels.get(curve.series) {
                Some(label) if !labelled[curve.series] => {
                    labelled[curve.series] = true;
                    line.label(label.as_str()).legend(move |(x, y)| {
                        PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2))
                    });
                }
                _ => {}
            }

            chart
                .draw_series(curve.points.iter().filter_map(|p| {
                    p.error.map(|e| {
                        ErrorBar::new_vertical(
                            p.time,
                            p.value - e,
                            p.value,
                            p.value + e,
                            colour.filled(),
                            ERROR_BAR_WIDTH,
                        )
                    })
                }))
                .map_err(drawing_error)?;
        }

        if labelled.iter().any(|&l| l) {
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
