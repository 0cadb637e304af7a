use super::error::{PlotError, drawing_error};
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_SIZE: (u32, u32) = (800, 600);

/// Options shared by all figures. Unset options take defaults from the renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct FigureOptions {
    pub title: Option<String>,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub x_range: Option<(f64, f64)>,
    pub y_range: Option<(f64, f64)>,
    /// Width and height in pixels.
    pub size: (u32, u32),
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            title: None,
            x_label: None,
            y_label: None,
            x_range: None,
            y_range: None,
            size: DEFAULT_SIZE,
        }
    }
}

/// Draws a figure onto a prepared canvas.
pub trait Render {
    /// Renders onto `area`, which has been filled with the background colour.
    ///
    /// # Errors
    ///
    /// Returns an error if there is nothing to draw or drawing fails.
    fn render<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        options: &FigureOptions,
    ) -> Result<(), PlotError>;
}

/// A figure written to an image file.
pub struct Figure;

impl Figure {
    /// Renders a figure into the file at `path`.
    ///
    /// The backend is chosen by extension: `.svg` writes a vector image,
    /// anything else a bitmap. The canvas is presented even when rendering
    /// fails, in which case the rendering error is returned.
    pub fn draw<P: AsRef<Path>>(
        path: P,
        options: &FigureOptions,
        renderer: &impl Render,
    ) -> Result<(), PlotError> {
        let path = path.as_ref();
        let is_svg = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"));
        debug!(path = %path.display(), svg = is_svg, "Drawing figure.");

        if is_svg {
            let root = SVGBackend::new(path, options.size).into_drawing_area();
            draw_on(root, options, renderer)
        } else {
            let root = BitMapBackend::new(path, options.size).into_drawing_area();
            draw_on(root, options, renderer)
        }
    }
}

fn draw_on<DB: DrawingBackend>(
    root: DrawingArea<DB, Shift>,
    options: &FigureOptions,
    renderer: &impl Render,
) -> Result<(), PlotError> {
    let rendered = root
        .fill(&WHITE)
        .map_err(drawing_error)
        .and_then(|()| renderer.render(&root, options));
    let presented = root.present().map_err(drawing_error);
    rendered.and(presented)
}

pub(crate) type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Sets up a chart with title, axis descriptions and mesh.
///
/// Ranges and labels of `options` take precedence over the given defaults.
pub(crate) fn cartesian<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    options: &FigureOptions,
    default_range: (Range<f64>, Range<f64>),
    default_labels: (&str, &str),
) -> Result<Chart<'a, DB>, PlotError> {
    let x_range = options
        .x_range
        .map_or(default_range.0, |(min, max)| min..max);
    let y_range = options
        .y_range
        .map_or(default_range.1, |(min, max)| min..max);

    let mut builder = ChartBuilder::on(area);
    builder
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50);
    if let Some(title) = &options.title {
        builder.caption(title, ("sans-serif", 24));
    }
    let mut chart = builder
        .build_cartesian_2d(x_range, y_range)
        .map_err(drawing_error)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(options.x_label.as_deref().unwrap_or(default_labels.0))
        .y_desc(options.y_label.as_deref().unwrap_or(default_labels.1))
        .draw()
        .map_err(drawing_error)?;

    Ok(chart)
}

/// Pads a data range by a fraction of its width, widening empty ranges to a unit width.
pub(crate) fn padded(min: f64, max: f64, fraction: f64) -> Range<f64> {
    if !(min.is_finite() && max.is_finite()) {
        return 0.0..1.0;
    }
    let width = max - min;
    if width <= 0.0 {
        return (min - 0.5)..(max + 0.5);
    }
    (min - fraction * width)..(max + fraction * width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    struct Square;

    impl Render for Square {
        fn render<DB: DrawingBackend>(
            &self,
            area: &DrawingArea<DB, Shift>,
            _: &FigureOptions,
        ) -> Result<(), PlotError> {
            area.draw(&Rectangle::new([(10, 10), (50, 50)], RED.filled()))
                .map_err(drawing_error)
        }
    }

    struct Failing;

    impl Render for Failing {
        fn render<DB: DrawingBackend>(
            &self,
            _: &DrawingArea<DB, Shift>,
            _: &FigureOptions,
        ) -> Result<(), PlotError> {
            Err(PlotError::NoData("cells"))
        }
    }

    fn small() -> FigureOptions {
        FigureOptions {
            size: (64, 64),
            ..Default::default()
        }
    }

    #[test]
    fn svg_extension_writes_vector_image() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("square.svg");
        Figure::draw(&path, &small(), &Square).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<svg"));
        assert!(content.contains("<rect"));
    }

    #[test]
    fn other_extensions_write_bitmaps() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("square.png");
        Figure::draw(&path, &small(), &Square).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[1..4], b"PNG");
    }

    #[test]
    fn canvas_is_presented_when_rendering_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("failed.svg");
        assert_eq!(
            Figure::draw(&path, &small(), &Failing),
            Err(PlotError::NoData("cells"))
        );
        assert!(path.exists());
    }

    #[test]
    fn unwritable_path_reports_presentation_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("square.png");
        assert!(matches!(
            Figure::draw(&path, &small(), &Square),
            Err(PlotError::Drawing(_))
        ));
    }

    #[test]
    fn padding_widens_ranges() {
        assert_eq!(padded(0.0, 10.0, 0.1), -1.0..11.0);
        assert_eq!(padded(2.0, 2.0, 0.1), 1.5..2.5);
        assert_eq!(padded(f64::INFINITY, f64::NEG_INFINITY, 0.1), 0.0..1.0);
    }
}
