use super::spread::read_series;
use super::{Context, figure_options};
use crate::cli::{VelocityArgs, VelocityKind, WindowMode};
use crate::config::builder::Overrides;
use crate::error::{CliError, Result};
use flowtools::engine::combine::combine_spreads;
use flowtools::engine::velocity::{
    SpreadQuantity, VelocityOptions, VelocityPoint, Window, spread_velocity,
};
use flowtools::plot::colour::colour_cycle;
use flowtools::plot::figure::Figure;
use flowtools::plot::line::{Line, LinePlot};
use std::fmt::Write as _;
use tracing::info;

impl From<WindowMode> for Window {
    fn from(mode: WindowMode) -> Self {
        match mode {
            WindowMode::Full => Window::Full,
            WindowMode::Equal => Window::Equal,
            WindowMode::Limited => Window::Limited,
        }
    }
}

fn quantities(kind: VelocityKind) -> Vec<SpreadQuantity> {
    match kind {
        VelocityKind::Edges => vec![SpreadQuantity::Left, SpreadQuantity::Right],
        VelocityKind::Radius => vec![SpreadQuantity::Radius],
        VelocityKind::Diameter => vec![SpreadQuantity::Diameter],
    }
}

/// One column of velocities per quantity, all sharing the times of the first.
fn format_velocities(columns: &[(SpreadQuantity, Vec<VelocityPoint>)]) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:>9} ", "Time");
    for (quantity, _) in columns {
        let _ = write!(out, "{:>9} ", quantity.name());
    }
    out.push('\n');

    let rows = columns.first().map_or(0, |(_, points)| points.len());
    for i in 0..rows {
        let _ = write!(out, "{:9.3} ", columns[0].1[i].time);
        for (_, points) in columns {
            let _ = write!(out, "{:9.4} ", points[i].velocity);
        }
        out.push('\n');
    }
    out
}

pub fn run(args: VelocityArgs, ctx: &Context) -> Result<()> {
    let runs = args
        .files
        .iter()
        .map(|path| read_series(path))
        .collect::<Result<Vec<_>>>()?;
    let series = combine_spreads(&runs, args.sync.into())?;
    info!(runs = runs.len(), records = series.len(), "Combined spread runs.");

    let options = VelocityOptions {
        average: args.average,
        sample: args.sample,
        window: args.include.into(),
    };
    let columns = quantities(args.kind)
        .into_iter()
        .map(|quantity| Ok((quantity, spread_velocity(&series, quantity, &options)?)))
        .collect::<Result<Vec<_>>>()?;
    print!("{}", format_velocities(&columns));

    let Some(save) = &args.save else {
        return Ok(());
    };
    let overrides = Overrides {
        colour: args.colour.clone(),
        ..Overrides::default().with_figure(&args.figure)?
    };
    let config = ctx.config(&overrides)?;
    let colours = colour_cycle(&[config.plot.colour], columns.len());
    let lines = columns
        .iter()
        .zip(colours)
        .enumerate()
        .map(|(i, ((_, points), colour))| {
            let points = points.iter().map(|p| (p.time, p.velocity)).collect();
            Line::new(points, colour).with_label(args.label.clone().filter(|_| i == 0))
        })
        .collect();

    let figure = figure_options(&args.figure, &config);
    let plot = LinePlot::new(lines, ("Time (ps)", "Velocity (nm / ps)"));
    info!("Drawing spreading velocity to {:?}", save);
    Figure::draw(save, &figure, &plot).map_err(|source| CliError::Plot {
        path: save.clone(),
        source,
    })?;
    println!("✓ Figure written to: {}", save.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(time: f64, velocity: f64) -> VelocityPoint {
        VelocityPoint { time, velocity }
    }

    #[test]
    fn edges_give_a_left_and_a_right_column() {
        assert_eq!(
            quantities(VelocityKind::Edges),
            vec![SpreadQuantity::Left, SpreadQuantity::Right]
        );
        let columns = vec![
            (SpreadQuantity::Left, vec![point(1.0, -0.5), point(2.0, -0.25)]),
            (SpreadQuantity::Right, vec![point(1.0, 0.5), point(2.0, 0.25)]),
        ];
        let lines: Vec<String> = format_velocities(&columns).lines().map(String::from).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].split_whitespace().collect::<Vec<_>>(), ["Time", "left", "right"]);
        assert_eq!(
            lines[2].split_whitespace().collect::<Vec<_>>(),
            ["2.000", "-0.2500", "0.2500"]
        );
    }

    #[test]
    fn no_velocities_print_only_the_header() {
        let columns = vec![(SpreadQuantity::Diameter, Vec::new())];
        assert_eq!(format_velocities(&columns).lines().count(), 1);
    }
}
