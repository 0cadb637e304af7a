use super::{Context, figure_options, read_map};
use crate::cli::ProfileArgs;
use crate::config::builder::Overrides;
use crate::error::{CliError, Result};
use flowtools::engine::profile::{
    LinearFit, ProfileOptions, ProfilePoint, fit_linear, velocity_profile,
};
use flowtools::plot::RGBColor;
use flowtools::plot::figure::Figure;
use flowtools::plot::line::{Line, LinePlot};
use std::fmt::Write;
use tracing::{info, warn};

const FIT_COLOUR: RGBColor = RGBColor(255, 0, 0);

fn format_profile(profile: &[ProfilePoint], fit: Option<&LinearFit>) -> String {
    let mut out = String::new();
    if let Some(fit) = fit {
        let _ = writeln!(out, "Linear fit of flow f as a function of height h, f = A + B * h:");
        let _ = writeln!(out, "A = {}", fit.intercept);
        let _ = writeln!(out, "B = {}", fit.slope);
    }
    for point in profile {
        let _ = writeln!(out, "{:8.3} {:12.6}", point.height, point.flow);
    }
    out
}

pub fn run(args: ProfileArgs, ctx: &Context) -> Result<()> {
    let overrides = Overrides {
        min_mass: args.min_mass,
        colour: args.colour.clone(),
        ..Overrides::default().with_figure(&args.figure)?
    };
    let config = ctx.config(&overrides)?;

    let map = read_map(&args.map)?;
    let options = ProfileOptions {
        min_mass: config.droplet.min_mass,
        y_min: args.hmin,
        y_max: args.hmax,
    };
    let profile = velocity_profile(&map, &options);
    info!(rows = profile.len(), "Took flow profile of {:?}", args.map);

    let fit = if args.nofit {
        None
    } else {
        let fit = fit_linear(&profile);
        if fit.is_none() {
            warn!("Too few rows with flow to fit a line to the profile.");
        }
        fit
    };
    print!("{}", format_profile(&profile, fit.as_ref()));

    let Some(save) = &args.save else {
        return Ok(());
    };
    let points: Vec<(f64, f64)> = profile.iter().map(|p| (p.flow, p.height)).collect();
    let mut lines = vec![Line::new(points, config.plot.colour).with_label(args.label.clone())];
    if let Some(fit) = &fit {
        let fitted = profile
            .iter()
            .map(|p| (fit.flow_at(p.height), p.height))
            .collect();
        lines.push(Line::new(fitted, FIT_COLOUR).dashed());
    }

    let figure = figure_options(&args.figure, &config);
    let plot = LinePlot::new(lines, ("Mass flow along x (nm/ps)", "Height (nm)"));
    info!("Drawing flow profile to {:?}", save);
    Figure::draw(save, &figure, &plot).map_err(|source| CliError::Plot {
        path: save.clone(),
        source,
    })?;
    println!("✓ Figure written to: {}", save.display());
    Ok(())
}
