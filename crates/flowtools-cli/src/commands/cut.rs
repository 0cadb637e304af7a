use super::{read_map, write_map};
use crate::cli::CutArgs;
use crate::error::Result;
use flowtools::engine::aggregate::{Region, cut};
use tracing::info;

pub fn run(args: CutArgs) -> Result<()> {
    let region = Region {
        x_min: args.xmin,
        x_max: args.xmax,
        y_min: args.ymin,
        y_max: args.ymax,
    };

    let map = read_map(&args.input)?;
    info!(?region, "Cutting map.");
    let cut_map = cut(&map, &region)?;

    write_map(&cut_map, &args.output)?;
    println!(
        "✓ Kept {}x{} cells: {}",
        cut_map.columns(),
        cut_map.rows(),
        args.output.display()
    );
    Ok(())
}
