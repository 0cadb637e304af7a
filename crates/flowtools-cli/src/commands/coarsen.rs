use super::{read_map, write_map};
use crate::cli::CoarsenArgs;
use crate::error::{CliError, Result};
use flowtools::engine::aggregate::coarsen;
use tracing::info;

pub fn run(args: CoarsenArgs) -> Result<()> {
    let &[nx, ny] = args.cells.as_slice() else {
        return Err(CliError::Argument(format!(
            "--cells takes two factors, got {}",
            args.cells.len()
        )));
    };

    let map = read_map(&args.input)?;
    info!(nx, ny, "Coarsening map of {}x{} cells.", map.columns(), map.rows());
    let coarse = coarsen(&map, nx, ny)?;

    write_map(&coarse, &args.output)?;
    println!(
        "✓ Coarsened map to {}x{} cells: {}",
        coarse.columns(),
        coarse.rows(),
        args.output.display()
    );
    Ok(())
}
