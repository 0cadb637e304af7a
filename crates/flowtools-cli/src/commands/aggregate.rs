use super::{read_map, write_map};
use crate::cli::AggregateArgs;
use crate::error::Result;
use flowtools::engine::aggregate::{Aggregation, aggregate};
use tracing::info;

pub fn run(args: AggregateArgs) -> Result<()> {
    let maps = args
        .inputs
        .iter()
        .map(|path| read_map(path))
        .collect::<Result<Vec<_>>>()?;

    let mode = if args.sum {
        Aggregation::Sum
    } else {
        Aggregation::Mean
    };
    info!(maps = maps.len(), ?mode, "Aggregating maps.");
    let combined = aggregate(&maps, mode)?;

    write_map(&combined, &args.output)?;
    println!(
        "✓ Combined {} map(s) into {}",
        maps.len(),
        args.output.display()
    );
    Ok(())
}
