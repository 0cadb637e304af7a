use super::spread::{read_series, write_series};
use crate::cli::{CombineSpreadArgs, SyncMode};
use crate::error::Result;
use flowtools::engine::combine::{TimeSync, combine_spreads};

impl From<SyncMode> for TimeSync {
    fn from(mode: SyncMode) -> Self {
        match mode {
            SyncMode::None => TimeSync::None,
            SyncMode::Impact => TimeSync::Impact,
            SyncMode::Com => TimeSync::Com,
        }
    }
}

pub fn run(args: CombineSpreadArgs) -> Result<()> {
    let series = args
        .files
        .iter()
        .map(|path| read_series(path))
        .collect::<Result<Vec<_>>>()?;

    let combined = combine_spreads(&series, args.sync.into())?;
    if combined.is_empty() {
        println!("Warning: the runs share no times, the combined spread is empty.");
    }

    write_series(&combined, &args.save, args.csv.as_deref())?;
    println!(
        "✓ Combined {} run(s) over {} time(s): {}",
        series.len(),
        combined.len(),
        args.save.display()
    );
    Ok(())
}
