use super::spread::{read_series, write_series};
use crate::cli::RetimeArgs;
use crate::error::{CliError, Result};
use flowtools::engine::spread::retime;
use std::path::PathBuf;

/// Pairs each input with its output, which is the input itself by default.
fn targets(files: &[PathBuf], output: &[PathBuf]) -> Result<Vec<(PathBuf, PathBuf)>> {
    if output.is_empty() {
        return Ok(files.iter().map(|f| (f.clone(), f.clone())).collect());
    }
    if output.len() != files.len() {
        return Err(CliError::Argument(format!(
            "got {} output file(s) for {} spread file(s)",
            output.len(),
            files.len()
        )));
    }
    Ok(files.iter().cloned().zip(output.iter().cloned()).collect())
}

pub fn run(args: RetimeArgs) -> Result<()> {
    let targets = targets(&args.files, &args.output)?;
    for (input, output) in &targets {
        let series = read_series(input)?;
        let retimed = retime(&series, args.delta_t, args.t0)?;
        write_series(&retimed, output, None)?;
    }
    println!(
        "✓ Retimed {} spread file(s) to a time step of {}",
        targets.len(),
        args.delta_t
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtools::core::models::spread::{SpreadMetadata, SpreadRecord, SpreadSeries};
    use tempfile::tempdir;

    #[test]
    fn files_are_overwritten_without_outputs() {
        let files = vec![PathBuf::from("a.dat"), PathBuf::from("b.dat")];
        let pairs = targets(&files, &[]).unwrap();
        assert_eq!(pairs[1], (PathBuf::from("b.dat"), PathBuf::from("b.dat")));

        assert!(matches!(
            targets(&files, &[PathBuf::from("c.dat")]),
            Err(CliError::Argument(_))
        ));
    }

    #[test]
    fn retimed_file_is_written_to_output() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("spread.dat");
        let output = dir.path().join("retimed.dat");
        let series = SpreadSeries::from_records(
            SpreadMetadata {
                delta_t: Some(1.0),
                ..Default::default()
            },
            vec![
                SpreadRecord::new(4.0, -1.0, 1.0, 0.0, 1.0),
                SpreadRecord::new(5.0, -2.0, 2.0, 0.0, 1.0),
            ],
        );
        write_series(&series, &input, None).unwrap();

        let args = RetimeArgs {
            files: vec![input.clone()],
            delta_t: 10.0,
            t0: None,
            output: vec![output.clone()],
        };
        run(args).unwrap();

        assert_eq!(read_series(&output).unwrap().times(), vec![40.0, 50.0]);
        assert_eq!(read_series(&input).unwrap().times(), vec![4.0, 5.0]);
    }
}
