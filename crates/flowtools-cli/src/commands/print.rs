use super::{Context, read_map};
use crate::cli::PrintArgs;
use crate::config::builder::Overrides;
use crate::error::Result;
use flowtools::core::models::map::DataMap;
use flowtools::engine::droplet::{DropletMask, detect};
use std::fmt::Write;

pub fn run(args: PrintArgs, ctx: &Context) -> Result<()> {
    let config = ctx.config(&Overrides::default().with_droplet(&args.droplet_options))?;
    for path in &args.maps {
        let map = read_map(path)?;
        let mask = args.droplet.then(|| detect(&map, &config.droplet));
        if args.maps.len() > 1 {
            println!("{}:", path.display());
        }
        print!("{}", format_map(&map, mask.as_ref()));
    }
    Ok(())
}

/// Formats the fields of a map as a table, cell by cell in file order.
/// With a mask only its cells are included.
fn format_map(map: &DataMap, mask: Option<&DropletMask>) -> String {
    let fields: Vec<_> = map.fields().iter().collect();
    let mut out = String::new();

    for field in &fields {
        let _ = write!(out, "{:>9} ", field.symbol());
    }
    out.push('\n');
    out.push_str(&"----------".repeat(fields.len()));
    out.push('\n');

    for column in 0..map.columns() {
        for row in 0..map.rows() {
            if mask.is_some_and(|m| !m.contains(row, column)) {
                continue;
            }
            let Some(cell) = map.cell(row, column) else {
                continue;
            };
            for field in &fields {
                let _ = write!(out, "{:9.3} ", field.value(cell));
            }
            out.push('\n');
        }
    }
    out
}
