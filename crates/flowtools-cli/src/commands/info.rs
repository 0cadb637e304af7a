use super::read_map;
use crate::cli::InfoArgs;
use crate::error::Result;
use flowtools::core::models::map::DataMap;
use std::fmt::Write;

pub fn run(args: InfoArgs) -> Result<()> {
    let map = read_map(&args.map)?;
    println!("{}", args.map.display());
    print!("{}", describe(&map));
    Ok(())
}

fn describe(map: &DataMap) -> String {
    let info = map.info();
    let fields: Vec<&str> = map.fields().iter().map(|f| f.symbol()).collect();
    let mut out = String::new();
    let _ = writeln!(out, "  Fields:      {}", fields.join(" "));
    let _ = writeln!(
        out,
        "  Cells:       {} x {} ({} total)",
        info.columns,
        info.rows,
        info.total_cells()
    );
    let _ = writeln!(out, "  Cell size:   {:.3} x {:.3}", info.cell_size.x, info.cell_size.y);
    let _ = writeln!(
        out,
        "  X range:     {:.3} to {:.3}",
        info.origin.x - info.cell_size.x / 2.0,
        info.end.x + info.cell_size.x / 2.0
    );
    let _ = writeln!(
        out,
        "  Y range:     {:.3} to {:.3}",
        info.origin.y - info.cell_size.y / 2.0,
        info.end.y + info.cell_size.y / 2.0
    );
    let _ = writeln!(out, "  Total mass:  {:.3}", map.total_mass());
    let _ = writeln!(out, "  Total atoms: {:.3}", map.total_atoms());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowtools::core::io::datamap::DataMapFile;
    use flowtools::core::io::traits::DataFile;
    use std::io::Cursor;

    #[test]
    fn description_covers_grid_and_totals() {
        let text = "X Y N T M U V\n0.5 1 2 300 4 0 0\n0.5 3 1 300 2 0 0\n1.5 1 0 0 0 0 0\n1.5 3 3 300 6 0 0\n";
        let map = DataMapFile::read_from(&mut Cursor::new(text)).unwrap();
        let described = describe(&map);
        assert!(described.contains("Fields:      X Y N T M U V"));
        assert!(described.contains("Cells:       2 x 2 (4 total)"));
        assert!(described.contains("Cell size:   1.000 x 2.000"));
        assert!(described.contains("X range:     0.000 to 2.000"));
        assert!(described.contains("Y range:     0.000 to 4.000"));
        assert!(described.contains("Total mass:  12.000"));
        assert!(described.contains("Total atoms: 6.000"));
    }
}
