use nalgebra::{Point2, Vector2};

/// A single grid element of a data map.
///
/// Holds the quantities a simulation collected inside one bin of the system:
/// the bin centre, the mass and number of atoms inside it, their temperature
/// and the mass-averaged flow velocity. The atom count is kept as a real
/// number since maps averaged over several frames carry fractional counts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// The centre of the cell in system units (nm).
    pub position: Point2<f64>,
    /// The total mass of atoms inside the cell.
    pub mass: f64,
    /// The number of atoms inside the cell.
    pub num_atoms: f64,
    /// The temperature of atoms inside the cell (K).
    pub temperature: f64,
    /// The flow velocity along x and y.
    pub flow: Vector2<f64>,
}

impl Cell {
    /// Creates an empty cell centred at `position`.
    pub fn new(position: Point2<f64>) -> Self {
        Self {
            position,
            mass: 0.0,
            num_atoms: 0.0,
            temperature: 0.0,
            flow: Vector2::zeros(),
        }
    }

    /// Whether any flow was recorded in the cell.
    pub fn has_flow(&self) -> bool {
        self.flow.x != 0.0 || self.flow.y != 0.0
    }

    /// The mass flux, i.e. the flow scaled by the cell mass.
    pub fn mass_flux(&self) -> Vector2<f64> {
        self.flow * self.mass
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::new(Point2::origin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_cell_is_empty_at_position() {
        let cell = Cell::new(Point2::new(1.5, -2.0));
        assert_eq!(cell.position, Point2::new(1.5, -2.0));
        assert_eq!(cell.mass, 0.0);
        assert_eq!(cell.num_atoms, 0.0);
        assert_eq!(cell.temperature, 0.0);
        assert!(!cell.has_flow());
    }

    #[test]
    fn flow_in_either_direction_counts() {
        let mut cell = Cell::default();
        cell.flow = Vector2::new(0.0, -0.1);
        assert!(cell.has_flow());
        cell.flow = Vector2::new(0.3, 0.0);
        assert!(cell.has_flow());
    }

    #[test]
    fn mass_flux_scales_flow_by_mass() {
        let cell = Cell {
            mass: 4.0,
            flow: Vector2::new(0.5, -0.25),
            ..Cell::default()
        };
        assert_eq!(cell.mass_flux(), Vector2::new(2.0, -1.0));
    }
}
