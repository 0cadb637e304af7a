use super::cell::Cell;
use phf::phf_map;
use std::fmt;

/// A data column of a map file, named by its header symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Cell centre along x.
    X,
    /// Cell centre along y.
    Y,
    /// Number of atoms.
    N,
    /// Temperature.
    T,
    /// Mass.
    M,
    /// Flow along x.
    U,
    /// Flow along y.
    V,
}

static FIELD_SYMBOLS: phf::Map<&'static str, Field> = phf_map! {
    "X" => Field::X,
    "Y" => Field::Y,
    "N" => Field::N,
    "T" => Field::T,
    "M" => Field::M,
    "U" => Field::U,
    "V" => Field::V,
};

impl Field {
    /// All fields in the order they are written to files.
    pub const CANONICAL: [Field; 7] = [
        Field::X,
        Field::Y,
        Field::N,
        Field::T,
        Field::M,
        Field::U,
        Field::V,
    ];

    /// Looks up a field from its header symbol, ignoring case.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        FIELD_SYMBOLS
            .get(symbol.to_ascii_uppercase().as_str())
            .copied()
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Field::X => "X",
            Field::Y => "Y",
            Field::N => "N",
            Field::T => "T",
            Field::M => "M",
            Field::U => "U",
            Field::V => "V",
        }
    }

    /// Reads the value of this field from a cell.
    pub fn value(self, cell: &Cell) -> f64 {
        match self {
            Field::X => cell.position.x,
            Field::Y => cell.position.y,
            Field::N => cell.num_atoms,
            Field::T => cell.temperature,
            Field::M => cell.mass,
            Field::U => cell.flow.x,
            Field::V => cell.flow.y,
        }
    }

    pub(crate) fn assign(self, cell: &mut Cell, value: f64) {
        match self {
            Field::X => cell.position.x = value,
            Field::Y => cell.position.y = value,
            Field::N => cell.num_atoms = value,
            Field::T => cell.temperature = value,
            Field::M => cell.mass = value,
            Field::U => cell.flow.x = value,
            Field::V => cell.flow.y = value,
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// A set of fields, used for the columns a map file declares or requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FieldSet(u8);

impl FieldSet {
    pub const EMPTY: FieldSet = FieldSet(0);
    pub const POSITION: FieldSet = FieldSet(Field::X.bit() | Field::Y.bit());
    /// Columns of a legacy density map.
    pub const DENSITY: FieldSet =
        FieldSet(Self::POSITION.0 | Field::N.bit() | Field::T.bit() | Field::M.bit());
    /// Columns of a legacy flow map.
    pub const FLOW: FieldSet = FieldSet(Self::POSITION.0 | Field::U.bit() | Field::V.bit());
    pub const ALL: FieldSet = FieldSet(Self::DENSITY.0 | Self::FLOW.0);

    pub const fn contains(self, field: Field) -> bool {
        self.0 & field.bit() != 0
    }

    pub fn insert(&mut self, field: Field) {
        self.0 |= field.bit();
    }

    pub const fn union(self, other: FieldSet) -> FieldSet {
        FieldSet(self.0 | other.0)
    }

    pub const fn intersection(self, other: FieldSet) -> FieldSet {
        FieldSet(self.0 & other.0)
    }

    pub const fn is_superset(self, other: FieldSet) -> bool {
        self.0 & other.0 == other.0
    }

    /// The fields of the set in canonical order.
    pub fn iter(self) -> impl Iterator<Item = Field> {
        Field::CANONICAL
            .into_iter()
            .filter(move |field| self.contains(*field))
    }

    /// The first field of `required` which is not in this set.
    pub fn first_missing(self, required: FieldSet) -> Option<Field> {
        required.iter().find(|field| !self.contains(*field))
    }
}

impl FromIterator<Field> for FieldSet {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        let mut set = FieldSet::EMPTY;
        for field in iter {
            set.insert(field);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Vector2};

    #[test]
    fn symbols_are_case_insensitive() {
        assert_eq!(Field::from_symbol("x"), Some(Field::X));
        assert_eq!(Field::from_symbol("M"), Some(Field::M));
        assert_eq!(Field::from_symbol("v"), Some(Field::V));
        assert_eq!(Field::from_symbol("Q"), None);
        assert_eq!(Field::from_symbol(""), None);
    }

    #[test]
    fn every_field_round_trips_through_its_symbol() {
        for field in Field::CANONICAL {
            assert_eq!(Field::from_symbol(field.symbol()), Some(field));
        }
    }

    #[test]
    fn assign_and_value_address_the_same_quantity() {
        let mut cell = Cell::default();
        for (i, field) in Field::CANONICAL.into_iter().enumerate() {
            field.assign(&mut cell, i as f64 + 0.5);
        }
        assert_eq!(cell.position, Point2::new(0.5, 1.5));
        assert_eq!(cell.num_atoms, 2.5);
        assert_eq!(cell.temperature, 3.5);
        assert_eq!(cell.mass, 4.5);
        assert_eq!(cell.flow, Vector2::new(5.5, 6.5));
        for (i, field) in Field::CANONICAL.into_iter().enumerate() {
            assert_eq!(field.value(&cell), i as f64 + 0.5);
        }
    }

    #[test]
    fn legacy_sets_partition_the_full_set() {
        assert!(FieldSet::ALL.is_superset(FieldSet::DENSITY));
        assert!(FieldSet::ALL.is_superset(FieldSet::FLOW));
        assert!(!FieldSet::DENSITY.contains(Field::U));
        assert!(!FieldSet::FLOW.contains(Field::M));
        assert_eq!(FieldSet::DENSITY.union(FieldSet::FLOW), FieldSet::ALL);
        assert_eq!(
            FieldSet::DENSITY.intersection(FieldSet::FLOW),
            FieldSet::POSITION
        );
    }

    #[test]
    fn iter_follows_canonical_order() {
        let set: FieldSet = [Field::V, Field::X, Field::M, Field::Y].into_iter().collect();
        let order: Vec<_> = set.iter().collect();
        assert_eq!(order, vec![Field::X, Field::Y, Field::M, Field::V]);
    }

    #[test]
    fn first_missing_reports_required_field() {
        let set: FieldSet = [Field::X, Field::Y, Field::N].into_iter().collect();
        assert_eq!(set.first_missing(FieldSet::DENSITY), Some(Field::T));
        assert_eq!(set.first_missing(FieldSet::POSITION), None);
    }
}
