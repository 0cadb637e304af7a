use super::config::ConfigError;
use crate::core::models::map::GridError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EngineError {
    #[error("No {0} to operate on")]
    EmptyInput(&'static str),

    #[error("Map {index} has a different grid ({found}) than the first map ({expected})")]
    ShapeMismatch {
        index: usize,
        expected: String,
        found: String,
    },

    #[error("Frame {index} at time {found} does not follow the previous frame at {previous}")]
    NotIncreasing {
        index: usize,
        previous: f64,
        found: f64,
    },

    #[error("Frames are not equidistant in time: frame {index} is at {found}, expected {expected}")]
    NotEquidistant {
        index: usize,
        expected: f64,
        found: f64,
    },

    #[error("Floor row {floor} is outside of a map with {rows} rows")]
    FloorOutOfRange { floor: usize, rows: usize },

    #[error("Cannot combine {factor} cells along {axis} of a grid with {cells} cells")]
    InvalidFactor {
        axis: char,
        factor: usize,
        cells: usize,
    },

    #[error("Need at least {needed} spread records, found {found}")]
    TooFewRecords { needed: usize, found: usize },

    #[error("No cells inside the cut region")]
    EmptyCut,

    #[error("Invalid grid: {0}")]
    Grid(#[from] GridError),

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
