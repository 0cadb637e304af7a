use crate::core::io::spread::SpreadFileError;
use crate::core::io::MapFormatError;
use crate::engine::error::EngineError;
use crate::plot::error::PlotError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("No map files found, expected the first at '{}'", .0.display())]
    NoFrames(PathBuf),

    #[error("Failed to read map '{path}': {source}", path = path.display())]
    ReadMap {
        path: PathBuf,
        #[source]
        source: MapFormatError,
    },

    #[error("Failed to write map '{path}': {source}", path = path.display())]
    WriteMap {
        path: PathBuf,
        #[source]
        source: MapFormatError,
    },

    #[error("Failed to access spread file '{path}': {source}", path = path.display())]
    SpreadFile {
        path: PathBuf,
        #[source]
        source: SpreadFileError,
    },

    #[error("Failed to draw '{path}': {source}", path = path.display())]
    Plot {
        path: PathBuf,
        #[source]
        source: PlotError,
    },

    #[error("Map '{path}': {source}", path = path.display())]
    Frame {
        path: PathBuf,
        #[source]
        source: EngineError,
    },

    #[error(transparent)]
    Engine(#[from] EngineError),
}
