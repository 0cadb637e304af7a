use flowtools::core::io::MapFormatError;
use flowtools::core::io::spread::SpreadFileError;
use flowtools::engine::error::EngineError;
use flowtools::plot::error::PlotError;
use flowtools::workflows::error::WorkflowError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to access map '{path}': {source}", path = path.display())]
    Map {
        path: PathBuf,
        #[source]
        source: MapFormatError,
    },

    #[error("Failed to access spread file '{path}': {source}", path = path.display())]
    Spread {
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

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
