use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlotError {
    #[error("Drawing failed: {0}")]
    Drawing(String),
    #[error("Nothing to draw: {0}")]
    NoData(&'static str),
    #[error("Unknown colour '{0}'")]
    UnknownColour(String),
}

pub(crate) fn drawing_error(error: impl std::fmt::Display) -> PlotError {
    PlotError::Drawing(error.to_string())
}
