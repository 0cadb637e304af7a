//! # Workflows
//!
//! File-level procedures over the map files of a whole run. Each workflow finds
//! its input frames on disk, streams them through the operations of
//! [`engine`](crate::engine) one group at a time, writes its results and
//! reports progress through a [`ProgressReporter`](crate::engine::progress::ProgressReporter).
//!
//! - [`average`]: average every `n` consecutive maps of a run into one.
//! - [`convert`]: merge legacy density and flow maps into current maps.
//! - [`spread`]: collect the spreading of a droplet through a run.
//! - [`render`]: draw one figure per frame of a run.

pub mod average;
pub mod convert;
pub mod error;
pub mod render;
pub mod spread;

use crate::core::io::datamap::DataMapFile;
use crate::core::io::traits::DataFile;
use crate::core::models::map::DataMap;
use error::WorkflowError;
use std::path::Path;
use tracing::debug;

pub(crate) fn read_map(path: &Path) -> Result<DataMap, WorkflowError> {
    debug!(path = %path.display(), "Reading map.");
    DataMapFile::read_from_path(path).map_err(|source| WorkflowError::ReadMap {
        path: path.to_path_buf(),
        source,
    })
}

pub(crate) fn write_map(map: &DataMap, path: &Path) -> Result<(), WorkflowError> {
    debug!(path = %path.display(), "Writing map.");
    DataMapFile::write_to_path(map, path).map_err(|source| WorkflowError::WriteMap {
        path: path.to_path_buf(),
        source,
    })
}
