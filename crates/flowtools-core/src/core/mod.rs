//! # Core Module
//!
//! Data models for flow field maps and the file formats they are stored in.
//!
//! - **Models** ([`models`]) - cells, grids of cells, frames and spread series
//! - **File I/O** ([`io`]) - the current data map format, the legacy density and flow
//!   map formats, spread files and the naming of frame series on disk

pub mod io;
pub mod models;
