//! # flowtools
//!
//! Reading, combining, analysing and drawing the two-dimensional flow field data maps
//! written by molecular-dynamics simulations of droplets.
//!
//! ## Layout
//!
//! - **[`core`]: Data and files.** Plain data models (`Cell`, `DataMap`, `Frame`,
//!   `SpreadSeries`) and the readers/writers for the plaintext map and spread formats.
//!
//! - **[`engine`]: Analysis.** Stateless operations on maps: aggregation across frames,
//!   coarsening and cutting of grids, droplet detection, spread collection and the
//!   combination of spread series from repeated runs.
//!
//! - **[`plot`]: Figures.** A scoped figure wrapper around `plotters` and renderers for
//!   flow fields, density maps and spreading curves.
//!
//! - **[`workflows`]: Procedures.** File-level operations over whole frame series which
//!   tie `core` and `engine` together, reporting progress as they go.

pub mod core;
pub mod engine;
pub mod plot;
pub mod workflows;
