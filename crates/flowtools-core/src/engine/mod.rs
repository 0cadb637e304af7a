//! # Engine Module
//!
//! This module implements the numerical operations on data maps and spread
//! series: everything that transforms data in memory, without touching files.
//!
//! ## Overview
//!
//! Every operation takes immutable maps, frames or series and returns new ones.
//! Droplet membership is computed as a separate mask and never stored in a map.
//!
//! ## Architecture
//!
//! - **Aggregation** ([`aggregate`]) - Averaging and summing maps, coarsening and cutting grids
//! - **Droplet Detection** ([`droplet`]) - The droplet mask, floor row and centre of mass
//! - **Spread Collection** ([`spread`]) - Contact line edges of a droplet through a frame series
//! - **Spread Combination** ([`combine`]) - Means and standard errors over repeated runs
//! - **Spreading Velocity** ([`velocity`]) - Smoothed rates of change of a spread series
//! - **Flow Profiles** ([`profile`]) - Flow along x against height, with a linear fit
//! - **Legacy Conversion** ([`legacy`]) - Merging split density/flow maps and decumulating them
//! - **Configuration** ([`config`]) - Droplet and spread collection options
//! - **Progress Monitoring** ([`progress`]) - Progress reporting for long-running workflows
//! - **Error Handling** ([`error`]) - Engine-specific error types

pub mod aggregate;
pub mod combine;
pub mod config;
pub mod droplet;
pub mod error;
pub mod legacy;
pub mod profile;
pub mod progress;
pub mod spread;
pub mod velocity;
