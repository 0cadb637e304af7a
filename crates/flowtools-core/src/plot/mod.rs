//! # Plot Module
//!
//! Figures of data maps and spread series, drawn with `plotters`.
//!
//! A [`figure::Figure`] owns the canvas: it picks a backend from the output
//! file extension, fills the background, hands the drawing area to a
//! [`figure::Render`] implementation and presents the canvas afterwards,
//! also when rendering fails.
//!
//! - **Flow fields** ([`flow`]) - Arrows of the droplet flow, optionally coloured by temperature
//! - **Density maps** ([`density`]) - Droplet cells coloured by their mass
//! - **Spreading** ([`spread`]) - Contact line edges or radius against time, with error bars
//! - **Lines** ([`line`]) - Plain curves such as spreading velocities and flow profiles
//! - **Colours** ([`colour`]) - Named colours, the default colour cycle and gradients

pub mod colour;
pub mod density;
pub mod error;
pub mod figure;
pub mod flow;
pub mod line;
pub mod spread;

pub use plotters::style::RGBColor;
