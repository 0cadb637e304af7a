pub mod aggregate;
pub mod average;
pub mod coarsen;
pub mod combine_spread;
pub mod convert;
pub mod cut;
pub mod info;
pub mod plot;
pub mod print;
pub mod profile;
pub mod retime;
pub mod spread;
pub mod spread_velocity;

use crate::cli::{DropletArgs, FigureArgs, NamingArgs};
use crate::config::builder::{Overrides, build_config};
use crate::config::models::AppConfig;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use flowtools::core::io::datamap::DataMapFile;
use flowtools::core::io::traits::DataFile;
use flowtools::core::models::map::DataMap;
use flowtools::plot::figure::FigureOptions;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct Context {
    pub config: Option<PathBuf>,
    pub set_values: Vec<String>,
    pub quiet: bool,
}

impl Context {
    pub fn config(&self, overrides: &Overrides) -> Result<AppConfig> {
        build_config(self.config.as_deref(), &self.set_values, overrides)
    }

    pub fn progress(&self) -> CliProgressHandler {
        if self.quiet {
            CliProgressHandler::hidden()
        } else {
            CliProgressHandler::new()
        }
    }
}

impl Overrides {
    pub fn with_naming(mut self, naming: &NamingArgs) -> Self {
        self.extension = naming.extension.clone();
        self.num_digits = naming.num_digits;
        self
    }

    pub fn with_droplet(mut self, droplet: &DropletArgs) -> Self {
        self.min_mass = droplet.min_mass;
        self.columns = droplet.columns;
        self
    }

    pub fn with_figure(mut self, figure: &FigureArgs) -> Result<Self> {
        self.size = match figure.size.as_deref() {
            None => None,
            Some(&[width, height]) => Some((width, height)),
            Some(other) => {
                return Err(CliError::Argument(format!(
                    "--size takes a width and a height, got {} value(s)",
                    other.len()
                )));
            }
        };
        Ok(self)
    }
}

/// Figure options from the command line on top of the configured size.
fn figure_options(args: &FigureArgs, config: &AppConfig) -> FigureOptions {
    let pair = |min: Option<f64>, max: Option<f64>| min.zip(max);
    FigureOptions {
        title: args.title.clone(),
        x_label: args.xlabel.clone(),
        y_label: args.ylabel.clone(),
        x_range: pair(args.xmin, args.xmax),
        y_range: pair(args.ymin, args.ymax),
        ..config.figure()
    }
}

fn read_map(path: &Path) -> Result<DataMap> {
    debug!("Reading map from {:?}", path);
    DataMapFile::read_from_path(path).map_err(|source| CliError::Map {
        path: path.to_path_buf(),
        source,
    })
}

fn write_map(map: &DataMap, path: &Path) -> Result<()> {
    debug!("Writing map to {:?}", path);
    DataMapFile::write_to_path(map, path).map_err(|source| CliError::Map {
        path: path.to_path_buf(),
        source,
    })
}
