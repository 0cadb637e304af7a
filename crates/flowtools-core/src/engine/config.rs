use thiserror::Error;

#[derive(Debug, Error, PartialEq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value {value} for parameter '{name}': {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Options deciding which cells of a map belong to the droplet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropletConfig {
    /// Minimum mass of a droplet cell.
    pub min_mass: f64,
    /// Number of columns to each side searched for a connection to the neighbouring row.
    pub columns: usize,
}

impl Default for DropletConfig {
    fn default() -> Self {
        Self {
            min_mass: 0.0,
            columns: 1,
        }
    }
}

impl DropletConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min_mass.is_finite() || self.min_mass < 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "min_mass",
                value: self.min_mass.to_string(),
                reason: "must be a non-negative number",
            });
        }
        if self.columns == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "columns",
                value: self.columns.to_string(),
                reason: "at least one neighbouring column must be searched",
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpreadConfig {
    /// Row of the substrate floor, in which the contact line is measured.
    pub floor: usize,
    pub droplet: DropletConfig,
}

#[derive(Default)]
pub struct SpreadConfigBuilder {
    floor: Option<usize>,
    min_mass: Option<f64>,
    columns: Option<usize>,
}

impl SpreadConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn floor(mut self, row: usize) -> Self {
        self.floor = Some(row);
        self
    }
    pub fn min_mass(mut self, mass: f64) -> Self {
        self.min_mass = Some(mass);
        self
    }
    pub fn columns(mut self, columns: usize) -> Self {
        self.columns = Some(columns);
        self
    }

    /// Builds the configuration. Droplet options not set take their defaults.
    pub fn build(self) -> Result<SpreadConfig, ConfigError> {
        let defaults = DropletConfig::default();
        let droplet = DropletConfig {
            min_mass: self.min_mass.unwrap_or(defaults.min_mass),
            columns: self.columns.unwrap_or(defaults.columns),
        };
        droplet.validate()?;

        Ok(SpreadConfig {
            floor: self.floor.ok_or(ConfigError::MissingParameter("floor"))?,
            droplet,
        })
    }
}
