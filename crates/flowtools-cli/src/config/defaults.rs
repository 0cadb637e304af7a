use flowtools::core::io::series::{DEFAULT_EXTENSION, DEFAULT_NUM_DIGITS};
use flowtools::plot::figure::DEFAULT_SIZE;

pub struct DefaultsConfig {
    pub extension: String,
    pub num_digits: usize,
    pub min_mass: f64,
    pub columns: usize,
    pub delta_t: f64,
    pub size: (u32, u32),
    pub scale: f64,
    pub colour: String,
    pub sigma: f64,
    pub image_format: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            num_digits: DEFAULT_NUM_DIGITS,
            min_mass: 0.0,
            columns: 1,
            delta_t: 1.0,
            size: DEFAULT_SIZE,
            scale: 1.0,
            colour: "blue".to_string(),
            sigma: 1.0,
            image_format: "png".to_string(),
        }
    }
}
