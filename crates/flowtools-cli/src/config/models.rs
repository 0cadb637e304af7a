use flowtools::core::io::series::FrameNaming;
use flowtools::engine::config::DropletConfig;
use flowtools::plot::figure::FigureOptions;
use flowtools::plot::RGBColor;

#[derive(Debug, Clone, PartialEq)]
pub struct PlotSettings {
    pub size: (u32, u32),
    pub scale: f64,
    pub colour: RGBColor,
    pub sigma: f64,
    pub image_format: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub extension: String,
    pub num_digits: usize,
    pub droplet: DropletConfig,
    pub delta_t: f64,
    pub plot: PlotSettings,
}

impl AppConfig {
    /// Naming of the numbered map files under `base`.
    pub fn naming(&self, base: &str) -> FrameNaming {
        FrameNaming::new(base)
            .with_extension(self.extension.as_str())
            .with_num_digits(self.num_digits)
    }

    /// Naming of the figures drawn for a run under `base`.
    pub fn image_naming(&self, base: &str) -> FrameNaming {
        FrameNaming::new(base)
            .with_extension(format!(".{}", self.plot.image_format))
            .with_num_digits(self.num_digits)
    }

    pub fn figure(&self) -> FigureOptions {
        FigureOptions {
            size: self.plot.size,
            ..Default::default()
        }
    }
}
