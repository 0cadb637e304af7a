use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::{AppConfig, PlotSettings};
use crate::error::{CliError, Result};
use flowtools::engine::config::DropletConfig;
use flowtools::plot::colour::parse_colour;
use std::path::Path;
use std::str::FromStr;

/// Values given as command line flags, which take precedence over every other source.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    pub extension: Option<String>,
    pub num_digits: Option<usize>,
    pub min_mass: Option<f64>,
    pub columns: Option<usize>,
    pub delta_t: Option<f64>,
    pub size: Option<(u32, u32)>,
    pub scale: Option<f64>,
    pub colour: Option<String>,
    pub sigma: Option<f64>,
}

pub fn build_config(
    config_path: Option<&Path>,
    set_values: &[String],
    cli: &Overrides,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let file_config = apply_set_values(file_config, set_values)?;

    let files = file_config.files.unwrap_or_default();
    let droplet_file = file_config.droplet.unwrap_or_default();
    let spread_file = file_config.spread.unwrap_or_default();
    let plot_file = file_config.plot.unwrap_or_default();

    let droplet = DropletConfig {
        min_mass: cli
            .min_mass
            .or(droplet_file.min_mass)
            .unwrap_or(defaults.min_mass),
        columns: cli
            .columns
            .or(droplet_file.columns)
            .unwrap_or(defaults.columns),
    };
    droplet
        .validate()
        .map_err(|e| CliError::Config(e.to_string()))?;

    let size = cli.size.unwrap_or((
        plot_file.width.unwrap_or(defaults.size.0),
        plot_file.height.unwrap_or(defaults.size.1),
    ));
    if size.0 == 0 || size.1 == 0 {
        return Err(CliError::Config(format!(
            "Figure size must be positive, got {}x{}",
            size.0, size.1
        )));
    }

    let colour_name = cli
        .colour
        .clone()
        .or(plot_file.colour)
        .unwrap_or(defaults.colour);
    let colour = parse_colour(&colour_name).map_err(|e| CliError::Config(e.to_string()))?;

    let image_format = plot_file
        .format
        .unwrap_or(defaults.image_format)
        .to_ascii_lowercase();
    if !matches!(image_format.as_str(), "png" | "svg") {
        return Err(CliError::Config(format!(
            "Unsupported image format '{image_format}', expected 'png' or 'svg'"
        )));
    }

    Ok(AppConfig {
        extension: cli
            .extension
            .clone()
            .or(files.extension)
            .unwrap_or(defaults.extension),
        num_digits: cli
            .num_digits
            .or(files.num_digits)
            .unwrap_or(defaults.num_digits),
        droplet,
        delta_t: cli
            .delta_t
            .or(spread_file.delta_t)
            .unwrap_or(defaults.delta_t),
        plot: PlotSettings {
            size,
            scale: cli.scale.or(plot_file.scale).unwrap_or(defaults.scale),
            colour,
            sigma: cli.sigma.or(plot_file.sigma).unwrap_or(defaults.sigma),
            image_format,
        },
    })
}

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        CliError::Config(format!(
            "Invalid {} value for {}: {}",
            std::any::type_name::<T>(),
            key,
            value
        ))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };
        let key = key.trim();

        match key {
            "files.extension" => {
                config.files.get_or_insert_with(Default::default).extension =
                    Some(value.trim().to_string());
            }
            "files.num-digits" => {
                config.files.get_or_insert_with(Default::default).num_digits =
                    Some(parse_value(key, value)?);
            }
            "droplet.min-mass" => {
                config.droplet.get_or_insert_with(Default::default).min_mass =
                    Some(parse_value(key, value)?);
            }
            "droplet.columns" => {
                config.droplet.get_or_insert_with(Default::default).columns =
                    Some(parse_value(key, value)?);
            }
            "spread.delta-t" => {
                config.spread.get_or_insert_with(Default::default).delta_t =
                    Some(parse_value(key, value)?);
            }
            "plot.width" => {
                config.plot.get_or_insert_with(Default::default).width =
                    Some(parse_value(key, value)?);
            }
            "plot.height" => {
                config.plot.get_or_insert_with(Default::default).height =
                    Some(parse_value(key, value)?);
            }
            "plot.scale" => {
                config.plot.get_or_insert_with(Default::default).scale =
                    Some(parse_value(key, value)?);
            }
            "plot.colour" => {
                config.plot.get_or_insert_with(Default::default).colour =
                    Some(value.trim().to_string());
            }
            "plot.sigma" => {
                config.plot.get_or_insert_with(Default::default).sigma =
                    Some(parse_value(key, value)?);
            }
            "plot.format" => {
                config.plot.get_or_insert_with(Default::default).format =
                    Some(value.trim().to_string());
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use flowtools::plot::RGBColor;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("flowtools.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    #[test]
    fn defaults_apply_without_other_sources() {
        let config = build_config(None, &[], &Overrides::default()).unwrap();
        let defaults = DefaultsConfig::default();
        assert_eq!(config.extension, defaults.extension);
        assert_eq!(config.num_digits, defaults.num_digits);
        assert_eq!(config.droplet, DropletConfig::default());
        assert_eq!(config.delta_t, defaults.delta_t);
        assert_eq!(config.plot.size, defaults.size);
        assert_eq!(config.plot.colour, RGBColor(0, 0, 255));
        assert_eq!(config.plot.image_format, "png");
    }

    #[test]
    fn file_values_override_defaults() {
        let (_dir, path) = write_config(
            r#"
            [files]
            extension = ".txt"
            num-digits = 3

            [droplet]
            min-mass = 2.5
            columns = 2

            [spread]
            delta-t = 10.0

            [plot]
            width = 400
            colour = "red"
            format = "svg"
            "#,
        );
        let config = build_config(Some(&path), &[], &Overrides::default()).unwrap();
        assert_eq!(config.extension, ".txt");
        assert_eq!(config.num_digits, 3);
        assert_eq!(config.droplet.min_mass, 2.5);
        assert_eq!(config.droplet.columns, 2);
        assert_eq!(config.delta_t, 10.0);
        assert_eq!(config.plot.size, (400, DefaultsConfig::default().size.1));
        assert_eq!(config.plot.colour, RGBColor(255, 0, 0));
        assert_eq!(config.plot.image_format, "svg");
        assert_eq!(config.naming("run/map_").path(7).to_str(), Some("run/map_007.txt"));
    }

    #[test]
    fn set_values_override_file_and_flags_override_both() {
        let (_dir, path) = write_config("[droplet]\nmin-mass = 1.0\ncolumns = 2\n");
        let set = vec![
            "droplet.min-mass=3.0".to_string(),
            "droplet.columns=4".to_string(),
            "spread.delta-t=0.5".to_string(),
        ];
        let cli = Overrides {
            min_mass: Some(5.0),
            ..Default::default()
        };
        let config = build_config(Some(&path), &set, &cli).unwrap();
        assert_relative_eq!(config.droplet.min_mass, 5.0);
        assert_eq!(config.droplet.columns, 4);
        assert_relative_eq!(config.delta_t, 0.5);
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        let (_dir, path) = write_config("[droplet]\nmass = 1.0\n");
        assert!(matches!(
            build_config(Some(&path), &[], &Overrides::default()),
            Err(CliError::FileParsing { .. })
        ));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for set in ["droplet.min-mass", "droplet.min-mass=heavy", "droplet.size=2"] {
            assert!(matches!(
                build_config(None, &[set.to_string()], &Overrides::default()),
                Err(CliError::Config(_))
            ));
        }
    }

    #[test]
    fn invalid_values_are_rejected() {
        let cli = Overrides {
            columns: Some(0),
            ..Default::default()
        };
        assert!(build_config(None, &[], &cli).is_err());

        let cli = Overrides {
            colour: Some("mauve".to_string()),
            ..Default::default()
        };
        assert!(build_config(None, &[], &cli).is_err());

        let set = vec!["plot.format=gif".to_string()];
        assert!(build_config(None, &set, &Overrides::default()).is_err());
    }
}
