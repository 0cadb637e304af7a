use super::error::PlotError;
use phf::phf_map;
use plotters::style::RGBColor;

static NAMED_COLOURS: phf::Map<&'static str, RGBColor> = phf_map! {
    "blue" => RGBColor(0, 0, 255),
    "green" => RGBColor(0, 128, 0),
    "red" => RGBColor(255, 0, 0),
    "cyan" => RGBColor(0, 191, 191),
    "magenta" => RGBColor(191, 0, 191),
    "yellow" => RGBColor(191, 191, 0),
    "black" => RGBColor(0, 0, 0),
    "white" => RGBColor(255, 255, 255),
    "gray" => RGBColor(128, 128, 128),
    "orange" => RGBColor(255, 165, 0),
};

/// Colours given to lines when none are chosen, in order.
pub const DEFAULT_CYCLE: [&str; 7] = ["blue", "green", "red", "cyan", "magenta", "yellow", "black"];

/// Parses a colour name or a `#rrggbb` hex code.
pub fn parse_colour(name: &str) -> Result<RGBColor, PlotError> {
    let lower = name.trim().to_ascii_lowercase();
    if let Some(colour) = NAMED_COLOURS.get(lower.as_str()) {
        return Ok(*colour);
    }

    let unknown = || PlotError::UnknownColour(name.to_string());
    let hex = lower.strip_prefix('#').ok_or_else(unknown)?;
    if hex.len() != 6 || !hex.is_ascii() {
        return Err(unknown());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| unknown());
    Ok(RGBColor(channel(0)?, channel(2)?, channel(4)?))
}

/// Colours for `count` lines: the given colours first, then the default cycle repeated.
pub fn colour_cycle(given: &[RGBColor], count: usize) -> Vec<RGBColor> {
    let defaults = DEFAULT_CYCLE
        .iter()
        .filter_map(|name| NAMED_COLOURS.get(*name).copied())
        .cycle();
    given.iter().copied().chain(defaults).take(count).collect()
}

/// Maps values in a range onto a colour gradient.
pub struct Colormap {
    gradient: Box<dyn colorgrad::Gradient>,
    min: f64,
    max: f64,
    reversed: bool,
}

impl Colormap {
    /// Cold to hot, blue to red.
    pub fn temperature(min: f64, max: f64) -> Self {
        Self {
            gradient: Box::new(colorgrad::preset::rd_yl_bu()),
            min,
            max,
            reversed: true,
        }
    }

    /// Light to dark blue with increasing value.
    pub fn density(min: f64, max: f64) -> Self {
        Self {
            gradient: Box::new(colorgrad::preset::blues()),
            min,
            max,
            reversed: false,
        }
    }

    /// Position of a value in the range, clamped to `[0, 1]`.
    pub fn normalise(&self, value: f64) -> f64 {
        let t = if self.max > self.min {
            (value - self.min) / (self.max - self.min)
        } else {
            0.5
        };
        let t = t.clamp(0.0, 1.0);
        if self.reversed { 1.0 - t } else { t }
    }

    pub fn colour(&self, value: f64) -> RGBColor {
        let rgba = self.gradient.at(self.normalise(value) as f32).to_rgba8();
        RGBColor(rgba[0], rgba[1], rgba[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_and_hex_colours_are_parsed() {
        assert_eq!(parse_colour("Blue"), Ok(RGBColor(0, 0, 255)));
        assert_eq!(parse_colour("#ff8000"), Ok(RGBColor(255, 128, 0)));
        assert_eq!(
            parse_colour("mauve"),
            Err(PlotError::UnknownColour("mauve".to_string()))
        );
        assert!(parse_colour("#12345").is_err());
        assert!(parse_colour("#gg0000").is_err());
    }

    #[test]
    fn cycle_prefers_given_colours_then_repeats_defaults() {
        let given = [RGBColor(1, 2, 3)];
        let colours = colour_cycle(&given, 9);
        assert_eq!(colours.len(), 9);
        assert_eq!(colours[0], RGBColor(1, 2, 3));
        assert_eq!(colours[1], RGBColor(0, 0, 255));
        assert_eq!(colours[7], RGBColor(0, 0, 0));
        assert_eq!(colours[8], RGBColor(0, 0, 255));
        assert_eq!(colour_cycle(&given, 0), vec![]);
    }

    #[test]
    fn colormap_normalises_and_clamps() {
        let density = Colormap::density(0.0, 2.0);
        assert_eq!(density.normalise(1.0), 0.5);
        assert_eq!(density.normalise(5.0), 1.0);
        assert_eq!(density.normalise(-1.0), 0.0);

        let temperature = Colormap::temperature(300.0, 400.0);
        assert_eq!(temperature.normalise(400.0), 0.0);

        let flat = Colormap::density(1.0, 1.0);
        assert_eq!(flat.normalise(1.0), 0.5);
    }

    #[test]
    fn hot_and_cold_get_different_colours() {
        let colormap = Colormap::temperature(300.0, 400.0);
        assert_ne!(colormap.colour(300.0), colormap.colour(400.0));
    }
}
