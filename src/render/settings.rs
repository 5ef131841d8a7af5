// SPDX-License-Identifier: GPL-3.0-or-later
use serde::Deserialize;

use crate::error::Error;
use crate::settings::gradient;
use crate::temperature::{Temperature, TemperatureRange};

use super::color::Color;
use super::gradient::ColorGradient;
use super::interpolate::Method;

fn default_lower_limit() -> Temperature {
    Temperature::Celsius(TemperatureRange::DEFAULT_MIN)
}

fn default_upper_limit() -> Temperature {
    Temperature::Celsius(TemperatureRange::DEFAULT_MAX)
}

fn default_color_depth() -> usize {
    ColorGradient::DEFAULT_DEPTH
}

fn default_cold_color() -> Color {
    Color::INDIGO
}

fn default_hot_color() -> Color {
    Color::RED
}

fn default_plot_colors() -> colorous::Gradient {
    colorous::INFERNO
}

#[derive(Clone, Copy, Debug, Deserialize)]
pub(crate) struct RenderSettings {
    /// The temperature mapped to the cold end of the gradient.
    #[serde(default = "default_lower_limit")]
    pub(crate) lower_limit: Temperature,

    /// The temperature mapped to the hot end of the gradient.
    #[serde(default = "default_upper_limit")]
    pub(crate) upper_limit: Temperature,

    /// The number of distinct colors in the gradient.
    #[serde(default = "default_color_depth")]
    pub(crate) color_depth: usize,

    #[serde(default = "default_cold_color")]
    pub(crate) cold_color: Color,

    #[serde(default = "default_hot_color")]
    pub(crate) hot_color: Color,

    #[serde(default)]
    pub(crate) interpolation: Method,

    /// The colormap used for the raw data plot.
    #[serde(default = "default_plot_colors", deserialize_with = "gradient::deserialize")]
    pub(crate) plot_colors: colorous::Gradient,
}

impl RenderSettings {
    /// The configured limits as a validated range in Celsius.
    pub(crate) fn range(&self) -> Result<TemperatureRange, Error> {
        TemperatureRange::from_temperatures(self.lower_limit, self.upper_limit)
    }
}

impl PartialEq for RenderSettings {
    fn eq(&self, other: &Self) -> bool {
        self.lower_limit == other.lower_limit
            && self.upper_limit == other.upper_limit
            && self.color_depth == other.color_depth
            && self.cold_color == other.cold_color
            && self.hot_color == other.hot_color
            && self.interpolation == other.interpolation
            // colorous gradients don't implement PartialEq
            && format!("{:?}", self.plot_colors) == format!("{:?}", other.plot_colors)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            lower_limit: default_lower_limit(),
            upper_limit: default_upper_limit(),
            color_depth: default_color_depth(),
            cold_color: default_cold_color(),
            hot_color: default_hot_color(),
            interpolation: Method::default(),
            plot_colors: default_plot_colors(),
        }
    }
}

#[cfg(test)]
mod test {
    use std::convert::TryFrom;

    use super::RenderSettings;
    use crate::error::Error;
    use crate::render::{Color, Method, Renderer};
    use crate::temperature::Temperature;

    fn parse(source: &str) -> RenderSettings {
        let parsed: Result<RenderSettings, _> = toml::from_str(source);
        assert!(
            parsed.is_ok(),
            "Failed to parse render settings: {}",
            parsed.unwrap_err()
        );
        parsed.unwrap()
    }

    #[test]
    fn defaults() {
        let parsed = parse("");
        assert_eq!(parsed, RenderSettings::default());
        let range = parsed.range().unwrap();
        assert_eq!(range.min(), 26.0);
        assert_eq!(range.max(), 32.0);
    }

    #[test]
    fn limits() {
        let parsed = parse(
            r#"
            lower_limit = 20
            upper_limit = { fahrenheit = 95 }
            "#,
        );
        assert_eq!(parsed.lower_limit, Temperature::Celsius(20.0));
        assert_eq!(parsed.upper_limit, Temperature::Fahrenheit(95.0));
        let range = parsed.range().unwrap();
        assert_eq!(range.min(), 20.0);
        assert!((range.max() - 35.0).abs() < 1e-4);
    }

    #[test]
    fn inverted_limits() {
        let parsed = parse("lower_limit = 30\nupper_limit = 25");
        assert!(matches!(
            parsed.range(),
            Err(Error::DegenerateRange { .. })
        ));
    }

    #[test]
    fn colors() {
        let parsed = parse(
            r##"
            cold_color = "000000"
            hot_color = "#ffffff"
            color_depth = 256
            plot_colors = "viridis"
            "##,
        );
        let expected = RenderSettings {
            cold_color: Color::BLACK,
            hot_color: Color::WHITE,
            color_depth: 256,
            plot_colors: colorous::VIRIDIS,
            ..RenderSettings::default()
        };
        assert_eq!(parsed, expected);
    }

    #[test]
    fn interpolation() {
        let parsed = parse("interpolation = \"nearest\"");
        assert_eq!(parsed.interpolation, Method::Nearest);
        let parsed = parse("interpolation = \"bicubic\"");
        assert_eq!(parsed.interpolation, Method::Cubic);
    }

    #[test]
    fn bad_plot_colors() {
        let parsed: Result<RenderSettings, _> = toml::from_str("plot_colors = \"plaid\"");
        assert!(parsed.is_err());
    }

    #[test]
    fn builds_renderer() {
        let settings = parse("color_depth = 16");
        let renderer = Renderer::try_from(&settings).unwrap();
        assert_eq!(renderer.gradient().depth(), 16);
        assert_eq!(renderer.gradient().get(0), Color::INDIGO);
        assert_eq!(renderer.gradient().get(15), Color::RED);
    }

    #[test]
    fn rejects_tiny_depth() {
        let settings = parse("color_depth = 1");
        assert!(matches!(
            Renderer::try_from(&settings),
            Err(Error::InvalidColorDepth(1))
        ));
    }
}
