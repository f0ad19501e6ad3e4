// src/config.rs

//! Configuration for the plotting session.
//!
//! Settings are grouped into small serde-deserializable sections with
//! sensible defaults, so a configuration file only needs to name the
//! fields it overrides. The file format is JSON; the path is taken
//! from the `DOTPLOT_CONFIG` environment variable when set.

use std::fs;

use log::{info, warn};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::color::Rgb;
use crate::viewport::Viewport;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "DOTPLOT_CONFIG";

/// Minimum tick count per axis; the axis cadence divides by
/// `ticks - 1`.
const MIN_TICKS: usize = 2;

/// Global configuration, loaded once on first access.
pub static CONFIG: Lazy<Config> = Lazy::new(Config::load_or_default);

/// Complete session configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Canvas dimensions.
    pub canvas: CanvasConfig,
    /// Initial world-space window.
    pub viewport: Viewport,
    /// Axis tick counts.
    pub axes: AxesConfig,
    /// Color output and default plot colors.
    pub colors: ColorConfig,
}

/// Pixel dimensions of the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width_px: usize,
    pub height_px: usize,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        // 100x64 pixels: 50x16 braille cells, fits an 80x24 terminal
        // with room for the axis gutter.
        CanvasConfig {
            width_px: 100,
            height_px: 64,
        }
    }
}

/// Tick counts for the axis renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AxesConfig {
    pub x_ticks: usize,
    pub y_ticks: usize,
}

impl Default for AxesConfig {
    fn default() -> Self {
        AxesConfig {
            x_ticks: 5,
            y_ticks: 5,
        }
    }
}

/// Color settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Emit truecolor escape sequences.
    pub enabled: bool,
    /// Default color for expression plots.
    pub expr: Rgb,
    /// Default color for CSV series plots.
    pub csv: Rgb,
}

impl Default for ColorConfig {
    fn default() -> Self {
        ColorConfig {
            enabled: true,
            expr: Rgb::GREEN,
            csv: Rgb::CYAN,
        }
    }
}

impl Config {
    /// Loads configuration from the file named by `DOTPLOT_CONFIG`,
    /// falling back to defaults when the variable is unset or the
    /// file is missing or malformed. Tick counts are clamped to at
    /// least [`MIN_TICKS`] either way.
    pub fn load_or_default() -> Self {
        let mut config = match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => match fs::read_to_string(&path) {
                Ok(text) => match serde_json::from_str::<Config>(&text) {
                    Ok(config) => {
                        info!("loaded configuration from {}", path);
                        config
                    }
                    Err(e) => {
                        warn!("{}: invalid configuration ({}), using defaults", path, e);
                        Config::default()
                    }
                },
                Err(e) => {
                    warn!("{}: cannot read configuration ({}), using defaults", path, e);
                    Config::default()
                }
            },
            Err(_) => Config::default(),
        };
        config.clamp_ticks();
        config
    }

    fn clamp_ticks(&mut self) {
        if self.axes.x_ticks < MIN_TICKS || self.axes.y_ticks < MIN_TICKS {
            warn!(
                "tick counts {}x{} below minimum {}, clamping",
                self.axes.x_ticks, self.axes.y_ticks, MIN_TICKS
            );
            self.axes.x_ticks = self.axes.x_ticks.max(MIN_TICKS);
            self.axes.y_ticks = self.axes.y_ticks.max(MIN_TICKS);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_classic_session() {
        let c = Config::default();
        assert_eq!((c.canvas.width_px, c.canvas.height_px), (100, 64));
        assert_eq!((c.axes.x_ticks, c.axes.y_ticks), (5, 5));
        assert_eq!(c.viewport, Viewport::default());
        assert_eq!(c.colors.expr, Rgb::GREEN);
        assert_eq!(c.colors.csv, Rgb::CYAN);
        assert!(c.colors.enabled);
    }

    #[test]
    fn partial_json_fills_in_defaults() {
        let c: Config =
            serde_json::from_str(r#"{"canvas": {"width_px": 40}, "colors": {"enabled": false}}"#)
                .unwrap();
        assert_eq!(c.canvas.width_px, 40);
        assert_eq!(c.canvas.height_px, 64);
        assert!(!c.colors.enabled);
        assert_eq!(c.colors.expr, Rgb::GREEN);
    }

    #[test]
    fn tick_clamping_enforces_the_minimum() {
        let mut c = Config::default();
        c.axes.x_ticks = 0;
        c.axes.y_ticks = 1;
        c.clamp_ticks();
        assert_eq!((c.axes.x_ticks, c.axes.y_ticks), (2, 2));
    }
}
