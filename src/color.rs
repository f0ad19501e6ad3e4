// src/color.rs

//! Defines the packed 24-bit `Rgb` color type and conversion helpers.
//!
//! Colors travel through the canvas and renderer as packed `0xRRGGBB`
//! integers, matching the truecolor escape sequences the renderer
//! emits. A handful of named constants cover the default plot colors.

use serde::{Deserialize, Serialize};

/// A 24-bit color packed as `0xRRGGBB`.
///
/// The top byte of the backing `u32` is always zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rgb(u32);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0x000000);
    pub const WHITE: Rgb = Rgb(0xFFFFFF);
    /// Default color for expression plots.
    pub const GREEN: Rgb = Rgb(0x00FF00);
    /// Default color for CSV series plots.
    pub const CYAN: Rgb = Rgb(0x00FFFF);

    /// Creates a color from a packed `0xRRGGBB` value. Bits above the
    /// low 24 are discarded.
    #[inline]
    pub const fn new(packed: u32) -> Self {
        Rgb(packed & 0x00FF_FFFF)
    }

    /// Creates a color from individual components.
    #[inline]
    pub const fn from_components(r: u8, g: u8, b: u8) -> Self {
        Rgb(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    /// Returns the packed `0xRRGGBB` value.
    #[inline]
    pub const fn packed(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn r(self) -> u8 {
        ((self.0 >> 16) & 0xFF) as u8
    }

    #[inline]
    pub const fn g(self) -> u8 {
        ((self.0 >> 8) & 0xFF) as u8
    }

    #[inline]
    pub const fn b(self) -> u8 {
        (self.0 & 0xFF) as u8
    }

    /// Parses a hex color string, with or without a `0x`/`0X` prefix
    /// (e.g. `"0xFF8800"` or `"ff8800"`). Returns `None` if the string
    /// is not valid hex or does not fit in 24 bits.
    pub fn parse_hex(s: &str) -> Option<Rgb> {
        let digits = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.is_empty() || digits.len() > 6 {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Rgb::new)
    }
}

impl From<u32> for Rgb {
    fn from(packed: u32) -> Self {
        Rgb::new(packed)
    }
}
