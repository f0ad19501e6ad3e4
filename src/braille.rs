// src/braille.rs

//! Braille cell encoding: the fixed mapping between 2x4 sub-cell
//! coordinates, dot bits, and displayable codepoints.
//!
//! One terminal character cell holds a 2-wide by 4-tall grid of
//! sub-pixels. Each sub-pixel corresponds to one bit of an 8-bit
//! `DotMask`, and `U+2800 + mask` is the glyph that displays exactly
//! those dots. The bit layout is dictated by the Unicode braille block
//! and must not be altered.

use bitflags::bitflags;

/// Sub-pixels per cell, horizontally.
pub const CELL_WIDTH_PX: usize = 2;
/// Sub-pixels per cell, vertically.
pub const CELL_HEIGHT_PX: usize = 4;

/// First codepoint of the Unicode braille patterns block.
pub const BRAILLE_BLOCK_START: u32 = 0x2800;

// Dot bit index per sub-cell row, one table per column. The braille
// block numbers dots 1-3 and 7 down the left column, 4-6 and 8 down
// the right, which is why the bottom row bits (6 and 7) break the
// otherwise sequential pattern.
const LEFT_COLUMN_BITS: [u8; CELL_HEIGHT_PX] = [0, 1, 2, 6]; // dots 1, 2, 3, 7
const RIGHT_COLUMN_BITS: [u8; CELL_HEIGHT_PX] = [3, 4, 5, 7]; // dots 4, 5, 6, 8

bitflags! {
    /// The 8 dot bits of one braille cell.
    ///
    /// `DotMask::all().bits() == 0xFF`, which displays as `U+28FF`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct DotMask: u8 {
        const DOT_1 = 1 << 0;
        const DOT_2 = 1 << 1;
        const DOT_3 = 1 << 2;
        const DOT_4 = 1 << 3;
        const DOT_5 = 1 << 4;
        const DOT_6 = 1 << 5;
        const DOT_7 = 1 << 6;
        const DOT_8 = 1 << 7;
    }
}

/// Returns the dot bit for sub-cell position (`col`, `row`), with
/// `col` in `0..2` and `row` in `0..4`.
///
/// # Panics
/// Panics in debug builds if `col` or `row` is out of range.
#[inline]
pub fn dot(col: usize, row: usize) -> DotMask {
    debug_assert!(col < CELL_WIDTH_PX, "dot column out of range: {}", col);
    debug_assert!(row < CELL_HEIGHT_PX, "dot row out of range: {}", row);
    let bit = if col == 0 {
        LEFT_COLUMN_BITS[row]
    } else {
        RIGHT_COLUMN_BITS[row]
    };
    DotMask::from_bits_retain(1 << bit)
}

/// Returns the displayable glyph for a dot mask: `U+2800 + mask`.
///
/// Every mask value maps into the braille block, so this is total.
#[inline]
pub fn glyph(mask: DotMask) -> char {
    // 0x2800..=0x28FF lies entirely within the BMP and contains no
    // surrogates, so the conversion cannot fail.
    char::from_u32(BRAILLE_BLOCK_START + u32::from(mask.bits())).unwrap_or('\u{FFFD}')
}
