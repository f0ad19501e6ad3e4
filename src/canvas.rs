// src/canvas.rs

//! The dual-resolution `Canvas`: a pixel-space color buffer plus a
//! braille-cell mask buffer.
//!
//! Pixel space is `px_w x px_h`; the cell grid is derived from it by
//! `cell_w = ceil(px_w / 2)` and `cell_h = ceil(px_h / 4)`. Every
//! pixel mutation updates the covering cell's dot mask and the
//! per-pixel color, so the two buffers never disagree. All mutators
//! are bounds-checked: out-of-range coordinates are silent no-ops.

use crate::braille::{self, DotMask, CELL_HEIGHT_PX, CELL_WIDTH_PX};
use crate::color::Rgb;

use log::trace;

/// Owns the pixel color buffer and the braille-cell mask buffer.
///
/// A `Canvas` is exclusively owned by one logical session. It is
/// created once, destructively resized or cleared in place, and holds
/// no reference to any viewport: callers map world coordinates to
/// pixel coordinates before drawing.
#[derive(Debug, Clone)]
pub struct Canvas {
    px_w: usize,
    px_h: usize,
    cell_w: usize,
    cell_h: usize,
    /// One dot mask per cell, row-major over the cell grid.
    cells: Vec<DotMask>,
    /// One packed color per pixel, row-major over pixel space.
    colors: Vec<Rgb>,
}

impl Canvas {
    /// Allocates a zero-filled canvas of `px_w x px_h` pixels.
    pub fn new(px_w: usize, px_h: usize) -> Self {
        let cell_w = px_w.div_ceil(CELL_WIDTH_PX);
        let cell_h = px_h.div_ceil(CELL_HEIGHT_PX);
        Canvas {
            px_w,
            px_h,
            cell_w,
            cell_h,
            cells: vec![DotMask::empty(); cell_w * cell_h],
            colors: vec![Rgb::BLACK; px_w * px_h],
        }
    }

    /// Discards the current buffers and reallocates for the new pixel
    /// dimensions. All content is lost; callers needing continuity
    /// must replay their recorded plot commands.
    pub fn resize(&mut self, px_w: usize, px_h: usize) {
        trace!(
            "canvas resize {}x{} -> {}x{}",
            self.px_w,
            self.px_h,
            px_w,
            px_h
        );
        *self = Canvas::new(px_w, px_h);
    }

    /// Zero-fills both buffers without changing dimensions.
    pub fn clear(&mut self) {
        self.cells.fill(DotMask::empty());
        self.colors.fill(Rgb::BLACK);
    }

    /// Canvas width in pixels.
    pub fn width_px(&self) -> usize {
        self.px_w
    }

    /// Canvas height in pixels.
    pub fn height_px(&self) -> usize {
        self.px_h
    }

    /// Cell grid width (terminal columns).
    pub fn width_cells(&self) -> usize {
        self.cell_w
    }

    /// Cell grid height (terminal rows).
    pub fn height_cells(&self) -> usize {
        self.cell_h
    }

    /// Sets pixel (`x`, `y`) to `color`, turning on the matching dot
    /// bit in the covering cell. No-op if the pixel is out of bounds.
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        let Some((x, y)) = self.pixel_index(x, y) else {
            return;
        };
        let (cx, cy) = (x / CELL_WIDTH_PX, y / CELL_HEIGHT_PX);
        let bit = braille::dot(x % CELL_WIDTH_PX, y % CELL_HEIGHT_PX);
        self.cells[cy * self.cell_w + cx] |= bit;
        self.colors[y * self.px_w + x] = color;
    }

    /// Clears pixel (`x`, `y`) and its dot bit. No-op out of bounds.
    pub fn unset_pixel(&mut self, x: i32, y: i32) {
        let Some((x, y)) = self.pixel_index(x, y) else {
            return;
        };
        let (cx, cy) = (x / CELL_WIDTH_PX, y / CELL_HEIGHT_PX);
        let bit = braille::dot(x % CELL_WIDTH_PX, y % CELL_HEIGHT_PX);
        self.cells[cy * self.cell_w + cx] &= !bit;
        self.colors[y * self.px_w + x] = Rgb::BLACK;
    }

    /// Returns the dot mask of cell (`cx`, `cy`), or an empty mask if
    /// the cell is out of bounds.
    pub fn cell_mask(&self, cx: usize, cy: usize) -> DotMask {
        if cx >= self.cell_w || cy >= self.cell_h {
            return DotMask::empty();
        }
        self.cells[cy * self.cell_w + cx]
    }

    /// Resolves the display color of cell (`cx`, `cy`).
    ///
    /// A cell's 8 sub-pixels may carry different colors, but a glyph
    /// has a single foreground color. The policy is deterministic
    /// first-set-wins: sub-cell positions are scanned column 0 rows
    /// 0..3, then column 1 rows 0..3, and the first set dot's pixel
    /// color is returned. An empty mask resolves to `None` (the cell
    /// renders as a blank, not a colored glyph).
    pub fn cell_color(&self, cx: usize, cy: usize) -> Option<Rgb> {
        let mask = self.cell_mask(cx, cy);
        if mask.is_empty() {
            return None;
        }
        for col in 0..CELL_WIDTH_PX {
            for row in 0..CELL_HEIGHT_PX {
                if !mask.contains(braille::dot(col, row)) {
                    continue;
                }
                let px = cx * CELL_WIDTH_PX + col;
                let py = cy * CELL_HEIGHT_PX + row;
                // Cells on the right/bottom edge may cover pixels
                // past the pixel buffer when px_w or px_h is not a
                // multiple of the cell size.
                if px < self.px_w && py < self.px_h {
                    return Some(self.colors[py * self.px_w + px]);
                }
            }
        }
        None
    }

    /// Returns whether pixel (`x`, `y`) is set. Out-of-bounds
    /// coordinates are simply unset.
    pub fn pixel_is_set(&self, x: i32, y: i32) -> bool {
        let Some((x, y)) = self.pixel_index(x, y) else {
            return false;
        };
        let (cx, cy) = (x / CELL_WIDTH_PX, y / CELL_HEIGHT_PX);
        let bit = braille::dot(x % CELL_WIDTH_PX, y % CELL_HEIGHT_PX);
        self.cells[cy * self.cell_w + cx].contains(bit)
    }

    fn pixel_index(&self, x: i32, y: i32) -> Option<(usize, usize)> {
        if x < 0 || y < 0 {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        if x >= self.px_w || y >= self.px_h {
            return None;
        }
        Some((x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cell_dimensions_use_ceiling_division() {
        let c = Canvas::new(5, 6);
        assert_eq!(c.width_cells(), 3); // ceil(5/2)
        assert_eq!(c.height_cells(), 2); // ceil(6/4)

        let c = Canvas::new(100, 64);
        assert_eq!(c.width_cells(), 50);
        assert_eq!(c.height_cells(), 16);
    }

    #[test]
    fn set_pixel_sets_the_expected_dot_bit() {
        let mut c = Canvas::new(10, 10);
        c.set_pixel(0, 0, Rgb::WHITE);
        assert_eq!(c.cell_mask(0, 0), DotMask::DOT_1);

        c.set_pixel(1, 3, Rgb::WHITE); // column 1, row 3 -> dot 8
        assert_eq!(c.cell_mask(0, 0), DotMask::DOT_1 | DotMask::DOT_8);

        c.set_pixel(3, 5, Rgb::WHITE); // cell (1, 1), column 1, row 1 -> dot 5
        assert_eq!(c.cell_mask(1, 1), DotMask::DOT_5);
    }

    #[test]
    fn unset_pixel_clears_only_its_bit() {
        let mut c = Canvas::new(4, 4);
        c.set_pixel(0, 0, Rgb::WHITE);
        c.set_pixel(0, 1, Rgb::WHITE);
        c.unset_pixel(0, 0);
        assert_eq!(c.cell_mask(0, 0), DotMask::DOT_2);
    }

    #[test]
    fn out_of_bounds_mutation_is_a_noop() {
        let mut c = Canvas::new(4, 4);
        c.set_pixel(-1, 0, Rgb::WHITE);
        c.set_pixel(0, -3, Rgb::WHITE);
        c.set_pixel(4, 0, Rgb::WHITE);
        c.set_pixel(0, 4, Rgb::WHITE);
        c.unset_pixel(-1, -1);
        for cy in 0..c.height_cells() {
            for cx in 0..c.width_cells() {
                assert!(c.cell_mask(cx, cy).is_empty());
            }
        }
    }

    #[test]
    fn lone_pixel_color_round_trips_through_cell_color() {
        let mut c = Canvas::new(8, 8);
        for y in 0..8 {
            for x in 0..8 {
                c.clear();
                let color = Rgb::from_components(x as u8, y as u8, 7);
                c.set_pixel(x, y, color);
                let (cx, cy) = (x as usize / 2, y as usize / 4);
                assert_eq!(c.cell_color(cx, cy), Some(color), "pixel ({}, {})", x, y);
            }
        }
    }

    #[test]
    fn cell_color_is_first_set_wins_in_column_order() {
        let mut c = Canvas::new(2, 4);
        // Column 1 row 0 (dot 4) and column 0 row 2 (dot 3): the scan
        // visits column 0 first, so dot 3's color wins.
        c.set_pixel(1, 0, Rgb::CYAN);
        c.set_pixel(0, 2, Rgb::GREEN);
        assert_eq!(c.cell_color(0, 0), Some(Rgb::GREEN));

        // With column 0 cleared, column 1's color is next in order.
        c.unset_pixel(0, 2);
        assert_eq!(c.cell_color(0, 0), Some(Rgb::CYAN));
    }

    #[test]
    fn empty_cell_has_no_color() {
        let c = Canvas::new(4, 4);
        assert_eq!(c.cell_color(0, 0), None);
        assert_eq!(c.cell_color(99, 99), None);
    }

    #[test]
    fn resize_discards_all_content() {
        let mut c = Canvas::new(6, 6);
        c.set_pixel(1, 1, Rgb::WHITE);
        c.resize(8, 12);
        assert_eq!(c.width_px(), 8);
        assert_eq!(c.height_px(), 12);
        assert_eq!(c.width_cells(), 4);
        assert_eq!(c.height_cells(), 3);
        for cy in 0..c.height_cells() {
            for cx in 0..c.width_cells() {
                assert!(c.cell_mask(cx, cy).is_empty());
            }
        }
    }

    #[test]
    fn clear_keeps_dimensions() {
        let mut c = Canvas::new(6, 6);
        c.set_pixel(2, 2, Rgb::WHITE);
        c.clear();
        assert_eq!(c.width_px(), 6);
        assert!(c.cell_mask(1, 0).is_empty());
        assert_eq!(c.cell_color(1, 0), None);
    }
}
