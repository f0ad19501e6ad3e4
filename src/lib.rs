// src/lib.rs

//! dotplot library crate.
//!
//! Renders mathematical functions and tabular numeric data as braille
//! vector graphics in a terminal. Pixel space is addressed at twice
//! the horizontal and four times the vertical resolution of the
//! character grid; each character cell is one braille glyph whose 8
//! dots are the cell's sub-pixels, with optional 24-bit color.
//!
//! The modules layer bottom-up: [`braille`] and [`color`] are pure
//! encodings, [`canvas`] owns the dual-resolution buffers, [`expr`]
//! evaluates expression strings, [`plot`] rasterizes lines, functions
//! and CSV series into a canvas under a [`viewport`], [`render`]
//! produces terminal text, and [`session`] ties them together behind
//! a replayable command history for an interactive shell to drive.

pub mod braille;
pub mod canvas;
pub mod color;
pub mod config;
pub mod error;
pub mod expr;
pub mod plot;
pub mod render;
pub mod session;
pub mod viewport;
