// src/render.rs

//! Terminal renderer: turns a [`Canvas`] into text, one braille glyph
//! per cell, optionally wrapped in 24-bit color escape sequences and
//! optionally framed by tick-labeled axes.
//!
//! Output goes to any [`io::Write`] sink. Color output sets the
//! truecolor foreground before each glyph and resets immediately
//! after it; the reset is emitted unconditionally per glyph so no
//! color state ever leaks across rows or into the caller's terminal.

use std::io::{self, Write};

use crate::braille;
use crate::canvas::Canvas;
use crate::viewport::Viewport;

const SGR_TRUECOLOR_FG_PREFIX: &str = "\x1b[38;2;";
const SGR_RESET: &str = "\x1b[0m";

/// Width of the Y-axis label gutter, including its trailing space.
const Y_LABEL_PAD: usize = 8;

/// Renders one cell row: a blank for every empty mask, otherwise the
/// braille glyph `0x2800 + mask`, colored when `use_color` is set.
/// Ends with a newline.
pub fn render_row<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    cy: usize,
    use_color: bool,
) -> io::Result<()> {
    for cx in 0..canvas.width_cells() {
        let mask = canvas.cell_mask(cx, cy);
        if mask.is_empty() {
            write!(out, " ")?;
            continue;
        }
        let glyph = braille::glyph(mask);
        match canvas.cell_color(cx, cy).filter(|_| use_color) {
            Some(color) => write!(
                out,
                "{}{};{};{}m{}{}",
                SGR_TRUECOLOR_FG_PREFIX,
                color.r(),
                color.g(),
                color.b(),
                glyph,
                SGR_RESET
            )?,
            None => write!(out, "{}", glyph)?,
        }
    }
    writeln!(out)
}

/// Renders every cell row top to bottom, one line each. Row 0 holds
/// the highest world y (the plotting transform inverts the y axis).
pub fn render_full<W: Write>(out: &mut W, canvas: &Canvas, use_color: bool) -> io::Result<()> {
    for cy in 0..canvas.height_cells() {
        render_row(out, canvas, cy, use_color)?;
    }
    Ok(())
}

/// Renders the canvas framed by axes: every data row is left-padded
/// with a fixed-width Y label gutter, and one X-axis line follows the
/// grid.
///
/// Y labels (2 decimals) appear every `cell_h / (y_ticks - 1)` rows
/// and unconditionally on the last row; X labels every
/// `cell_w / (x_ticks - 1)` columns, with the cursor advanced past
/// each label so labels never overlap. The cadence uses integer
/// division and can be uneven when the tick count does not divide the
/// grid dimension; that approximation is accepted.
pub fn render_full_with_axes<W: Write>(
    out: &mut W,
    canvas: &Canvas,
    view: &Viewport,
    x_ticks: usize,
    y_ticks: usize,
    use_color: bool,
) -> io::Result<()> {
    let cell_w = canvas.width_cells();
    let cell_h = canvas.height_cells();
    let y_step = (cell_h / y_ticks.saturating_sub(1).max(1)).max(1);
    let row_denom = cell_h.saturating_sub(1).max(1) as f64;

    for cy in 0..cell_h {
        if cy % y_step == 0 || cy + 1 == cell_h {
            let yval = view.ymax - cy as f64 / row_denom * view.y_range();
            write!(out, "{:>width$} ", format!("{:.2}", yval), width = Y_LABEL_PAD - 1)?;
        } else {
            write!(out, "{:width$}", "", width = Y_LABEL_PAD)?;
        }
        render_row(out, canvas, cy, use_color)?;
    }

    write!(out, "{:width$}", "", width = Y_LABEL_PAD)?;
    let x_step = (cell_w / x_ticks.saturating_sub(1).max(1)).max(1);
    let col_denom = cell_w.saturating_sub(1).max(1) as f64;
    let mut cx = 0;
    while cx < cell_w {
        if x_ticks > 1 && cx % x_step == 0 {
            let xval = view.xmin + cx as f64 / col_denom * view.x_range();
            let label = format!("{:.2}", xval);
            write!(out, "{}", label)?;
            cx += label.len();
        } else {
            write!(out, " ")?;
            cx += 1;
        }
    }
    writeln!(out)
}

/// Convenience wrapper rendering into a `String` (frames handed to
/// the shell layer, tests).
pub fn render_to_string(canvas: &Canvas, axes: Option<(&Viewport, usize, usize)>, use_color: bool) -> String {
    let mut buf: Vec<u8> = Vec::new();
    // Writing into a Vec cannot fail.
    let result = match axes {
        Some((view, x_ticks, y_ticks)) => {
            render_full_with_axes(&mut buf, canvas, view, x_ticks, y_ticks, use_color)
        }
        None => render_full(&mut buf, canvas, use_color),
    };
    debug_assert!(result.is_ok());
    String::from_utf8_lossy(&buf).into_owned()
}
