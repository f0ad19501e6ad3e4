// src/plot.rs

//! The rasterizer: Bresenham lines, function sampling, and CSV series
//! plotting. Everything here writes into a [`Canvas`] through its
//! bounds-checked mutators; world coordinates come from a [`Viewport`].
//!
//! The world→pixel transform is shared by all plot kinds: column
//! `px` maps to `x = xmin + px/(width-1) * xrange`, and world `y` maps
//! to row `py = round((ymax - y)/yrange * (height-1))`. The y axis is
//! inverted: larger world y means a smaller row index. Axis ranges
//! with magnitude below [`DEGENERATE_RANGE_EPSILON`] are silently
//! clamped to 1.0 to avoid division blow-up.

use std::fs;
use std::path::Path;

use log::{debug, warn};

use crate::canvas::Canvas;
use crate::color::Rgb;
use crate::error::PlotError;
use crate::expr;
use crate::viewport::Viewport;

/// Axis ranges smaller than this are treated as degenerate.
pub const DEGENERATE_RANGE_EPSILON: f64 = 1e-9;

/// Min/max bounding box of a data series, used for autoscale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
}

impl Bounds {
    fn from_point(x: f64, y: f64) -> Self {
        Bounds {
            xmin: x,
            xmax: x,
            ymin: y,
            ymax: y,
        }
    }

    fn include(&mut self, x: f64, y: f64) {
        self.xmin = self.xmin.min(x);
        self.xmax = self.xmax.max(x);
        self.ymin = self.ymin.min(y);
        self.ymax = self.ymax.max(y);
    }
}

/// Substitutes 1.0 for a degenerate axis range. The substitution is
/// protective and silent; it is not surfaced as an error.
fn effective_range(range: f64) -> f64 {
    if range.abs() < DEGENERATE_RANGE_EPSILON {
        debug!("degenerate axis range {:e}, clamping to 1.0", range);
        1.0
    } else {
        range
    }
}

/// Draws the line segment (`x0`, `y0`)→(`x1`, `y1`) in pixel space
/// with the classic Bresenham error accumulator. Every pixel on the
/// segment is visited exactly once, both endpoints included, and the
/// pixel set is identical when the endpoints are swapped: the segment
/// is canonicalized to run from its lexicographically smaller endpoint
/// before stepping, since tie-breaking in the raw recurrence is not
/// direction-independent. Pixels outside the canvas are dropped by
/// `set_pixel`.
pub fn draw_line(canvas: &mut Canvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgb) {
    let ((x0, y0), (x1, y1)) = if (x1, y1) < (x0, y0) {
        ((x1, y1), (x0, y0))
    } else {
        ((x0, y0), (x1, y1))
    };
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let (mut x, mut y) = (x0, y0);
    loop {
        canvas.set_pixel(x, y, color);
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

/// Plots `expression` across the full canvas width.
///
/// Sampling is two-phase: every pixel column is evaluated first, and
/// only if all evaluations succeed are any pixels painted. An
/// evaluation error therefore aborts the whole plot with the canvas
/// untouched, with no partial curve. Rows that fall outside the canvas,
/// and non-finite samples that did not raise the error flag (e.g.
/// `log(-1)`), are dropped silently: a clipped curve is not an error.
pub fn plot_function(
    canvas: &mut Canvas,
    expression: &str,
    color: Rgb,
    view: &Viewport,
) -> Result<(), PlotError> {
    let width = canvas.width_px();
    let height = canvas.height_px();
    let x_range = effective_range(view.x_range());
    let y_range = effective_range(view.y_range());
    let col_denom = width.saturating_sub(1).max(1) as f64;

    let mut pixels = Vec::with_capacity(width);
    for px in 0..width {
        let x_world = view.xmin + px as f64 / col_denom * x_range;
        let y_world = expr::evaluate(expression, x_world).map_err(|_| PlotError::Expr {
            expr: expression.to_string(),
        })?;
        if !y_world.is_finite() {
            continue;
        }
        let py = ((view.ymax - y_world) / y_range * (height as f64 - 1.0)).round();
        if py >= 0.0 && (py as usize) < height {
            pixels.push((px as i32, py as i32));
        }
    }

    for (px, py) in pixels {
        canvas.set_pixel(px, py, color);
    }
    Ok(())
}

/// Reads two numeric columns from a delimited text file.
///
/// Convention (user-visible, so pinned down here): fields are
/// comma-separated and column selectors are 0-indexed. Values parse
/// with `f64::from_str`, i.e. `.` as the decimal separator. Rows where
/// either selected field is missing or fails to parse are skipped
/// without aborting; this is how header lines fall out naturally.
///
/// Returns the parsed points in file order together with their
/// bounding box. Errors if the file cannot be read or no row yields
/// two numeric values.
pub fn read_series(
    path: &Path,
    xcol: usize,
    ycol: usize,
) -> Result<(Vec<(f64, f64)>, Bounds), PlotError> {
    let text = fs::read_to_string(path).map_err(|source| PlotError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let mut points: Vec<(f64, f64)> = Vec::new();
    let mut bounds: Option<Bounds> = None;
    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        // Split twice so the two selectors are independent of each
        // other's order (ycol may be left of xcol).
        let x = line
            .split(',')
            .nth(xcol)
            .map(str::trim)
            .map(str::parse::<f64>);
        let y = line
            .split(',')
            .nth(ycol)
            .map(str::trim)
            .map(str::parse::<f64>);
        match (x, y) {
            (Some(Ok(x)), Some(Ok(y))) => {
                match bounds.as_mut() {
                    Some(b) => b.include(x, y),
                    None => bounds = Some(Bounds::from_point(x, y)),
                }
                points.push((x, y));
            }
            _ => {
                debug!("skipping non-numeric row {} of {}", lineno + 1, path.display());
            }
        }
    }

    match bounds {
        Some(bounds) => Ok((points, bounds)),
        None => Err(PlotError::NoData {
            path: path.to_path_buf(),
        }),
    }
}

/// Draws a continuous trace through `points`, connecting successive
/// points with straight line segments under the shared world→pixel
/// transform. A single point degenerates to a dot.
///
/// Segments are clipped to the canvas rectangle in f64 pixel space
/// before rasterizing: points far outside a locked viewport can map
/// many orders of magnitude past the canvas, and feeding those
/// coordinates to the integer line stepper would overflow its error
/// accumulator. Segments entirely off canvas are skipped.
pub fn plot_series(canvas: &mut Canvas, points: &[(f64, f64)], color: Rgb, view: &Viewport) {
    let width = canvas.width_px() as f64;
    let height = canvas.height_px() as f64;
    let x_range = effective_range(view.x_range());
    let y_range = effective_range(view.y_range());

    let to_pixel = |&(x, y): &(f64, f64)| -> (f64, f64) {
        let px = (x - view.xmin) / x_range * (width - 1.0);
        let py = (view.ymax - y) / y_range * (height - 1.0);
        (px, py)
    };

    let mut prev: Option<(f64, f64)> = None;
    for point in points {
        let (px, py) = to_pixel(point);
        match prev {
            Some(p) => {
                if let Some(((ax, ay), (bx, by))) = clip_segment(p, (px, py), width, height) {
                    draw_line(
                        canvas,
                        ax.round() as i32,
                        ay.round() as i32,
                        bx.round() as i32,
                        by.round() as i32,
                        color,
                    );
                }
            }
            None => {
                if px.is_finite() && py.is_finite() {
                    // set_pixel drops off-canvas dots; the saturating
                    // cast keeps even huge coordinates well-defined.
                    canvas.set_pixel(px.round() as i32, py.round() as i32, color);
                }
            }
        }
        prev = Some((px, py));
    }
}

/// Liang-Barsky parametric clip of the segment (`x0`, `y0`)→(`x1`,
/// `y1`) against the pixel rectangle `[0, width-1] x [0, height-1]`.
/// Returns `None` when the segment lies entirely outside the
/// rectangle or has a non-finite endpoint.
fn clip_segment(
    (x0, y0): (f64, f64),
    (x1, y1): (f64, f64),
    width: f64,
    height: f64,
) -> Option<((f64, f64), (f64, f64))> {
    if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) {
        return None;
    }
    let (dx, dy) = (x1 - x0, y1 - y0);
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;
    // One (p, q) pair per rectangle edge: left, right, top, bottom.
    let edges = [
        (-dx, x0),
        (dx, width - 1.0 - x0),
        (-dy, y0),
        (dy, height - 1.0 - y0),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: outside it means outside, period.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let t = q / p;
        if p < 0.0 {
            if t > t1 {
                return None;
            }
            t0 = t0.max(t);
        } else {
            if t < t0 {
                return None;
            }
            t1 = t1.min(t);
        }
    }
    Some((
        (x0 + t0 * dx, y0 + t0 * dy),
        (x0 + t1 * dx, y0 + t1 * dy),
    ))
}

/// Plots two columns of a CSV file as a connected trace.
///
/// Reads and validates the file first, so a failure (unreadable file,
/// zero numeric rows) never mutates the canvas. Returns the series
/// bounding box for the caller's autoscale decision.
pub fn plot_csv(
    canvas: &mut Canvas,
    path: &Path,
    xcol: usize,
    ycol: usize,
    color: Rgb,
    view: &Viewport,
) -> Result<Bounds, PlotError> {
    let (points, bounds) = read_series(path, xcol, ycol)?;
    if points.len() == 1 {
        warn!("{}: single data row, plotting a dot", path.display());
    }
    plot_series(canvas, &points, color, view);
    Ok(bounds)
}
