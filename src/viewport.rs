// src/viewport.rs

//! The world-space window being rendered.
//!
//! A `Viewport` is the continuous coordinate window (`xmin..xmax`,
//! `ymin..ymax`) that plotting operations map into pixel space. The
//! `locked` flag records whether the user set the window manually
//! (zoom/pan); a locked viewport is never overwritten by autoscale
//! when new data arrives.

use serde::{Deserialize, Serialize};

use crate::plot::Bounds;

/// World-space window plus the manual-zoom lock flag.
///
/// `xmin < xmax` and `ymin < ymax` are caller conventions, enforced by
/// the command layer rather than checked here; the rasterizer guards
/// against degenerate ranges on its own.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    /// True when the user zoomed or panned manually; autoscale on new
    /// data is suppressed while set.
    #[serde(default)]
    pub locked: bool,
}

impl Default for Viewport {
    fn default() -> Self {
        Viewport {
            xmin: -10.0,
            xmax: 10.0,
            ymin: -5.0,
            ymax: 5.0,
            locked: false,
        }
    }
}

impl Viewport {
    pub fn x_range(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn y_range(&self) -> f64 {
        self.ymax - self.ymin
    }

    /// Shrinks the window about its center by `fx` horizontally and
    /// `fy` vertically (factors > 1 zoom in, < 1 zoom out) and locks
    /// the viewport. Non-positive factors are ignored.
    pub fn zoom(&mut self, fx: f64, fy: f64) {
        if fx <= 0.0 || fy <= 0.0 {
            return;
        }
        let cx = (self.xmin + self.xmax) / 2.0;
        let cy = (self.ymin + self.ymax) / 2.0;
        let rx = self.x_range() / 2.0 / fx;
        let ry = self.y_range() / 2.0 / fy;
        self.xmin = cx - rx;
        self.xmax = cx + rx;
        self.ymin = cy - ry;
        self.ymax = cy + ry;
        self.locked = true;
    }

    /// Restores the default window and releases the lock.
    pub fn reset(&mut self) {
        *self = Viewport::default();
    }

    /// Adopts data bounds as the new window (autoscale). Does not
    /// touch the lock flag; callers check it first.
    pub fn fit(&mut self, bounds: &Bounds) {
        self.xmin = bounds.xmin;
        self.xmax = bounds.xmax;
        self.ymin = bounds.ymin;
        self.ymax = bounds.ymax;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zoom_halves_the_window_about_its_center() {
        let mut v = Viewport::default();
        v.zoom(2.0, 2.0);
        assert_eq!((v.xmin, v.xmax), (-5.0, 5.0));
        assert_eq!((v.ymin, v.ymax), (-2.5, 2.5));
        assert!(v.locked);
    }

    #[test]
    fn zoom_ignores_non_positive_factors() {
        let mut v = Viewport::default();
        v.zoom(0.0, 1.0);
        v.zoom(-2.0, 2.0);
        assert_eq!(v, Viewport::default());
        assert!(!v.locked);
    }

    #[test]
    fn reset_restores_defaults_and_unlocks() {
        let mut v = Viewport::default();
        v.zoom(4.0, 4.0);
        v.reset();
        assert_eq!(v, Viewport::default());
    }

    #[test]
    fn fit_adopts_bounds_without_touching_the_lock() {
        let mut v = Viewport::default();
        v.fit(&Bounds {
            xmin: 0.0,
            xmax: 1.0,
            ymin: 2.0,
            ymax: 3.0,
        });
        assert_eq!((v.xmin, v.xmax, v.ymin, v.ymax), (0.0, 1.0, 2.0, 3.0));
        assert!(!v.locked);
    }
}
