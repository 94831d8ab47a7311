#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_SCALE, MIN_SCALE};

/// A point in either screen or world space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// This point shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self { x: self.x + dx, y: self.y + dy }
    }
}

/// Pan/zoom state of the infinite canvas.
///
/// `pan_x` / `pan_y` are the world-to-screen translation in CSS pixels and
/// `scale` is the zoom factor (1.0 = no zoom), always within
/// [`MIN_SCALE`, `MAX_SCALE`]. `width` / `height` are the drawing surface size in
/// CSS pixels and `dpr` its device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub scale: f64,
    pub pan_x: f64,
    pub pan_y: f64,
    pub width: f64,
    pub height: f64,
    pub dpr: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { scale: 1.0, pan_x: 0.0, pan_y: 0.0, width: 0.0, height: 0.0, dpr: 1.0 }
    }
}

impl Viewport {
    /// Convert a screen-space point (CSS pixels) to world coordinates.
    #[must_use]
    pub fn screen_to_world(&self, screen: Point) -> Point {
        Point {
            x: (screen.x - self.pan_x) / self.scale,
            y: (screen.y - self.pan_y) / self.scale,
        }
    }

    /// Convert a world-space point to screen coordinates (CSS pixels).
    #[must_use]
    pub fn world_to_screen(&self, world: Point) -> Point {
        Point {
            x: world.x * self.scale + self.pan_x,
            y: world.y * self.scale + self.pan_y,
        }
    }

    /// Multiply the scale by `factor`, keeping the world point under `screen` fixed.
    ///
    /// Non-finite or non-positive factors are ignored.
    pub fn zoom_at(&mut self, screen: Point, factor: f64) {
        if !factor.is_finite() || factor <= 0.0 {
            return;
        }
        let anchor = self.screen_to_world(screen);
        self.scale = (self.scale * factor).clamp(MIN_SCALE, MAX_SCALE);
        self.pan_x = screen.x - anchor.x * self.scale;
        self.pan_y = screen.y - anchor.y * self.scale;
    }

    /// Shift the view by a screen-pixel delta, independent of scale.
    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.pan_x += dx;
        self.pan_y += dy;
    }

    /// Back to scale 1 with the world origin at the top-left corner.
    pub fn reset_view(&mut self) {
        self.scale = 1.0;
        self.pan_x = 0.0;
        self.pan_y = 0.0;
    }

    /// Record the surface size in CSS pixels and its device pixel ratio.
    pub fn resize(&mut self, width: f64, height: f64, dpr: f64) {
        self.width = width.max(0.0);
        self.height = height.max(0.0);
        self.dpr = if dpr.is_finite() && dpr > 0.0 { dpr } else { 1.0 };
    }

    /// World-space corners `(top_left, bottom_right)` of the visible surface.
    #[must_use]
    pub fn visible_world_bounds(&self) -> (Point, Point) {
        (
            self.screen_to_world(Point::new(0.0, 0.0)),
            self.screen_to_world(Point::new(self.width, self.height)),
        )
    }
}
