//! Rendering: draws the full scene to a 2D drawing surface.
//!
//! The pipeline reads committed elements, the live element and the viewport,
//! and produces pixels; it never mutates application state. Drawing goes
//! through the [`Surface`] trait, which mirrors the subset of the Canvas2D API
//! the renderer needs. [`web_sys::CanvasRenderingContext2d`] implements it for
//! the browser; tests substitute a recording surface.
//!
//! Fallible `Canvas2D` calls propagate errors as [`RenderError`]. The top-level
//! caller ([`crate::engine::Engine::render`]) logs and returns the result.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

#[cfg(test)]
#[path = "recording_surface_test.rs"]
pub(crate) mod recording_surface;

use std::f64::consts::TAU;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use crate::config::EngineConfig;
use crate::consts::{
    GRID_COARSE_COLOR, GRID_COARSE_SPACING, GRID_FINE_COLOR, GRID_FINE_SPACING, STICKY_FILL, STICKY_FONT_PX,
    STICKY_LINE_HEIGHT, STICKY_PADDING, STICKY_SHADOW, STICKY_SHADOW_OFFSET, STICKY_SIZE, STICKY_TEXT,
};
use crate::element::{Element, Shape, StrokeKind};
use crate::viewport::{Point, Viewport};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("canvas call failed: {0}")]
    Canvas(String),
    #[error("canvas has no 2d context")]
    NoContext,
}

impl From<JsValue> for RenderError {
    fn from(err: JsValue) -> Self {
        Self::Canvas(format!("{err:?}"))
    }
}

/// The immediate-mode drawing calls used by the renderer.
///
/// Method names and argument order follow `CanvasRenderingContext2d`.
pub trait Surface {
    fn save(&self);
    fn restore(&self);
    /// Replace the current transform with `[a c e; b d f]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface rejects the call.
    #[allow(clippy::many_single_char_names)]
    fn set_transform(&self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), RenderError>;
    /// # Errors
    ///
    /// Returns an error if the surface rejects the call.
    fn translate(&self, x: f64, y: f64) -> Result<(), RenderError>;
    /// # Errors
    ///
    /// Returns an error if the surface rejects the call.
    fn scale(&self, x: f64, y: f64) -> Result<(), RenderError>;

    fn set_fill_style(&self, color: &str);
    fn set_stroke_style(&self, color: &str);
    fn set_line_width(&self, width: f64);
    fn set_line_cap(&self, cap: &str);
    fn set_line_join(&self, join: &str);
    fn set_global_alpha(&self, alpha: f64);
    fn set_font(&self, font: &str);
    fn set_text_baseline(&self, baseline: &str);

    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64);
    fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64);
    fn begin_path(&self);
    fn move_to(&self, x: f64, y: f64);
    fn line_to(&self, x: f64, y: f64);
    /// # Errors
    ///
    /// Returns an error for a negative radius or a rejected call.
    fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderError>;
    fn stroke(&self);

    /// # Errors
    ///
    /// Returns an error if the surface rejects the call.
    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<(), RenderError>;
    /// Advance width of `text` in the current font.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot measure text.
    fn measure_text(&self, text: &str) -> Result<f64, RenderError>;
}

impl Surface for CanvasRenderingContext2d {
    fn save(&self) {
        CanvasRenderingContext2d::save(self);
    }

    fn restore(&self) {
        CanvasRenderingContext2d::restore(self);
    }

    fn set_transform(&self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Result<(), RenderError> {
        Ok(CanvasRenderingContext2d::set_transform(self, a, b, c, d, e, f)?)
    }

    fn translate(&self, x: f64, y: f64) -> Result<(), RenderError> {
        Ok(CanvasRenderingContext2d::translate(self, x, y)?)
    }

    fn scale(&self, x: f64, y: f64) -> Result<(), RenderError> {
        Ok(CanvasRenderingContext2d::scale(self, x, y)?)
    }

    fn set_fill_style(&self, color: &str) {
        self.set_fill_style_str(color);
    }

    fn set_stroke_style(&self, color: &str) {
        self.set_stroke_style_str(color);
    }

    fn set_line_width(&self, width: f64) {
        CanvasRenderingContext2d::set_line_width(self, width);
    }

    fn set_line_cap(&self, cap: &str) {
        CanvasRenderingContext2d::set_line_cap(self, cap);
    }

    fn set_line_join(&self, join: &str) {
        CanvasRenderingContext2d::set_line_join(self, join);
    }

    fn set_global_alpha(&self, alpha: f64) {
        CanvasRenderingContext2d::set_global_alpha(self, alpha);
    }

    fn set_font(&self, font: &str) {
        CanvasRenderingContext2d::set_font(self, font);
    }

    fn set_text_baseline(&self, baseline: &str) {
        CanvasRenderingContext2d::set_text_baseline(self, baseline);
    }

    fn fill_rect(&self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::fill_rect(self, x, y, w, h);
    }

    fn stroke_rect(&self, x: f64, y: f64, w: f64, h: f64) {
        CanvasRenderingContext2d::stroke_rect(self, x, y, w, h);
    }

    fn begin_path(&self) {
        CanvasRenderingContext2d::begin_path(self);
    }

    fn move_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::move_to(self, x, y);
    }

    fn line_to(&self, x: f64, y: f64) {
        CanvasRenderingContext2d::line_to(self, x, y);
    }

    fn arc(&self, x: f64, y: f64, radius: f64, start: f64, end: f64) -> Result<(), RenderError> {
        Ok(CanvasRenderingContext2d::arc(self, x, y, radius, start, end)?)
    }

    fn stroke(&self) {
        CanvasRenderingContext2d::stroke(self);
    }

    fn fill_text(&self, text: &str, x: f64, y: f64) -> Result<(), RenderError> {
        Ok(CanvasRenderingContext2d::fill_text(self, text, x, y)?)
    }

    fn measure_text(&self, text: &str) -> Result<f64, RenderError> {
        Ok(CanvasRenderingContext2d::measure_text(self, text)?.width())
    }
}

/// Draw one frame: background, world transform, grid, committed elements, live element.
///
/// Re-running with the same inputs issues the same calls.
///
/// # Errors
///
/// Returns `Err` if any surface call fails.
pub fn draw<S: Surface + ?Sized>(
    surface: &S,
    elements: &[Element],
    live: Option<&Element>,
    viewport: &Viewport,
    config: &EngineConfig,
) -> Result<(), RenderError> {
    // Layer 1: background in device pixels.
    let dpr = viewport.dpr;
    surface.set_transform(dpr, 0.0, 0.0, dpr, 0.0, 0.0)?;
    surface.set_global_alpha(1.0);
    surface.set_fill_style(&config.background);
    surface.fill_rect(0.0, 0.0, viewport.width, viewport.height);

    // Layer 2: world transform.
    surface.translate(viewport.pan_x, viewport.pan_y)?;
    surface.scale(viewport.scale, viewport.scale)?;

    // Layer 3: grid.
    if config.show_grid {
        draw_grid(surface, viewport);
    }

    // Layer 4: elements bottom-first, then the one being drawn.
    for element in elements.iter().chain(live) {
        draw_element(surface, element, &config.background)?;
    }

    Ok(())
}

// =============================================================
// Grid
// =============================================================

fn draw_grid<S: Surface + ?Sized>(surface: &S, viewport: &Viewport) {
    let (top_left, bottom_right) = viewport.visible_world_bounds();

    surface.save();
    surface.set_line_width(1.0 / viewport.scale);
    for (spacing, color) in [(GRID_FINE_SPACING, GRID_FINE_COLOR), (GRID_COARSE_SPACING, GRID_COARSE_COLOR)] {
        surface.set_stroke_style(color);
        surface.begin_path();

        let mut x = (top_left.x / spacing).floor() * spacing;
        while x <= bottom_right.x {
            surface.move_to(x, top_left.y);
            surface.line_to(x, bottom_right.y);
            x += spacing;
        }
        let mut y = (top_left.y / spacing).floor() * spacing;
        while y <= bottom_right.y {
            surface.move_to(top_left.x, y);
            surface.line_to(bottom_right.x, y);
            y += spacing;
        }

        surface.stroke();
    }
    surface.restore();
}

// =============================================================
// Element dispatch
// =============================================================

fn draw_element<S: Surface + ?Sized>(surface: &S, el: &Element, background: &str) -> Result<(), RenderError> {
    surface.save();
    surface.set_global_alpha(el.style.alpha);

    let result = match &el.shape {
        Shape::Stroke { kind, points } => {
            // Eraser paint covers; it never removes data.
            let color = if *kind == StrokeKind::Eraser { background } else { el.style.color.as_str() };
            draw_polyline(surface, points, color, el.style.size);
            Ok(())
        }
        Shape::Line { end } => {
            draw_polyline(surface, &[el.origin, *end], &el.style.color, el.style.size);
            Ok(())
        }
        Shape::Rectangle { width, height } => {
            surface.set_stroke_style(&el.style.color);
            surface.set_line_width(el.style.size);
            surface.stroke_rect(el.origin.x, el.origin.y, *width, *height);
            Ok(())
        }
        Shape::Circle { edge } => draw_circle(surface, el.origin, el.origin.distance(*edge), el),
        Shape::Text { content } => draw_text(surface, el, content),
        Shape::StickyNote { content } => draw_sticky(surface, el.origin, content),
    };

    surface.restore();
    result
}

// =============================================================
// Shape renderers
// =============================================================

fn draw_polyline<S: Surface + ?Sized>(surface: &S, points: &[Point], color: &str, width: f64) {
    let Some((first, rest)) = points.split_first() else {
        return;
    };
    surface.set_stroke_style(color);
    surface.set_line_width(width);
    surface.set_line_cap("round");
    surface.set_line_join("round");

    surface.begin_path();
    surface.move_to(first.x, first.y);
    if rest.is_empty() {
        // Round caps turn a zero-length segment into a dot.
        surface.line_to(first.x, first.y);
    }
    for p in rest {
        surface.line_to(p.x, p.y);
    }
    surface.stroke();
}

fn draw_circle<S: Surface + ?Sized>(surface: &S, center: Point, radius: f64, el: &Element) -> Result<(), RenderError> {
    surface.set_stroke_style(&el.style.color);
    surface.set_line_width(el.style.size);
    // A zero-radius ring is a zero-length path; only round caps paint it.
    surface.set_line_cap("round");
    surface.begin_path();
    surface.arc(center.x, center.y, radius, 0.0, TAU)?;
    surface.stroke();
    Ok(())
}

fn draw_text<S: Surface + ?Sized>(surface: &S, el: &Element, content: &str) -> Result<(), RenderError> {
    if content.is_empty() {
        return Ok(());
    }
    surface.set_fill_style(&el.style.color);
    surface.set_font(&format!("{}px sans-serif", el.font_size()));
    surface.set_text_baseline("top");
    surface.fill_text(content, el.origin.x, el.origin.y)
}

fn draw_sticky<S: Surface + ?Sized>(surface: &S, origin: Point, content: &str) -> Result<(), RenderError> {
    surface.set_fill_style(STICKY_SHADOW);
    surface.fill_rect(
        origin.x + STICKY_SHADOW_OFFSET,
        origin.y + STICKY_SHADOW_OFFSET,
        STICKY_SIZE,
        STICKY_SIZE,
    );
    surface.set_fill_style(STICKY_FILL);
    surface.fill_rect(origin.x, origin.y, STICKY_SIZE, STICKY_SIZE);

    surface.set_fill_style(STICKY_TEXT);
    surface.set_font(&format!("{STICKY_FONT_PX}px sans-serif"));
    surface.set_text_baseline("top");

    let max_width = STICKY_SIZE - STICKY_PADDING * 2.0;
    let mut y = origin.y + STICKY_PADDING;
    for line in wrap_words(surface, content, max_width)? {
        surface.fill_text(&line, origin.x + STICKY_PADDING, y)?;
        y += STICKY_LINE_HEIGHT;
    }
    Ok(())
}

// =============================================================
// Text layout
// =============================================================

/// Greedy word wrap: words are packed onto a line until adding the next one
/// would exceed `max_width` in the surface's current font.
///
/// Explicit newlines start a new paragraph. A single word wider than
/// `max_width` gets a line of its own.
///
/// # Errors
///
/// Propagates text measurement failures.
pub fn wrap_words<S: Surface + ?Sized>(surface: &S, text: &str, max_width: f64) -> Result<Vec<String>, RenderError> {
    let mut lines = Vec::new();
    for paragraph in text.lines() {
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{current} {word}");
            if surface.measure_text(&candidate)? > max_width {
                lines.push(std::mem::replace(&mut current, word.to_owned()));
            } else {
                current = candidate;
            }
        }
        lines.push(current);
    }
    Ok(lines)
}
