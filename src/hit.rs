//! Hit-testing: pure world-space geometry for selecting elements.
//!
//! Every test adds a fixed [`HIT_SLOP`] of world units to the element's
//! nominal size, so tolerance does not change with zoom.

#[cfg(test)]
#[path = "hit_test.rs"]
mod hit_test;

use crate::consts::{HIT_SLOP, TEXT_WIDTH_FACTOR};
use crate::element::{Element, Shape};
use crate::viewport::Point;

/// Distance from `p` to the segment `a`–`b`.
///
/// Projects `p` onto the segment with the parameter clamped to `[0, 1]`.
/// A zero-length segment degrades to the distance from `a`.
#[must_use]
pub fn point_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    p.distance(Point::new(a.x + t * dx, a.y + t * dy))
}

/// Whether `p` lies inside `[x, x + w] × [y, y + h]`.
///
/// The box is not normalized: a negative extent yields an empty range on that axis.
fn in_box(p: Point, origin: Point, w: f64, h: f64) -> bool {
    p.x >= origin.x && p.x <= origin.x + w && p.y >= origin.y && p.y <= origin.y + h
}

/// Whether `world_pt` selects `element`.
#[must_use]
pub fn hit_test(element: &Element, world_pt: Point) -> bool {
    let reach = element.style.size + HIT_SLOP;
    match &element.shape {
        // Nearest-vertex approximation, not true polyline distance.
        Shape::Stroke { points, .. } => points.iter().any(|p| p.distance(world_pt) <= reach),
        Shape::Line { end } => point_segment_distance(world_pt, element.origin, *end) <= reach,
        Shape::Rectangle { .. } | Shape::StickyNote { .. } => element
            .box_extent()
            .is_some_and(|(w, h)| in_box(world_pt, element.origin, w, h)),
        Shape::Circle { edge } => {
            let radius = element.origin.distance(*edge);
            (element.origin.distance(world_pt) - radius).abs() <= reach
        }
        Shape::Text { content } => {
            let font_size = element.font_size();
            let est_w = text_width_estimate(content, font_size);
            in_box(world_pt, element.origin, est_w, font_size)
        }
    }
}

/// Rough rendered width of `content` at `font_size`, without glyph metrics.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn text_width_estimate(content: &str, font_size: f64) -> f64 {
    content.chars().count() as f64 * font_size * TEXT_WIDTH_FACTOR
}

/// The topmost element under `world_pt`, scanning from the end of the draw order.
#[must_use]
pub fn pick_topmost(elements: &[Element], world_pt: Point) -> Option<&Element> {
    elements.iter().rev().find(|el| hit_test(el, world_pt))
}
